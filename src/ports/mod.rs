//! Port traits decoupling the domain from concrete adapters.

pub mod config_port;
pub mod pacing_port;
pub mod provider_port;
