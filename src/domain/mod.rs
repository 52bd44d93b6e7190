//! Core domain types and logic.

pub mod artifact;
pub mod collector;
pub mod dataset;
pub mod error;
pub mod query;
pub mod record;
pub mod retry;
pub mod security;
