//! Concrete adapter implementations.

pub mod csv_store;
pub mod file_config_adapter;
pub mod thread_pacer;
pub mod tushare;
