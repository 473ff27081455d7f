//! Concrete adapter implementations for ports.

pub mod audit_log_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
