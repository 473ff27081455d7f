//! Port traits implemented by adapters.

pub mod audit_port;
pub mod config_port;
pub mod data_port;
pub mod predictor_port;
pub mod results_port;
