//! Core domain types and logic.

pub mod sample;
pub mod position;
pub mod matcher;
pub mod policy;
pub mod session;
pub mod signal;
pub mod regression;
pub mod metrics;
pub mod config_validation;
pub mod error;
