//! Configuration validation.
//!
//! Validates all config fields before a session or training run starts.

use crate::domain::error::FxTraderError;
use crate::domain::matcher::DEFAULT_CONTRACT_SIZE;
use crate::domain::session::{DEFAULT_NOTIONAL, DEFAULT_PROFIT_TARGET, DEFAULT_STOP_LOSS};
use crate::ports::config_port::ConfigPort;

pub const SIMULATION: &str = "simulation";
pub const MODEL: &str = "model";

pub const POLICIES: [&str; 2] = ["random", "model"];

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    validate_data_dir(config)?;
    validate_notional(config)?;
    validate_thresholds(config)?;
    validate_contract_size(config)?;
    validate_seed(config)?;
    validate_policy(config)?;
    Ok(())
}

pub fn validate_model_config(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    validate_data_dir(config)?;
    validate_ridge_alpha(config)?;
    validate_test_fraction(config)?;
    validate_split_seed(config)?;
    Ok(())
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    match config.get_string(SIMULATION, "data_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(FxTraderError::ConfigMissing {
            section: SIMULATION.to_string(),
            key: "data_dir".to_string(),
        }),
    }
}

fn validate_notional(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    let value = config.get_double(SIMULATION, "notional", DEFAULT_NOTIONAL);
    if !value.is_finite() || value <= 0.0 {
        return Err(FxTraderError::ConfigInvalid {
            section: SIMULATION.to_string(),
            key: "notional".to_string(),
            reason: "notional must be a positive finite number".to_string(),
        });
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    let target = config.get_double(SIMULATION, "profit_target", DEFAULT_PROFIT_TARGET);
    let stop = config.get_double(SIMULATION, "stop_loss", DEFAULT_STOP_LOSS);
    for (key, value) in [("profit_target", target), ("stop_loss", stop)] {
        if !value.is_finite() {
            return Err(FxTraderError::ConfigInvalid {
                section: SIMULATION.to_string(),
                key: key.to_string(),
                reason: format!("{} must be a finite number", key),
            });
        }
    }
    if target <= stop {
        return Err(FxTraderError::ConfigInvalid {
            section: SIMULATION.to_string(),
            key: "profit_target".to_string(),
            reason: "profit_target must be greater than stop_loss".to_string(),
        });
    }
    Ok(())
}

fn validate_contract_size(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    let value = config.get_double(SIMULATION, "contract_size", DEFAULT_CONTRACT_SIZE);
    if !value.is_finite() || value <= 0.0 {
        return Err(FxTraderError::ConfigInvalid {
            section: SIMULATION.to_string(),
            key: "contract_size".to_string(),
            reason: "contract_size must be a positive finite number".to_string(),
        });
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    match config.get_string(SIMULATION, "seed") {
        Some(s) if s.trim().parse::<u64>().is_err() => Err(FxTraderError::ConfigInvalid {
            section: SIMULATION.to_string(),
            key: "seed".to_string(),
            reason: "seed must be a non-negative integer".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_policy(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    match config.get_string(SIMULATION, "policy") {
        Some(p) if !POLICIES.contains(&p.trim().to_lowercase().as_str()) => {
            Err(FxTraderError::ConfigInvalid {
                section: SIMULATION.to_string(),
                key: "policy".to_string(),
                reason: format!("unknown policy '{}', expected random or model", p.trim()),
            })
        }
        _ => Ok(()),
    }
}

fn validate_ridge_alpha(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    let value = config.get_double(MODEL, "ridge_alpha", 1.0);
    if !value.is_finite() || value < 0.0 {
        return Err(FxTraderError::ConfigInvalid {
            section: MODEL.to_string(),
            key: "ridge_alpha".to_string(),
            reason: "ridge_alpha must be a non-negative finite number".to_string(),
        });
    }
    Ok(())
}

fn validate_test_fraction(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    let value = config.get_double(MODEL, "test_fraction", 0.2);
    if !(0.0..1.0).contains(&value) {
        return Err(FxTraderError::ConfigInvalid {
            section: MODEL.to_string(),
            key: "test_fraction".to_string(),
            reason: "test_fraction must be in [0, 1)".to_string(),
        });
    }
    Ok(())
}

fn validate_split_seed(config: &dyn ConfigPort) -> Result<(), FxTraderError> {
    match config.get_string(MODEL, "split_seed") {
        Some(s) if s.trim().parse::<u64>().is_err() => Err(FxTraderError::ConfigInvalid {
            section: MODEL.to_string(),
            key: "split_seed".to_string(),
            reason: "split_seed must be a non-negative integer".to_string(),
        }),
        _ => Ok(()),
    }
}
