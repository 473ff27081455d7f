//! Domain error types.

/// Top-level error type for fxtrader.
#[derive(Debug, thiserror::Error)]
pub enum FxTraderError {
    #[error("data source error in {path}: {reason}")]
    DataSource { path: String, reason: String },

    #[error("invalid input: {reason} (expected PAIR,Open,High,Low,Close)")]
    InputFormat { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("model error: {reason}")]
    Model { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FxTraderError> for std::process::ExitCode {
    fn from(err: &FxTraderError) -> Self {
        let code: u8 = match err {
            FxTraderError::Io(_) | FxTraderError::Csv(_) => 1,
            FxTraderError::ConfigParse { .. }
            | FxTraderError::ConfigMissing { .. }
            | FxTraderError::ConfigInvalid { .. } => 2,
            FxTraderError::DataSource { .. } => 3,
            FxTraderError::InputFormat { .. } => 4,
            FxTraderError::Model { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
