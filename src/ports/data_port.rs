//! Data access port traits.

use crate::domain::error::FxTraderError;
use crate::domain::regression::TrainingRow;
use crate::domain::sample::Sample;

/// A finite, ordered, replayable price series.
pub trait PriceSource {
    fn load_samples(&self) -> Result<Vec<Sample>, FxTraderError>;
}

/// Labelled rows the predictor is fitted on.
pub trait TrainingSource {
    fn load_training_rows(&self) -> Result<Vec<TrainingRow>, FxTraderError>;
}
