//! Destination for the completed trade collection.

use crate::domain::error::FxTraderError;
use crate::domain::matcher::TradeRecord;

pub trait ResultsSink {
    fn write_trades(&mut self, trades: &[TradeRecord]) -> Result<(), FxTraderError>;
}
