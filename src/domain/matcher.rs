//! Trade matching: turns a closed position into a realized trade record.

use super::position::Position;
use super::sample::Sample;

pub const DEFAULT_CONTRACT_SIZE: f64 = 1000.0;

/// A realized round trip. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub timestamp: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub profit: f64,
    pub balance_after: f64,
}

impl TradeRecord {
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }
}

/// Match `position` against the price of `sample`.
///
/// profit = (exit - entry) * contract_size, and `balance_after` is
/// `balance_before + profit`. Neither the balance nor the book is touched
/// here; the session applies the result.
pub fn match_position(
    sample: &Sample,
    position: Position,
    balance_before: f64,
    contract_size: f64,
) -> TradeRecord {
    let profit = (sample.price - position.entry_price) * contract_size;
    TradeRecord {
        timestamp: sample.timestamp.clone(),
        entry_price: position.entry_price,
        exit_price: sample.price,
        profit,
        balance_after: balance_before + profit,
    }
}
