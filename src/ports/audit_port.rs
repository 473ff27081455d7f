//! Append-only audit trail for a trading session.

use chrono::NaiveDateTime;

use crate::domain::error::FxTraderError;
use crate::domain::matcher::TradeRecord;

pub trait AuditLog {
    fn session_started(&mut self, at: NaiveDateTime, balance: f64) -> Result<(), FxTraderError>;

    fn trade_closed(&mut self, trade: &TradeRecord) -> Result<(), FxTraderError>;

    /// Written only when a profit target or stop loss ends the session.
    fn session_stopped(&mut self) -> Result<(), FxTraderError>;
}
