//! Trading session controller and event loop.
//!
//! A session replays samples one at a time: the policy picks an action,
//! opens go to the position book, closes are matched FIFO against it and
//! realized into the balance. Thresholds are checked only after a realized
//! close. The audit log receives the header before the first sample and one
//! line per close; the results sink receives the whole trade collection once
//! the session reaches a terminal state.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::error::FxTraderError;
use super::matcher::{match_position, TradeRecord, DEFAULT_CONTRACT_SIZE};
use super::policy::{Action, ActionPolicy};
use super::position::PositionBook;
use super::sample::Sample;
use crate::ports::audit_port::AuditLog;
use crate::ports::results_port::ResultsSink;

pub const DEFAULT_NOTIONAL: f64 = 1_000_000.0;
pub const DEFAULT_PROFIT_TARGET: f64 = 10_000_000.0;
pub const DEFAULT_STOP_LOSS: f64 = -1_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub notional: f64,
    pub profit_target: f64,
    pub stop_loss: f64,
    pub contract_size: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            notional: DEFAULT_NOTIONAL,
            profit_target: DEFAULT_PROFIT_TARGET,
            stop_loss: DEFAULT_STOP_LOSS,
            contract_size: DEFAULT_CONTRACT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ProfitTarget,
    StopLoss,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Stopped(StopReason),
}

impl SessionStatus {
    pub fn is_stopped(&self) -> bool {
        matches!(self, SessionStatus::Stopped(_))
    }
}

/// Mutable state of one session. Balance changes only through realized trades.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    balance: f64,
    book: PositionBook,
    trades: Vec<TradeRecord>,
    status: SessionStatus,
    samples_processed: usize,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session {
            balance: config.notional,
            config,
            book: PositionBook::new(),
            trades: Vec::new(),
            status: SessionStatus::Running,
            samples_processed: 0,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn book(&self) -> &PositionBook {
        &self.book
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn samples_processed(&self) -> usize {
        self.samples_processed
    }

    /// Apply one sample with an already chosen action.
    ///
    /// Returns the realized trade, if the action closed one. A stopped
    /// session ignores further samples.
    pub fn step(
        &mut self,
        sample: &Sample,
        action: Action,
        audit: &mut dyn AuditLog,
    ) -> Result<Option<TradeRecord>, FxTraderError> {
        if self.status.is_stopped() {
            return Ok(None);
        }
        self.samples_processed += 1;

        match action {
            Action::Open => {
                self.book.open(sample.price);
                Ok(None)
            }
            Action::Hold => Ok(None),
            Action::Close => {
                let Some(position) = self.book.close_oldest() else {
                    return Ok(None);
                };
                let record =
                    match_position(sample, position, self.balance, self.config.contract_size);
                self.balance = record.balance_after;
                self.trades.push(record.clone());
                audit.trade_closed(&record)?;
                debug!(
                    timestamp = %record.timestamp,
                    entry = record.entry_price,
                    exit = record.exit_price,
                    profit = record.profit,
                    balance = record.balance_after,
                    "trade closed"
                );

                if let Some(reason) = self.threshold_reached() {
                    self.status = SessionStatus::Stopped(reason);
                    audit.session_stopped()?;
                }
                Ok(Some(record))
            }
        }
    }

    fn threshold_reached(&self) -> Option<StopReason> {
        if self.balance >= self.config.profit_target {
            Some(StopReason::ProfitTarget)
        } else if self.balance <= self.config.stop_loss {
            Some(StopReason::StopLoss)
        } else {
            None
        }
    }

    /// Mark a still-running session as exhausted.
    pub fn finish(&mut self) -> StopReason {
        match self.status {
            SessionStatus::Stopped(reason) => reason,
            SessionStatus::Running => {
                self.status = SessionStatus::Stopped(StopReason::Exhausted);
                StopReason::Exhausted
            }
        }
    }

    pub fn into_outcome(mut self) -> SessionOutcome {
        let stop_reason = self.finish();
        SessionOutcome {
            stop_reason,
            final_balance: self.balance,
            samples_processed: self.samples_processed,
            open_positions: self.book.size(),
            trades: self.trades,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub stop_reason: StopReason,
    pub final_balance: f64,
    pub samples_processed: usize,
    pub open_positions: usize,
    pub trades: Vec<TradeRecord>,
}

/// Run a whole session over `samples`.
///
/// Any audit or results failure aborts the run; lines already appended to
/// the audit log stay there.
pub fn run_session(
    samples: &[Sample],
    policy: &mut dyn ActionPolicy,
    config: &SessionConfig,
    started_at: NaiveDateTime,
    audit: &mut dyn AuditLog,
    results: &mut dyn ResultsSink,
) -> Result<SessionOutcome, FxTraderError> {
    let mut session = Session::new(config.clone());
    audit.session_started(started_at, session.balance())?;

    for sample in samples {
        let action = policy.decide(sample);
        session.step(sample, action, audit)?;
        if session.status().is_stopped() {
            break;
        }
    }

    let outcome = session.into_outcome();
    results.write_trades(&outcome.trades)?;

    info!(
        reason = ?outcome.stop_reason,
        trades = outcome.trades.len(),
        processed = outcome.samples_processed,
        open_positions = outcome.open_positions,
        balance = outcome.final_balance,
        "session finished"
    );
    Ok(outcome)
}
