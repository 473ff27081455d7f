//! Plain-text audit log. Every line is flushed as soon as it is written, so
//! dropping the writer on any exit path leaves a complete file behind.

use crate::domain::error::FxTraderError;
use crate::domain::matcher::TradeRecord;
use crate::ports::audit_port::AuditLog;
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const STOP_LINE: &str = "Simulation stopped: target/stop-loss reached";
const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub struct AuditLogWriter<W: Write> {
    inner: W,
}

impl AuditLogWriter<File> {
    /// Create (or truncate) the log file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, FxTraderError> {
        Ok(Self {
            inner: File::create(path)?,
        })
    }
}

impl<W: Write> AuditLogWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn append(&mut self, line: &str) -> Result<(), FxTraderError> {
        writeln!(self.inner, "{}", line)?;
        self.inner.flush()?;
        Ok(())
    }
}

impl<W: Write> AuditLog for AuditLogWriter<W> {
    fn session_started(&mut self, at: NaiveDateTime, balance: f64) -> Result<(), FxTraderError> {
        self.append(&format!(
            "Random Trading Simulation Started at {}",
            at.format(START_TIME_FORMAT)
        ))?;
        self.append(&format!("Initial Balance: {}", balance))
    }

    fn trade_closed(&mut self, trade: &TradeRecord) -> Result<(), FxTraderError> {
        self.append(&format!(
            "{} - Trade closed. P&L: {}, Balance: {}",
            trade.timestamp, trade.profit, trade.balance_after
        ))
    }

    fn session_stopped(&mut self) -> Result<(), FxTraderError> {
        self.append(STOP_LINE)
    }
}
