#![allow(dead_code)]

use fxtrader::domain::error::FxTraderError;
use fxtrader::domain::matcher::TradeRecord;
use fxtrader::domain::sample::Sample;
use fxtrader::ports::data_port::PriceSource;
use fxtrader::ports::results_port::ResultsSink;
use std::fs;
use std::path::{Path, PathBuf};

pub struct MockPriceSource {
    pub samples: Vec<Sample>,
}

impl MockPriceSource {
    pub fn from_prices(prices: &[f64]) -> Self {
        Self {
            samples: fxtrader::domain::sample::indexed_samples(prices),
        }
    }
}

impl PriceSource for MockPriceSource {
    fn load_samples(&self) -> Result<Vec<Sample>, FxTraderError> {
        Ok(self.samples.clone())
    }
}

#[derive(Default)]
pub struct MemoryResults {
    pub trades: Option<Vec<TradeRecord>>,
}

impl ResultsSink for MemoryResults {
    fn write_trades(&mut self, trades: &[TradeRecord]) -> Result<(), FxTraderError> {
        self.trades = Some(trades.to_vec());
        Ok(())
    }
}

pub fn started_at() -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn write_price_csv(dir: &Path, name: &str, prices: &[f64]) -> PathBuf {
    let mut content = String::from("timestamp,price\n");
    for (i, p) in prices.iter().enumerate() {
        content.push_str(&format!("2024-01-{:02} 00:00,{}\n", i + 1, p));
    }
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Rows where Rate = 0.5*SMA3 + 0.3*SMA5 + 0.2*SMA15 + 0.01.
pub fn write_training_csv(dir: &Path, name: &str, rows: usize) -> PathBuf {
    let mut content = String::from("SMA3,SMA5,SMA15,Rate\n");
    for i in 0..rows {
        let sma3 = 3.60 + (i % 7) as f64 * 0.01;
        let sma5 = 3.61 + (i % 5) as f64 * 0.012;
        let sma15 = 3.62 + (i % 3) as f64 * 0.015;
        let rate = 0.5 * sma3 + 0.3 * sma5 + 0.2 * sma15 + 0.01;
        content.push_str(&format!("{},{},{},{}\n", sma3, sma5, sma15, rate));
    }
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Parse `<ts> - Trade closed. P&L: <profit>, Balance: <balance>` lines.
pub fn trade_lines(log: &str) -> Vec<(String, f64, f64)> {
    log.lines()
        .filter(|l| l.contains(" - Trade closed. "))
        .map(|l| {
            let (ts, rest) = l.split_once(" - Trade closed. P&L: ").unwrap();
            let (profit, balance) = rest.split_once(", Balance: ").unwrap();
            (
                ts.to_string(),
                profit.parse().unwrap(),
                balance.parse().unwrap(),
            )
        })
        .collect()
}
