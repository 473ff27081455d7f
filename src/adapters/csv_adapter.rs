//! CSV price series, training set and results adapters.

use crate::domain::error::FxTraderError;
use crate::domain::matcher::TradeRecord;
use crate::domain::regression::TrainingRow;
use crate::domain::sample::Sample;
use crate::domain::signal::Features;
use crate::ports::data_port::{PriceSource, TrainingSource};
use crate::ports::results_port::ResultsSink;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const PRICE_COLUMN: &str = "price";
pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const TRAINING_COLUMNS: [&str; 4] = ["SMA3", "SMA5", "SMA15", "Rate"];
pub const RESULTS_HEADER: [&str; 5] = ["timestamp", "entry", "exit", "profit", "balance"];

/// Reads a single CSV file with a header row. Columns are located by name.
pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn error(&self, reason: impl Into<String>) -> FxTraderError {
        FxTraderError::DataSource {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    fn open(&self) -> Result<(csv::Reader<File>, csv::StringRecord), FxTraderError> {
        let mut rdr = csv::Reader::from_path(&self.path)
            .map_err(|e| self.error(format!("failed to open: {}", e)))?;
        let headers = rdr
            .headers()
            .map_err(|e| self.error(format!("CSV parse error: {}", e)))?
            .clone();
        Ok((rdr, headers))
    }

    fn column(&self, headers: &csv::StringRecord, name: &str) -> Option<usize> {
        headers.iter().position(|h| h.trim() == name)
    }

    fn required_column(
        &self,
        headers: &csv::StringRecord,
        name: &str,
    ) -> Result<usize, FxTraderError> {
        self.column(headers, name)
            .ok_or_else(|| self.error(format!("missing {} column", name)))
    }

    fn parse_field(
        &self,
        record: &csv::StringRecord,
        idx: usize,
        name: &str,
        row: usize,
    ) -> Result<f64, FxTraderError> {
        let raw = record
            .get(idx)
            .ok_or_else(|| self.error(format!("row {}: missing {} value", row, name)))?;
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|e| self.error(format!("row {}: invalid {} value '{}': {}", row, name, raw, e)))?;
        if !value.is_finite() {
            return Err(self.error(format!(
                "row {}: {} must be a finite number, got '{}'",
                row, name, raw
            )));
        }
        Ok(value)
    }
}

impl PriceSource for CsvAdapter {
    fn load_samples(&self) -> Result<Vec<Sample>, FxTraderError> {
        let (mut rdr, headers) = self.open()?;
        let price_idx = self.required_column(&headers, PRICE_COLUMN)?;
        let timestamp_idx = self.column(&headers, TIMESTAMP_COLUMN);

        let mut samples = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.error(format!("CSV parse error: {}", e)))?;
            let price = self.parse_field(&record, price_idx, PRICE_COLUMN, i)?;
            let timestamp = match timestamp_idx.and_then(|idx| record.get(idx)) {
                Some(ts) => ts.to_string(),
                None => i.to_string(),
            };
            samples.push(Sample { timestamp, price });
        }
        Ok(samples)
    }
}

impl TrainingSource for CsvAdapter {
    fn load_training_rows(&self) -> Result<Vec<TrainingRow>, FxTraderError> {
        let (mut rdr, headers) = self.open()?;
        let mut idx = [0usize; 4];
        for (slot, name) in idx.iter_mut().zip(TRAINING_COLUMNS) {
            *slot = self.required_column(&headers, name)?;
        }

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.error(format!("CSV parse error: {}", e)))?;
            rows.push(TrainingRow {
                features: Features {
                    sma3: self.parse_field(&record, idx[0], TRAINING_COLUMNS[0], i)?,
                    sma5: self.parse_field(&record, idx[1], TRAINING_COLUMNS[1], i)?,
                    sma15: self.parse_field(&record, idx[2], TRAINING_COLUMNS[2], i)?,
                },
                rate: self.parse_field(&record, idx[3], TRAINING_COLUMNS[3], i)?,
            });
        }
        Ok(rows)
    }
}

/// Writes the trade collection as `timestamp,entry,exit,profit,balance`.
/// The header is written even when there are no trades.
pub struct CsvResultsWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvResultsWriter<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, FxTraderError> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: Write> CsvResultsWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    pub fn into_inner(self) -> Result<W, FxTraderError> {
        self.writer
            .into_inner()
            .map_err(|e| FxTraderError::Io(e.into_error()))
    }
}

impl<W: Write> ResultsSink for CsvResultsWriter<W> {
    fn write_trades(&mut self, trades: &[TradeRecord]) -> Result<(), FxTraderError> {
        self.writer.write_record(RESULTS_HEADER)?;
        for t in trades {
            self.writer.write_record([
                t.timestamp.clone(),
                t.entry_price.to_string(),
                t.exit_price.to_string(),
                t.profit.to_string(),
                t.balance_after.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_samples_with_timestamps() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "forex_data.csv",
            "timestamp,price\n2024-01-15 09:00,81.26\n2024-01-15 10:00,81.30\n",
        );
        let samples = CsvAdapter::new(path).load_samples().unwrap();
        assert_eq!(
            samples,
            vec![
                Sample::new("2024-01-15 09:00", 81.26),
                Sample::new("2024-01-15 10:00", 81.30),
            ]
        );
    }

    #[test]
    fn load_samples_uses_index_without_timestamp_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.csv", "pair,price\nUSD-AED,1.5\nUSD-AED,1.6\nUSD-AED,1.4\n");
        let samples = CsvAdapter::new(path).load_samples().unwrap();
        let stamps: Vec<&str> = samples.iter().map(|s| s.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["0", "1", "2"]);
        assert_eq!(samples[2].price, 1.4);
    }

    #[test]
    fn load_samples_preserves_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.csv", "timestamp,price\nb,3\na,1\nc,2\n");
        let samples = CsvAdapter::new(path).load_samples().unwrap();
        let prices: Vec<f64> = samples.iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn missing_price_column_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.csv", "timestamp,rate\n0,1.0\n");
        let err = CsvAdapter::new(path).load_samples().unwrap_err();
        match err {
            FxTraderError::DataSource { reason, .. } => assert!(reason.contains("price")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_price_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "p.csv", "price\n1.0\nn/a\n");
        let err = CsvAdapter::new(path).load_samples().unwrap_err();
        assert!(matches!(err, FxTraderError::DataSource { .. }));
    }

    #[test]
    fn non_finite_price_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        for value in ["NaN", "inf", "-infinity"] {
            let path = write_file(&dir, "p.csv", &format!("price\n1.0\n{}\n1.0\n", value));
            let err = CsvAdapter::new(path).load_samples().unwrap_err();
            match err {
                FxTraderError::DataSource { reason, .. } => {
                    assert!(reason.contains("row 1"), "{reason}");
                    assert!(reason.contains("finite"), "{reason}");
                }
                other => panic!("unexpected error for {value}: {other}"),
            }
        }
    }

    #[test]
    fn non_finite_training_value_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "t.csv", "SMA3,SMA5,SMA15,Rate\n1,2,3,4\n1,NaN,3,4\n");
        let err = CsvAdapter::new(path).load_training_rows().unwrap_err();
        match err {
            FxTraderError::DataSource { reason, .. } => assert!(reason.contains("SMA5")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let err = CsvAdapter::new(dir.path().join("absent.csv"))
            .load_samples()
            .unwrap_err();
        assert!(matches!(err, FxTraderError::DataSource { .. }));
    }

    #[test]
    fn load_training_rows_by_header_name() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "t.csv",
            "Pair,Rate,SMA15,SMA5,SMA3\nUSD-AED,3.67,3.60,3.62,3.65\n",
        );
        let rows = CsvAdapter::new(path).load_training_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rate, 3.67);
        assert_eq!(rows[0].features.sma3, 3.65);
        assert_eq!(rows[0].features.sma5, 3.62);
        assert_eq!(rows[0].features.sma15, 3.60);
    }

    #[test]
    fn training_rows_require_all_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "t.csv", "SMA3,SMA5,Rate\n1,2,3\n");
        let err = CsvAdapter::new(path).load_training_rows().unwrap_err();
        match err {
            FxTraderError::DataSource { reason, .. } => assert!(reason.contains("SMA15")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn results_writer_emits_header_and_rows() {
        let mut writer = CsvResultsWriter::from_writer(Vec::new());
        writer
            .write_trades(&[TradeRecord {
                timestamp: "2".into(),
                entry_price: 100.0,
                exit_price: 99.0,
                profit: -1000.0,
                balance_after: 999_000.0,
            }])
            .unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "timestamp,entry,exit,profit,balance\n2,100,99,-1000,999000\n");
    }

    #[test]
    fn results_writer_header_only_without_trades() {
        let mut writer = CsvResultsWriter::from_writer(Vec::new());
        writer.write_trades(&[]).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "timestamp,entry,exit,profit,balance\n");
    }
}
