//! INI file configuration adapter.

use crate::domain::error::FxTraderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

/// INI-backed configuration. Command-line flags are layered on top with
/// [`FileConfigAdapter::set_override`].
#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FxTraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| FxTraderError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// Replace a value (or add it) after loading. `None` leaves the file value alone.
    pub fn set_override(&mut self, section: &str, key: &str, value: Option<String>) {
        if value.is_some() {
            self.config.set(section, key, value);
        }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_INI: &str = r#"
[simulation]
data_dir = ./models
notional = 1000000
profit_target = 10000000
stop_loss = -1000000
contract_size = 1000
log_file = trading_log.txt
seed = 42
policy = random

[model]
training_file = forex_data.csv
ridge_alpha = 0.5
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE_INI).unwrap();
        assert_eq!(
            adapter.get_string("simulation", "data_dir"),
            Some("./models".to_string())
        );
        assert_eq!(
            adapter.get_string("model", "training_file"),
            Some("forex_data.csv".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string(SAMPLE_INI).unwrap();
        assert_eq!(adapter.get_string("simulation", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_reads_seed() {
        let adapter = FileConfigAdapter::from_string(SAMPLE_INI).unwrap();
        assert_eq!(adapter.get_int("simulation", "seed", 0), 42);
        assert_eq!(adapter.get_int("simulation", "missing", 7), 7);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[simulation]\nseed = abc\n").unwrap();
        assert_eq!(adapter.get_int("simulation", "seed", 42), 42);
    }

    #[test]
    fn get_double_reads_negative_values() {
        let adapter = FileConfigAdapter::from_string(SAMPLE_INI).unwrap();
        assert_eq!(
            adapter.get_double("simulation", "stop_loss", 0.0),
            -1_000_000.0
        );
        assert_eq!(adapter.get_double("model", "ridge_alpha", 1.0), 0.5);
    }

    #[test]
    fn get_double_returns_default_for_missing_or_invalid() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\nnotional = lots\n").unwrap();
        assert_eq!(adapter.get_double("simulation", "notional", 99.9), 99.9);
        assert_eq!(adapter.get_double("simulation", "missing", 1.5), 1.5);
    }

    #[test]
    fn get_bool_parses_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[simulation]\na = true\nb = yes\nc = 0\nd = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("simulation", "a", false));
        assert!(adapter.get_bool("simulation", "b", false));
        assert!(!adapter.get_bool("simulation", "c", true));
        assert!(adapter.get_bool("simulation", "d", true));
        assert!(!adapter.get_bool("simulation", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(SAMPLE_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("simulation", "log_file"),
            Some("trading_log.txt".to_string())
        );
    }

    #[test]
    fn from_file_returns_config_parse_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(
            matches!(err, FxTraderError::ConfigParse { file, .. } if file.ends_with("config.ini"))
        );
    }

    #[test]
    fn override_replaces_file_value() {
        let mut adapter = FileConfigAdapter::from_string(SAMPLE_INI).unwrap();
        adapter.set_override("simulation", "data_dir", Some("/tmp/fx".to_string()));
        adapter.set_override("simulation", "policy", None);
        adapter.set_override("simulation", "results_file", Some("out.csv".to_string()));
        assert_eq!(
            adapter.get_string("simulation", "data_dir"),
            Some("/tmp/fx".to_string())
        );
        assert_eq!(
            adapter.get_string("simulation", "policy"),
            Some("random".to_string())
        );
        assert_eq!(
            adapter.get_string("simulation", "results_file"),
            Some("out.csv".to_string())
        );
    }
}
