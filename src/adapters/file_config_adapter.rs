//! INI file configuration adapter.

use crate::domain::error::BacktestError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BacktestError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| BacktestError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, BacktestError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| BacktestError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// Trimmed value, with an empty value treated as absent.
    fn value(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, BacktestError> {
        match self.value(section, key) {
            None => Ok(default),
            Some(v) => v.parse::<i64>().map_err(|_| {
                BacktestError::invalid(section, key, format!("expected an integer, got '{}'", v))
            }),
        }
    }

    fn get_optional_double(
        &self,
        section: &str,
        key: &str,
    ) -> Result<Option<f64>, BacktestError> {
        match self.value(section, key) {
            None => Ok(None),
            Some(v) => match v.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
                _ => Err(BacktestError::invalid(
                    section,
                    key,
                    format!("expected a number, got '{}'", v),
                )),
            },
        }
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, BacktestError> {
        match self.value(section, key) {
            None => Ok(default),
            Some(v) => Self::parse_bool(&v).ok_or_else(|| {
                BacktestError::invalid(section, key, format!("expected true/false, got '{}'", v))
            }),
        }
    }
}
