//! Configuration access port trait.

use crate::domain::error::BacktestError;

/// Keyed access to `[section] key = value` configuration.
///
/// Typed getters fall back to the default when a key is absent or empty and
/// return [`BacktestError::ConfigInvalid`] when it is present but malformed.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, BacktestError>;
    fn get_optional_double(&self, section: &str, key: &str)
    -> Result<Option<f64>, BacktestError>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, BacktestError>;

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, BacktestError> {
        Ok(self.get_optional_double(section, key)?.unwrap_or(default))
    }
}
