//! Domain error types.

/// Top-level error type for candlebt.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unsupported strategy type: {tag}")]
    UnknownStrategy { tag: String },

    #[error("no data for {symbol} ({timeframe})")]
    NoData { symbol: String, timeframe: String },

    #[error("no data: candle sequence is empty")]
    EmptyInput,

    #[error("misaligned input: {candles} candles but {signals} signals")]
    MisalignedInput { candles: usize, signals: usize },

    #[error("data error: {reason}")]
    DataParse { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BacktestError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        BacktestError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        BacktestError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&BacktestError> for std::process::ExitCode {
    fn from(err: &BacktestError) -> Self {
        let code: u8 = match err {
            BacktestError::Io(_) => 1,
            BacktestError::ConfigParse { .. }
            | BacktestError::ConfigMissing { .. }
            | BacktestError::ConfigInvalid { .. }
            | BacktestError::UnknownStrategy { .. } => 2,
            BacktestError::NoData { .. } | BacktestError::DataParse { .. } => 5,
            BacktestError::EmptyInput | BacktestError::MisalignedInput { .. } => 6,
            BacktestError::Report { .. } => 7,
        };
        std::process::ExitCode::from(code)
    }
}
