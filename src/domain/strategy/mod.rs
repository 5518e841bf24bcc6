//! Strategy signal generators.
//!
//! A strategy turns a candle sequence into a [`SignalSeries`]. Rows without
//! a defined indicator value are dropped from the front, so the returned
//! candles may be shorter than the input but are always aligned with the
//! signals.

pub mod ma_cross;
pub mod macd_trend;
pub mod rsi_threshold;

pub use ma_cross::MaCrossParams;
pub use macd_trend::MacdParams;
pub use rsi_threshold::RsiThresholdParams;

use std::fmt;
use std::str::FromStr;

use super::candle::Candle;
use super::error::BacktestError;
use super::indicator::IndicatorType;
use super::signal::SignalSeries;

/// Strategy tag as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyTag {
    MaCross,
    RsiThreshold,
    Macd,
}

impl StrategyTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyTag::MaCross => "MA_CROSS",
            StrategyTag::RsiThreshold => "RSI_THRESHOLD",
            StrategyTag::Macd => "MACD",
        }
    }
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyTag {
    type Err = BacktestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MA_CROSS" => Ok(StrategyTag::MaCross),
            "RSI_THRESHOLD" => Ok(StrategyTag::RsiThreshold),
            "MACD" => Ok(StrategyTag::Macd),
            _ => Err(BacktestError::UnknownStrategy { tag: s.to_string() }),
        }
    }
}

/// A strategy together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyKind {
    MaCross(MaCrossParams),
    RsiThreshold(RsiThresholdParams),
    Macd(MacdParams),
}

impl StrategyKind {
    pub fn tag(&self) -> StrategyTag {
        match self {
            StrategyKind::MaCross(_) => StrategyTag::MaCross,
            StrategyKind::RsiThreshold(_) => StrategyTag::RsiThreshold,
            StrategyKind::Macd(_) => StrategyTag::Macd,
        }
    }

    /// Default parameters for a tag.
    pub fn with_defaults(tag: StrategyTag) -> Self {
        match tag {
            StrategyTag::MaCross => StrategyKind::MaCross(MaCrossParams::default()),
            StrategyTag::RsiThreshold => {
                StrategyKind::RsiThreshold(RsiThresholdParams::default())
            }
            StrategyTag::Macd => StrategyKind::Macd(MacdParams::default()),
        }
    }

    pub fn validate(&self) -> Result<(), BacktestError> {
        match self {
            StrategyKind::MaCross(p) => p.validate(),
            StrategyKind::RsiThreshold(p) => p.validate(),
            StrategyKind::Macd(p) => p.validate(),
        }
    }

    pub fn indicators(&self) -> Vec<IndicatorType> {
        match self {
            StrategyKind::MaCross(p) => p.indicators(),
            StrategyKind::RsiThreshold(p) => p.indicators(),
            StrategyKind::Macd(p) => p.indicators(),
        }
    }

    /// Generate the aligned signal series. Parameters must already be valid.
    pub fn produce(&self, candles: &[Candle]) -> SignalSeries {
        match self {
            StrategyKind::MaCross(p) => ma_cross::produce(candles, p),
            StrategyKind::RsiThreshold(p) => rsi_threshold::produce(candles, p),
            StrategyKind::Macd(p) => macd_trend::produce(candles, p),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indicators: Vec<String> = self.indicators().iter().map(|i| i.to_string()).collect();
        write!(f, "{} [{}]", self.tag(), indicators.join(", "))
    }
}

pub(crate) fn strategy_invalid(key: &str, reason: &str) -> BacktestError {
    BacktestError::invalid("strategy", key, reason)
}
