//! Technical indicator implementations.
//!
//! Every indicator is a pure function over a price sequence (normally the
//! closes) and returns one entry per input sample. Indicators with a warm-up
//! period report `None` until enough history exists.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdPoint};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl IndicatorType {
    /// Number of leading samples for which the indicator has no value.
    pub fn warmup(&self) -> usize {
        match *self {
            IndicatorType::Sma(period) => period.saturating_sub(1),
            IndicatorType::Rsi(period) => period,
            IndicatorType::Ema(_) | IndicatorType::Macd { .. } => 0,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

/// First index at which every listed indicator has a value.
pub fn first_defined_index(indicators: &[IndicatorType]) -> usize {
    indicators.iter().map(IndicatorType::warmup).max().unwrap_or(0)
}
