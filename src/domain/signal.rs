//! Per-bar directional signals and the candle/signal pairing fed to the engine.

use serde::Serialize;

use super::candle::Candle;
use super::error::BacktestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "i8")]
pub enum Signal {
    Bearish,
    #[default]
    Neutral,
    Bullish,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Bearish => -1,
            Signal::Neutral => 0,
            Signal::Bullish => 1,
        }
    }

    /// Maps any negative value to bearish and any positive value to bullish.
    pub fn from_i8(value: i8) -> Self {
        match value.signum() {
            -1 => Signal::Bearish,
            1 => Signal::Bullish,
            _ => Signal::Neutral,
        }
    }

    /// Signal from a pair of cross conditions evaluated on the same bar.
    pub fn from_crosses(up: bool, down: bool) -> Self {
        match (up, down) {
            (true, false) => Signal::Bullish,
            (false, true) => Signal::Bearish,
            _ => Signal::Neutral,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Signal::Neutral
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.as_i8()
    }
}

/// Candles paired 1:1 with signals. Construction checks the alignment, so any
/// `SignalSeries` handed to the engine is aligned by type.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    candles: Vec<Candle>,
    signals: Vec<Signal>,
}

impl SignalSeries {
    pub fn new(candles: Vec<Candle>, signals: Vec<Signal>) -> Result<Self, BacktestError> {
        if candles.len() != signals.len() {
            return Err(BacktestError::MisalignedInput {
                candles: candles.len(),
                signals: signals.len(),
            });
        }
        Ok(Self { candles, signals })
    }

    /// Keep rows from `first` onward, dropping the warm-up prefix from both
    /// columns together.
    pub(crate) fn from_tail(candles: &[Candle], signals: Vec<Signal>, first: usize) -> Self {
        let first = first.min(candles.len());
        Self {
            candles: candles[first..].to_vec(),
            signals: signals.into_iter().skip(first).collect(),
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Count of non-neutral signals.
    pub fn active_count(&self) -> usize {
        self.signals.iter().filter(|s| !s.is_neutral()).count()
    }
}
