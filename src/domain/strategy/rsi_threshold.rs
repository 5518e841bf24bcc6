//! RSI threshold crosses.
//!
//! Bullish when RSI moves from below `lower` to at-or-above it (leaving
//! oversold); bearish when RSI moves from above `upper` to at-or-below it
//! (leaving overbought).

use super::strategy_invalid;
use crate::domain::candle::{closes, Candle};
use crate::domain::error::BacktestError;
use crate::domain::indicator::{calculate_rsi, first_defined_index, IndicatorType};
use crate::domain::signal::{Signal, SignalSeries};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiThresholdParams {
    pub period: usize,
    pub lower: f64,
    pub upper: f64,
}

impl Default for RsiThresholdParams {
    fn default() -> Self {
        RsiThresholdParams {
            period: 14,
            lower: 30.0,
            upper: 70.0,
        }
    }
}

impl RsiThresholdParams {
    pub fn validate(&self) -> Result<(), BacktestError> {
        if self.period == 0 {
            return Err(strategy_invalid("period", "period must be at least 1"));
        }
        if !(0.0..=100.0).contains(&self.lower) || !(0.0..=100.0).contains(&self.upper) {
            return Err(strategy_invalid("lower", "thresholds must be within [0, 100]"));
        }
        if self.lower >= self.upper {
            return Err(strategy_invalid("lower", "lower must be less than upper"));
        }
        Ok(())
    }

    pub fn indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Rsi(self.period)]
    }
}

pub fn produce(candles: &[Candle], params: &RsiThresholdParams) -> SignalSeries {
    let rsi = calculate_rsi(&closes(candles), params.period);

    let mut signals = vec![Signal::Neutral; candles.len()];
    for i in 1..candles.len() {
        let (Some(prev), Some(cur)) = (rsi[i - 1], rsi[i]) else {
            continue;
        };
        let leaves_oversold = prev < params.lower && cur >= params.lower;
        let leaves_overbought = prev > params.upper && cur <= params.upper;
        signals[i] = Signal::from_crosses(leaves_oversold, leaves_overbought);
    }

    SignalSeries::from_tail(candles, signals, first_defined_index(&params.indicators()))
}
