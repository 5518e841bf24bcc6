//! Moving-average cross.
//!
//! Bullish when SMA(short) moves from at-or-below SMA(long) to strictly
//! above it between the previous and current bar; bearish on the mirror
//! move. Both bars must have both averages defined.

use super::strategy_invalid;
use crate::domain::candle::{closes, Candle};
use crate::domain::error::BacktestError;
use crate::domain::indicator::{calculate_sma, first_defined_index, IndicatorType};
use crate::domain::signal::{Signal, SignalSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaCrossParams {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for MaCrossParams {
    fn default() -> Self {
        MaCrossParams {
            short_window: 20,
            long_window: 50,
        }
    }
}

impl MaCrossParams {
    pub fn validate(&self) -> Result<(), BacktestError> {
        if self.short_window == 0 {
            return Err(strategy_invalid("short_window", "short_window must be at least 1"));
        }
        if self.short_window >= self.long_window {
            return Err(strategy_invalid(
                "short_window",
                "short_window must be less than long_window",
            ));
        }
        Ok(())
    }

    pub fn indicators(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::Sma(self.short_window),
            IndicatorType::Sma(self.long_window),
        ]
    }
}

pub fn produce(candles: &[Candle], params: &MaCrossParams) -> SignalSeries {
    let prices = closes(candles);
    let short = calculate_sma(&prices, params.short_window);
    let long = calculate_sma(&prices, params.long_window);

    let mut signals = vec![Signal::Neutral; candles.len()];
    for i in 1..candles.len() {
        let (Some(prev_s), Some(prev_l), Some(cur_s), Some(cur_l)) =
            (short[i - 1], long[i - 1], short[i], long[i])
        else {
            continue;
        };
        let was_above = prev_s > prev_l;
        let is_above = cur_s > cur_l;
        signals[i] = Signal::from_crosses(!was_above && is_above, was_above && !is_above);
    }

    SignalSeries::from_tail(candles, signals, first_defined_index(&params.indicators()))
}
