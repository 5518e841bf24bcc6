//! MACD cross gated by a long EMA trend filter.
//!
//! Bullish only on a MACD cross-up while the close is above the trend EMA;
//! bearish only on a cross-down while the close is below it. Crosses against
//! the trend are ignored.

use super::strategy_invalid;
use crate::domain::candle::{closes, Candle};
use crate::domain::error::BacktestError;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::{calculate_ema, calculate_macd, first_defined_index, IndicatorType};
use crate::domain::signal::{Signal, SignalSeries};

pub const DEFAULT_TREND: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
    pub trend: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        MacdParams {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
            trend: DEFAULT_TREND,
        }
    }
}

impl MacdParams {
    pub fn validate(&self) -> Result<(), BacktestError> {
        if self.fast == 0 {
            return Err(strategy_invalid("fast", "fast must be at least 1"));
        }
        if self.fast >= self.slow {
            return Err(strategy_invalid("fast", "fast must be less than slow"));
        }
        if self.signal == 0 {
            return Err(strategy_invalid("signal", "signal must be at least 1"));
        }
        if self.trend == 0 {
            return Err(strategy_invalid("trend", "trend must be at least 1"));
        }
        Ok(())
    }

    pub fn indicators(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::Macd {
                fast: self.fast,
                slow: self.slow,
                signal: self.signal,
            },
            IndicatorType::Ema(self.trend),
        ]
    }
}

pub fn produce(candles: &[Candle], params: &MacdParams) -> SignalSeries {
    let prices = closes(candles);
    let macd = calculate_macd(&prices, params.fast, params.slow, params.signal);
    let trend = calculate_ema(&prices, params.trend);

    let mut signals = vec![Signal::Neutral; candles.len()];
    for i in 1..candles.len() {
        let was_above = macd[i - 1].line > macd[i - 1].signal;
        let is_above = macd[i].line > macd[i].signal;
        let close = prices[i];

        let up = !was_above && is_above && close > trend[i];
        let down = was_above && !is_above && close < trend[i];
        signals[i] = Signal::from_crosses(up, down);
    }

    SignalSeries::from_tail(candles, signals, first_defined_index(&params.indicators()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::test_support::candles_from_closes;

    fn fast_params(trend: usize) -> MacdParams {
        MacdParams {
            fast: 2,
            slow: 4,
            signal: 2,
            trend,
        }
    }

    fn dip_then_rally() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        closes.extend((1..=10).map(|i| 91.0 + i as f64 * 3.0));
        closes
    }

    #[test]
    fn keeps_every_row() {
        let candles = candles_from_closes(&dip_then_rally());
        let series = produce(&candles, &fast_params(3));
        assert_eq!(series.len(), candles.len());
    }

    #[test]
    fn cross_up_in_uptrend_is_bullish() {
        let candles = candles_from_closes(&dip_then_rally());
        let series = produce(&candles, &fast_params(3));
        let bullish: Vec<usize> = series
            .signals()
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Signal::Bullish)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(bullish, vec![10]);
    }

    #[test]
    fn cross_up_below_trend_is_suppressed() {
        // a slow trend EMA seeded at 100 is still above the close at the cross
        let candles = candles_from_closes(&dip_then_rally());
        let gated = produce(&candles, &fast_params(1000));
        let ungated = produce(&candles, &fast_params(3));
        assert_eq!(ungated.signals()[10], Signal::Bullish);
        assert_eq!(gated.signals()[10], Signal::Neutral);
        assert_eq!(gated.active_count(), 0);
    }

    #[test]
    fn flat_prices_never_signal() {
        let series = produce(&candles_from_closes(&[100.0; 40]), &MacdParams::default());
        assert_eq!(series.active_count(), 0);
    }

    #[test]
    fn validation() {
        assert!(MacdParams::default().validate().is_ok());
        let inverted = MacdParams {
            fast: 26,
            slow: 12,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
        let equal = MacdParams {
            fast: 12,
            slow: 12,
            ..Default::default()
        };
        assert!(equal.validate().is_err());
        assert!(
            MacdParams {
                signal: 0,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
    }
}
