//! Candle (OHLCV bar) representation.

use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub t: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// True when every OHLC field is finite and low <= open, close <= high.
    pub fn is_well_formed(&self) -> bool {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        fields.iter().all(|v| v.is_finite())
            && self.low <= self.high
            && (self.low..=self.high).contains(&self.open)
            && (self.low..=self.high).contains(&self.close)
    }
}

/// Extract closing prices, in order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_candle() -> Candle {
        Candle {
            t: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn well_formed_candle() {
        assert!(sample_candle().is_well_formed());
    }

    #[test]
    fn close_above_high_is_malformed() {
        let mut candle = sample_candle();
        candle.close = 111.0;
        assert!(!candle.is_well_formed());
    }

    #[test]
    fn nan_field_is_malformed() {
        let mut candle = sample_candle();
        candle.volume = f64::NAN;
        assert!(!candle.is_well_formed());
    }

    #[test]
    fn closes_in_order() {
        let mut second = sample_candle();
        second.close = 107.0;
        assert_eq!(closes(&[sample_candle(), second]), vec![105.0, 107.0]);
    }
}
