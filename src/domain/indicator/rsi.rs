//! RSI (Relative Strength Index) with Wilder smoothing.
//!
//! Gains and losses of consecutive closes are smoothed exponentially with
//! alpha = 1/period, seeded from the first price change. A value is produced
//! once `period` price changes have been observed.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! Degenerate averages never divide by zero:
//! - avg_loss == 0, avg_gain > 0: 100
//! - avg_gain == 0, avg_loss > 0: 0
//! - both zero (flat price): 50

pub fn calculate_rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.is_empty() {
        return vec![None; values.len()];
    }

    let alpha = 1.0 / period as f64;
    let mut out = Vec::with_capacity(values.len());
    out.push(None);

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..values.len() {
        let change = values[i] - values[i - 1];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        if i == 1 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = avg_gain * (1.0 - alpha) + gain * alpha;
            avg_loss = avg_loss * (1.0 - alpha) + loss * alpha;
        }

        if i >= period {
            out.push(Some(rsi_from_averages(avg_gain, avg_loss)));
        } else {
            out.push(None);
        }
    }

    out
}

pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    match (avg_gain == 0.0, avg_loss == 0.0) {
        (true, true) => 50.0,
        (false, true) => 100.0,
        (true, false) => 0.0,
        (false, false) => 100.0 - (100.0 / (1.0 + avg_gain / avg_loss)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_single_value() {
        assert_eq!(calculate_rsi(&[100.0], 14), vec![None]);
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + (i % 5) as f64 * 2.0).collect();
        let series = calculate_rsi(&prices, 14);

        assert_eq!(series.len(), 15);
        for (i, point) in series.iter().enumerate().take(14) {
            assert!(point.is_none(), "sample {} should have no value", i);
        }
        assert!(series[14].is_some());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&prices, 14);
        assert_eq!(series[14], Some(100.0));
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&prices, 14);
        assert_eq!(series[14], Some(0.0));
    }

    #[test]
    fn rsi_flat_price_is_50() {
        let series = calculate_rsi(&[100.0; 20], 14);
        for point in series.iter().skip(14) {
            assert_eq!(*point, Some(50.0));
        }
    }

    #[test]
    fn rsi_known_smoothing() {
        // period 2 → alpha 0.5
        // change +1: gain 1, loss 0 (seed)
        // change +1: gain 1.0, loss 0.0 → 100
        // change -1: gain 0.5, loss 0.5 → 50
        let series = calculate_rsi(&[1.0, 2.0, 3.0, 2.0], 2);
        assert_eq!(series[0], None);
        assert_eq!(series[1], None);
        assert_eq!(series[2], Some(100.0));
        assert_eq!(series[3], Some(50.0));
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=60)
            .map(|i| 100.0 + ((i % 7) as f64 - 3.0) * 2.0)
            .collect();
        for value in calculate_rsi(&prices, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value), "RSI {} out of range", value);
            assert!(value.is_finite());
        }
    }

    #[test]
    fn rsi_zero_period() {
        assert_eq!(calculate_rsi(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn averages_policy() {
        assert_eq!(rsi_from_averages(0.0, 0.0), 50.0);
        assert_eq!(rsi_from_averages(1.0, 0.0), 100.0);
        assert_eq!(rsi_from_averages(0.0, 1.0), 0.0);
        assert!((rsi_from_averages(1.0, 1.0) - 50.0).abs() < f64::EPSILON);
        assert!((rsi_from_averages(3.0, 1.0) - 75.0).abs() < 1e-12);
    }
}
