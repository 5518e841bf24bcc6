//! Exponential Moving Average.
//!
//! alpha = 2/(span+1), seeded with the first raw sample, then
//! EMA[i] = x[i]*alpha + EMA[i-1]*(1-alpha). No warm-up gap.

pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let Some(&seed) = values.first() else {
        return out;
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut ema = seed;
    out.push(ema);

    for &value in &values[1..] {
        ema = value * alpha + ema * (1.0 - alpha);
        out.push(ema);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_seed_is_first_value() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 3);
        assert_eq!(series.len(), 3);
        assert!((series[0] - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&[10.0, 20.0, 30.0, 40.0], 3);
        let alpha = 2.0 / 4.0;

        let e1 = 20.0 * alpha + 10.0 * (1.0 - alpha);
        let e2 = 30.0 * alpha + e1 * (1.0 - alpha);
        let e3 = 40.0 * alpha + e2 * (1.0 - alpha);
        assert!((series[1] - e1).abs() < 1e-12);
        assert!((series[2] - e2).abs() < 1e-12);
        assert!((series[3] - e3).abs() < 1e-12);
    }

    #[test]
    fn ema_span_1_tracks_input() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 1);
        assert_eq!(series, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&[100.0; 6], 4);
        for v in series {
            assert!((v - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_empty() {
        assert!(calculate_ema(&[], 3).is_empty());
    }
}
