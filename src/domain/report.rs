//! Run report assembled for output.

use serde::Serialize;

use super::backtest::BacktestResult;
use super::metrics::Summary;
use super::portfolio::EquityPoint;
use super::position::Trade;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub summary: Summary,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl RunReport {
    /// Takes ownership of the engine output; the equity curve is thinned to
    /// at most `max_equity_points` (plus the true last point).
    pub fn new(summary: Summary, result: BacktestResult, max_equity_points: usize) -> Self {
        RunReport {
            summary,
            equity_curve: downsample_equity(&result.equity_curve, max_equity_points),
            trades: result.trades,
        }
    }
}

/// Keep every `ceil(len / max_points)`-th point, always ending on the last
/// point. Curves already within the limit are returned whole.
pub fn downsample_equity(curve: &[EquityPoint], max_points: usize) -> Vec<EquityPoint> {
    if max_points == 0 || curve.len() <= max_points {
        return curve.to_vec();
    }

    let step = curve.len().div_ceil(max_points);
    let mut sampled: Vec<EquityPoint> = curve.iter().step_by(step).cloned().collect();
    if (curve.len() - 1) % step != 0 {
        if let Some(last) = curve.last() {
            sampled.push(last.clone());
        }
    }
    sampled
}
