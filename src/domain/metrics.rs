//! Performance metrics and run summary.
//!
//! Every function here is total: empty or degenerate input yields a defined
//! sentinel (0.0, `None`, or [`ProfitFactor::Infinite`]) rather than NaN.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use super::backtest::BacktestResult;
use super::candle::Candle;
use super::portfolio::EquityPoint;
use super::position::{Trade, round_to};

/// Largest peak-to-trough decline in percent, as a value <= 0.
///
/// Points are only measured against a positive running peak; a curve that
/// never rises above zero has no drawdown.
pub fn max_drawdown_pct(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        peak = peak.max(point.eq);
        if peak > 0.0 {
            let dd = (point.eq / peak - 1.0) * 100.0;
            max_dd = max_dd.min(dd);
        }
    }

    max_dd
}

/// Gross profit over gross loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitFactor {
    Ratio(f64),
    /// Winners and no losers.
    Infinite,
}

impl Serialize for ProfitFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProfitFactor::Ratio(value) => serializer.serialize_f64(round_to(*value, 2)),
            ProfitFactor::Infinite => serializer.serialize_str("inf"),
        }
    }
}

/// `Ratio(0.0)` means no winners and no losers.
pub fn profit_factor(trades: &[Trade]) -> ProfitFactor {
    let gross_win: f64 = trades.iter().map(|t| t.pnl.max(0.0)).sum();
    let gross_loss: f64 = trades.iter().map(|t| t.pnl.min(0.0)).sum();

    if gross_loss == 0.0 {
        if gross_win > 0.0 {
            ProfitFactor::Infinite
        } else {
            ProfitFactor::Ratio(0.0)
        }
    } else {
        ProfitFactor::Ratio(gross_win / gross_loss.abs())
    }
}

/// Whether break-even trades count toward the win-rate denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakevenPolicy {
    #[default]
    Count,
    Exclude,
}

/// Winning trades as a percentage; `None` with nothing to divide by.
pub fn win_rate_pct(trades: &[Trade], policy: BreakevenPolicy) -> Option<f64> {
    let tally = TradeTally::from_trades(trades);
    let denom = match policy {
        BreakevenPolicy::Count => tally.total(),
        BreakevenPolicy::Exclude => tally.won + tally.lost,
    };
    if denom == 0 {
        return None;
    }
    Some(tally.won as f64 / denom as f64 * 100.0)
}

/// Return of holding from the first close to the last.
pub fn buy_and_hold_return_pct(candles: &[Candle]) -> Option<f64> {
    let first = candles.first()?.close;
    let last = candles.last()?.close;
    if first <= 0.0 {
        return None;
    }
    Some((last / first - 1.0) * 100.0)
}

pub fn total_return_pct(initial_capital: f64, final_equity: f64) -> f64 {
    if initial_capital > 0.0 {
        (final_equity / initial_capital - 1.0) * 100.0
    } else {
        0.0
    }
}

/// Per-outcome trade counts and PnL extremes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TradeTally {
    pub won: usize,
    pub lost: usize,
    pub breakeven: usize,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl TradeTally {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut tally = TradeTally::default();
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;

        for trade in trades {
            let pnl = trade.pnl;
            if trade.is_win() {
                tally.won += 1;
                total_wins += pnl;
                tally.largest_win = tally.largest_win.max(pnl);
            } else if trade.is_loss() {
                tally.lost += 1;
                total_losses += pnl.abs();
                tally.largest_loss = tally.largest_loss.max(pnl.abs());
            } else {
                tally.breakeven += 1;
            }
        }

        if tally.won > 0 {
            tally.avg_win = total_wins / tally.won as f64;
        }
        if tally.lost > 0 {
            tally.avg_loss = total_losses / tally.lost as f64;
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.won + self.lost + self.breakeven
    }
}

/// Headline statistics for one run. Percentages are kept unrounded and
/// rounded to 2 decimals when serialised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub symbol: String,
    pub timeframe: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub initial_capital: f64,
    #[serde(serialize_with = "round2")]
    pub final_equity: f64,
    #[serde(serialize_with = "round2")]
    pub total_return_pct: f64,
    #[serde(serialize_with = "round2_opt")]
    pub buy_and_hold_return_pct: Option<f64>,
    #[serde(serialize_with = "round2")]
    pub max_drawdown_pct: f64,
    pub profit_factor: ProfitFactor,
    pub num_trades: usize,
    #[serde(serialize_with = "round2_opt")]
    pub win_rate_pct: Option<f64>,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    #[serde(serialize_with = "round2")]
    pub avg_win: f64,
    #[serde(serialize_with = "round2")]
    pub avg_loss: f64,
    #[serde(serialize_with = "round2")]
    pub largest_win: f64,
    #[serde(serialize_with = "round2")]
    pub largest_loss: f64,
}

impl Summary {
    /// `candles` is the series the engine ran on, after warm-up trimming.
    pub fn compute(
        symbol: &str,
        timeframe: &str,
        candles: &[Candle],
        initial_capital: f64,
        result: &BacktestResult,
        policy: BreakevenPolicy,
    ) -> Self {
        let tally = TradeTally::from_trades(&result.trades);

        Summary {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            start: candles.first().map(|c| c.t),
            end: candles.last().map(|c| c.t),
            initial_capital,
            final_equity: result.final_equity,
            total_return_pct: total_return_pct(initial_capital, result.final_equity),
            buy_and_hold_return_pct: buy_and_hold_return_pct(candles),
            max_drawdown_pct: max_drawdown_pct(&result.equity_curve),
            profit_factor: profit_factor(&result.trades),
            num_trades: result.trades.len(),
            win_rate_pct: win_rate_pct(&result.trades, policy),
            trades_won: tally.won,
            trades_lost: tally.lost,
            trades_breakeven: tally.breakeven,
            avg_win: tally.avg_win,
            avg_loss: tally.avg_loss,
            largest_win: tally.largest_win,
            largest_loss: tally.largest_loss,
        }
    }
}

fn round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 2))
}

fn round2_opt<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_some(&round_to(*v, 2)),
        None => serializer.serialize_none(),
    }
}
