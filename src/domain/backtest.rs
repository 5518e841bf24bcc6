//! Backtest engine and event loop.
//!
//! A single forward pass over candles and their aligned signals. Signal
//! driven entries and exits are deferred to the next bar's open; resting
//! stop-loss/take-profit orders fill intrabar at their threshold.

use log::debug;
use serde::Serialize;

use super::candle::Candle;
use super::error::BacktestError;
use super::execution::{ExecutionConfig, check_triggers, enter_position, exit_position};
use super::portfolio::{EquityPoint, Portfolio};
use super::position::{ExitReason, Side, Trade};
use super::signal::{Signal, SignalSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Fraction of cash committed per entry, in (0, 1].
    pub position_pct: f64,
    pub fee_pct: f64,
    pub slippage_pct: f64,
    pub allow_short: bool,
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 10_000.0,
            position_pct: 1.0,
            fee_pct: 0.001,
            slippage_pct: 0.0,
            allow_short: false,
            stop_loss_pct: None,
            take_profit_pct: None,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), BacktestError> {
        if !(self.initial_capital > 0.0) || !self.initial_capital.is_finite() {
            return Err(BacktestError::invalid(
                "capital",
                "initial",
                "must be a positive number",
            ));
        }
        if !(self.position_pct > 0.0 && self.position_pct <= 1.0) {
            return Err(BacktestError::invalid(
                "capital",
                "position_pct",
                "must be in (0, 1]",
            ));
        }
        if !(self.fee_pct >= 0.0) {
            return Err(BacktestError::invalid("capital", "fee_pct", "must be >= 0"));
        }
        if !(self.slippage_pct >= 0.0) {
            return Err(BacktestError::invalid(
                "backtest",
                "slippage_pct",
                "must be >= 0",
            ));
        }
        if let Some(pct) = self.stop_loss_pct {
            if !(pct > 0.0 && pct < 1.0) {
                return Err(BacktestError::invalid(
                    "backtest",
                    "stop_loss_pct",
                    "must be in (0, 1)",
                ));
            }
        }
        if let Some(pct) = self.take_profit_pct {
            if !(pct > 0.0) || !pct.is_finite() {
                return Err(BacktestError::invalid(
                    "backtest",
                    "take_profit_pct",
                    "must be > 0",
                ));
            }
        }
        Ok(())
    }

    pub fn execution(&self) -> ExecutionConfig {
        ExecutionConfig {
            position_pct: self.position_pct,
            fee_pct: self.fee_pct,
            slippage_pct: self.slippage_pct,
        }
    }

    fn permits(&self, side: Side) -> bool {
        side == Side::Long || self.allow_short
    }
}

/// Engine output: full-resolution, one equity point per input candle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub final_equity: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

/// Orders scheduled on one bar for the next bar's open.
#[derive(Debug, Default)]
struct PendingOrders {
    enter: Option<Side>,
    exit: bool,
}

/// Run the engine over an aligned series.
pub fn run_series(
    series: &SignalSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    run_backtest(series.candles(), series.signals(), config)
}

/// Simulate `signals` against `candles`. The config is assumed valid.
pub fn run_backtest(
    candles: &[Candle],
    signals: &[Signal],
    config: &BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    if candles.is_empty() {
        return Err(BacktestError::EmptyInput);
    }
    if candles.len() != signals.len() {
        return Err(BacktestError::MisalignedInput {
            candles: candles.len(),
            signals: signals.len(),
        });
    }

    let exec = config.execution();
    let mut portfolio = Portfolio::new(config.initial_capital);
    let mut pending = PendingOrders::default();

    for (candle, &signal) in candles.iter().zip(signals) {
        if std::mem::take(&mut pending.exit) {
            exit_position(
                &mut portfolio,
                candle.open,
                candle.t,
                ExitReason::SignalChange,
                &exec,
            );
        }

        if portfolio.is_flat() {
            if let Some(side) = pending.enter.take() {
                if config.permits(side) {
                    enter_position(&mut portfolio, side, candle.open, candle.t, &exec);
                } else {
                    debug!("dropping {:?} entry at {}: shorting disabled", side, candle.t);
                }
            }
        }

        let triggered = portfolio.position.as_ref().and_then(|position| {
            check_triggers(
                position,
                candle.high,
                candle.low,
                config.stop_loss_pct,
                config.take_profit_pct,
            )
        });
        if let Some(hit) = triggered {
            exit_position(&mut portfolio, hit.price, candle.t, hit.reason, &exec);
            portfolio.mark_to_market(candle.t, candle.close);
            continue;
        }

        let wanted = Side::from_signal(signal);
        match portfolio.position.as_ref().map(|position| position.side) {
            Some(held) => {
                if wanted == Some(held.opposite()) {
                    pending.exit = true;
                    pending.enter = Some(held.opposite()).filter(|&side| config.permits(side));
                }
            }
            None => {
                if let Some(side) = wanted.filter(|&side| config.permits(side)) {
                    pending.enter = Some(side);
                }
            }
        }

        portfolio.mark_to_market(candle.t, candle.close);
    }

    if let Some(last) = candles.last() {
        if exit_position(&mut portfolio, last.close, last.t, ExitReason::End, &exec).is_some() {
            portfolio.restate_last_equity();
        }
    }

    debug!(
        "backtest complete: {} bars, {} trades, final equity {:.2}",
        candles.len(),
        portfolio.trades.len(),
        portfolio.cash
    );

    Ok(BacktestResult {
        final_equity: portfolio.cash,
        trades: portfolio.trades,
        equity_curve: portfolio.equity_curve,
    })
}
