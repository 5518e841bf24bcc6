//! Trade execution and fill simulation.
//!
//! Implements entry/exit fills with slippage, fractional sizing and fees.
//! Slippage and fees are fractions (0.001 = 0.1%). Slippage always moves the
//! fill against the trader.

use chrono::NaiveDateTime;
use log::debug;

use super::portfolio::Portfolio;
use super::position::{format_duration, ExitReason, Position, Side, Trade};

/// Cost and sizing parameters used by the fill model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionConfig {
    pub position_pct: f64,
    pub fee_pct: f64,
    pub slippage_pct: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            position_pct: 1.0,
            fee_pct: 0.0,
            slippage_pct: 0.0,
        }
    }
}

/// Fee on notional: price * |qty| * fee_pct.
pub fn calculate_fee(price: f64, qty: f64, fee_pct: f64) -> f64 {
    price * qty.abs() * fee_pct
}

/// Long entry (buy): price * (1 + slippage)
pub fn apply_slippage_long_entry(market_price: f64, slippage_pct: f64) -> f64 {
    market_price * (1.0 + slippage_pct)
}

/// Short entry (sell short): price * (1 - slippage)
pub fn apply_slippage_short_entry(market_price: f64, slippage_pct: f64) -> f64 {
    market_price * (1.0 - slippage_pct)
}

/// Long exit (sell): price * (1 - slippage)
pub fn apply_slippage_long_exit(market_price: f64, slippage_pct: f64) -> f64 {
    market_price * (1.0 - slippage_pct)
}

/// Short exit (buy to cover): price * (1 + slippage)
pub fn apply_slippage_short_exit(market_price: f64, slippage_pct: f64) -> f64 {
    market_price * (1.0 + slippage_pct)
}

pub fn entry_fill_price(side: Side, market_price: f64, slippage_pct: f64) -> f64 {
    match side {
        Side::Long => apply_slippage_long_entry(market_price, slippage_pct),
        Side::Short => apply_slippage_short_entry(market_price, slippage_pct),
    }
}

pub fn exit_fill_price(side: Side, market_price: f64, slippage_pct: f64) -> f64 {
    match side {
        Side::Long => apply_slippage_long_exit(market_price, slippage_pct),
        Side::Short => apply_slippage_short_exit(market_price, slippage_pct),
    }
}

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered {
        qty: f64,
        fill_price: f64,
        fee: f64,
    },
    InsufficientCapital,
}

/// Open a position at `market_price`.
///
/// Size is `cash * position_pct / fill_price`. The entry fee is taken from
/// cash now and never charged again. A short credits the sale proceeds to
/// cash; marking `cash + qty * price` then values the liability.
pub fn enter_position(
    portfolio: &mut Portfolio,
    side: Side,
    market_price: f64,
    time: NaiveDateTime,
    config: &ExecutionConfig,
) -> EntryResult {
    let fill_price = entry_fill_price(side, market_price, config.slippage_pct);
    let cash_to_use = portfolio.cash * config.position_pct;
    if cash_to_use <= 0.0 || fill_price <= 0.0 {
        return EntryResult::InsufficientCapital;
    }

    let qty = side.sign() * cash_to_use / fill_price;
    let fee = calculate_fee(fill_price, qty, config.fee_pct);
    portfolio.cash -= fill_price * qty + fee;

    let id = portfolio.next_trade_id();
    portfolio.open(Position {
        id,
        side,
        qty,
        entry_price: fill_price,
        entry_time: time,
    });
    debug!(
        "open #{} {:?} qty={:.6} @ {:.6} fee={:.6} at {}",
        id, side, qty, fill_price, fee, time
    );

    EntryResult::Entered {
        qty,
        fill_price,
        fee,
    }
}

/// Close the open position at `market_price` (before slippage).
///
/// PnL is `(fill - entry) * qty - exit_fee`; the entry fee was already paid
/// out of cash at entry. Returns `None` when flat.
pub fn exit_position(
    portfolio: &mut Portfolio,
    market_price: f64,
    time: NaiveDateTime,
    reason: ExitReason,
    config: &ExecutionConfig,
) -> Option<Trade> {
    let position = portfolio.take_position()?;

    let fill_price = exit_fill_price(position.side, market_price, config.slippage_pct);
    let fee = calculate_fee(fill_price, position.qty, config.fee_pct);
    portfolio.cash += fill_price * position.qty - fee;

    let pnl = (fill_price - position.entry_price) * position.qty - fee;
    let notional = position.entry_price * position.size();
    let return_pct = if notional > 0.0 {
        pnl / notional * 100.0
    } else {
        0.0
    };

    let trade = Trade {
        id: position.id,
        side: position.side,
        size: position.size(),
        entry_time: position.entry_time,
        entry_price: position.entry_price,
        exit_time: time,
        exit_price: fill_price,
        pnl,
        return_pct,
        duration: format_duration(position.entry_time, time),
        reason,
    };
    debug!(
        "close #{} {:?} @ {:.6} pnl={:.4} ({:?}) at {}",
        trade.id, trade.side, fill_price, pnl, reason, time
    );

    portfolio.record_trade(trade.clone());
    Some(trade)
}

/// Which resting exit order, if any, a bar fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggeredExit {
    pub price: f64,
    pub reason: ExitReason,
}

/// Evaluate stop-loss and take-profit against a bar's range.
///
/// Fills at the threshold price itself. When both are touched in the same
/// bar the stop-loss wins.
pub fn check_triggers(
    position: &Position,
    high: f64,
    low: f64,
    stop_loss_pct: Option<f64>,
    take_profit_pct: Option<f64>,
) -> Option<TriggeredExit> {
    let stop = stop_loss_pct
        .map(|pct| position.stop_loss_price(pct))
        .filter(|&price| position.stop_touched(price, high, low))
        .map(|price| TriggeredExit {
            price,
            reason: ExitReason::StopLoss,
        });

    stop.or_else(|| {
        take_profit_pct
            .map(|pct| position.take_profit_price(pct))
            .filter(|&price| position.target_touched(price, high, low))
            .map(|price| TriggeredExit {
                price,
                reason: ExitReason::TakeProfit,
            })
    })
}
