//! Account state and equity tracking for a single instrument.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::position::{Position, Trade};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub t: NaiveDateTime,
    pub eq: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    last_trade_id: u64,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            position: None,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            last_trade_id: 0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    pub fn next_trade_id(&mut self) -> u64 {
        self.last_trade_id += 1;
        self.last_trade_id
    }

    pub fn open(&mut self, position: Position) {
        self.position = Some(position);
    }

    pub fn take_position(&mut self) -> Option<Position> {
        self.position.take()
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    /// Cash plus the signed value of any open position at `price`.
    pub fn total_equity(&self, price: f64) -> f64 {
        let position_value = self
            .position
            .as_ref()
            .map(|pos| pos.market_value(price))
            .unwrap_or(0.0);
        self.cash + position_value
    }

    pub fn mark_to_market(&mut self, t: NaiveDateTime, close: f64) {
        let eq = self.total_equity(close);
        self.equity_curve.push(EquityPoint { t, eq });
    }

    /// Replace the most recent equity point with the current cash balance.
    /// Used after a close that happens on an already-marked bar.
    pub fn restate_last_equity(&mut self) {
        let eq = self.cash;
        if let Some(last) = self.equity_curve.last_mut() {
            last.eq = eq;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::Side;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample_position(side: Side, qty: f64) -> Position {
        Position {
            id: 1,
            side,
            qty,
            entry_price: 100.0,
            entry_time: t0(),
        }
    }

    #[test]
    fn new_portfolio() {
        let portfolio = Portfolio::new(10_000.0);
        assert!((portfolio.cash - 10_000.0).abs() < f64::EPSILON);
        assert!(portfolio.is_flat());
        assert!(portfolio.trades.is_empty());
        assert!(portfolio.equity_curve.is_empty());
    }

    #[test]
    fn trade_ids_are_sequential() {
        let mut portfolio = Portfolio::new(10_000.0);
        assert_eq!(portfolio.next_trade_id(), 1);
        assert_eq!(portfolio.next_trade_id(), 2);
    }

    #[test]
    fn open_and_take_position() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.open(sample_position(Side::Long, 10.0));
        assert!(!portfolio.is_flat());

        let taken = portfolio.take_position();
        assert_eq!(taken.map(|p| p.qty), Some(10.0));
        assert!(portfolio.is_flat());
        assert!(portfolio.take_position().is_none());
    }

    #[test]
    fn total_equity_flat() {
        let portfolio = Portfolio::new(10_000.0);
        assert!((portfolio.total_equity(123.0) - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_equity_long() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.cash = 0.0;
        portfolio.open(sample_position(Side::Long, 100.0));
        assert!((portfolio.total_equity(110.0) - 11_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_equity_short() {
        // short proceeds sit in cash; the open short is a liability
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.cash = 20_000.0;
        portfolio.open(sample_position(Side::Short, -100.0));
        assert!((portfolio.total_equity(90.0) - 11_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mark_and_restate() {
        let mut portfolio = Portfolio::new(10_000.0);
        portfolio.cash = 0.0;
        portfolio.open(sample_position(Side::Long, 100.0));
        portfolio.mark_to_market(t0(), 105.0);
        assert!((portfolio.equity_curve[0].eq - 10_500.0).abs() < f64::EPSILON);

        portfolio.take_position();
        portfolio.cash = 10_400.0;
        portfolio.restate_last_equity();
        assert_eq!(portfolio.equity_curve.len(), 1);
        assert!((portfolio.equity_curve[0].eq - 10_400.0).abs() < f64::EPSILON);
        assert_eq!(portfolio.equity_curve[0].t, t0());
    }
}
