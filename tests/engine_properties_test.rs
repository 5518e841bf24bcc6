//! Property tests for the execution engine over arbitrary price paths.

mod common;

use candlebt::domain::backtest::{BacktestConfig, run_backtest};
use candlebt::domain::metrics::max_drawdown_pct;
use candlebt::domain::portfolio::EquityPoint;
use candlebt::domain::position::Side;
use candlebt::domain::signal::Signal;
use common::*;
use proptest::prelude::*;

fn market() -> impl Strategy<Value = (Vec<f64>, Vec<i8>)> {
    (1usize..80).prop_flat_map(|len| {
        (
            prop::collection::vec(1.0f64..1_000.0, len),
            prop::collection::vec(-1i8..=1, len),
        )
    })
}

fn engine_config() -> impl Strategy<Value = BacktestConfig> {
    (
        any::<bool>(),
        0.0f64..0.01,
        0.0f64..0.01,
        prop::option::of(0.01f64..0.5),
        prop::option::of(0.01f64..1.0),
    )
        .prop_map(
            |(allow_short, fee_pct, slippage_pct, stop_loss_pct, take_profit_pct)| {
                BacktestConfig {
                    allow_short,
                    fee_pct,
                    slippage_pct,
                    stop_loss_pct,
                    take_profit_pct,
                    ..frictionless_config()
                }
            },
        )
}

proptest! {
    #[test]
    fn runs_are_deterministic((closes, raw) in market(), config in engine_config()) {
        let candles = candles_from_closes(&closes);
        let sigs = signals(&raw);
        let first = run_backtest(&candles, &sigs, &config).unwrap();
        let second = run_backtest(&candles, &sigs, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn equity_curve_tracks_every_candle((closes, raw) in market(), config in engine_config()) {
        let candles = candles_from_closes(&closes);
        let result = run_backtest(&candles, &signals(&raw), &config).unwrap();

        prop_assert_eq!(result.equity_curve.len(), candles.len());
        for (point, candle) in result.equity_curve.iter().zip(&candles) {
            prop_assert_eq!(point.t, candle.t);
        }
        prop_assert_eq!(result.equity_curve.last().map(|p| p.eq), Some(result.final_equity));
    }

    #[test]
    fn trades_are_sequential_and_disjoint((closes, raw) in market(), config in engine_config()) {
        let candles = candles_from_closes(&closes);
        let result = run_backtest(&candles, &signals(&raw), &config).unwrap();

        for (i, trade) in result.trades.iter().enumerate() {
            prop_assert_eq!(trade.id, i as u64 + 1);
            prop_assert!(trade.exit_time >= trade.entry_time);
            prop_assert!(trade.size > 0.0);
            if !config.allow_short {
                prop_assert_eq!(trade.side, Side::Long);
            }
        }
        for pair in result.trades.windows(2) {
            prop_assert!(pair[1].entry_time >= pair[0].exit_time);
        }
    }

    #[test]
    fn pnl_is_price_move_less_exit_fee((closes, raw) in market(), config in engine_config()) {
        let candles = candles_from_closes(&closes);
        let result = run_backtest(&candles, &signals(&raw), &config).unwrap();

        for trade in &result.trades {
            let sign = match trade.side {
                Side::Long => 1.0,
                Side::Short => -1.0,
            };
            let expected = (trade.exit_price - trade.entry_price) * trade.size * sign
                - trade.exit_price * trade.size * config.fee_pct;
            let scale = trade.entry_price * trade.size;
            prop_assert!((trade.pnl - expected).abs() <= 1e-9 * scale.max(1.0));
        }
    }

    #[test]
    fn frictionless_equity_is_capital_plus_pnl((closes, raw) in market(), allow_short in any::<bool>()) {
        let candles = candles_from_closes(&closes);
        let config = BacktestConfig { allow_short, ..frictionless_config() };
        let result = run_backtest(&candles, &signals(&raw), &config).unwrap();

        let realized: f64 = result.trades.iter().map(|t| t.pnl).sum();
        let expected = config.initial_capital + realized;
        prop_assert!((result.final_equity - expected).abs() <= 1e-6 * expected.abs().max(1.0));
    }

    #[test]
    fn neutral_signals_never_trade((closes, _) in market(), config in engine_config()) {
        let candles = candles_from_closes(&closes);
        let sigs = vec![Signal::Neutral; candles.len()];
        let result = run_backtest(&candles, &sigs, &config).unwrap();

        prop_assert!(result.trades.is_empty());
        prop_assert!(result.equity_curve.iter().all(|p| p.eq == config.initial_capital));
        prop_assert_eq!(max_drawdown_pct(&result.equity_curve), 0.0);
    }

    #[test]
    fn drawdown_is_never_positive((closes, raw) in market(), config in engine_config()) {
        let candles = candles_from_closes(&closes);
        let result = run_backtest(&candles, &signals(&raw), &config).unwrap();
        prop_assert!(max_drawdown_pct(&result.equity_curve) <= 0.0);
    }

    #[test]
    fn non_decreasing_equity_has_no_drawdown(mut values in prop::collection::vec(1.0f64..1e6, 1..100)) {
        values.sort_by(f64::total_cmp);
        let curve: Vec<EquityPoint> = values
            .iter()
            .enumerate()
            .map(|(i, &eq)| EquityPoint { t: hour(i), eq })
            .collect();
        prop_assert_eq!(max_drawdown_pct(&curve), 0.0);
    }
}
