#![allow(dead_code)]

use candlebt::domain::backtest::BacktestConfig;
pub use candlebt::domain::candle::Candle;
use candlebt::domain::config_validation::{DataConfig, ReportConfig, RunConfig};
use candlebt::domain::error::BacktestError;
use candlebt::domain::metrics::BreakevenPolicy;
use candlebt::domain::signal::Signal;
use candlebt::domain::strategy::StrategyKind;
use candlebt::ports::data_port::DataPort;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::PathBuf;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Candle>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_candles(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(symbol.to_string(), candles);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_candles(
        &self,
        symbol: &str,
        _timeframe: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Candle>, BacktestError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BacktestError::DataParse {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|c| start_date.is_none_or(|s| c.t.date() >= s))
            .filter(|c| end_date.is_none_or(|e| c.t.date() <= e))
            .collect())
    }

    fn list_symbols(&self, _timeframe: &str) -> Result<Vec<String>, BacktestError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn hour(i: usize) -> NaiveDateTime {
    t0() + Duration::hours(i as i64)
}

pub fn make_candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle {
        t: hour(i),
        open,
        high,
        low,
        close,
        volume: 1_000.0,
    }
}

/// Candles whose open is the previous close, with a 1% range around the body.
pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            make_candle(
                i,
                open,
                open.max(close) * 1.01,
                open.min(close) * 0.99,
                close,
            )
        })
        .collect()
}

/// A deterministic up/down wave around `base`, long enough to produce
/// crosses for every strategy with default parameters.
pub fn wave_closes(count: usize, base: f64, amplitude: f64, period: f64) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let x = i as f64 * std::f64::consts::TAU / period;
            base + amplitude * x.sin() + i as f64 * 0.01
        })
        .collect()
}

pub fn signals(values: &[i8]) -> Vec<Signal> {
    values.iter().copied().map(Signal::from_i8).collect()
}

pub fn frictionless_config() -> BacktestConfig {
    BacktestConfig {
        initial_capital: 10_000.0,
        position_pct: 1.0,
        fee_pct: 0.0,
        slippage_pct: 0.0,
        allow_short: false,
        stop_loss_pct: None,
        take_profit_pct: None,
    }
}

pub fn make_run_config(symbol: &str, strategy: StrategyKind) -> RunConfig {
    RunConfig {
        data: DataConfig {
            dir: PathBuf::from("unused"),
            symbol: symbol.to_string(),
            timeframe: "1h".to_string(),
            start_date: None,
            end_date: None,
        },
        backtest: frictionless_config(),
        strategy,
        report: ReportConfig {
            max_equity_points: 500,
            breakeven: BreakevenPolicy::Count,
        },
    }
}
