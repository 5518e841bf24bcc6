//! Configuration loading and validation.
//!
//! Reads every section into typed values and checks them before the engine
//! runs, so the engine itself never sees an invalid configuration.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::BacktestError;
use crate::domain::metrics::BreakevenPolicy;
use crate::domain::strategy::{StrategyKind, StrategyTag};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_TIMEFRAME: &str = "1h";
pub const DEFAULT_MAX_EQUITY_POINTS: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub symbol: String,
    pub timeframe: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub max_equity_points: usize,
    pub breakeven: BreakevenPolicy,
}

/// Everything one backtest invocation needs, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data: DataConfig,
    pub backtest: BacktestConfig,
    pub strategy: StrategyKind,
    pub report: ReportConfig,
}

pub fn load_run_config(config: &dyn ConfigPort) -> Result<RunConfig, BacktestError> {
    Ok(RunConfig {
        data: load_data_config(config)?,
        backtest: load_backtest_config(config)?,
        strategy: load_strategy(config)?,
        report: load_report_config(config)?,
    })
}

pub fn load_data_config(config: &dyn ConfigPort) -> Result<DataConfig, BacktestError> {
    let dir = required_string(config, "data", "dir")?;
    let symbol = required_string(config, "data", "symbol")?.to_uppercase();
    let timeframe = config
        .get_string("data", "timeframe")
        .unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string());

    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(BacktestError::invalid(
                "data",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }

    Ok(DataConfig {
        dir: PathBuf::from(dir),
        symbol,
        timeframe,
        start_date,
        end_date,
    })
}

pub fn load_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, BacktestError> {
    let defaults = BacktestConfig::default();
    let backtest = BacktestConfig {
        initial_capital: config.get_double("capital", "initial", defaults.initial_capital)?,
        position_pct: config.get_double("capital", "position_pct", defaults.position_pct)?,
        fee_pct: config.get_double("capital", "fee_pct", defaults.fee_pct)?,
        slippage_pct: config.get_double("backtest", "slippage_pct", defaults.slippage_pct)?,
        allow_short: config.get_bool("backtest", "allow_short", defaults.allow_short)?,
        stop_loss_pct: config.get_optional_double("backtest", "stop_loss_pct")?,
        take_profit_pct: config.get_optional_double("backtest", "take_profit_pct")?,
    };
    backtest.validate()?;
    Ok(backtest)
}

/// Resolve the strategy tag and overlay any configured parameters on its
/// defaults.
pub fn load_strategy(config: &dyn ConfigPort) -> Result<StrategyKind, BacktestError> {
    let tag: StrategyTag = match config.get_string("strategy", "type") {
        Some(tag) => tag.parse()?,
        None => StrategyTag::MaCross,
    };

    let strategy = match StrategyKind::with_defaults(tag) {
        StrategyKind::MaCross(mut p) => {
            p.short_window = get_window(config, "short_window", p.short_window)?;
            p.long_window = get_window(config, "long_window", p.long_window)?;
            StrategyKind::MaCross(p)
        }
        StrategyKind::RsiThreshold(mut p) => {
            p.period = get_window(config, "period", p.period)?;
            p.lower = config.get_double("strategy", "lower", p.lower)?;
            p.upper = config.get_double("strategy", "upper", p.upper)?;
            StrategyKind::RsiThreshold(p)
        }
        StrategyKind::Macd(mut p) => {
            p.fast = get_window(config, "fast", p.fast)?;
            p.slow = get_window(config, "slow", p.slow)?;
            p.signal = get_window(config, "signal", p.signal)?;
            p.trend = get_window(config, "trend", p.trend)?;
            StrategyKind::Macd(p)
        }
    };
    strategy.validate()?;
    Ok(strategy)
}

pub fn load_report_config(config: &dyn ConfigPort) -> Result<ReportConfig, BacktestError> {
    let value = config.get_int(
        "report",
        "max_equity_points",
        DEFAULT_MAX_EQUITY_POINTS as i64,
    )?;
    if value < 1 {
        return Err(BacktestError::invalid(
            "report",
            "max_equity_points",
            "max_equity_points must be at least 1",
        ));
    }
    let breakeven = if config.get_bool("report", "count_breakeven", true)? {
        BreakevenPolicy::Count
    } else {
        BreakevenPolicy::Exclude
    };
    Ok(ReportConfig {
        max_equity_points: value as usize,
        breakeven,
    })
}

fn required_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, BacktestError> {
    config
        .get_string(section, key)
        .ok_or_else(|| BacktestError::missing(section, key))
}

/// Lookback lengths must be non-negative; range checks belong to the
/// strategy's own validation.
fn get_window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, BacktestError> {
    let value = config.get_int("strategy", key, default as i64)?;
    usize::try_from(value)
        .map_err(|_| BacktestError::invalid("strategy", key, format!("{} must be at least 1", key)))
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, BacktestError> {
    config
        .get_string("data", key)
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
                BacktestError::invalid(
                    "data",
                    key,
                    format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            })
        })
        .transpose()
}
