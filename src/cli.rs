//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest;
use crate::domain::config_validation::{self, RunConfig};
use crate::domain::error::BacktestError;
use crate::domain::metrics::{ProfitFactor, Summary};
use crate::domain::report::RunReport;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "candlebt", about = "Candle-driven strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and write the JSON report
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Report path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        timeframe: Option<String>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
        /// Validate and load data without running the engine
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols with data for a timeframe
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        timeframe: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            output,
            symbol,
            timeframe,
            compact,
            dry_run,
        } => {
            let overrides = Overrides { symbol, timeframe };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                let reporter = if compact {
                    JsonReportAdapter::compact()
                } else {
                    JsonReportAdapter::new()
                };
                run_backtest(&config, &overrides, output.as_deref(), &reporter)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config, timeframe } => {
            run_list_symbols(&config, timeframe.as_deref())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Command-line values that take precedence over the `[data]` section.
#[derive(Debug, Default)]
pub struct Overrides {
    pub symbol: Option<String>,
    pub timeframe: Option<String>,
}

pub fn load_config(path: &Path) -> Result<RunConfig, BacktestError> {
    info!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path)?;
    config_validation::load_run_config(&adapter)
}

fn apply_overrides(mut run_config: RunConfig, overrides: &Overrides) -> RunConfig {
    if let Some(symbol) = &overrides.symbol {
        run_config.data.symbol = symbol.trim().to_uppercase();
    }
    if let Some(timeframe) = &overrides.timeframe {
        run_config.data.timeframe = timeframe.trim().to_string();
    }
    run_config
}

fn run_backtest(
    config_path: &Path,
    overrides: &Overrides,
    output_path: Option<&Path>,
    reporter: &dyn ReportPort,
) -> Result<(), BacktestError> {
    // Stage 1: load and validate config
    let run_config = apply_overrides(load_config(config_path)?, overrides);

    // Stages 2-5: data, signals, engine, metrics
    let data_port = CsvAdapter::new(run_config.data.dir.clone());
    let report = run_backtest_pipeline(&data_port, &run_config)?;

    // Stage 6: console summary
    print_summary(&report.summary);

    // Stage 7: report
    reporter.write(&report, output_path)
}

/// Fetch candles, generate signals, run the engine and summarise.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    run_config: &RunConfig,
) -> Result<RunReport, BacktestError> {
    let data = &run_config.data;

    info!("Loading {} {} candles", data.symbol, data.timeframe);
    let candles =
        data_port.fetch_candles(&data.symbol, &data.timeframe, data.start_date, data.end_date)?;
    if candles.is_empty() {
        return Err(BacktestError::NoData {
            symbol: data.symbol.clone(),
            timeframe: data.timeframe.clone(),
        });
    }

    info!("Running strategy: {}", run_config.strategy);
    let series = run_config.strategy.produce(&candles);
    if series.is_empty() {
        warn!(
            "{} candles do not cover the warm-up of {}",
            candles.len(),
            run_config.strategy
        );
    }
    info!(
        "  {} bars after warm-up, {} signals",
        series.len(),
        series.active_count()
    );

    let result = backtest::run_series(&series, &run_config.backtest)?;
    info!(
        "Backtest complete: {} trades, final equity {:.2}",
        result.trades.len(),
        result.final_equity
    );

    let summary = Summary::compute(
        &data.symbol,
        &data.timeframe,
        series.candles(),
        run_config.backtest.initial_capital,
        &result,
        run_config.report.breakeven,
    );
    Ok(RunReport::new(
        summary,
        result,
        run_config.report.max_equity_points,
    ))
}

fn fmt_pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v))
        .unwrap_or_else(|| "n/a".to_string())
}

pub fn print_summary(summary: &Summary) {
    let profit_factor = match summary.profit_factor {
        ProfitFactor::Ratio(value) => format!("{:.2}", value),
        ProfitFactor::Infinite => "inf".to_string(),
    };

    eprintln!("\n=== {} {} ===", summary.symbol, summary.timeframe);
    if let (Some(start), Some(end)) = (summary.start, summary.end) {
        eprintln!("Period:           {} to {}", start, end);
    }
    eprintln!("Initial Capital:  {:.2}", summary.initial_capital);
    eprintln!("Final Equity:     {:.2}", summary.final_equity);
    eprintln!("Total Return:     {:.2}%", summary.total_return_pct);
    eprintln!(
        "Buy & Hold:       {}",
        fmt_pct(summary.buy_and_hold_return_pct)
    );
    eprintln!("Max Drawdown:     {:.2}%", summary.max_drawdown_pct);
    eprintln!(
        "Total Trades:     {} ({} won, {} lost, {} even)",
        summary.num_trades, summary.trades_won, summary.trades_lost, summary.trades_breakeven
    );
    eprintln!("Win Rate:         {}", fmt_pct(summary.win_rate_pct));
    eprintln!("Profit Factor:    {}", profit_factor);
}

fn run_dry_run(config_path: &Path, overrides: &Overrides) -> Result<(), BacktestError> {
    let run_config = apply_overrides(load_config(config_path)?, overrides);
    eprintln!("Config validated successfully");
    describe(&run_config);

    let data = &run_config.data;
    let data_port = CsvAdapter::new(data.dir.clone());
    let candles =
        data_port.fetch_candles(&data.symbol, &data.timeframe, data.start_date, data.end_date)?;
    match (candles.first(), candles.last()) {
        (Some(first), Some(last)) => {
            eprintln!("\nData: {} candles, {} to {}", candles.len(), first.t, last.t)
        }
        _ => {
            return Err(BacktestError::NoData {
                symbol: data.symbol.clone(),
                timeframe: data.timeframe.clone(),
            });
        }
    }

    eprintln!("\nDry run complete: configuration is valid");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), BacktestError> {
    let run_config = load_config(config_path)?;
    describe(&run_config);
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn describe(run_config: &RunConfig) {
    let data = &run_config.data;
    let bt = &run_config.backtest;
    let window = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.to_string())
            .unwrap_or_else(|| "open".to_string())
    };

    eprintln!("\nData:");
    eprintln!("  dir:       {}", data.dir.display());
    eprintln!("  symbol:    {} ({})", data.symbol, data.timeframe);
    eprintln!(
        "  window:    {} to {}",
        window(data.start_date),
        window(data.end_date)
    );

    eprintln!("\nStrategy:");
    eprintln!("  {}", run_config.strategy);

    eprintln!("\nExecution:");
    eprintln!(
        "  capital:   {:.2} ({}% per entry)",
        bt.initial_capital,
        bt.position_pct * 100.0
    );
    eprintln!("  fee:       {}", bt.fee_pct);
    eprintln!("  slippage:  {}", bt.slippage_pct);
    eprintln!("  shorting:  {}", if bt.allow_short { "on" } else { "off" });
    if let Some(pct) = bt.stop_loss_pct {
        eprintln!("  stop loss: {}", pct);
    }
    if let Some(pct) = bt.take_profit_pct {
        eprintln!("  take profit: {}", pct);
    }
}

fn run_list_symbols(config_path: &Path, timeframe: Option<&str>) -> Result<(), BacktestError> {
    info!("Loading config from {}", config_path.display());
    let adapter = FileConfigAdapter::from_file(config_path)?;
    let dir = adapter
        .get_string("data", "dir")
        .ok_or_else(|| BacktestError::missing("data", "dir"))?;
    let timeframe = match timeframe {
        Some(tf) => tf.to_string(),
        None => adapter
            .get_string("data", "timeframe")
            .unwrap_or_else(|| config_validation::DEFAULT_TIMEFRAME.to_string()),
    };

    let symbols = CsvAdapter::new(PathBuf::from(dir)).list_symbols(&timeframe)?;
    if symbols.is_empty() {
        eprintln!("No symbols found for timeframe {}", timeframe);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}
