//! CSV file data adapter.
//!
//! One file per symbol and timeframe, `{SYMBOL}_{timeframe}.csv`, with the
//! header `t,open,high,low,close,volume`.

use crate::domain::candle::Candle;
use crate::domain::error::BacktestError;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, timeframe: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol.to_uppercase(), timeframe))
    }
}

/// Parse a timestamp as RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD`, or integer epoch milliseconds. Zoned values are converted to
/// UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.naive_utc())
}

fn data_error(line: u64, reason: impl std::fmt::Display) -> BacktestError {
    BacktestError::DataParse {
        reason: format!("line {}: {}", line, reason),
    }
}

fn parse_price(
    record: &StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<f64, BacktestError> {
    let raw = record
        .get(index)
        .ok_or_else(|| data_error(line, format!("missing {} column", name)))?;
    raw.trim()
        .parse()
        .map_err(|e| data_error(line, format!("invalid {} value '{}': {}", name, raw, e)))
}

fn parse_record(record: &StringRecord, line: u64) -> Result<Candle, BacktestError> {
    let raw_t = record
        .get(0)
        .ok_or_else(|| data_error(line, "missing t column"))?;
    let t = parse_timestamp(raw_t)
        .ok_or_else(|| data_error(line, format!("invalid timestamp '{}'", raw_t)))?;

    let candle = Candle {
        t,
        open: parse_price(record, 1, "open", line)?,
        high: parse_price(record, 2, "high", line)?,
        low: parse_price(record, 3, "low", line)?,
        close: parse_price(record, 4, "close", line)?,
        volume: parse_price(record, 5, "volume", line)?,
    };
    if !candle.is_well_formed() {
        return Err(data_error(line, "inconsistent OHLC values"));
    }
    Ok(candle)
}

impl DataPort for CsvAdapter {
    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Candle>, BacktestError> {
        let path = self.csv_path(symbol, timeframe);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BacktestError::NoData {
                    symbol: symbol.to_string(),
                    timeframe: timeframe.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BacktestError::DataParse {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let candle = parse_record(&record, line)?;

            let day = candle.t.date();
            let before = start_date.is_some_and(|start| day < start);
            let after = end_date.is_some_and(|end| day > end);
            if before || after {
                continue;
            }
            candles.push(candle);
        }

        candles.sort_by_key(|c| c.t);
        if let Some(pair) = candles.windows(2).find(|w| w[0].t == w[1].t) {
            return Err(BacktestError::DataParse {
                reason: format!("duplicate timestamp {} in {}", pair[0].t, path.display()),
            });
        }

        debug!("loaded {} candles from {}", candles.len(), path.display());
        Ok(candles)
    }

    fn list_symbols(&self, timeframe: &str) -> Result<Vec<String>, BacktestError> {
        let entries = fs::read_dir(&self.base_path)?;

        let suffix = format!("_{}.csv", timeframe);
        let mut symbols = Vec::new();

        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(&suffix) {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
