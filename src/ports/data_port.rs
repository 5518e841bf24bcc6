//! Data access port trait.

use crate::domain::candle::Candle;
use crate::domain::error::BacktestError;
use chrono::NaiveDate;

pub trait DataPort {
    /// Candles for `symbol` at `timeframe`, sorted by time, restricted to the
    /// inclusive date window when bounds are given.
    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Candle>, BacktestError>;

    fn list_symbols(&self, timeframe: &str) -> Result<Vec<String>, BacktestError>;
}
