//! Open position state and completed trade records.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use super::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Direction a signal asks for, if any.
    pub fn from_signal(signal: Signal) -> Option<Side> {
        match signal {
            Signal::Bullish => Some(Side::Long),
            Signal::Bearish => Some(Side::Short),
            Signal::Neutral => None,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }

    /// +1 for long, -1 for short.
    pub fn sign(self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExitReason {
    SignalChange,
    StopLoss,
    TakeProfit,
    End,
}

/// The single open position held by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub id: u64,
    pub side: Side,
    /// Signed: positive for long, negative for short.
    pub qty: f64,
    pub entry_price: f64,
    pub entry_time: NaiveDateTime,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.side == Side::Long
    }

    pub fn size(&self) -> f64 {
        self.qty.abs()
    }

    /// Signed value of the position at `price`, as added to cash when marking.
    pub fn market_value(&self, price: f64) -> f64 {
        self.qty * price
    }

    /// Stop-loss trigger price for a fractional distance from entry.
    pub fn stop_loss_price(&self, pct: f64) -> f64 {
        self.entry_price * (1.0 - self.side.sign() * pct)
    }

    /// Take-profit trigger price for a fractional distance from entry.
    pub fn take_profit_price(&self, pct: f64) -> f64 {
        self.entry_price * (1.0 + self.side.sign() * pct)
    }

    /// Whether a bar with this high/low reaches the stop price.
    pub fn stop_touched(&self, stop: f64, high: f64, low: f64) -> bool {
        if self.is_long() {
            low <= stop
        } else {
            high >= stop
        }
    }

    /// Whether a bar with this high/low reaches the take-profit price.
    pub fn target_touched(&self, target: f64, high: f64, low: f64) -> bool {
        if self.is_long() {
            high >= target
        } else {
            low <= target
        }
    }
}

/// A completed round trip. Built once at close and never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub id: u64,
    pub side: Side,
    pub size: f64,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,
    #[serde(serialize_with = "round4")]
    pub pnl: f64,
    #[serde(serialize_with = "round4")]
    pub return_pct: f64,
    pub duration: String,
    pub reason: ExitReason,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.pnl < 0.0
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn round4<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 4))
}

/// Holding time as `"{days}d H:MM"`, or `"H:MM"` below one day.
pub fn format_duration(entry: NaiveDateTime, exit: NaiveDateTime) -> String {
    let total_minutes = (exit - entry).num_minutes().max(0);
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;
    if days > 0 {
        format!("{}d {}:{:02}", days, hours, minutes)
    } else {
        format!("{}:{:02}", hours, minutes)
    }
}
