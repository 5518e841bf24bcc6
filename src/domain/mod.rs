//! Core domain types and logic.

pub mod backtest;
pub mod candle;
pub mod config_validation;
pub mod error;
pub mod execution;
pub mod indicator;
pub mod metrics;
pub mod portfolio;
pub mod position;
pub mod report;
pub mod signal;
pub mod strategy;
