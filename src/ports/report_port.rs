//! Report output port trait.

use std::path::Path;

use crate::domain::error::BacktestError;
use crate::domain::report::RunReport;

/// Port for writing a finished run.
pub trait ReportPort {
    /// Write to `output_path`, or to stdout when `None`.
    fn write(&self, report: &RunReport, output_path: Option<&Path>) -> Result<(), BacktestError>;
}
