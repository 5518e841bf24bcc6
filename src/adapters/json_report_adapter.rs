//! JSON report adapter.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::domain::error::BacktestError;
use crate::domain::report::RunReport;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportAdapter {
    compact: bool,
}

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output instead of pretty-printed.
    pub fn compact() -> Self {
        Self { compact: true }
    }

    pub fn render(&self, report: &RunReport) -> Result<String, BacktestError> {
        let rendered = if self.compact {
            serde_json::to_string(report)
        } else {
            serde_json::to_string_pretty(report)
        };
        rendered.map_err(|e| BacktestError::Report {
            reason: format!("failed to serialise report: {}", e),
        })
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &RunReport, output_path: Option<&Path>) -> Result<(), BacktestError> {
        let json = self.render(report)?;
        match output_path {
            Some(path) => {
                fs::write(path, json + "\n").map_err(|e| BacktestError::Report {
                    reason: format!("failed to write {}: {}", path.display(), e),
                })?;
                info!("report written to {}", path.display());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", json)?;
            }
        }
        Ok(())
    }
}
