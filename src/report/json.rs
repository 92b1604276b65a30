//! JSON reporter
//!
//! Outputs the full analysis report as pretty-printed JSON for machine
//! consumption, piping to jq, or further processing.

use anyhow::Result;

use crate::models::AnalysisReport;

/// Render the report as JSON.
pub fn render(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
