//! Output reporters and artifact writers
//!
//! Two artifacts and two console formats:
//! - `csv` - the path table (one row per enumerated path)
//! - `dot` - the highlighted subgraph for the external renderer
//! - `text` - terminal summary with colors
//! - `json` - machine-readable full report

pub mod csv;
pub mod dot;
mod json;
mod text;

use anyhow::{anyhow, Result};
use std::str::FromStr;

use crate::models::AnalysisReport;

/// Supported console output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render the analysis report in the given console format.
pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render(report)),
        OutputFormat::Json => json::render(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_render_dispatch() {
        let report = AnalysisReport::new("g.dot", "A_t");
        assert!(render(&report, OutputFormat::Text).unwrap().contains("Ruletrace"));
        assert!(render(&report, OutputFormat::Json)
            .unwrap()
            .trim_start()
            .starts_with('{'));
    }
}
