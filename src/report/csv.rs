//! CSV path table
//!
//! One record per enumerated path, stable column order. The writer
//! never drops records: every scored path becomes exactly one row, and
//! any I/O failure surfaces as an export error instead of a partial
//! file that looks complete.

use std::path::Path;

use crate::error::{GraphError, GraphResult};
use crate::models::ScoredPath;

const HEADERS: [&str; 6] = [
    "path_id",
    "nodes",
    "cost",
    "avg_stealth",
    "length",
    "criticality",
];

/// Write the path table to `destination`.
pub fn write(paths: &[ScoredPath], destination: &Path) -> GraphResult<()> {
    let mut writer = csv::Writer::from_path(destination)
        .map_err(|e| export_error(destination, e))?;

    writer
        .write_record(HEADERS)
        .map_err(|e| export_error(destination, e))?;
    for path in paths {
        writer
            .write_record([
                path.id.to_string(),
                path.sequence(),
                format_metric(path.cost),
                format_metric(path.avg_stealth),
                path.length.to_string(),
                format_metric(path.criticality),
            ])
            .map_err(|e| export_error(destination, e))?;
    }
    writer.flush().map_err(|e| {
        GraphError::export("path table", destination, e)
    })?;
    Ok(())
}

/// Render to a string (used by tests and the stdout fallback).
pub fn render(paths: &[ScoredPath]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS).expect("in-memory write");
    for path in paths {
        writer
            .write_record([
                path.id.to_string(),
                path.sequence(),
                format_metric(path.cost),
                format_metric(path.avg_stealth),
                path.length.to_string(),
                format_metric(path.criticality),
            ])
            .expect("in-memory write");
    }
    String::from_utf8(writer.into_inner().expect("in-memory flush")).expect("csv is utf-8")
}

/// Fixed precision keeps rows diffable across runs.
fn format_metric(value: f64) -> String {
    format!("{:.3}", value)
}

fn export_error(destination: &Path, error: csv::Error) -> GraphError {
    let source = match error.into_kind() {
        csv::ErrorKind::Io(io) => io,
        other => std::io::Error::other(format!("{:?}", other)),
    };
    GraphError::export("path table", destination, source)
}
