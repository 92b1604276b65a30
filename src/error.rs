//! Error taxonomy for the analysis pipeline
//!
//! Two fatal classes exist: a malformed graph description aborts the run
//! before any analysis happens, and an export failure aborts only the
//! export step (computed results are still reported to the caller).
//! Everything else is a non-fatal [`crate::models::Warning`] attached to
//! the analysis report.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised by the library.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The graph description could not be tokenized into node/edge
    /// declarations, references an undeclared node, or declares
    /// conflicting attributes for the same node id.
    #[error("malformed graph description (line {line}): {reason}")]
    Malformed { line: usize, reason: String },

    /// The requested target node does not exist in the graph.
    #[error("target node '{0}' does not exist in the graph")]
    UnknownTarget(String),

    /// An output artifact could not be written.
    #[error("failed to write {artifact} to '{}': {source}", path.display())]
    Export {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GraphError {
    /// Shorthand for a parse/validation failure at a known source line.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }

    /// Shorthand for an export failure.
    pub fn export(artifact: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Export {
            artifact,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
