//! Core data models for Ruletrace
//!
//! These models are used throughout the codebase for representing graph
//! entities, enumerated paths, warnings, and analysis results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Node kinds in the interaction graph.
///
/// Triggers and actions belong to automation rules; channels are the
/// shared sensors/actuators/physical effects rules couple through; the
/// two logic kinds gate how incoming branches combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Trigger,
    Action,
    Channel,
    LogicAnd,
    LogicOr,
}

impl NodeKind {
    /// Whether this node gates its incoming branches (AND/OR).
    pub fn is_gate(&self) -> bool {
        matches!(self, NodeKind::LogicAnd | NodeKind::LogicOr)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Trigger => write!(f, "trigger"),
            NodeKind::Action => write!(f, "action"),
            NodeKind::Channel => write!(f, "channel"),
            NodeKind::LogicAnd => write!(f, "logic_and"),
            NodeKind::LogicOr => write!(f, "logic_or"),
        }
    }
}

/// Channel subclass, recovered from the `[Physical]` / `[System]` hints the
/// upstream generator embeds in channel labels. Drives default edge weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelClass {
    Physical,
    System,
    #[default]
    Unknown,
}

/// Edge kinds, derived from endpoint node kinds.
///
/// An edge touching a physical channel is a physical implicit coupling,
/// one touching a system channel a system implicit coupling. Edges whose
/// target is a gate node are bookkeeping links that carry no weights of
/// their own unless the description declares some.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Explicit,
    SystemImplicit,
    PhysicalImplicit,
    GateInput,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::Explicit => write!(f, "explicit"),
            EdgeKind::SystemImplicit => write!(f, "system_implicit"),
            EdgeKind::PhysicalImplicit => write!(f, "physical_implicit"),
            EdgeKind::GateInput => write!(f, "gate_input"),
        }
    }
}

/// Non-fatal anomalies recorded during analysis.
///
/// Warnings are attached to the [`AnalysisReport`], never silently
/// dropped: a truncated enumeration or a degenerate gate changes how the
/// result set must be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A declared AND/OR gate has fewer than two incoming edges.
    DegenerateGate { node: String, in_degree: usize },
    /// Path enumeration stopped at the configured budget; the result set
    /// is incomplete.
    PathLimitExceeded { limit: usize, found: usize },
    /// A partial path hit the depth limit and was abandoned; deeper
    /// paths may exist.
    DepthLimitReached { limit: usize },
    /// No path from any source reaches the target (a valid outcome).
    UnreachableTarget { target: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::DegenerateGate { node, in_degree } => write!(
                f,
                "gate '{}' is degenerate: declared with {} incoming edge(s)",
                node, in_degree
            ),
            Warning::PathLimitExceeded { limit, found } => write!(
                f,
                "path budget of {} exhausted after {} paths; result set is truncated",
                limit, found
            ),
            Warning::DepthLimitReached { limit } => {
                write!(f, "search depth limit of {} reached; deeper paths were skipped", limit)
            }
            Warning::UnreachableTarget { target } => {
                write!(f, "no path from any source reaches target '{}'", target)
            }
        }
    }
}

/// One enumerated path with its feasibility metrics. One row of the
/// exported table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPath {
    /// 1-based path identifier, stable across runs for the same input.
    pub id: usize,
    /// Node ids from source to target.
    pub nodes: Vec<String>,
    /// Sum of hop costs.
    pub cost: f64,
    /// Arithmetic mean of hop stealth samples (1.0 when no hop carries one).
    pub avg_stealth: f64,
    /// Hop count.
    pub length: usize,
    /// Aggregate of node centralities along the path (mean or max).
    pub criticality: f64,
}

impl ScoredPath {
    /// Render the node sequence the way the exported table does.
    pub fn sequence(&self) -> String {
        self.nodes.join(" -> ")
    }
}

/// Counters shown in the run summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub nodes: usize,
    pub edges: usize,
    pub paths_found: usize,
    pub truncated: bool,
    pub warnings: usize,
}

/// Full result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Graph description file the run was started from.
    pub graph: String,
    /// Target node id.
    pub target: String,
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub paths: Vec<ScoredPath>,
    pub warnings: Vec<Warning>,
}

impl AnalysisReport {
    pub fn new(graph: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            graph: graph.into(),
            target: target.into(),
            generated_at: Utc::now(),
            summary: ReportSummary::default(),
            paths: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// The highest-ranked path: maximum criticality, ties broken by lower
    /// cost, then by enumeration order.
    pub fn top_path(&self) -> Option<&ScoredPath> {
        self.paths.iter().min_by(|a, b| {
            b.criticality
                .partial_cmp(&a.criticality)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cost.partial_cmp(&b.cost).unwrap_or(std::cmp::Ordering::Equal))
                .then(a.id.cmp(&b.id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(id: usize, criticality: f64, cost: f64) -> ScoredPath {
        ScoredPath {
            id,
            nodes: vec!["a".into(), "b".into()],
            cost,
            avg_stealth: 1.0,
            length: 1,
            criticality,
        }
    }

    #[test]
    fn test_top_path_prefers_criticality_then_cost() {
        let mut report = AnalysisReport::new("g.dot", "b");
        report.paths = vec![path(1, 0.2, 1.0), path(2, 0.8, 9.0), path(3, 0.8, 3.0)];
        assert_eq!(report.top_path().map(|p| p.id), Some(3));
    }

    #[test]
    fn test_top_path_empty() {
        let report = AnalysisReport::new("g.dot", "b");
        assert!(report.top_path().is_none());
    }

    #[test]
    fn test_warning_display_mentions_node() {
        let w = Warning::DegenerateGate {
            node: "LOGIC_Rule_9_AND".into(),
            in_degree: 1,
        };
        assert!(w.to_string().contains("LOGIC_Rule_9_AND"));
    }

    #[test]
    fn test_scored_path_sequence() {
        let p = path(1, 0.0, 0.0);
        assert_eq!(p.sequence(), "a -> b");
    }
}
