//! Gating semantics for AND/OR logic nodes
//!
//! Gate handling is a single, swappable policy rather than conditionals
//! scattered through the path search. The resolver classifies every node
//! into one of four traversal semantics; the enumerator only ever asks
//! the resolver, never inspects node kinds itself.
//!
//! Policy differences only show up on degenerate gates (a declared
//! AND with fewer than two incoming edges): under the strict policy the
//! gate is broken and admits no traversal; under the lenient policy it
//! collapses into a pass-through. Either way the anomaly is surfaced via
//! [`LogicResolver::degenerate_gates`] so the run can record it.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::graph::GraphModel;
use crate::models::NodeKind;

/// How degenerate gates are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatePolicy {
    /// A degenerate AND admits no traversal (default).
    #[default]
    Strict,
    /// A degenerate AND collapses into a pass-through.
    Lenient,
}

impl std::str::FromStr for GatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(GatePolicy::Strict),
            "lenient" => Ok(GatePolicy::Lenient),
            other => Err(format!("unknown gating policy '{}'; use strict or lenient", other)),
        }
    }
}

impl std::fmt::Display for GatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatePolicy::Strict => write!(f, "strict"),
            GatePolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// How a node admits incoming branches during enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateSemantics {
    /// Any single incoming edge suffices (OR gates and plain nodes).
    Any,
    /// Every declared incoming edge must be independently satisfiable
    /// before any branch through this node completes (AND gates).
    All,
    /// Single-input gate collapsed to a pass-through (lenient policy).
    PassThrough,
    /// The gate admits no traversal (degenerate AND, strict policy).
    Blocked,
}

/// Classifies gating semantics per node under a fixed policy.
#[derive(Debug, Clone, Copy)]
pub struct LogicResolver {
    policy: GatePolicy,
}

impl LogicResolver {
    pub fn new(policy: GatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Traversal semantics of a node.
    ///
    /// A degenerate OR needs no special case: with one incoming edge,
    /// "any edge" already behaves as a pass-through.
    pub fn semantics(&self, graph: &GraphModel, node: NodeIndex) -> GateSemantics {
        match graph.node(node).kind {
            NodeKind::LogicAnd => {
                if graph.in_degree(node) >= 2 {
                    GateSemantics::All
                } else {
                    match self.policy {
                        GatePolicy::Strict => GateSemantics::Blocked,
                        GatePolicy::Lenient => GateSemantics::PassThrough,
                    }
                }
            }
            NodeKind::LogicOr => GateSemantics::Any,
            _ => GateSemantics::Any,
        }
    }

    /// Whether a node is traversable given the set of its incoming edges
    /// a traversal actually uses. This is the declarative contract the
    /// enumerator's search upholds; tests exercise it directly.
    pub fn is_traversable(
        &self,
        graph: &GraphModel,
        node: NodeIndex,
        incoming_used: &[petgraph::graph::EdgeIndex],
    ) -> bool {
        match self.semantics(graph, node) {
            GateSemantics::Blocked => false,
            GateSemantics::Any | GateSemantics::PassThrough => !incoming_used.is_empty(),
            GateSemantics::All => {
                let declared = graph.incoming(node);
                declared.iter().all(|e| incoming_used.contains(e))
            }
        }
    }

    /// Declared gates with in-degree below two, in declaration order.
    /// Non-fatal: the run records these and continues.
    pub fn degenerate_gates(&self, graph: &GraphModel) -> Vec<(NodeIndex, usize)> {
        graph
            .nodes()
            .filter(|(ix, node)| node.kind.is_gate() && graph.in_degree(*ix) < 2)
            .map(|(ix, _)| (ix, graph.in_degree(ix)))
            .collect()
    }
}
