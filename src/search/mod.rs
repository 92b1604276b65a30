//! Exhaustive path enumeration
//!
//! Reverse depth-first search from the target over incoming edges,
//! composing every acyclic chain back to a terminating source (a node
//! with no incoming edges). Gate semantics come from the
//! [`LogicResolver`]; the search itself never inspects node kinds.
//!
//! An AND gate is only ever entered after every one of its declared
//! inputs has been shown to admit at least one acyclic source chain in
//! the current traversal context; each input's chains are then emitted
//! as separate paths. A predecessor already on the partial path is a
//! cycle candidate and is silently discarded.
//!
//! The visited set is threaded through the recursion as an explicit
//! parameter, so concurrent searches for different targets over the same
//! (read-only) model never interfere. Exploration is bounded by a
//! mandatory path budget and depth limit; exhausting either marks the
//! outcome truncated instead of silently returning a partial set.

use petgraph::graph::{EdgeIndex, NodeIndex};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::graph::GraphModel;
use crate::logic::{GateSemantics, LogicResolver};

/// Bounded-exploration safeguards. Both limits are mandatory.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Stop after this many enumerated paths.
    pub max_paths: usize,
    /// Longest admissible path, in edges.
    pub max_depth: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_paths: 10_000,
            max_depth: 64,
        }
    }
}

/// One enumerated path, source first, target last. `edges[i]` joins
/// `nodes[i]` to `nodes[i + 1]` (multi-edges stay distinct).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPath {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
}

/// Result of one enumeration run.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// Paths in deterministic order (edge declaration order drives the
    /// traversal, so repeated runs yield identical output).
    pub paths: Vec<RawPath>,
    /// The path budget was exhausted; more paths may exist.
    pub truncated: bool,
    /// Some partial path hit the depth limit and was abandoned.
    pub depth_clipped: bool,
}

/// Enumerate every acyclic path from any source into `target`.
///
/// An empty result is a valid outcome, not an error. A target with no
/// incoming edges yields no paths (the trivial zero-length path is not
/// an attack path).
pub fn find_all_paths(
    graph: &GraphModel,
    resolver: &LogicResolver,
    target: NodeIndex,
    options: &SearchOptions,
) -> SearchOutcome {
    let mut search = Search {
        graph,
        resolver,
        options,
        outcome: SearchOutcome::default(),
    };

    let mut visited = FxHashSet::default();
    visited.insert(target);
    // Suffix of the path under construction, target first; emitted
    // paths are the reversal.
    let mut rev_nodes = vec![target];
    let mut rev_edges = Vec::new();

    search.expand(target, &mut visited, &mut rev_nodes, &mut rev_edges);

    debug!(
        paths = search.outcome.paths.len(),
        truncated = search.outcome.truncated,
        "path enumeration finished"
    );
    search.outcome
}

struct Search<'g> {
    graph: &'g GraphModel,
    resolver: &'g LogicResolver,
    options: &'g SearchOptions,
    outcome: SearchOutcome,
}

impl Search<'_> {
    /// Extend the current suffix backwards from `node`. Returns false
    /// once the path budget is exhausted and the whole search must stop.
    fn expand(
        &mut self,
        node: NodeIndex,
        visited: &mut FxHashSet<NodeIndex>,
        rev_nodes: &mut Vec<NodeIndex>,
        rev_edges: &mut Vec<EdgeIndex>,
    ) -> bool {
        let graph = self.graph;
        let incoming = graph.incoming(node);

        if incoming.is_empty() {
            return self.emit(rev_nodes, rev_edges);
        }

        match self.resolver.semantics(graph, node) {
            // Broken gate: dead end on this suffix, keep searching others.
            GateSemantics::Blocked => true,
            GateSemantics::All => {
                // Every declared input must admit an acyclic source chain
                // in this context before any branch through the gate is
                // emitted as complete.
                for &edge in incoming {
                    let (source, _) = graph.endpoints(edge);
                    if visited.contains(&source)
                        || !self.reachable(source, visited, rev_edges.len() + 1)
                    {
                        debug!(
                            gate = %graph.node(node).id,
                            input = %graph.node(source).id,
                            "AND gate input unsatisfiable here; discarding branch"
                        );
                        return true;
                    }
                }
                self.descend_each(incoming, visited, rev_nodes, rev_edges)
            }
            GateSemantics::Any | GateSemantics::PassThrough => {
                self.descend_each(incoming, visited, rev_nodes, rev_edges)
            }
        }
    }

    /// Descend into each incoming edge in declaration order.
    fn descend_each(
        &mut self,
        incoming: &[EdgeIndex],
        visited: &mut FxHashSet<NodeIndex>,
        rev_nodes: &mut Vec<NodeIndex>,
        rev_edges: &mut Vec<EdgeIndex>,
    ) -> bool {
        for &edge in incoming {
            let (source, _) = self.graph.endpoints(edge);
            if visited.contains(&source) {
                // Cycle candidate: discarded, not an error.
                continue;
            }
            if rev_edges.len() >= self.options.max_depth {
                self.outcome.depth_clipped = true;
                continue;
            }

            visited.insert(source);
            rev_nodes.push(source);
            rev_edges.push(edge);
            let keep_going = self.expand(source, visited, rev_nodes, rev_edges);
            rev_edges.pop();
            rev_nodes.pop();
            visited.remove(&source);

            if !keep_going {
                return false;
            }
        }
        true
    }

    /// Whether at least one acyclic source chain reaches `node` in the
    /// current context, under the same gate semantics the enumeration
    /// uses. Existence check only; chains are not materialized.
    fn reachable(
        &mut self,
        node: NodeIndex,
        visited: &mut FxHashSet<NodeIndex>,
        depth: usize,
    ) -> bool {
        if depth > self.options.max_depth {
            self.outcome.depth_clipped = true;
            return false;
        }
        let graph = self.graph;
        let incoming = graph.incoming(node);
        if incoming.is_empty() {
            return true;
        }

        match self.resolver.semantics(graph, node) {
            GateSemantics::Blocked => false,
            GateSemantics::All => {
                for &edge in incoming {
                    if !self.reachable_via(edge, visited, depth) {
                        return false;
                    }
                }
                true
            }
            GateSemantics::Any | GateSemantics::PassThrough => {
                for &edge in incoming {
                    if self.reachable_via(edge, visited, depth) {
                        return true;
                    }
                }
                false
            }
        }
    }

    fn reachable_via(
        &mut self,
        edge: EdgeIndex,
        visited: &mut FxHashSet<NodeIndex>,
        depth: usize,
    ) -> bool {
        let (source, _) = self.graph.endpoints(edge);
        if visited.contains(&source) {
            return false;
        }
        visited.insert(source);
        let found = self.reachable(source, visited, depth + 1);
        visited.remove(&source);
        found
    }

    /// Record a completed path. Returns false when the budget is gone.
    fn emit(&mut self, rev_nodes: &[NodeIndex], rev_edges: &[EdgeIndex]) -> bool {
        if rev_edges.is_empty() {
            return true;
        }
        if self.outcome.paths.len() >= self.options.max_paths {
            self.outcome.truncated = true;
            return false;
        }
        let mut nodes = rev_nodes.to_vec();
        nodes.reverse();
        let mut edges = rev_edges.to_vec();
        edges.reverse();
        self.outcome.paths.push(RawPath { nodes, edges });
        true
    }
}
