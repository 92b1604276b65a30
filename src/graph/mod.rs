//! In-memory graph model
//!
//! [`GraphModel`] is built once per run from a parsed description and is
//! immutable afterwards; path enumeration and scoring only read it. The
//! backing store is a petgraph `DiGraph` (multi-edges between the same
//! node pair are distinct edge indices and are never collapsed), plus
//! side tables keeping each node's incoming and outgoing edges in
//! declaration order — that order is the determinism contract for the
//! whole pipeline.

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::Direction;
use rustc_hash::FxHashMap;

use crate::error::{GraphError, GraphResult};
use crate::models::{ChannelClass, EdgeKind, NodeKind};
use crate::parse::{self, EdgeDecl, NodeDecl, ParsedGraph};

/// A node of the interaction graph.
#[derive(Debug, Clone)]
pub struct RuleNode {
    pub id: String,
    pub kind: NodeKind,
    /// Meaningful for channels only.
    pub channel_class: ChannelClass,
    /// All declared attributes, in declaration order. Styling attributes
    /// live here untouched so the exported subgraph keeps its look.
    pub attrs: IndexMap<String, String>,
    pub line: usize,
}

impl RuleNode {
    /// A declared attribute parsed as a number, if present and numeric.
    pub fn numeric_attr(&self, key: &str) -> Option<f64> {
        self.attrs.get(key).and_then(|v| v.parse().ok())
    }
}

/// An edge of the interaction graph.
#[derive(Debug, Clone)]
pub struct LinkEdge {
    pub kind: EdgeKind,
    /// Declared `cost=` attribute; per-kind defaults apply when absent.
    pub cost: Option<f64>,
    /// Declared `stealth=` attribute; per-kind defaults apply when absent.
    pub stealth: Option<f64>,
    /// All declared attributes, in declaration order.
    pub attrs: IndexMap<String, String>,
    pub line: usize,
}

/// Immutable interaction graph, built once per analysis run.
#[derive(Debug)]
pub struct GraphModel {
    graph: DiGraph<RuleNode, LinkEdge>,
    by_id: FxHashMap<String, NodeIndex>,
    /// Incoming edges per node, in edge declaration order.
    incoming: Vec<Vec<EdgeIndex>>,
    /// Outgoing edges per node, in edge declaration order.
    outgoing: Vec<Vec<EdgeIndex>>,
    name: String,
}

impl GraphModel {
    /// Build a model from a textual graph description.
    ///
    /// Fails with [`GraphError::Malformed`] when the description cannot
    /// be tokenized, an edge references an undeclared node, a node's
    /// kind cannot be determined, or the same node id is re-declared
    /// with conflicting attributes.
    pub fn build(description: &str) -> GraphResult<Self> {
        let parsed = parse::parse_dot(description)?;
        Self::from_parsed(parsed)
    }

    fn from_parsed(parsed: ParsedGraph) -> GraphResult<Self> {
        let mut graph = DiGraph::new();
        let mut by_id: FxHashMap<String, NodeIndex> = FxHashMap::default();

        for decl in parsed.nodes {
            match by_id.get(&decl.id) {
                Some(&existing) => merge_redeclaration(graph.node_weight_mut(existing).unwrap(), &decl)?,
                None => {
                    let (kind, channel_class) = infer_kind(&decl)?;
                    let ix = graph.add_node(RuleNode {
                        id: decl.id.clone(),
                        kind,
                        channel_class,
                        attrs: decl.attrs,
                        line: decl.line,
                    });
                    by_id.insert(decl.id, ix);
                }
            }
        }

        let mut incoming = vec![Vec::new(); graph.node_count()];
        let mut outgoing = vec![Vec::new(); graph.node_count()];

        for decl in parsed.edges {
            let source = *by_id.get(&decl.source).ok_or_else(|| {
                GraphError::malformed(
                    decl.line,
                    format!("edge references undeclared node '{}'", decl.source),
                )
            })?;
            let target = *by_id.get(&decl.target).ok_or_else(|| {
                GraphError::malformed(
                    decl.line,
                    format!("edge references undeclared node '{}'", decl.target),
                )
            })?;

            let kind = classify_edge(&graph[source], &graph[target]);
            let cost = weight_attr(&decl, "cost")?;
            let stealth = weight_attr(&decl, "stealth")?;
            let ix = graph.add_edge(
                source,
                target,
                LinkEdge {
                    kind,
                    cost,
                    stealth,
                    attrs: decl.attrs,
                    line: decl.line,
                },
            );
            outgoing[source.index()].push(ix);
            incoming[target.index()].push(ix);
        }

        Ok(Self {
            graph,
            by_id,
            incoming,
            outgoing,
            name: parsed.name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, ix: NodeIndex) -> &RuleNode {
        &self.graph[ix]
    }

    pub fn edge(&self, ix: EdgeIndex) -> &LinkEdge {
        &self.graph[ix]
    }

    /// (source, target) of an edge.
    pub fn endpoints(&self, ix: EdgeIndex) -> (NodeIndex, NodeIndex) {
        self.graph.edge_endpoints(ix).expect("edge index from this graph")
    }

    pub fn node_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &RuleNode)> {
        self.graph.node_indices().map(move |ix| (ix, &self.graph[ix]))
    }

    /// Edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &LinkEdge)> {
        self.graph.edge_indices().map(move |ix| (ix, &self.graph[ix]))
    }

    /// A node's incoming edges, in declaration order.
    pub fn incoming(&self, ix: NodeIndex) -> &[EdgeIndex] {
        &self.incoming[ix.index()]
    }

    /// A node's outgoing edges, in declaration order.
    pub fn outgoing(&self, ix: NodeIndex) -> &[EdgeIndex] {
        &self.outgoing[ix.index()]
    }

    pub fn in_degree(&self, ix: NodeIndex) -> usize {
        self.incoming[ix.index()].len()
    }

    /// Neighboring nodes in the given direction, in declaration order.
    /// Multi-edges yield the neighbor once per edge.
    pub fn neighbors(&self, ix: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let edges = match direction {
            Direction::Incoming => self.incoming(ix),
            Direction::Outgoing => self.outgoing(ix),
        };
        edges
            .iter()
            .map(|&e| {
                let (source, target) = self.endpoints(e);
                match direction {
                    Direction::Incoming => source,
                    Direction::Outgoing => target,
                }
            })
            .collect()
    }

    /// A node's declared numeric attribute, or `default` when absent or
    /// non-numeric.
    pub fn attribute(&self, ix: NodeIndex, key: &str, default: f64) -> f64 {
        self.graph[ix].numeric_attr(key).unwrap_or(default)
    }

    /// Nodes with no incoming edges, in declaration order. These are the
    /// entry points every enumerated path starts from.
    pub fn sources(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(move |ix| self.incoming[ix.index()].is_empty())
    }
}

/// Re-declaring a node id is tolerated as long as nothing conflicts; any
/// new attributes are merged in.
fn merge_redeclaration(node: &mut RuleNode, decl: &NodeDecl) -> GraphResult<()> {
    for (key, value) in &decl.attrs {
        match node.attrs.get(key) {
            Some(existing) if existing != value => {
                return Err(GraphError::malformed(
                    decl.line,
                    format!(
                        "conflicting attribute '{}' for node '{}': '{}' vs '{}'",
                        key, node.id, existing, value
                    ),
                ));
            }
            Some(_) => {}
            None => {
                node.attrs.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(())
}

/// Determine a node's kind. Precedence: explicit `kind` attribute, then
/// the generator's shape/label conventions, then the id prefix.
fn infer_kind(decl: &NodeDecl) -> GraphResult<(NodeKind, ChannelClass)> {
    if let Some(kind) = decl.attrs.get("kind") {
        let kind = match kind.as_str() {
            "trigger" => NodeKind::Trigger,
            "action" => NodeKind::Action,
            "channel" => NodeKind::Channel,
            "and" | "logic_and" => NodeKind::LogicAnd,
            "or" | "logic_or" => NodeKind::LogicOr,
            other => {
                return Err(GraphError::malformed(
                    decl.line,
                    format!("node '{}' declares unknown kind '{}'", decl.id, other),
                ))
            }
        };
        return Ok((kind, channel_class(decl)));
    }

    let label = decl.attrs.get("label").map(String::as_str).unwrap_or("");
    match decl.attrs.get("shape").map(String::as_str) {
        Some("diamond") => gate_kind(decl, label).map(|k| (k, ChannelClass::Unknown)),
        Some("ellipse") | Some("oval") | Some("circle") => {
            Ok((NodeKind::Channel, channel_class(decl)))
        }
        Some("box") | Some("rect") | Some("rectangle") => {
            if decl.id.starts_with("T_") || label.starts_with("Trigger") {
                Ok((NodeKind::Trigger, ChannelClass::Unknown))
            } else if decl.id.starts_with("A_") || label.starts_with("Action") {
                Ok((NodeKind::Action, ChannelClass::Unknown))
            } else {
                Err(GraphError::malformed(
                    decl.line,
                    format!("box node '{}' is neither a trigger nor an action", decl.id),
                ))
            }
        }
        _ => kind_from_prefix(decl).map(|k| (k, channel_class(decl))),
    }
}

fn gate_kind(decl: &NodeDecl, label: &str) -> GraphResult<NodeKind> {
    if label.contains("AND") || decl.id.contains("AND") {
        Ok(NodeKind::LogicAnd)
    } else if label.contains("OR") || decl.id.contains("OR") {
        Ok(NodeKind::LogicOr)
    } else {
        Err(GraphError::malformed(
            decl.line,
            format!("gate node '{}' has neither an AND nor an OR label", decl.id),
        ))
    }
}

fn kind_from_prefix(decl: &NodeDecl) -> GraphResult<NodeKind> {
    let id = decl.id.as_str();
    if id.starts_with("CH_") {
        Ok(NodeKind::Channel)
    } else if id.starts_with("T_") {
        Ok(NodeKind::Trigger)
    } else if id.starts_with("A_") {
        Ok(NodeKind::Action)
    } else if id.starts_with("LOGIC_") || id.starts_with("IMPLICIT_AND") {
        gate_kind(decl, decl.attrs.get("label").map(String::as_str).unwrap_or(""))
    } else {
        Err(GraphError::malformed(
            decl.line,
            format!("cannot determine the kind of node '{}'", id),
        ))
    }
}

/// Channel subclass from the `[Physical]` / `[System]` label hint.
fn channel_class(decl: &NodeDecl) -> ChannelClass {
    let label = decl.attrs.get("label").map(String::as_str).unwrap_or("");
    if label.contains("[Physical]") {
        ChannelClass::Physical
    } else if label.contains("[System]") {
        ChannelClass::System
    } else {
        ChannelClass::Unknown
    }
}

/// Edge kind from endpoint kinds. Gate-bound edges are bookkeeping;
/// otherwise a channel endpoint makes the coupling implicit.
fn classify_edge(source: &RuleNode, target: &RuleNode) -> EdgeKind {
    if target.kind.is_gate() {
        return EdgeKind::GateInput;
    }
    let classes = [
        channel_class_of(source),
        channel_class_of(target),
    ];
    if classes.contains(&Some(ChannelClass::Physical)) {
        EdgeKind::PhysicalImplicit
    } else if classes.contains(&Some(ChannelClass::System)) {
        EdgeKind::SystemImplicit
    } else {
        EdgeKind::Explicit
    }
}

fn channel_class_of(node: &RuleNode) -> Option<ChannelClass> {
    (node.kind == NodeKind::Channel).then_some(node.channel_class)
}

fn weight_attr(decl: &EdgeDecl, key: &str) -> GraphResult<Option<f64>> {
    match decl.attrs.get(key) {
        None => Ok(None),
        Some(raw) => raw.parse::<f64>().map(Some).map_err(|_| {
            GraphError::malformed(
                decl.line,
                format!(
                    "edge {} -> {} declares non-numeric {} '{}'",
                    decl.source, decl.target, key, raw
                ),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        digraph Sample {
            rankdir=LR;
            T_Rule_1_0 [label="Trigger_(Rule_1):door.contact=open" shape=box]
            A_Rule_1_0 [label="Action_Rule_1:hvac.on()" shape=box]
            CH_temperature [label="temperature [Physical]" shape=ellipse]
            CH_power_state [label="power [System]" shape=ellipse]
            LOGIC_Rule_2_AND [label="AND" shape=diamond]
            T_Rule_1_0 -> A_Rule_1_0
            A_Rule_1_0 -> CH_temperature [cost=4, stealth=2.5]
            CH_temperature -> LOGIC_Rule_2_AND
            CH_power_state -> LOGIC_Rule_2_AND
        }
    "#;

    #[test]
    fn test_build_infers_kinds() {
        let g = GraphModel::build(SAMPLE).unwrap();
        let kind = |id: &str| g.node(g.node_by_id(id).unwrap()).kind;
        assert_eq!(kind("T_Rule_1_0"), NodeKind::Trigger);
        assert_eq!(kind("A_Rule_1_0"), NodeKind::Action);
        assert_eq!(kind("CH_temperature"), NodeKind::Channel);
        assert_eq!(kind("LOGIC_Rule_2_AND"), NodeKind::LogicAnd);
        let ch = g.node(g.node_by_id("CH_temperature").unwrap());
        assert_eq!(ch.channel_class, ChannelClass::Physical);
    }

    #[test]
    fn test_build_classifies_edges() {
        let g = GraphModel::build(SAMPLE).unwrap();
        let kinds: Vec<EdgeKind> = g.edges().map(|(_, e)| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EdgeKind::Explicit,
                EdgeKind::PhysicalImplicit,
                EdgeKind::GateInput,
                EdgeKind::GateInput,
            ]
        );
    }

    #[test]
    fn test_build_reads_declared_weights() {
        let g = GraphModel::build(SAMPLE).unwrap();
        let (_, weighted) = g.edges().nth(1).unwrap();
        assert_eq!(weighted.cost, Some(4.0));
        assert_eq!(weighted.stealth, Some(2.5));
        let (_, bare) = g.edges().next().unwrap();
        assert_eq!(bare.cost, None);
        assert_eq!(bare.stealth, None);
    }

    #[test]
    fn test_structural_round_trip() {
        // Every edge appears in exactly one incoming and one outgoing list.
        let g = GraphModel::build(SAMPLE).unwrap();
        let mut seen_in = 0;
        let mut seen_out = 0;
        for (ix, _) in g.nodes() {
            seen_in += g.incoming(ix).len();
            seen_out += g.outgoing(ix).len();
            for &e in g.incoming(ix) {
                assert_eq!(g.endpoints(e).1, ix);
            }
            for &e in g.outgoing(ix) {
                assert_eq!(g.endpoints(e).0, ix);
            }
        }
        assert_eq!(seen_in, g.edge_count());
        assert_eq!(seen_out, g.edge_count());
    }

    #[test]
    fn test_multi_edges_not_collapsed() {
        let g = GraphModel::build(
            "digraph { T_a [shape=box]; A_b [shape=box]; T_a -> A_b [cost=1]; T_a -> A_b [cost=7]; }",
        )
        .unwrap();
        assert_eq!(g.edge_count(), 2);
        let a = g.node_by_id("A_b").unwrap();
        assert_eq!(g.in_degree(a), 2);
        let costs: Vec<Option<f64>> = g.incoming(a).iter().map(|&e| g.edge(e).cost).collect();
        assert_eq!(costs, vec![Some(1.0), Some(7.0)]);
    }

    #[test]
    fn test_undeclared_edge_endpoint_is_rejected() {
        let err = GraphModel::build("digraph { T_a; T_a -> T_ghost; }").unwrap_err();
        assert!(err.to_string().contains("T_ghost"));
    }

    #[test]
    fn test_conflicting_redeclaration_is_rejected() {
        let err = GraphModel::build(
            "digraph { CH_x [label=\"a [Physical]\"]; CH_x [label=\"b [System]\"]; }",
        )
        .unwrap_err();
        assert!(err.to_string().contains("conflicting attribute"));
    }

    #[test]
    fn test_identical_redeclaration_merges() {
        let g = GraphModel::build(
            "digraph { CH_x [label=\"a\"]; CH_x [label=\"a\", penwidth=2]; }",
        )
        .unwrap();
        assert_eq!(g.node_count(), 1);
        let node = g.node(g.node_by_id("CH_x").unwrap());
        assert_eq!(node.attrs["penwidth"], "2");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = GraphModel::build("digraph { mystery_node; }").unwrap_err();
        assert!(err.to_string().contains("mystery_node"));
    }

    #[test]
    fn test_explicit_kind_attribute_wins() {
        let g = GraphModel::build("digraph { weird [kind=channel label=\"x [System]\"]; }").unwrap();
        let node = g.node(g.node_by_id("weird").unwrap());
        assert_eq!(node.kind, NodeKind::Channel);
        assert_eq!(node.channel_class, ChannelClass::System);
    }

    #[test]
    fn test_neighbors_follow_declaration_order() {
        let g = GraphModel::build(
            "digraph { T_a; T_b; T_c; A_t; T_c -> A_t; T_a -> A_t; T_b -> A_t; }",
        )
        .unwrap();
        let t = g.node_by_id("A_t").unwrap();
        let ids: Vec<&str> = g
            .neighbors(t, Direction::Incoming)
            .into_iter()
            .map(|ix| g.node(ix).id.as_str())
            .collect();
        assert_eq!(ids, vec!["T_c", "T_a", "T_b"]);
    }

    #[test]
    fn test_sources_are_nodes_without_incoming_edges() {
        let g = GraphModel::build("digraph { T_a; CH_b; A_c; T_a -> CH_b; CH_b -> A_c; }").unwrap();
        let sources: Vec<&str> = g.sources().map(|ix| g.node(ix).id.as_str()).collect();
        assert_eq!(sources, vec!["T_a"]);
    }

    #[test]
    fn test_attribute_accessor_defaults() {
        let g = GraphModel::build("digraph { T_a [weight=3.5]; }").unwrap();
        let a = g.node_by_id("T_a").unwrap();
        assert_eq!(g.attribute(a, "weight", 0.0), 3.5);
        assert_eq!(g.attribute(a, "missing", 9.0), 9.0);
    }

    #[test]
    fn test_non_numeric_weight_is_rejected() {
        let err =
            GraphModel::build("digraph { T_a; A_b; T_a -> A_b [cost=cheap]; }").unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }
}
