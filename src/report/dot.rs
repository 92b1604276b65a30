//! Highlighted subgraph export
//!
//! Emits a graph description in the same DOT subset the input uses,
//! restricted to the union of nodes and edges that appear on enumerated
//! paths. Original styling attributes are preserved so the external
//! renderer draws the subgraph the way it drew the full graph; the
//! target node and the top-scoring path get override styling on top.
//! No rasterization happens here.

use petgraph::graph::{EdgeIndex, NodeIndex};
use rustc_hash::FxHashSet;
use std::path::Path;

use crate::error::{GraphError, GraphResult};
use crate::graph::GraphModel;
use crate::search::RawPath;

const TARGET_STYLE: [(&str, &str); 2] = [("color", "red"), ("penwidth", "3")];
const TOP_PATH_STYLE: [(&str, &str); 2] = [("color", "crimson"), ("penwidth", "2.5")];

/// Render the path subgraph as DOT text.
pub fn render_subgraph(
    graph: &GraphModel,
    paths: &[RawPath],
    target: NodeIndex,
    top_path: Option<&RawPath>,
) -> String {
    let mut path_nodes: FxHashSet<NodeIndex> = FxHashSet::default();
    let mut path_edges: FxHashSet<EdgeIndex> = FxHashSet::default();
    for path in paths {
        path_nodes.extend(path.nodes.iter().copied());
        path_edges.extend(path.edges.iter().copied());
    }
    let top_edges: FxHashSet<EdgeIndex> = top_path
        .map(|p| p.edges.iter().copied().collect())
        .unwrap_or_default();

    let name = if graph.name().is_empty() {
        "paths".to_string()
    } else {
        format!("subgraph_{}", graph.name())
    };

    let mut out = String::new();
    out.push_str(&format!("digraph {} {{\n", quote_if_needed(&name)));
    out.push_str("  rankdir=LR;\n");

    // Nodes and edges in declaration order keeps the artifact diffable.
    for (ix, node) in graph.nodes() {
        if !path_nodes.contains(&ix) {
            continue;
        }
        let overrides: &[(&str, &str)] = if ix == target { &TARGET_STYLE } else { &[] };
        out.push_str(&format!(
            "  {}{};\n",
            quote_if_needed(&node.id),
            attr_list(node.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())), overrides)
        ));
    }
    for (ix, edge) in graph.edges() {
        if !path_edges.contains(&ix) {
            continue;
        }
        let (source, dest) = graph.endpoints(ix);
        let overrides: &[(&str, &str)] = if top_edges.contains(&ix) {
            &TOP_PATH_STYLE
        } else {
            &[]
        };
        out.push_str(&format!(
            "  {} -> {}{};\n",
            quote_if_needed(&graph.node(source).id),
            quote_if_needed(&graph.node(dest).id),
            attr_list(edge.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())), overrides)
        ));
    }
    out.push_str("}\n");
    out
}

/// Write the path subgraph to `destination`.
pub fn write_subgraph(
    graph: &GraphModel,
    paths: &[RawPath],
    target: NodeIndex,
    top_path: Option<&RawPath>,
    destination: &Path,
) -> GraphResult<()> {
    let rendered = render_subgraph(graph, paths, target, top_path);
    std::fs::write(destination, rendered)
        .map_err(|e| GraphError::export("subgraph", destination, e))
}

/// Merge declared attributes with overrides (overrides win) into a
/// `[key="value", ...]` list; empty string when there is nothing to say.
fn attr_list<'a>(
    declared: impl Iterator<Item = (&'a str, &'a str)>,
    overrides: &[(&str, &str)],
) -> String {
    let mut entries: Vec<(String, String)> = Vec::new();
    for (key, value) in declared {
        if overrides.iter().any(|(ok, _)| *ok == key) {
            continue;
        }
        entries.push((key.to_string(), value.to_string()));
    }
    for (key, value) in overrides {
        entries.push((key.to_string(), value.to_string()));
    }
    if entries.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = entries
        .iter()
        .map(|(k, v)| format!("{}={}", k, quote_if_needed(v)))
        .collect();
    format!(" [{}]", rendered.join(", "))
}

fn quote_if_needed(value: &str) -> String {
    let ident_like = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
        && !value.starts_with(|c: char| c.is_ascii_digit());
    let numeric = value.parse::<f64>().is_ok();
    if ident_like || numeric {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
