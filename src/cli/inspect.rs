//! Inspect command - summarize a graph description

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::graph::GraphModel;
use crate::metrics::betweenness;
use crate::models::NodeKind;

/// Print node/edge statistics and the most central nodes.
pub fn run(graph_path: &Path, top: usize) -> Result<()> {
    let description = std::fs::read_to_string(graph_path)
        .with_context(|| format!("Failed to read graph description {}", graph_path.display()))?;
    let model = GraphModel::build(&description)?;

    println!("\n{} Graph Summary\n", style("📊").bold());

    let count_kind = |kind: NodeKind| model.nodes().filter(|(_, n)| n.kind == kind).count();
    println!(
        "  {}: {}",
        style("Triggers").cyan(),
        style(count_kind(NodeKind::Trigger)).bold()
    );
    println!(
        "  {}: {}",
        style("Actions").cyan(),
        style(count_kind(NodeKind::Action)).bold()
    );
    println!(
        "  {}: {}",
        style("Channels").cyan(),
        style(count_kind(NodeKind::Channel)).bold()
    );
    println!(
        "  {}: {}",
        style("Gates").cyan(),
        style(count_kind(NodeKind::LogicAnd) + count_kind(NodeKind::LogicOr)).bold()
    );

    let mut edge_counts: Vec<(String, usize)> = Vec::new();
    for (_, edge) in model.edges() {
        let key = edge.kind.to_string();
        match edge_counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => edge_counts.push((key, 1)),
        }
    }
    println!();
    for (kind, count) in &edge_counts {
        println!("  {} edges: {}", style(kind).cyan(), style(count).bold());
    }

    println!();
    println!("  Total nodes: {}", style(model.node_count()).bold());
    println!("  Total edges: {}", style(model.edge_count()).bold());
    println!("  Entry nodes: {}", style(model.sources().count()).bold());

    // Most central nodes, the structural chokepoints paths tend to transit.
    let table = betweenness(&model);
    let mut ranked: Vec<_> = model
        .nodes()
        .map(|(ix, node)| (table.score(ix), node))
        .filter(|(score, _)| *score > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    if !ranked.is_empty() {
        println!("\n{} Most central nodes\n", style("📊").bold());
        for (score, node) in ranked.iter().take(top) {
            println!(
                "  {:.4}  {} {}",
                score,
                style(&node.id).cyan(),
                style(format!("({})", node.kind)).dim()
            );
        }
    }

    Ok(())
}
