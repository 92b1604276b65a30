//! Betweenness centrality (Brandes' algorithm)
//!
//! One BFS per source node, dependency accumulation on the way back,
//! partial contributions summed across sources; the per-source passes
//! are independent and run on rayon. Edge direction is taken as given —
//! the graph is never symmetrized.
//!
//! Scope matches the criticality semantics the rest of the pipeline was
//! calibrated against: gate nodes are bookkeeping and are excluded from
//! the computation entirely; channel nodes participate structurally but
//! report 0.0 (a channel's importance is already captured by the edge
//! weights its couplings carry). Scores are normalized by
//! 1/((n-1)(n-2)) for the n participating nodes, so values live in [0, 1].

use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use std::collections::VecDeque;

use crate::graph::GraphModel;
use crate::models::NodeKind;

/// Node-indexed betweenness scores for one analysis run. Read-only
/// derived data; excluded nodes hold 0.0.
#[derive(Debug, Clone)]
pub struct CentralityTable {
    scores: Vec<f64>,
}

impl CentralityTable {
    pub fn score(&self, node: NodeIndex) -> f64 {
        self.scores.get(node.index()).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Compute the centrality table for the whole graph.
pub fn betweenness(graph: &GraphModel) -> CentralityTable {
    let node_count = graph.node_count();
    let mut scores = vec![0.0; node_count];
    if node_count == 0 {
        return CentralityTable { scores };
    }

    // Compact the participating (non-gate) nodes.
    let included: Vec<NodeIndex> = graph
        .nodes()
        .filter(|(_, node)| !node.kind.is_gate())
        .map(|(ix, _)| ix)
        .collect();
    let n = included.len();
    if n < 3 {
        return CentralityTable { scores };
    }

    let mut compact = vec![usize::MAX; node_count];
    for (i, &ix) in included.iter().enumerate() {
        compact[ix.index()] = i;
    }

    // Adjacency restricted to participating endpoints. Parallel edges
    // collapse here: shortest-path counting is per node pair.
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (edge, _) in graph.edges() {
        let (source, target) = graph.endpoints(edge);
        let (s, t) = (compact[source.index()], compact[target.index()]);
        if s != usize::MAX && t != usize::MAX && s != t && !adjacency[s].contains(&t) {
            adjacency[s].push(t);
        }
    }

    // Each source contributes independently; sum the partial vectors.
    let partials: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|source| brandes_from(source, &adjacency, n))
        .collect();

    let mut raw = vec![0.0; n];
    for partial in partials {
        for (i, value) in partial.into_iter().enumerate() {
            raw[i] += value;
        }
    }

    let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
    for (i, &ix) in included.iter().enumerate() {
        if graph.node(ix).kind == NodeKind::Channel {
            continue;
        }
        scores[ix.index()] = raw[i] * scale;
    }

    CentralityTable { scores }
}

/// Single-source shortest-path counting plus dependency accumulation.
fn brandes_from(source: usize, adjacency: &[Vec<usize>], n: usize) -> Vec<f64> {
    let mut partial = vec![0.0; n];

    // Nodes in order of non-decreasing distance from the source.
    let mut stack: Vec<usize> = Vec::new();
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut num_paths = vec![0.0; n];
    num_paths[source] = 1.0;
    let mut distance = vec![-1i32; n];
    distance[source] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        stack.push(v);
        for &w in &adjacency[v] {
            if distance[w] < 0 {
                distance[w] = distance[v] + 1;
                queue.push_back(w);
            }
            if distance[w] == distance[v] + 1 {
                num_paths[w] += num_paths[v];
                predecessors[w].push(v);
            }
        }
    }

    // Backtrack from the farthest nodes.
    let mut dependency = vec![0.0; n];
    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            dependency[v] += (num_paths[v] / num_paths[w]) * (1.0 + dependency[w]);
        }
        if w != source {
            partial[w] += dependency[w];
        }
    }

    partial
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_of_directed_chain() {
        // T_a -> T_b -> T_c: only the a->c pair routes through b.
        // Normalized over n=3: 1 / ((3-1)(3-2)) = 0.5.
        let g = GraphModel::build("digraph { T_a; T_b; T_c; T_a -> T_b; T_b -> T_c; }").unwrap();
        let table = betweenness(&g);
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        assert_eq!(table.score(g.node_by_id("T_a").unwrap()), 0.0);
        assert!((table.score(g.node_by_id("T_b").unwrap()) - 0.5).abs() < 1e-9);
        assert_eq!(table.score(g.node_by_id("T_c").unwrap()), 0.0);
    }

    #[test]
    fn test_direction_is_respected() {
        // Reversing one edge removes the only through-pair.
        let g = GraphModel::build("digraph { T_a; T_b; T_c; T_a -> T_b; T_c -> T_b; }").unwrap();
        let table = betweenness(&g);
        assert_eq!(table.score(g.node_by_id("T_b").unwrap()), 0.0);
    }

    #[test]
    fn test_gates_are_excluded_and_zero() {
        let src = r#"
            digraph {
                T_a; T_b; A_c; A_d;
                LOGIC_1_AND [label="AND" shape=diamond]
                T_a -> A_c; A_c -> A_d;
                T_b -> LOGIC_1_AND; T_a -> LOGIC_1_AND; LOGIC_1_AND -> A_d;
            }
        "#;
        let g = GraphModel::build(src).unwrap();
        let table = betweenness(&g);
        assert_eq!(table.score(g.node_by_id("LOGIC_1_AND").unwrap()), 0.0);
        // A_c still bridges T_a -> A_d.
        assert!(table.score(g.node_by_id("A_c").unwrap()) > 0.0);
    }

    #[test]
    fn test_channels_report_zero() {
        let g = GraphModel::build(
            "digraph { T_a; CH_m [label=\"m [Physical]\"]; A_c; T_a -> CH_m; CH_m -> A_c; }",
        )
        .unwrap();
        let table = betweenness(&g);
        assert_eq!(table.score(g.node_by_id("CH_m").unwrap()), 0.0);
    }

    #[test]
    fn test_declaration_order_invariance() {
        let forward = r#"
            digraph {
                T_a; T_b; T_c; T_d;
                T_a -> T_b; T_b -> T_c; T_c -> T_d; T_a -> T_c;
            }
        "#;
        let permuted = r#"
            digraph {
                T_d; T_c; T_b; T_a;
                T_a -> T_c; T_c -> T_d; T_b -> T_c; T_a -> T_b;
            }
        "#;
        let g1 = GraphModel::build(forward).unwrap();
        let g2 = GraphModel::build(permuted).unwrap();
        let t1 = betweenness(&g1);
        let t2 = betweenness(&g2);
        for id in ["T_a", "T_b", "T_c", "T_d"] {
            let s1 = t1.score(g1.node_by_id(id).unwrap());
            let s2 = t2.score(g2.node_by_id(id).unwrap());
            assert!((s1 - s2).abs() < 1e-9, "{}: {} vs {}", id, s1, s2);
        }
    }

    #[test]
    fn test_tiny_graphs_are_all_zero() {
        let g = GraphModel::build("digraph { T_a; T_b; T_a -> T_b; }").unwrap();
        let table = betweenness(&g);
        assert_eq!(table.score(g.node_by_id("T_a").unwrap()), 0.0);
        assert_eq!(table.score(g.node_by_id("T_b").unwrap()), 0.0);
    }

    #[test]
    fn test_values_stay_in_unit_range() {
        let src = r#"
            digraph {
                T_a; T_b; T_c; T_d; T_e;
                T_a -> T_c; T_b -> T_c; T_c -> T_d; T_c -> T_e;
            }
        "#;
        let g = GraphModel::build(src).unwrap();
        let table = betweenness(&g);
        for (ix, _) in g.nodes() {
            let s = table.score(ix);
            assert!((0.0..=1.0).contains(&s), "score {} out of range", s);
        }
    }
}
