//! Per-path feasibility scoring
//!
//! Turns raw enumerated paths into scored records: total cost, average
//! stealth, length, and criticality. Declared edge weights always win;
//! otherwise the per-kind default table applies. Gate-input edges carry
//! no stealth sample of their own — a hop into an AND diamond is
//! bookkeeping, not an observable action.

use serde::{Deserialize, Serialize};

use crate::graph::GraphModel;
use crate::metrics::CentralityTable;
use crate::models::{EdgeKind, ScoredPath};
use crate::search::RawPath;

/// Default cost/stealth pair for one edge kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub cost: f64,
    pub stealth: f64,
}

impl Default for WeightEntry {
    /// Neutral weights: free and fully stealthy. Used only for kinds
    /// without a calibrated entry.
    fn default() -> Self {
        Self {
            cost: 0.0,
            stealth: 1.0,
        }
    }
}

/// Per-kind default weights, overridable from the config file.
///
/// The built-in constants are the calibrated values the upstream
/// pipeline assigns when it types edges: implicit couplings cost more to
/// exploit but are harder to observe than explicit rule wiring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    #[serde(default = "default_explicit")]
    pub explicit: WeightEntry,
    #[serde(default = "default_system_implicit")]
    pub system_implicit: WeightEntry,
    #[serde(default = "default_physical_implicit")]
    pub physical_implicit: WeightEntry,
}

fn default_explicit() -> WeightEntry {
    WeightEntry {
        cost: 1.0,
        stealth: 1.0,
    }
}

fn default_system_implicit() -> WeightEntry {
    WeightEntry {
        cost: 3.0,
        stealth: 2.0,
    }
}

fn default_physical_implicit() -> WeightEntry {
    WeightEntry {
        cost: 5.0,
        stealth: 3.0,
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            explicit: default_explicit(),
            system_implicit: default_system_implicit(),
            physical_implicit: default_physical_implicit(),
        }
    }
}

impl WeightTable {
    /// Default cost of an edge kind.
    pub fn cost(&self, kind: EdgeKind) -> f64 {
        match kind {
            EdgeKind::Explicit => self.explicit.cost,
            EdgeKind::SystemImplicit => self.system_implicit.cost,
            EdgeKind::PhysicalImplicit => self.physical_implicit.cost,
            EdgeKind::GateInput => 0.0,
        }
    }

    /// Default stealth sample of an edge kind, if the kind carries one.
    pub fn stealth(&self, kind: EdgeKind) -> Option<f64> {
        match kind {
            EdgeKind::Explicit => Some(self.explicit.stealth),
            EdgeKind::SystemImplicit => Some(self.system_implicit.stealth),
            EdgeKind::PhysicalImplicit => Some(self.physical_implicit.stealth),
            EdgeKind::GateInput => None,
        }
    }
}

/// How node centralities aggregate into a path's criticality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriticalityMode {
    /// The most central node dominates (default).
    #[default]
    Max,
    /// Average over the path's scoring nodes.
    Mean,
}

impl std::str::FromStr for CriticalityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "max" => Ok(CriticalityMode::Max),
            "mean" => Ok(CriticalityMode::Mean),
            other => Err(format!("unknown criticality mode '{}'; use mean or max", other)),
        }
    }
}

impl std::fmt::Display for CriticalityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CriticalityMode::Max => write!(f, "max"),
            CriticalityMode::Mean => write!(f, "mean"),
        }
    }
}

/// Score every enumerated path. Path ids are 1-based enumeration order,
/// so they are stable across runs for the same input.
pub fn score_paths(
    graph: &GraphModel,
    paths: &[RawPath],
    centrality: &CentralityTable,
    mode: CriticalityMode,
    weights: &WeightTable,
) -> Vec<ScoredPath> {
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| score_one(graph, path, centrality, mode, weights, i + 1))
        .collect()
}

fn score_one(
    graph: &GraphModel,
    path: &RawPath,
    centrality: &CentralityTable,
    mode: CriticalityMode,
    weights: &WeightTable,
    id: usize,
) -> ScoredPath {
    let mut cost = 0.0;
    let mut stealth_sum = 0.0;
    let mut stealth_samples = 0usize;

    for &edge_ix in &path.edges {
        let edge = graph.edge(edge_ix);
        cost += edge.cost.unwrap_or_else(|| weights.cost(edge.kind));
        if let Some(stealth) = edge.stealth.or_else(|| weights.stealth(edge.kind)) {
            stealth_sum += stealth;
            stealth_samples += 1;
        }
    }

    let avg_stealth = if stealth_samples > 0 {
        stealth_sum / stealth_samples as f64
    } else {
        1.0
    };

    // Gates carry no centrality; criticality aggregates over the rest.
    let scores: Vec<f64> = path
        .nodes
        .iter()
        .filter(|&&ix| !graph.node(ix).kind.is_gate())
        .map(|&ix| centrality.score(ix))
        .collect();
    let criticality = match (mode, scores.is_empty()) {
        (_, true) => 0.0,
        (CriticalityMode::Max, _) => scores.iter().cloned().fold(f64::MIN, f64::max),
        (CriticalityMode::Mean, _) => scores.iter().sum::<f64>() / scores.len() as f64,
    };

    ScoredPath {
        id,
        nodes: path.nodes.iter().map(|&ix| graph.node(ix).id.clone()).collect(),
        cost,
        avg_stealth,
        length: path.edges.len(),
        criticality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{GatePolicy, LogicResolver};
    use crate::metrics::betweenness;
    use crate::search::{find_all_paths, SearchOptions};

    fn analyze(src: &str, target: &str, mode: CriticalityMode) -> (GraphModel, Vec<ScoredPath>) {
        let graph = GraphModel::build(src).unwrap();
        let target = graph.node_by_id(target).unwrap();
        let resolver = LogicResolver::new(GatePolicy::Strict);
        let outcome = find_all_paths(&graph, &resolver, target, &SearchOptions::default());
        let table = betweenness(&graph);
        let scored = score_paths(
            &graph,
            &outcome.paths,
            &table,
            mode,
            &WeightTable::default(),
        );
        (graph, scored)
    }

    #[test]
    fn test_cost_sums_declared_and_default_weights() {
        // T_1 -> CH_1 declared cost 2; CH_1 -> A_t picks up the
        // physical-implicit default of 5.
        let src = r#"
            digraph {
                T_1; A_t;
                CH_1 [label="hum [Physical]"]
                T_1 -> CH_1 [cost=2, stealth=1];
                CH_1 -> A_t;
            }
        "#;
        let (_, scored) = analyze(src, "A_t", CriticalityMode::Max);
        assert_eq!(scored.len(), 1);
        assert!((scored[0].cost - 7.0).abs() < 1e-9);
        // Stealth: declared 1 and physical default 3 -> mean 2.
        assert!((scored[0].avg_stealth - 2.0).abs() < 1e-9);
        assert_eq!(scored[0].length, 2);
    }

    #[test]
    fn test_gate_edges_cost_zero_and_skip_stealth() {
        let src = r#"
            digraph {
                T_1; CH_1; CH_2; A_t;
                LOGIC_AND_1 [label="AND" shape=diamond]
                T_1 -> CH_1;
                CH_1 -> LOGIC_AND_1;
                CH_2 -> LOGIC_AND_1;
                LOGIC_AND_1 -> A_t;
            }
        "#;
        let (_, scored) = analyze(src, "A_t", CriticalityMode::Max);
        let long = scored.iter().find(|p| p.nodes[0] == "T_1").unwrap();
        // T_1->CH_1 explicit (1) + CH_1->AND gate (0) + AND->A_t explicit (1).
        assert!((long.cost - 2.0).abs() < 1e-9);
        // Only the two explicit hops carry stealth samples.
        assert!((long.avg_stealth - 1.0).abs() < 1e-9);
        assert_eq!(long.length, 3);
    }

    #[test]
    fn test_path_with_only_gate_edges_gets_neutral_stealth() {
        let src = r#"
            digraph {
                CH_2 [kind=channel]
                LOGIC_OR_1 [label="OR" shape=diamond kind=or]
                CH_2 -> LOGIC_OR_1;
            }
        "#;
        let (_, scored) = analyze(src, "LOGIC_OR_1", CriticalityMode::Max);
        assert_eq!(scored.len(), 1);
        assert!((scored[0].avg_stealth - 1.0).abs() < 1e-9);
        assert!((scored[0].cost - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_criticality_max_vs_mean() {
        // T_a -> T_b -> T_c -> T_d: b and c both bridge pairs.
        let src = r#"
            digraph {
                T_a; T_b; T_c; T_d;
                T_a -> T_b; T_b -> T_c; T_c -> T_d;
            }
        "#;
        let (_, max_scored) = analyze(src, "T_d", CriticalityMode::Max);
        let (_, mean_scored) = analyze(src, "T_d", CriticalityMode::Mean);
        assert_eq!(max_scored.len(), 1);
        assert!(max_scored[0].criticality > mean_scored[0].criticality);
        assert!(mean_scored[0].criticality > 0.0);
    }

    #[test]
    fn test_path_ids_are_stable_enumeration_order() {
        let src = r#"
            digraph {
                T_1; T_2; A_t;
                T_1 -> A_t; T_2 -> A_t;
            }
        "#;
        let (_, scored) = analyze(src, "A_t", CriticalityMode::Max);
        assert_eq!(scored[0].id, 1);
        assert_eq!(scored[0].nodes[0], "T_1");
        assert_eq!(scored[1].id, 2);
        assert_eq!(scored[1].nodes[0], "T_2");
    }

    #[test]
    fn test_weight_table_unknown_kind_fallback_is_neutral() {
        let entry = WeightEntry::default();
        assert_eq!(entry.cost, 0.0);
        assert_eq!(entry.stealth, 1.0);
    }

    #[test]
    fn test_criticality_mode_parsing() {
        assert_eq!("max".parse::<CriticalityMode>().unwrap(), CriticalityMode::Max);
        assert_eq!("Mean".parse::<CriticalityMode>().unwrap(), CriticalityMode::Mean);
        assert!("median".parse::<CriticalityMode>().is_err());
    }
}
