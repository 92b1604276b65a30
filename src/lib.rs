//! Ruletrace - Graph-powered attack path analysis for automation rules
//!
//! Automation rules in a shared space (a smart building, a factory floor)
//! interact through channels their authors never declared: one rule's action
//! heats a room, another rule's trigger watches that temperature. Ruletrace
//! takes a directed interaction graph of rule triggers, rule actions,
//! implicit channels, and AND/OR gating nodes, then answers one question:
//! which chains of interactions can an attacker ride to a chosen target,
//! and how feasible is each chain?
//!
//! The pipeline is a single-pass batch analysis:
//! 1. Parse the textual graph description ([`parse`]) and build an
//!    immutable [`graph::GraphModel`].
//! 2. Enumerate every acyclic source-to-target path ([`search`]),
//!    respecting gate semantics ([`logic`]).
//! 3. Score the graph (betweenness centrality) and each path
//!    (cost, stealth, length, criticality) in [`metrics`].
//! 4. Export a CSV path table and a highlighted DOT subgraph ([`report`]).
//!
//! Upstream stages (rule parsing, channel inference, topology filtering,
//! rendering) are external collaborators; this crate only consumes their
//! graph description and produces artifacts for them.

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod logic;
pub mod metrics;
pub mod models;
pub mod parse;
pub mod report;
pub mod search;

pub use error::{GraphError, GraphResult};
pub use graph::GraphModel;
pub use logic::{GatePolicy, LogicResolver};
pub use models::{AnalysisReport, ScoredPath, Warning};
pub use search::{find_all_paths, SearchOptions, SearchOutcome};
