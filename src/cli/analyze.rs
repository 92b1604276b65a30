//! Analyze command - the full path discovery and scoring pipeline
//!
//! Orchestrates: load config, build the graph model, enumerate paths
//! under the gating policy, score graph and paths, export artifacts,
//! print the summary. Warnings are accumulated on the report and never
//! dropped; an export failure is raised only after the computed results
//! have been shown to the caller.

use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{GraphError, GraphResult};
use crate::graph::GraphModel;
use crate::logic::{GatePolicy, LogicResolver};
use crate::metrics::{betweenness, score_paths, CriticalityMode};
use crate::models::{AnalysisReport, ReportSummary, Warning};
use crate::report::{self, OutputFormat};
use crate::search::{find_all_paths, SearchOutcome};

pub struct AnalyzeOptions {
    pub graph: PathBuf,
    pub target: String,
    pub out: PathBuf,
    pub dot_out: Option<PathBuf>,
    pub max_paths: Option<usize>,
    pub max_depth: Option<usize>,
    pub criticality_mode: Option<CriticalityMode>,
    pub gating: Option<GatePolicy>,
    pub format: Option<OutputFormat>,
    pub config: Option<PathBuf>,
}

pub fn run(opts: AnalyzeOptions) -> Result<()> {
    let config = Config::load(opts.config.as_deref())?;

    // CLI flags override the config file.
    let mut search_options = config.search_options();
    if let Some(max_paths) = opts.max_paths {
        search_options.max_paths = max_paths;
    }
    if let Some(max_depth) = opts.max_depth {
        search_options.max_depth = max_depth;
    }
    let policy = opts.gating.unwrap_or(config.search.gating);
    let mode = opts.criticality_mode.unwrap_or(config.criticality.mode);
    let format = match opts.format {
        Some(format) => format,
        None => config.output.format.parse()?,
    };

    let description = std::fs::read_to_string(&opts.graph)
        .with_context(|| format!("Failed to read graph description {}", opts.graph.display()))?;
    let model = GraphModel::build(&description)?;
    info!(
        nodes = model.node_count(),
        edges = model.edge_count(),
        "graph model built"
    );

    let target = model
        .node_by_id(&opts.target)
        .ok_or_else(|| GraphError::UnknownTarget(opts.target.clone()))?;

    let mut report = AnalysisReport::new(opts.graph.display().to_string(), opts.target.as_str());

    let resolver = LogicResolver::new(policy);
    for (node, in_degree) in resolver.degenerate_gates(&model) {
        let warning = Warning::DegenerateGate {
            node: model.node(node).id.clone(),
            in_degree,
        };
        warn!("{}", warning);
        report.warnings.push(warning);
    }

    let outcome = find_all_paths(&model, &resolver, target, &search_options);
    if outcome.truncated {
        let warning = Warning::PathLimitExceeded {
            limit: search_options.max_paths,
            found: outcome.paths.len(),
        };
        warn!("{}", warning);
        report.warnings.push(warning);
    }
    if outcome.depth_clipped {
        let warning = Warning::DepthLimitReached {
            limit: search_options.max_depth,
        };
        warn!("{}", warning);
        report.warnings.push(warning);
    }
    if outcome.paths.is_empty() {
        let warning = Warning::UnreachableTarget {
            target: opts.target.clone(),
        };
        warn!("{}", warning);
        report.warnings.push(warning);
    }

    let centrality = betweenness(&model);
    report.paths = score_paths(&model, &outcome.paths, &centrality, mode, &config.weights);
    report.summary = ReportSummary {
        nodes: model.node_count(),
        edges: model.edge_count(),
        paths_found: report.paths.len(),
        truncated: outcome.truncated,
        warnings: report.warnings.len(),
    };

    // Report first, then export: if the destination turns out to be
    // unwritable the caller has still seen the computed results.
    match format {
        OutputFormat::Text => print!("{}", report::render(&report, OutputFormat::Text)?),
        OutputFormat::Json => println!("{}", report::render(&report, OutputFormat::Json)?),
    }

    export(&model, &outcome, &report, target, &opts)?;

    if format == OutputFormat::Text {
        println!(
            "{} Wrote path table to {}",
            style("✓").green(),
            style(opts.out.display()).cyan()
        );
        if let Some(dot_out) = &opts.dot_out {
            println!(
                "{} Wrote path subgraph to {}",
                style("✓").green(),
                style(dot_out.display()).cyan()
            );
        }
    }

    Ok(())
}

fn export(
    model: &GraphModel,
    outcome: &SearchOutcome,
    report: &AnalysisReport,
    target: petgraph::graph::NodeIndex,
    opts: &AnalyzeOptions,
) -> GraphResult<()> {
    report::csv::write(&report.paths, &opts.out)?;
    if let Some(dot_out) = &opts.dot_out {
        // Path ids are 1-based enumeration order, so the top-scoring
        // record maps straight back onto its raw path.
        let top_raw = report.top_path().and_then(|p| outcome.paths.get(p.id - 1));
        report::dot::write_subgraph(model, &outcome.paths, target, top_raw, dot_out)?;
    }
    Ok(())
}
