//! CLI command definitions and handlers

mod analyze;
mod init;
mod inspect;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logic::GatePolicy;
use crate::metrics::CriticalityMode;
use crate::report::OutputFormat;

/// Parse and validate a positive limit.
fn parse_limit(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("limit must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// Ruletrace - attack path analysis for automation rules
#[derive(Parser, Debug)]
#[command(name = "ruletrace")]
#[command(
    version,
    about = "Graph-powered attack path analysis — enumerate and score exploitable interaction chains between automation rules",
    long_about = "Ruletrace consumes the interaction graph an upstream pipeline derives from \
automation rules (triggers, actions, implicit channels, AND/OR gates) and answers: \
which chains of interactions reach a chosen target node, and how feasible is each \
chain?\n\n\
Every acyclic source-to-target path is enumerated under the configured gating \
policy, scored for cost, stealth, length, and criticality, then exported as a CSV \
table plus a highlighted DOT subgraph for the external renderer.",
    after_help = "\
Examples:
  ruletrace analyze --graph building.dot --target A_Rule_58_0 --out paths.csv
  ruletrace analyze --graph building.dot --target A_Rule_58_0 --out paths.csv --dot-out paths.dot
  ruletrace analyze --graph building.dot --target CH_door_contact_state --out paths.csv --format json
  ruletrace inspect --graph building.dot
  ruletrace init

Exit code 0 on success (an unreachable target is a valid result);
non-zero with a descriptive message on malformed input or export failure."
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enumerate and score every attack path into a target node
    #[command(after_help = "\
Examples:
  ruletrace analyze --graph building.dot --target A_Rule_58_0 --out paths.csv
  ruletrace analyze --graph building.dot --target A_Rule_58_0 --out paths.csv --max-paths 500
  ruletrace analyze --graph building.dot --target A_Rule_58_0 --out paths.csv --criticality-mode mean
  ruletrace analyze --graph building.dot --target A_Rule_58_0 --out paths.csv --gating lenient")]
    Analyze {
        /// Path to the graph description (DOT)
        #[arg(long)]
        graph: PathBuf,

        /// Target node id to trace paths into
        #[arg(long)]
        target: String,

        /// Destination for the CSV path table
        #[arg(long, short = 'o')]
        out: PathBuf,

        /// Also write the highlighted path subgraph (DOT) here
        #[arg(long)]
        dot_out: Option<PathBuf>,

        /// Path budget (default from config: 10000)
        #[arg(long, value_parser = parse_limit)]
        max_paths: Option<usize>,

        /// Depth limit in edges (default from config: 64)
        #[arg(long, value_parser = parse_limit)]
        max_depth: Option<usize>,

        /// How node centralities aggregate per path: mean or max
        #[arg(long, value_parser = ["mean", "max"])]
        criticality_mode: Option<String>,

        /// Gate policy for degenerate AND gates: strict or lenient
        #[arg(long, value_parser = ["strict", "lenient"])]
        gating: Option<String>,

        /// Console output format: text or json (default from config)
        #[arg(long, short = 'f', value_parser = ["text", "json"])]
        format: Option<String>,

        /// Config file (default: ./ruletrace.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Summarize a graph description: node/edge kinds, sources, central nodes
    Inspect {
        /// Path to the graph description (DOT)
        #[arg(long)]
        graph: PathBuf,

        /// How many top-centrality nodes to list
        #[arg(long, default_value = "10", value_parser = parse_limit)]
        top: usize,
    },

    /// Write a ruletrace.toml with the default settings
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// Dispatch a parsed CLI invocation.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            graph,
            target,
            out,
            dot_out,
            max_paths,
            max_depth,
            criticality_mode,
            gating,
            format,
            config,
        } => {
            // Values were validated by clap; this converts them to types.
            let criticality_mode = criticality_mode
                .map(|s| s.parse::<CriticalityMode>())
                .transpose()
                .map_err(anyhow::Error::msg)?;
            let gating = gating
                .map(|s| s.parse::<GatePolicy>())
                .transpose()
                .map_err(anyhow::Error::msg)?;
            let format = format.map(|s| s.parse::<OutputFormat>()).transpose()?;
            analyze::run(analyze::AnalyzeOptions {
                graph,
                target,
                out,
                dot_out,
                max_paths,
                max_depth,
                criticality_mode,
                gating,
                format,
                config,
            })
        }
        Commands::Inspect { graph, top } => inspect::run(&graph, top),
        Commands::Init { path } => init::run(&path),
    }
}
