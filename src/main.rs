//! Ruletrace - Graph-powered attack path analysis for automation rules
//!
//! Thin binary wrapper: initialize logging, parse CLI args, dispatch.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = ruletrace::cli::Cli::parse();

    // RUST_LOG wins over --log-level; logs go to stderr so stdout stays
    // clean for JSON output.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    ruletrace::cli::run(cli)
}
