//! Init command - write a default configuration file

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crate::config;

/// Run the init command.
pub fn run(path: &Path) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(config::FILE_NAME);
    if config_path.exists() {
        println!(
            "{} {} already exists at {}",
            style("✓").green(),
            config::FILE_NAME,
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, config::EXAMPLE)
        .with_context(|| "Failed to create config file")?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!(
        "  {} Summarize a graph",
        style("ruletrace inspect --graph <graph.dot>").cyan()
    );
    println!(
        "  {} Trace paths into a target",
        style("ruletrace analyze --graph <graph.dot> --target <nodeId> --out paths.csv").cyan()
    );

    Ok(())
}
