//! Project-level configuration support
//!
//! Loads per-project configuration from a `ruletrace.toml` in the
//! working directory (or a path supplied via `--config`). Every field
//! has a sane default, so the file is optional; CLI flags override
//! whatever the file says.
//!
//! # Configuration Format
//!
//! ```toml
//! # ruletrace.toml
//!
//! [search]
//! max_paths = 10000
//! max_depth = 64
//! gating = "strict"       # or "lenient"
//!
//! [weights.explicit]
//! cost = 1.0
//! stealth = 1.0
//!
//! [weights.system_implicit]
//! cost = 3.0
//! stealth = 2.0
//!
//! [weights.physical_implicit]
//! cost = 5.0
//! stealth = 3.0
//!
//! [criticality]
//! mode = "max"            # or "mean"
//!
//! [output]
//! format = "text"         # or "json"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::logic::GatePolicy;
use crate::metrics::{CriticalityMode, WeightTable};
use crate::search::SearchOptions;

/// Default config file name, looked up in the working directory.
pub const FILE_NAME: &str = "ruletrace.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub weights: WeightTable,
    pub criticality: CriticalityConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Path budget; enumeration stops (and the result is marked
    /// truncated) once this many paths exist.
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,
    /// Longest admissible path, in edges.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// How degenerate AND gates are resolved.
    #[serde(default)]
    pub gating: GatePolicy,
}

fn default_max_paths() -> usize {
    10_000
}

fn default_max_depth() -> usize {
    64
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_paths: default_max_paths(),
            max_depth: default_max_depth(),
            gating: GatePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalityConfig {
    pub mode: CriticalityMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist and parse. Without one,
    /// `ruletrace.toml` in the working directory is used when present,
    /// defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let fallback = PathBuf::from(FILE_NAME);
                if !fallback.exists() {
                    debug!("no {} found, using defaults", FILE_NAME);
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Search limits as the enumerator consumes them.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_paths: self.search.max_paths,
            max_depth: self.search.max_depth,
        }
    }
}

/// Commented default config, written by `ruletrace init`.
pub const EXAMPLE: &str = r#"# Ruletrace configuration
# Every value below is the built-in default; delete anything you do not
# want to pin.

[search]
# Path budget: enumeration stops once this many paths exist and the
# result set is marked truncated.
max_paths = 10000

# Longest admissible path, in edges.
max_depth = 64

# Degenerate AND gates (declared with fewer than two inputs):
# "strict" treats them as broken (no traversal), "lenient" collapses
# them into a pass-through.
gating = "strict"

# Default edge weights by kind; a declared cost=/stealth= attribute on
# an edge always wins. Gate-input edges cost 0 and carry no stealth.
[weights.explicit]
cost = 1.0
stealth = 1.0

[weights.system_implicit]
cost = 3.0
stealth = 2.0

[weights.physical_implicit]
cost = 5.0
stealth = 3.0

[criticality]
# How node centralities aggregate into a path's criticality:
# "max" (the most central node dominates) or "mean".
mode = "max"

[output]
# Console format: "text" or "json".
format = "text"
"#;
