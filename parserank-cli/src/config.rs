//! Configuration loading from parserank.toml
//!
//! ParseRank configuration can be specified in a `parserank.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use anyhow::Context;
use parserank_core::{DEFAULT_CYCLES, TimingConfig};
use parserank_rank::Tolerance;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// ParseRank configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseRankConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Fixture generation
    #[serde(default)]
    pub fixtures: FixturesConfig,
    /// Suites to run, in order
    #[serde(default = "default_suites", rename = "suite")]
    pub suites: Vec<SuiteConfig>,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for ParseRankConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            fixtures: FixturesConfig::default(),
            suites: default_suites(),
            output: OutputConfig::default(),
        }
    }
}

/// Runner configuration for suite execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Timed cycles per candidate, after one warm-up invocation
    #[serde(default = "default_cycles")]
    pub cycles: i64,
    /// Band width of the tolerance ranking (e.g., "250ms", "0.5s")
    #[serde(default = "default_tolerance")]
    pub tolerance: String,
    /// Exit with status 1 when any candidate fails
    #[serde(default)]
    pub fail_on_crash: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            cycles: default_cycles(),
            tolerance: default_tolerance(),
            fail_on_crash: false,
        }
    }
}

fn default_cycles() -> i64 {
    i64::from(DEFAULT_CYCLES)
}
fn default_tolerance() -> String {
    "250ms".to_string()
}

/// Fixture generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesConfig {
    /// Directory generated fixtures are written to
    #[serde(default = "default_fixture_dir")]
    pub directory: String,
    /// Columns per row, including the index column
    #[serde(default = "default_columns")]
    pub columns: usize,
    /// Seed text mixed into generated cell content
    #[serde(default = "default_seed")]
    pub seed: String,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            directory: default_fixture_dir(),
            columns: default_columns(),
            seed: default_seed(),
        }
    }
}

fn default_fixture_dir() -> String {
    "target/parserank/fixtures".to_string()
}
fn default_columns() -> usize {
    6
}
fn default_seed() -> String {
    "lorem ipsum dolor sit amet".to_string()
}

/// One suite: a fixture shape every candidate parses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Suite name, used for filtering and in reports
    pub name: String,
    /// Data rows, excluding the header
    pub rows: u64,
    /// Whether text cells are quoted with embedded delimiters
    #[serde(default)]
    pub quotes: bool,
}

impl SuiteConfig {
    /// Construct a suite entry
    pub fn new(name: impl Into<String>, rows: u64, quotes: bool) -> Self {
        Self {
            name: name.into(),
            rows,
            quotes,
        }
    }
}

fn default_suites() -> Vec<SuiteConfig> {
    [(1_000, "1k"), (10_000, "10k"), (100_000, "100k")]
        .into_iter()
        .flat_map(|(rows, label)| {
            [
                SuiteConfig::new(format!("{label}-plain"), rows, false),
                SuiteConfig::new(format!("{label}-quoted"), rows, true),
            ]
        })
        .collect()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Output directory for reports
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_output_dir(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_output_dir() -> String {
    "target/parserank".to_string()
}

impl ParseRankConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Discover and load configuration by walking up from the current directory.
    ///
    /// Returns `Ok(None)` when no `parserank.toml` exists. A file that is
    /// found but does not parse is an error.
    pub fn discover() -> anyhow::Result<Option<Self>> {
        Self::discover_from(&std::env::current_dir()?)
    }

    /// Walk up from `start` and load the first `parserank.toml`
    pub fn discover_from(start: &Path) -> anyhow::Result<Option<Self>> {
        for dir in start.ancestors() {
            let config_path = dir.join("parserank.toml");
            if config_path.exists() {
                let config = Self::load(&config_path)
                    .with_context(|| format!("invalid config {}", config_path.display()))?;
                return Ok(Some(config));
            }
        }
        Ok(None)
    }

    /// Validated timing configuration
    pub fn timing(&self) -> anyhow::Result<TimingConfig> {
        Ok(TimingConfig::new(self.runner.cycles)?)
    }

    /// Validated ranking tolerance
    pub fn tolerance(&self) -> anyhow::Result<Tolerance> {
        let ms = Self::parse_duration(&self.runner.tolerance)?;
        Ok(Tolerance::new(ms)?)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# ParseRank Configuration

[runner]
# Timed cycles per candidate (one untimed warm-up runs first)
cycles = 10
# Timings within this band of every band member share a position
tolerance = "250ms"
# Exit with status 1 when any candidate crashes or is rejected
fail_on_crash = false

[fixtures]
# Where generated fixtures are written (existing files are reused)
directory = "target/parserank/fixtures"
# Columns per row, including the leading index column
columns = 6
# Seed text for cell content
seed = "lorem ipsum dolor sit amet"

[output]
# Default output format: human, json, csv
format = "human"
# Output directory for reports
directory = "target/parserank"

# Suites run in the order listed
[[suite]]
name = "1k-plain"
rows = 1000

[[suite]]
name = "1k-quoted"
rows = 1000
quotes = true

[[suite]]
name = "10k-plain"
rows = 10000

[[suite]]
name = "10k-quoted"
rows = 10000
quotes = true

[[suite]]
name = "100k-plain"
rows = 100000

[[suite]]
name = "100k-quoted"
rows = 100000
quotes = true
"#
        .to_string()
    }

    /// Parse duration string (e.g., "250ms", "1.5s", "100us") to milliseconds.
    ///
    /// A bare number is taken as milliseconds.
    pub fn parse_duration(s: &str) -> anyhow::Result<f64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "ms"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;

        let multiplier = match unit_part.to_lowercase().as_str() {
            "ns" => 1e-6,
            "us" | "µs" => 1e-3,
            "ms" => 1.0,
            "s" => 1_000.0,
            "m" | "min" => 60_000.0,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(value * multiplier)
    }
}
