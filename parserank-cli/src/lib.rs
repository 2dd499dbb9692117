#![warn(missing_docs)]
//! ParseRank CLI Library
//!
//! Generates CSV fixtures, times every parser candidate against them and
//! prints both rankings per suite. Use `parserank_cli::run()` (or
//! `parserank::run()`) in a main function to get the full CLI.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     parserank_cli::run()
//! }
//! ```

mod config;
mod executor;
mod fixtures;
mod parsers;
mod planner;

pub use config::*;
pub use executor::{
    ExecutionConfig, Executor, SuiteExecution, build_report, build_report_meta,
    format_human_output,
};
pub use fixtures::{
    Fixture, FixtureError, FixtureSpec, check_rows, ensure_fixture, expected_checksum,
    write_fixture,
};
pub use parsers::{
    Rows, SuiteParams, candidates, parse_csv_byte_records, parse_csv_records, parse_memchr,
    parse_quote_aware, parse_str_split, parse_tokio_lines, parser_suite,
};
pub use planner::{ExecutionPlan, build_plan};

use clap::{Parser, Subcommand};
use parserank_report::{
    OutputFormat, Report, generate_csv_report, generate_json_report,
};
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

/// ParseRank CLI arguments
#[derive(Parser, Debug)]
#[command(name = "parserank")]
#[command(author, version, about = "ParseRank - rank CSV parsers by measured speed")]
pub struct Cli {
    /// Optional subcommand (Run, List, Generate, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter candidates by regex pattern
    #[arg(long)]
    pub filter: Option<String>,

    /// Filter suites by regex pattern
    #[arg(long)]
    pub suite: Option<String>,

    /// Timed cycles per candidate (overrides parserank.toml)
    #[arg(long)]
    pub cycles: Option<i64>,

    /// Ranking tolerance, e.g. "250ms" (overrides parserank.toml)
    #[arg(long)]
    pub tolerance: Option<String>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the JSON report to the configured output directory
    #[arg(long)]
    pub save: bool,

    /// Fixture directory (overrides parserank.toml)
    #[arg(long)]
    pub fixture_dir: Option<PathBuf>,

    /// Configuration file (default: discover parserank.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run suites and print rankings (default)
    Run,
    /// List planned suites and their candidates
    List,
    /// Generate fixtures without running anything
    Generate,
    /// Print a default parserank.toml
    Init,
}

/// Run the ParseRank CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the ParseRank CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Logs go to stderr, reports to stdout
    let filter = if cli.verbose {
        "parserank=debug"
    } else {
        "parserank=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let command = cli.command.unwrap_or(Commands::Run);
    if command == Commands::Init {
        print!("{}", ParseRankConfig::default_toml());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    let plan = plan_from_cli(&cli, &config)?;

    match command {
        Commands::List => list_suites(&plan, &config),
        Commands::Generate => generate_fixtures(&plan, &config),
        Commands::Run | Commands::Init => {
            let failed = run_suites(&cli, &config, &plan)?;
            if failed && config.runner.fail_on_crash {
                eprintln!("\nCandidate(s) crashed or were rejected");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// Load parserank.toml and layer CLI overrides on top.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<ParseRankConfig> {
    let mut config = match &cli.config {
        Some(path) => ParseRankConfig::load(path)?,
        None => ParseRankConfig::discover()?.unwrap_or_default(),
    };

    if let Some(cycles) = cli.cycles {
        config.runner.cycles = cycles;
    }
    if let Some(tolerance) = &cli.tolerance {
        config.runner.tolerance = tolerance.clone();
    }
    if let Some(format) = &cli.format {
        config.output.format = format.clone();
    }
    if let Some(dir) = &cli.fixture_dir {
        config.fixtures.directory = dir.display().to_string();
    }

    // Fail fast on invalid timing before any fixture work
    config.timing()?;
    config.tolerance()?;
    Ok(config)
}

/// Build the execution plan from CLI filters
pub fn plan_from_cli(cli: &Cli, config: &ParseRankConfig) -> anyhow::Result<ExecutionPlan> {
    let suite_filter = cli.suite.as_deref().map(Regex::new).transpose()?;
    let candidate_filter = cli.filter.as_deref().map(Regex::new).transpose()?;
    Ok(build_plan(
        &config.suites,
        suite_filter.as_ref(),
        candidate_filter,
    ))
}

fn list_suites(plan: &ExecutionPlan, config: &ParseRankConfig) -> anyhow::Result<()> {
    println!("ParseRank Plan:");

    let exec_config = ExecutionConfig::new(config.timing()?, config.tolerance()?, &config.fixtures);
    let mut total = 0;
    for suite in &plan.suites {
        let style = if suite.quotes { "quoted" } else { "plain" };
        println!("├── suite: {} ({} rows, {})", suite.name, suite.rows, style);

        let params = SuiteParams {
            rows: suite.rows,
            quotes: suite.quotes,
        };
        let path = exec_config.fixture_dir.join(exec_config.fixture_spec(suite).file_name());
        for candidate in candidates(&path) {
            if !plan.selects_candidate(candidate.name()) {
                continue;
            }
            if candidate.is_excluded(&params) {
                println!("│   ├── {} (skipped)", candidate.name());
            } else {
                println!("│   ├── {}", candidate.name());
                total += 1;
            }
        }
    }

    println!("{} suites, {} timed candidates.", plan.suites.len(), total);
    Ok(())
}

fn generate_fixtures(plan: &ExecutionPlan, config: &ParseRankConfig) -> anyhow::Result<()> {
    let exec_config = ExecutionConfig::new(config.timing()?, config.tolerance()?, &config.fixtures);
    for suite in &plan.suites {
        let fixture = ensure_fixture(&exec_config.fixture_dir, &exec_config.fixture_spec(suite))?;
        println!(
            "{}: {} ({} bytes)",
            suite.name,
            fixture.path.display(),
            fixture.bytes
        );
    }
    Ok(())
}

/// Run the plan and emit the report. Returns whether any candidate failed.
fn run_suites(cli: &Cli, config: &ParseRankConfig, plan: &ExecutionPlan) -> anyhow::Result<bool> {
    if plan.suites.is_empty() {
        println!("No suites found.");
        return Ok(false);
    }

    let format: OutputFormat = config.output.format.parse().unwrap_or_else(|e| {
        warn!("{}; falling back to human output", e);
        OutputFormat::Human
    });
    let exec_config = ExecutionConfig::new(config.timing()?, config.tolerance()?, &config.fixtures);

    eprintln!(
        "Running {} suites, {} cycles per candidate...\n",
        plan.suites.len(),
        exec_config.timing.cycles()
    );

    let start_time = Instant::now();
    let executions = Executor::new(exec_config.clone())
        .with_progress(!cli.no_progress)
        .execute(plan)?;

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let report = build_report(&executions, &exec_config, total_duration_ms);

    let output = render_report(&report, format)?;
    if let Some(ref path) = cli.output {
        write_file(path, &output)?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    if cli.save {
        let path = Path::new(&config.output.directory).join("latest.json");
        write_file(&path, &generate_json_report(&report)?)?;
        eprintln!("JSON report saved to: {}", path.display());
    }

    Ok(report.summary.has_failures())
}

/// Render a report in the requested format
pub fn render_report(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report)?,
        OutputFormat::Human => format_human_output(report),
    })
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("parserank").chain(args.iter().copied())).unwrap()
    }

    fn config_file(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("parserank.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_parse_subcommands() {
        assert_eq!(parse(&[]).command, None);
        assert_eq!(parse(&["list"]).command, Some(Commands::List));
        assert_eq!(parse(&["generate"]).command, Some(Commands::Generate));
        assert_eq!(parse(&["init"]).command, Some(Commands::Init));

        let cli = parse(&["--cycles", "3", "--filter", "^csv", "run"]);
        assert_eq!(cli.command, Some(Commands::Run));
        assert_eq!(cli.cycles, Some(3));
        assert_eq!(cli.filter.as_deref(), Some("^csv"));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(
            dir.path(),
            "[runner]\ncycles = 4\ntolerance = \"1s\"\n\n[[suite]]\nname = \"a\"\nrows = 5\n",
        );
        let path = path.display().to_string();

        let config = resolve_config(&parse(&["--config", &path])).unwrap();
        assert_eq!(config.runner.cycles, 4);
        assert_eq!(config.tolerance().unwrap().millis(), 1000.0);

        let config = resolve_config(&parse(&[
            "--config",
            &path,
            "--cycles",
            "2",
            "--tolerance",
            "10ms",
            "--format",
            "json",
        ]))
        .unwrap();
        assert_eq!(config.runner.cycles, 2);
        assert_eq!(config.tolerance().unwrap().millis(), 10.0);
        assert_eq!(config.output.format, "json");
        assert_eq!(config.suites.len(), 1);
    }

    #[test]
    fn test_invalid_overrides_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file(dir.path(), "");
        let path = path.display().to_string();

        assert!(resolve_config(&parse(&["--config", &path, "--cycles", "0"])).is_err());
        assert!(resolve_config(&parse(&["--config", &path, "--tolerance=-1ms"])).is_err());
    }

    #[test]
    fn test_plan_from_cli_filters() {
        let config = ParseRankConfig::default();
        let plan = plan_from_cli(&parse(&["--suite", "quoted$", "--filter", "quote"]), &config).unwrap();
        assert_eq!(plan.suites.len(), 3);
        assert!(plan.selects_candidate("quote-aware"));
        assert!(!plan.selects_candidate("csv-reader"));

        assert!(plan_from_cli(&parse(&["--suite", "("]), &config).is_err());
    }

    #[test]
    fn test_run_suites_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let fixtures = dir.path().join("fixtures");
        let out = dir.path().join("out").join("report.csv");
        let mut config = ParseRankConfig::default();
        config.runner.cycles = 1;
        config.output.format = "csv".to_string();
        config.fixtures.directory = fixtures.display().to_string();
        config.suites = vec![SuiteConfig::new("small", 20, false)];

        let out_arg = out.display().to_string();
        let cli = parse(&["--no-progress", "--output", &out_arg]);
        let plan = plan_from_cli(&cli, &config).unwrap();

        let failed = run_suites(&cli, &config, &plan).unwrap();
        assert!(!failed);

        let csv = std::fs::read_to_string(&out).unwrap();
        assert!(csv.starts_with("suite,rows,quotes,policy,position,candidate,status,elapsed_ms"));
        // 6 candidates x 2 policies
        assert_eq!(csv.lines().count(), 1 + 12);
    }
}
