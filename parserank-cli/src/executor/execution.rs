//! Suite Execution
//!
//! Runs planned suites one after another on a single-threaded tokio
//! runtime. Each suite gets its fixture generated (or reused), its parser
//! candidates filtered by name, timed by the Suite Runner and ranked under
//! both policies.
//!
//! ## Data Flow
//!
//! ```text
//! SuiteConfig + ExecutionConfig
//!        │
//!        ▼
//!   ensure_fixture ──► parser_suite (filtered)
//!        │
//!        ▼
//!   Suite::run_with_progress  (warm-up + cycles per candidate)
//!        │
//!        ▼
//!   rank_all ──► SuiteExecution
//! ```

use crate::config::{FixturesConfig, SuiteConfig};
use crate::fixtures::{Fixture, FixtureSpec, ensure_fixture};
use crate::parsers::{SuiteParams, parser_suite};
use crate::planner::ExecutionPlan;
use indicatif::{ProgressBar, ProgressStyle};
use parserank_core::{Measurement, SuiteProgress, SuiteRun, TimingConfig};
use parserank_rank::{Rankings, Tolerance, rank_all};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Configuration for suite execution
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Cycles per candidate
    pub timing: TimingConfig,
    /// Band width of the tolerance ranking
    pub tolerance: Tolerance,
    /// Fixture directory
    pub fixture_dir: PathBuf,
    /// Columns per generated fixture row
    pub columns: usize,
    /// Seed text for generated cells
    pub seed: String,
}

impl ExecutionConfig {
    /// Execution settings from validated timing, tolerance and fixture config
    pub fn new(timing: TimingConfig, tolerance: Tolerance, fixtures: &FixturesConfig) -> Self {
        Self {
            timing,
            tolerance,
            fixture_dir: PathBuf::from(&fixtures.directory),
            columns: fixtures.columns,
            seed: fixtures.seed.clone(),
        }
    }

    /// Fixture shape for `suite`
    pub fn fixture_spec(&self, suite: &SuiteConfig) -> FixtureSpec {
        FixtureSpec {
            rows: suite.rows,
            quotes: suite.quotes,
            columns: self.columns,
            seed: self.seed.clone(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::new(
            TimingConfig::default(),
            Tolerance::default(),
            &FixturesConfig::default(),
        )
    }
}

/// Result from executing a single suite
#[derive(Debug)]
pub struct SuiteExecution {
    /// Suite as configured
    pub suite: SuiteConfig,
    /// Fixture the candidates parsed
    pub fixture: Fixture,
    /// Measurements in registration order plus skipped candidates
    pub run: SuiteRun,
    /// Both rankings of `run`
    pub rankings: Rankings,
    /// Wall time of the suite including fixture generation
    pub duration_ms: f64,
}

struct BarProgress {
    pb: ProgressBar,
}

impl SuiteProgress for BarProgress {
    fn candidate_started(&mut self, name: &str) {
        self.pb.set_message(name.to_string());
    }

    fn candidate_finished(&mut self, _measurement: &Measurement) {
        self.pb.inc(1);
    }

    fn candidate_skipped(&mut self, _name: &str) {
        self.pb.inc(1);
    }
}

/// Sequential suite executor
pub struct Executor {
    config: ExecutionConfig,
    show_progress: bool,
}

impl Executor {
    /// Create an executor
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            show_progress: true,
        }
    }

    /// Toggle the progress bar
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Execution settings
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Execute every planned suite on a fresh current-thread runtime
    pub fn execute(&self, plan: &ExecutionPlan) -> anyhow::Result<Vec<SuiteExecution>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.execute_async(plan))
    }

    /// Execute every planned suite in order
    pub async fn execute_async(&self, plan: &ExecutionPlan) -> anyhow::Result<Vec<SuiteExecution>> {
        let mut executions = Vec::with_capacity(plan.suites.len());
        for suite in &plan.suites {
            executions.push(self.execute_suite(suite, plan).await?);
        }
        Ok(executions)
    }

    /// Generate the fixture, run and rank one suite
    pub async fn execute_suite(
        &self,
        suite: &SuiteConfig,
        plan: &ExecutionPlan,
    ) -> anyhow::Result<SuiteExecution> {
        let start = Instant::now();
        info!(suite = %suite.name, rows = suite.rows, quotes = suite.quotes, "running suite");

        let fixture = ensure_fixture(&self.config.fixture_dir, &self.config.fixture_spec(suite))?;
        let mut candidates = parser_suite(&fixture.path, suite.rows);
        candidates.retain(|name| plan.selects_candidate(name));

        let progress = if self.show_progress {
            ProgressBar::new(candidates.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        let mut bar = BarProgress { pb: progress };

        let params = SuiteParams {
            rows: suite.rows,
            quotes: suite.quotes,
        };
        let run = candidates
            .run_with_progress(&params, &self.config.timing, &mut bar)
            .await?;
        bar.pb.finish_with_message(format!("{} complete", suite.name));

        let rankings = rank_all(&run.measurements, self.config.tolerance);

        Ok(SuiteExecution {
            suite: suite.clone(),
            fixture,
            run,
            rankings,
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::build_plan;
    use regex::Regex;

    fn config(dir: &std::path::Path) -> ExecutionConfig {
        ExecutionConfig {
            timing: TimingConfig::new(1).unwrap(),
            tolerance: Tolerance::default(),
            fixture_dir: dir.to_path_buf(),
            columns: 3,
            seed: "a b c".to_string(),
        }
    }

    #[test]
    fn test_execute_runs_suites_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let suites = [
            SuiteConfig::new("quoted", 50, true),
            SuiteConfig::new("plain", 50, false),
        ];
        let plan = build_plan(&suites, None, None);

        let executions = Executor::new(config(dir.path()))
            .with_progress(false)
            .execute(&plan)
            .unwrap();

        assert_eq!(executions.len(), 2);
        assert_eq!(executions[0].suite.name, "quoted");
        assert_eq!(executions[0].run.measurements.len(), 3);
        assert_eq!(executions[0].run.skipped.len(), 3);
        assert_eq!(executions[1].run.measurements.len(), 6);
        assert_eq!(executions[1].rankings.banded.len(), 6);
        assert!(executions[0].fixture.path.starts_with(dir.path()));
    }

    #[test]
    fn test_candidate_filter_applies() {
        let dir = tempfile::tempdir().unwrap();
        let suites = [SuiteConfig::new("plain", 10, false)];
        let plan = build_plan(&suites, None, Some(Regex::new("^csv-").unwrap()));

        let executions = Executor::new(config(dir.path()))
            .with_progress(false)
            .execute(&plan)
            .unwrap();

        let names: Vec<_> = executions[0]
            .run
            .measurements
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, ["csv-reader", "csv-byte-records"]);
    }
}
