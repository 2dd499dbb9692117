#![warn(missing_docs)]
//! # ParseRank
//!
//! Benchmark interchangeable implementations of one task and rank them with
//! an ordering that tolerates run-to-run jitter.
//!
//! - **Timer**: one untimed warm-up invocation, then a fixed number of timed
//!   cycles; the mean per cycle is the candidate's elapsed time
//! - **Failure isolation**: a candidate that errors, panics or produces
//!   output the validator rejects is recorded as failed; the suite continues
//! - **Two rankings**: strict (`1..=n`) and tolerance-banded, where timings
//!   within a band of every band member share a position
//! - **CSV parser suites**: the bundled CLI generates fixtures and races six
//!   CSV parsing strategies against each other
//!
//! ## Quick Start
//!
//! ```ignore
//! use parserank::prelude::*;
//!
//! let mut suite: Suite<u64> = Suite::new(|sum: &u64| {
//!     anyhow::ensure!(*sum == 4950, "Test Failed. Sum: {}", sum);
//!     Ok(())
//! })
//! .with_candidate(Candidate::new("iter-sum", || async { Ok((0..100u64).sum()) }))
//! .with_candidate(Candidate::new("fold", || async { Ok((0..100u64).fold(0, |a, b| a + b)) }));
//!
//! let run = suite.run(&(), &TimingConfig::new(10)?).await?;
//! let rankings = rank_all(&run.measurements, Tolerance::new(250.0)?);
//! println!("{}", format_ranking(&rankings.banded.iter().map(RankEntry::from).collect::<Vec<_>>()));
//! ```

// Re-export core types
pub use parserank_core::{
    Candidate, CandidateFuture, ConfigError, DEFAULT_CYCLES, Elapsed, Failure, FailureKind,
    FailurePhase, Measurement, NoProgress, Suite, SuiteProgress, SuiteRun, Timer, TimingConfig,
    duration_to_millis, time_operation,
};

// Re-export ranking
pub use parserank_rank::{
    DEFAULT_TOLERANCE_MS, RankPolicy, RankedMeasurement, Rankings, Tolerance, ToleranceError,
    rank, rank_all, sort_for_ranking,
};

// Re-export reporting
pub use parserank_report::{
    OutputFormat, RankEntry, Report, SuiteReport, format_millis, format_ranking,
    generate_csv_report, generate_json_report,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Candidate, Elapsed, Failure, Measurement, RankEntry, RankPolicy, Suite, TimingConfig,
        Tolerance, format_ranking, rank, rank_all,
    };
}

/// CSV parser candidates, fixtures and the suite executor
pub mod parsers {
    pub use parserank_cli::{
        ExecutionConfig, Executor, Fixture, FixtureSpec, Rows, SuiteConfig, SuiteParams,
        build_plan, build_report, candidates, check_rows, ensure_fixture, expected_checksum,
        parser_suite,
    };
}

/// Run the ParseRank CLI.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     parserank::run()
/// }
/// ```
pub use parserank_cli::run;
