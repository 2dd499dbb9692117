#![warn(missing_docs)]
//! ParseRank Core - Measurement Harness
//!
//! This crate times interchangeable candidate operations:
//! - `Measurement` / `Elapsed` model with failures as a tagged variant
//! - `time_operation` warm-up + fixed-cycle timing with panic and error isolation
//! - `Suite` runner: ordered candidates, shared validator, exclusion predicates
//!
//! Candidates run strictly one at a time. A candidate that errors, panics or
//! produces output the validator rejects is recorded as failed and the suite
//! moves on; only configuration errors abort a run.

mod error;
mod measure;
mod measurement;
mod suite;
mod timing;

pub use error::ConfigError;
pub use measure::{Timer, duration_to_millis};
pub use measurement::{Elapsed, Failure, FailureKind, FailurePhase, Measurement};
pub use suite::{Candidate, CandidateFuture, NoProgress, Suite, SuiteProgress, SuiteRun};
pub use timing::{DEFAULT_CYCLES, TimingConfig, time_operation};
