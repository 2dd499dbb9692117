//! Suite Executor
//!
//! Generates fixtures, runs each planned suite and ranks its measurements.
//!
//! ## Pipeline Overview
//!
//! ```text
//! SuiteConfig (from parserank.toml)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Fixture → Suite Runner → Rankings
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build Report with metadata
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Runs suites sequentially on a current-thread runtime
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - Report metadata

mod execution;
mod formatting;
mod metadata;
mod report;

// Re-export public API
pub use execution::{ExecutionConfig, Executor, SuiteExecution};
pub use formatting::format_human_output;
pub use metadata::build_report_meta;
pub use report::build_report;
