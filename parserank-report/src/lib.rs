#![warn(missing_docs)]
//! ParseRank Report - Reporting
//!
//! Generates output formats for ranked suite results:
//! - JSON (machine-readable, round-trips)
//! - CSV (one row per ranked candidate and policy)
//! - Ranking lines (`position. name (elapsed)` joined by ` / `)

mod csv_report;
mod json;
mod report;
mod text;

pub use csv_report::{CSV_HEADER, generate_csv_report};
pub use json::{generate_json_report, parse_json_report};
pub use report::{
    CandidateReport, CandidateStatus, FailureInfo, FixtureInfo, RankEntry, Report, ReportConfig,
    ReportMeta, ReportSummary, SuiteReport,
};
pub use text::{format_entry_elapsed, format_millis, format_ranking};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
