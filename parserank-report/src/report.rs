//! Report Data Structures

use chrono::{DateTime, Utc};
use parserank_core::{Elapsed, FailureKind, Measurement, SuiteRun};
use parserank_rank::{RankedMeasurement, Rankings};
use serde::{Deserialize, Serialize};

/// Complete report over every suite of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub suites: Vec<SuiteReport>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Layout version of the serialized report
    pub schema_version: u32,
    /// ParseRank version that produced the report
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub config: ReportConfig,
}

/// Timing configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub cycles: u32,
    pub tolerance_ms: f64,
}

/// Fixture a suite ran against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureInfo {
    pub path: String,
    pub rows: u64,
    pub quotes: bool,
    pub bytes: u64,
}

/// One suite: per-candidate results in registration order plus both rankings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub name: String,
    pub fixture: FixtureInfo,
    pub candidates: Vec<CandidateReport>,
    pub skipped: Vec<String>,
    pub tolerance_ms: f64,
    pub strict: Vec<RankEntry>,
    pub banded: Vec<RankEntry>,
}

impl SuiteReport {
    /// Assemble a suite report from a run and its rankings
    pub fn new(name: impl Into<String>, fixture: FixtureInfo, run: &SuiteRun, rankings: &Rankings) -> Self {
        Self {
            name: name.into(),
            fixture,
            candidates: run.measurements.iter().map(CandidateReport::from).collect(),
            skipped: run.skipped.clone(),
            tolerance_ms: rankings.tolerance.millis(),
            strict: rankings.strict.iter().map(RankEntry::from).collect(),
            banded: rankings.banded.iter().map(RankEntry::from).collect(),
        }
    }
}

/// Candidate outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    Passed,
    Crashed,
    Rejected,
}

impl CandidateStatus {
    /// Status of an elapsed value
    pub fn of(elapsed: &Elapsed) -> Self {
        match elapsed.failure().map(|f| f.kind) {
            None => CandidateStatus::Passed,
            Some(FailureKind::Crashed) => CandidateStatus::Crashed,
            Some(FailureKind::Rejected) => CandidateStatus::Rejected,
        }
    }
}

impl std::fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateStatus::Passed => write!(f, "passed"),
            CandidateStatus::Crashed => write!(f, "crashed"),
            CandidateStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Failure information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    pub kind: String,
    pub phase: String,
    pub message: String,
}

/// Per-candidate result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateReport {
    pub name: String,
    pub status: CandidateStatus,
    pub elapsed_ms: Option<f64>,
    pub failure: Option<FailureInfo>,
}

impl From<&Measurement> for CandidateReport {
    fn from(m: &Measurement) -> Self {
        Self {
            name: m.name.clone(),
            status: CandidateStatus::of(&m.elapsed),
            elapsed_ms: m.elapsed.millis(),
            failure: m.elapsed.failure().map(|f| FailureInfo {
                kind: f.kind.to_string(),
                phase: f.phase.to_string(),
                message: f.message.clone(),
            }),
        }
    }
}

/// One line of a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub position: u32,
    pub name: String,
    pub status: CandidateStatus,
    pub elapsed_ms: Option<f64>,
}

impl From<&RankedMeasurement> for RankEntry {
    fn from(r: &RankedMeasurement) -> Self {
        Self {
            position: r.position,
            name: r.name.clone(),
            status: CandidateStatus::of(&r.elapsed),
            elapsed_ms: r.elapsed.millis(),
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_suites: usize,
    pub total_candidates: usize,
    pub passed: usize,
    pub crashed: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Count outcomes across suites
    pub fn from_suites(suites: &[SuiteReport], total_duration_ms: f64) -> Self {
        let mut summary = ReportSummary {
            total_suites: suites.len(),
            total_duration_ms,
            ..Default::default()
        };

        for suite in suites {
            summary.skipped += suite.skipped.len();
            for candidate in &suite.candidates {
                summary.total_candidates += 1;
                match candidate.status {
                    CandidateStatus::Passed => summary.passed += 1,
                    CandidateStatus::Crashed => summary.crashed += 1,
                    CandidateStatus::Rejected => summary.rejected += 1,
                }
            }
        }

        summary
    }

    /// Whether any candidate failed
    pub fn has_failures(&self) -> bool {
        self.crashed + self.rejected > 0
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use parserank_core::Failure;
    use parserank_rank::{Tolerance, rank_all};

    pub fn sample_report() -> Report {
        let run = SuiteRun {
            measurements: vec![
                Measurement::measured("csv-reader", 120.0),
                Measurement::failed("broken", Failure::crashed("no such file")),
                Measurement::measured("str-split", 100.0),
                Measurement::failed("wrong", Failure::rejected("Test Failed. Sum: 3")),
            ],
            skipped: vec!["tokio-lines".to_string()],
        };
        let rankings = rank_all(&run.measurements, Tolerance::default());
        let suite = SuiteReport::new(
            "1k-plain",
            FixtureInfo {
                path: "fixtures/rows-1000-plain.csv".to_string(),
                rows: 1000,
                quotes: false,
                bytes: 40_000,
            },
            &run,
            &rankings,
        );
        let suites = vec![suite];
        let summary = ReportSummary::from_suites(&suites, 1234.5);

        Report {
            meta: ReportMeta {
                schema_version: 1,
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                config: ReportConfig {
                    cycles: 10,
                    tolerance_ms: 250.0,
                },
            },
            suites,
            summary,
        }
    }
}
