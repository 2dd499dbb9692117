//! Report Building
//!
//! Constructs the complete report from suite executions.

use super::execution::{ExecutionConfig, SuiteExecution};
use super::metadata::build_report_meta;
use parserank_report::{FixtureInfo, Report, ReportConfig, ReportSummary, SuiteReport};

/// Build a complete Report from suite executions
pub fn build_report(
    executions: &[SuiteExecution],
    config: &ExecutionConfig,
    total_duration_ms: f64,
) -> Report {
    let suites: Vec<SuiteReport> = executions
        .iter()
        .map(|e| {
            let fixture = FixtureInfo {
                path: e.fixture.path.display().to_string(),
                rows: e.fixture.rows,
                quotes: e.fixture.quotes,
                bytes: e.fixture.bytes,
            };
            SuiteReport::new(&e.suite.name, fixture, &e.run, &e.rankings)
        })
        .collect();

    let summary = ReportSummary::from_suites(&suites, total_duration_ms);
    let meta = build_report_meta(ReportConfig {
        cycles: config.timing.cycles(),
        tolerance_ms: config.tolerance.millis(),
    });

    Report {
        meta,
        suites,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::fixtures::Fixture;
    use parserank_core::{Failure, Measurement, SuiteRun};
    use parserank_rank::rank_all;

    #[test]
    fn test_build_report() {
        let config = ExecutionConfig::default();
        let run = SuiteRun {
            measurements: vec![
                Measurement::measured("a", 10.0),
                Measurement::failed("b", Failure::crashed("boom")),
            ],
            skipped: vec!["c".to_string()],
        };
        let rankings = rank_all(&run.measurements, config.tolerance);
        let execution = SuiteExecution {
            suite: SuiteConfig::new("tiny", 2, false),
            fixture: Fixture {
                path: "fixtures/tiny.csv".into(),
                rows: 2,
                quotes: false,
                bytes: 20,
            },
            run,
            rankings,
            duration_ms: 5.0,
        };

        let report = build_report(&[execution], &config, 5.0);

        assert_eq!(report.meta.config.cycles, 10);
        assert_eq!(report.meta.config.tolerance_ms, 250.0);
        assert_eq!(report.suites[0].name, "tiny");
        assert_eq!(report.suites[0].banded[1].name, "b");
        assert_eq!(report.summary.crashed, 1);
        assert_eq!(report.summary.skipped, 1);
    }
}
