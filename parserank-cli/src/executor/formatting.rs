//! Output Formatting
//!
//! Human-readable output for suite reports: per-candidate results with
//! status icons (✓/✗/💥/⊘), both ranking lines and a summary.

use parserank_report::{CandidateStatus, Report, format_millis, format_ranking};

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("ParseRank Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for suite in &report.suites {
        let style = if suite.fixture.quotes { "quoted" } else { "plain" };
        output.push_str(&format!(
            "Suite: {} ({} rows, {})\n",
            suite.name, suite.fixture.rows, style
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        let width = suite
            .candidates
            .iter()
            .map(|c| c.name.len())
            .chain(suite.skipped.iter().map(String::len))
            .max()
            .unwrap_or(12);

        for candidate in &suite.candidates {
            let status_icon = match candidate.status {
                CandidateStatus::Passed => "✓",
                CandidateStatus::Rejected => "✗",
                CandidateStatus::Crashed => "💥",
            };
            let elapsed = candidate
                .elapsed_ms
                .map(format_millis)
                .unwrap_or_else(|| candidate.status.to_string());
            output.push_str(&format!(
                "  {} {:<width$}  {:>12}\n",
                status_icon,
                candidate.name,
                elapsed,
                width = width
            ));

            if let Some(failure) = &candidate.failure {
                output.push_str(&format!(
                    "      error ({}): {}\n",
                    failure.phase, failure.message
                ));
            }
        }
        for name in &suite.skipped {
            output.push_str(&format!("  ⊘ {:<width$}  {:>12}\n", name, "skipped", width = width));
        }

        output.push_str(&format!("\n  Ranking (strict): {}\n", format_ranking(&suite.strict)));
        output.push_str(&format!(
            "  Ranking (±{}): {}\n\n",
            format_millis(suite.tolerance_ms),
            format_ranking(&suite.banded)
        ));
    }

    // Summary
    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Suites: {}  Candidates: {}  Passed: {}  Crashed: {}  Rejected: {}  Skipped: {}\n",
        report.summary.total_suites,
        report.summary.total_candidates,
        report.summary.passed,
        report.summary.crashed,
        report.summary.rejected,
        report.summary.skipped
    ));
    output.push_str(&format!(
        "  Cycles: {}  Duration: {}\n",
        report.meta.config.cycles,
        format_millis(report.summary.total_duration_ms)
    ));

    output
}
