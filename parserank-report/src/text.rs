//! Ranking Lines
//!
//! Compact one-line rendering of a ranking: `1. a (12.00 ms) / 1. b (80.00 ms) / 2. c (failed: crashed)`.

use crate::report::{CandidateStatus, RankEntry};

/// Format a millisecond value with a unit suited to its magnitude
pub fn format_millis(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.2} s", ms / 1000.0)
    } else if ms >= 1.0 {
        format!("{:.2} ms", ms)
    } else {
        format!("{:.2} µs", ms * 1000.0)
    }
}

/// Format the elapsed column of an entry
pub fn format_entry_elapsed(status: CandidateStatus, elapsed_ms: Option<f64>) -> String {
    match (status, elapsed_ms) {
        (CandidateStatus::Passed, Some(ms)) => format_millis(ms),
        (status, _) => format!("failed: {}", status),
    }
}

/// Render a ranking in ascending position order
pub fn format_ranking(entries: &[RankEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            format!(
                "{}. {} ({})",
                e.position,
                e.name,
                format_entry_elapsed(e.status, e.elapsed_ms)
            )
        })
        .collect::<Vec<_>>()
        .join(" / ")
}
