//! CSV Output
//!
//! One row per (suite, policy, ranked candidate), suitable for spreadsheets.

use crate::report::Report;

/// Column header of the CSV report
pub const CSV_HEADER: [&str; 8] = [
    "suite",
    "rows",
    "quotes",
    "policy",
    "position",
    "candidate",
    "status",
    "elapsed_ms",
];

/// Generate a CSV report
pub fn generate_csv_report(report: &Report) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for suite in &report.suites {
        let rows = suite.fixture.rows.to_string();
        let quotes = suite.fixture.quotes.to_string();
        for (policy, entries) in [("strict", &suite.strict), ("banded", &suite.banded)] {
            for entry in entries {
                let elapsed = entry
                    .elapsed_ms
                    .map(|ms| format!("{:.3}", ms))
                    .unwrap_or_default();
                writer.write_record([
                    suite.name.as_str(),
                    rows.as_str(),
                    quotes.as_str(),
                    policy,
                    entry.position.to_string().as_str(),
                    entry.name.as_str(),
                    entry.status.to_string().as_str(),
                    elapsed.as_str(),
                ])?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
