//! Report Metadata
//!
//! Stamps a report with its schema version, the ParseRank version and the
//! timing settings it was produced with.

use chrono::Utc;
use parserank_report::{ReportConfig, ReportMeta};

/// Schema version of the JSON report
pub const SCHEMA_VERSION: u32 = 1;

/// Build report metadata for a run with `config`
pub fn build_report_meta(config: ReportConfig) -> ReportMeta {
    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_carries_config() {
        let before = Utc::now();
        let meta = build_report_meta(ReportConfig {
            cycles: 3,
            tolerance_ms: 50.0,
        });
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        assert_eq!(meta.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(meta.config.cycles, 3);
        assert!(meta.timestamp >= before);
    }
}
