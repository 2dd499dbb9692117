//! Ranking Policies

use crate::tolerance::Tolerance;
use parserank_core::Elapsed;
use serde::{Deserialize, Serialize};

/// How near-equal timings are grouped into shared positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "policy", content = "tolerance_ms")]
pub enum RankPolicy {
    /// One position per measurement, by sort order
    Strict,
    /// Measurements within the tolerance of every band member share a position
    Banded(Tolerance),
}

impl RankPolicy {
    /// Banded policy with the default tolerance
    pub fn banded() -> Self {
        RankPolicy::Banded(Tolerance::default())
    }

    /// Whether `candidate` may share a position with `member`.
    ///
    /// Failures never share a position with anything, including another
    /// failure.
    #[inline]
    pub(crate) fn joins(&self, member: &Elapsed, candidate: &Elapsed) -> bool {
        match (self, member.millis(), candidate.millis()) {
            (RankPolicy::Banded(tolerance), Some(a), Some(b)) => tolerance.admits(a, b),
            _ => false,
        }
    }

    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            RankPolicy::Strict => "strict",
            RankPolicy::Banded(_) => "banded",
        }
    }
}

impl std::fmt::Display for RankPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankPolicy::Strict => write!(f, "strict"),
            RankPolicy::Banded(tolerance) => write!(f, "banded (±{})", tolerance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parserank_core::Failure;

    #[test]
    fn test_strict_never_joins() {
        let a = Elapsed::Measured(10.0);
        assert!(!RankPolicy::Strict.joins(&a, &a));
    }

    #[test]
    fn test_banded_never_joins_failures() {
        let policy = RankPolicy::Banded(Tolerance::new(1e9).unwrap());
        let failed = Elapsed::Failed(Failure::crashed("x"));
        let measured = Elapsed::Measured(1.0);

        assert!(!policy.joins(&measured, &failed));
        assert!(!policy.joins(&failed, &measured));
        assert!(!policy.joins(&failed, &failed));
        assert!(policy.joins(&measured, &Elapsed::Measured(500.0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(RankPolicy::Strict.to_string(), "strict");
        assert_eq!(RankPolicy::banded().to_string(), "banded (±250 ms)");
    }
}
