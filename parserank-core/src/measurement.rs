//! Measurement Model
//!
//! A measurement is either a finite mean duration or a failure. Failures are
//! a tagged variant rather than an infinite float so ordering rules stay
//! explicit: a failure sorts after every timed candidate and never compares
//! equal to one.

use crate::measure::duration_to_millis;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

/// Why a candidate could not be timed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The operation returned an error or panicked
    Crashed,
    /// The operation finished but the validator rejected its output
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Crashed => write!(f, "crashed"),
            FailureKind::Rejected => write!(f, "rejected"),
        }
    }
}

/// Which invocation of the operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePhase {
    /// The discarded warm-up call
    WarmUp,
    /// A measured cycle (1-based)
    Cycle(u32),
}

impl fmt::Display for FailurePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePhase::WarmUp => write!(f, "warm-up"),
            FailurePhase::Cycle(n) => write!(f, "cycle {}", n),
        }
    }
}

/// Failure details recorded for a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// Crash or rejection
    pub kind: FailureKind,
    /// Invocation that failed
    pub phase: FailurePhase,
    /// Error text (error chain or panic payload)
    pub message: String,
}

impl Failure {
    /// Failure caused by the operation itself
    pub fn crashed(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Crashed,
            phase: FailurePhase::WarmUp,
            message: message.into(),
        }
    }

    /// Failure caused by the validator rejecting the output
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Rejected,
            phase: FailurePhase::WarmUp,
            message: message.into(),
        }
    }

    /// Attach the invocation phase
    pub fn in_phase(mut self, phase: FailurePhase) -> Self {
        self.phase = phase;
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} during {}: {}", self.kind, self.phase, self.message)
    }
}

/// Elapsed time of a candidate: a mean over the measured cycles, or a failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "value")]
pub enum Elapsed {
    /// Mean milliseconds per cycle.
    ///
    /// Must be finite and non-negative. Build it with
    /// [`Elapsed::from_millis`]; the ranking engine passes every value
    /// through [`Elapsed::normalized`] before ordering.
    Measured(f64),
    /// The candidate could not be timed
    Failed(Failure),
}

impl Elapsed {
    /// Mean per cycle from the total time spent across `cycles` cycles
    pub fn from_total(total: Duration, cycles: u32) -> Self {
        let cycles = cycles.max(1);
        Elapsed::Measured(duration_to_millis(total) / f64::from(cycles))
    }

    /// Build a measured value from milliseconds.
    ///
    /// Negative values clamp to zero; NaN and infinite values are not
    /// measurements and are recorded as a crash.
    pub fn from_millis(millis: f64) -> Self {
        if millis.is_finite() {
            Elapsed::Measured(millis.max(0.0))
        } else {
            Elapsed::Failed(Failure::crashed(format!("non-finite elapsed time {}", millis)))
        }
    }

    /// Re-check a value that may have been built directly from the variant.
    ///
    /// Failures are returned unchanged; measured values go through
    /// [`Elapsed::from_millis`].
    pub fn normalized(&self) -> Self {
        match self {
            Elapsed::Measured(ms) => Elapsed::from_millis(*ms),
            Elapsed::Failed(failure) => Elapsed::Failed(failure.clone()),
        }
    }

    /// Milliseconds, if the candidate was timed
    pub fn millis(&self) -> Option<f64> {
        match self {
            Elapsed::Measured(ms) => Some(*ms),
            Elapsed::Failed(_) => None,
        }
    }

    /// Failure details, if the candidate was not timed
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Elapsed::Measured(_) => None,
            Elapsed::Failed(failure) => Some(failure),
        }
    }

    /// Whether the candidate failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Elapsed::Failed(_))
    }

    /// Ranking order: ascending time, failures after every measured value.
    ///
    /// Two failures compare equal here; callers break that tie themselves.
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Elapsed::Measured(a), Elapsed::Measured(b)) => a.total_cmp(b),
            (Elapsed::Measured(_), Elapsed::Failed(_)) => Ordering::Less,
            (Elapsed::Failed(_), Elapsed::Measured(_)) => Ordering::Greater,
            (Elapsed::Failed(_), Elapsed::Failed(_)) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Elapsed::Measured(ms) => write!(f, "{:.2} ms", ms),
            Elapsed::Failed(failure) => write!(f, "failed: {}", failure.kind),
        }
    }
}

/// One candidate's result within a suite run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Candidate name, unique within the run
    pub name: String,
    /// Mean elapsed time or failure
    pub elapsed: Elapsed,
}

impl Measurement {
    /// Create a measurement
    pub fn new(name: impl Into<String>, elapsed: Elapsed) -> Self {
        Self {
            name: name.into(),
            elapsed,
        }
    }

    /// Shorthand for a timed measurement
    pub fn measured(name: impl Into<String>, millis: f64) -> Self {
        Self::new(name, Elapsed::from_millis(millis))
    }

    /// Shorthand for a failed measurement
    pub fn failed(name: impl Into<String>, failure: Failure) -> Self {
        Self::new(name, Elapsed::Failed(failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total_averages_over_cycles() {
        let elapsed = Elapsed::from_total(Duration::from_millis(1000), 10);
        assert_eq!(elapsed.millis(), Some(100.0));
    }

    #[test]
    fn test_failed_sorts_after_any_measured() {
        let failed = Elapsed::Failed(Failure::crashed("boom"));
        let slow = Elapsed::Measured(f64::MAX);
        assert_eq!(slow.cmp_rank(&failed), Ordering::Less);
        assert_eq!(failed.cmp_rank(&slow), Ordering::Greater);
        assert_eq!(failed.cmp_rank(&failed), Ordering::Equal);
    }

    #[test]
    fn test_non_finite_millis_is_a_failure() {
        assert!(Elapsed::from_millis(f64::NAN).is_failed());
        assert!(Elapsed::from_millis(f64::INFINITY).is_failed());
        assert_eq!(Elapsed::from_millis(-3.0).millis(), Some(0.0));
        assert!(Elapsed::Measured(f64::NAN).normalized().is_failed());
        assert_eq!(Elapsed::Measured(-1.0).normalized(), Elapsed::Measured(0.0));
        assert_eq!(Elapsed::Measured(4.5).normalized(), Elapsed::Measured(4.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Elapsed::Measured(12.345).to_string(), "12.35 ms");
        let rejected = Elapsed::Failed(Failure::rejected("sum mismatch"));
        assert_eq!(rejected.to_string(), "failed: rejected");

        let failure = Failure::crashed("io").in_phase(FailurePhase::Cycle(3));
        assert_eq!(failure.to_string(), "crashed during cycle 3: io");
    }
}
