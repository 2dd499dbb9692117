//! Tolerance Band Width

use serde::{Deserialize, Serialize};

/// Default band width in milliseconds
pub const DEFAULT_TOLERANCE_MS: f64 = 250.0;

/// Maximum elapsed-time difference, in milliseconds, that is not treated as
/// a meaningful speed difference
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    /// Zero-width band: only exactly equal timings are close
    pub const ZERO: Tolerance = Tolerance(0.0);

    /// Create a tolerance; must be finite and non-negative
    pub fn new(millis: f64) -> Result<Self, ToleranceError> {
        if !millis.is_finite() {
            return Err(ToleranceError::NotFinite(millis));
        }
        if millis < 0.0 {
            return Err(ToleranceError::Negative(millis));
        }
        Ok(Tolerance(millis))
    }

    /// Band width in milliseconds
    pub fn millis(self) -> f64 {
        self.0
    }

    /// Whether two timings are within the band of each other (inclusive)
    #[inline]
    pub fn admits(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance(DEFAULT_TOLERANCE_MS)
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = ToleranceError;

    fn try_from(millis: f64) -> Result<Self, Self::Error> {
        Tolerance::new(millis)
    }
}

impl From<Tolerance> for f64 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ms", self.0)
    }
}

/// Invalid tolerance value
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ToleranceError {
    /// Below zero
    #[error("tolerance must be non-negative, got {0} ms")]
    Negative(f64),
    /// NaN or infinite
    #[error("tolerance must be finite, got {0} ms")]
    NotFinite(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert_eq!(Tolerance::new(-1.0), Err(ToleranceError::Negative(-1.0)));
        assert!(matches!(
            Tolerance::new(f64::NAN),
            Err(ToleranceError::NotFinite(_))
        ));
        assert!(Tolerance::new(f64::INFINITY).is_err());
        assert_eq!(Tolerance::new(0.0).unwrap(), Tolerance::ZERO);
        assert_eq!(Tolerance::default().millis(), DEFAULT_TOLERANCE_MS);
    }

    #[test]
    fn test_admits_is_inclusive() {
        let t = Tolerance::new(250.0).unwrap();
        assert!(t.admits(100.0, 350.0));
        assert!(t.admits(350.0, 100.0));
        assert!(!t.admits(100.0, 350.5));
        assert!(Tolerance::ZERO.admits(5.0, 5.0));
        assert!(!Tolerance::ZERO.admits(5.0, 5.000_001));
    }
}
