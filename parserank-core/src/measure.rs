//! Wall-Clock Timing
//!
//! Candidates are timed as a block of cycles, so a monotonic wall clock is
//! all the harness needs. Cycle counters are not used: a cycle block spans
//! file I/O and scheduler suspensions where TSC readings mean little.

use std::time::{Duration, Instant};

/// Timer for measuring a block of cycles
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return the elapsed wall-clock time
    #[inline(always)]
    pub fn stop(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Convert a duration to fractional milliseconds
#[inline]
pub fn duration_to_millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
