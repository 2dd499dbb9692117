#![warn(missing_docs)]
//! ParseRank Ranking Engine
//!
//! Converts noisy elapsed-time measurements into ordinal positions:
//! - Strict policy: one position per measurement by sort order
//! - Tolerance-banded policy: timings within a fixed band of every band
//!   member share a position, absorbing run-to-run jitter
//! - Failed measurements always take the last positions, never tied
//!
//! Both policies are pure functions of the measurement set.

mod policy;
mod ranking;
mod tolerance;

pub use policy::RankPolicy;
pub use ranking::{RankedMeasurement, Rankings, rank, rank_all, sort_for_ranking};
pub use tolerance::{DEFAULT_TOLERANCE_MS, Tolerance, ToleranceError};
