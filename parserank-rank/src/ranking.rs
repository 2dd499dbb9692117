//! Rank Assignment
//!
//! Both policies share one skeleton:
//!
//! 1. Sort ascending by elapsed time, failures last, equal values by name.
//! 2. Walk the sorted list. Entry `i` keeps the previous entry's position
//!    iff the policy lets it join the previous entry AND every other entry
//!    already confirmed in the current band. Otherwise it takes the next
//!    position and opens a new band.
//!
//! Under [`RankPolicy::Strict`] nothing ever joins, so positions are
//! `1..=n`. Under [`RankPolicy::Banded`] the all-members check anchors each
//! band to one tolerance envelope: `100, 340, 580` with a 250 ms band gives
//! positions `1, 1, 2` because 580 is too far from 100, even though it is
//! close to 340.
//!
//! Membership is first-come: a newcomer is checked against confirmed
//! members only; earlier members are not re-validated against it.
//!
//! Inputs are normalized first, so a hand-built `Measured(NaN)` ranks as a
//! crash and a negative time as zero.

use crate::policy::RankPolicy;
use crate::tolerance::Tolerance;
use parserank_core::{Elapsed, Measurement};
use serde::{Deserialize, Serialize};

/// A measurement with its rank position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMeasurement {
    /// 1-based position; tied entries share it
    pub position: u32,
    /// Candidate name
    pub name: String,
    /// Mean elapsed time or failure
    pub elapsed: Elapsed,
}

/// Ranked output of both policies over one measurement set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    /// Strict positions
    pub strict: Vec<RankedMeasurement>,
    /// Tolerance-banded positions
    pub banded: Vec<RankedMeasurement>,
    /// Band width used for `banded`
    pub tolerance: Tolerance,
}

/// Sort measurements into ranking order.
///
/// Ascending elapsed time, failures after all timed entries, exact ties
/// broken by name so the result does not depend on input order.
pub fn sort_for_ranking(measurements: &[Measurement]) -> Vec<&Measurement> {
    let mut sorted: Vec<&Measurement> = measurements.iter().collect();
    sorted.sort_by(|a, b| {
        a.elapsed
            .cmp_rank(&b.elapsed)
            .then_with(|| a.name.cmp(&b.name))
    });
    sorted
}

/// Assign positions under `policy`.
///
/// The returned sequence is in ascending position order. An empty input
/// yields an empty output.
pub fn rank(measurements: &[Measurement], policy: &RankPolicy) -> Vec<RankedMeasurement> {
    let normalized = normalize(measurements);
    let sorted = sort_for_ranking(&normalized);
    walk_bands(&sorted, policy)
}

/// Rank under both policies at once
pub fn rank_all(measurements: &[Measurement], tolerance: Tolerance) -> Rankings {
    let normalized = normalize(measurements);
    let sorted = sort_for_ranking(&normalized);
    Rankings {
        strict: walk_bands(&sorted, &RankPolicy::Strict),
        banded: walk_bands(&sorted, &RankPolicy::Banded(tolerance)),
        tolerance,
    }
}

fn normalize(measurements: &[Measurement]) -> Vec<Measurement> {
    measurements
        .iter()
        .map(|m| Measurement::new(m.name.clone(), m.elapsed.normalized()))
        .collect()
}

fn walk_bands(sorted: &[&Measurement], policy: &RankPolicy) -> Vec<RankedMeasurement> {
    let mut ranked: Vec<RankedMeasurement> = Vec::with_capacity(sorted.len());
    let mut band_start = 0;

    for (i, current) in sorted.iter().enumerate() {
        let position = match ranked.last() {
            None => 1,
            Some(prev) => {
                let joins_prev = policy.joins(&prev.elapsed, &current.elapsed);
                // band = [band_start, i - 2]; `prev` at i - 1 is checked above
                let joins_band = sorted[band_start..i - 1]
                    .iter()
                    .all(|member| policy.joins(&member.elapsed, &current.elapsed));

                if joins_prev && joins_band {
                    prev.position
                } else {
                    band_start = i;
                    prev.position + 1
                }
            }
        };

        ranked.push(RankedMeasurement {
            position,
            name: current.name.clone(),
            elapsed: current.elapsed.clone(),
        });
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use parserank_core::Failure;

    fn set(values: &[(&str, f64)]) -> Vec<Measurement> {
        values
            .iter()
            .map(|(name, ms)| Measurement::measured(*name, *ms))
            .collect()
    }

    fn positions(ranked: &[RankedMeasurement]) -> Vec<(&str, u32)> {
        ranked.iter().map(|r| (r.name.as_str(), r.position)).collect()
    }

    fn t(ms: f64) -> RankPolicy {
        RankPolicy::Banded(Tolerance::new(ms).unwrap())
    }

    #[test]
    fn test_close_pair_shares_position() {
        let m = set(&[("A", 100.0), ("B", 120.0), ("C", 600.0)]);

        assert_eq!(
            positions(&rank(&m, &t(250.0))),
            [("A", 1), ("B", 1), ("C", 2)]
        );
        assert_eq!(
            positions(&rank(&m, &RankPolicy::Strict)),
            [("A", 1), ("B", 2), ("C", 3)]
        );
    }

    #[test]
    fn test_band_is_anchored_not_chained() {
        // Adjacent gaps are 240 each, but C is 480 away from A
        let m = set(&[("A", 100.0), ("B", 340.0), ("C", 580.0)]);
        assert_eq!(
            positions(&rank(&m, &t(250.0))),
            [("A", 1), ("B", 1), ("C", 2)]
        );
    }

    #[test]
    fn test_chain_of_small_gaps_splits_repeatedly() {
        let m = set(&[
            ("a", 0.0),
            ("b", 200.0),
            ("c", 400.0),
            ("d", 600.0),
            ("e", 800.0),
        ]);
        // {a,b} -> c too far from a, opens band {c,d} -> e too far from c
        assert_eq!(
            positions(&rank(&m, &t(250.0))),
            [("a", 1), ("b", 1), ("c", 2), ("d", 2), ("e", 3)]
        );
    }

    #[test]
    fn test_membership_is_first_come() {
        // b joins a; c is close to b but not to a, so c opens a new band
        // even though {b, c} alone would fit within the tolerance.
        let m = set(&[("a", 0.0), ("b", 100.0), ("c", 200.0)]);
        assert_eq!(
            positions(&rank(&m, &t(150.0))),
            [("a", 1), ("b", 1), ("c", 2)]
        );
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let m = set(&[("a", 100.0), ("b", 350.0)]);
        assert_eq!(positions(&rank(&m, &t(250.0))), [("a", 1), ("b", 1)]);
    }

    #[test]
    fn test_failed_is_last_in_both_policies() {
        let mut m = set(&[("fast", 10.0), ("slow", 90_000.0)]);
        m.insert(0, Measurement::failed("X", Failure::crashed("warm-up")));

        let rankings = rank_all(&m, Tolerance::new(1e12).unwrap());

        assert_eq!(
            positions(&rankings.strict),
            [("fast", 1), ("slow", 2), ("X", 3)]
        );
        assert_eq!(
            positions(&rankings.banded),
            [("fast", 1), ("slow", 1), ("X", 2)]
        );
    }

    #[test]
    fn test_out_of_range_values_are_normalized() {
        let m = vec![
            Measurement::new("nan", Elapsed::Measured(f64::NAN)),
            Measurement::new("neg", Elapsed::Measured(-5.0)),
            Measurement::measured("a", 100.0),
        ];
        let ranked = rank(&m, &t(250.0));

        assert_eq!(positions(&ranked), [("neg", 1), ("a", 1), ("nan", 2)]);
        assert_eq!(ranked[0].elapsed, Elapsed::Measured(0.0));
        assert!(ranked[2].elapsed.is_failed());
    }

    #[test]
    fn test_failures_never_tie_with_each_other() {
        let m = vec![
            Measurement::failed("z", Failure::crashed("x")),
            Measurement::measured("a", 1.0),
            Measurement::failed("y", Failure::rejected("sum")),
        ];
        let ranked = rank(&m, &t(250.0));
        assert_eq!(positions(&ranked), [("a", 1), ("y", 2), ("z", 3)]);
    }

    #[test]
    fn test_empty_input() {
        let rankings = rank_all(&[], Tolerance::default());
        assert!(rankings.strict.is_empty());
        assert!(rankings.banded.is_empty());
    }

    #[test]
    fn test_single_measurement() {
        let m = set(&[("only", 42.0)]);
        assert_eq!(positions(&rank(&m, &RankPolicy::Strict)), [("only", 1)]);
        assert_eq!(positions(&rank(&m, &t(0.0))), [("only", 1)]);
    }

    #[test]
    fn test_equal_values_ordered_by_name_in_both_policies() {
        let m = set(&[("b", 5.0), ("a", 5.0), ("c", 1.0)]);
        let rankings = rank_all(&m, Tolerance::ZERO);

        assert_eq!(
            positions(&rankings.strict),
            [("c", 1), ("a", 2), ("b", 3)]
        );
        // Zero tolerance still merges exactly equal timings
        assert_eq!(
            positions(&rankings.banded),
            [("c", 1), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let m = set(&[("a", 100.0), ("b", 300.0), ("c", 320.0), ("d", 900.0)]);
        let mut reversed = m.clone();
        reversed.reverse();

        assert_eq!(rank_all(&m, Tolerance::default()), rank_all(&reversed, Tolerance::default()));
    }

    #[test]
    fn test_ranking_does_not_mutate_input() {
        let m = set(&[("b", 2.0), ("a", 1.0)]);
        let before = m.clone();
        let _ = rank_all(&m, Tolerance::default());
        assert_eq!(m, before);
    }
}
