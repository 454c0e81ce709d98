//! Danger-angle-range derivation.
//!
//! For a sampled distance `d` and relative speed `v`, the offset angle δ
//! measured from the reciprocal of the relative course determines the CPA:
//!
//! ```text
//! TCPA = d · cos δ / v · 60      TCPA ∈ [0, safe_tcpa] on an arccos interval
//! DCPA = d · sin δ               DCPA ≤ safe_dcpa on an arcsin interval
//! ```
//!
//! arccos is monotonically decreasing and arcsin monotonically increasing on
//! the domain, so each constraint is a single interval within [0°, 180°];
//! their combination is the danger range and its complement the no-danger
//! ranges. The ranges are a function of the trial kinematics, not fixed
//! geometry: they must be re-derived whenever the sampled target speed or
//! course changes.

use sealane_core::config::SafetyThresholds;
use sealane_core::constants::DELTA_MAX_DEG;

/// Integer-degree δ intervals (inclusive bounds) within [0, 180].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DangerRanges {
    /// Intervals where the placement is dangerous to the own ship.
    pub danger: Vec<[i32; 2]>,
    /// Complement intervals where it is not.
    pub no_danger: Vec<[i32; 2]>,
}

/// Derive the danger/no-danger δ intervals for one sampled configuration.
pub fn derive_danger_ranges(
    dist_nm: f64,
    rel_speed_kn: f64,
    thresholds: &SafetyThresholds,
) -> DangerRanges {
    // δ must sit above this bound for TCPA ≤ safe_tcpa (and below 90° for
    // TCPA ≥ 0).
    let cos_lo = (thresholds.safe_tcpa_min / dist_nm * rel_speed_kn / 60.0)
        .min(1.0)
        .acos()
        .to_degrees();
    let cos_hi = 0.0_f64.acos().to_degrees();

    // δ must sit below this bound for DCPA ≤ safe_dcpa.
    let sin_lo = 0.0_f64.asin().to_degrees();
    let sin_hi = (thresholds.safe_dcpa_nm / dist_nm).min(1.0).asin().to_degrees();

    let danger_interval = if cos_hi < sin_lo || sin_hi < cos_lo {
        // Disjoint: no δ satisfies both constraints.
        None
    } else if cos_lo <= sin_lo && cos_hi >= sin_hi {
        // DCPA interval nested inside the TCPA interval.
        Some([sin_lo, sin_hi])
    } else if sin_lo <= cos_lo && sin_hi >= cos_hi {
        // TCPA interval nested inside the DCPA interval.
        Some([cos_lo, cos_hi])
    } else {
        // Overlapping: the intersection.
        Some([cos_lo.max(sin_lo), cos_hi.min(sin_hi)])
    };

    let mut danger = Vec::new();
    let mut no_danger = Vec::new();
    match danger_interval {
        Some([lo, hi]) => {
            let lo = lo.round() as i32;
            let hi = hi.round() as i32;
            danger.push([lo, hi]);
            if lo > 0 {
                no_danger.push([0, lo - 1]);
            }
            if hi < DELTA_MAX_DEG {
                no_danger.push([hi + 1, DELTA_MAX_DEG]);
            }
        }
        None => no_danger.push([0, DELTA_MAX_DEG]),
    }

    DangerRanges { danger, no_danger }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> SafetyThresholds {
        SafetyThresholds::default()
    }

    #[test]
    fn test_disjoint_bounds_mean_no_danger() {
        // 14 NM at 4.5 kn relative: the TCPA window starts far above the
        // DCPA window's end, so no offset angle is dangerous.
        let ranges = derive_danger_ranges(14.0, 4.5, &thresholds());
        assert!(ranges.danger.is_empty());
        assert_eq!(ranges.no_danger, vec![[0, 180]]);
    }

    #[test]
    fn test_fast_closure_nests_dcpa_interval() {
        // 5 NM at 20 kn relative: TCPA stays under the threshold for every
        // forward δ, so the DCPA bound alone shapes the danger range.
        let ranges = derive_danger_ranges(5.0, 20.0, &thresholds());
        assert_eq!(ranges.danger, vec![[0, 24]]);
        assert_eq!(ranges.no_danger, vec![[25, 180]]);
    }

    #[test]
    fn test_short_range_nests_tcpa_interval() {
        // 1.5 NM at 0.5 kn relative: any forward placement is within the
        // DCPA bound, so the TCPA bound alone shapes the danger range.
        let ranges = derive_danger_ranges(1.5, 0.5, &thresholds());
        assert_eq!(ranges.danger, vec![[80, 90]]);
        assert_eq!(ranges.no_danger, vec![[0, 79], [91, 180]]);
    }

    #[test]
    fn test_overlapping_bounds_intersect() {
        // 4 NM at 7 kn relative: the two intervals genuinely overlap.
        let ranges = derive_danger_ranges(4.0, 7.0, &thresholds());
        assert_eq!(ranges.danger, vec![[29, 30]]);
        assert_eq!(ranges.no_danger, vec![[0, 28], [31, 180]]);
    }

    #[test]
    fn test_complements_cover_the_domain() {
        for (dist, speed) in [(14.0, 4.5), (5.0, 20.0), (1.5, 0.5), (4.0, 7.0), (8.0, 30.0)] {
            let ranges = derive_danger_ranges(dist, speed, &thresholds());
            let mut covered = vec![false; 181];
            for &[lo, hi] in ranges.danger.iter().chain(ranges.no_danger.iter()) {
                for d in lo..=hi {
                    assert!(
                        !covered[d as usize],
                        "δ={d} covered twice at d={dist}, v={speed}"
                    );
                    covered[d as usize] = true;
                }
            }
            assert!(
                covered.iter().all(|&c| c),
                "δ domain not fully covered at d={dist}, v={speed}"
            );
        }
    }

    #[test]
    fn test_zero_distance_is_total() {
        // Degenerate distance must not divide to NaN; the whole forward
        // quadrant becomes dangerous.
        let ranges = derive_danger_ranges(0.0, 10.0, &thresholds());
        assert_eq!(ranges.danger, vec![[0, 90]]);
    }
}
