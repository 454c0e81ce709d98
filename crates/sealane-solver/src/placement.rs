//! Candidate seeds and target realization.
//!
//! A [`PlacementSeed`] is one sampled configuration for an envelope: the
//! distance, target kinematics, implied relative motion, and the danger
//! ranges derived from them. Realizing a seed at an offset angle δ yields a
//! fully populated [`TargetShip`].

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use sealane_core::config::SafetyThresholds;
use sealane_core::constants::{GRID_AXIS_SAMPLES, SAMPLE_STEP};
use sealane_core::enums::{BearingConvention, DangerIntent};
use sealane_core::errors::SolveError;
use sealane_core::types::{normalize_deg, EncounterEnvelope, Kinematics, OwnShip, TargetShip};
use sealane_geo::{encounter, geodesic};

use crate::danger::{derive_danger_ranges, DangerRanges};

/// Sample a value in [min, max] at 0.1 resolution.
pub(crate) fn sample_tenths(rng: &mut ChaCha8Rng, min: f64, max: f64) -> f64 {
    let lo = (min / SAMPLE_STEP).round() as i64;
    let hi = (max / SAMPLE_STEP).round() as i64;
    rng.gen_range(lo..=hi) as f64 * SAMPLE_STEP
}

/// One sampled placement configuration for an envelope.
#[derive(Debug, Clone)]
pub struct PlacementSeed {
    pub own: OwnShip,
    /// Raw relative-bearing sample from the envelope window (Bt).
    pub rel_brg_sampled: f64,
    /// Sampled distance from the own ship (nautical miles).
    pub dist_nm: f64,
    /// Trial target kinematics: the course points the target back toward the
    /// own ship through the sampled relative bearing.
    pub target_kin: Kinematics,
    /// Course of the target's motion relative to the own ship (degrees true).
    pub rel_course_deg: f64,
    /// Relative speed (knots).
    pub rel_speed_kn: f64,
    /// Danger ranges derived from this seed's distance and relative speed.
    pub ranges: DangerRanges,
}

impl PlacementSeed {
    /// Build a seed from explicit bearing/distance/speed samples.
    pub fn from_samples(
        own: OwnShip,
        rel_brg: f64,
        dist_nm: f64,
        tsog: f64,
        thresholds: &SafetyThresholds,
    ) -> Self {
        let tcog = normalize_deg(own.kin.cog + rel_brg + 180.0);
        let target_kin = Kinematics::new(tsog, tcog);
        let (rel_speed_kn, rel_course_deg) = encounter::relative_motion(own.kin, target_kin);
        let ranges = derive_danger_ranges(dist_nm, rel_speed_kn, thresholds);
        Self {
            own,
            rel_brg_sampled: rel_brg,
            dist_nm,
            target_kin,
            rel_course_deg,
            rel_speed_kn,
            ranges,
        }
    }

    /// Sample one seed uniformly from an envelope's windows.
    pub fn sample(
        rng: &mut ChaCha8Rng,
        own: OwnShip,
        envelope: &EncounterEnvelope,
        thresholds: &SafetyThresholds,
    ) -> Self {
        let dist_nm = sample_tenths(rng, envelope.dist_min, envelope.dist_max);
        let rel_brg = normalize_deg(sample_tenths(
            rng,
            envelope.rel_brg_min,
            envelope.rel_brg_max_unwrapped(),
        ));
        let tsog = sample_tenths(rng, envelope.sog_min, envelope.sog_max);
        Self::from_samples(own, rel_brg, dist_nm, tsog, thresholds)
    }

    /// Sample seeds until the derived ranges admit the requested intent,
    /// bounded by `max_attempts`.
    pub fn sample_admissible(
        rng: &mut ChaCha8Rng,
        own: OwnShip,
        envelope: &EncounterEnvelope,
        intent: DangerIntent,
        thresholds: &SafetyThresholds,
        max_attempts: u32,
        index: usize,
    ) -> Result<Self, SolveError> {
        for _ in 0..max_attempts {
            let seed = Self::sample(rng, own, envelope, thresholds);
            if seed.admits(intent) {
                return Ok(seed);
            }
        }
        Err(SolveError::EmptyCandidateRange {
            index,
            attempts: max_attempts,
        })
    }

    /// Whether this seed's ranges can serve the requested intent.
    pub fn admits(&self, intent: DangerIntent) -> bool {
        match intent {
            DangerIntent::Danger => !self.ranges.danger.is_empty(),
            DangerIntent::NoDanger => !self.ranges.no_danger.is_empty(),
            DangerIntent::Unconstrained => true,
        }
    }

    /// The shuffled integer-δ candidate domain for the requested intent.
    /// The shuffle is the only source of scenario diversity for fixed inputs.
    pub fn candidate_deltas(&self, intent: DangerIntent, rng: &mut ChaCha8Rng) -> Vec<i32> {
        let mut deltas = Vec::new();
        match intent {
            DangerIntent::Danger => push_intervals(&mut deltas, &self.ranges.danger),
            DangerIntent::NoDanger => push_intervals(&mut deltas, &self.ranges.no_danger),
            DangerIntent::Unconstrained => {
                push_intervals(&mut deltas, &self.ranges.danger);
                push_intervals(&mut deltas, &self.ranges.no_danger);
            }
        }
        deltas.shuffle(rng);
        deltas
    }

    /// Realize the target placed at offset `delta` from the reciprocal of
    /// the relative course. Every derived field is recomputed from the
    /// placed state, so the record is internally consistent.
    pub fn place(&self, delta: i32, convention: BearingConvention) -> TargetShip {
        let bearing_deg = normalize_deg(self.rel_course_deg - 180.0 + f64::from(delta));
        let pos = geodesic::direct(self.own.pos, bearing_deg, self.dist_nm);
        let cpa = encounter::compute_cpa(self.own.pos, pos, self.own.kin, self.target_kin);

        // Two recorded conventions are in circulation: the raw window
        // sample (Bt) and the own-frame derivation (Bo). They diverge on
        // overtaken geometries; selectable until the intended correction
        // is confirmed.
        let rel_bearing_deg = match convention {
            BearingConvention::Sampled => self.rel_brg_sampled,
            BearingConvention::Derived => {
                normalize_deg(self.rel_course_deg - self.own.kin.cog)
            }
        };

        TargetShip {
            pos,
            kin: self.target_kin,
            dist_nm: self.dist_nm,
            bearing_deg,
            rel_bearing_deg,
            rel_course_deg: self.rel_course_deg,
            rel_speed_kn: self.rel_speed_kn,
            cpa,
        }
    }
}

fn push_intervals(deltas: &mut Vec<i32>, intervals: &[[i32; 2]]) {
    for &[lo, hi] in intervals {
        deltas.extend(lo..=hi);
    }
}

/// Discretized values across one window for grid mode: whole-unit strides
/// over the window, shuffled, at most [`GRID_AXIS_SAMPLES`] kept.
fn grid_axis(rng: &mut ChaCha8Rng, min: f64, max: f64) -> Vec<f64> {
    let lo = (min / SAMPLE_STEP).round() as i64;
    let hi = (max / SAMPLE_STEP).round() as i64;
    let mut step = (hi - lo) / 10;
    if step == 0 {
        step = 1;
    }
    let mut values: Vec<f64> = (lo..=hi)
        .step_by(step as usize)
        .map(|v| v as f64 * SAMPLE_STEP)
        .collect();
    values.shuffle(rng);
    values.truncate(GRID_AXIS_SAMPLES);
    values
}

/// Grid-mode seeds for one envelope: the cartesian product of shuffled
/// discretized bearing/distance/speed samples.
pub(crate) fn grid_seeds(
    rng: &mut ChaCha8Rng,
    own: OwnShip,
    envelope: &EncounterEnvelope,
    thresholds: &SafetyThresholds,
) -> Vec<PlacementSeed> {
    let brg_axis = grid_axis(rng, envelope.rel_brg_min, envelope.rel_brg_max_unwrapped());
    let dist_axis = grid_axis(rng, envelope.dist_min, envelope.dist_max);
    let sog_axis = grid_axis(rng, envelope.sog_min, envelope.sog_max);

    let mut seeds = Vec::with_capacity(brg_axis.len() * dist_axis.len() * sog_axis.len());
    for &rel_brg in &brg_axis {
        for &dist in &dist_axis {
            for &sog in &sog_axis {
                seeds.push(PlacementSeed::from_samples(
                    own,
                    normalize_deg(rel_brg),
                    dist,
                    sog,
                    thresholds,
                ));
            }
        }
    }
    seeds
}
