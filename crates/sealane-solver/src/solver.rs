//! Backtracking placement search.
//!
//! One cursor walks the envelope list; each envelope holds a shuffled
//! candidate list and a persistent pointer into it. Advancing places a
//! candidate that survives the pairwise checks against everything already
//! placed; exhausting an envelope's candidates discards the previous
//! placement and retreats. The search is finite because every candidate
//! domain is bounded (at most 181 integer offsets per seed) and a pointer
//! only advances on success. No partial scenario ever escapes: a
//! [`Scenario`] is returned only once the cursor passes the last envelope.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use sealane_core::config::{
    EncounterStage, GeneratorConfig, MeetingSituation, SafetyThresholds,
};
use sealane_core::constants::MAX_ATTEMPTS;
use sealane_core::enums::{
    BearingConvention, CrossTargetPolicy, DangerIntent, OwnShipPolicy,
};
use sealane_core::errors::SolveError;
use sealane_core::types::{
    EncounterEnvelope, GeoPoint, Kinematics, OwnShip, Scenario, TargetShip,
};
use sealane_geo::encounter;

use crate::placement::{self, sample_tenths, PlacementSeed};

/// How candidate seeds are produced for each envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// One uniformly sampled seed per envelope.
    #[default]
    Sampled,
    /// A shuffled discretized grid of bearing/distance/speed seeds.
    Grid,
}

/// Per-solve options.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    pub own_policy: OwnShipPolicy,
    pub cross_policy: CrossTargetPolicy,
    pub convention: BearingConvention,
    pub mode: SearchMode,
    /// Bound on every resample-and-retry loop.
    pub max_attempts: u32,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            own_policy: OwnShipPolicy::default(),
            cross_policy: CrossTargetPolicy::default(),
            convention: BearingConvention::default(),
            mode: SearchMode::default(),
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

/// Sample the own ship: fixed position, uniform speed in the window at
/// 0.1 kn resolution, uniform course.
pub fn sample_own_ship(
    rng: &mut ChaCha8Rng,
    pos: GeoPoint,
    sog_min: f64,
    sog_max: f64,
) -> OwnShip {
    let sog = sample_tenths(rng, sog_min, sog_max);
    let cog = rng.gen_range(0..3600) as f64 * 0.1;
    OwnShip {
        pos,
        kin: Kinematics::new(sog, cog),
    }
}

/// Split a global target-speed window into one descending band per target,
/// so earlier targets are the faster ones.
pub fn speed_bands(sog_min: f64, sog_max: f64, count: usize) -> Vec<(f64, f64)> {
    let step = (sog_max - sog_min) / count as f64;
    (0..count)
        .map(|i| {
            (
                sog_max - step * (i as f64 + 1.0),
                sog_max - step * i as f64,
            )
        })
        .collect()
}

/// Build an envelope from a meeting-situation template and a target-speed
/// window. A stage override narrows the distance window.
pub fn envelope_from_situation(
    situation: &MeetingSituation,
    stage: Option<&EncounterStage>,
    sog: (f64, f64),
    intent: DangerIntent,
) -> EncounterEnvelope {
    let (dist_min, dist_max) = match stage {
        Some(s) => (s.dist_min, s.dist_max),
        None => (situation.dist_min, situation.dist_max),
    };
    EncounterEnvelope {
        rel_brg_min: situation.rel_brg_min,
        rel_brg_max: situation.rel_brg_max,
        dist_min,
        dist_max,
        sog_min: sog.0,
        sog_max: sog.1,
        intent,
    }
}

/// Per-envelope intent after the own-ship policy is applied.
fn effective_intent(
    policy: OwnShipPolicy,
    index: usize,
    envelope_intent: DangerIntent,
) -> DangerIntent {
    match policy {
        OwnShipPolicy::NoDangerForAll => DangerIntent::NoDanger,
        OwnShipPolicy::DangerForAll => DangerIntent::Danger,
        OwnShipPolicy::AtLeastOneDanger if index == 0 => DangerIntent::Danger,
        OwnShipPolicy::AtLeastOneDanger => DangerIntent::Unconstrained,
        OwnShipPolicy::Random => envelope_intent,
    }
}

/// Pairwise geodesic separation floor between placed targets.
pub(crate) fn pair_is_separated(
    a: &TargetShip,
    b: &TargetShip,
    thresholds: &SafetyThresholds,
) -> bool {
    let (dist_nm, _) = encounter::distance_and_bearing(a.pos, b.pos);
    dist_nm >= thresholds.min_separation_nm
}

/// Whether a target pair is mutually safe: the closest point has already
/// passed, or it stays outside the inter-target DCPA threshold.
///
/// The course arguments of the pairwise CPA receive the ships' speeds — a
/// suspected copy/paste defect, kept for output compatibility until a
/// domain owner confirms the intended semantics.
pub(crate) fn pair_is_safe(
    a: &TargetShip,
    b: &TargetShip,
    thresholds: &SafetyThresholds,
) -> bool {
    let kin_a = Kinematics::new(a.kin.sog, a.kin.sog);
    let kin_b = Kinematics::new(b.kin.sog, b.kin.sog);
    let cpa = encounter::compute_cpa(a.pos, b.pos, kin_a, kin_b);
    if cpa.tcpa_min < 0.0 {
        return true;
    }
    cpa.dcpa_nm > thresholds.inter_target_dcpa_nm
}

/// Evaluate a tentative target set against the cross-target policy.
/// Any pair closer than the separation floor fails regardless of policy.
pub(crate) fn check_cross_policy(
    targets: &[TargetShip],
    policy: CrossTargetPolicy,
    thresholds: &SafetyThresholds,
) -> bool {
    if targets.len() <= 1 {
        return true;
    }
    let mut dangerous_pairs = 0usize;
    let mut total_pairs = 0usize;
    for i in 0..targets.len() {
        for j in (i + 1)..targets.len() {
            if !pair_is_separated(&targets[i], &targets[j], thresholds) {
                return false;
            }
            let safe = pair_is_safe(&targets[i], &targets[j], thresholds);
            match policy {
                CrossTargetPolicy::DangerForAll if safe => return false,
                CrossTargetPolicy::NoDangerForAll if !safe => return false,
                _ => {}
            }
            total_pairs += 1;
            if !safe {
                dangerous_pairs += 1;
            }
        }
    }
    match policy {
        CrossTargetPolicy::NoDangerForAll => dangerous_pairs == 0,
        CrossTargetPolicy::DangerForAll => dangerous_pairs == total_pairs,
        CrossTargetPolicy::AtLeastOneDanger => dangerous_pairs > 0,
        CrossTargetPolicy::Random => true,
    }
}

/// One envelope's search state.
struct EnvelopeSearch {
    /// Candidate seeds; sampled mode has one, grid mode up to 27.
    seeds: Vec<PlacementSeed>,
    /// Flattened (seed, δ) candidates in shuffled search order.
    candidates: Vec<(usize, i32)>,
    /// Next untried candidate. Persists across retreats; only a successful
    /// placement advances it.
    cursor: usize,
}

impl EnvelopeSearch {
    fn build(
        rng: &mut ChaCha8Rng,
        own: OwnShip,
        envelope: &EncounterEnvelope,
        intent: DangerIntent,
        thresholds: &SafetyThresholds,
        options: &SolverOptions,
        index: usize,
    ) -> Result<Self, SolveError> {
        let seeds = match options.mode {
            SearchMode::Sampled => vec![PlacementSeed::sample_admissible(
                rng,
                own,
                envelope,
                intent,
                thresholds,
                options.max_attempts,
                index,
            )?],
            SearchMode::Grid => placement::grid_seeds(rng, own, envelope, thresholds)
                .into_iter()
                .filter(|seed| seed.admits(intent))
                .collect(),
        };

        let mut candidates = Vec::new();
        for (seed_idx, seed) in seeds.iter().enumerate() {
            for delta in seed.candidate_deltas(intent, rng) {
                candidates.push((seed_idx, delta));
            }
        }
        if candidates.is_empty() {
            return Err(SolveError::EmptyCandidateRange {
                index,
                attempts: options.max_attempts,
            });
        }

        Ok(Self {
            seeds,
            candidates,
            cursor: 0,
        })
    }
}

/// Place one target per envelope so that each satisfies its effective danger
/// intent and the whole set satisfies the cross-target policy.
///
/// Candidate domains are derived once per envelope up front; the backtracking
/// cursor then walks the envelope list as described in the module header.
pub fn solve(
    rng: &mut ChaCha8Rng,
    own: OwnShip,
    envelopes: &[EncounterEnvelope],
    config: &GeneratorConfig,
    options: &SolverOptions,
) -> Result<Scenario, SolveError> {
    if envelopes.is_empty() {
        return Err(SolveError::NoEnvelopes);
    }
    let thresholds = &config.thresholds;

    let mut searches = Vec::with_capacity(envelopes.len());
    for (index, envelope) in envelopes.iter().enumerate() {
        let intent = effective_intent(options.own_policy, index, envelope.intent);
        searches.push(EnvelopeSearch::build(
            rng, own, envelope, intent, thresholds, options, index,
        )?);
    }

    let mut placed: Vec<TargetShip> = Vec::new();
    let mut idx = 0usize;
    loop {
        let search = &mut searches[idx];
        let mut advanced = false;
        let mut i = search.cursor;
        while i < search.candidates.len() {
            let (seed_idx, delta) = search.candidates[i];
            let candidate = search.seeds[seed_idx].place(delta, options.convention);
            placed.push(candidate);
            if check_cross_policy(&placed, options.cross_policy, thresholds) {
                search.cursor = i + 1;
                advanced = true;
                break;
            }
            placed.pop();
            i += 1;
        }

        if advanced {
            idx += 1;
            if idx == searches.len() {
                return Ok(Scenario {
                    own,
                    targets: placed,
                });
            }
        } else {
            if idx == 0 {
                log::debug!("placement search exhausted the first envelope");
                return Err(SolveError::Exhausted);
            }
            placed.pop();
            idx -= 1;
        }
    }
}

/// Generate a scenario end to end: sample the own ship, solve, and retry the
/// whole attempt a bounded number of times before reporting failure.
pub fn generate(
    rng: &mut ChaCha8Rng,
    anchor: GeoPoint,
    own_sog: (f64, f64),
    envelopes: &[EncounterEnvelope],
    config: &GeneratorConfig,
    options: &SolverOptions,
) -> Result<Scenario, SolveError> {
    for _ in 0..options.max_attempts {
        let own = sample_own_ship(rng, anchor, own_sog.0, own_sog.1);
        match solve(rng, own, envelopes, config, options) {
            Ok(scenario) => return Ok(scenario),
            Err(e @ SolveError::NoEnvelopes) => return Err(e),
            Err(e) => log::debug!("scenario attempt failed: {e}"),
        }
    }
    Err(SolveError::AttemptsExceeded {
        attempts: options.max_attempts,
    })
}
