//! Enumeration types used throughout scenario generation.

use serde::{Deserialize, Serialize};

/// Danger intent for a single target against the own ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DangerIntent {
    /// The target must present a collision risk (TCPA ∈ [0, safe_tcpa],
    /// DCPA ≤ safe_dcpa).
    Danger,
    /// The target must not present a collision risk.
    NoDanger,
    /// Either outcome is acceptable.
    #[default]
    Unconstrained,
}

/// Own-ship policy: how the target set as a whole relates to the own ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnShipPolicy {
    /// No target may be dangerous to the own ship.
    NoDangerForAll,
    /// Every target must be dangerous to the own ship.
    DangerForAll,
    /// At least one target must be dangerous to the own ship.
    AtLeastOneDanger,
    /// Per-envelope intents apply unmodified.
    #[default]
    Random,
}

/// Cross-target policy: pairwise danger constraints within the target set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossTargetPolicy {
    /// No target pair may be mutually dangerous.
    NoDangerForAll,
    /// Every target pair must be mutually dangerous.
    DangerForAll,
    /// At least one target pair must be mutually dangerous.
    AtLeastOneDanger,
    /// Pairwise danger is unconstrained (separation floor still applies).
    #[default]
    Random,
}

/// Which value is recorded as a placed target's relative bearing.
///
/// Two conventions are in circulation for this field: the raw window sample
/// (target-relative, "Bt") and `relative course − own course` (own-relative,
/// "Bo"). They diverge on overtaking geometries, so both are kept as named
/// variants; callers pick one per solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BearingConvention {
    /// Record the relative bearing exactly as sampled from the envelope
    /// window (Bt).
    Sampled,
    /// Record `normalize(rel_course − own_course)` (Bo).
    #[default]
    Derived,
}

/// Frame a meeting-situation bearing window is expressed in.
///
/// Three of the built-in overtaken situations carry windows measured from
/// the target's heading (Bt) rather than the own ship's (Bo); the intended
/// correction has never been applied consistently and is preserved here as
/// data rather than resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BearingFrame {
    /// Window measured in the own ship's heading frame (Bo).
    #[default]
    OwnRelative,
    /// Window measured in the target's heading frame (Bt).
    TargetRelative,
}

/// Own-ship role implied by a meeting situation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipBehavior {
    /// Own ship is the stand-on vessel.
    #[default]
    StandOn,
    /// Own ship is the give-way vessel.
    GiveWay,
}
