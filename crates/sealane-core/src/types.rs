//! Fundamental geographic, kinematic, and scenario record types.

use serde::{Deserialize, Serialize};

use crate::constants::NO_CPA_TCPA;
use crate::enums::DangerIntent;

/// Normalize an angle in degrees to [0, 360).
pub fn normalize_deg(deg: f64) -> f64 {
    let v = deg % 360.0;
    if v < 0.0 {
        v + 360.0
    } else {
        v
    }
}

/// Geographic position in decimal degrees.
///
/// Latitude is positive north, longitude positive east. Longitude is wrapped
/// to (-180, 180] at system boundaries but tolerated out of range internally;
/// the projection layer handles the antimeridian explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Wrap longitude into (-180, 180]. Latitude is left untouched.
    pub fn normalized(self) -> Self {
        let mut lon = self.lon % 360.0;
        if lon > 180.0 {
            lon -= 360.0;
        } else if lon <= -180.0 {
            lon += 360.0;
        }
        Self { lat: self.lat, lon }
    }
}

/// Speed and course over ground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    /// Speed over ground (knots, ≥ 0).
    pub sog: f64,
    /// Course over ground (degrees true, [0, 360)).
    pub cog: f64,
}

impl Kinematics {
    /// Build kinematics with the course normalized to [0, 360).
    pub fn new(sog: f64, cog: f64) -> Self {
        Self {
            sog,
            cog: normalize_deg(cog),
        }
    }
}

/// The own ship: fixed position and sampled kinematics.
/// Created once per scenario and immutable thereafter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnShip {
    pub pos: GeoPoint,
    pub kin: Kinematics,
}

/// Closest point of approach between two ships.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpaResult {
    /// Time to CPA in minutes. Negative means the closest point has already
    /// passed; [`NO_CPA_TCPA`] means the relative speed vanishes (no closure).
    pub tcpa_min: f64,
    /// Distance at CPA in nautical miles (≥ 0).
    pub dcpa_nm: f64,
}

impl CpaResult {
    pub fn new(tcpa_min: f64, dcpa_nm: f64) -> Self {
        Self { tcpa_min, dcpa_nm }
    }

    /// The sentinel result for a pair with no relative motion.
    pub fn no_closure(dcpa_nm: f64) -> Self {
        Self {
            tcpa_min: NO_CPA_TCPA,
            dcpa_nm,
        }
    }
}

/// A placed target ship with all derived encounter fields populated.
///
/// Produced by the solver; immutable once accepted into a scenario. The
/// derived fields are guaranteed consistent with the stored position and
/// kinematics of both ships.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetShip {
    pub pos: GeoPoint,
    pub kin: Kinematics,
    /// Distance from own ship (nautical miles).
    pub dist_nm: f64,
    /// True bearing from own ship to this target (degrees, [0, 360)).
    pub bearing_deg: f64,
    /// Relative bearing of the target in the own ship's heading frame
    /// (degrees, [0, 360)); see [`crate::enums::BearingConvention`] for the
    /// two recorded conventions.
    pub rel_bearing_deg: f64,
    /// Course of the target's motion relative to own ship (degrees true).
    pub rel_course_deg: f64,
    /// Speed of the target relative to own ship (knots).
    pub rel_speed_kn: f64,
    /// CPA of this target against the own ship.
    pub cpa: CpaResult,
}

/// A complete generated scenario: own ship plus an ordered target list.
///
/// Target order matches the envelope list the solver was given; indexes are
/// stable and meaningful to downstream consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub own: OwnShip,
    pub targets: Vec<TargetShip>,
}

/// Geometric/kinematic window a single target must be generated within.
///
/// The relative-bearing window may wrap through 0° (`rel_brg_min >
/// rel_brg_max` encodes a window spanning the north mark). Supplied by
/// configuration; immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterEnvelope {
    /// Relative-bearing window (degrees, may wrap through 0°).
    pub rel_brg_min: f64,
    pub rel_brg_max: f64,
    /// Distance window (nautical miles).
    pub dist_min: f64,
    pub dist_max: f64,
    /// Target speed window (knots).
    pub sog_min: f64,
    pub sog_max: f64,
    /// Danger intent for this target against the own ship.
    pub intent: DangerIntent,
}

impl EncounterEnvelope {
    /// Upper bound of the bearing window with the 0°-wrap unfolded
    /// (`min > max` becomes `max + 360`).
    pub fn rel_brg_max_unwrapped(&self) -> f64 {
        if self.rel_brg_max < self.rel_brg_min {
            self.rel_brg_max + 360.0
        } else {
            self.rel_brg_max
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_deg() {
        assert_eq!(normalize_deg(-10.0), 350.0);
        assert_eq!(normalize_deg(400.0), 40.0);
        assert_eq!(normalize_deg(-725.0), 355.0);
        assert_eq!(normalize_deg(0.0), 0.0);
        assert_eq!(normalize_deg(360.0), 0.0);
        assert!(normalize_deg(359.999) < 360.0);
    }

    #[test]
    fn test_geopoint_normalized() {
        let p = GeoPoint::new(10.0, 190.0).normalized();
        assert!((p.lon - -170.0).abs() < 1e-12);
        let p = GeoPoint::new(10.0, -190.0).normalized();
        assert!((p.lon - 170.0).abs() < 1e-12);
        let p = GeoPoint::new(10.0, 180.0).normalized();
        assert!((p.lon - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_kinematics_normalizes_course() {
        let k = Kinematics::new(12.0, 370.0);
        assert!((k.cog - 10.0).abs() < 1e-12);
        let k = Kinematics::new(12.0, -90.0);
        assert!((k.cog - 270.0).abs() < 1e-12);
    }

    #[test]
    fn test_envelope_wrap_unfold() {
        let env = EncounterEnvelope {
            rel_brg_min: 356.0,
            rel_brg_max: 6.0,
            dist_min: 8.0,
            dist_max: 14.0,
            sog_min: 10.0,
            sog_max: 20.0,
            intent: DangerIntent::Unconstrained,
        };
        assert_eq!(env.rel_brg_max_unwrapped(), 366.0);

        let env = EncounterEnvelope {
            rel_brg_min: 6.0,
            rel_brg_max: 67.5,
            ..env
        };
        assert_eq!(env.rel_brg_max_unwrapped(), 67.5);
    }
}
