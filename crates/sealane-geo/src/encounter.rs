//! Relative motion and closest point of approach.
//!
//! The CPA is a planar approximation layered on the ellipsoidal distance and
//! bearing: valid at the scale of tens of nautical miles, which is the scale
//! every encounter envelope lives at.

use glam::DVec2;

use sealane_core::constants::MIN_REL_SPEED_KN;
use sealane_core::types::{normalize_deg, CpaResult, GeoPoint, Kinematics};

use crate::{geodesic, mercator};

/// North/east velocity components of a track (knots).
fn velocity(kin: Kinematics) -> DVec2 {
    let cog = kin.cog.to_radians();
    DVec2::new(kin.sog * cog.sin(), kin.sog * cog.cos())
}

/// Decompose two tracks into the target's motion relative to the own ship.
///
/// Returns (relative speed in knots, relative course in degrees true).
/// A zero relative velocity yields course 0°; callers gate on the speed.
pub fn relative_motion(own: Kinematics, target: Kinematics) -> (f64, f64) {
    let rel = velocity(target) - velocity(own);
    let course = normalize_deg(rel.x.atan2(rel.y).to_degrees());
    (rel.length(), course)
}

/// Distance (nautical miles) and true bearing (degrees) of `to` as seen
/// from `from`.
///
/// The bearing comes from the eccentric Mercator projection. The distance is
/// the meridional difference divided by the bearing cosine, falling back to
/// the great-circle inverse when the bearing runs due east/west and the
/// rhumb slope is undefined.
pub fn distance_and_bearing(from: GeoPoint, to: GeoPoint) -> (f64, f64) {
    let mut lon_to = to.lon;
    let mut lon_from = from.lon;

    // Keep both longitudes on the same side of the antimeridian and positive.
    if lon_to * lon_from < 0.0 {
        if lon_to < 0.0 {
            lon_to += 360.0;
        } else {
            lon_from += 360.0;
        }
        if (lon_to - lon_from).abs() > 180.0 {
            if lon_to > lon_from {
                lon_to -= 360.0;
            } else {
                lon_from -= 360.0;
            }
        }
        lon_from += 360.0;
        lon_to += 360.0;
    }

    // Nudge equal latitudes so the meridional difference is non-zero.
    let anchor_lat = if (from.lat - to.lat).abs() < 1e-9 {
        to.lat + 1e-9
    } else {
        to.lat
    };

    let rel = mercator::to_planar_ecc(
        GeoPoint::new(from.lat, lon_from),
        GeoPoint::new(anchor_lat, lon_to),
    );
    let c = rel.x.atan2(rel.y);
    let dist_nm = if c.cos() != 0.0 {
        (from.lat - anchor_lat) * 60.0 / c.cos()
    } else {
        geodesic::inverse_distance_nm(to, from)
    };

    let rel = mercator::to_planar_ecc(
        GeoPoint::new(from.lat, lon_from),
        GeoPoint::new(to.lat, lon_to),
    );
    let c = rel.x.atan2(rel.y);
    let bearing_deg = normalize_deg(180.0 + c.to_degrees());

    (dist_nm, bearing_deg)
}

/// TCPA/DCPA of `target` against `own`.
pub fn compute_cpa(
    own_pos: GeoPoint,
    target_pos: GeoPoint,
    own_kin: Kinematics,
    target_kin: Kinematics,
) -> CpaResult {
    let (dist_nm, bearing_deg) = distance_and_bearing(own_pos, target_pos);
    let (rel_speed, rel_course) = relative_motion(own_kin, target_kin);

    let delta = (rel_course - bearing_deg - 180.0).to_radians();
    let dcpa_nm = (dist_nm * delta.sin()).abs();

    if rel_speed > MIN_REL_SPEED_KN {
        let tcpa_min = dist_nm * delta.cos() / rel_speed * 60.0;
        CpaResult::new(tcpa_min, dcpa_nm)
    } else {
        CpaResult::no_closure(dcpa_nm)
    }
}
