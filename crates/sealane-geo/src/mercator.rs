//! Planar Mercator transforms about a reference point.
//!
//! Forward/inverse between geographic coordinates and a local east/north
//! frame (meters) centered on a reference point. The spherical pair is exact
//! on the sphere; the eccentric pair applies the WGS84 first-eccentricity
//! correction and recovers latitude through the standard inverse-Mercator
//! series in the conformal latitude. Valid for |lat| < 90°; accuracy
//! degrades near the poles but no branch can fail.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::DVec2;

use sealane_core::types::GeoPoint;

use crate::{MERCATOR_K0, WGS84_INV_FLATTENING, WGS84_SEMIMAJOR_AXIS_M};

/// Projection scale: semi-major axis times the Mercator scale factor.
const SCALE: f64 = WGS84_SEMIMAJOR_AXIS_M * MERCATOR_K0;

/// Shift `lon` by ∓360° when it sits on the far side of the antimeridian
/// from `ref_lon`, so the pair is never treated as more than 180° apart.
fn unwrap_antimeridian(lon: f64, ref_lon: f64) -> f64 {
    if lon * ref_lon < 0.0 && (lon - ref_lon).abs() > 180.0 {
        if lon < 0.0 {
            lon + 360.0
        } else {
            lon - 360.0
        }
    } else {
        lon
    }
}

/// Isometric latitude on the sphere, scaled to projection meters.
fn spherical_northing(lat_deg: f64) -> f64 {
    let s = lat_deg.to_radians().sin();
    0.5 * ((1.0 + s) / (1.0 - s)).ln() * SCALE
}

/// Isometric latitude on the ellipsoid, scaled to projection meters.
fn ellipsoidal_northing(lat_deg: f64, e: f64) -> f64 {
    let s = lat_deg.to_radians().sin();
    let tangent = (FRAC_PI_4 + lat_deg.to_radians() / 2.0).tan();
    SCALE * (tangent * ((1.0 - e * s) / (1.0 + e * s)).powf(e / 2.0)).ln()
}

/// First eccentricity squared and first eccentricity.
fn eccentricity() -> (f64, f64) {
    let f = 1.0 / WGS84_INV_FLATTENING;
    let es = 2.0 * f - f * f;
    (es, es.sqrt())
}

/// Project `p` into the east/north planar frame centered at `reference`
/// (spherical earth).
pub fn to_planar(p: GeoPoint, reference: GeoPoint) -> DVec2 {
    let lon = unwrap_antimeridian(p.lon, reference.lon);
    let east = (lon - reference.lon).to_radians() * SCALE;
    let north = spherical_northing(p.lat) - spherical_northing(reference.lat);
    DVec2::new(east, north)
}

/// Inverse of [`to_planar`]: recover the geographic point from planar
/// east/north offsets about `reference`.
pub fn from_planar(planar: DVec2, reference: GeoPoint) -> GeoPoint {
    let y0 = spherical_northing(reference.lat);
    let lat = (2.0 * ((y0 + planar.y) / SCALE).exp().atan() - FRAC_PI_2).to_degrees();
    let lon = reference.lon + (planar.x / SCALE).to_degrees();
    GeoPoint::new(lat, lon)
}

/// Project `p` into the east/north planar frame centered at `reference`,
/// with the WGS84 first-eccentricity correction on the northing.
pub fn to_planar_ecc(p: GeoPoint, reference: GeoPoint) -> DVec2 {
    let (_, e) = eccentricity();
    let lon = unwrap_antimeridian(p.lon, reference.lon);
    let east = (lon - reference.lon).to_radians() * SCALE;
    let north = ellipsoidal_northing(p.lat, e) - ellipsoidal_northing(reference.lat, e);
    DVec2::new(east, north)
}

/// Inverse of [`to_planar_ecc`]: geographic latitude is recovered from the
/// conformal latitude by a four-term trigonometric series.
pub fn from_planar_ecc(planar: DVec2, reference: GeoPoint) -> GeoPoint {
    let (es, e) = eccentricity();

    let lon = reference.lon + (planar.x / SCALE).to_degrees();

    let false_northing = ellipsoidal_northing(reference.lat, e);
    let t = ((planar.y + false_northing) / SCALE).exp();
    let xi = FRAC_PI_2 - 2.0 * t.atan();

    let es2 = es * es;
    let es3 = es2 * es;
    let es4 = es3 * es;
    let mut esf =
        (es / 2.0 + 5.0 * es2 / 24.0 + es3 / 12.0 + 13.0 * es4 / 360.0) * (2.0 * xi).sin();
    esf += (7.0 * es2 / 48.0 + 29.0 * es3 / 240.0 + 811.0 * es4 / 11520.0) * (4.0 * xi).sin();
    esf += (7.0 * es3 / 120.0 + 81.0 * es4 / 1120.0 + 4279.0 * es4 / 161280.0) * (8.0 * xi).sin();

    let lat = (-(xi + esf)).to_degrees();
    GeoPoint::new(lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_maps_to_origin() {
        let reference = GeoPoint::new(31.0, 123.0);
        let planar = to_planar(reference, reference);
        assert_eq!(planar.x, 0.0);
        assert_eq!(planar.y, 0.0);
        let planar = to_planar_ecc(reference, reference);
        assert_eq!(planar.x, 0.0);
        assert_eq!(planar.y, 0.0);
    }

    #[test]
    fn test_spherical_roundtrip() {
        let reference = GeoPoint::new(31.0, 123.0);
        let p = GeoPoint::new(31.8, 124.1);
        let back = from_planar(to_planar(p, reference), reference);
        assert!((back.lat - p.lat).abs() < 1e-10, "lat: {} vs {}", back.lat, p.lat);
        assert!((back.lon - p.lon).abs() < 1e-10, "lon: {} vs {}", back.lon, p.lon);
    }

    #[test]
    fn test_ellipsoidal_roundtrip() {
        let reference = GeoPoint::new(45.0, -60.0);
        // Offsets out to a few hundred nautical miles.
        for (dlat, dlon) in [(0.5, 0.5), (-2.0, 3.0), (4.0, -4.0), (7.5, 0.0)] {
            let p = GeoPoint::new(reference.lat + dlat, reference.lon + dlon);
            let back = from_planar_ecc(to_planar_ecc(p, reference), reference);
            assert!(
                (back.lat - p.lat).abs() < 1e-6,
                "lat roundtrip at offset ({dlat},{dlon}): {} vs {}",
                back.lat,
                p.lat
            );
            assert!(
                (back.lon - p.lon).abs() < 1e-6,
                "lon roundtrip at offset ({dlat},{dlon}): {} vs {}",
                back.lon,
                p.lon
            );
        }
    }

    #[test]
    fn test_one_degree_east_at_equator() {
        // At the equator 1° of longitude is SCALE * π/180 meters eastward.
        let reference = GeoPoint::new(0.0, 0.0);
        let planar = to_planar(GeoPoint::new(0.0, 1.0), reference);
        let expected = SCALE * 1.0_f64.to_radians();
        assert!(
            (planar.x - expected).abs() < 1e-6,
            "east: {} vs {expected}",
            planar.x
        );
        assert!(planar.y.abs() < 1e-9, "no northing for equatorial offset");
    }

    #[test]
    fn test_antimeridian_shift() {
        // 179.5°E and 179.5°W are one degree apart, not 359.
        let reference = GeoPoint::new(0.0, 179.5);
        let planar = to_planar(GeoPoint::new(0.0, -179.5), reference);
        let expected = SCALE * 1.0_f64.to_radians();
        assert!(
            (planar.x - expected).abs() < 1e-6,
            "antimeridian east offset: {} vs {expected}",
            planar.x
        );

        let planar = to_planar_ecc(GeoPoint::new(0.0, -179.5), reference);
        assert!(
            (planar.x - expected).abs() < 1e-6,
            "ecc antimeridian east offset: {} vs {expected}",
            planar.x
        );
    }

    #[test]
    fn test_ellipsoidal_northing_shrinks_toward_pole() {
        // The eccentricity correction pulls the conformal latitude below the
        // spherical isometric latitude at mid latitudes.
        let (_, e) = eccentricity();
        let spherical = spherical_northing(45.0);
        let ellipsoidal = ellipsoidal_northing(45.0, e);
        assert!(
            ellipsoidal < spherical,
            "ellipsoidal {ellipsoidal} should be below spherical {spherical}"
        );
    }
}
