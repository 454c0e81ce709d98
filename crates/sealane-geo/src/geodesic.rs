//! Closed-form ellipsoidal geodesics.
//!
//! Direct problem (origin + bearing + distance → destination) and inverse
//! distance, both via the reduced-latitude auxiliary sphere with a
//! second-order correction series in the flattening. Single pass, no
//! iteration; meridional courses and coincident points take explicit
//! branches instead of error paths.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use sealane_core::types::GeoPoint;

use crate::{METERS_PER_NM, WGS84_INV_FLATTENING, WGS84_SEMIMAJOR_AXIS_M};

/// Tolerance on sin(bearing) below which a course is treated as meridional.
const MERIDIAN_TOL: f64 = 1e-9;

/// Angular tolerance below which two points are coincident (radians).
const COINCIDENT_TOL: f64 = 1e-12;

/// Reduce an angle to the ±π range (radians).
pub fn wrap_longitude(mut lon: f64) -> f64 {
    if lon.abs() <= PI {
        return lon;
    }
    lon += PI;
    lon -= TAU * (lon / TAU).floor();
    lon -= PI;
    lon
}

/// Ellipsoid-derived quantities shared by both problems.
struct Ellipsoid {
    a: f64,
    one_minus_f: f64,
    flattening: f64,
    f4: f64,
    f64_sq: f64,
}

impl Ellipsoid {
    fn wgs84() -> Self {
        let f = 1.0 / WGS84_INV_FLATTENING;
        let es = 2.0 * f - f * f;
        let one_minus_f = (1.0 - es).sqrt();
        let flattening = 1.0 - one_minus_f;
        Self {
            a: WGS84_SEMIMAJOR_AXIS_M,
            one_minus_f,
            flattening,
            f4: flattening / 4.0,
            f64_sq: flattening * flattening / 64.0,
        }
    }

    /// Reduced latitude on the auxiliary sphere.
    fn reduced(&self, phi: f64) -> f64 {
        (self.one_minus_f * phi.tan()).atan()
    }
}

/// Solve the direct geodesic problem: the destination reached from `origin`
/// on the given initial bearing (degrees true) after `dist_nm` nautical
/// miles.
pub fn direct(origin: GeoPoint, bearing_deg: f64, dist_nm: f64) -> GeoPoint {
    let ell = Ellipsoid::wgs84();
    let phi1 = origin.lat.to_radians();
    let lam1 = origin.lon.to_radians();
    let al12 = wrap_longitude(bearing_deg.to_radians());
    let s_m = dist_nm * METERS_PER_NM;

    // A bearing in the stern half-plane walks the geodesic backwards.
    let backward = al12.abs() > FRAC_PI_2;

    let th1 = ell.reduced(phi1);
    let costh1 = th1.cos();
    let sinth1 = th1.sin();

    let mut sina12 = al12.sin();
    let merid = sina12.abs() < MERIDIAN_TOL;
    let (cosa12, m) = if merid {
        sina12 = 0.0;
        let cosa12 = if al12.abs() < FRAC_PI_2 { 1.0 } else { -1.0 };
        (cosa12, 0.0)
    } else {
        (al12.cos(), costh1 * sina12)
    };

    let n = costh1 * cosa12;

    let (c1, c2, d_denom, p) = if merid {
        let c2 = ell.f4;
        let mut d = 1.0 - c2;
        d *= d;
        (0.0, c2, d, c2 / d)
    } else {
        let c1 = ell.flattening * m;
        let c2 = ell.f4 * (1.0 - m * m);
        let d = (1.0 - c2) * (1.0 - c2 - c1 * m);
        (c1, c2, d, (1.0 + 0.5 * c1 * m) * c2 / d)
    };

    let s1 = if merid {
        FRAC_PI_2 - th1
    } else {
        let node = if m.abs() >= 1.0 { 0.0 } else { m.acos() };
        let sin_node = node.sin();
        // Equatorial east/west start: keep the ratio finite.
        let ratio = if sin_node == 0.0 { 0.0 } else { sinth1 / sin_node };
        if ratio.abs() >= 1.0 {
            0.0
        } else {
            ratio.acos()
        }
    };

    let mut d = s_m / (d_denom * ell.a);
    if backward {
        d = -d;
    }
    let u = 2.0 * (s1 - d);
    let v = (u + d).cos();
    let sind = d.sin();
    let x = c2 * c2 * sind * d.cos() * (2.0 * v * v - 1.0);
    let ds = d + x - 2.0 * p * v * (1.0 - 2.0 * p * u.cos()) * sind;
    let ss = s1 + s1 - ds;

    let cosds = ds.cos();
    let mut sinds = ds.sin();
    if backward {
        sinds = -sinds;
    }

    let al21 = n * cosds - sinth1 * sinds;
    let (phi2, de) = if merid {
        let mut phi2 = ((FRAC_PI_2 + s1 - ds).tan() / ell.one_minus_f).atan();
        let de;
        if al21 > 0.0 {
            if backward {
                de = PI;
            } else {
                phi2 = -phi2;
                de = 0.0;
            }
        } else if backward {
            phi2 = -phi2;
            de = 0.0;
        } else {
            de = PI;
        }
        (phi2, de)
    } else {
        let mut al21 = (m / al21).atan();
        if al21 > 0.0 {
            al21 += PI;
        }
        if al12 < 0.0 {
            al21 -= PI;
        }
        let al21 = wrap_longitude(al21);
        let phi2 =
            (-(sinth1 * cosds + n * sinds) * al21.sin() / (ell.one_minus_f * m)).atan();
        let mut de = (sinds * sina12).atan2(costh1 * cosds - sinth1 * sinds * cosa12);
        if backward {
            de += c1 * ((1.0 - c2) * ds + c2 * sinds * ss.cos());
        } else {
            de -= c1 * ((1.0 - c2) * ds - c2 * sinds * ss.cos());
        }
        (phi2, de)
    };

    let lam2 = wrap_longitude(lam1 + de);
    GeoPoint::new(phi2.to_degrees(), lam2.to_degrees())
}

/// Solve the inverse geodesic problem for distance only, in nautical miles.
/// Coincident points degrade to zero.
pub fn inverse_distance_nm(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let ell = Ellipsoid::wgs84();
    let phi1 = p1.lat.to_radians();
    let lam1 = p1.lon.to_radians();
    let phi2 = p2.lat.to_radians();
    let lam2 = p2.lon.to_radians();

    let th1 = ell.reduced(phi1);
    let th2 = ell.reduced(phi2);

    let thm = 0.5 * (th1 + th2);
    let dthm = 0.5 * (th2 - th1);
    let dlam = wrap_longitude(lam2 - lam1);
    let dlamm = 0.5 * dlam;

    if dlam.abs() < COINCIDENT_TOL && dthm.abs() < COINCIDENT_TOL {
        return 0.0;
    }

    let sindlamm = dlamm.sin();
    let costhm = thm.cos();
    let sinthm = thm.sin();
    let cosdthm = dthm.cos();
    let sindthm = dthm.sin();

    let l = sindthm * sindthm
        + (cosdthm * cosdthm - sinthm * sinthm) * sindlamm * sindlamm;
    let cosd = (1.0 - l - l).clamp(-1.0, 1.0);
    let d = cosd.acos();

    let e = cosd + cosd;
    let sind = d.sin();

    let mut y = sinthm * cosdthm;
    y *= (y + y) / (1.0 - l);
    let mut t = sindthm * costhm;
    t *= (t + t) / l;
    let x = y + t;
    y -= t;
    let t = d / sind;
    let dd = 4.0 * t * t;
    let a = dd * e;
    let b = dd + dd;
    let s_m = ell.a
        * sind
        * (t - ell.f4 * (t * x - y)
            + ell.f64_sq
                * (x * (a + (t - 0.5 * (a - e)) * x) - y * (b + e * y) + dd * x * y));

    s_m / METERS_PER_NM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_longitude() {
        assert!((wrap_longitude(0.0) - 0.0).abs() < 1e-15);
        assert!((wrap_longitude(PI) - PI).abs() < 1e-15);
        assert!((wrap_longitude(PI + 0.1) - (-PI + 0.1)).abs() < 1e-12);
        assert!((wrap_longitude(-3.0 * PI + 0.2) - (-PI + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_points_have_zero_distance() {
        let p = GeoPoint::new(31.0, 123.0);
        assert_eq!(inverse_distance_nm(p, p), 0.0);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        // a · 1° = 111.3195 km = 60.1078 NM along the equator.
        let d = inverse_distance_nm(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!((d - 60.1078).abs() < 0.01, "equatorial degree: {d} NM");
    }

    #[test]
    fn test_one_degree_of_latitude_at_equator() {
        // A meridian degree at the equator is 110.574 km = 59.705 NM.
        let d = inverse_distance_nm(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        assert!((d - 59.705).abs() < 0.02, "meridian degree: {d} NM");
    }

    #[test]
    fn test_direct_meridional_course() {
        let origin = GeoPoint::new(24.0, 118.0);
        let dest = direct(origin, 0.0, 60.0);
        assert!(
            dest.lat > origin.lat,
            "northbound course must increase latitude"
        );
        assert!(
            (dest.lon - origin.lon).abs() < 1e-9,
            "meridional course must hold longitude: {} vs {}",
            dest.lon,
            origin.lon
        );
        let back = inverse_distance_nm(origin, dest);
        assert!((back - 60.0).abs() < 0.06, "meridional 60 NM: {back}");

        let south = direct(origin, 180.0, 60.0);
        assert!(south.lat < origin.lat, "southbound course must decrease latitude");
        assert!((south.lon - origin.lon).abs() < 1e-9);
    }

    #[test]
    fn test_direct_inverse_consistency() {
        // Round-trip distances agree within 0.1% from 1 to 500 NM.
        let origin = GeoPoint::new(24.0, 118.0);
        for bearing in [10.0, 45.0, 90.0, 135.0, 200.0, 275.0, 359.0] {
            for dist in [1.0, 10.0, 60.0, 150.0, 300.0, 500.0] {
                let dest = direct(origin, bearing, dist);
                let back = inverse_distance_nm(origin, dest);
                let rel_err = (back - dist).abs() / dist;
                assert!(
                    rel_err < 1e-3,
                    "bearing {bearing}° dist {dist} NM: got {back} NM back (rel err {rel_err})"
                );
            }
        }
    }

    #[test]
    fn test_direct_eastward_crosses_antimeridian() {
        let origin = GeoPoint::new(10.0, 179.8);
        let dest = direct(origin, 90.0, 30.0);
        assert!(
            dest.lon < -179.0,
            "30 NM east of 179.8°E should wrap negative, got {}",
            dest.lon
        );
        let back = inverse_distance_nm(origin, dest);
        assert!((back - 30.0).abs() < 0.03, "antimeridian crossing: {back}");
    }

    #[test]
    fn test_direct_matches_inverse_in_southern_hemisphere() {
        let origin = GeoPoint::new(-33.5, 151.0);
        let dest = direct(origin, 250.0, 120.0);
        let back = inverse_distance_nm(origin, dest);
        assert!((back - 120.0).abs() < 0.12, "southern ocean leg: {back}");
    }
}
