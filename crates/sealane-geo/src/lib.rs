//! Geodetic math engine for SEALANE.
//!
//! Planar Mercator transforms about a reference point, closed-form
//! ellipsoidal direct/inverse geodesics, and relative-motion / closest
//! point of approach geometry. Pure CPU-bound math: no I/O, no random
//! state, and every operation is a total function over valid coordinates.

pub mod encounter;
pub mod geodesic;
pub mod mercator;

// --- WGS84 ellipsoid ---

/// Semi-major axis (meters).
pub const WGS84_SEMIMAJOR_AXIS_M: f64 = 6_378_137.0;

/// Inverse flattening.
pub const WGS84_INV_FLATTENING: f64 = 298.257_223_563;

/// Mercator scale factor at the reference parallel.
pub const MERCATOR_K0: f64 = 0.9996;

/// Meters per nautical mile.
pub const METERS_PER_NM: f64 = 1852.0;
