//! Solver constants and safety-threshold defaults.

// --- Collision-risk thresholds ---

/// Default own-ship/target TCPA danger threshold (minutes).
pub const SAFE_TCPA_MIN: f64 = 30.0;

/// Default own-ship/target DCPA danger threshold (nautical miles).
pub const SAFE_DCPA_NM: f64 = 2.0;

/// Default target-to-target DCPA danger threshold (nautical miles).
pub const INTER_TARGET_DCPA_NM: f64 = 1.0;

/// Minimum pairwise separation between placed targets (nautical miles).
pub const MIN_SEPARATION_NM: f64 = 0.5;

// --- CPA ---

/// TCPA sentinel reported when the relative speed vanishes (no closure).
pub const NO_CPA_TCPA: f64 = 99999.0;

/// Relative speed below which a CPA is undefined (knots).
pub const MIN_REL_SPEED_KN: f64 = 0.001;

// --- Sampling ---

/// Resolution of sampled speeds, courses, and distances (0.1 kn / 0.1° / 0.1 NM).
pub const SAMPLE_STEP: f64 = 0.1;

/// Bound on every resample-and-retry loop; exceeding it is a definite failure.
pub const MAX_ATTEMPTS: u32 = 100;

// --- Candidate domain ---

/// Upper bound of the offset-angle domain (degrees); candidates are the
/// integer degrees in [0, DELTA_MAX_DEG].
pub const DELTA_MAX_DEG: i32 = 180;

/// Values kept per axis (bearing, distance, speed) in exhaustive grid mode.
pub const GRID_AXIS_SAMPLES: usize = 3;
