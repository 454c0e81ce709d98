//! Scenario constraint solver for SEALANE.
//!
//! Places target ships so that each one satisfies its encounter envelope and
//! danger intent, and the set as a whole satisfies the cross-target policy,
//! via randomized backtracking over danger-angle candidates. All randomness
//! comes from a caller-owned generator injected per call, so generation is
//! reproducible and embarrassingly parallel across scenarios.

pub mod danger;
pub mod placement;
pub mod solver;

pub use danger::{derive_danger_ranges, DangerRanges};
pub use placement::PlacementSeed;
pub use solver::{
    envelope_from_situation, generate, sample_own_ship, solve, speed_bands, SearchMode,
    SolverOptions,
};
