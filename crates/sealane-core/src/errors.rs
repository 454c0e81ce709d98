//! Error types for configuration loading and scenario solving.

use thiserror::Error;

/// A configuration record or file that could not be accepted.
///
/// Malformed records are rejected individually with a diagnostic; loading
/// falls back to the built-in default tables only when a table ends up with
/// no valid record at all.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file itself is not valid JSON.
    #[error("configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record failed to deserialize into its table's schema.
    #[error("{table} record {index} is malformed: {reason}")]
    MalformedRecord {
        table: &'static str,
        index: usize,
        reason: String,
    },

    /// A record deserialized but carries out-of-range or inconsistent values.
    #[error("{table} record {index} is invalid: {reason}")]
    InvalidRecord {
        table: &'static str,
        index: usize,
        reason: String,
    },

    /// A threshold value is non-positive or non-finite.
    #[error("safety threshold `{name}` is invalid: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

/// Scenario generation failed in a definite, typed way.
///
/// Geometric degeneracies (meridional courses, coincident points, zero
/// relative speed) never surface here; they are handled by closed-form
/// branches inside the geometry layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The envelope list was empty.
    #[error("no encounter envelopes to place")]
    NoEnvelopes,

    /// An envelope's danger/no-danger candidate range stayed empty for the
    /// requested intent across every resampling attempt.
    #[error("envelope {index}: no candidate range satisfies the requested intent after {attempts} attempts")]
    EmptyCandidateRange { index: usize, attempts: u32 },

    /// Backtracking exhausted the first envelope's candidate domain.
    #[error("search exhausted the candidate domain of the first envelope")]
    Exhausted,

    /// The bounded outer retry loop ran out of attempts.
    #[error("scenario generation failed after {attempts} attempts")]
    AttemptsExceeded { attempts: u32 },
}
