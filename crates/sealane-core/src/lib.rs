//! Core types and definitions for SEALANE encounter-scenario generation.
//!
//! This crate defines the vocabulary shared across the geodesy and solver
//! crates: geographic and kinematic records, policy enums, safety thresholds,
//! configuration tables, and error types. It performs no I/O and owns no
//! random state.

pub mod config;
pub mod constants;
pub mod enums;
pub mod errors;
pub mod types;
