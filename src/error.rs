//! Structured error kinds for the simulation core.
//!
//! Every fallible public API returns [`SimResult`]. The five kinds below
//! mirror the lifecycle phases a run can fail in: malformed input
//! configuration, an API called out of lifecycle order, a numerical
//! breakdown in root-finding, an internal consistency check tripping,
//! or a persistence failure.

use thiserror::Error;

/// The error type returned by all fallible core operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed or incomplete configuration: missing pair coverage,
    /// duplicate species name, primary cell too small for the
    /// interaction range, and similar init-time problems.
    #[error("configuration error: {0}")]
    Config(String),

    /// An API was called in the wrong lifecycle phase, e.g. adding a
    /// species after the simulation reached `Initialised`.
    #[error("state error: {0}")]
    State(String),

    /// A root-finding or streaming computation produced a non-finite
    /// value. Indicates corrupted kinematic state upstream.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// `validate_state` found inconsistencies between the recorded
    /// invariants (capture map, cell occupancy) and the live particle
    /// state. Carries the number of violations found, not the first
    /// one only, so callers can decide whether to abort.
    #[error("{count} invariant violation(s) detected: {detail}")]
    InvariantViolation { count: usize, detail: String },

    /// Persistence failure: missing file, truncated stream, or a
    /// `bincode`/`serde_json` decode error.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e.to_string())
    }
}

impl From<bincode::Error> for SimError {
    fn from(e: bincode::Error) -> Self {
        SimError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Io(e.to_string())
    }
}

/// Convenience alias used throughout the core.
pub type SimResult<T> = Result<T, SimError>;
