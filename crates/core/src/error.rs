//! Error types for coin-toss process analysis.

use thiserror::Error;

/// Errors raised by the martingale analysis library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MartingaleError {
    /// An argument was outside its valid range (time index, shape, tolerance).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Simulation parameters failed validation.
    #[error("configuration error: {0}")]
    Config(String),
}

impl MartingaleError {
    /// Builds the error returned when `t` has no following time step.
    #[must_use]
    pub fn time_out_of_range(t: i64, n_steps: usize) -> Self {
        Self::InvalidArgument(format!(
            "t must satisfy 0 <= t < n_steps - 1 (got t = {t}, n_steps = {n_steps})"
        ))
    }
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, MartingaleError>;
