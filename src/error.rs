//! Error types for ranking calls.
//!
//! Only caller misuse is an error here. Degenerate data (empty graphs,
//! dangling edges, zero vote totals) has defined behavior and never fails.

use thiserror::Error;

/// Errors returned by the ranking entry points.
#[derive(Debug, Error)]
pub enum RankError {
    /// Damping factor outside the open interval (0, 1).
    #[error("damping factor must be in (0, 1), got {0}")]
    InvalidDampingFactor(f64),

    /// Convergence threshold that is not a finite positive number.
    #[error("convergence threshold must be finite and > 0, got {0}")]
    InvalidThreshold(f64),

    /// Iteration cap of zero.
    #[error("max iterations must be at least 1, got {0}")]
    InvalidMaxIterations(usize),

    /// Vote total that is not a finite positive number.
    #[error("total votes must be finite and > 0, got {0}")]
    InvalidTotalVotes(f64),

    /// Snapshot could not be (de)serialized.
    #[error("invalid graph snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for ranking calls.
pub type Result<T> = std::result::Result<T, RankError>;
