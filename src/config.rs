//! Ranking configuration.
//!
//! Damping, threshold and iteration cap travel as an explicit value into
//! every call; nothing is read from module-level state.

use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};
use crate::types::{GraphSnapshot, TOTAL_VOTES};

/// Default damping factor.
pub const DEFAULT_DAMPING_FACTOR: f64 = 0.85;
/// Default convergence threshold (max per-node delta).
pub const DEFAULT_THRESHOLD: f64 = 0.0001;
/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Parameters shared by both ranking modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// Probability of following a link rather than teleporting.
    pub damping_factor: f64,
    /// Convergence is reached when the max per-node delta is strictly below this.
    pub threshold: f64,
    /// Hard cap on PageRank iterations.
    pub max_iterations: usize,
    /// Split rank proportionally to edge weights instead of evenly per edge.
    pub use_edge_weights: bool,
    /// Votes in circulation for vote-flow steps.
    pub total_votes: f64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping_factor: DEFAULT_DAMPING_FACTOR,
            threshold: DEFAULT_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            use_edge_weights: false,
            total_votes: TOTAL_VOTES,
        }
    }
}

impl RankConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the scalar parameters echoed on a snapshot.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        Self {
            damping_factor: snapshot.damping_factor,
            threshold: snapshot.threshold,
            max_iterations: snapshot.max_iterations,
            ..Self::default()
        }
    }

    /// Set the damping factor
    pub fn with_damping_factor(mut self, damping_factor: f64) -> Self {
        self.damping_factor = damping_factor;
        self
    }

    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Toggle weight-proportional rank splitting
    pub fn with_edge_weights(mut self, use_edge_weights: bool) -> Self {
        self.use_edge_weights = use_edge_weights;
        self
    }

    /// Set the number of votes in circulation
    pub fn with_total_votes(mut self, total_votes: f64) -> Self {
        self.total_votes = total_votes;
        self
    }

    /// Reject parameter values that indicate caller misuse.
    ///
    /// Reports the first problem found; see [`RankConfig::problems`] for all.
    pub fn validate(&self) -> Result<()> {
        match self.problems().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every out-of-range parameter, in field order.
    pub fn problems(&self) -> Vec<RankError> {
        let mut problems = Vec::new();
        if !(self.damping_factor > 0.0 && self.damping_factor < 1.0) {
            problems.push(RankError::InvalidDampingFactor(self.damping_factor));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            problems.push(RankError::InvalidThreshold(self.threshold));
        }
        if self.max_iterations == 0 {
            problems.push(RankError::InvalidMaxIterations(self.max_iterations));
        }
        if let Err(err) = validate_total_votes(self.total_votes) {
            problems.push(err);
        }
        problems
    }
}

/// Vote totals must be finite and positive.
pub fn validate_total_votes(total: f64) -> Result<()> {
    if total.is_finite() && total > 0.0 {
        Ok(())
    } else {
        Err(RankError::InvalidTotalVotes(total))
    }
}
