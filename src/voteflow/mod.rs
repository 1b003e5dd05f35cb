//! Discrete vote-flow model
//!
//! A pedagogical single-step redistribution: every node splits its votes
//! evenly across its outgoing links (or keeps them all when it has none),
//! and the amount sent down each link is recorded as that link's flow.
//! There is no convergence check; callers request one step at a time.

pub mod step;

/// Outcome of one vote-flow step over an indexed graph
#[derive(Debug, Clone)]
pub struct VoteFlowResult {
    /// Rank share per node before renormalization
    pub raw_shares: Vec<f64>,
    /// Sum of `raw_shares`
    pub raw_total: f64,
    /// Resulting rank per node (sums to 1, or all zero)
    pub ranks: Vec<f64>,
    /// Flow per caller link, on the normalized vote scale (0 for dropped links)
    pub flows: Vec<f64>,
}

impl VoteFlowResult {
    /// Votes per node on the normalized scale
    pub fn votes(&self, total: f64) -> Vec<f64> {
        self.ranks.iter().map(|r| r * total).collect()
    }
}
