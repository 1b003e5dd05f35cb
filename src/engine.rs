//! Unified ranking engine
//!
//! [`RankEngine`] puts both ranking modes behind one snapshot-in,
//! snapshot-out API. The graph model and normalization helpers are shared;
//! each mode keeps its own semantics:
//!
//! - [`RankMode::PageRank`] runs to convergence or the iteration cap and
//!   reports `currentIteration` as the number of rounds performed.
//! - [`RankMode::VoteFlow`] applies exactly one step, records per-link flow
//!   and advances `currentIteration` by one.
//!
//! Inputs are never mutated; every call returns fresh snapshots, so callers
//! can keep a step-back history without aliasing.

use rayon::prelude::*;

use crate::config::RankConfig;
use crate::error::Result;
use crate::graph::csr::CsrGraph;
use crate::pagerank::convergence::normalize_to_sum;
use crate::pagerank::standard::StandardPageRank;
use crate::types::{GraphSnapshot, RankMode};
use crate::voteflow::step::VoteFlow;

/// Snapshot-level ranking entry point
#[derive(Debug, Clone)]
pub struct RankEngine {
    config: RankConfig,
    voter: VoteFlow,
}

impl Default for RankEngine {
    fn default() -> Self {
        Self {
            config: RankConfig::default(),
            voter: VoteFlow::default(),
        }
    }
}

impl RankEngine {
    /// Create an engine, rejecting out-of-range parameters
    pub fn new(config: RankConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            voter: VoteFlow::from_config(&config)?,
        })
    }

    /// Create an engine from the parameters echoed on a snapshot
    pub fn for_snapshot(snapshot: &GraphSnapshot) -> Result<Self> {
        Self::new(RankConfig::from_snapshot(snapshot))
    }

    /// Set the number of votes in circulation for vote-flow steps.
    ///
    /// Fails if `total` is not finite and positive.
    pub fn with_total_votes(self, total: f64) -> Result<Self> {
        Self::new(self.config.with_total_votes(total))
    }

    /// The active configuration
    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    fn pagerank_impl(&self) -> StandardPageRank {
        StandardPageRank::from_config(&self.config)
    }

    /// Apply `mode` to `snapshot`
    pub fn run(&self, snapshot: &GraphSnapshot, mode: RankMode) -> GraphSnapshot {
        match mode {
            RankMode::PageRank => self.pagerank(snapshot),
            RankMode::VoteFlow => self.vote_flow(snapshot),
        }
    }

    /// Run PageRank to convergence or the iteration cap.
    pub fn pagerank(&self, snapshot: &GraphSnapshot) -> GraphSnapshot {
        let graph = CsrGraph::from_snapshot(snapshot);
        let result = self.pagerank_impl().run(&graph);

        let mut next = self.echo_config(snapshot.with_ranks(&result.scores));
        next.current_iteration = result.iterations;
        next.converged = result.converged;
        next
    }

    /// Run PageRank, returning the starting state followed by one snapshot
    /// per iteration.
    ///
    /// Each snapshot's ranks are normalized to sum to 1 for display; the
    /// iteration itself continues from the raw values. The last entry matches
    /// [`RankEngine::pagerank`].
    pub fn pagerank_history(&self, snapshot: &GraphSnapshot) -> Vec<GraphSnapshot> {
        let graph = CsrGraph::from_snapshot(snapshot);
        let pagerank = self.pagerank_impl();

        let mut start = graph.initial_ranks.clone();
        normalize_to_sum(&mut start, 1.0);
        let mut initial = self.echo_config(snapshot.with_ranks(&start));
        initial.current_iteration = 0;
        initial.converged = false;

        let mut history = vec![initial];
        pagerank.run_observed(&graph, &graph.initial_ranks, |iteration, scores, delta| {
            let mut ranks = scores.to_vec();
            normalize_to_sum(&mut ranks, 1.0);
            let mut state = self.echo_config(snapshot.with_ranks(&ranks));
            state.current_iteration = iteration;
            state.converged = delta < pagerank.threshold;
            history.push(state);
        });

        history
    }

    /// Apply one vote-flow step.
    pub fn vote_flow(&self, snapshot: &GraphSnapshot) -> GraphSnapshot {
        self.voter.step(snapshot)
    }

    /// Apply `steps` vote-flow steps, returning each resulting snapshot.
    pub fn vote_flow_steps(&self, snapshot: &GraphSnapshot, steps: usize) -> Vec<GraphSnapshot> {
        self.voter.run_steps(snapshot, steps)
    }

    /// Rank many independent snapshots in parallel.
    ///
    /// Output order matches input order.
    pub fn run_batch(&self, snapshots: &[GraphSnapshot], mode: RankMode) -> Vec<GraphSnapshot> {
        snapshots
            .par_iter()
            .map(|snapshot| self.run(snapshot, mode))
            .collect()
    }

    fn echo_config(&self, mut snapshot: GraphSnapshot) -> GraphSnapshot {
        snapshot.damping_factor = self.config.damping_factor;
        snapshot.threshold = self.config.threshold;
        snapshot.max_iterations = self.config.max_iterations;
        snapshot
    }
}

/// Rank a snapshot using the parameters it carries.
///
/// Fails only when those parameters are out of range.
pub fn rank(snapshot: &GraphSnapshot, mode: RankMode) -> Result<GraphSnapshot> {
    Ok(RankEngine::for_snapshot(snapshot)?.run(snapshot, mode))
}
