//! Single vote-flow step.
//!
//! ```text
//! votes(v) = rank(v) * total
//! outDegree(v) > 0:  each link v -> t carries votes(v) / outDegree(v)
//! outDegree(v) == 0: v keeps votes(v)
//! ```
//!
//! Afterwards ranks are `newVotes / sum(newVotes)` and flows are rescaled by
//! `total / sum(newVotes)`. A zero sum leaves everything at zero.
//!
//! The redistribution itself is done on rank shares; `total` is applied only
//! when flows are scaled, so huge input ranks cannot overflow the vote scale.

use super::VoteFlowResult;
use crate::config::{validate_total_votes, RankConfig};
use crate::error::Result;
use crate::graph::csr::CsrGraph;
use crate::pagerank::convergence::normalize_to_sum;
use crate::types::{GraphSnapshot, TOTAL_VOTES};

/// Vote-flow stepper
#[derive(Debug, Clone, Copy)]
pub struct VoteFlow {
    /// Votes in circulation (canonically 100)
    total: f64,
}

impl Default for VoteFlow {
    fn default() -> Self {
        Self { total: TOTAL_VOTES }
    }
}

impl VoteFlow {
    /// Create a stepper with 100 votes in circulation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stepper using the vote total of a validated config
    pub fn from_config(config: &RankConfig) -> Result<Self> {
        Self::new().with_total(config.total_votes)
    }

    /// Set the number of votes in circulation.
    ///
    /// The total must be finite and positive.
    pub fn with_total(mut self, total: f64) -> Result<Self> {
        validate_total_votes(total)?;
        self.total = total;
        Ok(self)
    }

    /// Votes in circulation
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Apply one step to an indexed graph.
    ///
    /// `ranks` has one entry per node; `num_links` is the length of the
    /// caller's link list so flows can be reported per caller link.
    pub fn step_graph(&self, graph: &CsrGraph, ranks: &[f64], num_links: usize) -> VoteFlowResult {
        let n = graph.num_nodes;
        let mut raw_shares = vec![0.0; n];
        let mut flows = vec![0.0; num_links];

        // Ranks above 1 are brought into [0, 1] first; the step is scale-free
        let peak = ranks.iter().take(n).copied().fold(0.0, f64::max);
        let unit = if peak > 1.0 { peak } else { 1.0 };

        for node in 0..n {
            let mass = ranks.get(node).copied().unwrap_or(0.0).max(0.0) / unit;
            let degree = graph.degree(node as u32);

            if degree > 0 {
                let share = mass / degree as f64;
                for (target, _, link) in graph.out_edges(node as u32) {
                    raw_shares[target as usize] += share;
                    if let Some(flow) = flows.get_mut(link) {
                        *flow = share;
                    }
                }
            } else {
                raw_shares[node] += mass;
            }
        }

        let raw_total: f64 = raw_shares.iter().sum();
        let mut ranks = raw_shares.clone();
        normalize_to_sum(&mut ranks, 1.0);

        if raw_total > 0.0 {
            for flow in &mut flows {
                *flow = *flow / raw_total * self.total;
            }
        } else {
            flows.fill(0.0);
        }

        VoteFlowResult {
            raw_shares,
            raw_total,
            ranks,
            flows,
        }
    }

    /// Apply one step to a snapshot, returning the next snapshot.
    ///
    /// The input is left untouched. Every link gets a `flow` (zero for links
    /// whose ends are unknown) and `current_iteration` advances by one.
    pub fn step(&self, snapshot: &GraphSnapshot) -> GraphSnapshot {
        trace_stage!("vote_flow");

        let graph = CsrGraph::from_snapshot(snapshot);
        let outcome = self.step_graph(&graph, &graph.initial_ranks, snapshot.links.len());

        let mut next = snapshot.with_ranks(&outcome.ranks);
        for (link, flow) in next.links.iter_mut().zip(outcome.flows) {
            link.flow = Some(flow);
        }
        next.current_iteration = snapshot.current_iteration + 1;
        next
    }

    /// Apply `steps` successive steps, returning every intermediate snapshot
    pub fn run_steps(&self, snapshot: &GraphSnapshot, steps: usize) -> Vec<GraphSnapshot> {
        let mut history: Vec<GraphSnapshot> = Vec::with_capacity(steps);
        for _ in 0..steps {
            let next = match history.last() {
                Some(prev) => self.step(prev),
                None => self.step(snapshot),
            };
            history.push(next);
        }
        history
    }
}
