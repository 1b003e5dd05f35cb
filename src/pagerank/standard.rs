//! Standard PageRank algorithm
//!
//! Synchronous (Jacobi) power iteration over incoming edges:
//!
//! ```text
//! new(v) = (1 - d) / N + d * sum over u -> v of rank(u) / outDegree(u)
//! ```
//!
//! Dangling nodes (no outgoing edges) give their rank to nobody, so mass
//! leaks during the loop; a single renormalization after the loop restores
//! `sum == 1`. Convergence is a strict `max |new - old| < threshold`.

use super::convergence::{max_absolute_delta, normalize_to_sum};
use super::PageRankResult;
use crate::config::RankConfig;
use crate::graph::csr::CsrGraph;

/// Standard PageRank implementation
#[derive(Debug, Clone)]
pub struct StandardPageRank {
    /// Damping factor (typically 0.85)
    pub damping: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Convergence threshold
    pub threshold: f64,
    /// Split rank by edge weight instead of evenly per edge
    pub use_weights: bool,
}

impl Default for StandardPageRank {
    fn default() -> Self {
        Self::from_config(&RankConfig::default())
    }
}

impl StandardPageRank {
    /// Create a new StandardPageRank with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a ranking config
    pub fn from_config(config: &RankConfig) -> Self {
        Self {
            damping: config.damping_factor,
            max_iterations: config.max_iterations,
            threshold: config.threshold,
            use_weights: config.use_edge_weights,
        }
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Split rank proportionally to edge weights
    pub fn with_weights(mut self, use_weights: bool) -> Self {
        self.use_weights = use_weights;
        self
    }

    /// Apply one synchronous update from `scores` into `new_scores`.
    ///
    /// Returns the max per-node delta. Missing `scores` entries read as zero
    /// and only the first `num_nodes` slots of `new_scores` are written.
    pub fn iterate(&self, graph: &CsrGraph, scores: &[f64], new_scores: &mut [f64]) -> f64 {
        let n = graph.num_nodes;
        if n == 0 {
            return 0.0;
        }
        debug_assert!(new_scores.len() >= n, "new_scores shorter than the graph");

        let teleport = (1.0 - self.damping) / n as f64;

        for (node, slot) in new_scores.iter_mut().take(n).enumerate() {
            let rank_sum: f64 = graph
                .in_neighbors(node as u32)
                .map(|(source, weight)| {
                    let score = scores.get(source as usize).copied().unwrap_or(0.0);
                    self.share(graph, source, weight) * score
                })
                .sum();
            *slot = teleport + self.damping * rank_sum;
        }

        max_absolute_delta(scores, new_scores)
    }

    /// Fraction of `source`'s rank carried by one of its edges
    fn share(&self, graph: &CsrGraph, source: u32, weight: f64) -> f64 {
        if self.use_weights {
            let total = graph.node_total_weight(source);
            if total > 0.0 {
                weight / total
            } else {
                0.0
            }
        } else {
            let degree = graph.degree(source);
            if degree > 0 {
                1.0 / degree as f64
            } else {
                0.0
            }
        }
    }

    /// Run PageRank on a graph, starting from its resolved initial ranks
    ///
    /// Returns the result even if convergence wasn't achieved, with `converged=false`.
    pub fn run(&self, graph: &CsrGraph) -> PageRankResult {
        self.run_from(graph, &graph.initial_ranks)
    }

    /// Run PageRank starting from explicit ranks
    pub fn run_from(&self, graph: &CsrGraph, initial: &[f64]) -> PageRankResult {
        self.run_observed(graph, initial, |_, _, _| {})
    }

    /// Run PageRank, calling `on_iteration(iteration, raw_scores, delta)`
    /// after every update round.
    ///
    /// The scores handed to the callback are the un-normalized values the
    /// next round reads from.
    pub fn run_observed<F>(
        &self,
        graph: &CsrGraph,
        initial: &[f64],
        mut on_iteration: F,
    ) -> PageRankResult
    where
        F: FnMut(usize, &[f64], f64),
    {
        let n = graph.num_nodes;
        if n == 0 {
            return PageRankResult::empty();
        }

        trace_stage!("pagerank");

        let mut scores = vec![0.0; n];
        for (slot, &value) in scores.iter_mut().zip(initial.iter()) {
            *slot = value;
        }
        let mut new_scores = vec![0.0; n];

        let mut iterations = 0;
        let mut delta = f64::MAX;
        let mut converged = false;

        while iterations < self.max_iterations && !converged {
            iterations += 1;
            delta = self.iterate(graph, &scores, &mut new_scores);
            converged = delta < self.threshold;

            std::mem::swap(&mut scores, &mut new_scores);
            on_iteration(iterations, &scores, delta);
        }

        // Dangling nodes leak mass during the loop; restore sum == 1 here
        normalize_to_sum(&mut scores, 1.0);

        #[cfg(feature = "tracing")]
        {
            if !converged {
                tracing::debug!(iterations, delta, "pagerank hit the iteration cap");
            }
        }

        PageRankResult {
            scores,
            iterations,
            delta,
            converged,
        }
    }
}
