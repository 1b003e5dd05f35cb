//! PageRank over link graphs
//!
//! [`standard`] holds the damped iterator; [`convergence`] holds the
//! normalization and max-delta helpers that vote flow reuses.

pub mod convergence;
pub mod standard;

use crate::graph::csr::CsrGraph;

/// Outcome of one PageRank run
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// Rank per node index, summing to 1 (empty for an empty graph)
    pub scores: Vec<f64>,
    /// Update rounds performed, never more than the iteration cap
    pub iterations: usize,
    /// Max per-node change in the last round (0 when no round ran)
    pub delta: f64,
    /// `delta` fell strictly below the threshold before the cap
    pub converged: bool,
}

impl PageRankResult {
    /// A graph with no nodes has nothing to iterate and counts as converged.
    pub(crate) fn empty() -> Self {
        Self {
            scores: Vec::new(),
            iterations: 0,
            delta: 0.0,
            converged: true,
        }
    }

    /// The `n` highest-ranked nodes of `graph` as `(id, rank)`.
    ///
    /// Equal ranks keep node order.
    pub fn top_n<'g>(&self, graph: &'g CsrGraph, n: usize) -> Vec<(&'g str, f64)> {
        let mut order: Vec<usize> = (0..self.scores.len().min(graph.num_nodes)).collect();
        order.sort_by(|&a, &b| self.scores[b].total_cmp(&self.scores[a]));
        order
            .into_iter()
            .take(n)
            .map(|i| (graph.id(i as u32), self.scores[i]))
            .collect()
    }
}
