//! Compressed Sparse Row (CSR) graph representation
//!
//! Both directions are stored: outgoing rows drive vote-flow (push) and
//! incoming rows drive PageRank (pull), so each iteration is O(N + E).

use super::builder::{BuildStats, GraphBuilder};
use crate::types::GraphSnapshot;

/// A directed graph in Compressed Sparse Row format
#[derive(Debug, Clone)]
pub struct CsrGraph {
    /// Number of nodes
    pub num_nodes: usize,
    /// Row pointers: node i's outgoing edges are at indices row_ptr[i]..row_ptr[i+1]
    pub row_ptr: Vec<usize>,
    /// Target node of each outgoing edge
    pub col_idx: Vec<u32>,
    /// Edge weights
    pub weights: Vec<f64>,
    /// Index of the originating link in the caller's link list
    pub link_idx: Vec<usize>,
    /// Row pointers for incoming edges
    pub in_row_ptr: Vec<usize>,
    /// Source node of each incoming edge
    pub in_col_idx: Vec<u32>,
    /// Weights of incoming edges
    pub in_weights: Vec<f64>,
    /// Out-degree for each node (parallel edges counted separately)
    pub out_degree: Vec<u32>,
    /// Total outgoing weight for each node
    pub total_weight: Vec<f64>,
    /// Node ids
    pub ids: Vec<String>,
    /// Resolved initial ranks (uniform prior where none was supplied)
    pub initial_ranks: Vec<f64>,
    /// What the builder had to drop or clean up
    pub stats: BuildStats,
}

impl CsrGraph {
    /// Convert a GraphBuilder into CSR format
    pub fn from_builder(builder: &GraphBuilder) -> Self {
        let num_nodes = builder.node_count();
        let num_edges = builder.edge_count();
        let prior = if num_nodes > 0 {
            1.0 / num_nodes as f64
        } else {
            0.0
        };

        let mut row_ptr = Vec::with_capacity(num_nodes + 1);
        let mut col_idx = Vec::with_capacity(num_edges);
        let mut weights = Vec::with_capacity(num_edges);
        let mut link_idx = Vec::with_capacity(num_edges);
        let mut out_degree = Vec::with_capacity(num_nodes);
        let mut total_weight = Vec::with_capacity(num_nodes);
        let mut ids = Vec::with_capacity(num_nodes);
        let mut initial_ranks = Vec::with_capacity(num_nodes);
        let mut in_counts = vec![0usize; num_nodes];

        row_ptr.push(0);

        for (_, node) in builder.nodes() {
            ids.push(node.id.clone());
            initial_ranks.push(node.initial_rank.unwrap_or(prior));
            out_degree.push(node.edges.len() as u32);
            total_weight.push(node.edges.iter().map(|e| e.weight).sum());

            for edge in &node.edges {
                col_idx.push(edge.target);
                weights.push(edge.weight);
                link_idx.push(edge.link_index);
                in_counts[edge.target as usize] += 1;
            }

            row_ptr.push(col_idx.len());
        }

        // Transpose: prefix-sum the in-degrees, then scatter sources
        let mut in_row_ptr = Vec::with_capacity(num_nodes + 1);
        in_row_ptr.push(0);
        for count in &in_counts {
            let last = in_row_ptr[in_row_ptr.len() - 1];
            in_row_ptr.push(last + count);
        }

        let mut cursor = in_row_ptr[..num_nodes].to_vec();
        let mut in_col_idx = vec![0u32; num_edges];
        let mut in_weights = vec![0.0; num_edges];
        for source in 0..num_nodes {
            for i in row_ptr[source]..row_ptr[source + 1] {
                let target = col_idx[i] as usize;
                let slot = cursor[target];
                in_col_idx[slot] = source as u32;
                in_weights[slot] = weights[i];
                cursor[target] += 1;
            }
        }

        Self {
            num_nodes,
            row_ptr,
            col_idx,
            weights,
            link_idx,
            in_row_ptr,
            in_col_idx,
            in_weights,
            out_degree,
            total_weight,
            ids,
            initial_ranks,
            stats: builder.stats(),
        }
    }

    /// Build and index a snapshot in one call
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        trace_stage!("build_graph");
        Self::from_builder(&GraphBuilder::from_snapshot(snapshot))
    }

    /// Iterate over outgoing edges of a node as (target, weight)
    pub fn neighbors(&self, node: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let start = self.row_ptr[node as usize];
        let end = self.row_ptr[node as usize + 1];
        (start..end).map(move |i| (self.col_idx[i], self.weights[i]))
    }

    /// Iterate over outgoing edges as (target, weight, link index)
    pub fn out_edges(&self, node: u32) -> impl Iterator<Item = (u32, f64, usize)> + '_ {
        let start = self.row_ptr[node as usize];
        let end = self.row_ptr[node as usize + 1];
        (start..end).map(move |i| (self.col_idx[i], self.weights[i], self.link_idx[i]))
    }

    /// Iterate over incoming edges of a node as (source, weight)
    pub fn in_neighbors(&self, node: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let start = self.in_row_ptr[node as usize];
        let end = self.in_row_ptr[node as usize + 1];
        (start..end).map(move |i| (self.in_col_idx[i], self.in_weights[i]))
    }

    /// Get the out-degree of a node
    pub fn degree(&self, node: u32) -> u32 {
        self.out_degree[node as usize]
    }

    /// Get the in-degree of a node
    pub fn in_degree(&self, node: u32) -> u32 {
        (self.in_row_ptr[node as usize + 1] - self.in_row_ptr[node as usize]) as u32
    }

    /// Get the total outgoing weight of a node
    pub fn node_total_weight(&self, node: u32) -> f64 {
        self.total_weight[node as usize]
    }

    /// Get the id for a node
    pub fn id(&self, node: u32) -> &str {
        &self.ids[node as usize]
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    /// Get the total number of kept edges
    pub fn num_edges(&self) -> usize {
        self.col_idx.len()
    }

    /// Find dangling nodes (nodes with no outgoing edges)
    pub fn dangling_nodes(&self) -> Vec<u32> {
        (0..self.num_nodes as u32)
            .filter(|&n| self.out_degree[n as usize] == 0)
            .collect()
    }

    /// Get node index by id (linear search - use sparingly)
    pub fn get_node_by_id(&self, id: &str) -> Option<u32> {
        self.ids.iter().position(|i| i == id).map(|i| i as u32)
    }
}

impl Default for CsrGraph {
    fn default() -> Self {
        Self {
            num_nodes: 0,
            row_ptr: vec![0],
            col_idx: Vec::new(),
            weights: Vec::new(),
            link_idx: Vec::new(),
            in_row_ptr: vec![0],
            in_col_idx: Vec::new(),
            in_weights: Vec::new(),
            out_degree: Vec::new(),
            total_weight: Vec::new(),
            ids: Vec::new(),
            initial_ranks: Vec::new(),
            stats: BuildStats::default(),
        }
    }
}
