//! Graph builder with id interning
//!
//! This module turns caller-supplied node and link lists into indexed
//! nodes, using FxHashMap for O(1) id lookups during construction.
//! Links whose source or target id is unknown are dropped and counted.

use crate::types::{GraphSnapshot, SnapshotLink, SnapshotNode};
use rustc_hash::FxHashMap;

/// An outgoing edge recorded by the builder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuilderEdge {
    /// Target node index
    pub target: u32,
    /// Edge weight (non-negative)
    pub weight: f64,
    /// Position of the originating link in the caller's link list
    pub link_index: usize,
}

/// A node in the graph builder
#[derive(Debug, Clone)]
pub struct BuilderNode {
    /// Caller-supplied node id
    pub id: String,
    /// Initial rank, if the caller supplied a usable one
    pub initial_rank: Option<f64>,
    /// Outgoing edges in insertion order; parallel edges are kept
    pub edges: Vec<BuilderEdge>,
}

impl BuilderNode {
    /// Create a new node
    pub fn new(id: impl Into<String>, initial_rank: Option<f64>) -> Self {
        Self {
            id: id.into(),
            initial_rank,
            edges: Vec::new(),
        }
    }
}

/// Counters for input the builder tolerated rather than rejected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Links referencing an unknown node id
    pub dropped_edges: usize,
    /// Repeated node ids (first occurrence wins)
    pub duplicate_nodes: usize,
    /// Negative or non-finite initial ranks replaced by the uniform prior
    pub sanitized_ranks: usize,
    /// Negative or non-finite link weights clamped to zero
    pub sanitized_weights: usize,
}

impl BuildStats {
    /// Returns `true` if the input was used exactly as supplied.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// A mutable graph builder for directed link graphs
#[derive(Debug)]
pub struct GraphBuilder {
    /// Maps node id -> node index
    id_to_index: FxHashMap<String, u32>,
    /// Node storage
    nodes: Vec<BuilderNode>,
    stats: BuildStats,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create a new empty graph builder
    pub fn new() -> Self {
        Self {
            id_to_index: FxHashMap::default(),
            nodes: Vec::new(),
            stats: BuildStats::default(),
        }
    }

    /// Create a graph builder with pre-allocated capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            id_to_index: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
            stats: BuildStats::default(),
        }
    }

    /// Get or create a node for the given id, returning its index
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&index) = self.id_to_index.get(id) {
            return index;
        }

        let index = self.nodes.len() as u32;
        self.id_to_index.insert(id.to_string(), index);
        self.nodes.push(BuilderNode::new(id, None));
        index
    }

    /// Add a node with an optional initial rank.
    ///
    /// A repeated id keeps the first node and is counted as a duplicate.
    /// Unusable ranks (negative, NaN, infinite) fall back to the uniform prior.
    pub fn add_node(&mut self, id: &str, rank: Option<f64>) -> u32 {
        if let Some(&index) = self.id_to_index.get(id) {
            self.stats.duplicate_nodes += 1;
            return index;
        }

        let rank = match rank {
            Some(r) if r.is_finite() && r >= 0.0 => Some(r),
            Some(_) => {
                self.stats.sanitized_ranks += 1;
                None
            }
            None => None,
        };

        let index = self.get_or_create_node(id);
        self.nodes[index as usize].initial_rank = rank;
        index
    }

    /// Add a directed edge between two existing node indices
    pub fn add_edge(&mut self, from: u32, to: u32, weight: f64, link_index: usize) {
        if to as usize >= self.nodes.len() {
            self.stats.dropped_edges += 1;
            return;
        }

        let weight = if weight.is_finite() && weight >= 0.0 {
            weight
        } else {
            self.stats.sanitized_weights += 1;
            0.0
        };

        match self.nodes.get_mut(from as usize) {
            Some(node) => node.edges.push(BuilderEdge {
                target: to,
                weight,
                link_index,
            }),
            None => self.stats.dropped_edges += 1,
        }
    }

    /// Add a directed link by node id, dropping it if either end is unknown.
    ///
    /// Returns `true` if the link was kept.
    pub fn add_link(&mut self, source: &str, target: &str, weight: f64, link_index: usize) -> bool {
        let ends = (self.id_to_index.get(source), self.id_to_index.get(target));
        match ends {
            (Some(&from), Some(&to)) => {
                self.add_edge(from, to, weight, link_index);
                true
            }
            _ => {
                self.stats.dropped_edges += 1;
                false
            }
        }
    }

    /// Build from node and link lists.
    ///
    /// All nodes are registered before any link so link order never
    /// affects which links are dropped.
    pub fn from_parts(nodes: &[SnapshotNode], links: &[SnapshotLink]) -> Self {
        let mut builder = Self::with_capacity(nodes.len());

        for node in nodes {
            builder.add_node(&node.id, node.rank);
        }

        for (i, link) in links.iter().enumerate() {
            builder.add_link(&link.source, &link.target, link.weight, i);
        }

        #[cfg(feature = "tracing")]
        {
            let stats = builder.stats;
            if !stats.is_clean() {
                tracing::warn!(
                    dropped_edges = stats.dropped_edges,
                    duplicate_nodes = stats.duplicate_nodes,
                    sanitized_ranks = stats.sanitized_ranks,
                    sanitized_weights = stats.sanitized_weights,
                    "graph input required cleanup"
                );
            }
        }

        builder
    }

    /// Build from a snapshot's node and link lists
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        Self::from_parts(&snapshot.nodes, &snapshot.links)
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of kept edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    /// Get a node by index
    pub fn get_node(&self, index: u32) -> Option<&BuilderNode> {
        self.nodes.get(index as usize)
    }

    /// Get a node index by id
    pub fn get_node_index(&self, id: &str) -> Option<u32> {
        self.id_to_index.get(id).copied()
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &BuilderNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Counters for tolerated input problems
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_builder_basic() {
        let mut builder = GraphBuilder::new();

        let a = builder.get_or_create_node("A");
        let b = builder.get_or_create_node("B");
        let c = builder.get_or_create_node("A"); // duplicate

        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(builder.node_count(), 2);
    }

    #[test]
    fn test_edges_are_directed() {
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("A");
        let b = builder.get_or_create_node("B");

        builder.add_edge(a, b, 1.0, 0);

        assert_eq!(builder.get_node(a).unwrap().edges.len(), 1);
        assert!(builder.get_node(b).unwrap().edges.is_empty());
    }

    #[test]
    fn test_parallel_edges_kept() {
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("A");
        let b = builder.get_or_create_node("B");

        builder.add_edge(a, b, 1.0, 0);
        builder.add_edge(a, b, 1.0, 1);

        let edges = &builder.get_node(a).unwrap().edges;
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].link_index, 1);
    }

    #[test]
    fn test_self_loops_kept() {
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("A");

        builder.add_edge(a, a, 1.0, 0);

        assert_eq!(builder.edge_count(), 1);
    }

    #[test]
    fn test_dangling_links_dropped_and_counted() {
        let nodes = vec![SnapshotNode::new("A"), SnapshotNode::new("B")];
        let links = vec![
            SnapshotLink::new("A", "B"),
            SnapshotLink::new("A", "Z"),
            SnapshotLink::new("Y", "B"),
        ];

        let builder = GraphBuilder::from_parts(&nodes, &links);

        assert_eq!(builder.edge_count(), 1);
        assert_eq!(builder.stats().dropped_edges, 2);
        assert!(!builder.stats().is_clean());
    }

    #[test]
    fn test_link_order_independent_of_node_order() {
        let nodes = vec![SnapshotNode::new("B"), SnapshotNode::new("A")];
        let links = vec![SnapshotLink::new("A", "B")];

        let builder = GraphBuilder::from_parts(&nodes, &links);

        assert_eq!(builder.edge_count(), 1);
        assert!(builder.stats().is_clean());
    }

    #[test]
    fn test_duplicate_node_first_wins() {
        let nodes = vec![
            SnapshotNode::new("A").with_rank(0.4),
            SnapshotNode::new("A").with_rank(0.9),
        ];

        let builder = GraphBuilder::from_parts(&nodes, &[]);

        assert_eq!(builder.node_count(), 1);
        assert_eq!(builder.get_node(0).unwrap().initial_rank, Some(0.4));
        assert_eq!(builder.stats().duplicate_nodes, 1);
    }

    #[test]
    fn test_bad_rank_and_weight_sanitized() {
        let nodes = vec![
            SnapshotNode::new("A").with_rank(-1.0),
            SnapshotNode::new("B").with_rank(f64::NAN),
        ];
        let links = vec![SnapshotLink::new("A", "B").with_weight(-3.0)];

        let builder = GraphBuilder::from_parts(&nodes, &links);

        assert_eq!(builder.stats().sanitized_ranks, 2);
        assert_eq!(builder.stats().sanitized_weights, 1);
        assert!(builder.get_node(0).unwrap().initial_rank.is_none());
        assert_eq!(builder.get_node(0).unwrap().edges[0].weight, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let builder = GraphBuilder::from_parts(&[], &[]);
        assert!(builder.is_empty());
        assert_eq!(builder.edge_count(), 0);
    }
}
