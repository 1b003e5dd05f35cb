//! Graph snapshot types
//!
//! A [`GraphSnapshot`] is the value exchanged with producers (link parsers,
//! UI sample data) and consumers (renderers, leaderboards). Every ranking call
//! takes a snapshot by reference and returns a new one.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "nodes": [{ "id": "A", "rank": 0.25, "label": "A", "x": 100, "y": 100 }],
//!   "links": [{ "source": "A", "target": "B", "weight": 1 }],
//!   "currentIteration": 0,
//!   "maxIterations": 10,
//!   "dampingFactor": 0.85,
//!   "threshold": 0.0001,
//!   "algo": "pagerank"
//! }
//! ```

use std::collections::HashMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_DAMPING_FACTOR, DEFAULT_MAX_ITERATIONS, DEFAULT_THRESHOLD};
use crate::error::Result;

/// Total number of votes in the vote-flow model.
pub const TOTAL_VOTES: f64 = 100.0;

/// A node as supplied by the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    /// Unique id within the snapshot
    pub id: String,
    /// Share of total importance; `None` means "use the uniform prior"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Fields the ranking core does not interpret, passed through untouched.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl SnapshotNode {
    /// Create a node with no initial rank
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rank: None,
            label: None,
            x: None,
            y: None,
            extra: HashMap::new(),
        }
    }

    /// Set the initial rank
    pub fn with_rank(mut self, rank: f64) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the layout position
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A directed link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLink {
    pub source: String,
    pub target: String,
    /// Relative importance of the link (default 1)
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Votes transferred along this link in the last vote-flow step (output only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl SnapshotLink {
    /// Create a link with weight 1
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: 1.0,
            flow: None,
            extra: HashMap::new(),
        }
    }

    /// Set the link weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

fn default_damping_factor() -> f64 {
    DEFAULT_DAMPING_FACTOR
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_algo() -> String {
    "pagerank".to_string()
}

/// An immutable view of the graph at one point of the computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
    #[serde(default)]
    pub links: Vec<SnapshotLink>,
    /// Number of steps applied so far
    #[serde(default)]
    pub current_iteration: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_damping_factor")]
    pub damping_factor: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Opaque algorithm tag owned by the producer
    #[serde(default = "default_algo")]
    pub algo: String,
    /// Whether the last PageRank run converged
    #[serde(default)]
    pub converged: bool,
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            current_iteration: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            threshold: DEFAULT_THRESHOLD,
            algo: default_algo(),
            converged: false,
        }
    }
}

impl GraphSnapshot {
    /// Create a snapshot from node and link lists with default parameters
    pub fn new(nodes: Vec<SnapshotNode>, links: Vec<SnapshotLink>) -> Self {
        Self {
            nodes,
            links,
            ..Self::default()
        }
    }

    /// Parse a snapshot from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the snapshot to its JSON wire form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Copy of this snapshot with `ranks` written onto its nodes.
    ///
    /// `ranks` is indexed like the graph built from this snapshot: one entry
    /// per distinct node id, in first-occurrence order. Repeated node ids are
    /// dropped from the copy so the ranks still sum to the expected total.
    pub fn with_ranks(&self, ranks: &[f64]) -> GraphSnapshot {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let nodes = self
            .nodes
            .iter()
            .filter(|node| seen.insert(node.id.as_str()))
            .zip(ranks.iter())
            .map(|(node, &rank)| SnapshotNode {
                rank: Some(rank),
                ..node.clone()
            })
            .collect();

        GraphSnapshot {
            nodes,
            links: self.links.clone(),
            current_iteration: self.current_iteration,
            max_iterations: self.max_iterations,
            damping_factor: self.damping_factor,
            threshold: self.threshold,
            algo: self.algo.clone(),
            converged: self.converged,
        }
    }

    /// Rank of the node with the given id, if present and set
    pub fn rank_of(&self, id: &str) -> Option<f64> {
        self.nodes.iter().find(|n| n.id == id).and_then(|n| n.rank)
    }

    /// Flow recorded on the first link from `source` to `target`
    pub fn flow_of(&self, source: &str, target: &str) -> Option<f64> {
        self.links
            .iter()
            .find(|l| l.source == source && l.target == target)
            .and_then(|l| l.flow)
    }

    /// Sum of all node ranks (unset ranks count as zero)
    pub fn total_rank(&self) -> f64 {
        self.nodes.iter().filter_map(|n| n.rank).sum()
    }

    /// Nodes ordered by rank descending, with votes scaled to `total`.
    ///
    /// Ties keep snapshot order.
    pub fn leaderboard(&self, total: f64) -> Vec<Ranking> {
        let mut ordered: Vec<&SnapshotNode> = self.nodes.iter().collect();
        ordered.sort_by(|a, b| {
            let ra = a.rank.unwrap_or(0.0);
            let rb = b.rank.unwrap_or(0.0);
            rb.total_cmp(&ra)
        });

        ordered
            .into_iter()
            .enumerate()
            .map(|(i, node)| {
                let rank = node.rank.unwrap_or(0.0);
                Ranking {
                    position: i + 1,
                    id: node.id.clone(),
                    label: node.label.clone(),
                    rank,
                    votes: rank * total,
                }
            })
            .collect()
    }
}

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    /// 1-based position
    pub position: usize,
    pub id: String,
    pub label: Option<String>,
    pub rank: f64,
    pub votes: f64,
}

/// Which ranking algorithm to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMode {
    /// Damped random walk, run to convergence or the iteration cap.
    #[default]
    PageRank,
    /// One discrete vote redistribution step with per-link flow.
    VoteFlow,
}

impl RankMode {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "vote_flow" | "voteflow" | "vote" | "votes" | "voting" => RankMode::VoteFlow,
            _ => RankMode::PageRank,
        }
    }

    /// Returns the user-facing name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageRank => "pagerank",
            Self::VoteFlow => "vote_flow",
        }
    }
}

impl std::str::FromStr for RankMode {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(RankMode::parse(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_snapshot() {
        let snapshot = GraphSnapshot::from_json(r#"{ "nodes": [{ "id": "A" }] }"#).unwrap();
        assert_eq!(snapshot.nodes.len(), 1);
        assert!(snapshot.nodes[0].rank.is_none());
        assert_eq!(snapshot.damping_factor, 0.85);
        assert_eq!(snapshot.threshold, 0.0001);
        assert_eq!(snapshot.algo, "pagerank");
        assert_eq!(snapshot.current_iteration, 0);
    }

    #[test]
    fn test_link_weight_defaults_to_one() {
        let snapshot = GraphSnapshot::from_json(
            r#"{ "nodes": [], "links": [{ "source": "A", "target": "B" }] }"#,
        )
        .unwrap();
        assert_eq!(snapshot.links[0].weight, 1.0);
        assert!(snapshot.links[0].flow.is_none());
    }

    #[test]
    fn test_camel_case_wire_names() {
        let snapshot = GraphSnapshot::from_json(
            r#"{
                "currentIteration": 3,
                "maxIterations": 10,
                "dampingFactor": 0.9,
                "algo": "scc"
            }"#,
        )
        .unwrap();
        assert_eq!(snapshot.current_iteration, 3);
        assert_eq!(snapshot.max_iterations, 10);
        assert_eq!(snapshot.damping_factor, 0.9);

        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["currentIteration"], 3);
        assert_eq!(value["algo"], "scc");
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let snapshot = GraphSnapshot::from_json(
            r#"{ "nodes": [{ "id": "A", "color": "red" }],
                 "links": [{ "source": "A", "target": "A", "style": "dashed" }] }"#,
        )
        .unwrap();
        assert_eq!(snapshot.nodes[0].extra["color"], "red");

        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["nodes"][0]["color"], "red");
        assert_eq!(value["links"][0]["style"], "dashed");
    }

    #[test]
    fn test_leaderboard_orders_by_rank() {
        let snapshot = GraphSnapshot::new(
            vec![
                SnapshotNode::new("A").with_rank(0.2),
                SnapshotNode::new("B").with_rank(0.5),
                SnapshotNode::new("C").with_rank(0.3).with_label("Gamma"),
            ],
            vec![],
        );

        let board = snapshot.leaderboard(TOTAL_VOTES);
        let ids: Vec<_> = board.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C", "A"]);
        assert_eq!(board[0].position, 1);
        assert!((board[0].votes - 50.0).abs() < 1e-9);
        assert_eq!(board[1].label.as_deref(), Some("Gamma"));
    }

    #[test]
    fn test_with_ranks_copies_and_dedupes() {
        let snapshot = GraphSnapshot::new(
            vec![
                SnapshotNode::new("A").with_position(1.0, 2.0),
                SnapshotNode::new("B"),
                SnapshotNode::new("A"),
            ],
            vec![SnapshotLink::new("A", "B")],
        );

        let ranked = snapshot.with_ranks(&[0.4, 0.6]);

        assert_eq!(ranked.nodes.len(), 2);
        assert_eq!(ranked.rank_of("A"), Some(0.4));
        assert_eq!(ranked.nodes[0].x, Some(1.0));
        assert_eq!(ranked.links, snapshot.links);
        // Input untouched
        assert!(snapshot.nodes.iter().all(|n| n.rank.is_none()));
    }

    #[test]
    fn test_rank_mode_parse() {
        assert_eq!("vote_flow".parse::<RankMode>().unwrap(), RankMode::VoteFlow);
        assert_eq!("Voting".parse::<RankMode>().unwrap(), RankMode::VoteFlow);
        assert_eq!("pagerank".parse::<RankMode>().unwrap(), RankMode::PageRank);
        assert_eq!("anything".parse::<RankMode>().unwrap(), RankMode::PageRank);
        assert_eq!(RankMode::VoteFlow.as_str(), "vote_flow");
    }
}
