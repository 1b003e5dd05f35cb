//! Ready-made graphs for demos and fixtures.

use crate::types::{GraphSnapshot, SnapshotLink, SnapshotNode};

/// The four-page "diamond" graph used in the step-by-step walkthrough.
///
/// Links: A→B, A→C, B→C, C→A, D→C. Every page starts with a quarter of the
/// votes.
pub fn diamond() -> GraphSnapshot {
    let positions = [
        ("A", 100.0, 100.0),
        ("B", 250.0, 100.0),
        ("C", 175.0, 200.0),
        ("D", 50.0, 200.0),
    ];
    let nodes = positions
        .into_iter()
        .map(|(id, x, y)| {
            SnapshotNode::new(id)
                .with_rank(0.25)
                .with_label(id)
                .with_position(x, y)
        })
        .collect();

    let links = [("A", "B"), ("A", "C"), ("B", "C"), ("C", "A"), ("D", "C")]
        .into_iter()
        .map(|(s, t)| SnapshotLink::new(s, t))
        .collect();

    GraphSnapshot {
        max_iterations: 20,
        ..GraphSnapshot::new(nodes, links)
    }
}

/// `n` pages with no links at all
pub fn isolated(n: usize) -> GraphSnapshot {
    let nodes = (0..n).map(|i| SnapshotNode::new(format!("p{i}"))).collect();
    GraphSnapshot::new(nodes, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diamond_shape() {
        let g = diamond();
        assert_eq!(g.nodes.len(), 4);
        assert_eq!(g.links.len(), 5);
        assert!((g.total_rank() - 1.0).abs() < 1e-12);
        assert_eq!(g.current_iteration, 0);
    }

    #[test]
    fn test_isolated_has_no_ranks() {
        let g = isolated(3);
        assert_eq!(g.nodes.len(), 3);
        assert!(g.links.is_empty());
        assert!(g.nodes.iter().all(|n| n.rank.is_none()));
    }
}
