//! # linkrank
//!
//! Link-graph ranking for step-by-step visualizations.
//!
//! Two modes share one graph model:
//!
//! - **PageRank**: damped random-walk power iteration, run until the largest
//!   per-node change drops below a threshold or an iteration cap is hit.
//! - **Vote flow**: one discrete step where every page splits its votes
//!   evenly across its outgoing links, with per-link flow recorded for
//!   animation.
//!
//! ## Quick start
//!
//! ```
//! use linkrank::{samples, RankConfig, RankEngine, RankMode};
//!
//! let engine = RankEngine::new(RankConfig::default()).unwrap();
//! let snapshot = samples::diamond();
//!
//! let ranked = engine.run(&snapshot, RankMode::PageRank);
//! assert!(ranked.converged);
//!
//! let step = engine.run(&snapshot, RankMode::VoteFlow);
//! assert_eq!(step.flow_of("A", "B"), Some(12.5));
//! ```

/// Enter a tracing span for a ranking stage (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("rank_stage", stage = $name).entered();
    };
}

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod pagerank;
pub mod samples;
pub mod types;
pub mod validation;
pub mod voteflow;

pub use config::RankConfig;
pub use engine::{rank, RankEngine};
pub use error::{RankError, Result};
pub use graph::csr::CsrGraph;
pub use pagerank::standard::StandardPageRank;
pub use pagerank::PageRankResult;
pub use types::{GraphSnapshot, RankMode, Ranking, SnapshotLink, SnapshotNode, TOTAL_VOTES};
pub use validation::{ValidationEngine, ValidationReport};
pub use voteflow::step::VoteFlow;
