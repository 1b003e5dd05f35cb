//! Snapshot checks for graph producers.
//!
//! Ranking never fails on messy data: dangling links, repeated ids and bad
//! weights or ranks are repaired by the graph builder and counted in
//! [`BuildStats`](crate::graph::builder::BuildStats). This module tells the
//! producer *where* those repairs happen, as JSON pointers into the snapshot,
//! before anything is ranked.
//!
//! Repairs are reported as [`Severity::Warning`]. Parameters that make
//! [`rank`](crate::rank) return a [`RankError`] are [`Severity::Error`].
//!
//! ```rust,ignore
//! use linkrank::validation::ValidationEngine;
//!
//! let report = ValidationEngine::with_defaults().validate(&snapshot);
//! for warning in report.warnings() {
//!     eprintln!("{warning}");
//! }
//! ```

pub mod error_code;
pub mod errors;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::config::RankConfig;
use crate::error::RankError;
use crate::types::GraphSnapshot;
use error_code::ErrorCode;
use errors::SnapshotError;

/// How a ranking call treats the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// [`rank`](crate::rank) refuses the snapshot.
    Error,
    /// The builder repairs the input and ranking proceeds.
    Warning,
}

/// A located snapshot problem and how ranking treats it.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: SnapshotError,
}

impl ValidationDiagnostic {
    /// A problem that makes ranking fail
    pub fn error(err: SnapshotError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    /// A problem the builder repairs
    pub fn warning(err: SnapshotError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

/// Everything the rules found in one snapshot, in rule order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &SnapshotError> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
            .map(|d| &d.error)
    }

    /// Problems that make ranking fail.
    pub fn errors(&self) -> impl Iterator<Item = &SnapshotError> {
        self.with_severity(Severity::Error)
    }

    /// Problems the builder repairs.
    pub fn warnings(&self) -> impl Iterator<Item = &SnapshotError> {
        self.with_severity(Severity::Warning)
    }

    /// Number of diagnostics with `code`.
    pub fn count(&self, code: ErrorCode) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.error.code == code)
            .count()
    }

    /// `true` when [`rank`](crate::rank) would reject the snapshot.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// `true` when ranking can proceed, possibly after repairs.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// `true` when the snapshot is used exactly as supplied.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// One check over a [`GraphSnapshot`].
pub trait ValidationRule: Send + Sync {
    /// Stable rule identifier (e.g. `"unknown_nodes"`).
    fn name(&self) -> &str;

    /// Findings for `snapshot`, empty when the check passes.
    fn validate(&self, snapshot: &GraphSnapshot) -> Vec<ValidationDiagnostic>;
}

/// Runs every registered rule; never stops at the first finding.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// An engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// An engine with the link, id, weight, rank and parameter checks.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(UnknownNodeRule));
        engine.add_rule(Box::new(DuplicateNodeRule));
        engine.add_rule(Box::new(WeightRule));
        engine.add_rule(Box::new(RankRule));
        engine.add_rule(Box::new(ParameterRule));
        engine
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Run all rules against `snapshot`.
    pub fn validate(&self, snapshot: &GraphSnapshot) -> ValidationReport {
        let diagnostics = self
            .rules
            .iter()
            .flat_map(|rule| {
                let found = rule.validate(snapshot);
                #[cfg(feature = "tracing")]
                {
                    if !found.is_empty() {
                        tracing::debug!(
                            rule = rule.name(),
                            findings = found.len(),
                            "snapshot check"
                        );
                    }
                }
                found
            })
            .collect();
        ValidationReport { diagnostics }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ─── Rules ──────────────────────────────────────────────────────────────────

// ─── 1. links must reference known nodes ────────────────────────────────────

struct UnknownNodeRule;

impl ValidationRule for UnknownNodeRule {
    fn name(&self) -> &str {
        "unknown_nodes"
    }

    fn validate(&self, snapshot: &GraphSnapshot) -> Vec<ValidationDiagnostic> {
        let ids: FxHashSet<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut out = Vec::new();

        for (i, link) in snapshot.links.iter().enumerate() {
            for (end, id) in [("source", &link.source), ("target", &link.target)] {
                if !ids.contains(id.as_str()) {
                    out.push(ValidationDiagnostic::warning(
                        SnapshotError::new(
                            ErrorCode::UnknownNode,
                            format!("/links/{i}/{end}"),
                            format!("link {end} \"{id}\" is not a known node"),
                        )
                        .with_hint("Ignored during ranking; add the node or drop the link"),
                    ));
                }
            }
        }

        out
    }
}

// ─── 2. node ids must be unique ─────────────────────────────────────────────

struct DuplicateNodeRule;

impl ValidationRule for DuplicateNodeRule {
    fn name(&self) -> &str {
        "duplicate_nodes"
    }

    fn validate(&self, snapshot: &GraphSnapshot) -> Vec<ValidationDiagnostic> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        snapshot
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !seen.insert(node.id.as_str()))
            .map(|(i, node)| {
                ValidationDiagnostic::warning(
                    SnapshotError::new(
                        ErrorCode::DuplicateNode,
                        format!("/nodes/{i}/id"),
                        format!("node id \"{}\" appears more than once", node.id),
                    )
                    .with_hint("Only the first occurrence is ranked"),
                )
            })
            .collect()
    }
}

// ─── 3. weights must be finite and non-negative ─────────────────────────────

struct WeightRule;

impl ValidationRule for WeightRule {
    fn name(&self) -> &str {
        "link_weights"
    }

    fn validate(&self, snapshot: &GraphSnapshot) -> Vec<ValidationDiagnostic> {
        snapshot
            .links
            .iter()
            .enumerate()
            .filter(|(_, link)| !(link.weight.is_finite() && link.weight >= 0.0))
            .map(|(i, link)| {
                ValidationDiagnostic::warning(
                    SnapshotError::new(
                        ErrorCode::InvalidWeight,
                        format!("/links/{i}/weight"),
                        format!("weight {} is not a finite non-negative number", link.weight),
                    )
                    .with_hint("The weight is treated as 0"),
                )
            })
            .collect()
    }
}

// ─── 4. ranks must be finite and non-negative ───────────────────────────────

struct RankRule;

impl ValidationRule for RankRule {
    fn name(&self) -> &str {
        "node_ranks"
    }

    fn validate(&self, snapshot: &GraphSnapshot) -> Vec<ValidationDiagnostic> {
        snapshot
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| match node.rank {
                Some(r) if !(r.is_finite() && r >= 0.0) => Some((i, r)),
                _ => None,
            })
            .map(|(i, r)| {
                ValidationDiagnostic::warning(
                    SnapshotError::new(
                        ErrorCode::InvalidRank,
                        format!("/nodes/{i}/rank"),
                        format!("rank {r} is not a finite non-negative number"),
                    )
                    .with_hint("The uniform prior 1/N is used instead"),
                )
            })
            .collect()
    }
}

// ─── 5. ranking parameters must be in range ─────────────────────────────────

struct ParameterRule;

impl ParameterRule {
    /// Snapshot field and usual value for a parameter problem
    fn locate(err: &RankError) -> (&'static str, Option<&'static str>) {
        match err {
            RankError::InvalidDampingFactor(_) => {
                ("/dampingFactor", Some("The usual value is 0.85"))
            }
            RankError::InvalidThreshold(_) => ("/threshold", Some("The usual value is 0.0001")),
            RankError::InvalidMaxIterations(_) => ("/maxIterations", None),
            _ => ("", None),
        }
    }
}

impl ValidationRule for ParameterRule {
    fn name(&self) -> &str {
        "parameters"
    }

    fn validate(&self, snapshot: &GraphSnapshot) -> Vec<ValidationDiagnostic> {
        RankConfig::from_snapshot(snapshot)
            .problems()
            .into_iter()
            .map(|err| {
                let (path, hint) = Self::locate(&err);
                let mut error =
                    SnapshotError::new(ErrorCode::InvalidParameter, path, err.to_string());
                if let Some(hint) = hint {
                    error = error.with_hint(hint);
                }
                ValidationDiagnostic::error(error)
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    /// Helper: build a GraphSnapshot from JSON.
    fn snapshot(json: &str) -> GraphSnapshot {
        GraphSnapshot::from_json(json).unwrap()
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    // ─── Valid snapshots ────────────────────────────────────────────────

    #[test]
    fn test_empty_snapshot_is_clean() {
        let report = engine().validate(&snapshot(r#"{}"#));
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn test_diamond_is_clean() {
        let report = engine().validate(&samples::diamond());
        assert!(report.is_empty());
    }

    // ─── Rule: unknown_nodes ────────────────────────────────────────────

    #[test]
    fn test_unknown_link_end_is_warning() {
        let report = engine().validate(&snapshot(
            r#"{ "nodes": [{ "id": "A" }], "links": [{ "source": "A", "target": "Z" }] }"#,
        ));
        assert!(report.is_valid());
        let warns: Vec<_> = report.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].code, ErrorCode::UnknownNode);
        assert_eq!(warns[0].path, "/links/0/target");
    }

    #[test]
    fn test_both_ends_unknown_reports_two() {
        let report = engine().validate(&snapshot(
            r#"{ "links": [{ "source": "X", "target": "Y" }] }"#,
        ));
        assert_eq!(report.count(ErrorCode::UnknownNode), 2);
    }

    // ─── Rule: duplicate_nodes ──────────────────────────────────────────

    #[test]
    fn test_duplicate_ids_flagged_after_first() {
        let report = engine().validate(&snapshot(
            r#"{ "nodes": [{ "id": "A" }, { "id": "B" }, { "id": "A" }, { "id": "A" }] }"#,
        ));
        let warns: Vec<_> = report.warnings().collect();
        assert_eq!(warns.len(), 2);
        assert_eq!(warns[0].path, "/nodes/2/id");
        assert_eq!(warns[1].path, "/nodes/3/id");
    }

    // ─── Rules: link_weights / node_ranks ───────────────────────────────

    #[test]
    fn test_negative_weight_and_rank_flagged() {
        let report = engine().validate(&snapshot(
            r#"{
                "nodes": [{ "id": "A", "rank": -0.5 }, { "id": "B" }],
                "links": [{ "source": "A", "target": "B", "weight": -2 }]
            }"#,
        ));
        assert!(report.is_valid());
        assert_eq!(report.count(ErrorCode::InvalidWeight), 1);
        assert_eq!(report.count(ErrorCode::InvalidRank), 1);
    }

    // ─── Rule: parameters ───────────────────────────────────────────────

    #[test]
    fn test_bad_parameters_are_errors() {
        let report = engine().validate(&snapshot(
            r#"{ "dampingFactor": 1.0, "threshold": 0, "maxIterations": 0 }"#,
        ));
        assert!(report.has_errors());
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 3);
        assert!(errs.iter().all(|e| e.code == ErrorCode::InvalidParameter));
        assert_eq!(errs[0].path, "/dampingFactor");
    }

    #[test]
    fn test_parameter_errors_match_rank_failures() {
        let mut bad = samples::diamond();
        bad.threshold = -1.0;

        let report = engine().validate(&bad);
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "/threshold");

        let rank_err = crate::rank(&bad, crate::RankMode::PageRank).unwrap_err();
        assert_eq!(errs[0].message, rank_err.to_string());

        let good = samples::diamond();
        assert!(engine().validate(&good).is_valid());
        assert!(crate::rank(&good, crate::RankMode::PageRank).is_ok());
    }

    #[test]
    fn test_multiple_rules_fire_independently() {
        let report = engine().validate(&snapshot(
            r#"{
                "nodes": [{ "id": "A" }, { "id": "A" }],
                "links": [{ "source": "A", "target": "Q" }],
                "dampingFactor": 0
            }"#,
        ));
        assert_eq!(report.diagnostics.len(), 3);
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.warnings().count(), 2);
    }

    // ─── Engine: custom rules ───────────────────────────────────────────

    #[test]
    fn test_custom_rule() {
        struct NoSelfLoops;
        impl ValidationRule for NoSelfLoops {
            fn name(&self) -> &str {
                "no_self_loops"
            }
            fn validate(&self, snapshot: &GraphSnapshot) -> Vec<ValidationDiagnostic> {
                snapshot
                    .links
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| l.source == l.target)
                    .map(|(i, _)| {
                        ValidationDiagnostic::error(SnapshotError::new(
                            ErrorCode::ValidationFailed,
                            format!("/links/{i}"),
                            "self loop",
                        ))
                    })
                    .collect()
            }
        }

        let mut eng = ValidationEngine::new();
        eng.add_rule(Box::new(NoSelfLoops));

        let report = eng.validate(&snapshot(
            r#"{ "nodes": [{ "id": "A" }], "links": [{ "source": "A", "target": "A" }] }"#,
        ));
        assert!(report.has_errors());
    }

    // ─── Serialization ──────────────────────────────────────────────────

    #[test]
    fn test_report_serializes_to_json() {
        let report = engine().validate(&snapshot(
            r#"{ "nodes": [{ "id": "A" }], "links": [{ "source": "A", "target": "Z" }] }"#,
        ));
        let json = serde_json::to_value(&report).unwrap();
        let diags = json["diagnostics"].as_array().unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0]["severity"], "warning");
        assert_eq!(diags[0]["code"], "unknown_node");
        assert_eq!(diags[0]["path"], "/links/0/target");
    }
}
