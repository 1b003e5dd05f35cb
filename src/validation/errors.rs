//! Structured snapshot diagnostics.

use serde::Serialize;
use thiserror::Error;

use super::error_code::ErrorCode;

/// One problem found in a snapshot, located by a JSON pointer.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("[{code}] {path}: {message}")]
pub struct SnapshotError {
    pub code: ErrorCode,
    /// JSON pointer into the snapshot (e.g. `/links/3/target`)
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl SnapshotError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a suggestion for fixing the problem
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_path() {
        let err = SnapshotError::new(ErrorCode::UnknownNode, "/links/0/target", "no node \"Z\"");
        assert_eq!(err.to_string(), "[unknown_node] /links/0/target: no node \"Z\"");
    }

    #[test]
    fn test_hint_serialized_only_when_set() {
        let err = SnapshotError::new(ErrorCode::InvalidRank, "/nodes/1/rank", "negative");
        let json = serde_json::to_value(&err).unwrap();
        assert!(json.get("hint").is_none());

        let json = serde_json::to_value(err.with_hint("use a value >= 0")).unwrap();
        assert_eq!(json["hint"], "use a value >= 0");
        assert_eq!(json["code"], "invalid_rank");
    }
}
