//! Stable diagnostic codes.

use serde::Serialize;

/// Machine-readable category of a snapshot diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A link references a node id that is not in the node list.
    UnknownNode,
    /// A node id appears more than once.
    DuplicateNode,
    /// A link weight is negative or not finite.
    InvalidWeight,
    /// A node rank is negative or not finite.
    InvalidRank,
    /// A ranking parameter is outside its valid range.
    InvalidParameter,
    /// Catch-all for custom rules.
    ValidationFailed,
}

impl ErrorCode {
    /// Returns the snake_case name used in JSON and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownNode => "unknown_node",
            Self::DuplicateNode => "duplicate_node",
            Self::InvalidWeight => "invalid_weight",
            Self::InvalidRank => "invalid_rank",
            Self::InvalidParameter => "invalid_parameter",
            Self::ValidationFailed => "validation_failed",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
