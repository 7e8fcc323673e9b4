// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for filter compilation and retrieval.

use serde_json::Value;
use thiserror::Error;

/// A filter tree that cannot be compiled into a search query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// A group without a combinator must hold exactly one filter.
    #[error("Operator is missing: a group without `op` needs exactly one filter, got {0}")]
    MissingOperator(usize),
    #[error("Invalid operator '{0}'")]
    InvalidOperator(String),
    /// An operator filter was reached with no `attributeName` set by any ancestor.
    #[error("No attributeName set for operator filter '{0}'")]
    UnresolvedAttribute(String),
    #[error("Attribute '{inner}' cannot override enclosing attribute '{outer}'")]
    AttributeOverride { outer: String, inner: String },
    #[error("Group mixes operator filters with nested groups")]
    MixedChildren,
    #[error("Invalid filter: {0}")]
    Invalid(String),
}

impl FilterError {
    /// Short label used for metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::MissingOperator(_) => "missing_operator",
            FilterError::InvalidOperator(_) => "invalid_operator",
            FilterError::UnresolvedAttribute(_) => "unresolved_attribute",
            FilterError::AttributeOverride { .. } => "attribute_override",
            FilterError::MixedChildren => "mixed_children",
            FilterError::Invalid(_) => "invalid",
        }
    }
}

/// Errors surfaced by [`retrieve`](crate::retrieve()).
///
/// None of these are recovered locally: the call fails as a whole.
#[derive(Error, Debug)]
pub enum RetrieveError {
    #[error("Malformed filter tree: {0}")]
    MalformedFilterTree(#[from] FilterError),
    #[error("The given cursor is malformed: {0}")]
    MalformedCursor(String),
    #[error("Invalid index name '{0}'")]
    InvalidIndexName(String),
    /// The backend answered with a non-success status. `meta` is its raw payload.
    #[error("Search backend returned status {status}: {meta}")]
    Backend { status: u16, meta: Value },
    #[error("Search backend transport error: {0}")]
    Transport(String),
    #[error("Failed to decode search hit: {0}")]
    Decode(String),
}

impl RetrieveError {
    /// True for errors caused by the caller's input (filters, cursor, index name),
    /// false for infrastructure faults.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            RetrieveError::MalformedFilterTree(_)
                | RetrieveError::MalformedCursor(_)
                | RetrieveError::InvalidIndexName(_)
        )
    }

    /// Short label used for metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RetrieveError::MalformedFilterTree(_) => "malformed_filter",
            RetrieveError::MalformedCursor(_) => "malformed_cursor",
            RetrieveError::InvalidIndexName(_) => "invalid_index_name",
            RetrieveError::Backend { .. } => "backend",
            RetrieveError::Transport(_) => "transport",
            RetrieveError::Decode(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for RetrieveError {
    fn from(e: reqwest::Error) -> Self {
        RetrieveError::Transport(e.to_string())
    }
}

pub type Result<T, E = RetrieveError> = std::result::Result<T, E>;
