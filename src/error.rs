//! Crate-wide error taxonomy.
//!
//! Every executor, the dispatcher, and the result algebra report failures
//! through this single closed set of variants. Per-condition errors are not
//! recovered locally anywhere in the core: the first failure from a child
//! propagates through `Logical`/`Not`/the join unchanged, and the top-level
//! caller sees it verbatim.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, QueryError>;

/// The closed error taxonomy for query execution.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A required named index was not present on the corpus.
    #[error("missing required index `{index}` for condition `{condition}`")]
    MissingIndex {
        index: String,
        condition: String,
    },

    /// A lookup, iteration, or deserialization call into the index adapter failed.
    #[error("index access failed for condition `{condition}`: {source}")]
    IndexAccessError {
        condition: String,
        #[source]
        source: anyhow::Error,
    },

    /// The condition's shape is not acceptable (arity, malformed `alias.key`,
    /// an unsupported wildcard pattern).
    #[error("invalid condition `{condition}`: {reason}")]
    InvalidCondition { condition: String, reason: String },

    /// The condition is syntactically valid but not implemented.
    #[error("unsupported operation in condition `{condition}`: {reason}")]
    UnsupportedOperation { condition: String, reason: String },

    /// An internal invariant was violated.
    #[error("internal error in condition `{condition}`: {reason}")]
    InternalError { condition: String, reason: String },
}

impl QueryError {
    /// The originating condition's string form, present on every variant.
    pub fn condition(&self) -> &str {
        match self {
            QueryError::MissingIndex { condition, .. }
            | QueryError::IndexAccessError { condition, .. }
            | QueryError::InvalidCondition { condition, .. }
            | QueryError::UnsupportedOperation { condition, .. }
            | QueryError::InternalError { condition, .. } => condition,
        }
    }
}
