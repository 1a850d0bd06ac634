/// Error types for the sorting pipeline.
///
/// Errors are split by origin: `SortError` is what `sort` surfaces to the
/// caller, while `JudgeError` and `CacheError` are collaborator failures that
/// the match runner recovers from locally (error rounds and cache misses
/// respectively) and never propagates.
use thiserror::Error;

/// Fatal errors surfaced by [`crate::sorter::QualitativeSorter::sort`].
#[derive(Debug, Error)]
pub enum SortError {
    /// The input item list was empty.
    #[error("items must not be empty")]
    EmptyItems,

    /// Two input items had identical text.
    #[error("duplicate item: {0:?}")]
    DuplicateItem(String),

    /// A configuration value was below its minimum of 1.
    #[error("{field} must be at least 1")]
    InvalidConfiguration { field: &'static str },

    /// The caller cancelled the sort between batches.
    #[error("sort cancelled")]
    Cancelled,

    /// A bookkeeping invariant was violated; indicates a bug.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failures reported by a [`crate::judge::Judge`].
///
/// Never fatal: the match runner turns these into rounds with no winner.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// Network or transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The judge responded, but the response was unusable.
    #[error("invalid judge response: {0}")]
    InvalidResponse(String),
}

/// Failures reported by a [`crate::cache::Cache`].
///
/// Never fatal: reads that fail count as misses, writes that fail are logged
/// and dropped.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry could not be decoded.
    #[error("corrupt cache entry: {0}")]
    Corrupt(String),
}
