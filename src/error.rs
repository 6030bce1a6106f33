//! Error type shared by every trie operation.

use thiserror::Error;

/// Errors returned by [`HierarchicalList`](crate::HierarchicalList) operations.
///
/// `PrefixMismatch` and `NotFound` are benign: the call had no effect and the
/// trie is untouched. Everything else is surfaced to the caller as a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The key (or prefix) exceeds the configured byte budget.
    #[error("key is {len} bytes, limit is {max}")]
    KeyTooLong { len: usize, max: usize },

    /// The first segment is not the configured root prefix.
    #[error("key does not start with the configured root prefix")]
    PrefixMismatch,

    /// A segment along the requested path does not exist.
    #[error("path not found")]
    NotFound,

    /// Allocating a segment for a new node failed. The trie is unchanged.
    #[error("allocation failed while inserting key")]
    AllocationFailure,

    /// Internal bookkeeping is corrupt; the context should be discarded.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ListError {
    /// Whether the error only signals "nothing to do".
    pub fn is_benign(&self) -> bool {
        matches!(self, ListError::PrefixMismatch | ListError::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, ListError>;
