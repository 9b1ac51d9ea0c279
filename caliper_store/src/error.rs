//! Error kinds for the dimensional data engine.

use caliper_domain::DomainError;

/// Failures raised by [`crate::DimensionalStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Mismatched arity between points/intervals, or an otherwise malformed
    /// boundary, propagated from the domain algebra.
    #[error(transparent)]
    InvalidBoundary(#[from] DomainError),

    /// `replace_by_key` found no entry starting at the given point.
    #[error("no entry starts at the given key")]
    KeyNotFound,

    /// `REQUIRE_DISJOINT` is enabled and raw input violated pairwise
    /// disjointness.
    #[error("input entries are not pairwise disjoint")]
    NonDisjointInput,
}

/// Convenience alias for fallible store operations.
pub type Result<T> = core::result::Result<T, StoreError>;
