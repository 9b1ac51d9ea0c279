//! Error kinds raised while constructing or combining domain values.

/// Failures that can occur while building or combining domain points, intervals
/// or their N-D lifts.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// An `Open` boundary was requested for a value whose type is discrete, or
    /// two points/intervals/boxes of mismatched arity were combined.
    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),
}

/// Convenience alias for fallible domain operations.
pub type Result<T> = core::result::Result<T, DomainError>;
