//! Error kinds for the versioned overlay.

/// Failures raised by [`crate::VersionedStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// A request for a version outside the retained history.
    #[error("version {requested} is out of range ({oldest}..={current})")]
    VersionOutOfRange {
        /// The version that was requested.
        requested: i32,
        /// The oldest version still retained.
        oldest: i32,
        /// The current (latest approved) version.
        current: i32,
    },

    /// `current_version` would overflow `i32` on the next approval.
    #[error("version counter exhausted at {0}")]
    VersionExhausted(i32),

    /// A write was attempted under [`crate::VersionSelection::At`]; past
    /// versions are immutable history.
    #[error("version {0} is retained history and cannot be written to")]
    ReadOnlyVersion(i32),

    /// A propagated failure from the underlying store.
    #[error(transparent)]
    Store(#[from] caliper_store::StoreError),
}

/// Convenience alias for fallible versioned-overlay operations.
pub type Result<T> = core::result::Result<T, VersionError>;
