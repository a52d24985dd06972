/// Errors from store operations.
///
/// Not-found is deliberately absent: missing records read as empty and
/// `exists` answers `false`. Path-traversal attempts are surfaced as empty
/// or `false` results from the affected call, never as a distinct error,
/// so callers learn nothing about the filesystem outside the root.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Invalid argument: empty name, empty search term, or a name whose
    /// resolved path falls outside the store root on a write.
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O failure: directory creation, file read, file write, or delete.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or record text could not be serialized/deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
