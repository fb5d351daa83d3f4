use ipr_types::Cid;

/// Errors from block store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested block was not found.
    #[error("block not found: {0}")]
    NotFound(Cid),

    /// Block bytes do not hash to the digest in their CID.
    #[error("hash mismatch for block {0}")]
    HashMismatch(Cid),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The block data or its on-disk name is malformed.
    #[error("corrupt block {name}: {reason}")]
    CorruptBlock { name: String, reason: String },

    /// Storage backend is read-only or otherwise unavailable.
    #[error("store is read-only")]
    ReadOnly,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
