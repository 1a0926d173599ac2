/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying storage could not be opened. Once the open has
    /// failed, every later operation against the shared handle reports
    /// this same condition.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A store write failed below the record layer.
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    /// A store read failed below the record layer.
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    /// A record file exists but its framing or checksum is invalid.
    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
