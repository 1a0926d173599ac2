/// Errors from metadata slot operations.
///
/// All of these are non-fatal at the application boundary: the in-memory
/// state stays authoritative for the session even when a write fails.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The slot rejected the write for lack of space.
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Writing the slot failed below the quota layer.
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    /// Reading the slot failed.
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    /// Serializing the state document failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for metadata operations.
pub type StateResult<T> = Result<T, StateError>;
