/// Errors from parsing foundation types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The string is not a recognized media kind.
    #[error("unknown media kind: {0:?}")]
    UnknownKind(String),

    /// An identifier must not be empty.
    #[error("empty identifier")]
    EmptyId,
}
