use vitrine_store::StoreError;
use vitrine_types::{AlbumId, MediaId};

/// Errors surfaced by gallery operations.
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// An album must have a non-empty name.
    #[error("album name must not be empty")]
    EmptyAlbumName,

    /// No album with this id exists.
    #[error("album not found: {0}")]
    AlbumNotFound(AlbumId),

    /// The album exists but has no such media entry.
    #[error("media not found: {0}")]
    MediaNotFound(MediaId),

    /// Sign-up or login called without both an email and a password.
    #[error("email and password are required")]
    MissingCredentials,

    /// Sign-up with an email that already has an account.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// Login with an unknown email or a wrong password.
    #[error("email or password is incorrect")]
    InvalidCredentials,

    /// A blob store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for gallery operations.
pub type GalleryResult<T> = Result<T, GalleryError>;
