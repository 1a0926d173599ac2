//! High-level Vitrine gallery API.
//!
//! [`Gallery`] is the single owner of the application state and the
//! storage ports behind it: the metadata slot, the lazily opened blob
//! store, and the media handle cache. Front ends (the CLI, or any other
//! shell) call its methods and render the results; the core never calls
//! back into rendering.
//!
//! Storage failures follow one policy throughout: they are caught at the
//! boundary nearest the user action and downgraded to a warning. A failed
//! metadata persist leaves the in-memory state authoritative for the
//! session; an unavailable blob store degrades media display and upload
//! per-operation without taking the rest of the gallery down.

pub mod draft;
pub mod error;
pub mod gallery;

pub use draft::{parse_tags, AlbumDraft, GalleryStats, PendingUpload};
pub use error::{GalleryError, GalleryResult};
pub use gallery::Gallery;

pub use vitrine_cache::MediaHandle;
pub use vitrine_migrate::MigrationReport;
