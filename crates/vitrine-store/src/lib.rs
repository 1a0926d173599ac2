//! Durable blob storage for Vitrine media payloads.
//!
//! Albums in the metadata document reference their media by id only; the
//! bytes live here. Each [`MediaRecord`] couples a binary payload with the
//! owning album id, kind, display name, and creation time. A secondary
//! index on the owning album supports bulk deletion when an album is
//! removed.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`MemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- one CRC-framed record file per media id
//!
//! # Design Rules
//!
//! 1. `put` is atomic: a partially written record is never visible.
//! 2. `get` of a missing id is `Ok(None)`, never an error.
//! 3. `delete_by_album` loops until no matching record remains.
//! 4. Independent operations carry no ordering guarantee; callers await a
//!    write before depending on its visibility.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod index;
pub mod memory;
pub mod record;
pub mod shared;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
pub use record::MediaRecord;
pub use shared::SharedBlobStore;
pub use traits::BlobStore;
