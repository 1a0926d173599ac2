use async_trait::async_trait;

use vitrine_types::{AlbumId, MediaId};

use crate::error::StoreResult;
use crate::record::MediaRecord;

/// Media blob store keyed by record id.
///
/// All implementations must satisfy these invariants:
/// - `put` inserts or overwrites atomically: no partially written record is
///   ever visible to a reader.
/// - `get` of a missing id returns `Ok(None)`, never an error.
/// - `delete_by_album` completes even when zero records match, and leaves
///   no matching record behind (it re-scans until exhausted).
/// - Independent operations are unordered relative to each other; a caller
///   must await a write before relying on reading it back.
/// - All I/O errors are propagated, never silently ignored.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Insert or overwrite a record by id.
    async fn put(&self, record: &MediaRecord) -> StoreResult<()>;

    /// Read a record by id.
    ///
    /// Returns `Ok(None)` if no record with this id exists.
    async fn get(&self, id: &MediaId) -> StoreResult<Option<MediaRecord>>;

    /// Check whether a record exists.
    async fn contains(&self, id: &MediaId) -> StoreResult<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Remove every record owned by the given album, via the album index.
    ///
    /// Returns the number of records removed (possibly zero).
    async fn delete_by_album(&self, album_id: &AlbumId) -> StoreResult<usize>;
}
