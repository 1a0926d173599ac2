use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::warn;

use vitrine_store::BlobStore;
use vitrine_types::MediaId;

use crate::handle::MediaHandle;

/// Mapping from media id to its one live handle.
///
/// At most one handle is live per id while cached: concurrent resolves of
/// the same id converge on a single `Arc` instead of materializing twice.
#[derive(Default)]
pub struct MediaCache {
    handles: RwLock<HashMap<MediaId, Arc<MediaHandle>>>,
}

impl MediaCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The live handle for `id`, materializing it from the store on first
    /// access.
    ///
    /// Returns `None` when the id has no record (never persisted, or lost
    /// to an earlier storage failure) and when the store itself fails; a
    /// missing display asset is not an error to the caller.
    pub async fn resolve(
        &self,
        id: &MediaId,
        store: &dyn BlobStore,
    ) -> Option<Arc<MediaHandle>> {
        if let Some(handle) = self.handles.read().expect("lock poisoned").get(id) {
            return Some(Arc::clone(handle));
        }

        let record = match store.get(id).await {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(err) => {
                warn!(media = %id, error = %err, "media resolve failed");
                return None;
            }
        };

        let handle = Arc::new(MediaHandle::from_record(record));
        let mut handles = self.handles.write().expect("lock poisoned");
        // Another interleaved resolve may have won the store read; keep the
        // cached handle so the one-live-handle invariant holds.
        Some(Arc::clone(
            handles.entry(id.clone()).or_insert(handle),
        ))
    }

    /// Drop the cached handle for `id`. Returns `true` if one was cached.
    ///
    /// Must be called whenever the media record is deleted; the cache never
    /// evicts on its own.
    pub fn release(&self, id: &MediaId) -> bool {
        self.handles
            .write()
            .expect("lock poisoned")
            .remove(id)
            .is_some()
    }

    /// Drop every cached handle.
    pub fn clear(&self) {
        self.handles.write().expect("lock poisoned").clear();
    }

    /// Number of live handles currently cached.
    pub fn len(&self) -> usize {
        self.handles.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.handles.read().expect("lock poisoned").is_empty()
    }
}

impl std::fmt::Debug for MediaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCache")
            .field("handle_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_store::{MediaRecord, MemoryBlobStore};
    use vitrine_types::{AlbumId, MediaKind};

    async fn seeded_store() -> (MemoryBlobStore, MediaRecord) {
        let store = MemoryBlobStore::new();
        let record = MediaRecord::new(
            AlbumId::from_string("alb_1"),
            MediaKind::Image,
            "a.jpg",
            b"pixels".to_vec(),
        );
        store.put(&record).await.unwrap();
        (store, record)
    }

    #[tokio::test]
    async fn resolve_materializes_and_caches() {
        let (store, record) = seeded_store().await;
        let cache = MediaCache::new();

        let handle = cache.resolve(&record.id, &store).await.expect("handle");
        assert_eq!(&handle.data[..], b"pixels");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn repeated_resolve_returns_the_identical_handle() {
        let (store, record) = seeded_store().await;
        let cache = MediaCache::new();

        let first = cache.resolve(&record.id, &store).await.unwrap();
        let second = cache.resolve(&record.id, &store).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn release_then_resolve_produces_a_fresh_handle() {
        let (store, record) = seeded_store().await;
        let cache = MediaCache::new();

        let first = cache.resolve(&record.id, &store).await.unwrap();
        assert!(cache.release(&record.id));
        assert!(cache.is_empty());

        let fresh = cache.resolve(&record.id, &store).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &fresh));
        // The old handle stays readable for whoever still holds it.
        assert_eq!(&first.data[..], b"pixels");
    }

    #[tokio::test]
    async fn resolve_missing_record_is_none() {
        let store = MemoryBlobStore::new();
        let cache = MediaCache::new();
        let got = cache
            .resolve(&MediaId::from_string("m_missing"), &store)
            .await;
        assert!(got.is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn release_of_uncached_id_is_false() {
        let cache = MediaCache::new();
        assert!(!cache.release(&MediaId::from_string("m_never")));
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let (store, record) = seeded_store().await;
        let cache = MediaCache::new();
        cache.resolve(&record.id, &store).await.unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
