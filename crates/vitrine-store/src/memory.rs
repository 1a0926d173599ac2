use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use vitrine_types::{AlbumId, MediaId};

use crate::error::StoreResult;
use crate::index::AlbumIndex;
use crate::record::MediaRecord;
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Records are held behind a `RwLock`
/// and cloned on read. Data is lost when the store is dropped.
pub struct MemoryBlobStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    records: HashMap<MediaId, MediaRecord>,
    index: AlbumIndex,
}

impl MemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").records.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").records.is_empty()
    }

    /// Total payload bytes across all records.
    pub fn total_bytes(&self) -> u64 {
        self.inner
            .read()
            .expect("lock poisoned")
            .records
            .values()
            .map(|rec| rec.size())
            .sum()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, record: &MediaRecord) -> StoreResult<()> {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner
            .index
            .insert(record.id.clone(), record.album_id.clone());
        inner.records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &MediaId) -> StoreResult<Option<MediaRecord>> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.records.get(id).cloned())
    }

    async fn delete_by_album(&self, album_id: &AlbumId) -> StoreResult<usize> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let mut removed = 0;
        // Cursor semantics: keep draining until no matching record remains.
        loop {
            let ids = inner.index.media_for(album_id);
            if ids.is_empty() {
                break;
            }
            for id in ids {
                inner.index.remove_media(&id);
                if inner.records.remove(&id).is_some() {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for MemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBlobStore")
            .field("record_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_types::MediaKind;

    fn record(album: &str, name: &str, payload: &[u8]) -> MediaRecord {
        MediaRecord::new(
            AlbumId::from_string(album),
            MediaKind::Image,
            name,
            payload.to_vec(),
        )
    }

    #[tokio::test]
    async fn put_then_get_returns_equal_record() {
        let store = MemoryBlobStore::new();
        let rec = record("alb_trip", "beach.jpg", b"jpegbytes");
        store.put(&rec).await.unwrap();

        let back = store.get(&rec.id).await.unwrap().expect("should exist");
        assert_eq!(back, rec);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = MemoryBlobStore::new();
        let got = store.get(&MediaId::from_string("m_missing")).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn put_overwrites_by_id() {
        let store = MemoryBlobStore::new();
        let mut rec = record("alb_1", "a.jpg", b"v1");
        store.put(&rec).await.unwrap();
        rec.payload = b"v2".to_vec();
        store.put(&rec).await.unwrap();

        assert_eq!(store.len(), 1);
        let back = store.get(&rec.id).await.unwrap().unwrap();
        assert_eq!(back.payload, b"v2");
    }

    #[tokio::test]
    async fn delete_by_album_removes_all_matches() {
        let store = MemoryBlobStore::new();
        let a = record("alb_1", "a.jpg", b"a");
        let b = record("alb_1", "b.jpg", b"b");
        let other = record("alb_2", "c.jpg", b"c");
        store.put(&a).await.unwrap();
        store.put(&b).await.unwrap();
        store.put(&other).await.unwrap();

        let removed = store
            .delete_by_album(&AlbumId::from_string("alb_1"))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(store.get(&a.id).await.unwrap().is_none());
        assert!(store.get(&b.id).await.unwrap().is_none());
        assert!(store.get(&other.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_by_album_with_no_matches_is_ok() {
        let store = MemoryBlobStore::new();
        let removed = store
            .delete_by_album(&AlbumId::from_string("alb_empty"))
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn overwrite_into_other_album_updates_index() {
        let store = MemoryBlobStore::new();
        let mut rec = record("alb_1", "a.jpg", b"a");
        store.put(&rec).await.unwrap();
        rec.album_id = AlbumId::from_string("alb_2");
        store.put(&rec).await.unwrap();

        assert_eq!(
            store
                .delete_by_album(&AlbumId::from_string("alb_1"))
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .delete_by_album(&AlbumId::from_string("alb_2"))
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn contains_and_total_bytes() {
        let store = MemoryBlobStore::new();
        let rec = record("alb_1", "a.jpg", b"12345");
        store.put(&rec).await.unwrap();

        assert!(store.contains(&rec.id).await.unwrap());
        assert!(!store
            .contains(&MediaId::from_string("m_other"))
            .await
            .unwrap());
        assert_eq!(store.total_bytes(), 5);
    }
}
