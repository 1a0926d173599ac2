//! The in-memory album index shared by the store backends.
//!
//! The index is the secondary, non-unique mapping from owning album to
//! media ids. Backends keep it consistent with the primary record set on
//! every mutation; the filesystem backend rebuilds it by scanning at open.

use std::collections::{HashMap, HashSet};

use vitrine_types::{AlbumId, MediaId};

/// Bidirectional album/media index.
///
/// `insert` handles the overwrite-with-different-album case: a media id is
/// listed under at most one album at any time.
#[derive(Debug, Default)]
pub struct AlbumIndex {
    by_media: HashMap<MediaId, AlbumId>,
    by_album: HashMap<AlbumId, HashSet<MediaId>>,
}

impl AlbumIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `media` is owned by `album`, replacing any previous
    /// ownership entry for the same media id.
    pub fn insert(&mut self, media: MediaId, album: AlbumId) {
        self.remove_media(&media);
        self.by_album
            .entry(album.clone())
            .or_default()
            .insert(media.clone());
        self.by_media.insert(media, album);
    }

    /// Drop the entry for one media id. Returns the album it was under.
    pub fn remove_media(&mut self, media: &MediaId) -> Option<AlbumId> {
        let album = self.by_media.remove(media)?;
        if let Some(set) = self.by_album.get_mut(&album) {
            set.remove(media);
            if set.is_empty() {
                self.by_album.remove(&album);
            }
        }
        Some(album)
    }

    /// Snapshot the media ids currently listed under an album.
    pub fn media_for(&self, album: &AlbumId) -> Vec<MediaId> {
        self.by_album
            .get(album)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_media.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_media.is_empty()
    }
}
