use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_types::{AlbumId, MediaId, MediaKind};

/// One stored media asset: binary payload plus owning-album metadata.
///
/// Identity is `id`, globally unique and generated at creation. A record is
/// owned by exactly one album and is deleted when that album is deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: MediaId,
    pub album_id: AlbumId,
    pub kind: MediaKind,
    /// Display name, typically the original file name.
    pub name: String,
    pub payload: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl MediaRecord {
    /// Build a record with a freshly generated id and the current time.
    pub fn new(
        album_id: AlbumId,
        kind: MediaKind,
        name: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            id: MediaId::generate(),
            album_id,
            kind,
            name: name.into(),
            payload,
            created_at: Utc::now(),
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }
}
