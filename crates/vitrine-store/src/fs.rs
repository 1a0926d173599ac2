use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::{debug, warn};

use vitrine_types::{AlbumId, MediaId};

use crate::error::{StoreError, StoreResult};
use crate::index::AlbumIndex;
use crate::record::MediaRecord;
use crate::traits::BlobStore;

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Record file extension.
const RECORD_EXT: &str = "rec";

/// Filesystem-backed blob store: one framed record file per media id.
///
/// On-disk format of each record file:
/// ```text
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized MediaRecord)]
/// ```
///
/// Writes go to a temp file in the same directory and are renamed into
/// place, so a reader never observes a partial record. The album index is
/// rebuilt by a full scan at open and maintained in memory afterwards;
/// record files that fail the CRC check during the scan are skipped (torn
/// writes from a crash) and logged.
pub struct FsBlobStore {
    media_dir: PathBuf,
    index: RwLock<AlbumIndex>,
}

impl FsBlobStore {
    /// Open (or create) a blob store rooted at the given directory.
    ///
    /// Creates `<root>/media/` and scans it to rebuild the album index.
    /// Any failure here means the storage is unavailable as a whole.
    pub async fn open(root: &Path) -> StoreResult<Self> {
        let media_dir = root.join("media");
        fs::create_dir_all(&media_dir)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", media_dir.display())))?;

        let mut index = AlbumIndex::new();
        let entries = fs::read_dir(&media_dir)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", media_dir.display())))?;
        for entry in entries {
            let entry =
                entry.map_err(|e| StoreError::Unavailable(format!("scan failed: {e}")))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            match read_record_file(&path) {
                Ok(record) => index.insert(record.id, record.album_id),
                Err(err) => {
                    // Torn or foreign file; leave it behind and keep going.
                    warn!(path = %path.display(), error = %err, "skipping unreadable record file");
                }
            }
        }

        debug!(dir = %media_dir.display(), records = index.len(), "blob store opened");
        Ok(Self {
            media_dir,
            index: RwLock::new(index),
        })
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.index.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.index.read().expect("lock poisoned").is_empty()
    }

    fn record_path(&self, id: &MediaId) -> PathBuf {
        // Ids are opaque strings from arbitrary old installations; hex
        // encoding keeps the file name filesystem-safe regardless.
        self.media_dir
            .join(format!("{}.{RECORD_EXT}", hex::encode(id.as_str())))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, record: &MediaRecord) -> StoreResult<()> {
        let payload = bincode::serialize(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut framed = Vec::with_capacity(HEADER_SIZE + payload.len());
        framed.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        framed.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        framed.extend_from_slice(&payload);

        let mut tmp = tempfile::NamedTempFile::new_in(&self.media_dir)
            .map_err(StoreError::Write)?;
        tmp.write_all(&framed).map_err(StoreError::Write)?;
        tmp.flush().map_err(StoreError::Write)?;
        tmp.persist(self.record_path(&record.id))
            .map_err(|e| StoreError::Write(e.error))?;

        let mut index = self.index.write().expect("lock poisoned");
        index.insert(record.id.clone(), record.album_id.clone());
        Ok(())
    }

    async fn get(&self, id: &MediaId) -> StoreResult<Option<MediaRecord>> {
        let path = self.record_path(id);
        match read_record_file(&path) {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::Read(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn delete_by_album(&self, album_id: &AlbumId) -> StoreResult<usize> {
        let mut removed = 0;
        // Cursor semantics: re-snapshot after each pass until nothing
        // matching the album remains, so a half-applied pass is retried.
        loop {
            let ids = {
                let index = self.index.read().expect("lock poisoned");
                index.media_for(album_id)
            };
            if ids.is_empty() {
                break;
            }
            for id in ids {
                let path = self.record_path(&id);
                match fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(StoreError::Write(e)),
                }
                self.index.write().expect("lock poisoned").remove_media(&id);
            }
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for FsBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlobStore")
            .field("media_dir", &self.media_dir)
            .field("record_count", &self.len())
            .finish()
    }
}

/// Read and verify one framed record file.
fn read_record_file(path: &Path) -> StoreResult<MediaRecord> {
    let bytes = fs::read(path).map_err(StoreError::Read)?;
    let label = path.display().to_string();

    if bytes.len() < HEADER_SIZE {
        return Err(StoreError::Corrupt {
            id: label,
            reason: format!("file too short ({} bytes)", bytes.len()),
        });
    }
    let length = u32::from_le_bytes(bytes[0..4].try_into().expect("4-byte slice")) as usize;
    let crc = u32::from_le_bytes(bytes[4..8].try_into().expect("4-byte slice"));
    let payload = &bytes[HEADER_SIZE..];

    if payload.len() != length {
        return Err(StoreError::Corrupt {
            id: label,
            reason: format!("length mismatch: header {length}, actual {}", payload.len()),
        });
    }
    if crc32fast::hash(payload) != crc {
        return Err(StoreError::Corrupt {
            id: label,
            reason: "checksum mismatch".to_string(),
        });
    }

    bincode::deserialize(payload).map_err(|e| StoreError::Serialization(e.to_string()))
}
