//! The [`MetadataSlot`] port: one named key holding the JSON document.
//!
//! Any backend (in-memory, file, embedded database) implements this trait
//! to give the state layer somewhere to keep the document. Reads and
//! writes cover the whole document at once; there is no partial update.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{StateError, StateResult};

/// ENOSPC, for mapping out-of-space I/O errors to the quota error.
const ENOSPC: i32 = 28;

/// Storage backend for the single metadata document.
///
/// Implementations must be thread-safe (`Send + Sync`) and atomic per
/// call: a reader never observes a torn document.
pub trait MetadataSlot: Send + Sync {
    /// Read the whole document. `Ok(None)` if nothing was ever written.
    fn read(&self) -> StateResult<Option<String>>;

    /// Replace the whole document.
    fn write(&self, document: &str) -> StateResult<()>;
}

/// In-memory slot for tests and ephemeral sessions.
///
/// An optional byte quota makes [`StateError::QuotaExceeded`] reachable in
/// tests, standing in for a full browser-style storage backend.
#[derive(Debug, Default)]
pub struct MemorySlot {
    document: RwLock<Option<String>>,
    quota_bytes: Option<usize>,
}

impl MemorySlot {
    /// Create an empty slot without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty slot that rejects documents larger than `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            document: RwLock::new(None),
            quota_bytes: Some(bytes),
        }
    }
}

impl MetadataSlot for MemorySlot {
    fn read(&self) -> StateResult<Option<String>> {
        Ok(self.document.read().expect("lock poisoned").clone())
    }

    fn write(&self, document: &str) -> StateResult<()> {
        if let Some(quota) = self.quota_bytes {
            if document.len() > quota {
                return Err(StateError::QuotaExceeded(format!(
                    "{} bytes exceeds the {quota}-byte quota",
                    document.len()
                )));
            }
        }
        *self.document.write().expect("lock poisoned") = Some(document.to_string());
        Ok(())
    }
}

/// File-backed slot: the document lives in one JSON file.
///
/// Writes go to a temp file in the parent directory and are renamed into
/// place, so a crashed write leaves the previous document intact.
#[derive(Debug)]
pub struct FsSlot {
    path: PathBuf,
}

impl FsSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl MetadataSlot for FsSlot {
    fn read(&self) -> StateResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StateError::Read(e)),
        }
    }

    fn write(&self, document: &str) -> StateResult<()> {
        let map_io = |e: std::io::Error| {
            if e.raw_os_error() == Some(ENOSPC) {
                StateError::QuotaExceeded(e.to_string())
            } else {
                StateError::Write(e)
            }
        };

        let parent = self.path.parent().unwrap_or_else(|| std::path::Path::new("."));
        fs::create_dir_all(parent).map_err(map_io)?;
        let tmp = tempfile::NamedTempFile::new_in(parent).map_err(map_io)?;
        fs::write(tmp.path(), document).map_err(map_io)?;
        tmp.persist(&self.path).map_err(|e| map_io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_slot_roundtrip() {
        let slot = MemorySlot::new();
        assert!(slot.read().unwrap().is_none());
        slot.write("{\"albums\":[]}").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("{\"albums\":[]}"));
    }

    #[test]
    fn memory_slot_quota_rejects_large_documents() {
        let slot = MemorySlot::with_quota(4);
        assert!(matches!(
            slot.write("too large").unwrap_err(),
            StateError::QuotaExceeded(_)
        ));
        // The failed write left nothing behind.
        assert!(slot.read().unwrap().is_none());
        slot.write("ok").unwrap();
    }

    #[test]
    fn fs_slot_roundtrip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FsSlot::new(dir.path().join("state.json"));
        assert!(slot.read().unwrap().is_none());

        slot.write("one").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("one"));
        slot.write("two").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn fs_slot_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FsSlot::new(dir.path().join("nested/deeper/state.json"));
        slot.write("{}").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("{}"));
    }
}
