use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::fs::FsBlobStore;

/// Lazily opened, process-wide handle to the filesystem blob store.
///
/// The store is opened at most once per handle lifetime. Callers arriving
/// while the open is still in flight all await the same pending open
/// rather than racing to open twice, so the directory scan runs exactly
/// once. A failed open is remembered: every later call reports
/// [`StoreError::Unavailable`] without retrying, leaving the application in
/// a degraded mode where media operations fail per-call.
pub struct SharedBlobStore {
    root: PathBuf,
    cell: OnceCell<Result<Arc<FsBlobStore>, String>>,
    opens: AtomicUsize,
}

impl SharedBlobStore {
    /// Create a handle rooted at the given directory. No I/O happens yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cell: OnceCell::new(),
            opens: AtomicUsize::new(0),
        }
    }

    /// The store, opening it on first use.
    pub async fn get(&self) -> StoreResult<Arc<FsBlobStore>> {
        let slot = self
            .cell
            .get_or_init(|| async {
                self.opens.fetch_add(1, Ordering::SeqCst);
                match FsBlobStore::open(&self.root).await {
                    Ok(store) => Ok(Arc::new(store)),
                    Err(err) => {
                        warn!(root = %self.root.display(), error = %err, "blob store open failed");
                        Err(err.to_string())
                    }
                }
            })
            .await;
        match slot {
            Ok(store) => Ok(Arc::clone(store)),
            Err(msg) => Err(StoreError::Unavailable(msg.clone())),
        }
    }

    /// How many times an actual open was attempted. At most 1.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Returns `true` once an open attempt has completed, in failure too.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

impl std::fmt::Debug for SharedBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedBlobStore")
            .field("root", &self.root)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
