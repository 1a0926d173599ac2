use chrono::{DateTime, Utc};
use tracing::debug;

use vitrine_state::AppState;
use vitrine_store::{BlobStore, MediaRecord, StoreResult};
use vitrine_types::MediaId;

use crate::data_url::decode_data_url;

/// Display name assumed for legacy entries that never had one.
const FALLBACK_NAME: &str = "media";

/// Outcome of one migration pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Entries whose payload was moved into the blob store.
    pub migrated: usize,
    /// Entries with an inline payload that failed to decode and were left
    /// as-is.
    pub skipped: usize,
}

impl MigrationReport {
    /// Whether the metadata was mutated and needs to be persisted once.
    pub fn changed(&self) -> bool {
        self.migrated > 0
    }
}

/// Move every inline-encoded media payload in `state` into the blob store.
///
/// For each entry carrying a `data:`-prefixed inline payload: decode it,
/// assign an id if the entry has none, write a [`MediaRecord`], then strip
/// the inline field from the in-memory entry. Undecodable payloads are
/// skipped silently (debug log only) and the pass continues. Store write
/// failures propagate: the already-migrated entries keep their new shape
/// and the failing entry keeps its inline payload for a later attempt.
///
/// The caller persists the metadata exactly once iff
/// [`MigrationReport::changed`] — never per entry.
///
/// Idempotent: entries without an inline payload are untouched, so a
/// second pass over migrated metadata performs no writes.
pub async fn migrate_legacy_media(
    state: &mut AppState,
    store: &dyn BlobStore,
) -> StoreResult<MigrationReport> {
    let mut report = MigrationReport::default();

    for album in &mut state.albums {
        let album_id = album.id.clone();
        let album_created = album.created_at;

        for entry in &mut album.media {
            let Some(data_url) = entry.data_url.as_deref() else {
                continue;
            };
            if !data_url.starts_with("data:") {
                continue;
            }

            let Some((_mime, payload)) = decode_data_url(data_url) else {
                debug!(album = %album_id, name = %entry.name, "skipping undecodable inline media");
                report.skipped += 1;
                continue;
            };

            if entry.id.is_empty() {
                entry.id = MediaId::generate();
            }
            let created_at = entry.created_at.unwrap_or_else(|| {
                // Epoch marks an album whose own timestamp was missing.
                if album_created == DateTime::UNIX_EPOCH {
                    Utc::now()
                } else {
                    album_created
                }
            });
            let name = if entry.name.is_empty() {
                FALLBACK_NAME.to_string()
            } else {
                entry.name.clone()
            };

            store
                .put(&MediaRecord {
                    id: entry.id.clone(),
                    album_id: album_id.clone(),
                    kind: entry.kind,
                    name,
                    payload,
                    created_at,
                })
                .await?;

            entry.data_url = None;
            report.migrated += 1;
        }
    }

    Ok(report)
}
