use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use vitrine_cache::{MediaCache, MediaHandle};
use vitrine_migrate::{migrate_legacy_media, MigrationReport};
use vitrine_state::{
    load, persist, Album, AlbumMediaEntry, AppState, CurrentUser, MetadataSlot, StateResult,
    UserAccount, ViewMode,
};
use vitrine_store::{BlobStore, MediaRecord, SharedBlobStore, StoreResult};
use vitrine_types::{AlbumId, MediaId, UserId};

use crate::draft::{AlbumDraft, GalleryStats, MAX_TAGS, MAX_UPLOADS};
use crate::error::{GalleryError, GalleryResult};

/// The gallery: owner of the application state and its storage ports.
///
/// All mutation flows through here. The blob store opens lazily on first
/// media operation; an open failure puts the gallery in a degraded mode
/// where album text metadata keeps working and media operations fail (or
/// resolve to nothing) per call.
pub struct Gallery {
    state: AppState,
    slot: Arc<dyn MetadataSlot>,
    store: SharedBlobStore,
    cache: MediaCache,
}

impl Gallery {
    /// Load persisted state, open the blob store, and run the legacy
    /// migration. Storage trouble during startup is warn-logged, never
    /// fatal: the gallery always comes up.
    pub async fn open(slot: Arc<dyn MetadataSlot>, store_root: impl Into<PathBuf>) -> Self {
        let state = load(slot.as_ref());
        let mut gallery = Self {
            state,
            slot,
            store: SharedBlobStore::new(store_root),
            cache: MediaCache::new(),
        };
        gallery.run_legacy_migration().await;
        gallery
    }

    /// The current application state, read-only.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    // ---------------------------------------------------------------
    // Collaborator surface: media
    // ---------------------------------------------------------------

    /// A displayable handle for a media id, or `None` when the record is
    /// missing or storage is unavailable.
    pub async fn resolve_media(&self, id: &MediaId) -> Option<Arc<MediaHandle>> {
        let store = match self.store.get().await {
            Ok(store) => store,
            Err(err) => {
                warn!(media = %id, error = %err, "cannot resolve media");
                return None;
            }
        };
        self.cache.resolve(id, store.as_ref()).await
    }

    /// Release the cached handle for a media id.
    pub fn release_media(&self, id: &MediaId) -> bool {
        self.cache.release(id)
    }

    /// Write a media record to the blob store.
    pub async fn put_media(&self, record: &MediaRecord) -> StoreResult<()> {
        self.store.get().await?.put(record).await
    }

    /// Delete every blob record owned by an album.
    pub async fn delete_album_media(&self, album_id: &AlbumId) -> StoreResult<usize> {
        self.store.get().await?.delete_by_album(album_id).await
    }

    // ---------------------------------------------------------------
    // Collaborator surface: metadata
    // ---------------------------------------------------------------

    /// Persist the full state to the metadata slot.
    pub fn persist(&self) -> StateResult<()> {
        persist(&self.state, self.slot.as_ref())
    }

    /// Persist, downgrading failure to a warning. In-memory state stays
    /// the source of truth for the session either way.
    fn persist_or_warn(&self) {
        if let Err(err) = self.persist() {
            warn!(error = %err, "metadata persist failed; keeping in-memory state");
        }
    }

    /// Move legacy inline media payloads into the blob store, persisting
    /// the rewritten metadata exactly once if anything changed.
    pub async fn run_legacy_migration(&mut self) -> MigrationReport {
        let store = match self.store.get().await {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "storage unavailable, media will not display");
                return MigrationReport::default();
            }
        };
        match migrate_legacy_media(&mut self.state, store.as_ref()).await {
            Ok(report) => {
                if report.changed() {
                    self.persist_or_warn();
                }
                report
            }
            Err(err) => {
                warn!(error = %err, "legacy media migration aborted");
                MigrationReport::default()
            }
        }
    }

    // ---------------------------------------------------------------
    // Accounts (mock credentials, plaintext by design of the source)
    // ---------------------------------------------------------------

    /// Register an account and sign it in.
    pub fn sign_up(&mut self, email: &str, password: &str) -> GalleryResult<CurrentUser> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(GalleryError::MissingCredentials);
        }
        if self.state.users.contains_key(&email) {
            return Err(GalleryError::EmailTaken);
        }

        let name = email
            .split('@')
            .next()
            .filter(|part| !part.is_empty())
            .unwrap_or("user")
            .to_string();
        let account = UserAccount {
            id: UserId::generate(),
            name: name.clone(),
            email: email.clone(),
            password: password.to_string(),
            avatar_url: avatar_url_for(&email),
        };
        let user = CurrentUser {
            id: account.id.clone(),
            name,
            email: email.clone(),
            provider: "email".to_string(),
            avatar_url: account.avatar_url.clone(),
        };
        self.state.users.insert(email, account);
        self.state.current_user = Some(user.clone());
        self.persist_or_warn();
        Ok(user)
    }

    /// Sign in with an existing account.
    pub fn log_in(&mut self, email: &str, password: &str) -> GalleryResult<CurrentUser> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(GalleryError::MissingCredentials);
        }
        let account = self
            .state
            .users
            .get(&email)
            .filter(|account| account.password == password)
            .ok_or(GalleryError::InvalidCredentials)?;

        let user = CurrentUser {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            provider: "email".to_string(),
            avatar_url: account.avatar_url.clone(),
        };
        self.state.current_user = Some(user.clone());
        self.persist_or_warn();
        Ok(user)
    }

    /// Sign in as a synthetic account for the given provider
    /// (`guest`, `google`, `apple`). No account record is stored.
    pub fn quick_login(&mut self, provider: &str) -> CurrentUser {
        let name = match provider {
            "guest" => "Guest",
            "google" => "Google User",
            "apple" => "Apple User",
            other => other,
        };
        let email = format!(
            "{}_{:x}@vitrine.local",
            provider,
            Utc::now().timestamp_millis().max(0)
        );
        let user = CurrentUser {
            id: UserId::generate(),
            name: name.to_string(),
            email: email.clone(),
            provider: provider.to_string(),
            avatar_url: avatar_url_for(&email),
        };
        self.state.current_user = Some(user.clone());
        self.persist_or_warn();
        user
    }

    /// Sign out, clearing the active album as well.
    pub fn log_out(&mut self) {
        self.state.current_user = None;
        self.state.ui.active_album_id = None;
        self.persist_or_warn();
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.state.current_user.as_ref()
    }

    // ---------------------------------------------------------------
    // Albums
    // ---------------------------------------------------------------

    /// Create an album from a draft, writing its uploads to the blob
    /// store first so the metadata never references bytes that were not
    /// stored. The new album goes to the front of the list.
    pub async fn create_album(&mut self, draft: AlbumDraft) -> GalleryResult<AlbumId> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(GalleryError::EmptyAlbumName);
        }
        let mut tags = draft.tags;
        tags.truncate(MAX_TAGS);
        let mut uploads = draft.uploads;
        uploads.truncate(MAX_UPLOADS);

        let album_id = AlbumId::generate();
        let mut entries = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let record = MediaRecord::new(
                album_id.clone(),
                upload.kind,
                upload.name,
                upload.bytes,
            );
            self.put_media(&record).await?;
            entries.push(AlbumMediaEntry {
                id: record.id,
                kind: record.kind,
                name: record.name,
                created_at: Some(record.created_at),
                liked: false,
                data_url: None,
            });
        }

        self.state.albums.insert(
            0,
            Album {
                id: album_id.clone(),
                owner_id: self.state.current_user.as_ref().map(|u| u.id.clone()),
                name,
                tags,
                description: draft.description.trim().to_string(),
                created_at: Utc::now(),
                views: 0,
                media: entries,
            },
        );
        self.persist_or_warn();
        Ok(album_id)
    }

    /// Update an album's text metadata.
    pub fn edit_album(
        &mut self,
        id: &AlbumId,
        name: &str,
        description: &str,
        tags: Vec<String>,
    ) -> GalleryResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GalleryError::EmptyAlbumName);
        }
        let album = self
            .state
            .album_mut(id)
            .ok_or_else(|| GalleryError::AlbumNotFound(id.clone()))?;
        album.name = name.to_string();
        album.description = description.trim().to_string();
        album.tags = tags;
        album.tags.truncate(MAX_TAGS);
        self.persist_or_warn();
        Ok(())
    }

    /// Delete an album: release its cached handles, drop its blob records
    /// (best effort), and remove it from the metadata.
    pub async fn delete_album(&mut self, id: &AlbumId) -> GalleryResult<Album> {
        let album = self
            .state
            .remove_album(id)
            .ok_or_else(|| GalleryError::AlbumNotFound(id.clone()))?;

        for entry in &album.media {
            self.cache.release(&entry.id);
        }
        // Metadata removal proceeds even when the blob store is down;
        // orphaned records are invisible without their album.
        if let Err(err) = self.delete_album_media(id).await {
            warn!(album = %id, error = %err, "blob cleanup failed during album delete");
        }

        if self.state.ui.active_album_id.as_ref() == Some(id) {
            self.state.ui.active_album_id = None;
        }
        self.persist_or_warn();
        Ok(album)
    }

    /// Open an album for detail viewing: bumps its view counter by one
    /// and persists the increment.
    pub fn open_album(&mut self, id: &AlbumId) -> GalleryResult<&Album> {
        let album = self
            .state
            .album_mut(id)
            .ok_or_else(|| GalleryError::AlbumNotFound(id.clone()))?;
        album.views += 1;
        self.state.ui.active_album_id = Some(id.clone());
        self.persist_or_warn();
        self.state
            .album(id)
            .ok_or_else(|| GalleryError::AlbumNotFound(id.clone()))
    }

    /// Toggle the liked flag on one media entry. Returns the new value.
    pub fn toggle_like(&mut self, album_id: &AlbumId, media_id: &MediaId) -> GalleryResult<bool> {
        let album = self
            .state
            .album_mut(album_id)
            .ok_or_else(|| GalleryError::AlbumNotFound(album_id.clone()))?;
        let entry = album
            .entry_mut(media_id)
            .ok_or_else(|| GalleryError::MediaNotFound(media_id.clone()))?;
        entry.liked = !entry.liked;
        let liked = entry.liked;
        self.persist_or_warn();
        Ok(liked)
    }

    /// Albums matching a query, newest first. An empty query matches all.
    pub fn search_albums(&self, query: &str) -> Vec<&Album> {
        let needle = query.trim().to_lowercase();
        let mut albums: Vec<&Album> = self
            .state
            .albums
            .iter()
            .filter(|album| {
                if needle.is_empty() {
                    return true;
                }
                let haystack = format!(
                    "{} {} {}",
                    album.name,
                    album.tags.join(" "),
                    album.description
                )
                .to_lowercase();
                haystack.contains(&needle)
            })
            .collect();
        albums.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        albums
    }

    pub fn album(&self, id: &AlbumId) -> Option<&Album> {
        self.state.album(id)
    }

    /// Media id to use as an album's cover: first image, else first entry.
    pub fn album_cover(&self, id: &AlbumId) -> Option<&MediaId> {
        self.state.album(id).and_then(Album::cover_media_id)
    }

    pub fn active_album(&self) -> Option<&Album> {
        self.state
            .ui
            .active_album_id
            .as_ref()
            .and_then(|id| self.state.album(id))
    }

    /// Switch the album list presentation and persist the preference.
    pub fn set_view(&mut self, view: ViewMode) {
        self.state.ui.view = view;
        self.persist_or_warn();
    }

    /// Aggregate counters for the home screen.
    pub fn stats(&self) -> GalleryStats {
        GalleryStats {
            albums: self.state.albums.len(),
            media_items: self.state.media_count(),
            total_views: self.state.total_views(),
        }
    }
}

fn avatar_url_for(email: &str) -> String {
    format!("https://picsum.photos/seed/{email}/80/80")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::PendingUpload;
    use vitrine_state::MemorySlot;
    use vitrine_types::MediaKind;

    fn upload(name: &str, kind: MediaKind, bytes: &[u8]) -> PendingUpload {
        PendingUpload {
            name: name.to_string(),
            kind,
            bytes: bytes.to_vec(),
        }
    }

    fn trip_draft() -> AlbumDraft {
        AlbumDraft {
            name: "Trip".to_string(),
            tags: vec!["beach".to_string()],
            description: "Summer trip".to_string(),
            uploads: vec![
                upload("a.jpg", MediaKind::Image, b"aaaa"),
                upload("b.jpg", MediaKind::Image, b"bbbb"),
            ],
        }
    }

    async fn gallery_in(dir: &tempfile::TempDir, slot: Arc<dyn MetadataSlot>) -> Gallery {
        Gallery::open(slot, dir.path().join("blobs")).await
    }

    // ---------------------------------------------------------------
    // Accounts
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn sign_up_then_log_in() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;

        let user = g.sign_up("Ada@Example.com", "pw").unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.name, "ada");
        assert_eq!(user.provider, "email");
        assert!(g.current_user().is_some());

        g.log_out();
        assert!(g.current_user().is_none());

        let back = g.log_in("ada@example.com", "pw").unwrap();
        assert_eq!(back.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;

        g.sign_up("a@b.c", "pw").unwrap();
        assert!(matches!(
            g.sign_up("a@b.c", "other").unwrap_err(),
            GalleryError::EmailTaken
        ));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;

        g.sign_up("a@b.c", "pw").unwrap();
        assert!(matches!(
            g.log_in("a@b.c", "nope").unwrap_err(),
            GalleryError::InvalidCredentials
        ));
        assert!(matches!(
            g.log_in("unknown@b.c", "pw").unwrap_err(),
            GalleryError::InvalidCredentials
        ));
        assert!(matches!(
            g.log_in("", "").unwrap_err(),
            GalleryError::MissingCredentials
        ));
    }

    #[tokio::test]
    async fn quick_login_needs_no_account() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;

        let user = g.quick_login("guest");
        assert_eq!(user.name, "Guest");
        assert!(g.state().users.is_empty());
        assert!(g.current_user().is_some());
    }

    // ---------------------------------------------------------------
    // Albums and media
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn create_album_stores_two_records_and_zero_views() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;
        g.sign_up("a@b.c", "pw").unwrap();

        let id = g.create_album(trip_draft()).await.unwrap();
        let album = g.album(&id).unwrap();
        assert_eq!(album.views, 0);
        assert_eq!(album.media.len(), 2);
        assert!(album.owner_id.is_some());

        for entry in &g.album(&id).unwrap().media.clone() {
            let handle = g.resolve_media(&entry.id).await.expect("stored");
            assert_eq!(handle.kind, MediaKind::Image);
        }
        assert_eq!(
            g.stats(),
            GalleryStats {
                albums: 1,
                media_items: 2,
                total_views: 0
            }
        );
    }

    #[tokio::test]
    async fn empty_album_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;
        assert!(matches!(
            g.create_album(AlbumDraft::new("   ")).await.unwrap_err(),
            GalleryError::EmptyAlbumName
        ));
    }

    #[tokio::test]
    async fn open_album_increments_views_and_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let slot: Arc<dyn MetadataSlot> = Arc::new(MemorySlot::new());
        let id = {
            let mut g = gallery_in(&dir, Arc::clone(&slot)).await;
            let id = g.create_album(trip_draft()).await.unwrap();
            assert_eq!(g.open_album(&id).unwrap().views, 1);
            assert_eq!(g.active_album().unwrap().id, id);
            id
        };

        // Fresh gallery over the same slot and blob root.
        let g = gallery_in(&dir, slot).await;
        assert_eq!(g.album(&id).unwrap().views, 1);
    }

    #[tokio::test]
    async fn delete_album_cascades_to_blobs_and_handles() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;

        let id = g.create_album(trip_draft()).await.unwrap();
        let media_ids: Vec<MediaId> = g
            .album(&id)
            .unwrap()
            .media
            .iter()
            .map(|m| m.id.clone())
            .collect();
        for media_id in &media_ids {
            g.resolve_media(media_id).await.expect("resolvable");
        }
        g.open_album(&id).unwrap();

        g.delete_album(&id).await.unwrap();
        assert!(g.album(&id).is_none());
        assert!(g.active_album().is_none());
        for media_id in &media_ids {
            assert!(g.resolve_media(media_id).await.is_none());
        }
        assert_eq!(g.stats().albums, 0);
    }

    #[tokio::test]
    async fn edit_album_updates_text_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;
        let id = g.create_album(trip_draft()).await.unwrap();

        g.edit_album(&id, "Renamed", " new desc ", vec!["x".to_string()])
            .unwrap();
        let album = g.album(&id).unwrap();
        assert_eq!(album.name, "Renamed");
        assert_eq!(album.description, "new desc");
        assert_eq!(album.tags, vec!["x"]);

        assert!(matches!(
            g.edit_album(&id, "", "", vec![]).unwrap_err(),
            GalleryError::EmptyAlbumName
        ));
    }

    #[tokio::test]
    async fn album_cover_prefers_the_first_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;

        let id = g
            .create_album(AlbumDraft {
                name: "Mixed".to_string(),
                tags: vec![],
                description: String::new(),
                uploads: vec![
                    upload("clip.mp4", MediaKind::Video, b"vvvv"),
                    upload("photo.jpg", MediaKind::Image, b"iiii"),
                ],
            })
            .await
            .unwrap();

        let cover = g.album_cover(&id).expect("cover");
        assert_eq!(cover, &g.album(&id).unwrap().media[1].id);
    }

    #[tokio::test]
    async fn toggle_like_flips_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;
        let id = g.create_album(trip_draft()).await.unwrap();
        let media_id = g.album(&id).unwrap().media[0].id.clone();

        assert!(g.toggle_like(&id, &media_id).unwrap());
        assert!(!g.toggle_like(&id, &media_id).unwrap());
        assert!(matches!(
            g.toggle_like(&id, &MediaId::from_string("m_none"))
                .unwrap_err(),
            GalleryError::MediaNotFound(_)
        ));
    }

    #[tokio::test]
    async fn search_matches_name_tags_description_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::new())).await;

        g.create_album(AlbumDraft {
            name: "Winter".to_string(),
            tags: vec!["snow".to_string()],
            description: String::new(),
            uploads: vec![],
        })
        .await
        .unwrap();
        g.create_album(AlbumDraft {
            name: "Summer".to_string(),
            tags: vec![],
            description: "snowless beach".to_string(),
            uploads: vec![],
        })
        .await
        .unwrap();

        let all = g.search_albums("");
        assert_eq!(all.len(), 2);
        // Newest (Summer) first.
        assert_eq!(all[0].name, "Summer");

        let snow = g.search_albums("SNOW");
        assert_eq!(snow.len(), 2);
        assert!(g.search_albums("beach").iter().all(|a| a.name == "Summer"));
        assert!(g.search_albums("nothing-matches").is_empty());
    }

    // ---------------------------------------------------------------
    // Degraded and failure modes
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn unavailable_store_still_serves_album_text() {
        let dir = tempfile::tempdir().unwrap();
        let slot = Arc::new(MemorySlot::new());
        slot.write(
            r#"{"albums":[{"id":"alb_1","name":"Trip","createdAt":"2024-01-15T10:00:00Z",
                "media":[{"id":"m_1","type":"image","name":"a.jpg","liked":false}]}]}"#,
        )
        .unwrap();

        // A plain file where the blob root should go blocks the open.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"x").unwrap();

        let g = Gallery::open(slot, &blocked).await;
        let album = g.album(&AlbumId::from_string("alb_1")).expect("metadata");
        assert_eq!(album.name, "Trip");
        // Media resolves to nothing instead of erroring.
        assert!(g.resolve_media(&MediaId::from_string("m_1")).await.is_none());
    }

    #[tokio::test]
    async fn quota_failure_keeps_in_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = gallery_in(&dir, Arc::new(MemorySlot::with_quota(2))).await;

        let id = g.create_album(AlbumDraft::new("Trip")).await.unwrap();
        // The persist failed silently; the album is still here.
        assert!(g.album(&id).is_some());
        assert!(matches!(
            g.persist().unwrap_err(),
            vitrine_state::StateError::QuotaExceeded(_)
        ));
    }

    // ---------------------------------------------------------------
    // Legacy migration through the facade
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn startup_migrates_inline_media_and_persists_once() {
        let dir = tempfile::tempdir().unwrap();
        let slot = Arc::new(MemorySlot::new());
        slot.write(
            r#"{"albums":[{"id":"alb_old","name":"Old","createdAt":"2023-06-01T00:00:00Z",
                "media":[{"type":"image","name":"inline.png","liked":false,
                          "dataUrl":"data:image/png;base64,aGVsbG8="}]}]}"#,
        )
        .unwrap();

        let g = gallery_in(&dir, Arc::clone(&slot) as Arc<dyn MetadataSlot>).await;
        let album = g.album(&AlbumId::from_string("alb_old")).unwrap();
        let entry = &album.media[0];
        assert!(entry.data_url.is_none());
        assert!(!entry.id.is_empty());

        let handle = g.resolve_media(&entry.id).await.expect("migrated blob");
        assert_eq!(&handle.data[..], b"hello");

        // The persisted document was rewritten without the inline payload.
        let persisted = slot.read().unwrap().unwrap();
        assert!(!persisted.contains("dataUrl"));

        // A second startup over the same slot is a no-op.
        let entry_id = entry.id.clone();
        let g2 = gallery_in(&dir, Arc::clone(&slot) as Arc<dyn MetadataSlot>).await;
        let album2 = g2.album(&AlbumId::from_string("alb_old")).unwrap();
        assert_eq!(album2.media[0].id, entry_id);
    }
}
