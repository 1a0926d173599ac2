//! The application state document and its JSON shape.
//!
//! The persisted document is `{ authMode, currentUser, users, albums, ui }`
//! in camelCase, unchanged from what earlier versions of the gallery wrote,
//! so existing slots keep loading. Deserialization is deliberately lenient:
//! unknown enum strings normalize, missing fields default, and malformed
//! albums or media entries are dropped individually instead of poisoning
//! the whole document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::{Deserializer, DeserializeOwned};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use vitrine_types::{AlbumId, MediaId, MediaKind, UserId};

/// Which form the auth screen shows. Unknown input normalizes to `Login`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl<'de> Deserialize<'de> for AuthMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(if s == "signup" { Self::Signup } else { Self::Login })
    }
}

/// Album list presentation. Unknown input normalizes to `Grid`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl<'de> Deserialize<'de> for ViewMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(if s == "list" { Self::List } else { Self::Grid })
    }
}

/// A registered account. Credentials are mock: the password is stored in
/// plaintext inside the metadata document, exactly as the source system
/// does. There is no real security here and none is claimed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar_url: String,
}

/// The signed-in identity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Sign-in path: `email`, `guest`, `google`, or `apple`.
    pub provider: String,
    pub avatar_url: String,
}

/// One media reference inside an album. The payload itself lives in the
/// blob store under `id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlbumMediaEntry {
    /// Blob store record id. Empty on legacy entries that predate the
    /// blob store; migration assigns one.
    pub id: MediaId,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub liked: bool,
    /// Legacy inline payload (`data:<mime>;base64,...`). Only present in
    /// documents written before the blob store existed; migration strips
    /// it after moving the bytes out.
    #[serde(rename = "dataUrl", skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

impl AlbumMediaEntry {
    /// Whether this entry still carries a decodable-looking inline payload.
    pub fn has_inline_payload(&self) -> bool {
        self.data_url
            .as_deref()
            .is_some_and(|url| url.starts_with("data:"))
    }
}

/// One album: text metadata plus media references.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Album {
    pub id: AlbumId,
    pub owner_id: Option<UserId>,
    pub name: String,
    pub tags: Vec<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub views: u64,
    #[serde(deserialize_with = "lenient_vec")]
    pub media: Vec<AlbumMediaEntry>,
}

impl Default for Album {
    fn default() -> Self {
        Self {
            id: AlbumId::default(),
            owner_id: None,
            name: String::new(),
            tags: Vec::new(),
            description: String::new(),
            created_at: DateTime::UNIX_EPOCH,
            views: 0,
            media: Vec::new(),
        }
    }
}

impl Album {
    /// The media id to use as the album cover: first image, else first
    /// entry of any kind.
    pub fn cover_media_id(&self) -> Option<&MediaId> {
        self.media
            .iter()
            .find(|m| m.kind == MediaKind::Image)
            .or_else(|| self.media.first())
            .map(|m| &m.id)
    }

    pub fn entry(&self, media_id: &MediaId) -> Option<&AlbumMediaEntry> {
        self.media.iter().find(|m| &m.id == media_id)
    }

    pub fn entry_mut(&mut self, media_id: &MediaId) -> Option<&mut AlbumMediaEntry> {
        self.media.iter_mut().find(|m| &m.id == media_id)
    }
}

/// Session UI preferences, persisted alongside the data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    pub view: ViewMode,
    pub active_album_id: Option<AlbumId>,
}

/// The whole in-memory application state; the source of truth for the
/// session even when a persist fails.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub auth_mode: AuthMode,
    pub current_user: Option<CurrentUser>,
    /// Accounts keyed by lowercased email.
    pub users: BTreeMap<String, UserAccount>,
    pub albums: Vec<Album>,
    pub ui: UiState,
}

impl AppState {
    /// Parse a persisted document, defaulting field by field.
    ///
    /// Never fails: unparseable input yields `AppState::default()`, and a
    /// malformed individual field yields that field's default without
    /// touching its siblings.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::default(),
        }
    }

    fn from_value(value: Value) -> Self {
        let Value::Object(mut doc) = value else {
            return Self::default();
        };
        let mut take = |key: &str| doc.remove(key).unwrap_or(Value::Null);

        let albums = match take("albums") {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        };

        Self {
            auth_mode: serde_json::from_value(take("authMode")).unwrap_or_default(),
            current_user: serde_json::from_value(take("currentUser")).unwrap_or(None),
            users: serde_json::from_value(take("users")).unwrap_or_default(),
            albums,
            ui: serde_json::from_value(take("ui")).unwrap_or_default(),
        }
    }

    pub fn album(&self, id: &AlbumId) -> Option<&Album> {
        self.albums.iter().find(|a| &a.id == id)
    }

    pub fn album_mut(&mut self, id: &AlbumId) -> Option<&mut Album> {
        self.albums.iter_mut().find(|a| &a.id == id)
    }

    /// Remove an album from the list. Returns it if it was present.
    pub fn remove_album(&mut self, id: &AlbumId) -> Option<Album> {
        let pos = self.albums.iter().position(|a| &a.id == id)?;
        Some(self.albums.remove(pos))
    }

    /// Total media entries across all albums.
    pub fn media_count(&self) -> usize {
        self.albums.iter().map(|a| a.media.len()).sum()
    }

    /// Summed view counters across all albums.
    pub fn total_views(&self) -> u64 {
        self.albums.iter().map(|a| a.views).sum()
    }
}

/// Deserialize an array element by element, dropping the ones that fail
/// instead of failing the container. Anything that is not an array at all
/// becomes the empty vector.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
