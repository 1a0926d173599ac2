use vitrine_types::MediaKind;

/// At most this many tags are kept on an album.
pub const MAX_TAGS: usize = 12;

/// At most this many uploads are accepted in one album creation.
pub const MAX_UPLOADS: usize = 36;

/// One file staged for upload into a new album.
#[derive(Clone, Debug)]
pub struct PendingUpload {
    pub name: String,
    pub kind: MediaKind,
    pub bytes: Vec<u8>,
}

/// Input for creating an album.
#[derive(Clone, Debug, Default)]
pub struct AlbumDraft {
    pub name: String,
    pub tags: Vec<String>,
    pub description: String,
    pub uploads: Vec<PendingUpload>,
}

impl AlbumDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Aggregate counters shown on the home screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GalleryStats {
    pub albums: usize,
    pub media_items: usize,
    pub total_views: u64,
}

/// Split a comma-separated tag string into trimmed, non-empty tags,
/// capped at [`MAX_TAGS`].
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(MAX_TAGS)
        .map(str::to_string)
        .collect()
}
