use bytes::Bytes;

use vitrine_store::MediaRecord;
use vitrine_types::{MediaId, MediaKind};

/// A live, displayable view of one media payload.
///
/// Handed out as `Arc<MediaHandle>`; handle identity is pointer identity.
/// The payload is a [`Bytes`] buffer, so renderer code can clone its view
/// freely without copying. Dropping the last reference frees the buffer;
/// clones a renderer still holds stay valid after the cache releases its
/// own reference.
#[derive(Clone, Debug)]
pub struct MediaHandle {
    pub id: MediaId,
    pub kind: MediaKind,
    pub name: String,
    pub data: Bytes,
}

impl MediaHandle {
    /// Materialize a handle from a stored record.
    pub fn from_record(record: MediaRecord) -> Self {
        Self {
            id: record.id,
            kind: record.kind,
            name: record.name,
            data: Bytes::from(record.payload),
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_types::AlbumId;

    #[test]
    fn from_record_carries_payload() {
        let record = MediaRecord::new(
            AlbumId::from_string("alb_1"),
            MediaKind::Video,
            "clip.mp4",
            vec![1, 2, 3, 4],
        );
        let id = record.id.clone();
        let handle = MediaHandle::from_record(record);
        assert_eq!(handle.id, id);
        assert_eq!(handle.kind, MediaKind::Video);
        assert_eq!(handle.size(), 4);
        assert_eq!(&handle.data[..], &[1, 2, 3, 4]);
    }
}
