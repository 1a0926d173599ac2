use std::fmt;
use std::str::FromStr;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Classification of a media asset.
///
/// Persisted metadata stores this as the strings `"image"` and `"video"`.
/// Anything else found in older metadata normalizes to [`MediaKind::Image`],
/// matching how every prior version of the format treated unknown kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl MediaKind {
    /// Lenient normalization used when reading persisted metadata:
    /// `"video"` maps to `Video`, everything else to `Image`.
    pub fn normalize(s: &str) -> Self {
        if s == "video" {
            Self::Video
        } else {
            Self::Image
        }
    }

    /// Infer the kind from a MIME type string.
    ///
    /// Returns `None` for MIME types that are neither image nor video;
    /// such files are not accepted as gallery media.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("video/") {
            Some(Self::Video)
        } else if mime.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }

    /// The canonical string form (`"image"` / `"video"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = TypeError;

    /// Strict parse for user-supplied input (e.g. CLI flags).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(TypeError::UnknownKind(other.to_string())),
        }
    }
}

impl Serialize for MediaKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MediaKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Lenient on purpose: persisted documents from older versions may
        // carry arbitrary kind strings and must still load.
        let s = String::deserialize(deserializer)?;
        Ok(Self::normalize(&s))
    }
}
