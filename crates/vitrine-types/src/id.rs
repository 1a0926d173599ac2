use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Generate a fresh identifier string: `<prefix>_<random hex>_<millis hex>`.
///
/// The random component makes collisions practically impossible within one
/// installation; the millisecond component keeps ids roughly sortable by
/// creation time.
fn generate(prefix: &str) -> String {
    let entropy: [u8; 8] = rand::random();
    let millis = chrono::Utc::now().timestamp_millis().max(0);
    format!("{}_{}_{:x}", prefix, hex::encode(entropy), millis)
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh unique identifier.
            pub fn generate() -> Self {
                Self(generate($prefix))
            }

            /// Wrap an existing identifier string without validation.
            ///
            /// Ids are opaque; any non-empty string an older installation
            /// produced is accepted as-is.
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Parse an identifier, rejecting the empty string.
            pub fn parse(s: &str) -> Result<Self, TypeError> {
                if s.is_empty() {
                    return Err(TypeError::EmptyId);
                }
                Ok(Self(s.to_string()))
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` for the empty placeholder id.
            ///
            /// Legacy metadata entries may carry no id at all; they
            /// deserialize as empty and are assigned one during migration.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Opaque unique identifier naming one binary media asset.
    MediaId,
    "m"
);

string_id!(
    /// Opaque unique identifier for an album.
    AlbumId,
    "alb"
);

string_id!(
    /// Opaque unique identifier for a user account.
    UserId,
    "u"
);
