//! Foundation types for the Vitrine gallery engine.
//!
//! This crate provides the identifier and classification types used
//! throughout Vitrine. Every other Vitrine crate depends on `vitrine-types`.
//!
//! # Key Types
//!
//! - [`MediaId`], [`AlbumId`], [`UserId`] — opaque unique string identifiers
//! - [`MediaKind`] — image/video classification
//! - [`TypeError`] — parse failures for the above

pub mod error;
pub mod id;
pub mod kind;

pub use error::TypeError;
pub use id::{AlbumId, MediaId, UserId};
pub use kind::MediaKind;
