//! Metadata state for the Vitrine gallery engine.
//!
//! The whole non-binary application state (users, albums, UI state) lives
//! in one in-memory [`AppState`] and persists as a single JSON document in
//! a named key-value slot. Binary media payloads are *not* here; albums
//! reference them by media id only.
//!
//! The slot is abstracted behind the [`MetadataSlot`] port with an
//! in-memory implementation for tests and a single-file implementation for
//! real use. Loading is sanitizing and never fails: a missing slot, a
//! parse error, or a wrong-shaped document falls back to defaults field by
//! field rather than crashing.

pub mod error;
pub mod model;
pub mod slot;
pub mod store;

pub use error::{StateError, StateResult};
pub use model::{
    Album, AlbumMediaEntry, AppState, AuthMode, CurrentUser, UiState, UserAccount, ViewMode,
};
pub use slot::{FsSlot, MemorySlot, MetadataSlot};
pub use store::{load, persist};
