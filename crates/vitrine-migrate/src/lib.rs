//! One-shot migration of legacy inline media into the blob store.
//!
//! Early versions of the gallery embedded media payloads directly in the
//! metadata document as base64 data URLs. This crate moves those payloads
//! into [`vitrine_store`] records and strips the inline field, leaving
//! entries in the current reference-by-id shape.
//!
//! The pass is best-effort and idempotent: entries whose inline payload
//! fails to decode are skipped in place (no user-facing diagnostic, by
//! design), and a run over already-migrated metadata performs no writes.

pub mod data_url;
pub mod migrate;

pub use data_url::decode_data_url;
pub use migrate::{migrate_legacy_media, MigrationReport};
