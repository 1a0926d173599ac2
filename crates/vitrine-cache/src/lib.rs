//! Session-scoped cache of live media handles.
//!
//! Display code never reads the blob store directly. It asks this cache to
//! [`resolve`](MediaCache::resolve) a media id into a [`MediaHandle`]: a
//! materialized, cheaply shareable view of the payload. The first resolve
//! reads the store and caches the handle; every later resolve of the same
//! id returns the identical handle without touching storage.
//!
//! Release is owner-driven and mandatory: whenever a media record is
//! deleted, [`release`](MediaCache::release) must be called for its id or
//! the handle's memory stays pinned for the rest of the session. The cache
//! has no eviction policy of its own (a session-lifetime cache is fine for
//! this tool, but skipping `release` under heavy delete/recreate churn
//! grows without bound).

pub mod cache;
pub mod handle;

pub use cache::MediaCache;
pub use handle::MediaHandle;
