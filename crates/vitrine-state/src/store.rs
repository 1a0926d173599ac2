//! Whole-document load and persist against a [`MetadataSlot`].

use tracing::warn;

use crate::error::{StateError, StateResult};
use crate::model::AppState;
use crate::slot::MetadataSlot;

/// Serialize the full in-memory state into the slot.
///
/// Errors are returned to the caller; by policy they are downgraded to a
/// user-visible warning at the application boundary and the in-memory
/// state stays authoritative for the session.
pub fn persist(state: &AppState, slot: &dyn MetadataSlot) -> StateResult<()> {
    let document =
        serde_json::to_string(state).map_err(|e| StateError::Serialization(e.to_string()))?;
    slot.write(&document)
}

/// Read and parse the slot at startup. Never fails: an unreadable slot or
/// an unparseable document yields the empty default state.
pub fn load(slot: &dyn MetadataSlot) -> AppState {
    match slot.read() {
        Ok(Some(raw)) => AppState::from_json(&raw),
        Ok(None) => AppState::default(),
        Err(err) => {
            warn!(error = %err, "metadata slot unreadable, starting from defaults");
            AppState::default()
        }
    }
}
