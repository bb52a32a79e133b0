// Drag commit
// Applies a finished drag to the store, reverting the in-memory entry on failure

use anyhow::{anyhow, Result};

use super::gesture::{EntryPatch, EntrySnapshot};
use crate::models::entry::Entry;

/// The persistence collaborator a finished drag commits through.
#[cfg_attr(test, mockall::automock)]
pub trait EntryStore {
    /// Persist only the changed fields of an entry.
    fn apply_patch(&self, id: i64, patch: &EntryPatch) -> Result<()>;
}

/// Apply a drag's patch to the in-memory list and persist it.
///
/// The local copy is updated optimistically; if the store rejects the
/// update, the entry is restored to its pre-drag snapshot so no partial
/// visual state survives, and the error is returned for the UI to surface.
pub fn commit_drag(
    store: &dyn EntryStore,
    entries: &mut [Entry],
    entry_id: i64,
    patch: &EntryPatch,
    before: &EntrySnapshot,
) -> Result<()> {
    let entry = entries
        .iter_mut()
        .find(|e| e.id == Some(entry_id))
        .ok_or_else(|| anyhow!("Entry {} is no longer in the working set", entry_id))?;

    if let Some(start_time) = patch.start_time {
        entry.start_time = start_time;
    }
    if let Some(end_time) = patch.end_time {
        entry.end_time = end_time;
    }
    if let Some(section_id) = patch.section_id {
        entry.section_id = section_id;
    }
    if let Some(ref color) = patch.color {
        entry.color = color.clone();
    }

    if let Err(err) = store.apply_patch(entry_id, patch) {
        before.restore(entry);
        log::error!("Commit for entry {} failed, reverted: {}", entry_id, err);
        return Err(err);
    }

    Ok(())
}
