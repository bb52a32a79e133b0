//! Entry service entry point.
//! Database-backed operations for schedule entries, organized across
//! focused submodules.

use rusqlite::Connection;

pub mod crud;
pub mod queries;
mod shared;

use crate::schedule::commit::EntryStore;
use crate::schedule::gesture::EntryPatch;

/// Service for managing schedule entries stored in SQLite.
pub struct EntryService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> EntryService<'a> {
    /// Create a new EntryService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> EntryStore for EntryService<'a> {
    fn apply_patch(&self, id: i64, patch: &EntryPatch) -> anyhow::Result<()> {
        EntryService::apply_patch(self, id, patch)
    }
}
