use super::shared::{date_text, map_entry_row, time_text};
use super::EntryService;
use crate::models::entry::Entry;
use crate::schedule::gesture::EntryPatch;
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use rusqlite::{self, params};

impl<'a> EntryService<'a> {
    /// Create a new entry in the database.
    pub fn create(&self, mut entry: Entry) -> Result<Entry> {
        entry.validate().map_err(|e| anyhow!(e))?;

        let now = Local::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO entries (
                    title, description, location, date, start_time, end_time,
                    section_id, parent_id, depth, color, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    entry.title,
                    entry.description,
                    entry.location,
                    date_text(entry.date),
                    time_text(entry.start_time),
                    time_text(entry.end_time),
                    entry.section_id,
                    entry.parent_id,
                    entry.depth,
                    entry.color,
                    &now,
                    &now,
                ],
            )
            .context("Failed to insert entry")?;

        let id = self.conn.last_insert_rowid();
        entry.id = Some(id);
        entry.created_at = Some(Local::now());
        entry.updated_at = Some(Local::now());

        Ok(entry)
    }

    /// Retrieve an entry by ID.
    pub fn get(&self, id: i64) -> Result<Option<Entry>> {
        let result = self.conn.query_row(
            "SELECT id, title, description, location, date, start_time, end_time,
                    section_id, parent_id, depth, color, created_at, updated_at
             FROM entries WHERE id = ?",
            [id],
            map_entry_row,
        );

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Update an existing entry.
    pub fn update(&self, entry: &Entry) -> Result<()> {
        let id = entry
            .id
            .ok_or_else(|| anyhow!("Entry ID is required for update"))?;
        entry.validate().map_err(|e| anyhow!(e))?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE entries SET
                    title = ?, description = ?, location = ?, date = ?,
                    start_time = ?, end_time = ?, section_id = ?, parent_id = ?,
                    depth = ?, color = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    entry.title,
                    entry.description,
                    entry.location,
                    date_text(entry.date),
                    time_text(entry.start_time),
                    time_text(entry.end_time),
                    entry.section_id,
                    entry.parent_id,
                    entry.depth,
                    entry.color,
                    Local::now().to_rfc3339(),
                    id,
                ],
            )
            .context("Failed to update entry")?;

        if rows_affected == 0 {
            return Err(anyhow!("Entry with id {} not found", id));
        }

        Ok(())
    }

    /// Apply a partial update carrying only the fields a drag changed.
    pub fn apply_patch(&self, id: i64, patch: &EntryPatch) -> Result<()> {
        let mut entry = self
            .get(id)?
            .ok_or_else(|| anyhow!("Entry with id {} not found", id))?;

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

        self.update(&entry)
    }

    /// Delete an entry by ID. Children cascade via the schema's foreign key.
    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?", [id])
            .context("Failed to delete entry")?;

        if rows_affected == 0 {
            return Err(anyhow!("Entry with id {} not found", id));
        }

        Ok(())
    }
}
