use super::shared::{date_text, map_entry_row};
use super::EntryService;
use crate::models::entry::Entry;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite;

impl<'a> EntryService<'a> {
    /// List every entry ordered by date then start time.
    #[allow(dead_code)]
    pub fn list_all(&self) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, location, date, start_time, end_time,
                    section_id, parent_id, depth, color, created_at, updated_at
             FROM entries
             ORDER BY date ASC, start_time ASC, id ASC",
        )?;

        let entries = stmt
            .query_map([], map_entry_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    /// The entry set the board lays out: one date, deterministic order.
    pub fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, location, date, start_time, end_time,
                    section_id, parent_id, depth, color, created_at, updated_at
             FROM entries
             WHERE date = ?
             ORDER BY start_time ASC, depth ASC, id ASC",
        )?;

        let entries = stmt
            .query_map([date_text(date)], map_entry_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    /// Direct children of an entry, in start order.
    pub fn children_of(&self, parent_id: i64) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, location, date, start_time, end_time,
                    section_id, parent_id, depth, color, created_at, updated_at
             FROM entries
             WHERE parent_id = ?
             ORDER BY start_time ASC, id ASC",
        )?;

        let entries = stmt
            .query_map([parent_id], map_entry_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }
}
