//! Section service for CRUD operations on board lanes.
//!
//! Sections are read-only from the layout engine's point of view; this
//! service exists for the settings screens and for seeding defaults on
//! first run.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::section::{default_sections, Section};

/// Service for managing board sections.
pub struct SectionService<'a> {
    conn: &'a Connection,
}

impl<'a> SectionService<'a> {
    /// Create a new SectionService with the given database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Populate the sections table with defaults if it is empty.
    pub fn initialize_defaults(&self) -> Result<()> {
        let count: i32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sections", [], |row| row.get(0))
            .unwrap_or(0);

        if count == 0 {
            log::info!("Initializing default sections");
            for section in default_sections() {
                if let Err(e) = self.create(section) {
                    log::warn!("Failed to create default section: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Create a new section.
    pub fn create(&self, section: Section) -> Result<Section> {
        section.validate().map_err(|e| anyhow::anyhow!("{}", e))?;

        self.conn
            .execute(
                "INSERT INTO sections (name, color, display_order)
                 VALUES (?1, ?2, ?3)",
                params![section.name.trim(), section.color, section.display_order],
            )
            .context("Failed to insert section")?;

        let id = self.conn.last_insert_rowid();
        self.get_by_id(id)
    }

    /// Get a section by ID.
    pub fn get_by_id(&self, id: i64) -> Result<Section> {
        let section = self
            .conn
            .query_row(
                "SELECT id, name, color, display_order FROM sections WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Section {
                        id: Some(row.get(0)?),
                        name: row.get(1)?,
                        color: row.get(2)?,
                        display_order: row.get(3)?,
                    })
                },
            )
            .context("Section not found")?;

        Ok(section)
    }

    /// List all sections in lane order.
    pub fn list(&self) -> Result<Vec<Section>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, color, display_order FROM sections
             ORDER BY display_order ASC, id ASC",
        )?;

        let sections = stmt
            .query_map([], |row| {
                Ok(Section {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    color: row.get(2)?,
                    display_order: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(sections)
    }

    /// Update a section.
    pub fn update(&self, section: &Section) -> Result<()> {
        let id = section
            .id
            .ok_or_else(|| anyhow::anyhow!("Section ID is required for update"))?;
        section.validate().map_err(|e| anyhow::anyhow!("{}", e))?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE sections SET name = ?1, color = ?2, display_order = ?3 WHERE id = ?4",
                params![section.name.trim(), section.color, section.display_order, id],
            )
            .context("Failed to update section")?;

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Section with id {} not found", id));
        }

        Ok(())
    }

    /// Delete a section. Entries in the lane fall back to uncategorized via
    /// the schema's ON DELETE SET NULL.
    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM sections WHERE id = ?1", params![id])
            .context("Failed to delete section")?;

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Section with id {} not found", id));
        }

        Ok(())
    }
}
