use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_settings_table(conn)?;
    run_settings_migrations(conn)?;
    insert_default_settings(conn)?;
    create_sections_table(conn)?;
    create_entries_table(conn)?;
    Ok(())
}

fn create_settings_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            day_start_hour INTEGER NOT NULL DEFAULT 7,
            day_end_hour INTEGER NOT NULL DEFAULT 25,
            grid_minutes INTEGER NOT NULL DEFAULT 30,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create settings table")?;

    Ok(())
}

fn run_settings_migrations(conn: &Connection) -> Result<()> {
    // grid_minutes arrived after the first release
    migrations::ensure_column(
        conn,
        "settings",
        "grid_minutes",
        "ALTER TABLE settings ADD COLUMN grid_minutes INTEGER NOT NULL DEFAULT 30",
    )?;

    Ok(())
}

fn insert_default_settings(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO settings (id, day_start_hour, day_end_hour, grid_minutes)
         VALUES (1, 7, 25, 30)",
        [],
    )
    .context("Failed to insert default settings")?;

    Ok(())
}

fn create_sections_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS sections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            display_order INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("Failed to create sections table")?;

    Ok(())
}

fn create_entries_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            location TEXT,
            date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            section_id INTEGER REFERENCES sections(id) ON DELETE SET NULL,
            parent_id INTEGER REFERENCES entries(id) ON DELETE CASCADE,
            depth INTEGER NOT NULL DEFAULT 0,
            color TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create entries table")?;

    Ok(())
}
