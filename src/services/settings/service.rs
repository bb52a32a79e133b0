use crate::models::settings::ScheduleSettings;
use crate::services::database::Database;
use anyhow::{anyhow, Context, Result};

use super::mapper::row_to_settings;

pub struct SettingsService<'a> {
    db: &'a Database,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get the current settings
    pub fn get(&self) -> Result<ScheduleSettings> {
        let conn = self.db.connection();

        let settings = conn
            .query_row(
                "SELECT id, day_start_hour, day_end_hour, grid_minutes
                 FROM settings WHERE id = 1",
                [],
                |row| row_to_settings(row),
            )
            .context("Failed to load settings")?;

        Ok(settings)
    }

    /// Update settings
    pub fn update(&self, settings: &ScheduleSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        let conn = self.db.connection();

        conn.execute(
            "UPDATE settings \
             SET day_start_hour = ?1, \
                 day_end_hour = ?2, \
                 grid_minutes = ?3, \
                 updated_at = CURRENT_TIMESTAMP \
             WHERE id = 1",
            (
                settings.day_start_hour,
                settings.day_end_hour,
                settings.grid_minutes,
            ),
        )
        .context("Failed to update settings")?;

        Ok(())
    }

    /// Reset settings to defaults
    #[allow(dead_code)]
    pub fn reset(&self) -> Result<()> {
        let default_settings = ScheduleSettings::default();
        self.update(&default_settings)
    }
}
