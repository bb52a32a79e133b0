use rusqlite::Row;

use crate::models::settings::ScheduleSettings;

pub fn row_to_settings(row: &Row) -> Result<ScheduleSettings, rusqlite::Error> {
    Ok(ScheduleSettings {
        id: Some(row.get(0)?),
        day_start_hour: row.get(1)?,
        day_end_hour: row.get(2)?,
        grid_minutes: row.get(3)?,
    })
}
