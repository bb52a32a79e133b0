use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use rusqlite::{self, Result, Row};

use crate::models::entry::Entry;

pub(crate) fn to_local_datetime(value: String) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(crate) fn to_naive_date(value: String) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(crate) fn to_naive_time(value: String) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(&value, "%H:%M")
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(crate) fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn time_text(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub(crate) fn map_entry_row(row: &Row<'_>) -> Result<Entry> {
    Ok(Entry {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        date: to_naive_date(row.get::<_, String>(4)?)?,
        start_time: to_naive_time(row.get::<_, String>(5)?)?,
        end_time: to_naive_time(row.get::<_, String>(6)?)?,
        section_id: row.get(7)?,
        parent_id: row.get(8)?,
        depth: row.get(9)?,
        color: row.get(10)?,
        created_at: Some(to_local_datetime(row.get::<_, String>(11)?)?),
        updated_at: Some(to_local_datetime(row.get::<_, String>(12)?)?),
    })
}
