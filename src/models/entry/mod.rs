// Entry module
// Time-boxed schedule entry with section lane and parent nesting

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A time-boxed entry on the day board.
///
/// Entries live on a single date and may nest under a parent entry to an
/// arbitrary depth. An entry whose start and end coincide is a milestone
/// (a zero-duration point marker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Section lane; `None` means the uncategorized lane.
    pub section_id: Option<i64>,
    /// Parent entry; `None` means a root entry. Parent and child share `date`.
    pub parent_id: Option<i64>,
    /// Cached nesting level (0 for roots). Advisory only; the layout engine
    /// recomputes effective nesting from the parent graph.
    pub depth: i64,
    pub color: Option<String>,
    pub created_at: Option<DateTime<Local>>,
    pub updated_at: Option<DateTime<Local>>,
}

impl Entry {
    /// Create a new root entry with required fields.
    ///
    /// Start/end ordering is intentionally not checked here: ordering is
    /// defined on the window-normalized minute scale (a 23:30 start with a
    /// 00:30 end is valid under a window that rolls past midnight), which
    /// only the time grid knows about.
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, String> {
        let title = title.into();

        if title.trim().is_empty() {
            return Err("Entry title cannot be empty".to_string());
        }

        Ok(Self {
            id: None,
            title,
            description: None,
            location: None,
            date,
            start_time,
            end_time,
            section_id: None,
            parent_id: None,
            depth: 0,
            color: None,
            created_at: None,
            updated_at: None,
        })
    }

    /// Create a builder for constructing entries with optional fields
    pub fn builder() -> EntryBuilder {
        EntryBuilder::new()
    }

    /// Validate the entry
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Entry title cannot be empty".to_string());
        }

        // Validate color format if present (should be hex color)
        if let Some(ref color) = self.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
                return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
            }
        }

        Ok(())
    }

    /// A milestone is a zero-duration point marker (`start == end`).
    pub fn is_milestone(&self) -> bool {
        self.start_time == self.end_time
    }

    /// True for entries nested under another entry.
    pub fn is_child(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Builder for creating entries with optional fields
pub struct EntryBuilder {
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    section_id: Option<i64>,
    parent_id: Option<i64>,
    depth: i64,
    color: Option<String>,
}

impl EntryBuilder {
    /// Create a new entry builder
    pub fn new() -> Self {
        Self {
            title: None,
            description: None,
            location: None,
            date: None,
            start_time: None,
            end_time: None,
            section_id: None,
            parent_id: None,
            depth: 0,
            color: None,
        }
    }

    /// Set the entry title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the entry description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the entry location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the date the entry belongs to
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the start time
    pub fn start_time(mut self, start_time: NaiveTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Set the end time
    pub fn end_time(mut self, end_time: NaiveTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Set the section lane
    pub fn section_id(mut self, section_id: i64) -> Self {
        self.section_id = Some(section_id);
        self
    }

    /// Set the parent entry and cached depth
    pub fn parent(mut self, parent_id: i64, depth: i64) -> Self {
        self.parent_id = Some(parent_id);
        self.depth = depth;
        self
    }

    /// Set the entry color (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Build the entry
    pub fn build(self) -> Result<Entry, String> {
        let title = self.title.ok_or("Entry title is required")?;
        let date = self.date.ok_or("Entry date is required")?;
        let start_time = self.start_time.ok_or("Entry start time is required")?;
        let end_time = self.end_time.ok_or("Entry end time is required")?;

        let entry = Entry {
            id: None,
            title,
            description: self.description,
            location: self.location,
            date,
            start_time,
            end_time,
            section_id: self.section_id,
            parent_id: self.parent_id,
            depth: self.depth,
            color: self.color,
            created_at: None,
            updated_at: None,
        };

        entry.validate()?;
        Ok(entry)
    }
}

impl Default for EntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
