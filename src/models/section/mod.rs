//! Section model for grouping entries into lanes.
//!
//! Sections are the vertical lanes of the day board; every entry belongs to
//! at most one section. Entries without a section render in a synthetic
//! uncategorized lane that is never persisted.

use serde::{Deserialize, Serialize};

/// A section lane on the day board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier (database primary key)
    pub id: Option<i64>,
    /// Display name of the section
    pub name: String,
    /// Hex color code for the section (e.g., "#3B82F6")
    pub color: String,
    /// Position of the lane on the board, left to right
    pub display_order: i64,
}

impl Section {
    /// Create a new section with the given name, color, and lane position.
    pub fn new(name: impl Into<String>, color: impl Into<String>, display_order: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: color.into(),
            display_order,
        }
    }

    /// Validate the section.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Section name cannot be empty".to_string());
        }

        if !self.color.starts_with('#') || (self.color.len() != 7 && self.color.len() != 4) {
            return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
        }

        Ok(())
    }
}

/// Default sections seeded on first run.
pub fn default_sections() -> Vec<Section> {
    vec![
        Section::new("Work", "#3B82F6", 0),
        Section::new("Meetings", "#8B5CF6", 1),
        Section::new("Personal", "#10B981", 2),
    ]
}
