// Entry dialog
// Editor used for click-to-edit and for confirming create drafts

use chrono::{NaiveDate, NaiveTime};
use egui::{Color32, RichText};
use egui_extras::DatePickerButton;

use crate::models::entry::Entry;
use crate::models::section::Section;
use crate::schedule::time_grid::{format_time, parse_time};

/// State for the entry editing dialog
pub struct EntryDialogState {
    /// Entry being edited (None for a new entry)
    pub entry_id: Option<i64>,

    // Basic fields
    pub title: String,
    pub description: String,
    pub location: String,

    // Date/time; times are edited as "HH:MM" text and parsed on save
    pub date: NaiveDate,
    pub start_time_text: String,
    pub end_time_text: String,

    // Lane and visuals
    pub section_id: Option<i64>,
    pub color: String,

    // Nesting carried through unchanged
    pub parent_id: Option<i64>,
    pub depth: i64,

    // UI state
    pub error_message: Option<String>,
}

impl EntryDialogState {
    /// Dialog prefilled from a create-drag draft. A zero-duration draft
    /// stays a milestone unless the user widens it here; nothing is
    /// persisted until Save.
    pub fn from_draft(draft: &Entry) -> Self {
        Self {
            entry_id: None,
            title: draft.title.clone(),
            description: draft.description.clone().unwrap_or_default(),
            location: draft.location.clone().unwrap_or_default(),
            date: draft.date,
            start_time_text: format_time(draft.start_time),
            end_time_text: format_time(draft.end_time),
            section_id: draft.section_id,
            color: draft.color.clone().unwrap_or_default(),
            parent_id: draft.parent_id,
            depth: draft.depth,
            error_message: None,
        }
    }

    /// Dialog for editing an existing entry.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            entry_id: entry.id,
            ..Self::from_draft(entry)
        }
    }

    /// Build the entry to persist from the current fields.
    fn build_entry(&self) -> Result<Entry, String> {
        let start_time: NaiveTime = parse_time(self.start_time_text.trim())
            .map_err(|_| format!("Invalid start time: {}", self.start_time_text))?;
        let end_time: NaiveTime = parse_time(self.end_time_text.trim())
            .map_err(|_| format!("Invalid end time: {}", self.end_time_text))?;

        let mut entry = Entry::new(self.title.trim(), self.date, start_time, end_time)?;
        entry.id = self.entry_id;
        entry.section_id = self.section_id;
        entry.parent_id = self.parent_id;
        entry.depth = self.depth;
        if !self.description.trim().is_empty() {
            entry.description = Some(self.description.trim().to_string());
        }
        if !self.location.trim().is_empty() {
            entry.location = Some(self.location.trim().to_string());
        }
        if !self.color.trim().is_empty() {
            entry.color = Some(self.color.trim().to_string());
        }
        entry.validate()?;
        Ok(entry)
    }
}

#[derive(Default)]
pub struct EntryDialogResult {
    pub saved_entry: Option<Entry>,
    pub delete_request: Option<i64>,
}

pub fn render_entry_dialog(
    ctx: &egui::Context,
    state: &mut EntryDialogState,
    sections: &[Section],
    show_dialog: &mut bool,
) -> EntryDialogResult {
    let mut result = EntryDialogResult::default();
    let mut dialog_open = *show_dialog;

    egui::Window::new(if state.entry_id.is_some() {
        "Edit Entry"
    } else {
        "New Entry"
    })
    .open(&mut dialog_open)
    .collapsible(false)
    .resizable(false)
    .default_width(380.0)
    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
    .show(ctx, |ui| {
        if let Some(ref error) = state.error_message {
            ui.colored_label(Color32::RED, RichText::new(error).strong());
            ui.add_space(8.0);
        }

        egui::Grid::new("entry_dialog_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Title");
                ui.text_edit_singleline(&mut state.title);
                ui.end_row();

                ui.label("Date");
                ui.add(DatePickerButton::new(&mut state.date).id_source("entry_date"));
                ui.end_row();

                ui.label("Start");
                ui.text_edit_singleline(&mut state.start_time_text);
                ui.end_row();

                ui.label("End");
                ui.text_edit_singleline(&mut state.end_time_text);
                ui.end_row();

                ui.label("Section");
                egui::ComboBox::from_id_source("entry_section")
                    .selected_text(
                        sections
                            .iter()
                            .find(|s| s.id == state.section_id)
                            .map(|s| s.name.clone())
                            .unwrap_or_else(|| "Uncategorized".to_string()),
                    )
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut state.section_id, None, "Uncategorized");
                        for section in sections {
                            ui.selectable_value(
                                &mut state.section_id,
                                section.id,
                                &section.name,
                            );
                        }
                    });
                ui.end_row();

                ui.label("Color");
                ui.text_edit_singleline(&mut state.color);
                ui.end_row();

                ui.label("Location");
                ui.text_edit_singleline(&mut state.location);
                ui.end_row();

                ui.label("Description");
                ui.text_edit_multiline(&mut state.description);
                ui.end_row();
            });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                match state.build_entry() {
                    Ok(entry) => {
                        result.saved_entry = Some(entry);
                        *show_dialog = false;
                    }
                    Err(message) => state.error_message = Some(message),
                }
            }
            if ui.button("Cancel").clicked() {
                *show_dialog = false;
            }
            if let Some(entry_id) = state.entry_id {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(RichText::new("Delete").color(Color32::LIGHT_RED))
                        .clicked()
                    {
                        result.delete_request = Some(entry_id);
                        *show_dialog = false;
                    }
                });
            }
        });
    });

    if !dialog_open {
        *show_dialog = false;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Entry {
        let mut e = Entry::new(
            "x",
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        )
        .unwrap();
        e.title = String::new();
        e.section_id = Some(2);
        e.color = Some("#3B82F6".to_string());
        e
    }

    #[test]
    fn test_from_draft_prefills_fields() {
        let state = EntryDialogState::from_draft(&draft());
        assert_eq!(state.entry_id, None);
        assert_eq!(state.start_time_text, "09:00");
        assert_eq!(state.end_time_text, "09:00");
        assert_eq!(state.section_id, Some(2));
        assert_eq!(state.color, "#3B82F6");
    }

    #[test]
    fn test_build_entry_requires_title() {
        let state = EntryDialogState::from_draft(&draft());
        assert!(state.build_entry().is_err());
    }

    #[test]
    fn test_build_entry_allows_milestone() {
        let mut state = EntryDialogState::from_draft(&draft());
        state.title = "Release cut".to_string();

        let entry = state.build_entry().unwrap();
        assert!(entry.is_milestone());
        assert_eq!(entry.section_id, Some(2));
    }

    #[test]
    fn test_build_entry_rejects_bad_time_text() {
        let mut state = EntryDialogState::from_draft(&draft());
        state.title = "Meeting".to_string();
        state.end_time_text = "25:99".to_string();

        let result = state.build_entry();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid end time"));
    }

    #[test]
    fn test_build_entry_keeps_id_for_edits() {
        let mut existing = draft();
        existing.id = Some(7);
        existing.title = "Meeting".to_string();

        let state = EntryDialogState::from_entry(&existing);
        assert_eq!(state.build_entry().unwrap().id, Some(7));
    }
}
