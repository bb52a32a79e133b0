// Schedule application shell
// Owns the database, cached model state, and the active drag session

use chrono::{Duration, Local, NaiveDate};

use crate::models::entry::Entry;
use crate::models::section::Section;
use crate::models::settings::{ScheduleSettings, GRID_STEPS};
use crate::schedule::{commit_drag, DragOutcome, GestureController};
use crate::services::database::Database;
use crate::services::entry::EntryService;
use crate::services::section::SectionService;
use crate::services::settings::SettingsService;
use crate::ui_egui::day_board::DayBoard;
use crate::ui_egui::entry_dialog::{render_entry_dialog, EntryDialogState};
use crate::ui_egui::theme::BoardTheme;

pub struct ScheduleApp {
    database: Database,
    settings: ScheduleSettings,
    sections: Vec<Section>,
    /// Optimistic local copy of the current date's entries; reconciled from
    /// the store after every commit
    entries: Vec<Entry>,
    current_date: NaiveDate,
    /// The single active drag session lives here and nowhere else
    controller: GestureController,
    show_entry_dialog: bool,
    entry_dialog_state: Option<EntryDialogState>,
    active_theme: BoardTheme,
    status_message: Option<String>,
}

impl ScheduleApp {
    pub fn new(cc: &eframe::CreationContext<'_>, db_path: &str) -> anyhow::Result<Self> {
        let database = Database::new(db_path)?;
        database.initialize_schema()?;
        SectionService::new(database.connection()).initialize_defaults()?;

        let settings = SettingsService::new(&database).get()?;
        let sections = SectionService::new(database.connection()).list()?;
        let current_date = Local::now().date_naive();
        let entries = EntryService::new(database.connection()).list_for_date(current_date)?;

        let active_theme = if cc.egui_ctx.style().visuals.dark_mode {
            BoardTheme::dark()
        } else {
            BoardTheme::light()
        };

        log::info!(
            "Loaded {} entries and {} sections for {}",
            entries.len(),
            sections.len(),
            current_date
        );

        Ok(Self {
            database,
            settings,
            sections,
            entries,
            current_date,
            controller: GestureController::new(),
            show_entry_dialog: false,
            entry_dialog_state: None,
            active_theme,
            status_message: None,
        })
    }

    fn reload_entries(&mut self) {
        match EntryService::new(self.database.connection()).list_for_date(self.current_date) {
            Ok(entries) => self.entries = entries,
            Err(e) => {
                log::error!("Failed to reload entries: {}", e);
                self.status_message = Some(format!("Failed to reload entries: {}", e));
            }
        }
    }

    fn go_to_date(&mut self, date: NaiveDate) {
        if date != self.current_date {
            self.current_date = date;
            self.reload_entries();
        }
    }

    fn set_grid_minutes(&mut self, grid_minutes: u32) {
        let mut updated = self.settings;
        updated.grid_minutes = grid_minutes;
        match SettingsService::new(&self.database).update(&updated) {
            Ok(()) => self.settings = updated,
            Err(e) => {
                log::error!("Failed to update grid step: {}", e);
                self.status_message = Some(format!("Failed to update grid step: {}", e));
            }
        }
    }

    fn handle_drag_outcome(&mut self, outcome: DragOutcome) {
        match outcome {
            DragOutcome::OpenCreateEditor(draft) => {
                self.entry_dialog_state = Some(EntryDialogState::from_draft(&draft));
                self.show_entry_dialog = true;
            }
            DragOutcome::OpenEntryEditor(entry_id) => {
                if let Some(entry) = self.entries.iter().find(|e| e.id == Some(entry_id)) {
                    self.entry_dialog_state = Some(EntryDialogState::from_entry(entry));
                    self.show_entry_dialog = true;
                }
            }
            DragOutcome::Commit {
                entry_id,
                patch,
                before,
            } => {
                let service = EntryService::new(self.database.connection());
                match commit_drag(&service, &mut self.entries, entry_id, &patch, &before) {
                    Ok(()) => self.reload_entries(),
                    Err(e) => {
                        self.status_message = Some(format!("Change not saved: {}", e));
                    }
                }
            }
            DragOutcome::Nothing => {}
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("◀").clicked() {
                self.go_to_date(self.current_date - Duration::days(1));
            }
            if ui.button("Today").clicked() {
                self.go_to_date(Local::now().date_naive());
            }
            if ui.button("▶").clicked() {
                self.go_to_date(self.current_date + Duration::days(1));
            }

            ui.separator();
            ui.label(
                egui::RichText::new(format!(
                    "{} {}",
                    self.current_date.format("%A"),
                    self.current_date.format("%B %-d, %Y")
                ))
                .strong(),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut selected = self.settings.grid_minutes;
                egui::ComboBox::from_id_source("grid_step")
                    .selected_text(format!("{} min", selected))
                    .show_ui(ui, |ui| {
                        for step in GRID_STEPS {
                            ui.selectable_value(&mut selected, step, format!("{} min", step));
                        }
                    });
                if selected != self.settings.grid_minutes {
                    self.set_grid_minutes(selected);
                }
                ui.label("Snap:");
            });
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        if self.status_message.is_none() {
            return;
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(ref message) = self.status_message {
                    ui.colored_label(egui::Color32::from_rgb(200, 140, 0), message);
                }
                if ui.small_button("Dismiss").clicked() {
                    self.status_message = None;
                }
            });
        });
    }

    fn render_entry_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_entry_dialog {
            self.entry_dialog_state = None;
            return;
        }

        let Some(state) = self.entry_dialog_state.as_mut() else {
            self.show_entry_dialog = false;
            return;
        };

        let result = render_entry_dialog(ctx, state, &self.sections, &mut self.show_entry_dialog);

        if let Some(entry) = result.saved_entry {
            let service = EntryService::new(self.database.connection());
            let saved = match entry.id {
                Some(_) => service.update(&entry),
                None => service.create(entry).map(|_| ()),
            };
            if let Err(e) = saved {
                log::error!("Failed to save entry: {}", e);
                self.status_message = Some(format!("Failed to save entry: {}", e));
            }
            self.reload_entries();
        }

        if let Some(entry_id) = result.delete_request {
            if let Err(e) = EntryService::new(self.database.connection()).delete(entry_id) {
                log::error!("Failed to delete entry: {}", e);
                self.status_message = Some(format!("Failed to delete entry: {}", e));
            }
            self.reload_entries();
        }
    }
}

impl eframe::App for ScheduleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.active_theme.apply_to_context(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        self.render_status_bar(ctx);

        let mut outcome = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            outcome = DayBoard::show(
                ui,
                self.current_date,
                &self.entries,
                &self.sections,
                &self.settings,
                &mut self.controller,
                &self.active_theme,
            );
        });

        if let Some(outcome) = outcome {
            self.handle_drag_outcome(outcome);
        }

        self.render_entry_dialog(ctx);

        // Keep live drag feedback smooth
        if self.controller.is_active() {
            ctx.request_repaint();
        }
    }
}
