// Day board view
// Renders one day's lanes and entries and feeds pointer input to the
// gesture controller

use chrono::NaiveDate;
use egui::{Align2, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::theme::BoardTheme;
use crate::models::entry::Entry;
use crate::models::section::Section;
use crate::models::settings::ScheduleSettings;
use crate::schedule::{
    layout_board, BoardLayout, BoardPos, DragKind, DragOutcome, GestureController, ResizeEdge,
    TimeGrid,
};

/// Width of the hour label gutter on the left.
pub const TIME_GUTTER_WIDTH: f32 = 56.0;
/// Height of the lane header strip.
pub const LANE_HEADER_HEIGHT: f32 = 26.0;
/// Vertical pixels per hour of the display window.
pub const HOUR_HEIGHT: f32 = 60.0;
/// Resize hit zones never grow past this.
const RESIZE_ZONE_MAX: f32 = 8.0;

/// Which resize edge (if any) a pointer position grabs on an entry rect.
///
/// Small blocks split into quarter-height zones so the body stays clickable;
/// taller blocks use a fixed zone at each edge.
fn resize_edge_at(rect: Rect, pos: Pos2) -> Option<ResizeEdge> {
    let zone = (rect.height() * 0.25).min(RESIZE_ZONE_MAX);
    if zone < 2.0 {
        // Milestone-sized blocks have no usable edge zone
        return None;
    }
    if pos.y <= rect.top() + zone {
        Some(ResizeEdge::Start)
    } else if pos.y >= rect.bottom() - zone {
        Some(ResizeEdge::End)
    } else {
        None
    }
}

/// The entry list the board actually draws: the stored entries, with the
/// drag session's working copy substituted in for live feedback.
fn display_entries(entries: &[Entry], controller: &GestureController) -> Vec<Entry> {
    let mut shown: Vec<Entry> = entries.to_vec();
    if let Some(session) = controller.session() {
        if let Some(id) = session.entry.id {
            if let Some(slot) = shown.iter_mut().find(|e| e.id == Some(id)) {
                *slot = session.entry.clone();
            }
        }
    }
    shown
}

pub struct DayBoard;

impl DayBoard {
    /// Render the board for one date and route pointer input through the
    /// gesture controller. Returns the outcome of a finished drag, if any.
    pub fn show(
        ui: &mut egui::Ui,
        date: NaiveDate,
        entries: &[Entry],
        sections: &[Section],
        settings: &ScheduleSettings,
        controller: &mut GestureController,
        theme: &BoardTheme,
    ) -> Option<DragOutcome> {
        let window_hours = settings
            .day_end_hour
            .saturating_sub(settings.day_start_hour);
        let board_height = window_hours as f32 * HOUR_HEIGHT;
        let grid = TimeGrid::new(settings, board_height);

        if grid.is_degenerate() {
            ui.colored_label(
                theme.text_secondary,
                "Display window is empty; check the schedule settings.",
            );
            return None;
        }

        let shown = display_entries(entries, controller);
        let layout = layout_board(&shown, sections, &grid);

        Self::render_lane_headers(ui, &layout, theme);

        let mut outcome = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let desired = Vec2::new(ui.available_width(), board_height);
                let (board_rect, _) = ui.allocate_exact_size(desired, Sense::hover());
                let row_rect = Rect::from_min_size(
                    Pos2::new(board_rect.left() + TIME_GUTTER_WIDTH, board_rect.top()),
                    Vec2::new(
                        (board_rect.width() - TIME_GUTTER_WIDTH).max(0.0),
                        board_rect.height(),
                    ),
                );

                Self::paint_grid(ui, board_rect, row_rect, &grid, &layout, theme);
                Self::paint_entries(ui, row_rect, &shown, &layout, theme);
                Self::paint_create_ghost(ui, row_rect, &grid, &layout, controller, theme);

                outcome = Self::handle_pointer(
                    ui, row_rect, date, &grid, &shown, &layout, controller, theme,
                );
            });

        outcome
    }

    fn render_lane_headers(ui: &mut egui::Ui, layout: &BoardLayout, theme: &BoardTheme) {
        let desired = Vec2::new(ui.available_width(), LANE_HEADER_HEIGHT);
        let (header_rect, _) = ui.allocate_exact_size(desired, Sense::hover());
        let row_left = header_rect.left() + TIME_GUTTER_WIDTH;
        let row_width = (header_rect.width() - TIME_GUTTER_WIDTH).max(0.0);

        ui.painter()
            .rect_filled(header_rect, 0.0, theme.lane_header_background);

        for lane in &layout.lanes {
            let left = row_left + row_width * lane.left_pct / 100.0;
            let width = row_width * lane.width_pct / 100.0;
            let lane_rect = Rect::from_min_size(
                Pos2::new(left, header_rect.top()),
                Vec2::new(width, LANE_HEADER_HEIGHT),
            );

            let label_color = lane
                .color
                .as_deref()
                .and_then(|hex| BoardTheme::hex_to_color(hex).ok())
                .unwrap_or(theme.text_secondary);
            ui.painter().text(
                lane_rect.center(),
                Align2::CENTER_CENTER,
                &lane.name,
                FontId::proportional(12.0),
                label_color,
            );
            ui.painter().vline(
                lane_rect.right(),
                lane_rect.y_range(),
                Stroke::new(1.0, theme.lane_border),
            );
        }
    }

    fn paint_grid(
        ui: &mut egui::Ui,
        board_rect: Rect,
        row_rect: Rect,
        grid: &TimeGrid,
        layout: &BoardLayout,
        theme: &BoardTheme,
    ) {
        let painter = ui.painter();
        painter.rect_filled(board_rect, 0.0, theme.board_background);

        // Hour lines with labels, plus fainter grid-step lines
        let step = grid.grid_minutes.max(1) as i32;
        let mut minutes = grid.window_start_minutes();
        while minutes <= grid.window_end_minutes() {
            let y = board_rect.top() + grid.minutes_to_pixels(minutes);
            let on_hour = minutes % 60 == 0;
            painter.hline(
                row_rect.x_range(),
                y,
                Stroke::new(
                    1.0,
                    if on_hour { theme.hour_line } else { theme.grid_line },
                ),
            );
            if on_hour {
                let time = grid.minutes_to_time(minutes);
                painter.text(
                    Pos2::new(board_rect.left() + TIME_GUTTER_WIDTH - 8.0, y),
                    Align2::RIGHT_CENTER,
                    time.format("%H:%M").to_string(),
                    FontId::monospace(10.0),
                    theme.text_secondary,
                );
            }
            minutes += step;
        }

        // Lane separators
        for lane in &layout.lanes {
            let right =
                row_rect.left() + row_rect.width() * (lane.left_pct + lane.width_pct) / 100.0;
            painter.vline(right, row_rect.y_range(), Stroke::new(1.0, theme.lane_border));
        }
    }

    fn entry_rect(row_rect: Rect, layout: &crate::schedule::EntryLayout) -> Rect {
        Rect::from_min_size(
            Pos2::new(
                row_rect.left() + row_rect.width() * layout.left_pct / 100.0,
                row_rect.top() + layout.top,
            ),
            Vec2::new(row_rect.width() * layout.width_pct / 100.0, layout.height),
        )
    }

    fn paint_entries(
        ui: &mut egui::Ui,
        row_rect: Rect,
        entries: &[Entry],
        layout: &BoardLayout,
        theme: &BoardTheme,
    ) {
        let painter = ui.painter();

        for entry_layout in &layout.entries {
            let entry = match entries.iter().find(|e| e.id == Some(entry_layout.entry_id)) {
                Some(entry) => entry,
                None => continue,
            };

            let rect = Self::entry_rect(row_rect, entry_layout).shrink2(Vec2::new(1.0, 0.0));
            let fill = theme.entry_color(entry.color.as_deref());

            if entry.is_milestone() {
                // Point marker: a bar across the band instead of a box
                painter.rect_filled(
                    Rect::from_min_size(
                        rect.left_top(),
                        Vec2::new(rect.width(), 3.0),
                    ),
                    1.0,
                    fill,
                );
                painter.circle_filled(
                    Pos2::new(rect.left() + 4.0, rect.top() + 1.5),
                    3.0,
                    theme.milestone_marker,
                );
            } else {
                painter.rect_filled(rect, 4.0, fill.gamma_multiply(0.35));
                painter.rect_stroke(rect, 4.0, Stroke::new(1.0, fill));
            }

            // The label only occupies the entry's own content band; the rest
            // of the rect belongs to nested descendants
            let content_width = rect.width() * entry_layout.content_pct / 100.0;
            let content_rect = Rect::from_min_size(
                rect.left_top(),
                Vec2::new(content_width, rect.height()),
            );
            if content_rect.width() > 24.0 && content_rect.height() >= 10.0 {
                painter.text(
                    content_rect.left_top() + Vec2::new(4.0, 2.0),
                    Align2::LEFT_TOP,
                    &entry.title,
                    FontId::proportional(11.0),
                    theme.text_primary,
                );
            }
        }
    }

    fn paint_create_ghost(
        ui: &mut egui::Ui,
        row_rect: Rect,
        grid: &TimeGrid,
        layout: &BoardLayout,
        controller: &GestureController,
        theme: &BoardTheme,
    ) {
        let session = match controller.session() {
            Some(session) if session.kind == DragKind::Create => session,
            _ => return,
        };

        let start = grid.time_to_minutes(session.entry.start_time);
        let end = grid.time_to_minutes(session.entry.end_time);
        let top = row_rect.top() + grid.minutes_to_pixels(start);
        let height = ((end - start) as f32 * grid.pixels_per_minute()).max(4.0);

        // The ghost spans the lane the draft was anchored in
        let (lane_left, lane_width) = layout
            .lanes
            .iter()
            .find(|lane| lane.section_id == session.entry.section_id)
            .map(|lane| (lane.left_pct, lane.width_pct))
            .unwrap_or((0.0, 100.0));
        let ghost_rect = Rect::from_min_size(
            Pos2::new(
                row_rect.left() + row_rect.width() * lane_left / 100.0,
                top,
            ),
            Vec2::new(row_rect.width() * lane_width / 100.0, height),
        );
        ui.painter().rect_filled(ghost_rect, 4.0, theme.ghost_fill);
        ui.painter().text(
            ghost_rect.left_top() + Vec2::new(4.0, 2.0),
            Align2::LEFT_TOP,
            format!(
                "{} – {}",
                session.entry.start_time.format("%H:%M"),
                session.entry.end_time.format("%H:%M")
            ),
            FontId::proportional(11.0),
            theme.text_primary,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_pointer(
        ui: &mut egui::Ui,
        row_rect: Rect,
        date: NaiveDate,
        grid: &TimeGrid,
        entries: &[Entry],
        layout: &BoardLayout,
        controller: &mut GestureController,
        _theme: &BoardTheme,
    ) -> Option<DragOutcome> {
        let response = ui.interact(
            row_rect,
            ui.id().with("day_board_surface"),
            Sense::click_and_drag(),
        );

        let board_pos = |pos: Pos2| {
            BoardPos::new(
                pos.x - row_rect.left(),
                pos.y - row_rect.top(),
                row_rect.width(),
            )
        };

        // Topmost block under the pointer; descendants paint after their
        // parents, so scan back to front
        let hit = |pos: Pos2| {
            layout.entries.iter().rev().find_map(|entry_layout| {
                let rect = Self::entry_rect(row_rect, entry_layout);
                if rect.contains(pos) {
                    entries
                        .iter()
                        .find(|e| e.id == Some(entry_layout.entry_id))
                        .map(|entry| (entry, rect))
                } else {
                    None
                }
            })
        };

        if let Some(pos) = response.hover_pos() {
            if let Some((_, rect)) = hit(pos) {
                if resize_edge_at(rect, pos).is_some() {
                    ui.ctx().set_cursor_icon(CursorIcon::ResizeVertical);
                }
            }
        }

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                match hit(pos) {
                    Some((entry, rect)) => match resize_edge_at(rect, pos) {
                        Some(edge) => {
                            controller.pointer_down_edge(grid, entry, edge, board_pos(pos))
                        }
                        None => controller.pointer_down_entry(grid, entry, board_pos(pos)),
                    },
                    None => controller.pointer_down_empty(grid, layout, board_pos(pos), date),
                }
            }
        }

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                controller.pointer_move(grid, layout, board_pos(pos));
            }
        }

        if response.drag_stopped() {
            let outcome = controller.pointer_up();
            if outcome != DragOutcome::Nothing {
                return Some(outcome);
            }
        }

        None
    }
}
