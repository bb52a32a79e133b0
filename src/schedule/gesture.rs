// Gesture controller
// Interprets pointer drags against the board grid: create, move, resize

use chrono::{NaiveDate, NaiveTime};
use egui::{Pos2, Vec2};

use super::board::BoardLayout;
use super::time_grid::TimeGrid;
use crate::models::entry::Entry;

/// Pointer displacement below this is a click, not a drag.
pub const DRAG_THRESHOLD_PX: f32 = 5.0;

/// What the active drag is doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    Create,
    Move,
    ResizeStart,
    ResizeEnd,
}

/// Which edge of an entry a resize grabbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeEdge {
    /// Top edge - adjusts start time
    Start,
    /// Bottom edge - adjusts end time
    End,
}

/// A pointer position in board-local space: pixels from the window top-left
/// plus the row width, so lane lookup can work in fractions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPos {
    pub x_px: f32,
    pub y_px: f32,
    pub row_width_px: f32,
}

impl BoardPos {
    pub fn new(x_px: f32, y_px: f32, row_width_px: f32) -> Self {
        Self {
            x_px,
            y_px,
            row_width_px,
        }
    }

    pub fn x_fraction(&self) -> f32 {
        if self.row_width_px <= 0.0 {
            return 0.0;
        }
        self.x_px / self.row_width_px
    }

    fn to_pos2(self) -> Pos2 {
        Pos2::new(self.x_px, self.y_px)
    }
}

/// The fields a drag can change, captured before the drag starts so a failed
/// commit (or an abandoned drag) can restore them.
#[derive(Clone, Debug, PartialEq)]
pub struct EntrySnapshot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub section_id: Option<i64>,
    pub color: Option<String>,
}

impl EntrySnapshot {
    pub fn of(entry: &Entry) -> Self {
        Self {
            start_time: entry.start_time,
            end_time: entry.end_time,
            section_id: entry.section_id,
            color: entry.color.clone(),
        }
    }

    pub fn restore(&self, entry: &mut Entry) {
        entry.start_time = self.start_time;
        entry.end_time = self.end_time;
        entry.section_id = self.section_id;
        entry.color = self.color.clone();
    }
}

/// Partial update carrying only the fields a drag actually changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryPatch {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub section_id: Option<Option<i64>>,
    pub color: Option<Option<String>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none()
            && self.end_time.is_none()
            && self.section_id.is_none()
            && self.color.is_none()
    }

    /// The fields on which `after` differs from the pre-drag snapshot.
    pub fn diff(before: &EntrySnapshot, after: &Entry) -> Self {
        let mut patch = Self::default();
        if after.start_time != before.start_time {
            patch.start_time = Some(after.start_time);
        }
        if after.end_time != before.end_time {
            patch.end_time = Some(after.end_time);
        }
        if after.section_id != before.section_id {
            patch.section_id = Some(after.section_id);
        }
        if after.color != before.color {
            patch.color = Some(after.color.clone());
        }
        patch
    }
}

/// One active drag, alive between pointer-down and pointer-up.
///
/// The session owns a working copy of the entry (a draft for create); the
/// board renders the working copy for live feedback and nothing is persisted
/// until pointer-up.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    pub entry: Entry,
    pub origin: BoardPos,
    /// Snapped minutes under the pointer at pointer-down.
    pub anchor_minutes: i32,
    pub before: EntrySnapshot,
    /// Set once displacement passes [`DRAG_THRESHOLD_PX`]; sticky.
    pub dragged: bool,
}

impl DragSession {
    /// Start a create drag on empty grid space. The draft anchors a zero
    /// duration at the snapped pointer time, in the lane under the pointer.
    pub fn begin_create(
        grid: &TimeGrid,
        layout: &BoardLayout,
        pos: BoardPos,
        date: NaiveDate,
    ) -> Self {
        let minutes = grid.snap(grid.pixels_to_minutes(pos.y_px));
        let time = grid.minutes_to_time(minutes);
        let lane = layout.lane_at(pos.x_fraction());

        let entry = Entry {
            id: None,
            title: String::new(),
            description: None,
            location: None,
            date,
            start_time: time,
            end_time: time,
            section_id: lane.and_then(|l| l.section_id),
            parent_id: None,
            depth: 0,
            color: lane.and_then(|l| l.color.clone()),
            created_at: None,
            updated_at: None,
        };
        let before = EntrySnapshot::of(&entry);

        Self {
            kind: DragKind::Create,
            entry,
            origin: pos,
            anchor_minutes: minutes,
            before,
            dragged: false,
        }
    }

    /// Start a move drag on an entry's body. Requires a persisted entry.
    pub fn begin_move(grid: &TimeGrid, entry: &Entry, pos: BoardPos) -> Option<Self> {
        entry.id?;
        Some(Self {
            kind: DragKind::Move,
            entry: entry.clone(),
            origin: pos,
            anchor_minutes: grid.snap(grid.pixels_to_minutes(pos.y_px)),
            before: EntrySnapshot::of(entry),
            dragged: false,
        })
    }

    /// Start a resize drag on an entry's top or bottom edge handle.
    pub fn begin_resize(
        grid: &TimeGrid,
        entry: &Entry,
        edge: ResizeEdge,
        pos: BoardPos,
    ) -> Option<Self> {
        entry.id?;
        Some(Self {
            kind: match edge {
                ResizeEdge::Start => DragKind::ResizeStart,
                ResizeEdge::End => DragKind::ResizeEnd,
            },
            entry: entry.clone(),
            origin: pos,
            anchor_minutes: grid.snap(grid.pixels_to_minutes(pos.y_px)),
            before: EntrySnapshot::of(entry),
            dragged: false,
        })
    }

    /// Advance the session for a pointer move. Pure: `(session, pointer) ->
    /// session'`, independent of any event-loop binding.
    pub fn update(mut self, grid: &TimeGrid, layout: &BoardLayout, pos: BoardPos) -> Self {
        let displacement: Vec2 = pos.to_pos2() - self.origin.to_pos2();
        if displacement.length() > DRAG_THRESHOLD_PX {
            self.dragged = true;
        }

        let minutes = grid.snap(grid.pixels_to_minutes(pos.y_px));
        let step = grid.grid_minutes as i32;

        match self.kind {
            DragKind::Create => {
                let lo = self.anchor_minutes.min(minutes);
                let hi = self.anchor_minutes.max(minutes);
                self.entry.start_time = grid.minutes_to_time(lo);
                self.entry.end_time = grid.minutes_to_time(hi);
            }
            DragKind::Move => {
                let delta = minutes - self.anchor_minutes;
                let start = grid.time_to_minutes(self.before.start_time) + delta;
                let end = grid.time_to_minutes(self.before.end_time) + delta;
                self.entry.start_time = grid.minutes_to_time(start);
                self.entry.end_time = grid.minutes_to_time(end);

                // Lane (and its color) follow the pointer live, not only on
                // commit
                if let Some(lane) = layout.lane_at(pos.x_fraction()) {
                    self.entry.section_id = lane.section_id;
                    self.entry.color = lane.color.clone();
                }
            }
            DragKind::ResizeEnd => {
                let start = grid.time_to_minutes(self.before.start_time);
                let end = minutes.max(start + step);
                self.entry.end_time = grid.minutes_to_time(end);
            }
            DragKind::ResizeStart => {
                let end = grid.time_to_minutes(self.before.end_time);
                let start = minutes.min(end - step);
                self.entry.start_time = grid.minutes_to_time(start);
            }
        }

        self
    }

    /// End the session on pointer-up and decide what happens next. The
    /// session is consumed whether or not anything is committed.
    pub fn finish(self) -> DragOutcome {
        match self.kind {
            // Create never auto-commits; even a zero-movement milestone draft
            // goes through the editor for explicit confirmation
            DragKind::Create => DragOutcome::OpenCreateEditor(self.entry),
            DragKind::Move | DragKind::ResizeStart | DragKind::ResizeEnd => {
                let entry_id = match self.entry.id {
                    Some(id) => id,
                    None => return DragOutcome::Nothing,
                };

                if !self.dragged {
                    // A stationary press is a click: open the editor instead
                    return DragOutcome::OpenEntryEditor(entry_id);
                }

                let patch = EntryPatch::diff(&self.before, &self.entry);
                if patch.is_empty() {
                    return DragOutcome::Nothing;
                }

                DragOutcome::Commit {
                    entry_id,
                    patch,
                    before: self.before,
                }
            }
        }
    }
}

/// What the UI layer should do after a pointer-up.
#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    /// Open the editor prefilled with the create draft.
    OpenCreateEditor(Entry),
    /// Plain click on an entry: open it for editing.
    OpenEntryEditor(i64),
    /// Persist the changed fields; revert to `before` if the store refuses.
    Commit {
        entry_id: i64,
        patch: EntryPatch,
        before: EntrySnapshot,
    },
    Nothing,
}

/// Owner of the single active drag session.
///
/// The controller is the sole writer of the working entry during a drag; a
/// second pointer-down while a session is active is ignored.
#[derive(Debug, Default)]
pub struct GestureController {
    session: Option<DragSession>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn pointer_down_empty(
        &mut self,
        grid: &TimeGrid,
        layout: &BoardLayout,
        pos: BoardPos,
        date: NaiveDate,
    ) {
        if self.session.is_some() {
            return;
        }
        self.session = Some(DragSession::begin_create(grid, layout, pos, date));
    }

    pub fn pointer_down_entry(&mut self, grid: &TimeGrid, entry: &Entry, pos: BoardPos) {
        if self.session.is_some() {
            return;
        }
        self.session = DragSession::begin_move(grid, entry, pos);
    }

    pub fn pointer_down_edge(
        &mut self,
        grid: &TimeGrid,
        entry: &Entry,
        edge: ResizeEdge,
        pos: BoardPos,
    ) {
        if self.session.is_some() {
            return;
        }
        self.session = DragSession::begin_resize(grid, entry, edge, pos);
    }

    pub fn pointer_move(&mut self, grid: &TimeGrid, layout: &BoardLayout, pos: BoardPos) {
        if let Some(session) = self.session.take() {
            self.session = Some(session.update(grid, layout, pos));
        }
    }

    /// Destroys the session unconditionally and reports the outcome.
    pub fn pointer_up(&mut self) -> DragOutcome {
        match self.session.take() {
            Some(session) => session.finish(),
            None => DragOutcome::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::section::Section;
    use crate::models::settings::ScheduleSettings;
    use crate::schedule::board::layout_board;
    use pretty_assertions::assert_eq;

    const ROW_WIDTH: f32 = 800.0;

    fn grid() -> TimeGrid {
        // 07:00..25:00 over 1080px: 1px per minute
        TimeGrid::new(&ScheduleSettings::default(), 1080.0)
    }

    fn sections() -> Vec<Section> {
        let mut a = Section::new("Work", "#3B82F6", 0);
        a.id = Some(1);
        vec![a]
    }

    fn board() -> BoardLayout {
        layout_board(&[], &sections(), &grid())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn pos(x: f32, y: f32) -> BoardPos {
        BoardPos::new(x, y, ROW_WIDTH)
    }

    fn saved_entry(start: NaiveTime, end: NaiveTime) -> Entry {
        let mut e = Entry::new("Meeting", date(), start, end).unwrap();
        e.id = Some(1);
        // Lives in the first lane, matching the x positions the tests press at
        e.section_id = Some(1);
        e.color = Some("#3B82F6".to_string());
        e
    }

    #[test]
    fn test_create_anchors_snapped_time_and_lane() {
        // y=127px is 09:07 on a 07:00 window; snaps to 09:00 with a 30m grid
        let session = DragSession::begin_create(&grid(), &board(), pos(100.0, 127.0), date());

        assert_eq!(session.entry.start_time, t(9, 0));
        assert_eq!(session.entry.end_time, t(9, 0));
        // x=100/800 is inside the first lane
        assert_eq!(session.entry.section_id, Some(1));
        assert_eq!(session.entry.color, Some("#3B82F6".to_string()));
        assert!(!session.dragged);
    }

    #[test]
    fn test_create_drag_spans_min_to_max() {
        let session = DragSession::begin_create(&grid(), &board(), pos(100.0, 120.0), date())
            .update(&grid(), &board(), pos(100.0, 240.0));

        assert_eq!(session.entry.start_time, t(9, 0));
        assert_eq!(session.entry.end_time, t(11, 0));
        assert!(session.dragged);
    }

    #[test]
    fn test_create_drag_upwards_swaps_ends() {
        let session = DragSession::begin_create(&grid(), &board(), pos(100.0, 240.0), date())
            .update(&grid(), &board(), pos(100.0, 120.0));

        assert_eq!(session.entry.start_time, t(9, 0));
        assert_eq!(session.entry.end_time, t(11, 0));
    }

    #[test]
    fn test_create_always_goes_through_editor() {
        let outcome = DragSession::begin_create(&grid(), &board(), pos(100.0, 120.0), date())
            .update(&grid(), &board(), pos(100.0, 240.0))
            .finish();

        assert!(matches!(outcome, DragOutcome::OpenCreateEditor(_)));
    }

    #[test]
    fn test_create_with_zero_movement_never_auto_commits() {
        let outcome =
            DragSession::begin_create(&grid(), &board(), pos(100.0, 120.0), date()).finish();

        // A zero-duration draft still only reaches the store via the editor
        match outcome {
            DragOutcome::OpenCreateEditor(draft) => {
                assert!(draft.is_milestone());
                assert!(draft.id.is_none());
            }
            other => panic!("expected create editor, got {:?}", other),
        }
    }

    #[test]
    fn test_create_drag_back_to_anchor_stays_draft() {
        // Drag away and release back at the anchor: 09:00..09:00
        let outcome = DragSession::begin_create(&grid(), &board(), pos(100.0, 120.0), date())
            .update(&grid(), &board(), pos(100.0, 240.0))
            .update(&grid(), &board(), pos(100.0, 120.0))
            .finish();

        match outcome {
            DragOutcome::OpenCreateEditor(draft) => assert!(draft.is_milestone()),
            other => panic!("expected create editor, got {:?}", other),
        }
    }

    #[test]
    fn test_move_shifts_both_ends_and_keeps_duration() {
        let entry = saved_entry(t(9, 0), t(10, 0));
        let session = DragSession::begin_move(&grid(), &entry, pos(100.0, 130.0))
            .unwrap()
            .update(&grid(), &board(), pos(100.0, 250.0));

        assert_eq!(session.entry.start_time, t(11, 0));
        assert_eq!(session.entry.end_time, t(12, 0));
    }

    #[test]
    fn test_move_preserves_off_grid_offset() {
        // A stored 09:10 start is not re-snapped; only the delta is snapped
        let entry = saved_entry(t(9, 10), t(10, 10));
        let session = DragSession::begin_move(&grid(), &entry, pos(100.0, 130.0))
            .unwrap()
            .update(&grid(), &board(), pos(100.0, 190.0));

        assert_eq!(session.entry.start_time, t(10, 10));
        assert_eq!(session.entry.end_time, t(11, 10));
    }

    #[test]
    fn test_move_reassigns_lane_and_color_live() {
        let entry = saved_entry(t(9, 0), t(10, 0));
        // x=700/800 lands in the uncategorized lane (right half)
        let session = DragSession::begin_move(&grid(), &entry, pos(100.0, 130.0))
            .unwrap()
            .update(&grid(), &board(), pos(700.0, 130.0));

        assert_eq!(session.entry.section_id, None);
        assert_eq!(session.entry.color, None);
    }

    #[test]
    fn test_move_past_midnight_window() {
        let entry = saved_entry(t(23, 30), t(0, 30));
        let session = DragSession::begin_move(&grid(), &entry, pos(100.0, 1000.0))
            .unwrap()
            .update(&grid(), &board(), pos(100.0, 1030.0));

        // Shifted +30m: 24:00..25:00 displays as 00:00..01:00
        assert_eq!(session.entry.start_time, t(0, 0));
        assert_eq!(session.entry.end_time, t(1, 0));
    }

    #[test]
    fn test_resize_end_clamps_to_one_grid_step() {
        let entry = saved_entry(t(9, 0), t(10, 0));
        // Drag the bottom edge far above the start
        let session = DragSession::begin_resize(&grid(), &entry, ResizeEdge::End, pos(100.0, 180.0))
            .unwrap()
            .update(&grid(), &board(), pos(100.0, 60.0));

        assert_eq!(session.entry.start_time, t(9, 0));
        assert_eq!(session.entry.end_time, t(9, 30));
    }

    #[test]
    fn test_resize_start_clamps_symmetrically() {
        let entry = saved_entry(t(9, 0), t(10, 0));
        let session =
            DragSession::begin_resize(&grid(), &entry, ResizeEdge::Start, pos(100.0, 120.0))
                .unwrap()
                .update(&grid(), &board(), pos(100.0, 400.0));

        assert_eq!(session.entry.start_time, t(9, 30));
        assert_eq!(session.entry.end_time, t(10, 0));
    }

    #[test]
    fn test_resize_end_grows_normally() {
        let entry = saved_entry(t(9, 0), t(10, 0));
        let session = DragSession::begin_resize(&grid(), &entry, ResizeEdge::End, pos(100.0, 180.0))
            .unwrap()
            .update(&grid(), &board(), pos(100.0, 300.0));

        assert_eq!(session.entry.end_time, t(12, 0));
    }

    #[test]
    fn test_click_without_drag_opens_editor() {
        let entry = saved_entry(t(9, 0), t(10, 0));
        let outcome = DragSession::begin_move(&grid(), &entry, pos(100.0, 130.0))
            .unwrap()
            .update(&grid(), &board(), pos(102.0, 131.0))
            .finish();

        assert_eq!(outcome, DragOutcome::OpenEntryEditor(1));
    }

    #[test]
    fn test_drag_with_no_net_change_commits_nothing() {
        let entry = saved_entry(t(9, 0), t(10, 0));
        let outcome = DragSession::begin_move(&grid(), &entry, pos(100.0, 130.0))
            .unwrap()
            .update(&grid(), &board(), pos(100.0, 250.0))
            .update(&grid(), &board(), pos(100.0, 130.0))
            .finish();

        assert_eq!(outcome, DragOutcome::Nothing);
    }

    #[test]
    fn test_commit_carries_only_changed_fields() {
        let entry = saved_entry(t(9, 0), t(10, 0));
        let outcome = DragSession::begin_move(&grid(), &entry, pos(100.0, 130.0))
            .unwrap()
            .update(&grid(), &board(), pos(100.0, 250.0))
            .finish();

        match outcome {
            DragOutcome::Commit {
                entry_id, patch, ..
            } => {
                assert_eq!(entry_id, 1);
                assert_eq!(patch.start_time, Some(t(11, 0)));
                assert_eq!(patch.end_time, Some(t(12, 0)));
                // The lane never changed (same x), so it is not in the patch
                assert_eq!(patch.section_id, None);
            }
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_controller_ignores_second_pointer_down() {
        let mut controller = GestureController::new();
        let entry = saved_entry(t(9, 0), t(10, 0));

        controller.pointer_down_entry(&grid(), &entry, pos(100.0, 130.0));
        assert_eq!(controller.session().unwrap().kind, DragKind::Move);

        // A second press (e.g. a stray touch) must not replace the session
        controller.pointer_down_empty(&grid(), &board(), pos(300.0, 300.0), date());
        assert_eq!(controller.session().unwrap().kind, DragKind::Move);
    }

    #[test]
    fn test_controller_pointer_up_destroys_session() {
        let mut controller = GestureController::new();
        let entry = saved_entry(t(9, 0), t(10, 0));

        controller.pointer_down_entry(&grid(), &entry, pos(100.0, 130.0));
        let _ = controller.pointer_up();
        assert!(!controller.is_active());
        assert_eq!(controller.pointer_up(), DragOutcome::Nothing);
    }

    #[test]
    fn test_move_requires_persisted_entry() {
        let unsaved = Entry::new("Draft", date(), t(9, 0), t(10, 0)).unwrap();
        assert!(DragSession::begin_move(&grid(), &unsaved, pos(100.0, 130.0)).is_none());
    }
}
