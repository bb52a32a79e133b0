// Hierarchical allocator
// Recursively subdivides horizontal bands over the entry parent graph

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::packer::{pack_columns, PackItem};
use super::time_grid::TimeGrid;
use crate::models::entry::Entry;

/// Minimum pixel height for a rendered block; keeps milestones visible.
pub const MIN_BLOCK_HEIGHT_PX: f32 = 8.0;

/// Structural failure of a layout pass. These are data-integrity problems;
/// callers fall back to a flat (unnested) layout for the affected entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("entry {0} is part of a cycle in the parent graph")]
    ParentCycle(i64),
    #[error("entry {id} references missing parent {parent_id}")]
    MissingParent { id: i64, parent_id: i64 },
}

/// A horizontal band, as percentages of the full row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub left_pct: f32,
    pub width_pct: f32,
}

impl Band {
    pub const FULL_ROW: Band = Band {
        left_pct: 0.0,
        width_pct: 100.0,
    };

    /// The sub-band at `rel_left`/`rel_width` percent of this band.
    fn slice(&self, rel_left_pct: f32, rel_width_pct: f32) -> Band {
        Band {
            left_pct: self.left_pct + self.width_pct * rel_left_pct / 100.0,
            width_pct: self.width_pct * rel_width_pct / 100.0,
        }
    }
}

/// Computed geometry for one entry, recomputed wholesale every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryLayout {
    pub entry_id: i64,
    /// Vertical offset from the window top, in pixels.
    pub top: f32,
    /// Block height in pixels; floored so milestones stay visible.
    pub height: f32,
    /// Absolute left edge, percent of the full row.
    pub left_pct: f32,
    /// Absolute width, percent of the full row.
    pub width_pct: f32,
    /// Share of the entry's own band reserved for its own content; the rest
    /// belongs to its descendants.
    pub content_pct: f32,
}

/// Lay out all entries of one lane inside `band`, honoring parent nesting.
///
/// Fails fast on structural errors (cycles, dangling parents) instead of
/// hanging; see [`layout_entries_flat`] for the degraded fallback.
pub fn layout_entries(
    entries: &[Entry],
    grid: &TimeGrid,
    band: Band,
) -> Result<Vec<EntryLayout>, LayoutError> {
    let persisted: Vec<&Entry> = entries.iter().filter(|e| e.id.is_some()).collect();

    let by_id: HashMap<i64, &Entry> = persisted
        .iter()
        .map(|e| (e.id.unwrap(), *e))
        .collect();

    let mut children: HashMap<Option<i64>, Vec<&Entry>> = HashMap::new();
    for &entry in &persisted {
        let id = entry.id.unwrap();
        if let Some(parent_id) = entry.parent_id {
            if !by_id.contains_key(&parent_id) {
                return Err(LayoutError::MissingParent { id, parent_id });
            }
        }
        children.entry(entry.parent_id).or_default().push(entry);
    }

    // Depth of every entry is computed up front so cycles are detected
    // deterministically even when the cycle is unreachable from any root.
    let mut depths: HashMap<i64, usize> = HashMap::new();
    for entry in &persisted {
        let mut visiting = HashSet::new();
        max_descendant_depth(entry.id.unwrap(), &children, &mut depths, &mut visiting)?;
    }

    let mut out = Vec::with_capacity(persisted.len());
    place_children(None, band, grid, &by_id, &children, &depths, &mut out);
    Ok(out)
}

/// Degraded layout: every entry is packed as a root with full content width,
/// ignoring parent links. Used when [`layout_entries`] reports a structural
/// error so the board still renders.
pub fn layout_entries_flat(entries: &[Entry], grid: &TimeGrid, band: Band) -> Vec<EntryLayout> {
    let items: Vec<PackItem> = entries
        .iter()
        .filter_map(|e| {
            e.id.map(|id| {
                PackItem::new(
                    id,
                    grid.time_to_minutes(e.start_time),
                    grid.time_to_minutes(e.end_time),
                )
            })
        })
        .collect();

    let by_id: HashMap<i64, &Entry> = entries
        .iter()
        .filter_map(|e| e.id.map(|id| (id, e)))
        .collect();

    pack_columns(&items)
        .into_iter()
        .map(|packed| {
            let entry = by_id[&packed.id];
            let (top, height) = vertical_extent(entry, grid);
            EntryLayout {
                entry_id: packed.id,
                top,
                height,
                left_pct: band.left_pct + band.width_pct * packed.left_pct() / 100.0,
                width_pct: band.width_pct * packed.width_pct() / 100.0,
                content_pct: 100.0,
            }
        })
        .collect()
}

/// Longest descendant chain below `id` (0 for leaves), memoized per entry.
fn max_descendant_depth(
    id: i64,
    children: &HashMap<Option<i64>, Vec<&Entry>>,
    memo: &mut HashMap<i64, usize>,
    visiting: &mut HashSet<i64>,
) -> Result<usize, LayoutError> {
    if let Some(&depth) = memo.get(&id) {
        return Ok(depth);
    }
    if !visiting.insert(id) {
        return Err(LayoutError::ParentCycle(id));
    }

    let mut depth = 0;
    if let Some(kids) = children.get(&Some(id)) {
        for kid in kids {
            let kid_depth = max_descendant_depth(kid.id.unwrap(), children, memo, visiting)?;
            depth = depth.max(kid_depth + 1);
        }
    }

    visiting.remove(&id);
    memo.insert(id, depth);
    Ok(depth)
}

/// Share of an entry's band its own content keeps, by descendant depth.
fn content_share(max_descendant_depth: usize) -> f32 {
    match max_descendant_depth {
        0 => 100.0,
        1 => 50.0,
        _ => 100.0 / 3.0,
    }
}

fn vertical_extent(entry: &Entry, grid: &TimeGrid) -> (f32, f32) {
    if grid.is_degenerate() {
        return (0.0, 0.0);
    }
    let start = grid.time_to_minutes(entry.start_time);
    let end = grid.time_to_minutes(entry.end_time);
    let top = grid.minutes_to_pixels(start);
    let height = ((end - start).max(0) as f32 * grid.pixels_per_minute())
        .max(MIN_BLOCK_HEIGHT_PX);
    (top, height)
}

fn place_children(
    parent_id: Option<i64>,
    band: Band,
    grid: &TimeGrid,
    by_id: &HashMap<i64, &Entry>,
    children: &HashMap<Option<i64>, Vec<&Entry>>,
    depths: &HashMap<i64, usize>,
    out: &mut Vec<EntryLayout>,
) {
    let siblings = match children.get(&parent_id) {
        Some(siblings) => siblings,
        None => return,
    };

    let items: Vec<PackItem> = siblings
        .iter()
        .map(|e| {
            PackItem::new(
                e.id.unwrap(),
                grid.time_to_minutes(e.start_time),
                grid.time_to_minutes(e.end_time),
            )
        })
        .collect();

    for packed in pack_columns(&items) {
        let entry = by_id[&packed.id];
        let own_band = band.slice(packed.left_pct(), packed.width_pct());
        let depth = depths[&packed.id];
        let content_pct = content_share(depth);
        let (top, height) = vertical_extent(entry, grid);

        out.push(EntryLayout {
            entry_id: packed.id,
            top,
            height,
            left_pct: own_band.left_pct,
            width_pct: own_band.width_pct,
            content_pct,
        });

        if depth > 0 {
            let descendant_band = own_band.slice(content_pct, 100.0 - content_pct);
            place_children(
                Some(packed.id),
                descendant_band,
                grid,
                by_id,
                children,
                depths,
                out,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::ScheduleSettings;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn grid() -> TimeGrid {
        TimeGrid::new(&ScheduleSettings::default(), 1080.0)
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn entry(id: i64, start: NaiveTime, end: NaiveTime, parent_id: Option<i64>) -> Entry {
        let mut e = Entry::new(
            format!("entry-{}", id),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            start,
            end,
        )
        .unwrap();
        e.id = Some(id);
        e.parent_id = parent_id;
        e
    }

    fn find(layouts: &[EntryLayout], id: i64) -> EntryLayout {
        layouts.iter().find(|l| l.entry_id == id).unwrap().clone()
    }

    #[test]
    fn test_single_root_fills_band() {
        let entries = vec![entry(1, t(9, 0), t(10, 0), None)];
        let layouts = layout_entries(&entries, &grid(), Band::FULL_ROW).unwrap();

        let l = find(&layouts, 1);
        assert_eq!(l.left_pct, 0.0);
        assert_eq!(l.width_pct, 100.0);
        assert_eq!(l.content_pct, 100.0);
        assert_eq!(l.top, 120.0); // 09:00 is 2h into a 07:00 window at 1px/min
        assert_eq!(l.height, 60.0);
    }

    #[test]
    fn test_depth_one_parent_splits_band_in_half() {
        let entries = vec![
            entry(1, t(9, 0), t(12, 0), None),
            entry(2, t(9, 30), t(10, 30), Some(1)),
        ];
        let layouts = layout_entries(&entries, &grid(), Band::FULL_ROW).unwrap();

        let parent = find(&layouts, 1);
        let child = find(&layouts, 2);
        assert_eq!(parent.content_pct, 50.0);
        assert_eq!(child.content_pct, 100.0);
        // Child band is the right half of the parent's band
        assert_eq!(child.left_pct, 50.0);
        assert_eq!(child.width_pct, 50.0);
    }

    #[test]
    fn test_depth_two_parent_keeps_a_third() {
        let entries = vec![
            entry(1, t(9, 0), t(12, 0), None),
            entry(2, t(9, 30), t(11, 0), Some(1)),
            entry(3, t(10, 0), t(10, 30), Some(2)),
        ];
        let layouts = layout_entries(&entries, &grid(), Band::FULL_ROW).unwrap();

        let root = find(&layouts, 1);
        let mid = find(&layouts, 2);
        let leaf = find(&layouts, 3);

        assert!((root.content_pct - 100.0 / 3.0).abs() < 1e-4);
        assert_eq!(mid.content_pct, 50.0);
        assert_eq!(leaf.content_pct, 100.0);

        // The middle entry owns the remaining ~66.7% band inherited from the root
        assert!((mid.left_pct - 100.0 / 3.0).abs() < 1e-3);
        assert!((mid.width_pct - 200.0 / 3.0).abs() < 1e-3);

        // The leaf sits in the right half of the middle entry's band
        assert!((leaf.left_pct - (100.0 / 3.0 + 100.0 / 3.0)).abs() < 1e-3);
        assert!((leaf.width_pct - 100.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_overlapping_roots_share_row() {
        let entries = vec![
            entry(1, t(9, 0), t(10, 0), None),
            entry(2, t(9, 30), t(11, 0), None),
        ];
        let layouts = layout_entries(&entries, &grid(), Band::FULL_ROW).unwrap();

        let a = find(&layouts, 1);
        let b = find(&layouts, 2);
        assert_eq!(a.width_pct, 50.0);
        assert_eq!(b.width_pct, 50.0);
        assert_eq!(a.left_pct, 0.0);
        assert_eq!(b.left_pct, 50.0);
    }

    #[test]
    fn test_layout_stays_within_full_row() {
        let entries = vec![
            entry(1, t(9, 0), t(12, 0), None),
            entry(2, t(9, 0), t(11, 0), None),
            entry(3, t(9, 30), t(10, 30), Some(1)),
            entry(4, t(10, 0), t(10, 30), Some(3)),
        ];
        let layouts = layout_entries(&entries, &grid(), Band::FULL_ROW).unwrap();

        for layout in &layouts {
            assert!(layout.left_pct >= -1e-3);
            assert!(layout.left_pct + layout.width_pct <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn test_milestone_gets_minimum_height() {
        let entries = vec![entry(1, t(9, 0), t(9, 0), None)];
        let layouts = layout_entries(&entries, &grid(), Band::FULL_ROW).unwrap();

        assert_eq!(find(&layouts, 1).height, MIN_BLOCK_HEIGHT_PX);
    }

    #[test]
    fn test_degenerate_window_yields_zero_heights() {
        let settings = ScheduleSettings {
            day_start_hour: 9,
            day_end_hour: 9,
            ..Default::default()
        };
        let degenerate = TimeGrid::new(&settings, 1080.0);
        let entries = vec![entry(1, t(9, 0), t(10, 0), None)];
        let layouts = layout_entries(&entries, &degenerate, Band::FULL_ROW).unwrap();

        let l = find(&layouts, 1);
        assert_eq!(l.top, 0.0);
        assert_eq!(l.height, 0.0);
    }

    #[test]
    fn test_cycle_is_detected() {
        let mut a = entry(1, t(9, 0), t(10, 0), Some(2));
        let mut b = entry(2, t(9, 0), t(10, 0), Some(1));
        a.depth = 1;
        b.depth = 1;

        let result = layout_entries(&[a, b], &grid(), Band::FULL_ROW);
        assert!(matches!(result, Err(LayoutError::ParentCycle(_))));
    }

    #[test]
    fn test_missing_parent_is_detected() {
        let entries = vec![entry(1, t(9, 0), t(10, 0), Some(99))];
        let result = layout_entries(&entries, &grid(), Band::FULL_ROW);
        assert_eq!(
            result,
            Err(LayoutError::MissingParent {
                id: 1,
                parent_id: 99
            })
        );
    }

    #[test]
    fn test_flat_fallback_ignores_parent_links() {
        let entries = vec![
            entry(1, t(9, 0), t(10, 0), Some(99)),
            entry(2, t(9, 30), t(10, 30), None),
        ];
        let layouts = layout_entries_flat(&entries, &grid(), Band::FULL_ROW);

        assert_eq!(layouts.len(), 2);
        for layout in &layouts {
            assert_eq!(layout.content_pct, 100.0);
            assert_eq!(layout.width_pct, 50.0);
        }
    }

    #[test]
    fn test_unsaved_entries_are_skipped() {
        let mut draft = entry(0, t(9, 0), t(10, 0), None);
        draft.id = None;
        let entries = vec![draft, entry(2, t(11, 0), t(12, 0), None)];
        let layouts = layout_entries(&entries, &grid(), Band::FULL_ROW).unwrap();

        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].entry_id, 2);
    }
}
