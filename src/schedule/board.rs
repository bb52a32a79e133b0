// Board layout
// Splits the row into section lanes and lays out each lane's entry tree

use std::collections::{HashMap, HashSet};

use super::allocator::{layout_entries, layout_entries_flat, Band, EntryLayout};
use super::time_grid::TimeGrid;
use crate::models::entry::Entry;
use crate::models::section::Section;

/// One lane band on the board. Lanes are equal-width, in section display
/// order, with the synthetic uncategorized lane last.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneBand {
    /// `None` is the uncategorized lane.
    pub section_id: Option<i64>,
    pub name: String,
    pub color: Option<String>,
    pub left_pct: f32,
    pub width_pct: f32,
}

impl LaneBand {
    pub fn band(&self) -> Band {
        Band {
            left_pct: self.left_pct,
            width_pct: self.width_pct,
        }
    }

    pub fn contains_fraction(&self, x_fraction: f32) -> bool {
        let x = x_fraction * 100.0;
        x >= self.left_pct && x < self.left_pct + self.width_pct
    }
}

/// The full layout of one day: lane bands plus per-entry geometry.
///
/// A pure function of (entry set, sections, grid); recomputed wholesale on
/// any input change, never patched incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub lanes: Vec<LaneBand>,
    pub entries: Vec<EntryLayout>,
}

impl BoardLayout {
    /// The lane under a horizontal position given as a 0..1 fraction of the
    /// row. Out-of-range positions clamp to the outermost lanes.
    pub fn lane_at(&self, x_fraction: f32) -> Option<&LaneBand> {
        if self.lanes.is_empty() {
            return None;
        }
        self.lanes
            .iter()
            .find(|lane| lane.contains_fraction(x_fraction))
            .or_else(|| {
                if x_fraction < 0.0 {
                    self.lanes.first()
                } else {
                    self.lanes.last()
                }
            })
    }

    pub fn layout_for(&self, entry_id: i64) -> Option<&EntryLayout> {
        self.entries.iter().find(|l| l.entry_id == entry_id)
    }
}

/// Compute the lane bands for the given sections (ordered by
/// `display_order`) plus the trailing uncategorized lane.
pub fn lane_bands(sections: &[Section]) -> Vec<LaneBand> {
    let mut ordered: Vec<&Section> = sections.iter().filter(|s| s.id.is_some()).collect();
    ordered.sort_by_key(|s| (s.display_order, s.id));

    let lane_count = ordered.len() + 1;
    let width = 100.0 / lane_count as f32;

    let mut lanes: Vec<LaneBand> = ordered
        .iter()
        .enumerate()
        .map(|(i, section)| LaneBand {
            section_id: section.id,
            name: section.name.clone(),
            color: Some(section.color.clone()),
            left_pct: i as f32 * width,
            width_pct: width,
        })
        .collect();

    lanes.push(LaneBand {
        section_id: None,
        name: "Uncategorized".to_string(),
        color: None,
        left_pct: (lane_count - 1) as f32 * width,
        width_pct: width,
    });

    lanes
}

/// Lay out a day's entries across the section lanes.
///
/// Entries are assigned to lanes by their root ancestor's section, so a
/// subtree always renders inside one lane. A lane whose subtree is
/// structurally broken (cycle, dangling parent) is degraded to a flat
/// unnested layout instead of failing the frame.
pub fn layout_board(entries: &[Entry], sections: &[Section], grid: &TimeGrid) -> BoardLayout {
    let lanes = lane_bands(sections);
    let mut out = Vec::with_capacity(entries.len());

    for lane in &lanes {
        let lane_entries = entries_for_lane(entries, lane.section_id);
        if lane_entries.is_empty() {
            continue;
        }

        match layout_entries(&lane_entries, grid, lane.band()) {
            Ok(mut layouts) => out.append(&mut layouts),
            Err(err) => {
                log::warn!(
                    "Structural error laying out lane {:?}: {}; rendering flat",
                    lane.section_id,
                    err
                );
                out.append(&mut layout_entries_flat(&lane_entries, grid, lane.band()));
            }
        }
    }

    BoardLayout { lanes, entries: out }
}

/// Entries whose root ancestor belongs to `section_id`, including their
/// whole subtrees. Children follow their parent's lane regardless of their
/// own section field; entries on a broken parent chain fall back to their
/// own section so they still render somewhere.
fn entries_for_lane(entries: &[Entry], section_id: Option<i64>) -> Vec<Entry> {
    let by_id: HashMap<i64, &Entry> = entries
        .iter()
        .filter_map(|e| e.id.map(|id| (id, e)))
        .collect();

    entries
        .iter()
        .filter(|entry| root_section(entry, &by_id) == section_id)
        .cloned()
        .collect()
}

fn root_section(entry: &Entry, by_id: &HashMap<i64, &Entry>) -> Option<i64> {
    let mut current = entry;
    let mut seen: HashSet<i64> = HashSet::new();
    while let Some(parent_id) = current.parent_id {
        if !seen.insert(parent_id) {
            // Cycle; let the allocator report it from whichever lane the
            // entry's own section puts it in
            break;
        }
        match by_id.get(&parent_id) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current.section_id
}
