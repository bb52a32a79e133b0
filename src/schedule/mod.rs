//! Day-board layout and gesture engine.
//!
//! Pure, synchronous core: the time grid maps wall-clock times to pixels,
//! the packer and allocator turn a day's entries into non-overlapping
//! geometry, and the gesture controller interprets pointer drags against
//! that geometry. Persistence happens only at the commit seam.

pub mod allocator;
pub mod board;
pub mod commit;
pub mod gesture;
pub mod packer;
pub mod time_grid;

pub use allocator::{EntryLayout, LayoutError, MIN_BLOCK_HEIGHT_PX};
pub use board::{layout_board, BoardLayout, LaneBand};
pub use commit::{commit_drag, EntryStore};
pub use gesture::{
    BoardPos, DragKind, DragOutcome, DragSession, EntryPatch, EntrySnapshot, GestureController,
    ResizeEdge, DRAG_THRESHOLD_PX,
};
pub use time_grid::TimeGrid;
