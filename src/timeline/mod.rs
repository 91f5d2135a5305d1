//! Timeline maintenance: segment ordering, trimming, gap search and the
//! visual bounds the editor draws segment bars with.

pub mod segments;
pub mod visual;

pub use segments::{
    clamp_move, clamp_resize, commit_move, commit_resize, enforce_non_overlap,
    find_available_gap, neighbor_bounds, sort_segments, trim_auto_noop, ResizeEdge,
    MANUAL_SLOT_MS,
};
pub use visual::{visual_bounds, TIMELINE_VISUAL_RETURN_TAIL_MS};
