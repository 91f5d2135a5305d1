//! Cursor pipeline: raw telemetry in, smoothed normalized samples out.
//!
//! The pipeline normalizes pointer positions against the captured screen,
//! applies first-order exponential smoothing, and exposes time-indexed
//! lookups plus the click-pulse scaling signal the renderer draws with.

pub mod pipeline;
pub mod pulse;

pub use pipeline::{CursorSample, CursorTrack};
pub use pulse::{click_pulse_scale, CLICK_PULSE_DOWN_MS, CLICK_PULSE_MIN_SCALE, CLICK_PULSE_TOTAL_MS};
