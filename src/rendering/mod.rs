//! Deterministic rendering core.
//!
//! Everything visible is synthesized from the project document: the
//! spring-integrated camera track, the per-frame transform composer, the
//! vector cursor, and the CPU compositor the export driver feeds the
//! encoder with. Preview and export share the same producers, which is
//! what guarantees their parity.
//!
//! ## Components
//! - `track`: spring integration of segment targets into a dense track
//! - `composer`: per-frame viewport transform and cursor placement
//! - `svg_cursor`: vector cursor rasterization
//! - `compositor`: CPU frame warp and cursor blending for export

pub mod composer;
pub mod compositor;
pub mod svg_cursor;
pub mod track;

pub use composer::{ComposedFrame, CursorPlacement, FrameComposer, FrameTransform};
pub use compositor::compose_frame;
pub use svg_cursor::{cursor_at_height, render_cursor_to_height, RenderedCursor};
pub use track::{CameraSample, CameraTrack, PREVIEW_FPS};
