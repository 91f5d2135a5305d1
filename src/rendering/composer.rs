//! Per-frame viewport and cursor transform.
//!
//! The composer is the one place both the live preview and the export
//! driver ask "what does frame t look like". It owns no pixels: it maps a
//! timestamp to a frame transform and a cursor placement, sampling the
//! same camera track and cursor track on both paths so they can never
//! disagree.

use std::sync::Arc;

use crate::cursor::{click_pulse_scale, CursorTrack};
use crate::geometry::NormalizedRect;

use super::track::CameraTrack;

/// Cursor sampling lead over the frame clock, ms. Compensates for video
/// decode lag so the drawn cursor lines up with on-screen interaction.
pub const CURSOR_TIMING_OFFSET_MS: f64 = 45.0;

/// Base cursor height as a fraction of the shorter output side.
pub const CURSOR_SIZE_TO_FRAME_RATIO: f64 = 0.03;

/// Base cursor height clamp, output pixels.
pub const CURSOR_MIN_PX: f64 = 8.0;
pub const CURSOR_MAX_PX: f64 = 280.0;

/// The cursor never shrinks below this fraction of the camera scale.
pub const CURSOR_ZOOM_FLOOR: f64 = 0.25;

/// Affine frame transform in normalized output coordinates:
/// `out = src * scale + offset`, with both axes sharing one scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl FrameTransform {
    /// Transform for a viewport rect: scale by the zoom strength and
    /// translate so the rect center lands on the frame center.
    pub fn for_viewport(rect: &NormalizedRect) -> FrameTransform {
        let scale = 1.0 / rect.width.max(rect.height).max(1e-6);
        let (cx, cy) = rect.center();
        FrameTransform {
            scale,
            offset_x: 0.5 - cx * scale,
            offset_y: 0.5 - cy * scale,
        }
    }

    /// Map a normalized source point into output pixels.
    pub fn apply(&self, nx: f64, ny: f64, frame_width: u32, frame_height: u32) -> (f64, f64) {
        (
            (nx * self.scale + self.offset_x) * frame_width as f64,
            (ny * self.scale + self.offset_y) * frame_height as f64,
        )
    }

    /// Map an output pixel back to a normalized source point.
    pub fn invert(&self, px: f64, py: f64, frame_width: u32, frame_height: u32) -> (f64, f64) {
        (
            (px / frame_width as f64 - self.offset_x) / self.scale,
            (py / frame_height as f64 - self.offset_y) / self.scale,
        )
    }
}

/// Where and how large the cursor is drawn on one frame. The position is
/// the tip; the pulse and zoom factors are already folded into
/// `height_px`.
#[derive(Debug, Clone, Copy)]
pub struct CursorPlacement {
    pub x: f64,
    pub y: f64,
    pub height_px: f64,
    pub pulse_scale: f64,
}

/// Everything the renderer needs for one output frame.
#[derive(Debug, Clone, Copy)]
pub struct ComposedFrame {
    pub timeline_ts_ms: f64,
    pub rect: NormalizedRect,
    pub transform: FrameTransform,
    pub cursor: CursorPlacement,
}

/// Immutable per-session frame composer.
#[derive(Clone)]
pub struct FrameComposer {
    track: Arc<CameraTrack>,
    cursor: Arc<CursorTrack>,
    click_times: Arc<Vec<u64>>,
    /// Recorded (project) duration driving the timeline clock.
    timeline_duration_ms: u64,
    /// Decoded media duration; may disagree slightly with the timeline.
    media_duration_ms: u64,
    frame_width: u32,
    frame_height: u32,
    cursor_size: f64,
}

impl FrameComposer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        track: Arc<CameraTrack>,
        cursor: Arc<CursorTrack>,
        click_times: Arc<Vec<u64>>,
        timeline_duration_ms: u64,
        media_duration_ms: u64,
        frame_width: u32,
        frame_height: u32,
        cursor_size: f64,
    ) -> FrameComposer {
        FrameComposer {
            track,
            cursor,
            click_times,
            timeline_duration_ms: timeline_duration_ms.max(1),
            media_duration_ms: media_duration_ms.max(1),
            frame_width: frame_width.max(2),
            frame_height: frame_height.max(2),
            cursor_size,
        }
    }

    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    pub fn timeline_duration_ms(&self) -> u64 {
        self.timeline_duration_ms
    }

    /// Map a media (decoded video) timestamp onto the timeline clock.
    pub fn media_to_timeline(&self, media_ts_ms: f64) -> f64 {
        media_ts_ms * self.timeline_duration_ms as f64 / self.media_duration_ms as f64
    }

    /// Map a timeline timestamp onto the media clock.
    pub fn timeline_to_media(&self, timeline_ts_ms: f64) -> f64 {
        timeline_ts_ms * self.media_duration_ms as f64 / self.timeline_duration_ms as f64
    }

    /// Compose the frame at a timeline timestamp.
    pub fn sample(&self, timeline_ts_ms: f64) -> ComposedFrame {
        let rect = self.track.sample_at(timeline_ts_ms);
        let transform = FrameTransform::for_viewport(&rect);

        let cursor_ts = timeline_ts_ms + CURSOR_TIMING_OFFSET_MS;
        let (cursor_nx, cursor_ny) = self.cursor.position_at(cursor_ts.max(0.0).round() as u64);
        let (cursor_x, cursor_y) =
            transform.apply(cursor_nx, cursor_ny, self.frame_width, self.frame_height);

        let base_height = (self.cursor_size
            * self.frame_width.min(self.frame_height) as f64
            * CURSOR_SIZE_TO_FRAME_RATIO)
            .clamp(CURSOR_MIN_PX, CURSOR_MAX_PX);
        let pulse = click_pulse_scale(&self.click_times, cursor_ts.max(0.0).round() as u64);
        let height_px = base_height * pulse * transform.scale.max(CURSOR_ZOOM_FLOOR);

        ComposedFrame {
            timeline_ts_ms,
            rect,
            transform,
            cursor: CursorPlacement {
                x: cursor_x,
                y: cursor_y,
                height_px,
                pulse_scale: pulse,
            },
        }
    }

    /// Compose the frame for a media timestamp (the preview path).
    pub fn sample_media(&self, media_ts_ms: f64) -> ComposedFrame {
        self.sample(self.media_to_timeline(media_ts_ms))
    }
}
