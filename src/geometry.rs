//! Normalized viewport geometry.
//!
//! Everything the camera produces is a `NormalizedRect` over the source
//! frame: `{x, y, width, height}` in `[0, 1]`. Zoom strength is defined as
//! `1 / max(width, height)`, so a half-size viewport is a 2x zoom.

use serde::{Deserialize, Serialize};

/// Smallest legal viewport side. Keeps `1 / max(w, h)` bounded.
pub const MIN_RECT_SIZE: f64 = 0.05;

/// Zoom levels within `1 + ZOOM_EPSILON` of 1.0 count as "not zoomed".
pub const ZOOM_EPSILON: f64 = 1e-3;

/// Containment tolerance for safe-zone tests.
const CONTAINS_EPS: f64 = 1e-6;

/// Rectangular region in normalized source coordinates (0.0-1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for NormalizedRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl NormalizedRect {
    /// The whole source frame.
    pub const FULL: NormalizedRect = NormalizedRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }.clamped()
    }

    /// Build a rect from its center point, clamped into the unit square.
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        let width = width.clamp(MIN_RECT_SIZE, 1.0);
        let height = height.clamp(MIN_RECT_SIZE, 1.0);
        NormalizedRect {
            x: (cx - width * 0.5).clamp(0.0, 1.0 - width),
            y: (cy - height * 0.5).clamp(0.0, 1.0 - height),
            width,
            height,
        }
    }

    /// Enforce the size and bounds invariants, preserving the center where
    /// the size had to grow.
    pub fn clamped(self) -> Self {
        let width = if self.width.is_finite() {
            self.width.clamp(MIN_RECT_SIZE, 1.0)
        } else {
            1.0
        };
        let height = if self.height.is_finite() {
            self.height.clamp(MIN_RECT_SIZE, 1.0)
        } else {
            1.0
        };
        let raw_cx = self.x + self.width * 0.5;
        let raw_cy = self.y + self.height * 0.5;
        let cx = if raw_cx.is_finite() { raw_cx } else { 0.5 };
        let cy = if raw_cy.is_finite() { raw_cy } else { 0.5 };
        NormalizedRect {
            x: (cx - width * 0.5).clamp(0.0, 1.0 - width),
            y: (cy - height * 0.5).clamp(0.0, 1.0 - height),
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Zoom strength of this viewport: `1 / max(width, height)`.
    pub fn zoom_strength(&self) -> f64 {
        1.0 / self.width.max(self.height).max(MIN_RECT_SIZE)
    }

    /// True when the viewport is effectively the full frame.
    pub fn is_zoom_noop(&self) -> bool {
        self.zoom_strength() <= 1.0 + ZOOM_EPSILON
    }

    /// Shrink by `margin_ratio` of the size on each side. Used for the
    /// safe zone containment test.
    pub fn inset(&self, margin_ratio: f64) -> NormalizedRect {
        let ratio = margin_ratio.clamp(0.0, 0.49);
        let inset_x = self.width * ratio;
        let inset_y = self.height * ratio;
        NormalizedRect {
            x: self.x + inset_x,
            y: self.y + inset_y,
            width: (self.width - inset_x * 2.0).max(1e-4),
            height: (self.height - inset_y * 2.0).max(1e-4),
        }
    }

    /// True when `other` lies entirely inside this rect.
    pub fn contains(&self, other: &NormalizedRect) -> bool {
        other.x >= self.x - CONTAINS_EPS
            && other.y >= self.y - CONTAINS_EPS
            && other.right() <= self.right() + CONTAINS_EPS
            && other.bottom() <= self.bottom() + CONTAINS_EPS
    }

    /// Linear interpolation toward `other`.
    pub fn lerp(&self, other: &NormalizedRect, t: f64) -> NormalizedRect {
        let t = t.clamp(0.0, 1.0);
        NormalizedRect {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            width: self.width + (other.width - self.width) * t,
            height: self.height + (other.height - self.height) * t,
        }
    }

    /// Largest absolute coordinate difference against `other`. Drives the
    /// "visually active" test for timeline bounds.
    pub fn delta(&self, other: &NormalizedRect) -> f64 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.width - other.width).abs())
            .max((self.height - other.height).abs())
    }

    /// True when every invariant of the schema holds without clamping.
    pub fn is_valid(&self) -> bool {
        self.width >= MIN_RECT_SIZE - CONTAINS_EPS
            && self.height >= MIN_RECT_SIZE - CONTAINS_EPS
            && self.width <= 1.0 + CONTAINS_EPS
            && self.height <= 1.0 + CONTAINS_EPS
            && self.x >= -CONTAINS_EPS
            && self.y >= -CONTAINS_EPS
            && self.right() <= 1.0 + CONTAINS_EPS
            && self.bottom() <= 1.0 + CONTAINS_EPS
    }
}

/// Aspect-locked viewport dimensions for a given zoom strength.
///
/// The returned `(width, height)` are normalized to the source frame and
/// chosen so the viewport's pixel aspect matches `output_aspect`. Width is
/// locked to `1 / zoom`; if the matching height would overflow the frame,
/// height is locked instead.
pub fn viewport_size_for_zoom(
    zoom: f64,
    screen_width: u32,
    screen_height: u32,
    output_aspect: f64,
) -> (f64, f64) {
    let safe_zoom = zoom.max(1.0);
    let screen_aspect = screen_width.max(1) as f64 / screen_height.max(1) as f64;
    let safe_output_aspect = output_aspect.max(0.1);

    let mut width = 1.0 / safe_zoom;
    let mut height = (width * screen_aspect) / safe_output_aspect;

    if height > 1.0 {
        height = 1.0 / safe_zoom;
        width = (height * safe_output_aspect) / screen_aspect.max(0.1);
    }

    (
        width.clamp(MIN_RECT_SIZE, 1.0),
        height.clamp(MIN_RECT_SIZE, 1.0),
    )
}

/// Clamp a viewport center so a rect of the given size stays inside the
/// unit square.
pub fn clamp_center(cx: f64, cy: f64, width: f64, height: f64) -> (f64, f64) {
    let half_w = (width * 0.5).clamp(0.0, 0.5);
    let half_h = (height * 0.5).clamp(0.0, 0.5);
    (
        cx.clamp(half_w, 1.0 - half_w),
        cy.clamp(half_h, 1.0 - half_h),
    )
}
