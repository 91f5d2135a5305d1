//! Semantic focus: turning a click cluster into a framed viewport.
//!
//! A cluster with UI context frames the control it hit: pad the bounding
//! rect, lock it to the output aspect, clamp the zoom. A cluster without
//! context frames the click point at the fallback zoom.

use crate::engine::cluster::FocusCluster;
use crate::geometry::{clamp_center, viewport_size_for_zoom, NormalizedRect};

use super::config::SmartCameraConfig;

/// The aspect-locked, padded, zoom-clamped viewport for a cluster.
pub fn semantic_focus(
    cluster: &FocusCluster,
    screen_width: u32,
    screen_height: u32,
    output_aspect: f64,
    config: &SmartCameraConfig,
) -> NormalizedRect {
    let width = screen_width.max(1) as f64;
    let height = screen_height.max(1) as f64;

    let Some(bounds) = cluster.bounds else {
        return fallback_focus(
            cluster.anchor_x / width,
            cluster.anchor_y / height,
            screen_width,
            screen_height,
            output_aspect,
            config,
        );
    };

    let (center_px_x, center_px_y) = bounds.center();
    let center = (
        (center_px_x / width).clamp(0.0, 1.0),
        (center_px_y / height).clamp(0.0, 1.0),
    );

    let mut rect_w = (bounds.width / width).clamp(0.0, 1.0);
    let mut rect_h = (bounds.height / height).clamp(0.0, 1.0);
    if rect_w <= 0.0 || rect_h <= 0.0 {
        return fallback_focus(
            center.0,
            center.1,
            screen_width,
            screen_height,
            output_aspect,
            config,
        );
    }

    // Pad by a fraction of the longer side on each axis.
    let pad = rect_w.max(rect_h) * config.semantic_pad.max(0.0);
    rect_w = (rect_w + pad * 2.0).min(1.0);
    rect_h = (rect_h + pad * 2.0).min(1.0);

    // Aspect-lock: expand the shorter axis until the viewport's pixel
    // aspect equals the output aspect. Only ever expands, so the padded
    // region stays inside; near full frame the unit square caps the
    // expansion and the zoom is a no-op anyway.
    let screen_aspect = width / height;
    let target_ratio = (output_aspect.max(0.1)) / screen_aspect.max(0.1);
    if rect_w / rect_h < target_ratio {
        rect_w = (rect_h * target_ratio).min(1.0);
    } else {
        rect_h = (rect_w / target_ratio).min(1.0);
    }

    let zoom = 1.0 / rect_w.max(rect_h).max(1e-4);
    if zoom > config.max_zoom {
        // Clamped: recompute at the ceiling, centered on the original
        // focus.
        let (clamped_w, clamped_h) = viewport_size_for_zoom(
            config.max_zoom,
            screen_width,
            screen_height,
            output_aspect,
        );
        let (cx, cy) = clamp_center(center.0, center.1, clamped_w, clamped_h);
        return NormalizedRect::from_center(cx, cy, clamped_w, clamped_h);
    }

    let (cx, cy) = clamp_center(center.0, center.1, rect_w, rect_h);
    NormalizedRect::from_center(cx, cy, rect_w, rect_h)
}

/// Click-centered viewport at the fallback zoom, for clicks the UI probe
/// could not resolve. Missing context is expected, not an error.
fn fallback_focus(
    center_x: f64,
    center_y: f64,
    screen_width: u32,
    screen_height: u32,
    output_aspect: f64,
    config: &SmartCameraConfig,
) -> NormalizedRect {
    let (width, height) = viewport_size_for_zoom(
        config.fallback_zoom.max(1.0),
        screen_width,
        screen_height,
        output_aspect,
    );
    let (cx, cy) = clamp_center(
        center_x.clamp(0.0, 1.0),
        center_y.clamp(0.0, 1.0),
        width,
        height,
    );
    NormalizedRect::from_center(cx, cy, width, height)
}

/// Safe-zone containment test for a cluster's raw footprint.
///
/// Uses the unpadded bounds (or the click point when there are none):
/// the question is "is the thing the user clicked already framed", not
/// "would the new viewport match".
pub fn footprint_contained(
    safe_zone: &NormalizedRect,
    cluster: &FocusCluster,
    screen_width: u32,
    screen_height: u32,
) -> bool {
    let width = screen_width.max(1) as f64;
    let height = screen_height.max(1) as f64;
    let eps = 1e-6;

    let (left, top, right, bottom) = match cluster.bounds {
        Some(bounds) => (
            (bounds.x / width).clamp(0.0, 1.0),
            (bounds.y / height).clamp(0.0, 1.0),
            ((bounds.x + bounds.width) / width).clamp(0.0, 1.0),
            ((bounds.y + bounds.height) / height).clamp(0.0, 1.0),
        ),
        None => {
            let px = (cluster.anchor_x / width).clamp(0.0, 1.0);
            let py = (cluster.anchor_y / height).clamp(0.0, 1.0);
            (px, py, px, py)
        }
    };

    left >= safe_zone.x - eps
        && top >= safe_zone.y - eps
        && right <= safe_zone.right() + eps
        && bottom <= safe_zone.bottom() + eps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cluster::PixelRect;

    fn cluster_with_bounds(x: f64, y: f64, bounds: Option<PixelRect>) -> FocusCluster {
        FocusCluster {
            start_ts: 1_000,
            end_ts: 1_000,
            anchor_x: x,
            anchor_y: y,
            bounds,
            click_count: 1,
        }
    }

    #[test]
    fn fallback_focus_is_exactly_two_x_centered_on_click() {
        let cluster = cluster_with_bounds(960.0, 540.0, None);
        let config = SmartCameraConfig::default();
        let rect = semantic_focus(&cluster, 1_920, 1_080, 16.0 / 9.0, &config);

        assert!((rect.zoom_strength() - 2.0).abs() < 1e-9);
        let (cx, cy) = rect.center();
        assert!((cx - 0.5).abs() < 1e-9);
        assert!((cy - 0.5).abs() < 1e-9);
    }

    #[test]
    fn small_control_clamps_to_max_zoom_near_its_center() {
        // A 200x100 control at (300, 250) on a 1920x1080 screen zooms
        // to the 2.0 ceiling around (0.2083, 0.2778).
        let cluster = cluster_with_bounds(
            400.0,
            300.0,
            Some(PixelRect {
                x: 300.0,
                y: 250.0,
                width: 200.0,
                height: 100.0,
            }),
        );
        let config = SmartCameraConfig::default();
        let rect = semantic_focus(&cluster, 1_920, 1_080, 16.0 / 9.0, &config);

        assert!(rect.zoom_strength() <= 2.0 + 1e-9);
        assert!((rect.zoom_strength() - 2.0).abs() < 1e-6);
        let (cx, cy) = rect.center();
        assert!((cx - 0.2083).abs() < 0.06, "center x {cx} too far from focus");
        assert!((cy - 0.2778).abs() < 0.06, "center y {cy} too far from focus");
        // Aspect lock: equal normalized sides on a 16:9 screen with 16:9
        // output.
        assert!((rect.width - rect.height).abs() < 1e-9);
    }

    #[test]
    fn large_panel_keeps_mild_zoom_with_padding() {
        let cluster = cluster_with_bounds(
            960.0,
            540.0,
            Some(PixelRect {
                x: 260.0,
                y: 140.0,
                width: 1_400.0,
                height: 800.0,
            }),
        );
        let config = SmartCameraConfig::default();
        let rect = semantic_focus(&cluster, 1_920, 1_080, 16.0 / 9.0, &config);

        let zoom = rect.zoom_strength();
        assert!(zoom > 1.0 && zoom < 2.0, "expected mild zoom, got {zoom}");
        // Padded beyond the raw footprint.
        assert!(rect.width > 1_400.0 / 1_920.0);
    }

    #[test]
    fn aspect_lock_expands_shorter_axis() {
        // A wide flat toolbar: height must grow to meet 16:9.
        let cluster = cluster_with_bounds(
            960.0,
            60.0,
            Some(PixelRect {
                x: 0.0,
                y: 30.0,
                width: 1_800.0,
                height: 60.0,
            }),
        );
        let config = SmartCameraConfig::default();
        let rect = semantic_focus(&cluster, 1_920, 1_080, 16.0 / 9.0, &config);

        let pixel_aspect = (rect.width * 1_920.0) / (rect.height * 1_080.0);
        assert!((pixel_aspect - 16.0 / 9.0).abs() < 0.05);
        assert!(rect.is_valid());
    }

    #[test]
    fn footprint_containment_uses_raw_bounds() {
        let cluster = cluster_with_bounds(
            400.0,
            300.0,
            Some(PixelRect {
                x: 300.0,
                y: 250.0,
                width: 200.0,
                height: 100.0,
            }),
        );

        let framing = NormalizedRect::new(0.1, 0.15, 0.3, 0.3);
        assert!(footprint_contained(&framing, &cluster, 1_920, 1_080));

        let elsewhere = NormalizedRect::new(0.6, 0.6, 0.3, 0.3);
        assert!(!footprint_contained(&elsewhere, &cluster, 1_920, 1_080));
    }

    #[test]
    fn footprint_without_bounds_tests_the_click_point() {
        let cluster = cluster_with_bounds(960.0, 540.0, None);
        let around_center = NormalizedRect::from_center(0.5, 0.5, 0.2, 0.2);
        assert!(footprint_contained(&around_center, &cluster, 1_920, 1_080));

        let corner = NormalizedRect::new(0.0, 0.0, 0.2, 0.2);
        assert!(!footprint_contained(&corner, &cluster, 1_920, 1_080));
    }
}
