//! Follow-cursor target generation.
//!
//! Inside a follow segment the viewport center trails the smoothed cursor
//! under dead-zone / hard-edge discipline: inside the dead zone the
//! camera holds still, between the bands it pans proportionally, past the
//! hard edge it pans at full speed. Rect size and aspect come from the
//! focus timeline and are not modulated by the cursor.

use crate::cursor::CursorTrack;
use crate::geometry::{clamp_center, NormalizedRect};
use crate::models::project::TargetPoint;

use super::config::SmartCameraConfig;

/// A coarse focus step recorded by the state machine: from `ts` on, frame
/// `rect` (until the next entry).
#[derive(Debug, Clone, Copy)]
pub struct FocusStep {
    pub ts: u64,
    pub rect: NormalizedRect,
}

/// Generate the dense target points of one follow segment.
///
/// Points are spaced `follow_sample_step_ms` apart from `start_ts` to
/// `end_ts` inclusive. A focus step (retarget or scroll shift) re-seats
/// the rect size and recenters the follow center at its timestamp;
/// between steps only the center moves, and it is always clamped so the
/// viewport stays inside the frame.
pub fn generate_target_points(
    focus_timeline: &[FocusStep],
    start_ts: u64,
    end_ts: u64,
    cursor: &CursorTrack,
    screen_width: u32,
    screen_height: u32,
    config: &SmartCameraConfig,
) -> Vec<TargetPoint> {
    if end_ts <= start_ts || focus_timeline.is_empty() {
        return Vec::new();
    }

    let step_ms = config.follow_sample_step_ms.max(1);
    let width = screen_width.max(1) as f64;
    let height = screen_height.max(1) as f64;
    let max_speed_x = config.follow_max_speed_px_per_s.max(0.0) / width;
    let max_speed_y = config.follow_max_speed_px_per_s.max(0.0) / height;

    let mut rect = focus_timeline[0].rect;
    let (mut cx, mut cy) = rect.center();
    let mut focus_idx = 0usize;

    let mut points = Vec::with_capacity(((end_ts - start_ts) / step_ms + 2) as usize);
    let mut ts = start_ts;
    let mut prev_ts = start_ts;

    loop {
        // Advance through focus steps that became active; the newest one
        // wins and recenters the camera.
        let mut reseated = false;
        while focus_idx + 1 < focus_timeline.len() && focus_timeline[focus_idx + 1].ts <= ts {
            focus_idx += 1;
            reseated = true;
        }
        if reseated {
            rect = focus_timeline[focus_idx].rect;
            let center = rect.center();
            cx = center.0;
            cy = center.1;
        }

        let dt_s = ts.saturating_sub(prev_ts) as f64 / 1_000.0;
        if dt_s > 0.0 && !cursor.is_empty() {
            let (cursor_x, cursor_y) = cursor.position_at(ts);
            let dead_x = 0.5 * rect.width * config.follow_dead_ratio;
            let dead_y = 0.5 * rect.height * config.follow_dead_ratio;
            let hard_x = 0.5 * rect.width * config.follow_hard_ratio;
            let hard_y = 0.5 * rect.height * config.follow_hard_ratio;

            cx += axis_step(cursor_x - cx, dead_x, hard_x, max_speed_x, dt_s);
            cy += axis_step(cursor_y - cy, dead_y, hard_y, max_speed_y, dt_s);
        }

        let clamped = clamp_center(cx, cy, rect.width, rect.height);
        cx = clamped.0;
        cy = clamped.1;

        points.push(TargetPoint {
            ts,
            rect: NormalizedRect::from_center(cx, cy, rect.width, rect.height),
        });

        if ts >= end_ts {
            break;
        }
        prev_ts = ts;
        ts = ts.saturating_add(step_ms).min(end_ts);
    }

    points
}

/// Movement of one axis over `dt_s`: zero inside the dead zone, ramping
/// up to full speed at the hard edge.
fn axis_step(offset: f64, dead: f64, hard: f64, max_speed: f64, dt_s: f64) -> f64 {
    if offset.abs() <= dead {
        return 0.0;
    }
    let band = (hard - dead).max(1e-6);
    let ratio = ((offset.abs() - dead) / band).clamp(0.0, 1.0);
    offset.signum() * max_speed * ratio * dt_s
}
