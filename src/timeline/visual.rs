//! Visual bounds of a segment bar.
//!
//! The editor shows where the camera actually moves, which the spring
//! stretches past the raw `[startTs, endTs]` range. The bar is derived
//! from the integrated track: find the peak zoom inside the segment, then
//! extend in both directions while the track is still visually active.

use crate::geometry::ZOOM_EPSILON;
use crate::models::project::ZoomSegment;
use crate::rendering::track::CameraTrack;

/// How far past the segment end the bar may run to show the
/// return-to-free-roam tail, ms.
pub const TIMELINE_VISUAL_RETURN_TAIL_MS: u64 = 200;

/// Minimum sample-to-sample rect movement that still counts as "visually
/// active".
const ACTIVE_DELTA: f64 = 5e-5;

/// Visible `[start, end]` of a segment bar on the timeline.
pub fn visual_bounds(track: &CameraTrack, segment: &ZoomSegment) -> (u64, u64) {
    let samples = track.samples();
    let hard_end = segment
        .end_ts
        .saturating_add(TIMELINE_VISUAL_RETURN_TAIL_MS)
        .min(track.duration_ms());

    let nominal_end = segment.end_ts.min(hard_end);
    if samples.is_empty() {
        return (segment.start_ts, nominal_end);
    }

    let start = segment.start_ts as f64;
    let end = segment.end_ts as f64;

    // Peak zoom inside the segment's nominal range.
    let mut peak_idx = None;
    let mut peak_zoom = 0.0f64;
    for (idx, sample) in samples.iter().enumerate() {
        if sample.ts < start || sample.ts > end {
            continue;
        }
        let zoom = sample.rect.zoom_strength();
        if zoom > peak_zoom {
            peak_zoom = zoom;
            peak_idx = Some(idx);
        }
    }

    let Some(peak_idx) = peak_idx else {
        return (segment.start_ts, nominal_end);
    };

    let mut first_active = peak_idx;
    while first_active > 0 && is_active(samples, first_active - 1) {
        first_active -= 1;
    }
    let mut last_active = peak_idx;
    while last_active + 1 < samples.len() && is_active(samples, last_active + 1) {
        last_active += 1;
    }

    // Manual bars stay responsive: never start later than the nominal
    // start, and never run past the capped return tail.
    let detected_start = samples[first_active].ts.round().max(0.0) as u64;
    let detected_end = samples[last_active].ts.round() as u64;

    (
        detected_start.min(segment.start_ts),
        detected_end.clamp(nominal_end, hard_end),
    )
}

fn is_active(samples: &[crate::rendering::track::CameraSample], idx: usize) -> bool {
    let sample = &samples[idx];
    if sample.rect.zoom_strength() > 1.0 + ZOOM_EPSILON {
        return true;
    }
    idx > 0 && sample.rect.delta(&samples[idx - 1].rect) > ACTIVE_DELTA
}
