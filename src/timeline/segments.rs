//! Zoom segment list operations.
//!
//! The timeline keeps segments strictly ordered and non-overlapping with a
//! 200 ms gap between neighbors. Edits are clamped before commit rather
//! than rejected, so dragging a bar can never violate an invariant.

use crate::geometry::NormalizedRect;
use crate::models::project::{TargetPoint, ZoomSegment, MIN_SEGMENT_GAP_MS, MIN_SEGMENT_MS};

/// Default length of a manually inserted segment, capped by the gap it
/// lands in.
pub const MANUAL_SLOT_MS: u64 = 1_600;

/// Which edge of a segment a resize grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

/// Sort segments by start time.
pub fn sort_segments(segments: &mut [ZoomSegment]) {
    segments.sort_by_key(|segment| segment.start_ts);
}

/// Trim the no-op prefix of an auto segment.
///
/// Auto segments must open on a frame that is actually zoomed; leading
/// target points at (or within epsilon of) full frame are dropped and the
/// start moves to the first effective point. Returns `None` when nothing
/// effective remains. Manual segments pass through untouched.
pub fn trim_auto_noop(segment: ZoomSegment) -> Option<ZoomSegment> {
    if !segment.is_auto {
        return Some(segment);
    }

    if segment.target_points.is_empty() {
        // Fixed-target auto segment: judge the initial rect itself.
        if segment.initial_rect.is_zoom_noop() {
            return None;
        }
        return Some(segment);
    }

    let mut segment = segment;
    let first_effective = segment
        .target_points
        .iter()
        .position(|point| !point.rect.is_zoom_noop())?;

    if first_effective > 0 {
        segment.target_points.drain(..first_effective);
        let first = segment.target_points[0];
        segment.start_ts = segment.start_ts.max(first.ts).min(segment.end_ts);
        segment.initial_rect = first.rect;
        // Keep the leading point aligned with the new start.
        if let Some(point) = segment.target_points.first_mut() {
            point.ts = segment.start_ts;
        }
    }

    Some(segment)
}

/// Bounds the segment `id` may occupy without touching its neighbors:
/// `(min_start, max_end)`.
pub fn neighbor_bounds(segments: &[ZoomSegment], id: &str, duration_ms: u64) -> (u64, u64) {
    let mut min_start = 0u64;
    let mut max_end = duration_ms;

    let Some(idx) = segments.iter().position(|segment| segment.id == id) else {
        return (min_start, max_end);
    };

    if idx > 0 {
        min_start = segments[idx - 1].end_ts.saturating_add(MIN_SEGMENT_GAP_MS);
    }
    if idx + 1 < segments.len() {
        max_end = segments[idx + 1].start_ts.saturating_sub(MIN_SEGMENT_GAP_MS);
    }
    (min_start, max_end)
}

/// Clamp a whole-segment drag to `desired_start`, preserving length.
/// Returns the clamped `(start, end)`.
pub fn clamp_move(segments: &[ZoomSegment], id: &str, desired_start: u64, duration_ms: u64) -> Option<(u64, u64)> {
    let segment = segments.iter().find(|segment| segment.id == id)?;
    let length = segment.duration_ms().max(1);
    let (min_start, max_end) = neighbor_bounds(segments, id, duration_ms);

    let highest_start = max_end.saturating_sub(length).max(min_start);
    let start = desired_start.clamp(min_start, highest_start);
    Some((start, start + length))
}

/// Clamp an edge drag. The opposite edge stays put; the grabbed edge keeps
/// the segment at least `MIN_SEGMENT_MS` long where the neighbors leave
/// room, and never shorter than 1 ms.
pub fn clamp_resize(
    segments: &[ZoomSegment],
    id: &str,
    edge: ResizeEdge,
    desired_ts: u64,
    duration_ms: u64,
) -> Option<(u64, u64)> {
    let segment = segments.iter().find(|segment| segment.id == id)?;
    let (min_start, max_end) = neighbor_bounds(segments, id, duration_ms);

    match edge {
        ResizeEdge::Start => {
            let latest = segment
                .end_ts
                .saturating_sub(MIN_SEGMENT_MS)
                .max(min_start)
                .min(segment.end_ts.saturating_sub(1))
                .max(min_start);
            let start = desired_ts.clamp(min_start, latest);
            Some((start, segment.end_ts))
        }
        ResizeEdge::End => {
            let earliest = segment
                .start_ts
                .saturating_add(MIN_SEGMENT_MS)
                .min(max_end)
                .max(segment.start_ts.saturating_add(1));
            let end = desired_ts.clamp(earliest, max_end.max(earliest));
            Some((segment.start_ts, end))
        }
    }
}

/// Commit a clamped whole-segment drag. Editing a segment by hand takes
/// it out of the engine's ownership: `isAuto` clears.
pub fn commit_move(
    segments: &mut [ZoomSegment],
    id: &str,
    desired_start: u64,
    duration_ms: u64,
) -> Option<(u64, u64)> {
    let (start, end) = clamp_move(segments, id, desired_start, duration_ms)?;
    let segment = segments.iter_mut().find(|segment| segment.id == id)?;
    let delta = start as i64 - segment.start_ts as i64;
    for point in &mut segment.target_points {
        point.ts = (point.ts as i64 + delta).max(0) as u64;
    }
    segment.start_ts = start;
    segment.end_ts = end;
    segment.is_auto = false;
    Some((start, end))
}

/// Commit a clamped edge drag; also clears `isAuto`.
pub fn commit_resize(
    segments: &mut [ZoomSegment],
    id: &str,
    edge: ResizeEdge,
    desired_ts: u64,
    duration_ms: u64,
) -> Option<(u64, u64)> {
    let (start, end) = clamp_resize(segments, id, edge, desired_ts, duration_ms)?;
    let segment = segments.iter_mut().find(|segment| segment.id == id)?;
    if start > segment.start_ts {
        advance_segment_start(segment, start);
    }
    segment.start_ts = start;
    segment.end_ts = end;
    segment.target_points.retain(|point| point.ts <= end);
    segment.is_auto = false;
    Some((start, end))
}

/// Find room for a new segment near `preferred_start_ts`.
///
/// Scans the inter-segment gaps (keeping the 200 ms separation on both
/// sides), picks the gap containing the preferred start and returns a slot
/// of up to [`MANUAL_SLOT_MS`] or the whole gap, whichever is smaller.
/// Returns `None` when no gap containing the preferred time can hold even
/// a minimum-length segment.
pub fn find_available_gap(
    segments: &[ZoomSegment],
    duration_ms: u64,
    preferred_start_ts: u64,
) -> Option<(u64, u64)> {
    let mut ordered: Vec<&ZoomSegment> = segments.iter().collect();
    ordered.sort_by_key(|segment| segment.start_ts);

    let mut gaps: Vec<(u64, u64)> = Vec::with_capacity(ordered.len() + 1);
    let mut cursor = 0u64;
    for segment in &ordered {
        let gap_end = segment.start_ts.saturating_sub(MIN_SEGMENT_GAP_MS);
        if gap_end > cursor {
            gaps.push((cursor, gap_end));
        }
        cursor = cursor.max(segment.end_ts.saturating_add(MIN_SEGMENT_GAP_MS));
    }
    if duration_ms > cursor {
        gaps.push((cursor, duration_ms));
    }

    let preferred = preferred_start_ts.min(duration_ms);
    let (gap_start, gap_end) = gaps
        .into_iter()
        .find(|(start, end)| preferred >= *start && preferred < *end)?;

    let gap_len = gap_end - gap_start;
    if gap_len < MIN_SEGMENT_MS {
        return None;
    }

    let slot_len = gap_len.min(MANUAL_SLOT_MS);
    let start = preferred.clamp(gap_start, gap_end - slot_len);
    Some((start, start + slot_len))
}

/// Restore ordering and the inter-segment gap after an engine pass.
///
/// Segments are sorted, pushed forward off their predecessors, clipped to
/// the recording, and dropped when the surgery leaves them shorter than
/// the minimum. Target points follow their segment's trimmed range.
pub fn enforce_non_overlap(segments: Vec<ZoomSegment>, duration_ms: u64) -> Vec<ZoomSegment> {
    let mut ordered = segments;
    sort_segments(&mut ordered);

    let mut result: Vec<ZoomSegment> = Vec::with_capacity(ordered.len());
    for mut segment in ordered {
        let min_start = result
            .last()
            .map(|prev: &ZoomSegment| prev.end_ts.saturating_add(MIN_SEGMENT_GAP_MS))
            .unwrap_or(0);

        if segment.start_ts < min_start {
            advance_segment_start(&mut segment, min_start);
        }
        if segment.end_ts > duration_ms {
            segment.end_ts = duration_ms;
            segment.target_points.retain(|point| point.ts <= duration_ms);
        }
        if segment.end_ts <= segment.start_ts
            || segment.duration_ms() < MIN_SEGMENT_MS
        {
            continue;
        }
        result.push(segment);
    }
    result
}

/// Move a segment's start forward, re-anchoring its target points.
fn advance_segment_start(segment: &mut ZoomSegment, new_start: u64) {
    segment.start_ts = new_start;
    if segment.target_points.is_empty() {
        return;
    }

    let rect_at_start = rect_at(segment, new_start);
    segment.target_points.retain(|point| point.ts >= new_start);
    let needs_anchor = segment
        .target_points
        .first()
        .map(|point| point.ts > new_start)
        .unwrap_or(true);
    if needs_anchor {
        segment.target_points.insert(
            0,
            TargetPoint {
                ts: new_start,
                rect: rect_at_start,
            },
        );
    }
    segment.initial_rect = rect_at_start;
}

fn rect_at(segment: &ZoomSegment, ts: u64) -> NormalizedRect {
    let mut rect = segment.initial_rect;
    for point in &segment.target_points {
        if point.ts <= ts {
            rect = point.rect;
        } else {
            break;
        }
    }
    rect
}
