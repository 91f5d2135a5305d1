//! Spring-integrated camera track.
//!
//! The track is the dense time series of viewport rectangles everything
//! downstream reads: the preview loop samples it per display frame, the
//! export driver rebuilds it at the output frame rate, and the timeline
//! derives its visual bars from it. One pure producer keeps preview and
//! export in lockstep.

use crate::geometry::NormalizedRect;
use crate::models::project::{CameraSpring, ZoomSegment};
use crate::timeline::segments::sort_segments;

/// Preview integration rate, frames per second.
pub const PREVIEW_FPS: f64 = 60.0;

/// Integration step clamp, seconds.
const MIN_DT_S: f64 = 1e-4;
const MAX_DT_S: f64 = 0.1;

/// One integrated viewport sample.
#[derive(Debug, Clone, Copy)]
pub struct CameraSample {
    /// Milliseconds from recording start.
    pub ts: f64,
    pub rect: NormalizedRect,
}

/// Second-order spring state for one coordinate.
#[derive(Debug, Clone, Copy)]
struct AxisSpring {
    value: f64,
    velocity: f64,
}

impl AxisSpring {
    fn at_rest(value: f64) -> Self {
        AxisSpring {
            value,
            velocity: 0.0,
        }
    }

    fn step(&mut self, target: f64, spring: &CameraSpring, dt_s: f64) {
        let accel =
            ((target - self.value) * spring.stiffness - spring.damping * self.velocity) / spring.mass;
        self.velocity += accel * dt_s;
        self.value += self.velocity * dt_s;
    }
}

/// Dense camera track over `[0, duration_ms]`.
#[derive(Debug, Clone)]
pub struct CameraTrack {
    samples: Vec<CameraSample>,
    duration_ms: u64,
}

impl CameraTrack {
    /// Integrate the viewport toward the segment targets at `fps` steps.
    ///
    /// Each coordinate of `{x, y, w, h}` runs an independent second-order
    /// spring. The target for a step is sampled at the START of the
    /// integration interval so segment starts stay visually crisp, and
    /// velocities carry across segment boundaries; only the emitted
    /// samples are clamped back into the rect invariants.
    pub fn build(segments: &[ZoomSegment], duration_ms: u64, fps: f64) -> CameraTrack {
        let mut ordered: Vec<ZoomSegment> = segments.to_vec();
        sort_segments(&mut ordered);

        let step_ms = 1_000.0 / fps.max(1.0);
        let duration = duration_ms as f64;
        let default_spring = CameraSpring::default();

        // The camera always opens on the full frame and springs into the
        // first target from there.
        let initial = NormalizedRect::FULL;
        let mut x = AxisSpring::at_rest(initial.x);
        let mut y = AxisSpring::at_rest(initial.y);
        let mut w = AxisSpring::at_rest(initial.width);
        let mut h = AxisSpring::at_rest(initial.height);

        let mut samples = Vec::with_capacity((duration / step_ms) as usize + 2);
        samples.push(CameraSample {
            ts: 0.0,
            rect: initial,
        });

        let mut t_prev = 0.0f64;
        while t_prev < duration {
            let t = (t_prev + step_ms).min(duration);
            let (target, spring) = active_target(&ordered, t_prev, &default_spring);
            let dt_s = ((t - t_prev) / 1_000.0).clamp(MIN_DT_S, MAX_DT_S);

            x.step(target.x, &spring, dt_s);
            y.step(target.y, &spring, dt_s);
            w.step(target.width, &spring, dt_s);
            h.step(target.height, &spring, dt_s);

            samples.push(CameraSample {
                ts: t,
                rect: NormalizedRect {
                    x: x.value,
                    y: y.value,
                    width: w.value,
                    height: h.value,
                }
                .clamped(),
            });
            t_prev = t;
        }

        CameraTrack {
            samples,
            duration_ms,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn samples(&self) -> &[CameraSample] {
        &self.samples
    }

    /// Viewport at an arbitrary timestamp: binary search plus linear
    /// interpolation between the adjacent samples.
    pub fn sample_at(&self, ts_ms: f64) -> NormalizedRect {
        if self.samples.is_empty() {
            return NormalizedRect::FULL;
        }
        let ts = ts_ms.clamp(0.0, self.duration_ms as f64);
        let idx = self.samples.partition_point(|sample| sample.ts <= ts);
        if idx == 0 {
            return self.samples[0].rect;
        }
        if idx >= self.samples.len() {
            return self.samples[self.samples.len() - 1].rect;
        }

        let left = self.samples[idx - 1];
        let right = self.samples[idx];
        let span = right.ts - left.ts;
        if span <= f64::EPSILON {
            return right.rect;
        }
        let t = (ts - left.ts) / span;
        left.rect.lerp(&right.rect, t)
    }
}

/// Target and spring parameters active at `ts`.
fn active_target(
    segments: &[ZoomSegment],
    ts_ms: f64,
    default_spring: &CameraSpring,
) -> (NormalizedRect, CameraSpring) {
    match active_segment(segments, ts_ms) {
        Some(segment) => (
            segment_target_at(segment, ts_ms),
            segment.spring.sanitized(),
        ),
        None => (NormalizedRect::FULL, *default_spring),
    }
}

/// The segment covering `ts`, if any. Boundary-aligned: the start is
/// inclusive, the end exclusive.
fn active_segment(segments: &[ZoomSegment], ts_ms: f64) -> Option<&ZoomSegment> {
    segments
        .iter()
        .rev()
        .find(|segment| ts_ms >= segment.start_ts as f64 && ts_ms < segment.end_ts as f64)
}

/// Step-sampled target inside a segment: the latest target point at or
/// before `ts`, else the initial rect. The spring does the smoothing;
/// target points are deliberately not interpolated.
fn segment_target_at(segment: &ZoomSegment, ts_ms: f64) -> NormalizedRect {
    let mut rect = segment.initial_rect;
    for point in &segment.target_points {
        if (point.ts as f64) <= ts_ms {
            rect = point.rect;
        } else {
            break;
        }
    }
    rect.clamped()
}
