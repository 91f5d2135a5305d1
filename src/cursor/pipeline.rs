//! Cursor sample collection, smoothing and interpolation.

use crate::models::events::{EventsFile, InputEvent};

/// One pointer sample, normalized to the captured screen.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorSample {
    pub ts: u64,
    pub x: f64,
    pub y: f64,
}

/// Strictly time-ordered cursor samples with O(log n) time lookup.
#[derive(Debug, Clone, Default)]
pub struct CursorTrack {
    samples: Vec<CursorSample>,
}

impl CursorTrack {
    /// Build the track from an events file.
    ///
    /// Pointer-bearing events are normalized by screen size, sorted, and
    /// smoothed with a first-order EWMA: `out[i] = out[i-1] + alpha *
    /// (in[i] - out[i-1])` where `alpha = 1 - 0.9 * smoothing_factor`.
    /// The 0.9 factor is part of the contract, not a tunable: factor 0 is
    /// the identity, factor 1 leaves alpha = 0.1.
    pub fn build(events: &EventsFile, smoothing_factor: f64) -> CursorTrack {
        let raw = collect_samples(events);
        CursorTrack {
            samples: smooth_samples(raw, smoothing_factor),
        }
    }

    /// Build from already-normalized samples (tests, manual tracks).
    pub fn from_samples(mut samples: Vec<CursorSample>) -> CursorTrack {
        samples.sort_by_key(|sample| sample.ts);
        samples.dedup_by_key(|sample| sample.ts);
        CursorTrack { samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[CursorSample] {
        &self.samples
    }

    /// Cursor position at `ts`: binary search plus linear interpolation
    /// between the neighboring samples, clamped to the first/last sample
    /// outside the covered range. Empty tracks report the screen center.
    pub fn position_at(&self, ts: u64) -> (f64, f64) {
        match self.samples.binary_search_by_key(&ts, |sample| sample.ts) {
            Ok(idx) => (self.samples[idx].x, self.samples[idx].y),
            Err(0) => self
                .samples
                .first()
                .map(|sample| (sample.x, sample.y))
                .unwrap_or((0.5, 0.5)),
            Err(idx) if idx >= self.samples.len() => {
                let last = self.samples[self.samples.len() - 1];
                (last.x, last.y)
            }
            Err(idx) => {
                let left = self.samples[idx - 1];
                let right = self.samples[idx];
                let span = right.ts.saturating_sub(left.ts);
                if span == 0 {
                    return (right.x, right.y);
                }
                let t = ts.saturating_sub(left.ts) as f64 / span as f64;
                (
                    left.x + (right.x - left.x) * t,
                    left.y + (right.y - left.y) * t,
                )
            }
        }
    }
}

fn collect_samples(events: &EventsFile) -> Vec<CursorSample> {
    let width = events.screen_width.max(1) as f64;
    let height = events.screen_height.max(1) as f64;

    let mut samples: Vec<CursorSample> = events
        .events
        .iter()
        .filter_map(|event| match event {
            InputEvent::Move { ts, x, y }
            | InputEvent::Click { ts, x, y, .. }
            | InputEvent::MouseUp { ts, x, y, .. }
            | InputEvent::Scroll { ts, x, y, .. } => Some(CursorSample {
                ts: *ts,
                x: (x / width).clamp(0.0, 1.0),
                y: (y / height).clamp(0.0, 1.0),
            }),
            _ => None,
        })
        .collect();

    samples.sort_by_key(|sample| sample.ts);
    // Later events win on equal timestamps so clicks override moves.
    let mut deduped: Vec<CursorSample> = Vec::with_capacity(samples.len());
    for sample in samples {
        if let Some(last) = deduped.last_mut() {
            if last.ts == sample.ts {
                *last = sample;
                continue;
            }
        }
        deduped.push(sample);
    }
    deduped
}

fn smooth_samples(samples: Vec<CursorSample>, smoothing_factor: f64) -> Vec<CursorSample> {
    let factor = smoothing_factor.clamp(0.0, 1.0);
    let alpha = 1.0 - 0.9 * factor;
    if samples.len() < 2 || alpha >= 1.0 {
        // alpha = 1 is the identity; return the inputs untouched so a zero
        // smoothing factor is exact, not merely close.
        return samples;
    }

    let mut output = Vec::with_capacity(samples.len());
    let first = samples[0];
    output.push(first);
    let mut level_x = first.x;
    let mut level_y = first.y;

    for sample in samples.into_iter().skip(1) {
        level_x += alpha * (sample.x - level_x);
        level_y += alpha * (sample.y - level_y);
        output.push(CursorSample {
            ts: sample.ts,
            x: level_x,
            y: level_y,
        });
    }
    output
}
