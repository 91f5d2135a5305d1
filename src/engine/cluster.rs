//! Click eligibility and clustering.
//!
//! The engine does not react to single input events; it reacts to
//! clusters of intent. Clicks are first filtered by the configured
//! trigger policy, then adjacent survivors merge into focus clusters
//! anchored on the most recent click.

use crate::models::events::{EventsFile, InputEvent};

use super::config::{SmartCameraConfig, TriggerPolicy};

/// A click as the engine sees it, in physical pixels.
#[derive(Debug, Clone, Copy)]
pub struct FocusClick {
    pub ts: u64,
    pub x: f64,
    pub y: f64,
    pub bounds: Option<PixelRect>,
    pub ctrl_held: bool,
}

/// Axis-aligned rectangle in physical pixels.
#[derive(Debug, Clone, Copy)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn union(&self, other: &PixelRect) -> PixelRect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        PixelRect {
            x: left,
            y: top,
            width: (right - left).max(1.0),
            height: (bottom - top).max(1.0),
        }
    }
}

/// Consecutive eligible clicks merged into one semantic focus.
#[derive(Debug, Clone, Copy)]
pub struct FocusCluster {
    pub start_ts: u64,
    pub end_ts: u64,
    /// Position of the last click: the focus lands on the latest intent.
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub bounds: Option<PixelRect>,
    pub click_count: usize,
}

impl FocusCluster {
    /// Anchor timestamp driving trigger timing.
    pub fn anchor_ts(&self) -> u64 {
        self.end_ts
    }
}

/// Extract clicks with their UI bounds and the Ctrl modifier state at
/// click time.
pub fn collect_clicks(events: &EventsFile) -> Vec<FocusClick> {
    let mut ctrl_held = false;
    let mut clicks = Vec::new();

    for event in &events.events {
        match event {
            InputEvent::KeyDown { key_code, .. } => {
                if is_ctrl_key(key_code) {
                    ctrl_held = true;
                }
            }
            InputEvent::KeyUp { key_code, .. } => {
                if is_ctrl_key(key_code) {
                    ctrl_held = false;
                }
            }
            InputEvent::Click {
                ts,
                x,
                y,
                ui_context,
                ..
            } => {
                let bounds = ui_context
                    .as_ref()
                    .and_then(|ctx| ctx.bounding_rect.as_ref())
                    .and_then(|rect| {
                        if rect.width == 0 || rect.height == 0 {
                            return None;
                        }
                        Some(PixelRect {
                            x: rect.x as f64,
                            y: rect.y as f64,
                            width: rect.width as f64,
                            height: rect.height as f64,
                        })
                    });
                clicks.push(FocusClick {
                    ts: *ts,
                    x: *x,
                    y: *y,
                    bounds,
                    ctrl_held,
                });
            }
            _ => {}
        }
    }

    clicks.sort_by_key(|click| click.ts);
    clicks
}

/// Apply the trigger policy.
pub fn eligible_clicks(clicks: &[FocusClick], config: &SmartCameraConfig) -> Vec<FocusClick> {
    match config.trigger_policy {
        TriggerPolicy::SingleClick => clicks.to_vec(),
        TriggerPolicy::CtrlClick => clicks.iter().copied().filter(|c| c.ctrl_held).collect(),
        TriggerPolicy::MultiClickWindow => {
            let window = config.multi_click_window_ms.max(1);
            let needed = config.multi_click_min.max(1);
            let mut selected = vec![false; clicks.len()];

            for (idx, click) in clicks.iter().enumerate() {
                let window_start = click.ts.saturating_sub(window);
                let mut left = idx;
                while left > 0 && clicks[left - 1].ts >= window_start {
                    left -= 1;
                }
                if idx + 1 - left < needed {
                    continue;
                }
                // The whole window that satisfied the policy is in play,
                // not just its last click.
                for flag in selected.iter_mut().take(idx + 1).skip(left) {
                    *flag = true;
                }
            }

            clicks
                .iter()
                .zip(selected)
                .filter_map(|(click, keep)| keep.then_some(*click))
                .collect()
        }
    }
}

/// Merge eligible clicks within `cluster_gap_ms` of each other.
pub fn cluster_clicks(clicks: &[FocusClick], gap_ms: u64) -> Vec<FocusCluster> {
    let mut clusters: Vec<FocusCluster> = Vec::new();

    for click in clicks {
        if let Some(current) = clusters.last_mut() {
            if click.ts.saturating_sub(current.end_ts) <= gap_ms {
                current.end_ts = click.ts;
                current.anchor_x = click.x;
                current.anchor_y = click.y;
                current.click_count += 1;
                current.bounds = match (current.bounds, click.bounds) {
                    (Some(left), Some(right)) => Some(left.union(&right)),
                    (Some(left), None) => Some(left),
                    (None, right) => right,
                };
                continue;
            }
        }
        clusters.push(FocusCluster {
            start_ts: click.ts,
            end_ts: click.ts,
            anchor_x: click.x,
            anchor_y: click.y,
            bounds: click.bounds,
            click_count: 1,
        });
    }

    clusters
}

fn is_ctrl_key(key_code: &str) -> bool {
    let lower = key_code.to_ascii_lowercase();
    lower.contains("ctrl") || lower.contains("control")
}
