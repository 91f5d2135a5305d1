//! Input telemetry schema (`events.json`).
//!
//! Written once by the capture collaborator; the core only reads it.
//! Coordinates are physical pixels (the capture side applies the DPI
//! scale factor before writing); timestamps are milliseconds from
//! `startTimeMs`.

use serde::{Deserialize, Serialize};

use crate::error::{NscError, NscResult};

pub const SCHEMA_VERSION: u32 = 1;

/// Bounding rectangle of a UI element in physical screen pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// UI element context probed at click time. Every field is optional; a
/// missing bounding rect is a first-class case, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiContext {
    pub app_name: Option<String>,
    pub control_name: Option<String>,
    pub bounding_rect: Option<BoundingRect>,
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Scroll wheel delta. Hardware wheels report multiples of 120; trackpads
/// report small per-pixel values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollDelta {
    pub dx: f64,
    pub dy: f64,
}

/// One input event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    /// Mouse movement.
    Move { ts: u64, x: f64, y: f64 },
    /// Mouse button press.
    Click {
        ts: u64,
        x: f64,
        y: f64,
        button: MouseButton,
        /// Filled asynchronously by the UI-context probe; may be absent.
        #[serde(rename = "uiContext", alias = "ui_context", default)]
        ui_context: Option<UiContext>,
    },
    /// Mouse button release.
    MouseUp {
        ts: u64,
        x: f64,
        y: f64,
        button: MouseButton,
    },
    /// Scroll wheel.
    Scroll {
        ts: u64,
        x: f64,
        y: f64,
        delta: ScrollDelta,
    },
    /// Key press.
    KeyDown {
        ts: u64,
        #[serde(rename = "keyCode", alias = "key_code")]
        key_code: String,
    },
    /// Key release.
    KeyUp {
        ts: u64,
        #[serde(rename = "keyCode", alias = "key_code")]
        key_code: String,
    },
}

impl InputEvent {
    /// Timestamp of the event, ms from recording start.
    pub fn ts(&self) -> u64 {
        match self {
            InputEvent::Move { ts, .. } => *ts,
            InputEvent::Click { ts, .. } => *ts,
            InputEvent::MouseUp { ts, .. } => *ts,
            InputEvent::Scroll { ts, .. } => *ts,
            InputEvent::KeyDown { ts, .. } => *ts,
            InputEvent::KeyUp { ts, .. } => *ts,
        }
    }

    /// Pointer position for events that carry one.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            InputEvent::Move { x, y, .. }
            | InputEvent::Click { x, y, .. }
            | InputEvent::MouseUp { x, y, .. }
            | InputEvent::Scroll { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }
}

/// Root container of `events.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsFile {
    pub schema_version: u32,
    /// UUID of the recording; must equal the owning project's id.
    pub recording_id: String,
    /// Unix timestamp (ms) of recording start, the sync anchor.
    pub start_time_ms: u64,
    /// Screen resolution at recording time, physical pixels.
    pub screen_width: u32,
    pub screen_height: u32,
    /// DPI scale (e.g. 1.25 for 125%).
    pub scale_factor: f64,
    pub events: Vec<InputEvent>,
}

impl EventsFile {
    /// Parse and validate from JSON text. Fails whole on a schema or
    /// invariant problem; never partially imports.
    pub fn from_json(json: &str) -> NscResult<Self> {
        let file: EventsFile = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }

    /// Check the documented invariants: schema version, sane screen
    /// geometry, non-decreasing timestamps.
    pub fn validate(&self) -> NscResult<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(NscError::SchemaMismatch(format!(
                "events.json: expected schemaVersion {}, got {}",
                SCHEMA_VERSION, self.schema_version
            )));
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(NscError::InvariantViolation(format!(
                "events.json: degenerate screen size {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 || self.scale_factor > 4.0 {
            return Err(NscError::InvariantViolation(format!(
                "events.json: scaleFactor {} outside (0, 4]",
                self.scale_factor
            )));
        }

        let mut last_ts = 0u64;
        for (idx, event) in self.events.iter().enumerate() {
            let ts = event.ts();
            if ts < last_ts {
                return Err(NscError::InvariantViolation(format!(
                    "events.json: event {} goes back in time ({} < {})",
                    idx, ts, last_ts
                )));
            }
            last_ts = ts;
        }
        Ok(())
    }

    /// True when the stream cannot drive the engine: no events at all, or
    /// none that carry pointer coordinates.
    pub fn is_capture_shortfall(&self) -> bool {
        self.events.iter().all(|event| event.position().is_none())
    }

    /// Sorted timestamps of click events, the input to the pulse signal.
    pub fn click_times(&self) -> Vec<u64> {
        let mut times: Vec<u64> = self
            .events
            .iter()
            .filter_map(|event| match event {
                InputEvent::Click { ts, .. } => Some(*ts),
                _ => None,
            })
            .collect();
        times.sort_unstable();
        times
    }
}
