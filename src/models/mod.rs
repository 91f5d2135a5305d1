//! Persisted document schemas.
//!
//! Two files make up a recording: `events.json` (write-once input
//! telemetry from the capture collaborator) and `project.json` (the
//! mutable editing aggregate). Both are schema-versioned; loads are
//! all-or-nothing.

pub mod events;
pub mod project;

pub use events::{
    BoundingRect, EventsFile, InputEvent, MouseButton, ScrollDelta, UiContext,
    SCHEMA_VERSION as EVENTS_SCHEMA_VERSION,
};
pub use project::{
    Background, CameraSpring, CursorSettings, ExportSettings, PanKeyframe, Project,
    ProjectSettings, TargetPoint, Timeline, ZoomMode, ZoomSegment, ZoomTrigger,
    SCHEMA_VERSION as PROJECT_SCHEMA_VERSION,
};
