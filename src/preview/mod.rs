//! Preview session: an immutable snapshot the render loop reads.
//!
//! The UI render loop runs at display refresh and must never contend
//! with editing. It reads a snapshot (camera track + cursor track baked
//! into a composer); edits rebuild a new snapshot off the render path and
//! swap the pointer. No lock is held while rendering a frame: readers
//! clone the `Arc` and drop the guard immediately.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::cursor::CursorTrack;
use crate::models::events::EventsFile;
use crate::models::project::Project;
use crate::rendering::composer::{ComposedFrame, FrameComposer};
use crate::rendering::track::{CameraTrack, PREVIEW_FPS};

/// Live preview state for one open project.
pub struct PreviewSession {
    snapshot: RwLock<Arc<FrameComposer>>,
}

impl PreviewSession {
    /// Build the initial snapshot.
    ///
    /// `media_duration_ms` is the decoded video's duration, which may
    /// disagree slightly with the recorded one; passing `None` trusts the
    /// project.
    pub fn new(project: &Project, events: &EventsFile, media_duration_ms: Option<u64>) -> Self {
        PreviewSession {
            snapshot: RwLock::new(Arc::new(build_composer(
                project,
                events,
                media_duration_ms,
            ))),
        }
    }

    /// Rebuild the snapshot after an edit commit and atomically replace
    /// the pointer the render loop sees.
    pub fn recompute(
        &self,
        project: &Project,
        events: &EventsFile,
        media_duration_ms: Option<u64>,
    ) {
        let fresh = Arc::new(build_composer(project, events, media_duration_ms));
        *self.snapshot.write() = fresh;
    }

    /// Current snapshot; cheap clone for render-loop use.
    pub fn composer(&self) -> Arc<FrameComposer> {
        self.snapshot.read().clone()
    }

    /// Compose the frame at a media timestamp. This is the whole preview
    /// render path: one snapshot read, no locking during composition.
    pub fn frame_at(&self, media_ts_ms: f64) -> ComposedFrame {
        self.composer().sample_media(media_ts_ms)
    }
}

/// The single track producer both preview and export consume.
pub fn build_composer(
    project: &Project,
    events: &EventsFile,
    media_duration_ms: Option<u64>,
) -> FrameComposer {
    build_composer_at_fps(
        project,
        events,
        media_duration_ms,
        PREVIEW_FPS,
        project.video_width,
        project.video_height,
    )
}

/// Same producer at an explicit integration rate and output frame size.
/// The export driver passes the output fps so integration matches the
/// actual frame cadence, and the export resolution so cursor sizing is
/// computed against the frames it actually emits.
pub fn build_composer_at_fps(
    project: &Project,
    events: &EventsFile,
    media_duration_ms: Option<u64>,
    fps: f64,
    frame_width: u32,
    frame_height: u32,
) -> FrameComposer {
    let cursor = CursorTrack::build(events, project.settings.cursor.smoothing_factor);
    let track = CameraTrack::build(
        &project.timeline.zoom_segments,
        project.duration_ms,
        fps,
    );
    FrameComposer::new(
        Arc::new(track),
        Arc::new(cursor),
        Arc::new(events.click_times()),
        project.duration_ms,
        media_duration_ms.unwrap_or(project.duration_ms),
        frame_width,
        frame_height,
        project.settings.cursor.size,
    )
}
