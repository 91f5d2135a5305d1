//! Export driver: iterates frames, feeds the encoder, reports progress.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::bounded;
use image::{Rgba, RgbaImage};
use log::{info, warn};

use crate::error::{NscError, NscResult};
use crate::models::events::EventsFile;
use crate::models::project::Project;
use crate::preview::build_composer_at_fps;
use crate::rendering::compositor::compose_frame;

use super::encoder::FrameEncoder;
use super::status::{now_ms, ExportStatus, SharedExportStatus};

/// Frames queued between composition and encoding.
const ENCODE_QUEUE_DEPTH: usize = 4;

/// Progress is published every this many frames.
const PROGRESS_EVERY_FRAMES: u64 = 10;

/// Supplier of decoded source frames. The raw video decoder lives
/// outside the core; the driver only asks it for the frame nearest a
/// media timestamp.
pub trait FrameSource: Send {
    fn dimensions(&self) -> (u32, u32);

    fn duration_ms(&self) -> u64;

    fn frame_at(&mut self, media_ts_ms: u64) -> NscResult<RgbaImage>;
}

/// Flat-color frame supplier for tests and dry runs.
pub struct SolidColorSource {
    width: u32,
    height: u32,
    duration_ms: u64,
    color: [u8; 4],
}

impl SolidColorSource {
    pub fn new(width: u32, height: u32, duration_ms: u64, color: [u8; 4]) -> Self {
        SolidColorSource {
            width,
            height,
            duration_ms,
            color,
        }
    }
}

impl FrameSource for SolidColorSource {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    fn frame_at(&mut self, _media_ts_ms: u64) -> NscResult<RgbaImage> {
        Ok(RgbaImage::from_pixel(
            self.width,
            self.height,
            Rgba(self.color),
        ))
    }
}

/// Everything one export run needs. Width/height/fps/codec default to
/// the project's export settings when not overridden.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub project: Project,
    pub events: EventsFile,
    pub output_path: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<u32>,
    pub codec: Option<String>,
}

#[derive(Debug, Clone)]
struct ResolvedParams {
    width: u32,
    height: u32,
    fps: u32,
    codec: String,
}

fn resolve_params(request: &ExportRequest) -> NscResult<ResolvedParams> {
    let settings = &request.project.settings.export;
    let width = request.width.unwrap_or(settings.width).clamp(320, 7_680) & !1;
    let height = request.height.unwrap_or(settings.height).clamp(240, 4_320) & !1;
    let fps = request.fps.unwrap_or(settings.fps).clamp(10, 120);
    let codec = request
        .codec
        .clone()
        .unwrap_or_else(|| settings.codec.clone())
        .trim()
        .to_lowercase();

    if !matches!(codec.as_str(), "h264" | "h265" | "vp9") {
        return Err(NscError::ExportError(format!("Unsupported codec: {codec}")));
    }
    Ok(ResolvedParams {
        width,
        height,
        fps,
        codec,
    })
}

/// Handle to a running export.
pub struct ExportHandle {
    status: SharedExportStatus,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ExportHandle {
    pub fn status(&self) -> ExportStatus {
        self.status.snapshot()
    }

    /// Request a cooperative cancel. The worker notices between frames.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Block until the worker exits and return the terminal status.
    pub fn wait(mut self) -> ExportStatus {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        self.status.snapshot()
    }
}

/// One-export-at-a-time driver. Owns the status record the UI polls.
#[derive(Default)]
pub struct ExportDriver {
    status: SharedExportStatus,
}

impl ExportDriver {
    pub fn new() -> Self {
        ExportDriver::default()
    }

    pub fn status(&self) -> ExportStatus {
        self.status.snapshot()
    }

    /// Reset a finished status back to idle.
    pub fn reset_status(&self) -> NscResult<()> {
        if self.status.is_running() {
            return Err(NscError::ExportError(
                "Cannot reset status while export is running".to_string(),
            ));
        }
        self.status.update(|status| *status = ExportStatus::default());
        Ok(())
    }

    /// Spawn the export worker. Fails if another export is running.
    pub fn start(
        &self,
        request: ExportRequest,
        source: Box<dyn FrameSource>,
        encoder: Box<dyn FrameEncoder>,
    ) -> NscResult<ExportHandle> {
        let params = resolve_params(&request)?;

        if self.status.is_running() {
            return Err(NscError::ExportError(
                "Another export is already running".to_string(),
            ));
        }
        self.status.update(|status| {
            *status = ExportStatus {
                is_running: true,
                progress: 0.0,
                message: format!(
                    "Starting export {}x{} @ {}fps ({})",
                    params.width, params.height, params.fps, params.codec
                ),
                output_path: Some(request.output_path.to_string_lossy().to_string()),
                error: None,
                started_at_ms: Some(now_ms()),
                finished_at_ms: None,
            };
        });

        let status = self.status.clone();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = cancel.clone();
        let worker_status = status.clone();

        let worker = std::thread::Builder::new()
            .name("nsc-export".to_string())
            .spawn(move || {
                let result = run_export_job(
                    &worker_status,
                    &worker_cancel,
                    request,
                    params,
                    source,
                    encoder,
                );
                finalize_status(&worker_status, result);
            })
            .map_err(|e| NscError::ExportError(format!("Failed to spawn export thread: {e}")))?;

        Ok(ExportHandle {
            status,
            cancel,
            worker: Some(worker),
        })
    }
}

fn finalize_status(status: &SharedExportStatus, result: NscResult<PathBuf>) {
    status.update(|state| {
        state.is_running = false;
        state.finished_at_ms = Some(now_ms());
        match result {
            Ok(path) => {
                state.progress = 1.0;
                state.message = "Export finished".to_string();
                state.output_path = Some(path.to_string_lossy().to_string());
                state.error = None;
            }
            Err(NscError::Cancelled) => {
                state.message = "Export cancelled".to_string();
                state.error = Some("cancelled".to_string());
            }
            Err(err) => {
                state.message = "Export failed".to_string();
                state.error = Some(err.to_string());
            }
        }
    });
}

fn run_export_job(
    status: &SharedExportStatus,
    cancel: &AtomicBool,
    request: ExportRequest,
    params: ResolvedParams,
    mut source: Box<dyn FrameSource>,
    mut encoder: Box<dyn FrameEncoder>,
) -> NscResult<PathBuf> {
    let output_path = request.output_path.clone();
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                NscError::ResourceUnavailable(format!(
                    "Failed to create export output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }

    // The camera track is integrated at the output cadence, not at the
    // preview rate, through the same producer the preview uses.
    let composer = build_composer_at_fps(
        &request.project,
        &request.events,
        Some(source.duration_ms()),
        params.fps as f64,
        params.width,
        params.height,
    );

    encoder.begin(params.width, params.height, params.fps, &output_path)?;

    let frame_step_ms = 1_000.0 / params.fps as f64;
    let duration_ms = composer.timeline_duration_ms();
    let total_frames = (duration_ms as f64 / frame_step_ms).ceil().max(1.0) as u64;

    info!(
        "export: {}x{} @ {}fps, {} frames to {}",
        params.width,
        params.height,
        params.fps,
        total_frames,
        output_path.display()
    );

    let (frame_tx, frame_rx) = bounded::<RgbaImage>(ENCODE_QUEUE_DEPTH);
    let encode_worker: JoinHandle<NscResult<Box<dyn FrameEncoder>>> = std::thread::Builder::new()
        .name("nsc-encode".to_string())
        .spawn(move || {
            for frame in frame_rx.iter() {
                encoder.write_frame(&frame)?;
            }
            Ok(encoder)
        })
        .map_err(|e| NscError::ExportError(format!("Failed to spawn encode thread: {e}")))?;

    let background = request.project.settings.background.clone();
    let mut compose_error: Option<NscError> = None;
    let mut cancelled = false;

    for frame_idx in 0..total_frames {
        if cancel.load(Ordering::SeqCst) {
            cancelled = true;
            break;
        }

        let timeline_ts = frame_idx as f64 * frame_step_ms;
        let media_ts = composer.timeline_to_media(timeline_ts).max(0.0).round() as u64;

        let source_frame = match source.frame_at(media_ts) {
            Ok(frame) => frame,
            Err(err) => {
                compose_error = Some(err);
                break;
            }
        };
        let composed = composer.sample(timeline_ts);
        let rendered = compose_frame(
            &source_frame,
            &composed,
            params.width,
            params.height,
            &background,
            true,
        );

        if frame_tx.send(rendered).is_err() {
            // Encoder thread bailed; its error surfaces on join.
            break;
        }

        if frame_idx % PROGRESS_EVERY_FRAMES == 0 {
            let progress = frame_idx as f64 / total_frames as f64;
            status.update(|state| {
                state.progress = progress;
                state.message = format!("Exporting... {}%", (progress * 100.0).round() as u32);
            });
        }
    }

    drop(frame_tx);
    let encode_result = encode_worker
        .join()
        .map_err(|_| NscError::ExportError("Encode thread panicked".to_string()))?;

    if cancelled {
        // Tear the encoder down without finishing and drop the partial
        // output.
        drop(encode_result);
        if output_path.exists() {
            if let Err(err) = std::fs::remove_file(&output_path) {
                warn!("export: failed to remove partial output: {err}");
            }
        }
        return Err(NscError::Cancelled);
    }

    if let Some(err) = compose_error {
        return Err(err);
    }

    let mut encoder = encode_result?;
    encoder.finish()?;
    Ok(output_path)
}
