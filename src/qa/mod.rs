//! Smoke checks over persisted project documents.
//!
//! This is the QA surface, not the user shell: it verifies a project
//! folder's `project.json` and `events.json` against the documented
//! invariants and reports findings by severity. The checks recover
//! nothing; they only observe.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::error::{NscError, NscResult};
use crate::models::events::{EventsFile, SCHEMA_VERSION as EVENTS_SCHEMA_VERSION};
use crate::models::project::{Project, SCHEMA_VERSION as PROJECT_SCHEMA_VERSION};

/// Duration drift beyond this fraction of `durationMs` is critical.
pub const DRIFT_CRITICAL_RATIO: f64 = 0.25;

/// Duration drift beyond this fraction is a warning.
pub const DRIFT_WARNING_RATIO: f64 = 0.08;

/// Negative coordinate tolerance, physical pixels.
const COORD_NEGATIVE_TOLERANCE_PX: f64 = 2.0;

/// Coordinates may exceed the screen by this factor before failing.
const COORD_OVERSHOOT_RATIO: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

/// One failed check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub check: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Outcome of a smoke run over one project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmokeReport {
    pub project_file: PathBuf,
    pub findings: Vec<Finding>,
}

impl SmokeReport {
    /// True when no critical finding was recorded. Warnings pass.
    pub fn passed(&self) -> bool {
        self.findings
            .iter()
            .all(|finding| finding.severity != Severity::Critical)
    }

    fn fail(&mut self, check: &'static str, message: String) {
        self.findings.push(Finding {
            check,
            severity: Severity::Critical,
            message,
        });
    }

    fn warn(&mut self, check: &'static str, message: String) {
        self.findings.push(Finding {
            check,
            severity: Severity::Warning,
            message,
        });
    }
}

/// Resolve a `--project` argument to the project file: either the file
/// itself or a directory containing `project.json`.
pub fn resolve_project_file(path: &Path) -> NscResult<PathBuf> {
    if path.is_dir() {
        let candidate = path.join("project.json");
        if candidate.is_file() {
            return Ok(candidate);
        }
        return Err(NscError::ResourceUnavailable(format!(
            "no project.json under {}",
            path.display()
        )));
    }
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    Err(NscError::ResourceUnavailable(format!(
        "project path does not exist: {}",
        path.display()
    )))
}

/// Project folders under a root, identified by a `project.json` inside.
pub fn discover_projects(root: &Path) -> NscResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let candidate = entry.path().join("project.json");
        if candidate.is_file() {
            found.push(candidate);
        }
    }
    found.sort();
    Ok(found)
}

/// Run every check against one project file.
pub fn run_smoke_check(project_path: &Path, check_export: bool) -> NscResult<SmokeReport> {
    let project_file = resolve_project_file(project_path)?;
    let project_dir = project_file
        .parent()
        .ok_or_else(|| NscError::ResourceUnavailable("project file has no parent".to_string()))?;

    let mut report = SmokeReport {
        project_file: project_file.clone(),
        findings: Vec::new(),
    };

    let project_json = std::fs::read_to_string(&project_file)?;
    let mut project: Project = match serde_json::from_str(&project_json) {
        Ok(project) => project,
        Err(err) => {
            report.fail("project-parse", format!("project.json does not parse: {err}"));
            return Ok(report);
        }
    };
    project.migrate_legacy();

    let events_file = project_dir.join(&project.events_path);
    let events: Option<EventsFile> = match std::fs::read_to_string(&events_file) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(events) => Some(events),
            Err(err) => {
                report.fail("events-parse", format!("events.json does not parse: {err}"));
                None
            }
        },
        Err(err) => {
            report.fail(
                "events-read",
                format!("cannot read {}: {err}", events_file.display()),
            );
            None
        }
    };

    check_project(&project, &mut report);
    if let Some(events) = &events {
        check_events(&project, events, &mut report);
    }
    if check_export {
        check_export_settings(&project, &mut report);
    }

    if report.passed() {
        info!("smoke check passed: {}", project_file.display());
    } else {
        warn!(
            "smoke check failed: {} ({} findings)",
            project_file.display(),
            report.findings.len()
        );
    }
    Ok(report)
}

fn check_project(project: &Project, report: &mut SmokeReport) {
    if project.schema_version != PROJECT_SCHEMA_VERSION {
        report.fail(
            "project-schema",
            format!(
                "expected schemaVersion {PROJECT_SCHEMA_VERSION}, got {}",
                project.schema_version
            ),
        );
    }
    if project.duration_ms == 0 {
        report.fail("project-duration", "durationMs is zero".to_string());
    }

    let mut prev: Option<(&str, u64)> = None;
    for segment in &project.timeline.zoom_segments {
        if !segment.initial_rect.is_valid() {
            report.fail(
                "segment-rect",
                format!("segment {}: initialRect outside the unit square", segment.id),
            );
        }
        for point in &segment.target_points {
            if !point.rect.is_valid() {
                report.fail(
                    "segment-rect",
                    format!("segment {}: target point rect outside the unit square", segment.id),
                );
                break;
            }
        }
        if segment.end_ts <= segment.start_ts {
            report.fail(
                "segment-times",
                format!("segment {}: empty range", segment.id),
            );
        }
        if segment.end_ts > project.duration_ms + 1 {
            report.fail(
                "segment-times",
                format!(
                    "segment {}: ends at {} beyond duration {}",
                    segment.id, segment.end_ts, project.duration_ms
                ),
            );
        }
        if let Some((prev_id, prev_end)) = prev {
            if segment.start_ts < prev_end {
                report.fail(
                    "segment-order",
                    format!("segments {prev_id} and {} overlap", segment.id),
                );
            }
        }
        prev = Some((segment.id.as_str(), segment.end_ts));
    }
}

fn check_events(project: &Project, events: &EventsFile, report: &mut SmokeReport) {
    if events.is_capture_shortfall() {
        report.warn(
            "capture-shortfall",
            "event stream carries no pointer coordinates; no auto zoom will be generated"
                .to_string(),
        );
    }
    if events.schema_version != EVENTS_SCHEMA_VERSION {
        report.fail(
            "events-schema",
            format!(
                "expected schemaVersion {EVENTS_SCHEMA_VERSION}, got {}",
                events.schema_version
            ),
        );
    }
    if events.recording_id != project.id {
        report.fail(
            "recording-id",
            format!(
                "events recordingId {} does not match project id {}",
                events.recording_id, project.id
            ),
        );
    }

    let mut last_ts = 0u64;
    for (idx, event) in events.events.iter().enumerate() {
        let ts = event.ts();
        if ts < last_ts {
            report.fail(
                "event-order",
                format!("event {idx} goes back in time ({ts} < {last_ts})"),
            );
            break;
        }
        last_ts = ts;
    }

    let width = events.screen_width as f64;
    let height = events.screen_height as f64;
    let scale = events.scale_factor.max(0.1);
    for (idx, event) in events.events.iter().enumerate() {
        let Some((x, y)) = event.position() else {
            continue;
        };
        if !coord_in_bounds(x, width, scale) || !coord_in_bounds(y, height, scale) {
            report.fail(
                "cursor-bounds",
                format!("event {idx} at ({x}, {y}) outside {width}x{height} (scale {scale})"),
            );
            break;
        }
    }

    // Drift between the recorded duration and the last event timestamp.
    if project.duration_ms > 0 {
        if let Some(last) = events.events.last() {
            let drift = (last.ts() as f64 - project.duration_ms as f64).abs()
                / project.duration_ms as f64;
            if drift > DRIFT_CRITICAL_RATIO {
                report.fail(
                    "duration-drift",
                    format!("event log drifts {:.0}% from durationMs", drift * 100.0),
                );
            } else if drift > DRIFT_WARNING_RATIO {
                report.warn(
                    "duration-drift",
                    format!("event log drifts {:.0}% from durationMs", drift * 100.0),
                );
            }
        }
    }
}

/// A coordinate passes when it is not meaningfully negative and fits the
/// screen, directly or after DPI scaling (capture may have written
/// logical coordinates).
fn coord_in_bounds(value: f64, dim: f64, scale: f64) -> bool {
    if value < -COORD_NEGATIVE_TOLERANCE_PX {
        return false;
    }
    let limit = dim * COORD_OVERSHOOT_RATIO;
    value <= limit || value * scale <= limit
}

fn check_export_settings(project: &Project, report: &mut SmokeReport) {
    let export = &project.settings.export;
    if !(320..=7_680).contains(&export.width) || !(240..=4_320).contains(&export.height) {
        report.fail(
            "export-resolution",
            format!("{}x{} outside supported range", export.width, export.height),
        );
    }
    if export.width % 2 != 0 || export.height % 2 != 0 {
        report.fail(
            "export-resolution",
            format!("{}x{} must be even for the encoder", export.width, export.height),
        );
    }
    if !(10..=120).contains(&export.fps) {
        report.fail("export-fps", format!("fps {} outside 10..=120", export.fps));
    }
    if !matches!(export.codec.as_str(), "h264" | "h265" | "vp9") {
        report.fail("export-codec", format!("unsupported codec {}", export.codec));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NormalizedRect;
    use crate::models::events::InputEvent;
    use crate::models::project::{
        CameraSpring, ProjectSettings, Timeline, ZoomMode, ZoomSegment, ZoomTrigger,
    };

    fn project() -> Project {
        Project {
            schema_version: PROJECT_SCHEMA_VERSION,
            id: "rec-1".to_string(),
            name: "demo".to_string(),
            created_at: 0,
            video_path: "raw.mp4".to_string(),
            events_path: "events.json".to_string(),
            duration_ms: 10_000,
            video_width: 1_920,
            video_height: 1_080,
            timeline: Timeline::default(),
            settings: ProjectSettings::default(),
        }
    }

    fn events(event_list: Vec<InputEvent>) -> EventsFile {
        EventsFile {
            schema_version: EVENTS_SCHEMA_VERSION,
            recording_id: "rec-1".to_string(),
            start_time_ms: 0,
            screen_width: 1_920,
            screen_height: 1_080,
            scale_factor: 1.25,
            events: event_list,
        }
    }

    fn write_pair(dir: &Path, project: &Project, events: &EventsFile) -> PathBuf {
        let file = dir.join("project.json");
        std::fs::write(&file, serde_json::to_string_pretty(project).unwrap()).unwrap();
        std::fs::write(
            dir.join("events.json"),
            serde_json::to_string_pretty(events).unwrap(),
        )
        .unwrap();
        file
    }

    fn move_event(ts: u64, x: f64, y: f64) -> InputEvent {
        InputEvent::Move { ts, x, y }
    }

    #[test]
    fn healthy_project_passes() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_pair(
            dir.path(),
            &project(),
            &events(vec![
                move_event(100, 10.0, 10.0),
                move_event(9_900, 1_900.0, 1_000.0),
            ]),
        );

        let report = run_smoke_check(&file, true).unwrap();
        assert!(report.passed(), "findings: {:?}", report.findings);
    }

    #[test]
    fn id_mismatch_is_critical() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad_events = events(vec![move_event(100, 10.0, 10.0)]);
        bad_events.recording_id = "other".to_string();
        let file = write_pair(dir.path(), &project(), &bad_events);

        let report = run_smoke_check(&file, false).unwrap();
        assert!(!report.passed());
        assert!(report.findings.iter().any(|f| f.check == "recording-id"));
    }

    #[test]
    fn non_monotonic_events_fail() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_pair(
            dir.path(),
            &project(),
            &events(vec![move_event(500, 1.0, 1.0), move_event(400, 2.0, 2.0)]),
        );

        let report = run_smoke_check(&file, false).unwrap();
        assert!(report.findings.iter().any(|f| f.check == "event-order"));
    }

    #[test]
    fn dpi_scaled_coordinates_are_tolerated() {
        // 2016 = 1920 x 1.05 is the overshoot limit.
        assert!(coord_in_bounds(2_000.0, 1_920.0, 1.25));
        assert!(coord_in_bounds(-1.5, 1_920.0, 1.0));
        assert!(!coord_in_bounds(-5.0, 1_920.0, 1.0));
        assert!(!coord_in_bounds(3_000.0, 1_920.0, 1.0));
    }

    #[test]
    fn segment_beyond_duration_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = project();
        bad.timeline.zoom_segments.push(ZoomSegment {
            id: "z1".to_string(),
            start_ts: 9_000,
            end_ts: 12_000,
            initial_rect: NormalizedRect::from_center(0.5, 0.5, 0.5, 0.5),
            target_points: Vec::new(),
            spring: CameraSpring::default(),
            pan_trajectory: Vec::new(),
            mode: ZoomMode::Fixed,
            trigger: ZoomTrigger::Manual,
            is_auto: false,
        });
        let file = write_pair(dir.path(), &bad, &events(vec![move_event(100, 1.0, 1.0)]));

        let report = run_smoke_check(&file, false).unwrap();
        assert!(report.findings.iter().any(|f| f.check == "segment-times"));
    }

    #[test]
    fn duration_drift_grades_by_ratio() {
        let dir = tempfile::tempdir().unwrap();

        // 12% drift: warning only.
        let file = write_pair(
            dir.path(),
            &project(),
            &events(vec![move_event(8_800, 1.0, 1.0)]),
        );
        let report = run_smoke_check(&file, false).unwrap();
        assert!(report.passed());
        assert!(report
            .findings
            .iter()
            .any(|f| f.check == "duration-drift" && f.severity == Severity::Warning));

        // 40% drift: critical.
        let file = write_pair(
            dir.path(),
            &project(),
            &events(vec![move_event(6_000, 1.0, 1.0)]),
        );
        let report = run_smoke_check(&file, false).unwrap();
        assert!(!report.passed());
    }

    #[test]
    fn export_checks_run_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = project();
        bad.settings.export.codec = "prores".to_string();
        let file = write_pair(dir.path(), &bad, &events(vec![move_event(9_900, 1.0, 1.0)]));

        let without = run_smoke_check(&file, false).unwrap();
        assert!(without.passed());

        let with = run_smoke_check(&file, true).unwrap();
        assert!(!with.passed());
        assert!(with.findings.iter().any(|f| f.check == "export-codec"));
    }

    #[test]
    fn discover_projects_finds_project_folders() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("alpha");
        let b = dir.path().join("beta");
        let c = dir.path().join("not-a-project");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        std::fs::create_dir_all(&c).unwrap();
        std::fs::write(a.join("project.json"), "{}").unwrap();
        std::fs::write(b.join("project.json"), "{}").unwrap();

        let found = discover_projects(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
    }
}
