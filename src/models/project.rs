//! Project schema (`project.json`).
//!
//! The project is the single mutable aggregate during editing; camera
//! tracks, timeline visuals and cursor tracks are all rebuilt from it and
//! never persisted. `timeline.zoomSegments` is regenerated by the smart
//! camera engine after a stop, then edited by hand; manual edits clear
//! `isAuto`.

use serde::{Deserialize, Serialize};

use crate::error::{NscError, NscResult};
use crate::geometry::NormalizedRect;

pub const SCHEMA_VERSION: u32 = 1;

/// Shortest segment the timeline accepts, ms.
pub const MIN_SEGMENT_MS: u64 = 200;

/// Enforced separation between consecutive segments, ms.
pub const MIN_SEGMENT_GAP_MS: u64 = 200;

/// Per-segment spring parameters for the camera integrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSpring {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for CameraSpring {
    fn default() -> Self {
        CameraSpring {
            mass: 1.0,
            stiffness: 170.0,
            damping: 26.0,
        }
    }
}

impl CameraSpring {
    /// Sanitized copy with positive mass/stiffness and non-negative
    /// damping, so the integrator never divides by zero.
    pub fn sanitized(&self) -> CameraSpring {
        CameraSpring {
            mass: if self.mass.is_finite() { self.mass.max(1e-3) } else { 1.0 },
            stiffness: if self.stiffness.is_finite() {
                self.stiffness.max(1e-3)
            } else {
                170.0
            },
            damping: if self.damping.is_finite() {
                self.damping.max(0.0)
            } else {
                26.0
            },
        }
    }
}

/// Timed camera target inside a segment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPoint {
    pub ts: u64,
    pub rect: NormalizedRect,
}

/// Legacy pan keyframe. Only read for migration; never written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanKeyframe {
    pub ts: u64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// How a segment's target evolves over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoomMode {
    /// Target stays at `initialRect`; `targetPoints` is empty.
    Fixed,
    /// Target tracks the cursor; the follow generator owns `targetPoints`.
    FollowCursor,
}

/// What created a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoomTrigger {
    AutoClick,
    AutoScroll,
    Manual,
}

fn default_rect() -> NormalizedRect {
    NormalizedRect::FULL
}

fn default_mode() -> ZoomMode {
    ZoomMode::Fixed
}

fn default_trigger() -> ZoomTrigger {
    ZoomTrigger::Manual
}

/// One zoom segment on the timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomSegment {
    pub id: String,
    /// Segment start, ms from recording start.
    pub start_ts: u64,
    /// Segment end, ms.
    pub end_ts: u64,
    /// Viewport the segment opens with.
    #[serde(default = "default_rect", alias = "targetRect")]
    pub initial_rect: NormalizedRect,
    #[serde(default)]
    pub target_points: Vec<TargetPoint>,
    #[serde(default)]
    pub spring: CameraSpring,
    /// Deprecated scroll-pan keyframes. Migrated into `targetPoints` on
    /// load and dropped on save.
    #[serde(default, skip_serializing)]
    pub pan_trajectory: Vec<PanKeyframe>,
    /// Missing in pre-targetPoints project files; those segments read as
    /// fixed until migration decides otherwise.
    #[serde(default = "default_mode")]
    pub mode: ZoomMode,
    #[serde(default = "default_trigger")]
    pub trigger: ZoomTrigger,
    /// true when produced by the engine, false once edited by hand.
    #[serde(default)]
    pub is_auto: bool,
}

impl ZoomSegment {
    /// Fresh manual segment for the editor's add-zoom action.
    pub fn manual(start_ts: u64, end_ts: u64, rect: NormalizedRect) -> ZoomSegment {
        ZoomSegment {
            id: format!("manual-{}", uuid::Uuid::new_v4()),
            start_ts,
            end_ts,
            initial_rect: rect.clamped(),
            target_points: Vec::new(),
            spring: CameraSpring::default(),
            pan_trajectory: Vec::new(),
            mode: ZoomMode::Fixed,
            trigger: ZoomTrigger::Manual,
            is_auto: false,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ts.saturating_sub(self.start_ts)
    }

    /// Convert a legacy `panTrajectory` into target points over
    /// `initialRect` and clear it. No-op when the segment already has
    /// target points or no trajectory.
    pub fn migrate_legacy_pan(&mut self) {
        if self.pan_trajectory.is_empty() {
            return;
        }
        if self.target_points.is_empty() {
            let base = self.initial_rect.clamped();
            let mut keyframes = std::mem::take(&mut self.pan_trajectory);
            keyframes.sort_by_key(|keyframe| keyframe.ts);

            let mut points = Vec::with_capacity(keyframes.len() + 1);
            points.push(TargetPoint {
                ts: self.start_ts,
                rect: base,
            });
            for keyframe in keyframes {
                if keyframe.ts < self.start_ts || keyframe.ts > self.end_ts {
                    continue;
                }
                let rect = NormalizedRect {
                    x: (base.x + keyframe.offset_x).clamp(0.0, 1.0 - base.width),
                    y: (base.y + keyframe.offset_y).clamp(0.0, 1.0 - base.height),
                    width: base.width,
                    height: base.height,
                };
                if let Some(last) = points.last_mut() {
                    if last.ts == keyframe.ts {
                        last.rect = rect;
                        continue;
                    }
                }
                points.push(TargetPoint { ts: keyframe.ts, rect });
            }
            self.target_points = points;
            // A panning segment cannot stay in fixed mode: fixed forbids
            // target points.
            if self.mode == ZoomMode::Fixed {
                self.mode = ZoomMode::FollowCursor;
            }
        }
        self.pan_trajectory.clear();
    }
}

/// Timeline of the project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub zoom_segments: Vec<ZoomSegment>,
}

/// Cursor rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorSettings {
    /// Relative cursor size (1.0 = normal).
    pub size: f64,
    pub color: String,
    /// 0.0 = raw path, 1.0 = maximum smoothing.
    pub smoothing_factor: f64,
}

impl Default for CursorSettings {
    fn default() -> Self {
        CursorSettings {
            size: 1.0,
            color: "#FFFFFF".to_string(),
            smoothing_factor: 0.8,
        }
    }
}

/// Background fill behind letterboxed frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Background {
    Solid {
        color: String,
    },
    Gradient {
        from: String,
        to: String,
        direction: String,
    },
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid {
            color: "#1a1a2e".to_string(),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub codec: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            width: 1920,
            height: 1080,
            fps: 30,
            codec: "h264".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub cursor: CursorSettings,
    pub background: Background,
    pub export: ExportSettings,
}

/// Root object of `project.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub schema_version: u32,
    pub id: String,
    pub name: String,
    /// Unix timestamp (ms) of project creation.
    pub created_at: u64,
    /// Raw video path, relative to the project folder.
    pub video_path: String,
    /// Events file path, relative to the project folder.
    pub events_path: String,
    /// Recorded duration (ms). May differ slightly from the decoded video.
    pub duration_ms: u64,
    /// Captured video resolution.
    pub video_width: u32,
    pub video_height: u32,
    pub timeline: Timeline,
    pub settings: ProjectSettings,
}

impl Project {
    /// Parse from JSON text, migrate legacy fields, validate. Fails whole
    /// on a schema or invariant problem.
    pub fn from_json(json: &str) -> NscResult<Self> {
        let mut project: Project = serde_json::from_str(json)?;
        project.migrate_legacy();
        project.validate()?;
        Ok(project)
    }

    /// Translate deprecated fields into their current representation.
    pub fn migrate_legacy(&mut self) {
        for segment in &mut self.timeline.zoom_segments {
            segment.migrate_legacy_pan();
        }
    }

    /// Output aspect ratio of the captured video.
    pub fn output_aspect(&self) -> f64 {
        self.video_width.max(1) as f64 / self.video_height.max(1) as f64
    }

    /// Check schema version, rect bounds, segment ordering and target
    /// point placement. Called on load and on each edit commit.
    pub fn validate(&self) -> NscResult<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(NscError::SchemaMismatch(format!(
                "project.json: expected schemaVersion {}, got {}",
                SCHEMA_VERSION, self.schema_version
            )));
        }
        if self.duration_ms == 0 {
            return Err(NscError::InvariantViolation(
                "project.json: durationMs must be positive".to_string(),
            ));
        }

        let mut prev_end: Option<(u64, &str)> = None;
        for segment in &self.timeline.zoom_segments {
            if segment.end_ts <= segment.start_ts {
                return Err(NscError::InvariantViolation(format!(
                    "segment {}: empty time range [{}, {}]",
                    segment.id, segment.start_ts, segment.end_ts
                )));
            }
            if segment.end_ts > self.duration_ms + 1 {
                return Err(NscError::InvariantViolation(format!(
                    "segment {}: ends at {} beyond duration {}",
                    segment.id, segment.end_ts, self.duration_ms
                )));
            }
            if !segment.initial_rect.is_valid() {
                return Err(NscError::InvariantViolation(format!(
                    "segment {}: initialRect out of range",
                    segment.id
                )));
            }
            if segment.mode == ZoomMode::Fixed && !segment.target_points.is_empty() {
                return Err(NscError::InvariantViolation(format!(
                    "segment {}: fixed mode with target points",
                    segment.id
                )));
            }
            for point in &segment.target_points {
                if point.ts < segment.start_ts || point.ts > segment.end_ts {
                    return Err(NscError::InvariantViolation(format!(
                        "segment {}: target point at {} outside [{}, {}]",
                        segment.id, point.ts, segment.start_ts, segment.end_ts
                    )));
                }
                if !point.rect.is_valid() {
                    return Err(NscError::InvariantViolation(format!(
                        "segment {}: target point rect out of range",
                        segment.id
                    )));
                }
            }
            if let Some((end, prev_id)) = prev_end {
                if segment.start_ts < end {
                    return Err(NscError::InvariantViolation(format!(
                        "segments {} and {} overlap",
                        prev_id, segment.id
                    )));
                }
            }
            prev_end = Some((segment.end_ts, segment.id.as_str()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: &str, start: u64, end: u64) -> ZoomSegment {
        ZoomSegment {
            id: id.to_string(),
            start_ts: start,
            end_ts: end,
            initial_rect: NormalizedRect::from_center(0.5, 0.5, 0.5, 0.5),
            target_points: Vec::new(),
            spring: CameraSpring::default(),
            pan_trajectory: Vec::new(),
            mode: ZoomMode::Fixed,
            trigger: ZoomTrigger::Manual,
            is_auto: false,
        }
    }

    fn project(segments: Vec<ZoomSegment>) -> Project {
        Project {
            schema_version: SCHEMA_VERSION,
            id: "9f9d3a70-0000-4000-8000-000000000001".to_string(),
            name: "demo".to_string(),
            created_at: 1_700_000_000_000,
            video_path: "raw.mp4".to_string(),
            events_path: "events.json".to_string(),
            duration_ms: 10_000,
            video_width: 1_920,
            video_height: 1_080,
            timeline: Timeline {
                zoom_segments: segments,
            },
            settings: ProjectSettings::default(),
        }
    }

    #[test]
    fn manual_segments_get_unique_ids() {
        let rect = NormalizedRect::from_center(0.5, 0.5, 0.5, 0.5);
        let a = ZoomSegment::manual(1_000, 2_600, rect);
        let b = ZoomSegment::manual(1_000, 2_600, rect);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("manual-"));
        assert!(!a.is_auto);
        assert_eq!(a.mode, ZoomMode::Fixed);
    }

    #[test]
    fn default_spring_matches_contract() {
        let spring = CameraSpring::default();
        assert_eq!(spring.mass, 1.0);
        assert_eq!(spring.stiffness, 170.0);
        assert_eq!(spring.damping, 26.0);
    }

    #[test]
    fn validate_accepts_ordered_segments() {
        let p = project(vec![segment("a", 1_000, 3_000), segment("b", 4_000, 6_000)]);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn validate_rejects_overlap() {
        let p = project(vec![segment("a", 1_000, 3_000), segment("b", 2_500, 6_000)]);
        assert!(matches!(
            p.validate(),
            Err(NscError::InvariantViolation(_))
        ));
    }

    #[test]
    fn validate_rejects_fixed_mode_with_points() {
        let mut bad = segment("a", 1_000, 3_000);
        bad.target_points.push(TargetPoint {
            ts: 1_500,
            rect: NormalizedRect::FULL,
        });
        let p = project(vec![bad]);
        assert!(p.validate().is_err());
    }

    #[test]
    fn legacy_pan_trajectory_migrates_to_target_points() {
        let json = r#"{
            "id": "auto-1",
            "startTs": 1000,
            "endTs": 3000,
            "initialRect": {"x": 0.2, "y": 0.2, "width": 0.5, "height": 0.5},
            "panTrajectory": [
                {"ts": 1000, "offsetX": 0.0, "offsetY": 0.0},
                {"ts": 2000, "offsetY": 0.1, "offsetX": 0.0}
            ],
            "mode": "follow-cursor",
            "trigger": "auto-scroll",
            "isAuto": true
        }"#;

        let mut seg: ZoomSegment = serde_json::from_str(json).expect("parse legacy segment");
        seg.migrate_legacy_pan();

        assert!(seg.pan_trajectory.is_empty());
        assert_eq!(seg.target_points.len(), 2);
        assert!((seg.target_points[1].rect.y - 0.3).abs() < 1e-9);

        // Writers must not re-emit the legacy field.
        let out = serde_json::to_string(&seg).expect("serialize segment");
        assert!(!out.contains("panTrajectory"));
        assert!(out.contains("targetPoints"));
    }

    #[test]
    fn migration_is_idempotent_and_respects_existing_points() {
        let mut seg = segment("a", 1_000, 3_000);
        seg.mode = ZoomMode::FollowCursor;
        seg.target_points.push(TargetPoint {
            ts: 1_000,
            rect: seg.initial_rect,
        });
        seg.pan_trajectory.push(PanKeyframe {
            ts: 1_500,
            offset_x: 0.2,
            offset_y: 0.0,
        });

        seg.migrate_legacy_pan();
        assert_eq!(seg.target_points.len(), 1, "existing points win");
        assert!(seg.pan_trajectory.is_empty());
    }

    #[test]
    fn project_round_trip_preserves_camel_case() {
        let p = project(vec![segment("a", 1_000, 3_000)]);
        let json = serde_json::to_string(&p).expect("serialize project");
        assert!(json.contains("\"schemaVersion\""));
        assert!(json.contains("\"zoomSegments\""));
        assert!(json.contains("\"smoothingFactor\""));

        let back = Project::from_json(&json).expect("parse project");
        assert_eq!(back.timeline.zoom_segments.len(), 1);
    }
}
