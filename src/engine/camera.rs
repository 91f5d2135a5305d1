//! The camera state machine.
//!
//! Two states: `FreeRoam` (camera at full frame) and `LockedFocus`
//! (camera framing a clicked target). Click clusters lock the camera,
//! retargets move it while locked, idle time or sustained scrolling
//! release it. The machine runs once per stop over the finalized log;
//! its states are never persisted, only the segments it closes.

use log::{debug, warn};

use crate::cursor::CursorTrack;
use crate::geometry::NormalizedRect;
use crate::models::events::{EventsFile, InputEvent};
use crate::models::project::{ZoomMode, ZoomSegment, ZoomTrigger};
use crate::timeline::segments::{enforce_non_overlap, trim_auto_noop};

use super::cluster::{cluster_clicks, collect_clicks, eligible_clicks, FocusCluster};
use super::config::SmartCameraConfig;
use super::focus::{footprint_contained, semantic_focus};
use super::follow::{generate_target_points, FocusStep};

/// Regenerate a project's auto segments after a recording stops.
///
/// Wires the smoothed cursor track and the project's output aspect into
/// the engine pass. Manual segments are the editor's business and are
/// not touched here; callers replace only the auto portion of the
/// timeline.
pub fn regenerate_auto_segments(
    project: &crate::models::project::Project,
    events: &EventsFile,
    config: &SmartCameraConfig,
) -> Vec<ZoomSegment> {
    let cursor = CursorTrack::build(events, project.settings.cursor.smoothing_factor);
    build_auto_segments(
        events,
        &cursor,
        project.duration_ms,
        project.output_aspect(),
        config,
    )
}

/// Build the auto zoom segments for a recording.
///
/// `cursor` is the smoothed track the follow generator pans against;
/// `output_aspect` is `videoWidth / videoHeight` of the project. The
/// result is sorted, non-overlapping, trimmed, and carries `auto-N` ids.
pub fn build_auto_segments(
    events: &EventsFile,
    cursor: &CursorTrack,
    duration_ms: u64,
    output_aspect: f64,
    config: &SmartCameraConfig,
) -> Vec<ZoomSegment> {
    if duration_ms == 0 {
        return Vec::new();
    }
    if events.is_capture_shortfall() {
        warn!("camera engine: event stream has no usable coordinates, emitting no segments");
        return Vec::new();
    }

    let clicks = collect_clicks(events);
    let eligible = eligible_clicks(&clicks, config);
    let clusters = cluster_clicks(&eligible, config.cluster_gap_ms.max(1));
    let speeds = cursor_speeds(events);

    let mut machine = Machine::new(events, duration_ms, output_aspect, config);

    // Merge clusters (keyed on their anchors) and scrolls into one
    // time-ordered pass.
    let mut cluster_idx = 0usize;
    for event in &events.events {
        while cluster_idx < clusters.len() && clusters[cluster_idx].anchor_ts() <= event.ts() {
            machine.on_cluster(&clusters[cluster_idx], &speeds);
            cluster_idx += 1;
        }
        if let InputEvent::Scroll { ts, delta, .. } = event {
            machine.on_scroll(*ts, delta.dy);
        }
    }
    for cluster in &clusters[cluster_idx.min(clusters.len())..] {
        machine.on_cluster(cluster, &speeds);
    }

    let raw_segments = machine.finish(cursor);

    let trimmed: Vec<ZoomSegment> = raw_segments.into_iter().filter_map(trim_auto_noop).collect();
    let mut segments = enforce_non_overlap(trimmed, duration_ms);
    for (idx, segment) in segments.iter_mut().enumerate() {
        segment.id = format!("auto-{}", idx + 1);
    }
    segments
}

/// Cursor speed right after each pointer sample, px/s.
#[derive(Debug, Clone, Copy)]
struct SpeedSample {
    ts: u64,
    px_per_s: f64,
}

fn cursor_speeds(events: &EventsFile) -> Vec<SpeedSample> {
    let mut positions: Vec<(u64, f64, f64)> = events
        .events
        .iter()
        .filter_map(|event| event.position().map(|(x, y)| (event.ts(), x, y)))
        .collect();
    positions.sort_by_key(|(ts, _, _)| *ts);

    let mut speeds = Vec::with_capacity(positions.len().saturating_sub(1));
    for pair in positions.windows(2) {
        let (t0, x0, y0) = pair[0];
        let (t1, x1, y1) = pair[1];
        let dt_ms = t1.saturating_sub(t0);
        if dt_ms == 0 {
            continue;
        }
        let distance = (x1 - x0).hypot(y1 - y0);
        speeds.push(SpeedSample {
            ts: t1,
            px_per_s: distance / (dt_ms as f64 / 1_000.0),
        });
    }
    speeds
}

/// Pre-roll start for a cluster anchored at `anchor_ts`: the earliest
/// time in the lookback window where the cursor slowed under the
/// threshold and stayed slow through the anchor. Zero pre-roll when the
/// cursor was still fast at the anchor.
fn preroll_start(anchor_ts: u64, speeds: &[SpeedSample], config: &SmartCameraConfig) -> u64 {
    let window_start = anchor_ts.saturating_sub(config.pre_roll_ms);
    let in_window: Vec<SpeedSample> = speeds
        .iter()
        .copied()
        .filter(|sample| sample.ts >= window_start && sample.ts <= anchor_ts)
        .collect();

    if in_window.is_empty() {
        return anchor_ts;
    }

    let threshold = config.slowdown_px_per_s.max(0.0);
    let mut slow_since: Option<u64> = None;
    for sample in &in_window {
        if sample.px_per_s < threshold {
            slow_since.get_or_insert(sample.ts);
        } else {
            slow_since = None;
        }
    }
    slow_since.map(|ts| ts.min(anchor_ts)).unwrap_or(anchor_ts)
}

/// Scroll session accounting for the forced zoom-out rule.
#[derive(Debug, Clone, Copy)]
struct ScrollSession {
    start_ts: u64,
    last_ts: u64,
    accum_abs_dy: f64,
}

/// Everything the machine tracks while the camera is locked.
#[derive(Debug, Clone)]
struct LockState {
    start_ts: u64,
    focus_timeline: Vec<FocusStep>,
    /// Last eligible activity; the lock idles out this much later.
    activity_ts: u64,
    last_retarget_ts: u64,
    scroll: Option<ScrollSession>,
}

impl LockState {
    fn current_rect(&self) -> NormalizedRect {
        self.focus_timeline
            .last()
            .map(|step| step.rect)
            .expect("lock state always has an initial focus step")
    }

    fn idle_deadline(&self, config: &SmartCameraConfig) -> u64 {
        self.activity_ts.saturating_add(config.idle_timeout_ms)
    }
}

struct Machine<'a> {
    events: &'a EventsFile,
    duration_ms: u64,
    output_aspect: f64,
    config: &'a SmartCameraConfig,
    lock: Option<LockState>,
    last_auto_start: Option<u64>,
    closed: Vec<(LockState, u64)>,
}

impl<'a> Machine<'a> {
    fn new(
        events: &'a EventsFile,
        duration_ms: u64,
        output_aspect: f64,
        config: &'a SmartCameraConfig,
    ) -> Self {
        Machine {
            events,
            duration_ms,
            output_aspect,
            config,
            lock: None,
            last_auto_start: None,
            closed: Vec::new(),
        }
    }

    /// Release the lock if it idled out before `now`.
    fn expire_idle(&mut self, now: u64) {
        let Some(lock) = &self.lock else { return };
        let deadline = lock.idle_deadline(self.config);
        if now > deadline {
            self.close_lock_at(deadline);
        }
    }

    fn on_cluster(&mut self, cluster: &FocusCluster, speeds: &[SpeedSample]) {
        let now = cluster.anchor_ts();
        self.expire_idle(now);

        let focus = semantic_focus(
            cluster,
            self.events.screen_width,
            self.events.screen_height,
            self.output_aspect,
            self.config,
        );

        if let Some(lock) = &mut self.lock {
            lock.activity_ts = now;

            let safe_zone = lock.current_rect().inset(self.config.containment_margin);
            let already_framed = footprint_contained(
                &safe_zone,
                cluster,
                self.events.screen_width,
                self.events.screen_height,
            );
            if already_framed {
                debug!("camera engine: cluster at {now} already framed, holding focus");
                return;
            }
            if now.saturating_sub(lock.last_retarget_ts) < self.config.min_zoom_interval_ms {
                debug!("camera engine: retarget at {now} suppressed by interval");
                return;
            }

            lock.focus_timeline.push(FocusStep { ts: now, rect: focus });
            lock.last_retarget_ts = now;
            return;
        }

        // FreeRoam: a fresh segment needs the anti-spam interval.
        if let Some(last_start) = self.last_auto_start {
            if now.saturating_sub(last_start) < self.config.min_zoom_interval_ms {
                debug!("camera engine: cluster at {now} inside zoom interval lockout");
                return;
            }
        }

        let start_ts = preroll_start(now, speeds, self.config).min(now);
        let start_ts = start_ts.min(self.duration_ms);
        self.lock = Some(LockState {
            start_ts,
            focus_timeline: vec![FocusStep {
                ts: start_ts,
                rect: focus,
            }],
            activity_ts: now,
            last_retarget_ts: now,
            scroll: None,
        });
        self.last_auto_start = Some(now);
    }

    fn on_scroll(&mut self, ts: u64, dy: f64) {
        self.expire_idle(ts);
        let config = self.config;
        let screen_height = self.events.screen_height.max(1) as f64;

        let Some(lock) = &mut self.lock else { return };

        // Scrolling is activity: it keeps the lock alive so the dedicated
        // scroll exit below can be the one to end it.
        lock.activity_ts = ts;

        let session = match lock.scroll {
            Some(session) if ts.saturating_sub(session.last_ts) <= config.scroll_idle_reset_ms => {
                ScrollSession {
                    start_ts: session.start_ts,
                    last_ts: ts,
                    accum_abs_dy: session.accum_abs_dy + dy.abs(),
                }
            }
            _ => ScrollSession {
                start_ts: ts,
                last_ts: ts,
                accum_abs_dy: dy.abs(),
            },
        };
        lock.scroll = Some(session);

        // Shift the framing with the content so the lock follows a short
        // scroll instead of fighting it.
        let rect = lock.current_rect();
        let shift = -normalize_wheel_delta(dy) * config.scroll_shift_ratio * rect.height;
        let (cx, cy) = rect.center();
        let shifted = NormalizedRect::from_center(cx, cy + shift, rect.width, rect.height);
        if shifted.delta(&rect) > 1e-9 {
            match lock.focus_timeline.last_mut() {
                Some(step) if step.ts == ts => step.rect = shifted,
                _ => lock.focus_timeline.push(FocusStep { ts, rect: shifted }),
            }
        }

        let session_len = session.last_ts.saturating_sub(session.start_ts);
        let travel_limit = screen_height * config.scroll_travel_screen_ratio.max(0.0);
        if session_len >= config.scroll_timeout_ms || session.accum_abs_dy >= travel_limit {
            debug!("camera engine: sustained scroll at {ts}, releasing lock");
            self.close_lock_at(ts);
        }
    }

    fn close_lock_at(&mut self, end_ts: u64) {
        if let Some(lock) = self.lock.take() {
            let end = end_ts.min(self.duration_ms);
            if end > lock.start_ts {
                self.closed.push((lock, end));
            }
        }
    }

    /// Close any open lock and materialize the segments.
    fn finish(mut self, cursor: &CursorTrack) -> Vec<ZoomSegment> {
        if let Some(lock) = &self.lock {
            let deadline = lock.idle_deadline(self.config);
            self.close_lock_at(deadline.min(self.duration_ms));
        }

        let mut segments = Vec::with_capacity(self.closed.len());
        for (lock, end_ts) in &self.closed {
            if *end_ts <= lock.start_ts {
                continue;
            }
            let target_points = generate_target_points(
                &lock.focus_timeline,
                lock.start_ts,
                *end_ts,
                cursor,
                self.events.screen_width,
                self.events.screen_height,
                self.config,
            );
            let initial_rect = lock.focus_timeline[0].rect;

            segments.push(ZoomSegment {
                id: String::new(),
                start_ts: lock.start_ts,
                end_ts: *end_ts,
                initial_rect,
                target_points,
                spring: self.config.spring,
                pan_trajectory: Vec::new(),
                mode: ZoomMode::FollowCursor,
                trigger: ZoomTrigger::AutoClick,
                is_auto: true,
            });
        }
        segments
    }
}

/// Normalize a wheel delta: hardware wheels report multiples of 120,
/// trackpads report small per-event values. Either way the result is in
/// "notches", clamped to +-6.
fn normalize_wheel_delta(delta: f64) -> f64 {
    if delta.abs() >= 100.0 {
        (delta / 120.0).clamp(-6.0, 6.0)
    } else {
        delta.clamp(-6.0, 6.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::events::{BoundingRect, MouseButton, ScrollDelta, UiContext, SCHEMA_VERSION};

    fn click(ts: u64, x: f64, y: f64, rect: Option<BoundingRect>) -> InputEvent {
        InputEvent::Click {
            ts,
            x,
            y,
            button: MouseButton::Left,
            ui_context: Some(UiContext {
                app_name: Some("app".to_string()),
                control_name: Some("button".to_string()),
                bounding_rect: rect,
            }),
        }
    }

    fn file(events: Vec<InputEvent>) -> EventsFile {
        EventsFile {
            schema_version: SCHEMA_VERSION,
            recording_id: "rec".to_string(),
            start_time_ms: 0,
            screen_width: 1_920,
            screen_height: 1_080,
            scale_factor: 1.0,
            events,
        }
    }

    fn run(events: EventsFile, duration_ms: u64) -> Vec<ZoomSegment> {
        let cursor = CursorTrack::build(&events, 0.0);
        build_auto_segments(
            &events,
            &cursor,
            duration_ms,
            16.0 / 9.0,
            &SmartCameraConfig::default(),
        )
    }

    #[test]
    fn single_click_with_bounds_opens_follow_segment() {
        let events = file(vec![click(
            2_000,
            400.0,
            300.0,
            Some(BoundingRect {
                x: 300,
                y: 250,
                width: 200,
                height: 100,
            }),
        )]);
        let segments = run(events, 10_000);

        assert_eq!(segments.len(), 1);
        let segment = &segments[0];
        assert!(segment.start_ts >= 1_600 && segment.start_ts <= 2_000);
        assert_eq!(segment.mode, ZoomMode::FollowCursor);
        assert!(segment.is_auto);
        assert_eq!(segment.id, "auto-1");
        assert!(segment.initial_rect.zoom_strength() <= 2.0 + 1e-9);
        let (cx, cy) = segment.initial_rect.center();
        assert!((cx - 0.2083).abs() < 0.06);
        assert!((cy - 0.2778).abs() < 0.06);
    }

    #[test]
    fn rapid_cluster_yields_exactly_one_segment() {
        // Four clicks in 800 ms on the same element.
        let rect = BoundingRect {
            x: 300,
            y: 250,
            width: 200,
            height: 100,
        };
        let events = file(vec![
            click(1_000, 350.0, 280.0, Some(rect)),
            click(1_200, 360.0, 290.0, Some(rect)),
            click(1_450, 370.0, 300.0, Some(rect)),
            click(1_700, 380.0, 310.0, Some(rect)),
        ]);
        let segments = run(events, 10_000);

        assert_eq!(segments.len(), 1, "one cluster, one segment");
        // Anchored on the fourth click: the segment extends to its idle
        // deadline.
        assert!(segments[0].end_ts >= 1_700);
    }

    #[test]
    fn multi_click_window_policy_accepts_the_same_burst() {
        let rect = BoundingRect {
            x: 300,
            y: 250,
            width: 200,
            height: 100,
        };
        let events = file(vec![
            click(1_000, 350.0, 280.0, Some(rect)),
            click(1_200, 360.0, 290.0, Some(rect)),
            click(1_450, 370.0, 300.0, Some(rect)),
            click(1_700, 380.0, 310.0, Some(rect)),
        ]);
        let cursor = CursorTrack::build(&events, 0.0);
        let config = SmartCameraConfig {
            trigger_policy: super::super::config::TriggerPolicy::MultiClickWindow,
            ..SmartCameraConfig::default()
        };
        let segments = build_auto_segments(&events, &cursor, 10_000, 16.0 / 9.0, &config);

        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn multi_click_window_policy_drops_a_lone_click() {
        let events = file(vec![click(2_000, 960.0, 540.0, None)]);
        let cursor = CursorTrack::build(&events, 0.0);
        let config = SmartCameraConfig {
            trigger_policy: super::super::config::TriggerPolicy::MultiClickWindow,
            ..SmartCameraConfig::default()
        };
        let segments = build_auto_segments(&events, &cursor, 10_000, 16.0 / 9.0, &config);
        assert!(segments.is_empty());
    }

    #[test]
    fn idle_timeout_closes_segment_two_seconds_after_last_click() {
        let events = file(vec![
            click(2_000, 960.0, 540.0, None),
            InputEvent::Move {
                ts: 10_000,
                x: 960.0,
                y: 540.0,
            },
        ]);
        let segments = run(events, 12_000);

        assert_eq!(segments.len(), 1);
        let end = segments[0].end_ts;
        assert!(
            (3_950..=4_050).contains(&end),
            "expected idle close at 4000 +- 50, got {end}"
        );
    }

    #[test]
    fn ctrl_policy_ignores_unmodified_clicks() {
        let events = file(vec![
            click(1_000, 400.0, 300.0, None),
            InputEvent::KeyDown {
                ts: 2_500,
                key_code: "ControlLeft".to_string(),
            },
            click(3_000, 1_200.0, 700.0, None),
            InputEvent::KeyUp {
                ts: 3_200,
                key_code: "ControlLeft".to_string(),
            },
        ]);
        let cursor = CursorTrack::build(&events, 0.0);
        let config = SmartCameraConfig {
            trigger_policy: super::super::config::TriggerPolicy::CtrlClick,
            ..SmartCameraConfig::default()
        };
        let segments = build_auto_segments(&events, &cursor, 10_000, 16.0 / 9.0, &config);

        assert_eq!(segments.len(), 1);
        let (cx, cy) = segments[0].initial_rect.center();
        assert!((cx - 1_200.0 / 1_920.0).abs() < 0.01);
        assert!((cy - 700.0 / 1_080.0).abs() < 0.01);
    }

    #[test]
    fn fallback_focus_zooms_to_exactly_two_x() {
        let events = file(vec![click(5_000, 960.0, 540.0, None)]);
        let segments = run(events, 10_000);

        assert_eq!(segments.len(), 1);
        let rect = segments[0].initial_rect;
        assert!((rect.zoom_strength() - 2.0).abs() < 1e-6);
        let (cx, cy) = rect.center();
        assert!((cx - 0.5).abs() < 1e-6);
        assert!((cy - 0.5).abs() < 1e-6);
    }

    #[test]
    fn slow_approach_earns_preroll() {
        let events = file(vec![
            InputEvent::Move {
                ts: 1_700,
                x: 390.0,
                y: 295.0,
            },
            InputEvent::Move {
                ts: 1_800,
                x: 395.0,
                y: 298.0,
            },
            InputEvent::Move {
                ts: 1_900,
                x: 398.0,
                y: 299.0,
            },
            click(2_000, 400.0, 300.0, None),
        ]);
        let segments = run(events, 10_000);

        assert_eq!(segments.len(), 1);
        // All moves are slow (under 300 px/s), so the pre-roll reaches the
        // earliest slow sample inside the 400 ms window.
        assert!(segments[0].start_ts <= 1_800);
        assert!(segments[0].start_ts >= 1_600);
    }

    #[test]
    fn fast_approach_gets_no_preroll() {
        let events = file(vec![
            InputEvent::Move {
                ts: 1_800,
                x: 100.0,
                y: 100.0,
            },
            InputEvent::Move {
                ts: 1_950,
                x: 1_500.0,
                y: 800.0,
            },
            click(2_000, 1_520.0, 810.0, None),
        ]);
        let segments = run(events, 10_000);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_ts, 2_000);
    }

    #[test]
    fn second_click_inside_safe_zone_does_not_retarget() {
        let big = BoundingRect {
            x: 660,
            y: 340,
            width: 600,
            height: 400,
        };
        let inner = BoundingRect {
            x: 900,
            y: 500,
            width: 80,
            height: 50,
        };
        let events = file(vec![
            click(1_000, 960.0, 540.0, Some(big)),
            click(2_500, 940.0, 525.0, Some(inner)),
        ]);
        let segments = run(events, 10_000);

        assert_eq!(segments.len(), 1, "contained click must not spawn or retarget");
        // The focus never moved: all target rect sizes match the initial.
        let initial = segments[0].initial_rect;
        for point in &segments[0].target_points {
            assert!((point.rect.width - initial.width).abs() < 1e-9);
        }
    }

    #[test]
    fn click_outside_safe_zone_retargets_without_new_segment() {
        let first = BoundingRect {
            x: 200,
            y: 200,
            width: 300,
            height: 200,
        };
        let second = BoundingRect {
            x: 1_400,
            y: 700,
            width: 300,
            height: 200,
        };
        let events = file(vec![
            click(1_000, 350.0, 300.0, Some(first)),
            // Keeps the lock alive but is still inside the retarget
            // interval.
            click(2_500, 360.0, 310.0, Some(first)),
            click(3_200, 1_550.0, 800.0, Some(second)),
        ]);
        let segments = run(events, 12_000);

        assert_eq!(segments.len(), 1, "retarget extends the segment");
        let segment = &segments[0];
        assert!(segment.end_ts >= 5_000, "idle clock restarts at the retarget");

        // The framing moves to the second target after the retarget.
        let late_point = segment
            .target_points
            .iter()
            .rev()
            .find(|point| point.ts >= 3_600)
            .expect("points after retarget");
        let (cx, _) = late_point.rect.center();
        assert!(cx > 0.5, "camera should frame the right-hand target, got {cx}");
    }

    #[test]
    fn sustained_scroll_releases_the_lock() {
        let rect = BoundingRect {
            x: 520,
            y: 220,
            width: 180,
            height: 120,
        };
        let mut events = vec![click(1_000, 600.0, 300.0, Some(rect))];
        // A fast violent scroll burst: travel passes 1.5 screen heights.
        for i in 0..8u64 {
            events.push(InputEvent::Scroll {
                ts: 1_400 + i * 100,
                x: 600.0,
                y: 300.0,
                delta: ScrollDelta { dx: 0.0, dy: -250.0 },
            });
        }
        let segments = run(file(events), 10_000);

        assert_eq!(segments.len(), 1);
        // 8 * 250 = 2000 >= 1620 = 1.5 * 1080: released at the burst, well
        // before the idle deadline.
        assert!(segments[0].end_ts <= 2_200, "got {}", segments[0].end_ts);
    }

    #[test]
    fn scroll_shifts_framing_downward_for_negative_dy() {
        let rect = BoundingRect {
            x: 760,
            y: 390,
            width: 400,
            height: 220,
        };
        let events = file(vec![
            click(1_000, 960.0, 500.0, Some(rect)),
            InputEvent::Scroll {
                ts: 1_500,
                x: 960.0,
                y: 500.0,
                delta: ScrollDelta { dx: 0.0, dy: -120.0 },
            },
        ]);
        let segments = run(events, 10_000);

        assert_eq!(segments.len(), 1);
        let segment = &segments[0];
        let before = segment
            .target_points
            .iter()
            .find(|point| point.ts >= 1_300)
            .unwrap();
        let after = segment
            .target_points
            .iter()
            .find(|point| point.ts >= 1_600)
            .unwrap();
        let (_, cy_before) = before.rect.center();
        let (_, cy_after) = after.rect.center();
        assert!(cy_after > cy_before, "scrolling down pans the framing down");
    }

    #[test]
    fn anti_spam_interval_blocks_back_to_back_segments() {
        let events = file(vec![
            click(1_000, 300.0, 300.0, None),
            // Far away, outside any safe zone, but the lock is active and
            // a retarget handles it; after the idle release, a click at
            // 4_500 is again past the interval.
            click(4_500, 1_600.0, 800.0, None),
        ]);
        let segments = run(events, 10_000);
        assert_eq!(segments.len(), 2);
        assert!(segments[1].start_ts >= segments[0].end_ts + 200);
    }

    #[test]
    fn regenerate_uses_project_geometry() {
        use crate::models::project::{Project, ProjectSettings, Timeline, SCHEMA_VERSION};

        let events = file(vec![click(2_000, 960.0, 540.0, None)]);
        let project = Project {
            schema_version: SCHEMA_VERSION,
            id: "rec".to_string(),
            name: "demo".to_string(),
            created_at: 0,
            video_path: "raw.mp4".to_string(),
            events_path: "events.json".to_string(),
            duration_ms: 8_000,
            video_width: 1_920,
            video_height: 1_080,
            timeline: Timeline::default(),
            settings: ProjectSettings::default(),
        };

        let segments =
            regenerate_auto_segments(&project, &events, &SmartCameraConfig::default());
        assert_eq!(segments.len(), 1);
        assert!(segments[0].end_ts <= 8_000);
    }

    #[test]
    fn empty_event_stream_emits_no_segments() {
        let events = file(vec![]);
        assert!(run(events, 10_000).is_empty());
    }

    #[test]
    fn keyboard_only_stream_is_a_shortfall() {
        let events = file(vec![InputEvent::KeyDown {
            ts: 100,
            key_code: "KeyA".to_string(),
        }]);
        assert!(run(events, 10_000).is_empty());
    }

    #[test]
    fn segment_ends_clamp_to_recording_duration() {
        let events = file(vec![click(9_900, 960.0, 540.0, None)]);
        let segments = run(events, 10_000);
        // 100 ms of room is under the minimum segment length: dropped.
        assert!(segments.is_empty());

        let events = file(vec![click(9_000, 960.0, 540.0, None)]);
        let segments = run(events, 10_000);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_ts, 10_000);
    }
}
