//! Engine tuning knobs.

use crate::models::project::CameraSpring;

/// When an eligible click may start a zoom segment. Configured at
/// recording start and fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerPolicy {
    /// Every click is eligible.
    SingleClick,
    /// A cluster needs at least two clicks inside a 3 s window.
    MultiClickWindow,
    /// Clicks fire only while a Ctrl modifier is held.
    CtrlClick,
}

#[derive(Debug, Clone)]
pub struct SmartCameraConfig {
    pub trigger_policy: TriggerPolicy,
    /// Window for the multi-click policy, ms.
    pub multi_click_window_ms: u64,
    /// Clicks required inside the window.
    pub multi_click_min: usize,
    /// Clicks closer than this merge into one focus cluster, ms.
    pub cluster_gap_ms: u64,
    /// Padding around a UI bounding rect, as a fraction of its longer side.
    pub semantic_pad: f64,
    /// Zoom strength ceiling for semantic focus.
    pub max_zoom: f64,
    /// Zoom used when a click has no bounding rect.
    pub fallback_zoom: f64,
    /// Anti-spam interval between fresh segment starts and between
    /// retargets, ms.
    pub min_zoom_interval_ms: u64,
    /// Longest pre-roll placed before a click anchor, ms.
    pub pre_roll_ms: u64,
    /// Cursor speed under which the pre-roll window may open, px/s.
    pub slowdown_px_per_s: f64,
    /// Safe-zone inset of the current target rect, per side.
    pub containment_margin: f64,
    /// Lock releases after this long without eligible activity, ms.
    pub idle_timeout_ms: u64,
    /// A scroll session this long forces the camera back out, ms.
    pub scroll_timeout_ms: u64,
    /// Scroll silence that ends a session, ms.
    pub scroll_idle_reset_ms: u64,
    /// Accumulated |dy| beyond this many screen heights forces the camera
    /// back out.
    pub scroll_travel_screen_ratio: f64,
    /// Vertical shift per normalized wheel notch, as a fraction of the
    /// viewport height.
    pub scroll_shift_ratio: f64,
    /// Follow generator sample spacing, ms.
    pub follow_sample_step_ms: u64,
    /// Dead-zone half-extent as a fraction of the viewport size.
    pub follow_dead_ratio: f64,
    /// Hard-edge half-extent as a fraction of the viewport size.
    pub follow_hard_ratio: f64,
    /// Maximum follow pan speed, px/s over the source frame.
    pub follow_max_speed_px_per_s: f64,
    /// Spring attached to emitted segments.
    pub spring: CameraSpring,
}

impl Default for SmartCameraConfig {
    fn default() -> Self {
        SmartCameraConfig {
            trigger_policy: TriggerPolicy::SingleClick,
            multi_click_window_ms: 3_000,
            multi_click_min: 2,
            cluster_gap_ms: 300,
            semantic_pad: 0.06,
            max_zoom: 2.0,
            fallback_zoom: 2.0,
            min_zoom_interval_ms: 2_000,
            pre_roll_ms: 400,
            slowdown_px_per_s: 300.0,
            containment_margin: 0.1,
            idle_timeout_ms: 2_000,
            scroll_timeout_ms: 3_000,
            scroll_idle_reset_ms: 300,
            scroll_travel_screen_ratio: 1.5,
            scroll_shift_ratio: 0.10,
            follow_sample_step_ms: 75,
            follow_dead_ratio: 0.2,
            follow_hard_ratio: 0.35,
            follow_max_speed_px_per_s: 800.0,
            spring: CameraSpring::default(),
        }
    }
}
