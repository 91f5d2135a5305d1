//! Click-pulse scaling signal.
//!
//! Every click squeezes the drawn cursor briefly: a 65 ms ramp down to
//! 0.82 of its size, then an 85 ms recovery back to 1.0. The signal is a
//! pure function of the click timestamps, so preview and export cannot
//! drift apart. The scale anchors at the cursor tip.

/// Smallest scale reached by the pulse, at the end of the down phase.
pub const CLICK_PULSE_MIN_SCALE: f64 = 0.82;

/// Length of the down phase, ms.
pub const CLICK_PULSE_DOWN_MS: f64 = 65.0;

/// Total pulse length, ms. After this the scale is exactly 1.0 again.
pub const CLICK_PULSE_TOTAL_MS: f64 = 150.0;

/// Cursor scale at `ts` given the sorted click timestamps.
///
/// Only the latest click at or before `ts` matters; overlapping pulses do
/// not stack.
pub fn click_pulse_scale(click_times: &[u64], ts: u64) -> f64 {
    let idx = click_times.partition_point(|click| *click <= ts);
    if idx == 0 {
        return 1.0;
    }
    let dt = (ts - click_times[idx - 1]) as f64;

    if dt > CLICK_PULSE_TOTAL_MS {
        1.0
    } else if dt <= CLICK_PULSE_DOWN_MS {
        1.0 - (1.0 - CLICK_PULSE_MIN_SCALE) * (dt / CLICK_PULSE_DOWN_MS)
    } else {
        let up_span = CLICK_PULSE_TOTAL_MS - CLICK_PULSE_DOWN_MS;
        CLICK_PULSE_MIN_SCALE + (1.0 - CLICK_PULSE_MIN_SCALE) * ((dt - CLICK_PULSE_DOWN_MS) / up_span)
    }
}
