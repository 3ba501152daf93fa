// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Gesture scripts and their frame-by-frame replay.
//!
//! A script is a time-ordered list of host events. Replay ticks a fixed
//! frame clock: every event whose timestamp falls before the end of a frame
//! is applied, then the frame's `advance(dt)` runs and the pose is recorded.

use anyhow::{bail, Result};
use glide_core::{
    DVec2, GesturePhase, GestureSample, HostSpace, VelocityTracker, ViewportController,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Script file contents.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Overrides the configured view size when present.
    #[serde(default)]
    pub view_size: Option<[f64; 2]>,
    /// Host events; sorted by `at` before replay.
    pub events: Vec<ScriptEvent>,
}

/// One host event.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEvent {
    /// Seconds since replay start.
    pub at: f64,
    /// Raw touch-down: halts momentum before any gesture in the same event.
    #[serde(default)]
    pub touch_down: bool,
    /// Gesture callback, if any.
    #[serde(default)]
    pub gesture: Option<ScriptGesture>,
}

/// Gesture callback as written in scripts.
#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptGesture {
    /// Pan sample.
    Pan(ScriptPhase<DVec2, DVec2>),
    /// Pinch sample.
    Pinch(ScriptPhase<f64, f64>),
    /// Rotate sample.
    Rotate(ScriptPhase<f64, f64>),
}

/// Like [`GesturePhase`] but `ended` may omit its velocity, in which case
/// replay estimates it from the preceding samples.
#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPhase<C, E> {
    /// Gesture recognised at a focal point.
    Began(DVec2),
    /// Gesture progressed.
    Changed(C),
    /// Gesture released.
    Ended(Option<E>),
    /// Gesture aborted.
    Cancelled,
}

/// Pose recorded after one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRecord {
    /// Frame index, starting at 1.
    pub frame: u64,
    /// Time at the end of the frame.
    pub t: f64,
    /// Camera x.
    pub x: f64,
    /// Camera y.
    pub y: f64,
    /// Camera scale.
    pub scale: f64,
    /// Camera rotation (radians).
    pub rotation: f64,
    /// Whether momentum or an animation is still running.
    pub moving: bool,
}

/// Replay parameters.
#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    /// Frame rate of the replay clock.
    pub fps: f64,
    /// Frames to keep ticking after the last event while the camera moves.
    pub settle_frames: u64,
}

#[derive(Default)]
struct Trackers {
    pan: VelocityTracker<DVec2>,
    pinch: VelocityTracker<f64>,
    rotate: VelocityTracker<f64>,
}

impl Trackers {
    /// Converts a script gesture into a host sample, recording timestamps
    /// and filling in omitted exit velocities.
    fn resolve(&mut self, at: f64, gesture: ScriptGesture) -> GestureSample {
        match gesture {
            ScriptGesture::Pan(phase) => GestureSample::Pan(match phase {
                ScriptPhase::Began(p) => {
                    self.pan.clear();
                    self.pan.push(at, p);
                    GesturePhase::Began(p)
                }
                ScriptPhase::Changed(p) => {
                    self.pan.push(at, p);
                    GesturePhase::Changed(p)
                }
                ScriptPhase::Ended(v) => {
                    GesturePhase::Ended(v.unwrap_or_else(|| self.pan.velocity()))
                }
                ScriptPhase::Cancelled => GesturePhase::Cancelled,
            }),
            ScriptGesture::Pinch(phase) => {
                GestureSample::Pinch(scalar_phase(&mut self.pinch, at, phase, 1.0))
            }
            ScriptGesture::Rotate(phase) => {
                GestureSample::Rotate(scalar_phase(&mut self.rotate, at, phase, 0.0))
            }
        }
    }
}

fn scalar_phase(
    tracker: &mut VelocityTracker<f64>,
    at: f64,
    phase: ScriptPhase<f64, f64>,
    rest: f64,
) -> GesturePhase<f64, f64> {
    match phase {
        ScriptPhase::Began(p) => {
            tracker.clear();
            tracker.push(at, rest);
            GesturePhase::Began(p)
        }
        ScriptPhase::Changed(v) => {
            tracker.push(at, v);
            GesturePhase::Changed(v)
        }
        ScriptPhase::Ended(v) => GesturePhase::Ended(v.unwrap_or_else(|| tracker.velocity())),
        ScriptPhase::Cancelled => GesturePhase::Cancelled,
    }
}

/// Replays `script` through `controller`, returning one record per frame.
pub fn replay<S: HostSpace>(
    controller: &mut ViewportController<S>,
    script: &Script,
    opts: ReplayOptions,
) -> Result<Vec<FrameRecord>> {
    if !(opts.fps.is_finite() && opts.fps > 0.0) {
        bail!("fps must be a positive number, got {}", opts.fps);
    }
    if let Some(bad) = script.events.iter().find(|e| !(e.at.is_finite() && e.at >= 0.0)) {
        bail!("event timestamps must be finite and >= 0, got {}", bad.at);
    }

    let mut events = script.events.clone();
    events.sort_by(|a, b| a.at.total_cmp(&b.at));

    let dt = 1.0 / opts.fps;
    let mut trackers = Trackers::default();
    let mut records = Vec::new();
    let mut next_event = 0;
    let mut frames_after_last: u64 = 0;
    let mut frame: u64 = 0;

    loop {
        let events_done = next_event >= events.len();
        if events_done && !controller.is_moving() && frame > 0 {
            break;
        }
        if events_done {
            if frames_after_last >= opts.settle_frames {
                info!(frames = frames_after_last, "settle budget exhausted; stopping");
                break;
            }
            frames_after_last += 1;
        }

        frame += 1;
        let frame_end = frame as f64 * dt;
        while let Some(event) = events.get(next_event) {
            if event.at >= frame_end {
                break;
            }
            if event.touch_down {
                controller.stop_inertia();
            }
            if let Some(gesture) = event.gesture {
                let sample = trackers.resolve(event.at, gesture);
                debug!(frame, ?sample, "applying sample");
                controller.apply(sample);
            }
            next_event += 1;
        }
        controller.advance(dt);

        let t = controller.transform();
        records.push(FrameRecord {
            frame,
            t: frame_end,
            x: t.translation.x,
            y: t.translation.y,
            scale: t.scale,
            rotation: t.rotation,
            moving: controller.is_moving(),
        });
    }
    info!(frames = records.len(), events = events.len(), "replay finished");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn parse(json: &str) -> Script {
        match serde_json::from_str(json) {
            Ok(s) => s,
            Err(e) => panic!("bad script: {e}"),
        }
    }

    const OPTS: ReplayOptions = ReplayOptions {
        fps: 60.0,
        settle_frames: 600,
    };

    #[test]
    fn pinch_script_matches_direct_calls() {
        let script = parse(
            r#"{ "events": [
                { "at": 0.0, "gesture": { "pinch": { "began": [0.0, 0.0] } } },
                { "at": 0.001, "gesture": { "pinch": { "changed": 2.0 } } },
                { "at": 0.002, "gesture": { "pinch": { "ended": 0.0 } } }
            ] }"#,
        );
        let mut c = ViewportController::default();
        let records = replay(&mut c, &script, OPTS).unwrap();
        assert_eq!(records.len(), 1);
        assert_abs_diff_eq!(records[0].scale, 0.5, epsilon = 1e-12);
        assert!(!records[0].moving);
    }

    #[test]
    fn fling_keeps_ticking_until_settled() {
        let script = parse(
            r#"{ "events": [
                { "at": 0.0, "touch_down": true, "gesture": { "pan": { "began": [0.0, 0.0] } } },
                { "at": 0.02, "gesture": { "pan": { "changed": [10.0, 0.0] } } },
                { "at": 0.04, "gesture": { "pan": { "changed": [20.0, 0.0] } } },
                { "at": 0.05, "gesture": { "pan": { "ended": null } } }
            ] }"#,
        );
        let mut c = ViewportController::default();
        let records = replay(&mut c, &script, OPTS).unwrap();
        let last = records[records.len() - 1];
        assert!(!last.moving);
        assert!(records.len() > 4, "inertia frames expected");
        // Drag towards +x moves the camera towards -x; momentum continues it.
        let after_drag = records[3].x;
        assert!(last.x < after_drag);
    }

    #[test]
    fn touch_down_stops_momentum() {
        let script = parse(
            r#"{ "events": [
                { "at": 0.0, "gesture": { "rotate": { "began": [0.0, 0.0] } } },
                { "at": 0.0, "gesture": { "rotate": { "ended": 50.0 } } },
                { "at": 0.05, "touch_down": true }
            ] }"#,
        );
        let mut c = ViewportController::default();
        let records = replay(&mut c, &script, OPTS).unwrap();
        assert!(records[0].moving);
        assert!(records.last().is_some_and(|r| !r.moving));
        assert!(records.len() <= 4);
    }

    #[test]
    fn settle_budget_bounds_the_replay() {
        let script = parse(
            r#"{ "events": [
                { "at": 0.0, "gesture": { "pan": { "began": [0.0, 0.0] } } },
                { "at": 0.0, "gesture": { "pan": { "ended": [100000.0, 0.0] } } }
            ] }"#,
        );
        let mut c = ViewportController::default();
        let opts = ReplayOptions {
            fps: 60.0,
            settle_frames: 3,
        };
        let records = replay(&mut c, &script, opts).unwrap();
        assert_eq!(records.len(), 4);
        assert!(records[3].moving);
    }

    #[test]
    fn negative_timestamps_are_rejected() {
        let script = parse(r#"{ "events": [ { "at": -1.0, "touch_down": true } ] }"#);
        let mut c = ViewportController::default();
        assert!(replay(&mut c, &script, OPTS).is_err());
    }

    #[test]
    fn zero_fps_is_rejected() {
        let script = parse(r#"{ "events": [] }"#);
        let mut c = ViewportController::default();
        let opts = ReplayOptions {
            fps: 0.0,
            settle_frames: 1,
        };
        assert!(replay(&mut c, &script, opts).is_err());
    }
}
