// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Eased transition used by animated camera resets.

use crate::math::ease_in_out;
use crate::transform::Transform2D;

/// Shortest animated reset.
pub const MIN_DURATION_SECS: f64 = 0.1;
/// Longest animated reset.
pub const MAX_DURATION_SECS: f64 = 0.5;
/// Seconds of animation per unit of scale change.
pub const SECS_PER_SCALE_UNIT: f64 = 0.5;

/// Default duration for a transition between two scales.
pub fn duration_for(from_scale: f64, to_scale: f64) -> f64 {
    clamp_duration((to_scale - from_scale).abs() * SECS_PER_SCALE_UNIT)
}

/// Clamps `secs` to `[MIN_DURATION_SECS, MAX_DURATION_SECS]`.
pub fn clamp_duration(secs: f64) -> f64 {
    if secs.is_nan() {
        return MIN_DURATION_SECS;
    }
    secs.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS)
}

/// In-flight transition from `from` to `to`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformAnimation {
    from: Transform2D,
    to: Transform2D,
    duration: f64,
    elapsed: f64,
}

impl TransformAnimation {
    /// Starts a transition; `duration` is clamped.
    pub fn new(from: Transform2D, to: Transform2D, duration: f64) -> Self {
        Self {
            from,
            to,
            duration: clamp_duration(duration),
            elapsed: 0.0,
        }
    }

    /// Advances by `dt` seconds and returns the eased pose.
    pub fn step(&mut self, dt: f64) -> Transform2D {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.is_finished() {
            return self.to;
        }
        Transform2D::lerp(&self.from, &self.to, ease_in_out(self.elapsed / self.duration))
    }

    /// True once the target has been reached.
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Clamped duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Final pose.
    pub fn target(&self) -> Transform2D {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn duration_tracks_scale_delta() {
        assert_eq!(duration_for(1.0, 1.0), MIN_DURATION_SECS);
        assert_eq!(duration_for(1.0, 1.5), 0.25);
        assert_eq!(duration_for(1.0, 9.0), MAX_DURATION_SECS);
    }

    #[test]
    fn step_lands_exactly_on_target() {
        let to = Transform2D::new(DVec2::new(4.0, 2.0), 2.0, 0.5);
        let mut anim = TransformAnimation::new(Transform2D::IDENTITY, to, 0.2);
        let mid = anim.step(0.1);
        assert!(mid.scale > 1.0 && mid.scale < 2.0);
        assert!(!anim.is_finished());
        assert_eq!(anim.step(0.5), to);
        assert!(anim.is_finished());
    }
}
