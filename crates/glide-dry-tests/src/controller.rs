// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Controller builder and scripted gesture drivers for tests.

use glide_core::{
    DVec2, HostSpace, InvalidConfig, Transform2D, ViewFrame, ViewportConfig, ViewportController,
};

/// Frame time used by drivers: one 60 Hz frame.
pub const FRAME_DT: f64 = 1.0 / 60.0;

/// Builder for controllers in tests.
///
/// Defaults to `ViewportConfig::default()`, a view anchored at the host
/// origin, and the identity pose.
///
/// # Example
///
/// ```
/// use glide_dry_tests::ControllerBuilder;
///
/// let c = ControllerBuilder::new()
///     .scale_friction(0.75)
///     .scale_bounds(0.1, 4.0)
///     .build()
///     .unwrap();
/// assert_eq!(c.config().scale_friction, 0.75);
/// ```
#[derive(Debug, Clone)]
pub struct ControllerBuilder {
    config: ViewportConfig,
    anchor: DVec2,
    transform: Transform2D,
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerBuilder {
    /// Builder with default config, origin anchor, identity pose.
    pub fn new() -> Self {
        Self {
            config: ViewportConfig::default(),
            anchor: DVec2::ZERO,
            transform: Transform2D::IDENTITY,
        }
    }

    /// Replace the whole config.
    pub fn config(mut self, config: ViewportConfig) -> Self {
        self.config = config;
        self
    }

    /// Host point the camera centre projects to.
    pub fn anchor(mut self, anchor: DVec2) -> Self {
        self.anchor = anchor;
        self
    }

    /// Starting pose.
    pub fn transform(mut self, transform: Transform2D) -> Self {
        self.transform = transform;
        self
    }

    /// Zoom bounds.
    pub fn scale_bounds(mut self, min: f64, max: f64) -> Self {
        self.config.min_scale = min;
        self.config.max_scale = max;
        self
    }

    /// Same friction on every axis.
    pub fn friction(mut self, f: f64) -> Self {
        self.config.position_friction = f;
        self.config.scale_friction = f;
        self.config.rotation_friction = f;
        self
    }

    /// Scale-axis friction.
    pub fn scale_friction(mut self, f: f64) -> Self {
        self.config.scale_friction = f;
        self
    }

    /// Lock panning.
    pub fn lock_pan(mut self) -> Self {
        self.config.lock_pan = true;
        self
    }

    /// Lock zooming.
    pub fn lock_zoom(mut self) -> Self {
        self.config.lock_zoom = true;
        self
    }

    /// Lock rotation.
    pub fn lock_rotation(mut self) -> Self {
        self.config.lock_rotation = true;
        self
    }

    /// Build the controller.
    pub fn build(self) -> Result<ViewportController<ViewFrame>, InvalidConfig> {
        ViewportController::with_transform(self.config, ViewFrame::new(self.anchor), self.transform)
    }
}

/// Drives a controller through complete, well-formed gestures.
pub struct GestureDriver<'a, S> {
    controller: &'a mut ViewportController<S>,
}

impl<'a, S: HostSpace> GestureDriver<'a, S> {
    /// Wraps `controller`.
    pub fn new(controller: &'a mut ViewportController<S>) -> Self {
        Self { controller }
    }

    /// Pan from `from` to `to` in `steps` equal samples, one frame apart;
    /// the pan is left active.
    pub fn drag(&mut self, from: DVec2, to: DVec2, steps: u32) -> &mut Self {
        self.controller.begin_pan(from);
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = f64::from(i) / f64::from(steps);
            self.controller.update_pan(from.lerp(to, t));
            self.controller.advance(FRAME_DT);
        }
        self
    }

    /// Pinch around `focal` up to cumulative `factor` in `steps` samples;
    /// the pinch is left active.
    pub fn pinch(&mut self, focal: DVec2, factor: f64, steps: u32) -> &mut Self {
        self.controller.begin_pinch(focal);
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = f64::from(i) / f64::from(steps);
            self.controller.update_pinch(1.0 + (factor - 1.0) * t);
            self.controller.advance(FRAME_DT);
        }
        self
    }

    /// Twist around `focal` up to cumulative `angle` in `steps` samples;
    /// the twist is left active.
    pub fn twist(&mut self, focal: DVec2, angle: f64, steps: u32) -> &mut Self {
        self.controller.begin_rotate(focal);
        let steps = steps.max(1);
        for i in 1..=steps {
            let t = f64::from(i) / f64::from(steps);
            self.controller.update_rotate(angle * t);
            self.controller.advance(FRAME_DT);
        }
        self
    }

    /// Advance `n` frames.
    pub fn frames(&mut self, n: u32) -> &mut Self {
        for _ in 0..n {
            self.controller.advance(FRAME_DT);
        }
        self
    }

    /// Advance until the controller stops moving; returns the number of
    /// frames taken, or `None` if still moving after `max_frames`.
    pub fn settle(&mut self, max_frames: u32) -> Option<u32> {
        for n in 0..=max_frames {
            if !self.controller.is_moving() {
                return Some(n);
            }
            self.controller.advance(FRAME_DT);
        }
        None
    }

    /// The driven controller.
    pub fn controller(&mut self) -> &mut ViewportController<S> {
        self.controller
    }
}
