// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Inertial viewport controller.
//!
//! Turns discrete pan / pinch / rotate samples into a camera [`Transform2D`]
//! and keeps the camera moving after release with per-axis exponential
//! velocity decay.
//!
//! Call order expected from the host, per rendered frame:
//! 1. `stop_inertia()` on every raw touch-down;
//! 2. gesture callbacks (`begin_*`, `update_*`, `end_*`, `cancel_*`);
//! 3. `advance(dt)` exactly once;
//! 4. read `transform()` for drawing.
//!
//! Everything is synchronous and single-owner; no call blocks.

use glam::DVec2;
use tracing::{debug, trace, warn};

use crate::animation::{duration_for, TransformAnimation};
use crate::config::{InvalidConfig, ViewportConfig};
use crate::gesture::{ActiveGestures, GestureKind, GesturePhase, GestureSample};
use crate::math::{
    clamp_scale, coast_distance, finite_or_zero, host_to_local, rotate, snap, snap_vec,
};
use crate::observer::{ChangeCause, ObserverId, Observers, ViewportEvent};
use crate::transform::{HostSpace, Transform2D, ViewFrame};

/// Residual momentum left by the most recent gesture release.
///
/// `translation` is expressed in host axes (y-down, before rotation); the
/// inertia step rotates it into scene axes with the current camera rotation.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct VelocityState {
    /// Translation velocity, host axes, scene units per reference frame.
    pub translation: DVec2,
    /// Scale velocity per reference frame; positive values shrink `scale`.
    pub scale: f64,
    /// Rotation velocity, radians per reference frame.
    pub rotation: f64,
}

impl VelocityState {
    /// No momentum on any axis.
    pub const ZERO: Self = Self {
        translation: DVec2::ZERO,
        scale: 0.0,
        rotation: 0.0,
    };

    /// True when every axis is exactly at rest.
    pub fn is_zero(&self) -> bool {
        self.translation == DVec2::ZERO && self.scale == 0.0 && self.rotation == 0.0
    }
}

// `shared` is set once another gesture overlaps the session; cancelling a
// shared session reverts only its own contribution instead of the snapshot.

#[derive(Debug, Copy, Clone)]
struct PanSession {
    start: Transform2D,
    last_focal: DVec2,
    offset: DVec2,
    shared: bool,
}

#[derive(Debug, Copy, Clone)]
struct PinchSession {
    start: Transform2D,
    focal_scene: DVec2,
    shared: bool,
}

#[derive(Debug, Copy, Clone)]
struct RotateSession {
    start: Transform2D,
    pivot: DVec2,
    last_angle: f64,
    shared: bool,
}

/// Inertial 2D camera controller.
///
/// Owns the camera pose and its residual velocity. `S` converts host
/// focal points into scene space (see [`HostSpace`]).
#[derive(Debug)]
pub struct ViewportController<S = ViewFrame> {
    transform: Transform2D,
    velocity: VelocityState,
    config: ViewportConfig,
    pending_config: Option<ViewportConfig>,
    host: S,
    pan: Option<PanSession>,
    pinch: Option<PinchSession>,
    rotate: Option<RotateSession>,
    animation: Option<TransformAnimation>,
    observers: Observers,
}

impl Default for ViewportController<ViewFrame> {
    fn default() -> Self {
        Self::build(ViewportConfig::default(), ViewFrame::default(), Transform2D::IDENTITY)
    }
}

impl<S: HostSpace> ViewportController<S> {
    /// Controller at the identity pose (scale clamped into bounds).
    pub fn new(config: ViewportConfig, host: S) -> Result<Self, InvalidConfig> {
        Self::with_transform(config, host, Transform2D::IDENTITY)
    }

    /// Controller starting at `transform`.
    ///
    /// Non-finite components fall back to the identity pose; scale is
    /// clamped into the configured bounds.
    pub fn with_transform(
        config: ViewportConfig,
        host: S,
        transform: Transform2D,
    ) -> Result<Self, InvalidConfig> {
        config.validate()?;
        Ok(Self::build(config, host, transform))
    }

    fn build(config: ViewportConfig, host: S, transform: Transform2D) -> Self {
        let transform = sanitize(&Transform2D::IDENTITY, transform, &config);
        Self {
            transform,
            velocity: VelocityState::ZERO,
            config,
            pending_config: None,
            host,
            pan: None,
            pinch: None,
            rotate: None,
            animation: None,
            observers: Observers::default(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Current camera pose.
    pub fn transform(&self) -> Transform2D {
        self.transform
    }

    /// Current residual velocity.
    pub fn velocity(&self) -> VelocityState {
        self.velocity
    }

    /// Effective configuration.
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Host↔scene conversion in use.
    pub fn host_space(&self) -> &S {
        &self.host
    }

    /// Mutable host conversion (e.g. after a view resize).
    pub fn host_space_mut(&mut self) -> &mut S {
        &mut self.host
    }

    /// Gestures between `Began` and their terminal phase.
    pub fn active_gestures(&self) -> ActiveGestures {
        ActiveGestures {
            pan: self.pan.is_some(),
            pinch: self.pinch.is_some(),
            rotate: self.rotate.is_some(),
        }
    }

    /// True while an animated reset is running.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// True while the camera will change on the next `advance` without input.
    pub fn is_moving(&self) -> bool {
        self.animation.is_some() || !self.velocity.is_zero()
    }

    /// Registers a synchronous change observer.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(&ViewportEvent) + 'static,
    {
        self.observers.subscribe(callback)
    }

    /// Removes an observer; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Replaces the configuration.
    ///
    /// The configuration is immutable during a gesture: while any gesture is
    /// active the new value is held back and applied when the last one ends.
    pub fn set_config(&mut self, config: ViewportConfig) -> Result<(), InvalidConfig> {
        config.validate()?;
        if self.active_gestures().is_idle() {
            self.install_config(config);
        } else {
            debug!("deferring config change until active gestures end");
            self.pending_config = Some(config);
        }
        Ok(())
    }

    fn install_config(&mut self, config: ViewportConfig) {
        self.config = config;
        let mut next = self.transform;
        next.scale = clamp_scale(next.scale, self.config.min_scale, self.config.max_scale);
        self.mutate(ChangeCause::Reset, next);
    }

    fn settle_pending_config(&mut self) {
        if self.active_gestures().is_idle() {
            if let Some(config) = self.pending_config.take() {
                self.install_config(config);
            }
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Routes a host gesture sample to the matching typed operation.
    pub fn apply(&mut self, sample: GestureSample) {
        match sample {
            GestureSample::Pan(phase) => match phase {
                GesturePhase::Began(p) => self.begin_pan(p),
                GesturePhase::Changed(p) => self.update_pan(p),
                GesturePhase::Ended(v) => self.end_pan(v),
                GesturePhase::Cancelled => self.cancel_pan(),
            },
            GestureSample::Pinch(phase) => match phase {
                GesturePhase::Began(p) => self.begin_pinch(p),
                GesturePhase::Changed(f) => self.update_pinch(f),
                GesturePhase::Ended(v) => self.end_pinch(v),
                GesturePhase::Cancelled => self.cancel_pinch(),
            },
            GestureSample::Rotate(phase) => match phase {
                GesturePhase::Began(p) => self.begin_rotate(p),
                GesturePhase::Changed(a) => self.update_rotate(a),
                GesturePhase::Ended(v) => self.end_rotate(v),
                GesturePhase::Cancelled => self.cancel_rotate(),
            },
        }
    }

    // ── Pan ──────────────────────────────────────────────────────────

    /// Starts a pan at `focal` (host space); cancels translation inertia.
    pub fn begin_pan(&mut self, focal: DVec2) {
        let shared = self.preempt(GestureKind::Pan);
        self.velocity.translation = DVec2::ZERO;
        self.pan = Some(PanSession {
            start: self.transform,
            last_focal: focal,
            offset: DVec2::ZERO,
            shared,
        });
    }

    /// Moves the camera so the scene follows the focal point.
    ///
    /// The host delta is rotated by the negative camera rotation and scaled
    /// by the current scale, so a fixed drag covers a fixed distance on
    /// screen at any zoom or twist.
    pub fn update_pan(&mut self, focal: DVec2) {
        let Some(session) = self.pan.as_mut() else {
            debug!("pan update without an active pan; ignored");
            return;
        };
        if !focal.is_finite() {
            warn!(?focal, "non-finite pan focal point; ignored");
            return;
        }
        let delta = session.last_focal - focal;
        session.last_focal = focal;
        if self.config.lock_pan {
            return;
        }
        let step = host_to_local(rotate(delta, -self.transform.rotation)) * self.transform.scale;
        session.offset += step;
        let mut next = self.transform;
        next.translation += step;
        self.mutate(ChangeCause::Pan, next);
    }

    /// Ends the pan, converting the host exit velocity (points/s) into
    /// translation momentum.
    pub fn end_pan(&mut self, exit_velocity: DVec2) {
        if self.pan.take().is_none() {
            debug!("pan end without an active pan; ignored");
            return;
        }
        self.velocity.translation = if self.config.lock_pan || !exit_velocity.is_finite() {
            DVec2::ZERO
        } else {
            exit_velocity * self.transform.scale / self.config.velocity_divisor
        };
        trace!(velocity = ?self.velocity.translation, "pan released");
        self.settle_pending_config();
    }

    /// Aborts the pan and undoes its translation.
    ///
    /// A pan that ran alone restores the pose captured at `begin_pan`; one
    /// that overlapped another gesture removes only its own offset.
    pub fn cancel_pan(&mut self) {
        let Some(session) = self.pan.take() else {
            return;
        };
        self.velocity.translation = DVec2::ZERO;
        let restored = if session.shared {
            let mut t = self.transform;
            t.translation -= session.offset;
            t
        } else {
            session.start
        };
        self.mutate(ChangeCause::Cancel, restored);
        self.settle_pending_config();
    }

    // ── Pinch ────────────────────────────────────────────────────────

    /// Starts a pinch centred on `focal` (host space).
    ///
    /// The focal point is converted to scene space once and held fixed for
    /// the whole gesture.
    pub fn begin_pinch(&mut self, focal: DVec2) {
        let shared = self.preempt(GestureKind::Pinch);
        self.velocity.scale = 0.0;
        let focal_scene = if focal.is_finite() {
            self.host.host_to_scene(&self.transform, focal)
        } else {
            warn!(?focal, "non-finite pinch focal point; pivoting on camera centre");
            self.transform.translation
        };
        self.pinch = Some(PinchSession {
            start: self.transform,
            focal_scene,
            shared,
        });
    }

    /// Applies the cumulative pinch `factor` since `begin_pinch`.
    ///
    /// `scale = start_scale / factor`, clamped. The current translation is
    /// scaled about the focal point by the step from the previous scale, so
    /// the focal point stays under the fingers even while a rotate or pan
    /// moves the camera at the same time.
    pub fn update_pinch(&mut self, factor: f64) {
        let Some(session) = self.pinch else {
            debug!("pinch update without an active pinch; ignored");
            return;
        };
        if self.config.lock_zoom {
            return;
        }
        if !(factor.is_finite() && factor > 0.0) {
            warn!(factor, "invalid pinch factor; ignored");
            return;
        }
        let scale = clamp_scale(
            session.start.scale / factor,
            self.config.min_scale,
            self.config.max_scale,
        );
        let next = zoom_about(self.transform, session.focal_scene, scale);
        self.mutate(ChangeCause::Pinch, next);
    }

    /// Ends the pinch; `exit_velocity` is the host's scale-factor velocity.
    pub fn end_pinch(&mut self, exit_velocity: f64) {
        if self.pinch.take().is_none() {
            debug!("pinch end without an active pinch; ignored");
            return;
        }
        self.velocity.scale = if self.config.lock_zoom {
            0.0
        } else {
            finite_or_zero(self.transform.scale * exit_velocity / self.config.velocity_divisor)
        };
        trace!(velocity = self.velocity.scale, "pinch released");
        self.settle_pending_config();
    }

    /// Aborts the pinch and undoes its zoom.
    ///
    /// A pinch that ran alone restores the pose captured at `begin_pinch`;
    /// one that overlapped another gesture zooms back to its start scale
    /// about its focal point.
    pub fn cancel_pinch(&mut self) {
        let Some(session) = self.pinch.take() else {
            return;
        };
        self.velocity.scale = 0.0;
        let restored = if session.shared {
            zoom_about(self.transform, session.focal_scene, session.start.scale)
        } else {
            session.start
        };
        self.mutate(ChangeCause::Cancel, restored);
        self.settle_pending_config();
    }

    // ── Rotate ───────────────────────────────────────────────────────

    /// Starts a twist around `focal` (host space), which becomes the fixed
    /// scene-space pivot for the gesture.
    pub fn begin_rotate(&mut self, focal: DVec2) {
        let shared = self.preempt(GestureKind::Rotate);
        self.velocity.rotation = 0.0;
        let pivot = if focal.is_finite() {
            self.host.host_to_scene(&self.transform, focal)
        } else {
            warn!(?focal, "non-finite rotate focal point; pivoting on camera centre");
            self.transform.translation
        };
        self.rotate = Some(RotateSession {
            start: self.transform,
            pivot,
            last_angle: 0.0,
            shared,
        });
    }

    /// Applies the cumulative twist `angle` (radians) since `begin_rotate`.
    ///
    /// Rotation is set absolutely from the gesture-start rotation; the
    /// translation is swung around the pivot by the increment since the
    /// previous sample, since hosts report twist cumulatively.
    pub fn update_rotate(&mut self, angle: f64) {
        let Some(session) = self.rotate.as_mut() else {
            debug!("rotate update without an active rotate; ignored");
            return;
        };
        if !angle.is_finite() {
            warn!(angle, "non-finite rotate angle; ignored");
            return;
        }
        if self.config.lock_rotation {
            return;
        }
        let increment = angle - session.last_angle;
        session.last_angle = angle;
        let pivot = session.pivot;
        let start_rotation = session.start.rotation;
        let mut next = self.transform;
        next.translation = pivot + rotate(self.transform.translation - pivot, increment);
        next.rotation = start_rotation + angle;
        self.mutate(ChangeCause::Rotate, next);
    }

    /// Ends the twist; `exit_velocity` is the host's angular velocity (rad/s).
    pub fn end_rotate(&mut self, exit_velocity: f64) {
        if self.rotate.take().is_none() {
            debug!("rotate end without an active rotate; ignored");
            return;
        }
        self.velocity.rotation = if self.config.lock_rotation {
            0.0
        } else {
            finite_or_zero(self.transform.scale * exit_velocity / self.config.velocity_divisor)
        };
        trace!(velocity = self.velocity.rotation, "rotate released");
        self.settle_pending_config();
    }

    /// Aborts the twist and undoes its rotation.
    ///
    /// A twist that ran alone restores the pose captured at `begin_rotate`;
    /// one that overlapped another gesture unwinds its angle about its pivot.
    pub fn cancel_rotate(&mut self) {
        let Some(session) = self.rotate.take() else {
            return;
        };
        self.velocity.rotation = 0.0;
        let restored = if session.shared {
            let mut t = self.transform;
            t.translation =
                session.pivot + rotate(t.translation - session.pivot, -session.last_angle);
            t.rotation -= session.last_angle;
            t
        } else {
            session.start
        };
        self.mutate(ChangeCause::Cancel, restored);
        self.settle_pending_config();
    }

    // ── Momentum ─────────────────────────────────────────────────────

    /// Halts all momentum and any animated reset.
    ///
    /// Hosts call this on every raw touch-down, before gesture recognition,
    /// so residual motion never fights a deliberate touch.
    pub fn stop_inertia(&mut self) {
        if self.is_moving() {
            debug!("inertia stopped by touch");
        }
        self.velocity = VelocityState::ZERO;
        self.animation = None;
    }

    /// Steps momentum (or a running reset animation) by `dt` seconds.
    ///
    /// Frictions are per reference frame. Each step decays velocity by
    /// `friction^(dt · reference_frame_rate)` and moves the camera by the
    /// matching [`coast_distance`], so both the velocity and the distance
    /// travelled are independent of the actual frame rate. Axes decay
    /// independently. Non-finite or non-positive `dt` is ignored.
    pub fn advance(&mut self, dt: f64) {
        if !(dt.is_finite() && dt > 0.0) {
            trace!(dt, "ignoring non-positive frame time");
            return;
        }
        if let Some(anim) = self.animation.as_mut() {
            let next = anim.step(dt);
            let finished = anim.is_finished();
            self.mutate(ChangeCause::Animation, next);
            if finished {
                self.animation = None;
            }
            return;
        }
        if self.velocity.is_zero() {
            return;
        }

        let cfg = &self.config;
        let steps = dt * cfg.reference_frame_rate;
        let mut v = self.velocity;
        let mut next = self.transform;

        if v.translation != DVec2::ZERO {
            let f = cfg.position_friction;
            next.translation -=
                rotate(host_to_local(v.translation), next.rotation) * coast_distance(f, steps);
            v.translation = snap_vec(v.translation * f.powf(steps), cfg.stop_epsilon_position);
        }
        if v.scale != 0.0 {
            let f = cfg.scale_friction;
            next.scale = clamp_scale(
                next.scale - v.scale * coast_distance(f, steps),
                cfg.min_scale,
                cfg.max_scale,
            );
            v.scale = snap(v.scale * f.powf(steps), cfg.stop_epsilon_scale);
        }
        if v.rotation != 0.0 {
            let f = cfg.rotation_friction;
            next.rotation += v.rotation * coast_distance(f, steps);
            v.rotation = snap(v.rotation * f.powf(steps), cfg.stop_epsilon_rotation);
        }
        if !(next.translation.is_finite() && next.rotation.is_finite()) {
            warn!("inertia produced a non-finite pose; halting");
            v = VelocityState::ZERO;
            next = self.transform;
        }

        self.velocity = v;
        self.mutate(ChangeCause::Inertia, next);
        if self.velocity.is_zero() {
            debug!("inertia settled");
            self.observers.emit(&ViewportEvent::InertiaSettled);
        }
    }

    /// Jumps (or animates) to a pose; used for "reset camera" actions.
    ///
    /// Momentum is always cleared first and any active gesture is dropped.
    /// When `animated`, the transition runs over `duration` seconds, or a
    /// duration proportional to the scale change, clamped to 0.1–0.5 s and
    /// eased. Non-finite components keep their current value; scale is
    /// clamped into bounds.
    pub fn set_immediate(
        &mut self,
        position: DVec2,
        scale: f64,
        rotation: f64,
        animated: bool,
        duration: Option<f64>,
    ) {
        self.velocity = VelocityState::ZERO;
        self.animation = None;
        if !self.active_gestures().is_idle() {
            debug!("camera reset dropped active gestures");
            self.pan = None;
            self.pinch = None;
            self.rotate = None;
            self.settle_pending_config();
        }
        let target = sanitize(
            &self.transform,
            Transform2D::new(position, scale, rotation),
            &self.config,
        );
        if animated {
            let secs = duration.unwrap_or_else(|| duration_for(self.transform.scale, target.scale));
            self.animation = Some(TransformAnimation::new(self.transform, target, secs));
        } else {
            self.mutate(ChangeCause::Reset, target);
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Prepares for a new `kind` session and reports whether it overlaps a
    /// gesture of another kind; overlapped sessions are marked shared.
    fn preempt(&mut self, kind: GestureKind) -> bool {
        let active = self.active_gestures();
        if active.contains(kind) {
            debug!(?kind, "gesture began twice; restarting");
        }
        self.animation = None;
        let others = match kind {
            GestureKind::Pan => active.pinch || active.rotate,
            GestureKind::Pinch => active.pan || active.rotate,
            GestureKind::Rotate => active.pan || active.pinch,
        };
        if others {
            if let Some(s) = self.pan.as_mut() {
                s.shared = true;
            }
            if let Some(s) = self.pinch.as_mut() {
                s.shared = true;
            }
            if let Some(s) = self.rotate.as_mut() {
                s.shared = true;
            }
        }
        others
    }

    fn mutate(&mut self, cause: ChangeCause, next: Transform2D) {
        if next == self.transform {
            return;
        }
        let previous = self.transform;
        self.observers.emit(&ViewportEvent::WillChange {
            cause,
            current: previous,
        });
        self.transform = next;
        self.observers.emit(&ViewportEvent::DidChange {
            cause,
            previous,
            current: next,
        });
    }
}

/// `pose` rescaled to `scale` with scene point `focal` held fixed on screen.
fn zoom_about(pose: Transform2D, focal: DVec2, scale: f64) -> Transform2D {
    Transform2D::new(
        focal + (pose.translation - focal) * (scale / pose.scale),
        scale,
        pose.rotation,
    )
}

fn sanitize(current: &Transform2D, target: Transform2D, cfg: &ViewportConfig) -> Transform2D {
    let translation = if target.translation.is_finite() {
        target.translation
    } else {
        current.translation
    };
    let scale = if target.scale.is_finite() {
        target.scale
    } else {
        current.scale
    };
    let rotation = if target.rotation.is_finite() {
        target.rotation
    } else {
        current.rotation
    };
    Transform2D::new(
        translation,
        clamp_scale(scale, cfg.min_scale, cfg.max_scale),
        rotation,
    )
}
