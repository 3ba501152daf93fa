// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::math::{host_to_local, local_to_host, rotate};

/// Camera pose: translation, uniform scale, rotation.
///
/// Conventions:
/// - `translation` is the camera centre in scene units (y-up).
/// - `scale` is scene units per host point; larger values show more of the
///   scene (zoomed out). Always `> 0`; the controller keeps it inside the
///   configured bounds.
/// - `rotation` is in radians, counter-clockwise in scene space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Camera centre in scene space.
    pub translation: DVec2,
    /// Uniform scale (scene units per host point).
    pub scale: f64,
    /// Rotation in radians.
    pub rotation: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// Origin, unit scale, no rotation.
    pub const IDENTITY: Self = Self {
        translation: DVec2::ZERO,
        scale: 1.0,
        rotation: 0.0,
    };

    /// Creates a pose from components.
    pub const fn new(translation: DVec2, scale: f64, rotation: f64) -> Self {
        Self {
            translation,
            scale,
            rotation,
        }
    }

    /// Linear blend of every component; `t` is not clamped.
    pub fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        Self {
            translation: from.translation.lerp(to.translation, t),
            scale: from.scale + (to.scale - from.scale) * t,
            rotation: from.rotation + (to.rotation - from.rotation) * t,
        }
    }

    /// Maps a host-space offset from the view anchor into scene space.
    pub fn view_to_scene(&self, offset: DVec2) -> DVec2 {
        self.translation + rotate(host_to_local(offset) * self.scale, self.rotation)
    }

    /// Maps a scene-space point to its host-space offset from the view anchor.
    pub fn scene_to_view(&self, scene: DVec2) -> DVec2 {
        local_to_host(rotate(scene - self.translation, -self.rotation) / self.scale)
    }
}

/// Host↔scene conversion supplied by the embedding application.
///
/// The controller uses this to locate gesture focal points in scene space
/// when a pinch or rotate begins. Implementations must be pure functions of
/// `pose` and `point`.
pub trait HostSpace {
    /// Converts a host-space point into scene space under `pose`.
    fn host_to_scene(&self, pose: &Transform2D, point: DVec2) -> DVec2;
    /// Converts a scene-space point into host space under `pose`.
    fn scene_to_host(&self, pose: &Transform2D, point: DVec2) -> DVec2;
}

/// Stock [`HostSpace`]: a view whose `anchor` (usually its centre) shows the
/// camera translation.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewFrame {
    /// Host-space point the camera centre projects to.
    pub anchor: DVec2,
}

impl ViewFrame {
    /// Frame anchored at `anchor`.
    pub const fn new(anchor: DVec2) -> Self {
        Self { anchor }
    }

    /// Frame anchored at the centre of a `width × height` view.
    pub fn centered(width: f64, height: f64) -> Self {
        Self::new(DVec2::new(width * 0.5, height * 0.5))
    }
}

impl HostSpace for ViewFrame {
    fn host_to_scene(&self, pose: &Transform2D, point: DVec2) -> DVec2 {
        pose.view_to_scene(point - self.anchor)
    }

    fn scene_to_host(&self, pose: &Transform2D, point: DVec2) -> DVec2 {
        self.anchor + pose.scene_to_view(point)
    }
}

impl<F> HostSpace for F
where
    F: Fn(&Transform2D, DVec2) -> DVec2,
{
    fn host_to_scene(&self, pose: &Transform2D, point: DVec2) -> DVec2 {
        self(pose, point)
    }

    /// Closures only describe the forward mapping; the inverse is recovered
    /// by linearising the closure around `point` under `pose`.
    fn scene_to_host(&self, pose: &Transform2D, point: DVec2) -> DVec2 {
        let origin = self(pose, DVec2::ZERO);
        let ex = self(pose, DVec2::X) - origin;
        let ey = self(pose, DVec2::Y) - origin;
        let det = ex.perp_dot(ey);
        if det == 0.0 || !det.is_finite() {
            return DVec2::ZERO;
        }
        let rel = point - origin;
        DVec2::new(rel.perp_dot(ey) / det, ex.perp_dot(rel) / det)
    }
}
