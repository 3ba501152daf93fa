// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![forbid(unsafe_code)]
#![doc = r"Inertial 2D viewport control for Glide.

This crate provides:
- A camera pose (`Transform2D`) and the host↔scene projection port (`HostSpace`).
- `ViewportController`: pan, pinch-zoom and twist-rotate gesture handling
  with per-axis momentum that decays after release.
- Exit-velocity estimation (`VelocityTracker`) for hosts without one.
- Synchronous change observers.

Design notes:
- Single owner, frame driven: gesture callbacks and one `advance(dt)` per
  frame, all on the host's render thread.
- Decay is frame-rate independent: frictions are given per reference frame
  and rescaled by `dt`, and coasting distance is the matching geometric sum.
- No error paths during input; bad samples are clamped, snapped or ignored.
  Only configuration is validated.
"]

/// Eased camera-reset transitions.
pub mod animation;
/// Controller tuning and validation.
pub mod config;
/// The viewport controller itself.
pub mod controller;
/// Host gesture samples.
pub mod gesture;
/// Planar math helpers.
pub mod math;
/// Change notifications.
pub mod observer;
/// Exit-velocity estimation.
pub mod tracker;
/// Camera pose and host↔scene projection.
pub mod transform;

pub use config::{InvalidConfig, ViewportConfig, DEFAULT_VELOCITY_DIVISOR};
pub use controller::{VelocityState, ViewportController};
pub use gesture::{ActiveGestures, GestureKind, GesturePhase, GestureSample};
pub use observer::{ChangeCause, ObserverId, ViewportEvent};
pub use tracker::VelocityTracker;
pub use transform::{HostSpace, Transform2D, ViewFrame};

/// Re-export of the vector type used throughout the public API.
pub use glam::DVec2;
