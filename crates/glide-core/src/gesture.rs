// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Discrete gesture samples delivered by the host input layer.
//!
//! A sample is consumed immediately by the controller and never stored.
//! Each recognised gesture is expected to deliver one `Began`, zero or more
//! `Changed`, then exactly one of `Ended` / `Cancelled`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Which gesture a sample belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// One-finger drag.
    Pan,
    /// Two-finger pinch-zoom.
    Pinch,
    /// Two-finger twist.
    Rotate,
}

/// Lifecycle phase carrying its phase-specific payload.
///
/// - `Began`: focal point in host space.
/// - `Changed(C)`: pan focal point, pinch cumulative scale factor, or
///   rotate cumulative angle (radians) since the gesture began.
/// - `Ended(E)`: host exit velocity (points/s for pan, factor/s or rad/s for
///   pinch and rotate).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase<C, E> {
    /// Gesture recognised at a focal point.
    Began(DVec2),
    /// Gesture progressed.
    Changed(C),
    /// Gesture released with an exit velocity.
    Ended(E),
    /// Gesture aborted by the host.
    Cancelled,
}

/// One gesture callback from the host.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureSample {
    /// Pan: `Changed` carries the current focal point, `Ended` the 2D exit velocity.
    Pan(GesturePhase<DVec2, DVec2>),
    /// Pinch: `Changed` carries the cumulative scale factor.
    Pinch(GesturePhase<f64, f64>),
    /// Rotate: `Changed` carries the cumulative angle.
    Rotate(GesturePhase<f64, f64>),
}

impl GestureSample {
    /// Gesture this sample belongs to.
    pub const fn kind(&self) -> GestureKind {
        match self {
            Self::Pan(_) => GestureKind::Pan,
            Self::Pinch(_) => GestureKind::Pinch,
            Self::Rotate(_) => GestureKind::Rotate,
        }
    }

    /// True for `Ended` and `Cancelled`.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Pan(GesturePhase::Ended(_) | GesturePhase::Cancelled)
                | Self::Pinch(GesturePhase::Ended(_) | GesturePhase::Cancelled)
                | Self::Rotate(GesturePhase::Ended(_) | GesturePhase::Cancelled)
        )
    }
}

/// Set of gestures currently between `Began` and their terminal phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ActiveGestures {
    /// Pan in progress.
    pub pan: bool,
    /// Pinch in progress.
    pub pinch: bool,
    /// Rotate in progress.
    pub rotate: bool,
}

impl ActiveGestures {
    /// True when no gesture is in progress.
    pub const fn is_idle(&self) -> bool {
        !(self.pan || self.pinch || self.rotate)
    }

    /// Whether `kind` is in progress.
    pub const fn contains(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Pan => self.pan,
            GestureKind::Pinch => self.pinch,
            GestureKind::Rotate => self.rotate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_deserialize_from_script_json() {
        let s: GestureSample = serde_json::from_str(r#"{ "pinch": { "changed": 2.0 } }"#)
            .expect("valid json");
        assert_eq!(s, GestureSample::Pinch(GesturePhase::Changed(2.0)));

        let s: GestureSample = serde_json::from_str(r#"{ "pan": { "began": [1.0, 2.0] } }"#)
            .expect("valid json");
        assert_eq!(s, GestureSample::Pan(GesturePhase::Began(DVec2::new(1.0, 2.0))));

        let s: GestureSample = serde_json::from_str(r#"{ "rotate": "cancelled" }"#)
            .expect("valid json");
        assert!(s.is_terminal());
        assert_eq!(s.kind(), GestureKind::Rotate);
    }

    #[test]
    fn idle_tracks_all_kinds() {
        let mut active = ActiveGestures::default();
        assert!(active.is_idle());
        active.rotate = true;
        assert!(!active.is_idle());
        assert!(active.contains(GestureKind::Rotate));
        assert!(!active.contains(GestureKind::Pan));
    }
}
