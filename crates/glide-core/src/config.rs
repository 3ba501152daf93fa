// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Controller tuning: zoom bounds, per-axis friction, stop thresholds, locks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Divisor applied to host exit velocities when a gesture ends.
///
/// Empirical tuning constant: hand-adjusted so the default frictions feel
/// natural on a phone-sized view. It is not a physical unit conversion and
/// there is no "correct" value to derive.
pub const DEFAULT_VELOCITY_DIVISOR: f64 = 100.0;

/// Frame rate at which friction factors are specified.
pub const DEFAULT_REFERENCE_FRAME_RATE: f64 = 60.0;

/// Invalid configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidConfig {
    /// A friction factor lies outside the open interval `(0, 1)`.
    #[error("{axis} friction must lie in (0, 1), got {value}")]
    Friction {
        /// Axis name (`position`, `scale`, `rotation`).
        axis: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Zoom bounds are non-positive, non-finite, or inverted.
    #[error("scale bounds must satisfy 0 < min <= max, got [{min}, {max}]")]
    ScaleBounds {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
    /// A stop threshold is not a positive finite number.
    #[error("{axis} stop epsilon must be finite and > 0, got {value}")]
    Epsilon {
        /// Axis name.
        axis: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A strictly positive tuning value is not.
    #[error("{field} must be finite and > 0, got {value}")]
    NonPositive {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

/// Tuning for a [`ViewportController`](crate::ViewportController).
///
/// Frictions are per-frame factors at [`reference_frame_rate`](Self::reference_frame_rate);
/// the controller rescales them to the actual frame time. Missing fields
/// deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Smallest allowed scale (most zoomed in).
    pub min_scale: f64,
    /// Largest allowed scale (most zoomed out).
    pub max_scale: f64,
    /// Per-frame decay factor for translation velocity.
    pub position_friction: f64,
    /// Per-frame decay factor for scale velocity.
    pub scale_friction: f64,
    /// Per-frame decay factor for rotation velocity.
    pub rotation_friction: f64,
    /// Translation velocity components below this snap to zero.
    pub stop_epsilon_position: f64,
    /// Scale velocity below this snaps to zero.
    pub stop_epsilon_scale: f64,
    /// Rotation velocity below this snaps to zero.
    pub stop_epsilon_rotation: f64,
    /// Disables panning.
    pub lock_pan: bool,
    /// Disables pinch-zoom.
    pub lock_zoom: bool,
    /// Disables twist-rotate.
    pub lock_rotation: bool,
    /// See [`DEFAULT_VELOCITY_DIVISOR`].
    pub velocity_divisor: f64,
    /// See [`DEFAULT_REFERENCE_FRAME_RATE`].
    pub reference_frame_rate: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 10.0,
            position_friction: 0.9,
            scale_friction: 0.9,
            rotation_friction: 0.9,
            stop_epsilon_position: 0.01,
            stop_epsilon_scale: 0.0001,
            stop_epsilon_rotation: 0.0001,
            lock_pan: false,
            lock_zoom: false,
            lock_rotation: false,
            velocity_divisor: DEFAULT_VELOCITY_DIVISOR,
            reference_frame_rate: DEFAULT_REFERENCE_FRAME_RATE,
        }
    }
}

impl ViewportConfig {
    /// Checks every invariant; the first violation wins.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        for (axis, value) in [
            ("position", self.position_friction),
            ("scale", self.scale_friction),
            ("rotation", self.rotation_friction),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(InvalidConfig::Friction { axis, value });
            }
        }
        let (min, max) = (self.min_scale, self.max_scale);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(InvalidConfig::ScaleBounds { min, max });
        }
        for (axis, value) in [
            ("position", self.stop_epsilon_position),
            ("scale", self.stop_epsilon_scale),
            ("rotation", self.stop_epsilon_rotation),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(InvalidConfig::Epsilon { axis, value });
            }
        }
        for (field, value) in [
            ("velocity_divisor", self.velocity_divisor),
            ("reference_frame_rate", self.reference_frame_rate),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(InvalidConfig::NonPositive { field, value });
            }
        }
        Ok(())
    }
}
