// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Scalar and planar helpers shared by the controller.
//!
//! Axis conventions:
//! - Host (view) space is y-down, matching screen coordinates.
//! - Camera-local and scene space are y-up.
//! - Angles are radians, counter-clockwise in y-up space.

use glam::DVec2;

/// Rotates `v` counter-clockwise by `radians`.
pub fn rotate(v: DVec2, radians: f64) -> DVec2 {
    if radians == 0.0 {
        return v;
    }
    DVec2::from_angle(radians).rotate(v)
}

/// Converts a host-space vector (y-down) into camera-local axes (y-up).
pub fn host_to_local(v: DVec2) -> DVec2 {
    DVec2::new(v.x, -v.y)
}

/// Converts a camera-local vector (y-up) back into host axes (y-down).
///
/// The y-flip is its own inverse; this exists so call sites read in the
/// direction of the conversion.
pub fn local_to_host(v: DVec2) -> DVec2 {
    host_to_local(v)
}

/// Clamps `value` to `[min, max]`.
///
/// A non-finite `value` collapses to `min` so a bad sample can never escape
/// the zoom bounds.
pub fn clamp_scale(value: f64, min: f64, max: f64) -> f64 {
    debug_assert!(min <= max, "invalid scale range: {min} > {max}");
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Returns `0.0` when `|value| < eps` or `value` is not finite.
pub fn snap(value: f64, eps: f64) -> f64 {
    if !value.is_finite() || value.abs() < eps {
        0.0
    } else {
        value
    }
}

/// Applies [`snap`] to each component of `v`.
pub fn snap_vec(v: DVec2, eps: f64) -> DVec2 {
    DVec2::new(snap(v.x, eps), snap(v.y, eps))
}

/// Returns `value` when finite, otherwise `0.0`.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Distance covered, in units of the starting per-frame velocity, while a
/// velocity decays by `friction` per reference frame for `steps` frames.
///
/// This is the geometric sum `f + f² + … + f^steps` extended to fractional
/// `steps`: it equals `friction` for one step and is additive over any split
/// of the same total, so the coast distance does not depend on how time is
/// sliced into frames. `friction` must lie in `(0, 1)`.
pub fn coast_distance(friction: f64, steps: f64) -> f64 {
    friction * (1.0 - friction.powf(steps)) / (1.0 - friction)
}

/// Smoothstep ease-in-out on `[0, 1]`; inputs outside the range are clamped.
pub fn ease_in_out(t: f64) -> f64 {
    let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
    t * t * (3.0 - 2.0 * t)
}
