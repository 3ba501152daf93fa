// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Exit-velocity estimation for hosts without a native velocity tracker.

use std::collections::VecDeque;
use std::ops::{Div, Sub};

use glam::DVec2;

/// Samples older than this (relative to the newest) are ignored.
pub const DEFAULT_HORIZON_SECS: f64 = 0.1;

/// Maximum retained samples.
pub const HISTORY_SIZE: usize = 20;

/// Quantity a [`VelocityTracker`] can differentiate.
pub trait Trackable: Copy + Sub<Output = Self> + Div<f64, Output = Self> {
    /// Additive identity.
    const ZERO: Self;
    /// True when every component is finite.
    fn is_finite_value(self) -> bool;
}

impl Trackable for f64 {
    const ZERO: Self = 0.0;
    fn is_finite_value(self) -> bool {
        self.is_finite()
    }
}

impl Trackable for DVec2 {
    const ZERO: Self = DVec2::ZERO;
    fn is_finite_value(self) -> bool {
        self.is_finite()
    }
}

/// Ring of timestamped samples; velocity is displacement over elapsed time
/// between the oldest and newest sample inside the horizon.
///
/// Zero elapsed time (several samples in one frame) yields zero velocity
/// rather than a non-finite value.
#[derive(Debug, Clone)]
pub struct VelocityTracker<T> {
    samples: VecDeque<(f64, T)>,
    horizon: f64,
}

impl<T: Trackable> Default for VelocityTracker<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_SECS)
    }
}

impl<T: Trackable> VelocityTracker<T> {
    /// Tracker keeping samples no older than `horizon` seconds.
    pub fn new(horizon: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_SIZE),
            horizon,
        }
    }

    /// Records `value` observed at `time` seconds.
    ///
    /// A sample older than the newest one restarts the history.
    pub fn push(&mut self, time: f64, value: T) {
        if !time.is_finite() || !value.is_finite_value() {
            return;
        }
        if self.samples.back().is_some_and(|&(t, _)| time < t) {
            self.samples.clear();
        }
        if self.samples.len() == HISTORY_SIZE {
            self.samples.pop_front();
        }
        self.samples.push_back((time, value));
        while self
            .samples
            .front()
            .is_some_and(|&(t, _)| time - t > self.horizon)
        {
            self.samples.pop_front();
        }
    }

    /// Units per second; zero when the estimate is undefined.
    pub fn velocity(&self) -> T {
        let (Some(&(t0, v0)), Some(&(t1, v1))) = (self.samples.front(), self.samples.back())
        else {
            return T::ZERO;
        };
        let elapsed = t1 - t0;
        if elapsed <= 0.0 || !elapsed.is_finite() {
            return T::ZERO;
        }
        let v = (v1 - v0) / elapsed;
        if v.is_finite_value() {
            v
        } else {
            T::ZERO
        }
    }

    /// Drops all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
