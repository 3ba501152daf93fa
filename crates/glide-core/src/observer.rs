// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Synchronous change notifications around every transform mutation.

use crate::transform::Transform2D;

/// What caused a transform mutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChangeCause {
    /// Active pan gesture.
    Pan,
    /// Active pinch gesture.
    Pinch,
    /// Active rotate gesture.
    Rotate,
    /// Momentum decay after release.
    Inertia,
    /// Animated `set_immediate`.
    Animation,
    /// Instant `set_immediate`.
    Reset,
    /// Cancelled gesture restoring its start pose.
    Cancel,
}

/// Notification delivered to observers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewportEvent {
    /// Emitted right before the transform changes.
    WillChange {
        /// Cause of the mutation.
        cause: ChangeCause,
        /// Transform about to be replaced.
        current: Transform2D,
    },
    /// Emitted right after the transform changed.
    DidChange {
        /// Cause of the mutation.
        cause: ChangeCause,
        /// Transform before the mutation.
        previous: Transform2D,
        /// Transform after the mutation.
        current: Transform2D,
    },
    /// The last residual velocity snapped to zero.
    InertiaSettled,
}

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

type Callback = Box<dyn FnMut(&ViewportEvent)>;

/// Ordered observer list; callbacks run in subscription order.
#[derive(Default)]
pub struct Observers {
    entries: Vec<(ObserverId, Callback)>,
    next_id: u64,
}

impl core::fmt::Debug for Observers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Observers {
    /// Registers `callback`.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(&ViewportEvent) + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Removes the observer; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(eid, _)| *eid != id);
        self.entries.len() != before
    }

    /// Delivers `event` to every observer.
    pub fn emit(&mut self, event: &ViewportEvent) {
        for (_, cb) in &mut self.entries {
            cb(event);
        }
    }

    /// True when nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
