// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording observer for change-notification assertions.

use glide_core::{ChangeCause, HostSpace, ObserverId, ViewportController, ViewportEvent};
use std::cell::RefCell;
use std::rc::Rc;

/// Collects every [`ViewportEvent`] a controller emits.
///
/// # Example
///
/// ```
/// use glide_core::{ViewportController, DVec2};
/// use glide_dry_tests::RecordingObserver;
///
/// let mut controller = ViewportController::default();
/// let events = RecordingObserver::attach(&mut controller);
/// controller.set_immediate(DVec2::new(1.0, 0.0), 1.0, 0.0, false, None);
/// assert_eq!(events.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<ViewportEvent>>>,
    id: Option<ObserverId>,
}

impl RecordingObserver {
    /// Subscribes a fresh recorder to `controller`.
    pub fn attach<S: HostSpace>(controller: &mut ViewportController<S>) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = controller.subscribe(move |e| sink.borrow_mut().push(*e));
        Self {
            events,
            id: Some(id),
        }
    }

    /// Subscription handle, if attached.
    pub fn id(&self) -> Option<ObserverId> {
        self.id
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<ViewportEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Causes of recorded `DidChange` events, in order.
    pub fn did_change_causes(&self) -> Vec<ChangeCause> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ViewportEvent::DidChange { cause, .. } => Some(*cause),
                _ => None,
            })
            .collect()
    }

    /// Number of `InertiaSettled` notifications.
    pub fn settled_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, ViewportEvent::InertiaSettled))
            .count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
