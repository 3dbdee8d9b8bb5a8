//! Watch handles - stop functions that can be called any number of times.
//!
//! spark-signals hands back a one-shot `impl FnOnce()` for every effect.
//! [`WatchHandle`] wraps one so that stopping is idempotent and dropping the
//! handle stops the effect. `Watchers` lets an owner (the composer, the
//! header engine) stop every handle it gave out when it goes away.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type StopFn = Box<dyn FnOnce()>;
type StopSlot = RefCell<Option<StopFn>>;

/// Running effect. Dropping it stops the effect.
#[must_use = "dropping a WatchHandle stops the effect immediately"]
pub struct WatchHandle {
    slot: Rc<StopSlot>,
}

impl WatchHandle {
    pub(crate) fn new(stop: impl FnOnce() + 'static) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(Box::new(stop)))),
        }
    }

    /// Stop the effect. Later calls do nothing.
    pub fn stop(&self) {
        take_and_run(&self.slot);
    }

    pub fn is_active(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        take_and_run(&self.slot);
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

fn take_and_run(slot: &StopSlot) {
    // Release the borrow before running: the effect's teardown may drop
    // other handles.
    let stop = slot.borrow_mut().take();
    if let Some(stop) = stop {
        stop();
    }
}

// =============================================================================
// Watchers
// =============================================================================

/// Handles given out by one owner.
#[derive(Default)]
pub(crate) struct Watchers {
    slots: RefCell<Vec<Weak<StopSlot>>>,
}

impl Watchers {
    /// Wrap `stop` in a handle the owner can also stop.
    pub fn register(&self, stop: impl FnOnce() + 'static) -> WatchHandle {
        let handle = WatchHandle::new(stop);
        let mut slots = self.slots.borrow_mut();
        slots.retain(|s| s.strong_count() > 0);
        slots.push(Rc::downgrade(&handle.slot));
        handle
    }

    /// Stop every handle still alive. Idempotent.
    pub fn stop_all(&self) {
        let slots: Vec<_> = self.slots.borrow_mut().drain(..).collect();
        for slot in slots.iter().filter_map(|s| s.upgrade()) {
            take_and_run(&slot);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|s| s.upgrade().is_some_and(|s| s.borrow().is_some()))
            .count()
    }
}
