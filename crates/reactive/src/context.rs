//! The active-watcher slot.
//!
//! While a watcher evaluates its getter, it occupies this slot; every field
//! read that happens during the evaluation finds it here and records it as a
//! dependent. The slot is thread-local, so evaluations on separate threads
//! cannot see each other's watcher.
//!
//! The slot holds at most one watcher: it is set immediately before a get
//! cycle and cleared immediately after. Re-entrant get cycles (a getter that
//! synchronously evaluates another watcher) are not supported.

use crate::watcher::WatcherCore;
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    static ACTIVE_WATCHER: RefCell<Option<Rc<WatcherCore>>> = const { RefCell::new(None) };
}

/// Puts a watcher into the slot for the duration of its get cycle.
pub(crate) fn set_active(watcher: Rc<WatcherCore>) {
    ACTIVE_WATCHER.with(|slot| *slot.borrow_mut() = Some(watcher));
}

/// Empties the slot at the end of a get cycle.
pub(crate) fn clear_active() {
    ACTIVE_WATCHER.with(|slot| *slot.borrow_mut() = None);
}

/// Returns the watcher currently evaluating, if any.
pub(crate) fn active() -> Option<Rc<WatcherCore>> {
    ACTIVE_WATCHER.with(|slot| slot.borrow().clone())
}

/// Returns true while a watcher evaluation is in progress on this thread.
pub fn is_tracking() -> bool {
    ACTIVE_WATCHER.with(|slot| slot.borrow().is_some())
}
