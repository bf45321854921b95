//! Dependency registries.
//!
//! A `Dep` is the subscriber list behind one reactive field, or behind one
//! container instance. Reads record the active watcher into it; writes (and
//! intercepted container mutations) notify everything it has recorded.

use crate::context;
use crate::watcher::{Watcher, WatcherCore};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A registry of watchers interested in one field or container.
///
/// Entries are weak back-references: a Dep never keeps a watcher alive, and
/// entries whose watcher has been dropped are skipped at notify time.
/// `depend` records a given watcher at most once per registry, so a watcher
/// that re-evaluates (or reads the same field several times in one pass)
/// still receives a single update per write.
#[derive(Debug, Default)]
pub struct Dep {
    subs: RefCell<Vec<Weak<WatcherCore>>>,
}

impl Dep {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            subs: RefCell::new(Vec::new()),
        }
    }

    /// Records the currently evaluating watcher, if there is one.
    ///
    /// A watcher already present in this registry is not recorded again.
    pub fn depend(&self) {
        if let Some(active) = context::active() {
            let mut subs = self.subs.borrow_mut();
            if !subs.iter().any(|w| w.as_ptr() == Rc::as_ptr(&active)) {
                subs.push(Rc::downgrade(&active));
            }
        }
    }

    /// Appends a watcher explicitly, without the duplicate check.
    pub fn add_sub(&self, watcher: &Watcher) {
        self.subs.borrow_mut().push(watcher.downgrade());
    }

    /// Removes the first entry matching the given watcher by identity.
    ///
    /// Absent entries are a no-op.
    pub fn remove_sub(&self, watcher: &Watcher) {
        let target = watcher.downgrade();
        let mut subs = self.subs.borrow_mut();
        if let Some(idx) = subs.iter().position(|w| w.ptr_eq(&target)) {
            subs.remove(idx);
        }
    }

    /// Updates every recorded watcher, in registration order.
    ///
    /// The subscriber list is snapshotted first: watchers added or removed
    /// as a side effect of an update (a re-evaluating getter re-registers
    /// itself, a callback constructs a new watcher) do not perturb the pass
    /// in progress. Every entry present when notify began is updated exactly
    /// once; dead entries are skipped.
    pub fn notify(&self) {
        let snapshot: Vec<Weak<WatcherCore>> = self.subs.borrow().clone();
        for sub in snapshot {
            if let Some(watcher) = sub.upgrade() {
                WatcherCore::update(&watcher);
            }
        }
    }

    /// Returns the number of recorded entries, dead or alive.
    #[inline]
    pub fn len(&self) -> usize {
        self.subs.borrow().len()
    }

    /// Returns true if nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subs.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Reactive;
    use crate::observe::observe;
    use crate::watcher::Watcher;
    use mimosa_core::{Object, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn observed_root() -> Reactive {
        let mut obj = Object::new();
        obj.insert("x".into(), Value::Number(1.0));
        let root = Reactive::from(Value::Object(obj));
        observe(&root);
        root
    }

    #[test]
    fn test_depend_without_active_watcher() {
        let dep = Dep::new();
        dep.depend();
        assert!(dep.is_empty());
    }

    #[test]
    fn test_add_sub_and_remove_sub() {
        let root = observed_root();
        let watcher = Watcher::new(root, "x", |_, _| {}).unwrap();

        let dep = Dep::new();
        dep.add_sub(&watcher);
        assert_eq!(dep.len(), 1);

        dep.remove_sub(&watcher);
        assert!(dep.is_empty());

        // Removing an absent watcher is a no-op.
        dep.remove_sub(&watcher);
        assert!(dep.is_empty());
    }

    #[test]
    fn test_remove_sub_removes_first_match_only() {
        let root = observed_root();
        let watcher = Watcher::new(root, "x", |_, _| {}).unwrap();

        let dep = Dep::new();
        dep.add_sub(&watcher);
        dep.add_sub(&watcher);
        assert_eq!(dep.len(), 2);

        dep.remove_sub(&watcher);
        assert_eq!(dep.len(), 1);
    }

    #[test]
    fn test_notify_in_registration_order() {
        let root = observed_root();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o1 = order.clone();
        let _w1 = Watcher::new(root.clone(), "x", move |_, _| {
            o1.borrow_mut().push(1);
        })
        .unwrap();

        let o2 = order.clone();
        let _w2 = Watcher::new(root.clone(), "x", move |_, _| {
            o2.borrow_mut().push(2);
        })
        .unwrap();

        root.as_object().unwrap().set("x", 2.0);

        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_notify_snapshot_excludes_added_subscribers() {
        let root = observed_root();

        let late_count = Rc::new(RefCell::new(0));
        let late_watcher: Rc<RefCell<Option<Watcher>>> = Rc::new(RefCell::new(None));

        let root_for_cb = root.clone();
        let late_count_for_cb = late_count.clone();
        let late_watcher_for_cb = late_watcher.clone();
        let _w = Watcher::new(root.clone(), "x", move |_, _| {
            // Registers a brand new watcher on the same field while the
            // notify pass for that field is still running.
            if late_watcher_for_cb.borrow().is_none() {
                let count = late_count_for_cb.clone();
                let late = Watcher::new(root_for_cb.clone(), "x", move |_, _| {
                    *count.borrow_mut() += 1;
                })
                .unwrap();
                *late_watcher_for_cb.borrow_mut() = Some(late);
            }
        })
        .unwrap();

        root.as_object().unwrap().set("x", 2.0);
        // The late watcher joined mid-pass and must not have been updated.
        assert_eq!(*late_count.borrow(), 0);

        root.as_object().unwrap().set("x", 3.0);
        assert_eq!(*late_count.borrow(), 1);
    }

    #[test]
    fn test_notify_skips_dropped_watchers() {
        let root = observed_root();
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        let watcher = Watcher::new(root.clone(), "x", move |_, _| {
            *c.borrow_mut() += 1;
        })
        .unwrap();

        let dep = root.as_object().unwrap().field_dep("x").unwrap();
        assert_eq!(dep.len(), 1);

        drop(watcher);
        root.as_object().unwrap().set("x", 2.0);

        assert_eq!(*count.borrow(), 0);
        // The stale entry stays in the list; it is only skipped.
        assert_eq!(dep.len(), 1);
    }
}
