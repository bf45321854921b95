//! The reactive wrapper.
//!
//! `observe` walks a value graph and turns it into an observable one. Each
//! container node gets an `Observer` attached as its ownership marker; the
//! marker carries the node's container-level registry and doubles as the
//! wrap-at-most-once guard, keyed by reference identity.

use crate::dep::Dep;
use crate::node::Reactive;
use std::rc::Rc;

/// The ownership marker attached to every wrapped container node.
///
/// Owns the node's container-level registry: field reads record the active
/// watcher here alongside the field's own registry, and intercepted array
/// mutations notify it.
#[derive(Debug)]
pub struct Observer {
    dep: Rc<Dep>,
}

impl Observer {
    fn new() -> Self {
        Self {
            dep: Rc::new(Dep::new()),
        }
    }

    /// Returns the container-level registry.
    #[inline]
    pub fn dep(&self) -> &Rc<Dep> {
        &self.dep
    }
}

/// Makes a value observable.
///
/// Scalars are not observable and are silently ignored. A container that
/// already carries a marker is returned as-is: wrapping is idempotent and
/// re-wrapping yields the existing marker. An unmarked object is given a
/// marker and a registry per existing field, then every field value is
/// wrapped in turn. An unmarked array is given only the marker: its
/// elements are not walked and its indices are never instrumented; in-place
/// changes are observed through the intercepted mutating operations instead.
pub fn observe(value: &Reactive) -> Option<Rc<Observer>> {
    match value {
        Reactive::Object(obj) => {
            if let Some(existing) = obj.observer() {
                return Some(existing);
            }
            let observer = Rc::new(Observer::new());
            obj.attach(observer.clone());
            // 先打标记再递归，环引用在标记处被截断
            let children = obj.instrument_fields();
            for child in &children {
                observe(child);
            }
            Some(observer)
        }
        Reactive::Array(arr) => {
            if let Some(existing) = arr.observer() {
                return Some(existing);
            }
            let observer = Rc::new(Observer::new());
            arr.attach(observer.clone());
            Some(observer)
        }
        _ => None,
    }
}
