//! Reactive array nodes and mutation interception.
//!
//! Field accessors can only observe assignment to a named field; they never
//! see an in-place structural mutation invoked on the container itself.
//! `ReactiveArray` therefore decorates the backing storage and overrides
//! exactly the mutating operation set (push, pop, shift, unshift, sort_by,
//! reverse, splice) to perform the native mutation, then notify the
//! registry owned by the array's wrapper, then return the native result.
//! Reads pass through untouched and register nothing: index access is not
//! field-level observable, only whole-array replacement and the intercepted
//! mutations are.

use crate::node::Reactive;
use crate::observe::Observer;
use mimosa_core::Value;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

#[derive(Debug, Default)]
pub(crate) struct ArrayData {
    pub(crate) items: Vec<Reactive>,
    /// Ownership marker: present once this node has been wrapped.
    pub(crate) observer: Option<Rc<Observer>>,
}

/// Handle to a shared list node in the reactive graph.
///
/// Clones share the underlying node; `ptr_eq` compares handle identity.
#[derive(Clone, Debug, Default)]
pub struct ReactiveArray {
    data: Rc<RefCell<ArrayData>>,
}

impl ReactiveArray {
    /// Creates a new empty array node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an array node from reactive items.
    pub fn from_vec(items: Vec<Reactive>) -> Self {
        Self {
            data: Rc::new(RefCell::new(ArrayData {
                items,
                observer: None,
            })),
        }
    }

    /// Builds an un-instrumented array node from plain values.
    pub(crate) fn from_values(values: Vec<Value>) -> Self {
        Self::from_vec(values.into_iter().map(Reactive::from).collect())
    }

    /// Returns the number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.borrow().items.len()
    }

    /// Returns true if the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.borrow().items.is_empty()
    }

    /// Reads an item by index. Index reads are not tracked.
    pub fn get(&self, index: usize) -> Option<Reactive> {
        self.data.borrow().items.get(index).cloned()
    }

    /// Returns a snapshot of the items.
    pub fn to_vec(&self) -> Vec<Reactive> {
        self.data.borrow().items.clone()
    }

    /// Returns true if both handles refer to the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Returns this node's ownership marker, if it has been wrapped.
    pub fn observer(&self) -> Option<Rc<Observer>> {
        self.data.borrow().observer.clone()
    }

    pub(crate) fn attach(&self, observer: Rc<Observer>) {
        self.data.borrow_mut().observer = Some(observer);
    }

    /// Appends an item and returns the new length.
    pub fn push(&self, value: impl Into<Reactive>) -> usize {
        let len = {
            let mut data = self.data.borrow_mut();
            data.items.push(value.into());
            data.items.len()
        };
        self.notify_mutation();
        len
    }

    /// Removes and returns the last item.
    pub fn pop(&self) -> Option<Reactive> {
        let removed = self.data.borrow_mut().items.pop();
        self.notify_mutation();
        removed
    }

    /// Removes and returns the first item.
    pub fn shift(&self) -> Option<Reactive> {
        let removed = {
            let mut data = self.data.borrow_mut();
            if data.items.is_empty() {
                None
            } else {
                Some(data.items.remove(0))
            }
        };
        self.notify_mutation();
        removed
    }

    /// Prepends an item and returns the new length.
    pub fn unshift(&self, value: impl Into<Reactive>) -> usize {
        let len = {
            let mut data = self.data.borrow_mut();
            data.items.insert(0, value.into());
            data.items.len()
        };
        self.notify_mutation();
        len
    }

    /// Sorts the items in place with the given comparator.
    pub fn sort_by<F>(&self, compare: F)
    where
        F: FnMut(&Reactive, &Reactive) -> Ordering,
    {
        self.data.borrow_mut().items.sort_by(compare);
        self.notify_mutation();
    }

    /// Reverses the items in place.
    pub fn reverse(&self) {
        self.data.borrow_mut().items.reverse();
        self.notify_mutation();
    }

    /// Removes `delete_count` items starting at `start`, inserts `items` in
    /// their place, and returns the removed items. Out-of-range `start` and
    /// `delete_count` clamp to the array bounds.
    pub fn splice(
        &self,
        start: usize,
        delete_count: usize,
        items: Vec<Reactive>,
    ) -> Vec<Reactive> {
        let removed = {
            let mut data = self.data.borrow_mut();
            let len = data.items.len();
            let start = start.min(len);
            let delete_count = delete_count.min(len - start);
            data.items
                .splice(start..start + delete_count, items)
                .collect()
        };
        self.notify_mutation();
        removed
    }

    /// Notifies the wrapper's registry after a mutation. Un-wrapped arrays
    /// mutate silently. Notification is unconditional per intercepted call,
    /// whether or not the contents changed.
    fn notify_mutation(&self) {
        let dep = self
            .data
            .borrow()
            .observer
            .as_ref()
            .map(|ob| ob.dep().clone());
        if let Some(dep) = dep {
            dep.notify();
        }
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

    fn numbers(values: &[f64]) -> ReactiveArray {
        ReactiveArray::from_vec(values.iter().map(|&n| Reactive::Number(n)).collect())
    }

    fn contents(arr: &ReactiveArray) -> Vec<f64> {
        arr.to_vec().iter().filter_map(|v| v.as_f64()).collect()
    }

    /// Wraps a list in an observed root and counts watcher updates.
    fn counted(arr: &ReactiveArray) -> (Watcher, Rc<RefCell<usize>>) {
        let mut root = Object::new();
        root.insert("list".into(), Value::Null);
        let root = Reactive::from(Value::Object(root));
        root.as_object()
            .unwrap()
            .set("list", Reactive::Array(arr.clone()));
        observe(&root);

        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let watcher = Watcher::new(root, "list", move |_, _| {
            *c.borrow_mut() += 1;
        })
        .unwrap();
        (watcher, count)
    }

    #[test]
    fn test_push_returns_new_length() {
        let arr = numbers(&[1.0, 2.0]);
        assert_eq!(arr.push(3.0), 3);
        assert_eq!(contents(&arr), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_pop_and_shift() {
        let arr = numbers(&[1.0, 2.0, 3.0]);
        assert_eq!(arr.pop().and_then(|v| v.as_f64()), Some(3.0));
        assert_eq!(arr.shift().and_then(|v| v.as_f64()), Some(1.0));
        assert_eq!(contents(&arr), vec![2.0]);

        let empty = numbers(&[]);
        assert!(empty.pop().is_none());
        assert!(empty.shift().is_none());
    }

    #[test]
    fn test_unshift() {
        let arr = numbers(&[2.0]);
        assert_eq!(arr.unshift(1.0), 2);
        assert_eq!(contents(&arr), vec![1.0, 2.0]);
    }

    #[test]
    fn test_sort_by_and_reverse() {
        let arr = numbers(&[3.0, 1.0, 2.0]);
        arr.sort_by(|a, b| a.as_f64().partial_cmp(&b.as_f64()).unwrap());
        assert_eq!(contents(&arr), vec![1.0, 2.0, 3.0]);

        arr.reverse();
        assert_eq!(contents(&arr), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_splice_removes_and_inserts() {
        let arr = numbers(&[1.0, 2.0, 3.0, 4.0]);
        let removed = arr.splice(1, 2, vec![Reactive::Number(9.0)]);

        assert_eq!(
            removed.iter().filter_map(|v| v.as_f64()).collect::<Vec<_>>(),
            vec![2.0, 3.0]
        );
        assert_eq!(contents(&arr), vec![1.0, 9.0, 4.0]);
    }

    #[test]
    fn test_splice_clamps_to_bounds() {
        let arr = numbers(&[1.0, 2.0]);

        // Start beyond the end appends.
        let removed = arr.splice(10, 5, vec![Reactive::Number(3.0)]);
        assert!(removed.is_empty());
        assert_eq!(contents(&arr), vec![1.0, 2.0, 3.0]);

        // Delete count beyond the end clamps.
        let removed = arr.splice(1, 100, vec![]);
        assert_eq!(removed.len(), 2);
        assert_eq!(contents(&arr), vec![1.0]);
    }

    #[test]
    fn test_mutations_notify_once_per_call() {
        let arr = numbers(&[1.0]);
        let (_watcher, count) = counted(&arr);

        arr.push(2.0);
        assert_eq!(*count.borrow(), 1);

        arr.unshift(0.0);
        assert_eq!(*count.borrow(), 2);

        arr.splice(0, 1, vec![]);
        assert_eq!(*count.borrow(), 3);

        arr.reverse();
        assert_eq!(*count.borrow(), 4);

        arr.sort_by(|a, b| a.as_f64().partial_cmp(&b.as_f64()).unwrap());
        assert_eq!(*count.borrow(), 5);

        arr.shift();
        assert_eq!(*count.borrow(), 6);
    }

    #[test]
    fn test_empty_pop_still_notifies() {
        let arr = numbers(&[]);
        let (_watcher, count) = counted(&arr);

        arr.pop();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_reads_do_not_notify() {
        let arr = numbers(&[1.0, 2.0]);
        let (_watcher, count) = counted(&arr);

        let _ = arr.get(0);
        let _ = arr.len();
        let _ = arr.to_vec();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_unwrapped_array_mutates_silently() {
        let arr = numbers(&[1.0]);
        assert!(arr.observer().is_none());
        arr.push(2.0);
        assert_eq!(contents(&arr), vec![1.0, 2.0]);
    }
}
