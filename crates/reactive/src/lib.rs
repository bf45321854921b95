//! Mimosa Reactive - Fine-grained reactive dependency tracking.
//!
//! This crate turns a plain document into an observable graph: reading a
//! field while a watcher evaluates registers the watcher as a dependent of
//! that field, and writing the field re-runs every dependent. No manual
//! subscription wiring is needed.
//!
//! # Core Concepts
//!
//! - `Reactive`: a node in the observable graph (scalars by value,
//!   containers as shared handles)
//! - `observe()`: recursively wraps a graph, installing a `Dep` per field
//! - `Dep`: the per-field (and per-container) registry of dependents
//! - `Watcher`: a derived computation that re-runs and reports
//!   `(new, old)` when any field it read is written
//! - `ReactiveArray`: intercepts the mutating list operations, which field
//!   accessors cannot see, and notifies the container's registry
//!
//! # Example
//!
//! ```rust
//! use mimosa_reactive::{observe, Object, Reactive, Value, Watcher};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! // {a: 1, b: {c: 2}}
//! let mut b = Object::new();
//! b.insert("c".into(), Value::Number(2.0));
//! let mut root = Object::new();
//! root.insert("a".into(), Value::Number(1.0));
//! root.insert("b".into(), Value::Object(b));
//!
//! let root = Reactive::from(Value::Object(root));
//! observe(&root);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! let watcher = Watcher::new(root.clone(), "b.c", move |new, old| {
//!     sink.borrow_mut().push((new.as_f64(), old.as_f64()));
//! })
//! .unwrap();
//! assert_eq!(watcher.value().as_f64(), Some(2.0));
//!
//! // Writing the tracked field re-runs the watcher.
//! root.get("b").unwrap().as_object().unwrap().set("c", 5.0);
//! assert_eq!(seen.borrow().last(), Some(&(Some(5.0), Some(2.0))));
//! ```

mod array;
mod context;
mod dep;
mod node;
mod observe;
mod watcher;

pub use array::ReactiveArray;
pub use context::is_tracking;
pub use dep::Dep;
pub use node::{Reactive, ReactiveObject};
pub use observe::{observe, Observer};
pub use watcher::{ChangeCallback, Watcher};

// Re-export commonly used types from dependencies
pub use mimosa_core::{Object, ParseError, Path, Value};
