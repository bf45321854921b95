//! Mimosa Core - Plain document model for the Mimosa reactive engine.
//!
//! This crate provides the un-instrumented data shapes that the reactive
//! layer wraps:
//!
//! - `Value`: a JSON-like document value (Null, Bool, Number, String, Array, Object)
//! - `Object`: a mapping with sorted keys for O(log n) lookup
//! - `Path`: a dotted field path (`a.b.c`) with a restricted alphabet
//!
//! # Example
//!
//! ```rust
//! use mimosa_core::{Object, Path, Value};
//!
//! let mut profile = Object::new();
//! profile.insert("name".into(), Value::String("Alice".into()));
//!
//! let mut root = Object::new();
//! root.insert("profile".into(), Value::Object(profile));
//! let root = Value::Object(root);
//!
//! let path = Path::parse("profile.name").unwrap();
//! assert_eq!(path.resolve(&root), Some(&Value::String("Alice".into())));
//! ```

#![no_std]

extern crate alloc;

mod path;
mod value;

pub use path::{ParseError, Path};
pub use value::{Object, Value};
