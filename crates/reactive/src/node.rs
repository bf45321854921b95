//! Reactive graph nodes.
//!
//! `Reactive` is the observable counterpart of `mimosa_core::Value`. Scalars
//! are carried by value; containers are cheap reference-counted handles, so
//! cloning a `Reactive` shares identity the way object references do in the
//! source data model. `From<Value>` builds an un-instrumented graph;
//! `observe` (see the `observe` module) attaches the change tracking.
//!
//! Field access goes through explicit accessor methods instead of property
//! interception: every reactive field is a slot holding its current value
//! plus the `Dep` that records dependents. `get` records the active watcher,
//! `set` compares, stores, wraps and notifies.

use crate::array::ReactiveArray;
use crate::dep::Dep;
use crate::observe::{observe, Observer};
use hashbrown::HashMap;
use mimosa_core::{Object, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// A value in the reactive graph.
#[derive(Clone, Debug)]
pub enum Reactive {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// UTF-8 string
    String(String),
    /// Handle to a shared list node
    Array(ReactiveArray),
    /// Handle to a shared mapping node
    Object(ReactiveObject),
}

/// One reactive field: the current value and, once the owning object has
/// been wrapped, the registry of its dependents.
#[derive(Debug)]
pub(crate) struct FieldSlot {
    pub(crate) value: Reactive,
    pub(crate) dep: Option<Rc<Dep>>,
}

#[derive(Debug, Default)]
pub(crate) struct ObjectData {
    pub(crate) fields: HashMap<String, FieldSlot>,
    /// Ownership marker: present once this node has been wrapped.
    pub(crate) observer: Option<Rc<Observer>>,
}

/// Handle to a shared mapping node in the reactive graph.
///
/// Clones share the underlying node; `ptr_eq` compares handle identity.
#[derive(Clone, Debug, Default)]
pub struct ReactiveObject {
    data: Rc<RefCell<ObjectData>>,
}

impl ReactiveObject {
    /// Creates a new empty object node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an un-instrumented object node from a plain object.
    pub fn from_object(obj: Object) -> Self {
        let mut fields = HashMap::with_capacity(obj.len());
        for (key, value) in obj.iter() {
            fields.insert(
                key.to_string(),
                FieldSlot {
                    value: Reactive::from(value.clone()),
                    dep: None,
                },
            );
        }
        Self {
            data: Rc::new(RefCell::new(ObjectData {
                fields,
                observer: None,
            })),
        }
    }

    /// Returns the number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.borrow().fields.len()
    }

    /// Returns true if the object has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.borrow().fields.is_empty()
    }

    /// Returns true if the object contains the given field.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.borrow().fields.contains_key(key)
    }

    /// Returns the field names, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.data.borrow().fields.keys().cloned().collect()
    }

    /// Reads a field.
    ///
    /// If the field is reactive and a watcher is currently evaluating, the
    /// watcher is recorded into the field's registry and, when the value is
    /// a wrapped container, into the container's own registry as well, so
    /// that in-place mutation of the container can notify independently of
    /// whole-value replacement.
    pub fn get(&self, key: &str) -> Option<Reactive> {
        let data = self.data.borrow();
        let slot = data.fields.get(key)?;
        if let Some(dep) = &slot.dep {
            dep.depend();
            if let Some(child) = slot.value.observer() {
                child.dep().depend();
            }
        }
        Some(slot.value.clone())
    }

    /// Writes a field.
    ///
    /// An unchanged value (identity for containers, equality for scalars) is
    /// a silent no-op. Otherwise the value is stored, wrapped if the field
    /// is reactive, and the field's dependents are notified. A key that was
    /// not present at wrap time is inserted as a plain slot that never
    /// notifies: added keys are not retrofitted onto wrapped objects.
    pub fn set(&self, key: &str, value: impl Into<Reactive>) {
        let value = value.into();
        let pending = {
            let mut data = self.data.borrow_mut();
            match data.fields.get_mut(key) {
                Some(slot) => {
                    if slot.value.same(&value) {
                        return;
                    }
                    slot.value = value.clone();
                    slot.dep.clone().map(|dep| (dep, value))
                }
                None => {
                    data.fields.insert(
                        key.to_string(),
                        FieldSlot { value, dep: None },
                    );
                    None
                }
            }
        };
        // The borrow is dropped before notify so that re-evaluating
        // watchers can read this object again.
        if let Some((dep, new_value)) = pending {
            observe(&new_value);
            dep.notify();
        }
    }

    /// Returns the registry behind a reactive field, if the field exists and
    /// has been wrapped.
    pub fn field_dep(&self, key: &str) -> Option<Rc<Dep>> {
        self.data
            .borrow()
            .fields
            .get(key)
            .and_then(|slot| slot.dep.clone())
    }

    /// Returns this node's ownership marker, if it has been wrapped.
    pub fn observer(&self) -> Option<Rc<Observer>> {
        self.data.borrow().observer.clone()
    }

    /// Returns true if both handles refer to the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Takes a plain snapshot of this node and everything below it.
    ///
    /// Recurses structurally; snapshotting a cyclic graph does not
    /// terminate.
    pub fn to_object(&self) -> Object {
        let data = self.data.borrow();
        let mut obj = Object::with_capacity(data.fields.len());
        for (key, slot) in data.fields.iter() {
            obj.insert(key.clone(), slot.value.to_value());
        }
        obj
    }

    pub(crate) fn attach(&self, observer: Rc<Observer>) {
        self.data.borrow_mut().observer = Some(observer);
    }

    /// Gives every existing field a registry, returning the field values for
    /// the recursive walk.
    pub(crate) fn instrument_fields(&self) -> Vec<Reactive> {
        let mut data = self.data.borrow_mut();
        let mut children = Vec::with_capacity(data.fields.len());
        for slot in data.fields.values_mut() {
            if slot.dep.is_none() {
                slot.dep = Some(Rc::new(Dep::new()));
            }
            children.push(slot.value.clone());
        }
        children
    }
}

impl Reactive {
    /// Returns true if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Reactive::Null)
    }

    /// Returns true if this is a boolean value.
    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Reactive::Bool(_))
    }

    /// Returns true if this is a number value.
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Reactive::Number(_))
    }

    /// Returns true if this is a string value.
    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Reactive::String(_))
    }

    /// Returns true if this is an array node.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Reactive::Array(_))
    }

    /// Returns true if this is an object node.
    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Reactive::Object(_))
    }

    /// Returns the boolean value if this is a Bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Reactive::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number value if this is a Number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Reactive::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reactive::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the array handle if this is an Array.
    pub fn as_array(&self) -> Option<&ReactiveArray> {
        match self {
            Reactive::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns the object handle if this is an Object.
    pub fn as_object(&self) -> Option<&ReactiveObject> {
        match self {
            Reactive::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Reads a field if this is an Object.
    pub fn get(&self, key: &str) -> Option<Reactive> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Returns the node's ownership marker if this is a wrapped container.
    pub fn observer(&self) -> Option<Rc<Observer>> {
        match self {
            Reactive::Array(arr) => arr.observer(),
            Reactive::Object(obj) => obj.observer(),
            _ => None,
        }
    }

    /// The engine's write comparison: identity for containers, equality for
    /// scalars. NaN never equals NaN, so writing NaN over NaN notifies.
    pub fn same(&self, other: &Reactive) -> bool {
        match (self, other) {
            (Reactive::Null, Reactive::Null) => true,
            (Reactive::Bool(a), Reactive::Bool(b)) => a == b,
            (Reactive::Number(a), Reactive::Number(b)) => a == b,
            (Reactive::String(a), Reactive::String(b)) => a == b,
            (Reactive::Array(a), Reactive::Array(b)) => a.ptr_eq(b),
            (Reactive::Object(a), Reactive::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Takes a plain snapshot of this value.
    ///
    /// Recurses structurally; snapshotting a cyclic graph does not
    /// terminate.
    pub fn to_value(&self) -> Value {
        match self {
            Reactive::Null => Value::Null,
            Reactive::Bool(b) => Value::Bool(*b),
            Reactive::Number(n) => Value::Number(*n),
            Reactive::String(s) => Value::String(s.clone()),
            Reactive::Array(arr) => {
                Value::Array(arr.to_vec().iter().map(|v| v.to_value()).collect())
            }
            Reactive::Object(obj) => Value::Object(obj.to_object()),
        }
    }
}

impl From<Value> for Reactive {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Reactive::Null,
            Value::Bool(b) => Reactive::Bool(b),
            Value::Number(n) => Reactive::Number(n),
            Value::String(s) => Reactive::String(s),
            Value::Array(items) => Reactive::Array(ReactiveArray::from_values(items)),
            Value::Object(obj) => Reactive::Object(ReactiveObject::from_object(obj)),
        }
    }
}

impl From<bool> for Reactive {
    fn from(v: bool) -> Self {
        Reactive::Bool(v)
    }
}

impl From<i32> for Reactive {
    fn from(v: i32) -> Self {
        Reactive::Number(v as f64)
    }
}

impl From<i64> for Reactive {
    fn from(v: i64) -> Self {
        Reactive::Number(v as f64)
    }
}

impl From<f64> for Reactive {
    fn from(v: f64) -> Self {
        Reactive::Number(v)
    }
}

impl From<&str> for Reactive {
    fn from(v: &str) -> Self {
        Reactive::String(v.to_string())
    }
}

impl From<String> for Reactive {
    fn from(v: String) -> Self {
        Reactive::String(v)
    }
}

impl From<ReactiveArray> for Reactive {
    fn from(v: ReactiveArray) -> Self {
        Reactive::Array(v)
    }
}

impl From<ReactiveObject> for Reactive {
    fn from(v: ReactiveObject) -> Self {
        Reactive::Object(v)
    }
}
