//! Watchers: tracked derived computations.
//!
//! A `Watcher` binds a getter (a dotted path or a free-form computation)
//! to a root value and a change callback. Constructing it runs the getter
//! once with the watcher occupying the active slot, so every field read
//! along the way records the watcher as a dependent. Whenever one of those
//! fields is written, the watcher re-runs the getter and reports
//! `(new, old)` to the callback.

use crate::context;
use crate::node::Reactive;
use mimosa_core::{ParseError, Path};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Callback type for change notifications, invoked with the new and the
/// previous computed value.
pub type ChangeCallback = Box<dyn FnMut(&Reactive, &Reactive)>;

pub(crate) struct WatcherCore {
    root: Reactive,
    getter: Box<dyn Fn(&Reactive) -> Reactive>,
    callback: RefCell<ChangeCallback>,
    value: RefCell<Reactive>,
}

impl WatcherCore {
    /// Runs one get cycle: occupy the active slot, evaluate the getter
    /// against the root, clear the slot.
    fn run(core: &Rc<WatcherCore>) -> Reactive {
        context::set_active(core.clone());
        let value = (core.getter)(&core.root);
        context::clear_active();
        value
    }

    /// Re-evaluates and reports. Invoked by `Dep::notify`.
    ///
    /// The callback fires on every notification, even when the recomputed
    /// value is unchanged.
    pub(crate) fn update(core: &Rc<WatcherCore>) {
        let old = core.value.borrow().clone();
        let new = WatcherCore::run(core);
        {
            let mut callback = core.callback.borrow_mut();
            (*callback)(&new, &old);
        }
        *core.value.borrow_mut() = new;
    }
}

/// A tracked derived computation over a reactive root.
///
/// Watchers are caller-owned: registries hold only weak back-references, so
/// dropping the watcher silences it without any explicit teardown.
pub struct Watcher {
    core: Rc<WatcherCore>,
}

impl core::fmt::Debug for Watcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Watcher").finish_non_exhaustive()
    }
}

impl Watcher {
    /// Creates a watcher over a dotted field path.
    ///
    /// The path is parsed up front; a string outside the path alphabet fails
    /// here, before anything is registered. Construction immediately runs
    /// the first get cycle, establishing the initial value and the initial
    /// dependency set. Traversal through a missing field or a non-object
    /// yields `Reactive::Null`.
    pub fn new<F>(root: Reactive, path: &str, callback: F) -> Result<Self, ParseError>
    where
        F: FnMut(&Reactive, &Reactive) + 'static,
    {
        let path = Path::parse(path)?;
        Ok(Self::with_getter(
            root,
            move |r| resolve_reactive(&path, r),
            callback,
        ))
    }

    /// Creates a watcher over a free-form computation.
    ///
    /// Every reactive field the computation reads becomes a dependency;
    /// writing any of them re-runs the computation.
    pub fn with_getter<G, F>(root: Reactive, getter: G, callback: F) -> Self
    where
        G: Fn(&Reactive) -> Reactive + 'static,
        F: FnMut(&Reactive, &Reactive) + 'static,
    {
        let core = Rc::new(WatcherCore {
            root,
            getter: Box::new(getter),
            callback: RefCell::new(Box::new(callback)),
            value: RefCell::new(Reactive::Null),
        });
        let initial = WatcherCore::run(&core);
        *core.value.borrow_mut() = initial;
        Self { core }
    }

    /// Returns the last computed value.
    pub fn value(&self) -> Reactive {
        self.core.value.borrow().clone()
    }

    pub(crate) fn downgrade(&self) -> Weak<WatcherCore> {
        Rc::downgrade(&self.core)
    }
}

/// Walks a parsed path through reactive reads, so every touched field
/// registers the active watcher. Missing fields and non-object steps
/// resolve to `Null`.
fn resolve_reactive(path: &Path, root: &Reactive) -> Reactive {
    let mut current = root.clone();
    for segment in path.segments() {
        current = match current.get(segment) {
            Some(value) => value,
            None => return Reactive::Null,
        };
    }
    current
}
