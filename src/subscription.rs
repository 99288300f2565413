//! Change notification primitives shared by the pure modules.
//!
//! A [`Watch`] holds a value and notifies subscribers when it is replaced.
//! Subscribing hands back a [`Subscription`] guard; dropping the guard
//! unsubscribes. Browser adapters (MutationObserver, matchMedia) produce the
//! same guard type so consumers never care where a change came from.

use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Guard returned by `subscribe`. Runs its teardown exactly once, on drop or
/// on an explicit [`Subscription::cancel`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to tear down.
    pub fn noop() -> Self {
        Self { teardown: None }
    }

    pub fn cancel(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(f) = self.teardown.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct WatchInner<T> {
    value: RefCell<T>,
    subscribers: RefCell<FnvHashMap<u64, Callback<T>>>,
    next_id: Cell<u64>,
}

/// Observable value. Cloning shares the same underlying cell.
pub struct Watch<T> {
    inner: Rc<WatchInner<T>>,
}

impl<T> Clone for Watch<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Watch<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(WatchInner {
                value: RefCell::new(value),
                subscribers: RefCell::new(FnvHashMap::default()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Replace the value. Subscribers run only if the value actually changed.
    /// Returns whether a notification went out.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.notify();
        true
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        let next = {
            let current = self.inner.value.borrow();
            f(&current)
        };
        self.set(next)
    }

    pub fn subscribe(&self, on_change: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let cb: Callback<T> = Rc::new(RefCell::new(on_change));
        self.inner.subscribers.borrow_mut().insert(id, cb);
        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.borrow_mut().remove(&id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn notify(&self) {
        // Snapshot first so a callback may subscribe/unsubscribe without
        // tripping the RefCell.
        let value = self.get();
        let mut callbacks: Vec<(u64, Callback<T>)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(id, cb)| (*id, cb.clone()))
            .collect();
        callbacks.sort_by_key(|(id, _)| *id);
        for (_, cb) in callbacks {
            (&mut *cb.borrow_mut())(&value);
        }
    }
}
