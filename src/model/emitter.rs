//! Single-threaded change streams.
//!
//! An [`Emitter`] owns a list of listeners; every `subscribe` hands back a
//! [`Subscription`] that removes its listener when released. Release is an
//! `FnOnce`, so a subscription can be released at most once, and dropping an
//! unreleased subscription releases it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

/// Event emitter for a single event type.
///
/// Listeners are invoked in subscription order. A listener released while an
/// event is being delivered is not invoked for the remainder of that delivery.
pub struct Emitter<T> {
    listeners: Rc<RefCell<Listeners<T>>>,
}

impl<T: 'static> Emitter<T> {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a listener. The listener stays registered until the returned
    /// subscription is released or dropped.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut listeners = self.listeners.borrow_mut();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Rc::new(listener)));
            id
        };

        let weak: Weak<RefCell<Listeners<T>>> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Deliver an event to every registered listener.
    pub fn fire(&self, event: &T) {
        // Snapshot so listeners may subscribe or release during delivery.
        let snapshot: Vec<(u64, Listener<T>)> = self.listeners.borrow().entries.clone();
        for (id, listener) in snapshot {
            let still_registered = self
                .listeners
                .borrow()
                .entries
                .iter()
                .any(|(entry_id, _)| *entry_id == id);
            if still_registered {
                listener(event);
            }
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Drop every listener. Outstanding subscriptions become no-ops.
    pub fn clear(&self) {
        self.listeners.borrow_mut().entries.clear();
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.borrow().entries.len())
            .finish()
    }
}

/// Handle to a registered listener or any other releasable resource.
///
/// Releasing runs the cleanup exactly once; dropping an active subscription
/// releases it.
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap an arbitrary cleanup action.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Run the cleanup now.
    pub fn release(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Whether the cleanup has not run yet.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
