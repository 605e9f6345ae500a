//! Observer / Observable pattern.
//!
//! * An **observable** object notifies registered **observers** whenever it
//!   changes state, passing a description of the change.
//! * Observers react in [`Observer::update`].
//!
//! Registration and notification work through `&self` (interior mutability
//! via `RefCell`), so an owner can hand out its subscription list without
//! giving up mutable access to itself.  Observers are held weakly: dropping
//! the last `Arc` to an observer unsubscribes it.

use std::cell::RefCell;
use std::sync::{Arc, Weak};

/// An object that can notify interested parties when it changes.
pub trait Observable<E> {
    /// Register an observer to receive future change notifications.
    fn register_observer(&self, observer: Weak<dyn Observer<E>>);

    /// Remove a previously registered observer.
    fn unregister_observer(&self, observer: &Weak<dyn Observer<E>>);
}

/// An object that reacts to changes in the [`Observable`]s it subscribed to.
pub trait Observer<E>: Send + Sync {
    /// Called with every event published by an observable this observer is
    /// registered with.
    fn update(&self, event: &E);
}

/// Observer-list bookkeeping that can be embedded in any observable type.
pub struct ObservableImpl<E> {
    observers: RefCell<Vec<Weak<dyn Observer<E>>>>,
}

impl<E> Default for ObservableImpl<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for ObservableImpl<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableImpl")
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}

impl<E> ObservableImpl<E> {
    /// Create a new, empty observer list.
    pub fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Register an observer.
    pub fn register(&self, observer: Weak<dyn Observer<E>>) {
        self.observers.borrow_mut().push(observer);
    }

    /// Remove an observer (by pointer equality of the `Weak`).
    pub fn unregister(&self, observer: &Weak<dyn Observer<E>>) {
        self.observers
            .borrow_mut()
            .retain(|o| !Weak::ptr_eq(o, observer));
    }

    /// Number of observers still alive.
    pub fn len(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// `true` if no live observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to all live observers, pruning dead references.
    pub fn notify(&self, event: &E) {
        // Upgrade first so that observers run outside the borrow and may
        // register or unregister themselves.
        let observers: Vec<Arc<dyn Observer<E>>> = self
            .observers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        self.observers
            .borrow_mut()
            .retain(|w| w.strong_count() > 0);
        for obs in observers {
            obs.update(event);
        }
    }
}

impl<E> Observable<E> for ObservableImpl<E> {
    fn register_observer(&self, observer: Weak<dyn Observer<E>>) {
        self.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer<E>>) {
        self.unregister(observer);
    }
}
