use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Weak;

use tracing::{debug, trace, warn};

use crate::{Lifecycle, ObservatoryError};

/// Identifies one registration in an [`Observatory`].
/// Never reused, so an observer removed and added again gets a different id.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObserverId(usize);

impl From<ObserverId> for usize {
    fn from(id: ObserverId) -> Self { id.0 }
}
impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "observer#{}", self.0) }
}

struct Entry<O: ?Sized> {
    id: ObserverId,
    observer: Weak<O>,
}

impl<O: ?Sized> Clone for Entry<O> {
    fn clone(&self) -> Self { Self { id: self.id, observer: self.observer.clone() } }
}

impl<O: ?Sized> Entry<O> {
    // The allocation stays reserved while we hold the Weak, so the address cannot be reused by another observer
    fn points_to(&self, observer: *const O) -> bool { std::ptr::addr_eq(self.observer.as_ptr(), observer) }

    fn is_expired(&self) -> bool { self.observer.strong_count() == 0 }
}

struct Inner<O: ?Sized> {
    entries: Vec<Entry<O>>,
    next_id: usize,
    lifecycle: Lifecycle,
}

impl<O: ?Sized> Inner<O> {
    /// Drop registrations whose observer was dropped without deregistering first
    fn prune_expired(&mut self) {
        self.entries.retain(|entry| {
            let expired = entry.is_expired();
            if expired {
                warn!(id = %entry.id, "pruning observer that was dropped without deregistering");
            }
            !expired
        });
    }
}

/// A registry of weakly held observers, owned by a subject.
///
/// All methods take `&self` so that observers can mutate the registry from inside a callback.
/// The internal borrow is never held while a callback runs.
pub struct Observatory<O: ?Sized> {
    inner: RefCell<Inner<O>>,
}

impl<O: ?Sized> Default for Observatory<O> {
    fn default() -> Self { Self::new() }
}

impl<O: ?Sized> std::fmt::Debug for Observatory<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observatory").field("observers", &inner.entries.len()).field("lifecycle", &inner.lifecycle).finish()
    }
}

impl<O: ?Sized> Observatory<O> {
    pub fn new() -> Self { Self { inner: RefCell::new(Inner { entries: Vec::new(), next_id: 0, lifecycle: Lifecycle::Live }) } }

    /// Registers an observer at the tail of the delivery order.
    ///
    /// The registry keeps only the weak reference. An observer added while a round is in progress
    /// does not hear that round.
    ///
    /// Fails if the observer is already dead, already registered, or the registry has begun teardown.
    pub fn add_observer(&self, observer: Weak<O>) -> Result<ObserverId, ObservatoryError> {
        if observer.strong_count() == 0 {
            return Err(ObservatoryError::Expired);
        }

        let mut inner = self.inner.borrow_mut();
        if !inner.lifecycle.accepts_observers() {
            return Err(ObservatoryError::Closed(inner.lifecycle));
        }
        if let Some(existing) = inner.entries.iter().find(|entry| entry.points_to(observer.as_ptr())) {
            return Err(ObservatoryError::AlreadyRegistered(existing.id));
        }

        let id = ObserverId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push(Entry { id, observer });
        debug!(%id, observers = inner.entries.len(), "observer added");
        Ok(id)
    }

    /// Removes the registration for this object, matched by address.
    /// Returns false (and does nothing) if it was not registered.
    pub fn remove_observer(&self, observer: &O) -> bool {
        let target: *const O = observer;
        self.remove_where(|entry| entry.points_to(target))
    }

    pub fn remove_observer_by_id(&self, id: ObserverId) -> bool { self.remove_where(|entry| entry.id == id) }

    fn remove_where(&self, predicate: impl Fn(&Entry<O>) -> bool) -> bool {
        let mut inner = self.inner.borrow_mut();
        let position = inner.entries.iter().position(predicate);
        match position {
            Some(index) => {
                let entry = inner.entries.remove(index);
                debug!(id = %entry.id, observers = inner.entries.len(), "observer removed");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, observer: &O) -> bool {
        let target: *const O = observer;
        self.inner.borrow().entries.iter().any(|entry| entry.points_to(target))
    }

    pub fn contains_id(&self, id: ObserverId) -> bool { self.inner.borrow().entries.iter().any(|entry| entry.id == id) }

    /// Number of registered observers that are still alive
    pub fn len(&self) -> usize { self.inner.borrow().entries.iter().filter(|entry| !entry.is_expired()).count() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn lifecycle(&self) -> Lifecycle { self.inner.borrow().lifecycle }

    /// Calls `f` once for each observer that was registered when the round started and is still
    /// registered when its turn comes, in insertion order.
    ///
    /// Only weak references are snapshotted. Each one is upgraded at its turn, after the
    /// membership check, and released as soon as its callback returns. An observer removed or
    /// dropped earlier in the round is never touched, and the registry never outlives its owner's
    /// hold on it.
    pub fn notify(&self, mut f: impl FnMut(&O)) {
        let Ok(()) = self.try_notify(|observer| {
            f(observer);
            Ok::<(), Infallible>(())
        });
    }

    /// Delivery for notifications that may cause observers to deregister or go away, such as
    /// teardown. Same delivery rules as [`Self::notify`].
    pub fn notify_safe(&self, mut f: impl FnMut(&O)) {
        let Ok(()) = self.try_notify_safe(|observer| {
            f(observer);
            Ok::<(), Infallible>(())
        });
    }

    /// Fallible [`Self::notify`]. The first error ends the round; the remaining observers are not
    /// called and the error is returned unchanged.
    pub fn try_notify<E>(&self, f: impl FnMut(&O) -> Result<(), E>) -> Result<(), E> { self.deliver("notify", f) }

    /// Fallible [`Self::notify_safe`]
    pub fn try_notify_safe<E>(&self, f: impl FnMut(&O) -> Result<(), E>) -> Result<(), E> { self.deliver("notify_safe", f) }

    fn deliver<E>(&self, round: &'static str, mut f: impl FnMut(&O) -> Result<(), E>) -> Result<(), E> {
        let snapshot: Vec<Entry<O>> = {
            let mut inner = self.inner.borrow_mut();
            inner.prune_expired();
            inner.entries.clone()
        };
        trace!(round, observers = snapshot.len(), "delivering");

        for entry in snapshot {
            if !self.contains_id(entry.id) {
                trace!(id = %entry.id, "skipping observer removed earlier in this round");
                continue;
            }
            let Some(observer) = entry.observer.upgrade() else {
                trace!(id = %entry.id, "skipping observer dropped earlier in this round");
                continue;
            };
            f(&*observer)?;
        }
        Ok(())
    }

    /// First teardown phase: stop accepting observers and tell the remaining ones the subject is
    /// about to go away. Observers typically deregister from inside `f`.
    pub fn begin_teardown(&self, f: impl FnMut(&O)) {
        self.advance(Lifecycle::TearingDown);
        self.notify_safe(f);
    }

    /// Second teardown phase: tell whoever is still registered that the subject is gone, then
    /// release every remaining registration.
    pub fn finish_teardown(&self, f: impl FnMut(&O)) {
        self.advance(Lifecycle::Destroyed);
        self.notify_safe(f);

        let remaining = std::mem::take(&mut self.inner.borrow_mut().entries);
        if !remaining.is_empty() {
            debug!(remaining = remaining.len(), "releasing observers still registered after teardown");
        }
    }

    fn advance(&self, next: Lifecycle) {
        let mut inner = self.inner.borrow_mut();
        let current = inner.lifecycle;
        inner.lifecycle = current.advance(next);
        if inner.lifecycle != current {
            debug!(from = %current, to = %inner.lifecycle, "lifecycle transition");
        }
    }
}
