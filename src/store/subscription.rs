//! Subscription bookkeeping: selectors, last seen values and callbacks.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Identifier of one registration in a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Change notification callback.
///
/// Cloning a `Callback` keeps its identity: when several subscriptions
/// registered with clones of one callback change in the same dispatch, the
/// callback runs once.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn() + Send + Sync>);

impl Callback {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }

    /// Whether both handles point at the same callback.
    pub fn same_as(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<F> From<F> for Callback
where
    F: Fn() + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Maps the application state to the slice one consumer renders.
///
/// Closures are the common case; implement this for a named type when the
/// projection deserves its own tests.
pub trait StateMap<S>: Send + Sync + 'static {
    type Output: PartialEq + Send + 'static;

    fn map_state(&self, state: &S) -> Self::Output;
}

/// A selector together with the value it produced last time.
trait Selection<S>: Send {
    /// Recompute against `state`. Returns true and stores the new value if it
    /// differs from the previous one.
    fn refresh(&mut self, state: &S) -> bool;
}

struct Selected<F, V> {
    selector: F,
    last: V,
}

impl<S, F, V> Selection<S> for Selected<F, V>
where
    F: Fn(&S) -> V + Send,
    V: PartialEq + Send,
{
    fn refresh(&mut self, state: &S) -> bool {
        let next = (self.selector)(state);
        if next == self.last {
            return false;
        }
        self.last = next;
        true
    }
}

struct Entry<S> {
    id: SubscriptionId,
    selection: Box<dyn Selection<S>>,
    callback: Callback,
}

/// All subscriptions of one store.
pub(crate) struct SubscriptionRegistry<S> {
    next_id: u64,
    entries: Vec<Entry<S>>,
}

impl<S> SubscriptionRegistry<S> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register `selector` with `state` as its baseline.
    pub(crate) fn insert<F, V>(&mut self, state: &S, selector: F, callback: Callback) -> SubscriptionId
    where
        F: Fn(&S) -> V + Send + 'static,
        V: PartialEq + Send + 'static,
        S: 'static,
    {
        let last = selector(state);
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            selection: Box::new(Selected { selector, last }),
            callback,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Refresh every selector against `state` and return the callbacks to
    /// run, each distinct callback once, in registration order.
    pub(crate) fn collect_changed(&mut self, state: &S) -> Vec<Callback> {
        let mut batch: Vec<Callback> = Vec::new();
        for entry in &mut self.entries {
            if !entry.selection.refresh(state) {
                continue;
            }
            if !batch.iter().any(|queued| queued.same_as(&entry.callback)) {
                batch.push(entry.callback.clone());
            }
        }
        batch
    }
}

/// Type-erased removal so handles don't carry the state type.
pub(crate) trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

impl<S: Send + 'static> Unsubscribe for Mutex<SubscriptionRegistry<S>> {
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().remove(id)
    }
}

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe).
///
/// The registration lives as long as the handle. Dropping it, or calling
/// [`unsubscribe`](Self::unsubscribe), removes exactly this registration;
/// both are safe to repeat.
#[must_use = "dropping a Subscription unsubscribes it"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<dyn Unsubscribe>,
    armed: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, registry: Weak<dyn Unsubscribe>) -> Self {
        Self {
            id,
            registry,
            armed: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether this handle still owns its registration.
    pub fn is_active(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Remove the registration. No-op after the first call.
    pub fn unsubscribe(&self) {
        if !self.armed.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
    }

    /// Give up ownership without unsubscribing.
    ///
    /// The registration then lives until
    /// [`Store::unsubscribe`](crate::Store::unsubscribe) is called with the
    /// returned id, or until the store is dropped.
    pub fn detach(self) -> SubscriptionId {
        self.armed.store(false, Ordering::SeqCst);
        self.id
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting() -> (Callback, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let callback = Callback::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (callback, hits)
    }

    #[test]
    fn unchanged_selector_is_not_collected() {
        let mut registry = SubscriptionRegistry::new();
        let (callback, _) = counting();
        registry.insert(&(1, 'a'), |s: &(i32, char)| s.1, callback);

        assert!(registry.collect_changed(&(2, 'a')).is_empty());
        assert_eq!(registry.collect_changed(&(2, 'b')).len(), 1);
    }

    #[test]
    fn shared_callback_is_collected_once() {
        let mut registry = SubscriptionRegistry::new();
        let (callback, hits) = counting();
        registry.insert(&(0, 0), |s: &(i32, i32)| s.0, callback.clone());
        registry.insert(&(0, 0), |s: &(i32, i32)| s.1, callback);

        let batch = registry.collect_changed(&(1, 1));
        assert_eq!(batch.len(), 1);
        batch.iter().for_each(Callback::call);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn none_equals_none() {
        let mut registry = SubscriptionRegistry::new();
        let (callback, _) = counting();
        registry.insert(&None, |s: &Option<u8>| s.map(|v| v * 2), callback);

        assert!(registry.collect_changed(&None).is_empty());
        assert_eq!(registry.collect_changed(&Some(1)).len(), 1);
        assert!(registry.collect_changed(&Some(1)).is_empty());
    }

    #[test]
    fn remove_only_touches_one_entry() {
        let mut registry = SubscriptionRegistry::new();
        let (callback, _) = counting();
        let first = registry.insert(&0, |s: &i32| *s, callback.clone());
        registry.insert(&0, |s: &i32| *s, callback);

        assert!(registry.remove(first));
        assert!(!registry.remove(first));
        assert_eq!(registry.len(), 1);
    }
}
