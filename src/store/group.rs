//! Subscriptions owned by one consumer and released together.

use super::{Callback, Store, Subscription};
use crate::error::StoreError;
use crate::flow::{Action, AppState};

/// A set of subscriptions sharing one refresh callback.
///
/// A view subscribes each slice it reads with [`use_state`](Self::use_state)
/// and keeps the group for as long as it is alive. Since every selector
/// shares the callback, one dispatch that changes several slices still
/// refreshes the view once. Dropping the group unsubscribes everything.
pub struct SubscriptionGroup<S, A> {
    store: Store<S, A>,
    callback: Callback,
    subscriptions: Vec<Subscription>,
}

impl<S: AppState, A: Action> SubscriptionGroup<S, A> {
    pub fn new(store: Store<S, A>, callback: impl Into<Callback>) -> Self {
        Self {
            store,
            callback: callback.into(),
            subscriptions: Vec::new(),
        }
    }

    /// Watch one more slice of the state.
    pub fn use_state<F, V>(&mut self, selector: F) -> Result<(), StoreError>
    where
        F: Fn(&S) -> V + Send + 'static,
        V: PartialEq + Send + 'static,
    {
        let subscription = self.store.subscribe(selector, self.callback.clone())?;
        self.subscriptions.push(subscription);
        Ok(())
    }

    pub fn store(&self) -> &Store<S, A> {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Unsubscribe everything; the group can be reused afterwards.
    pub fn clear(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}
