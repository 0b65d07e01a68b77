//! The store: current state, dispatch, change notification.
//!
//! # Dispatch
//!
//! ```text
//! put_async(action)
//!   ├─ dispatch lock ───────────────────────────────┐
//!   │   fold state flows over (state, &action)      │
//!   │   candidate != state ? commit + notify : skip │
//!   ├───────────────────────────────────────────────┘
//!   └─ join_all(middleware.run(&action))   (always, outside the lock)
//! ```
//!
//! A state flow error aborts the dispatch before the commit. Middleware
//! failures are handled by the configured [`FailurePolicy`].

mod builder;
mod group;
mod initial;
mod subscription;

use std::future::Future;
use std::sync::{Arc, Weak};

use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::FailurePolicy;
use crate::error::{FlowError, HandlerFailure, StoreError};
use crate::flow::{action_name, Action, AppState, StateFlow};
use crate::middleware::Middleware;

pub use builder::StoreBuilder;
pub use group::SubscriptionGroup;
pub use initial::InitialState;
pub use subscription::{Callback, StateMap, Subscription, SubscriptionId};

use subscription::{SubscriptionRegistry, Unsubscribe};

/// Observable state container.
///
/// Cloning a `Store` is cheap and yields another handle to the same state,
/// flows and subscriptions. Create one store per scope (session, window,
/// test) and pass it explicitly.
pub struct Store<S, A> {
    inner: Arc<StoreInner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StoreInner<S, A> {
    /// Current state; `None` until initialized.
    state: RwLock<Option<Arc<S>>>,
    /// Serializes fold → compare → commit → notify.
    dispatch_lock: Mutex<()>,
    /// Serializes initialization, separate from dispatch.
    init_lock: tokio::sync::Mutex<()>,
    subscriptions: Arc<Mutex<SubscriptionRegistry<S>>>,
    state_flows: Vec<Arc<dyn StateFlow<S, A>>>,
    middleware: Vec<Arc<dyn Middleware<S, A>>>,
    initializer: Option<Arc<dyn InitialState<S>>>,
    /// Action dispatched once the provider has set the first state.
    on_initialized: Option<Arc<dyn Fn() -> A + Send + Sync>>,
    failure_policy: FailurePolicy,
}

impl<S: AppState, A: Action> Store<S, A> {
    /// Start configuring a store.
    pub fn builder() -> StoreBuilder<S, A> {
        StoreBuilder::new()
    }

    /// The current state, or `None` before initialization.
    pub fn state(&self) -> Option<Arc<S>> {
        self.inner.state.read().clone()
    }

    /// Whether a state has been set.
    pub fn is_initialized(&self) -> bool {
        self.inner.state.read().is_some()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriptions.lock().len()
    }

    /// How middleware failures reach `put_async` callers.
    pub fn failure_policy(&self) -> FailurePolicy {
        self.inner.failure_policy
    }

    /// Initialize from the registered [`InitialState`] provider.
    pub async fn initialize(&self) -> Result<Arc<S>, StoreError> {
        let initializer = self
            .inner
            .initializer
            .clone()
            .ok_or(StoreError::MissingInitializer)?;
        self.initialize_with(|| async move { initializer.initial_state().await })
            .await
    }

    /// Initialize from `provider` unless a state is already set.
    ///
    /// Concurrent callers are serialized: the first runs the provider, the
    /// others wait and get the same state. Once initialized, further calls
    /// return the current state without calling their provider. If the
    /// provider fails the store stays uninitialized.
    ///
    /// The call that runs the provider then dispatches the builder's
    /// [`on_initialized`](StoreBuilder::on_initialized) action, if any, and
    /// waits for it. A failure of that dispatch is logged; the store stays
    /// initialized and the provider's state is returned.
    pub async fn initialize_with<F, Fut>(&self, provider: F) -> Result<Arc<S>, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<S, FlowError>>,
    {
        let init = self.inner.init_lock.lock().await;

        if let Some(state) = self.state() {
            return Ok(state);
        }

        let initial = provider()
            .await
            .map_err(|source| StoreError::Initialization { source })?;
        let initial = Arc::new(initial);
        *self.inner.state.write() = Some(Arc::clone(&initial));
        drop(init);

        tracing::debug!("Store initialized");

        if let Some(on_initialized) = &self.inner.on_initialized {
            if let Err(error) = self.put_async(on_initialized()).await {
                tracing::warn!(%error, "Post-initialization dispatch failed");
            }
        }

        Ok(initial)
    }

    /// Dispatch an action and wait for the state flows and every middleware.
    pub async fn put_async(&self, action: A) -> Result<(), StoreError> {
        let span = tracing::debug_span!(
            "dispatch",
            id = %Uuid::new_v4(),
            action = action_name::<A>()
        );
        self.dispatch(&action).instrument(span).await
    }

    /// Dispatch an action without waiting for it.
    ///
    /// The dispatch runs as a task on the current Tokio runtime and goes
    /// through the same serialized core as [`put_async`](Self::put_async).
    /// Errors are logged. Outside a runtime the action is dropped.
    pub fn put(&self, action: A) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::error!(
                    action = action_name::<A>(),
                    "put called outside a Tokio runtime, action dropped"
                );
                return;
            }
        };

        let store = self.clone();
        handle.spawn(async move {
            if let Err(error) = store.put_async(action).await {
                tracing::warn!(%error, "Dispatch failed");
            }
        });
    }

    /// Watch the value `selector` projects out of the state.
    ///
    /// The current projection becomes the baseline. After every committed
    /// state change the selector runs again; `callback` is invoked when the
    /// result differs. Selectors run while the store holds its registry
    /// lock and must not call back into the store.
    pub fn subscribe<F, V>(
        &self,
        selector: F,
        callback: impl Into<Callback>,
    ) -> Result<Subscription, StoreError>
    where
        F: Fn(&S) -> V + Send + 'static,
        V: PartialEq + Send + 'static,
    {
        let id = {
            let mut registry = self.inner.subscriptions.lock();
            let state = self.state().ok_or(StoreError::NotInitialized)?;
            registry.insert(&state, selector, callback.into())
        };

        let registry: Arc<dyn Unsubscribe> = self.inner.subscriptions.clone();
        let registry: Weak<dyn Unsubscribe> = Arc::downgrade(&registry);
        Ok(Subscription::new(id, registry))
    }

    /// Like [`subscribe`](Self::subscribe), with a [`StateMap`] as selector.
    pub fn subscribe_map<M>(
        &self,
        map: M,
        callback: impl Into<Callback>,
    ) -> Result<Subscription, StoreError>
    where
        M: StateMap<S>,
    {
        self.subscribe(move |state: &S| map.map_state(state), callback)
    }

    /// Remove a registration by id. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscriptions.lock().remove(id)
    }

    async fn dispatch(&self, action: &A) -> Result<(), StoreError> {
        let changed = self.reduce(action)?;
        tracing::trace!(changed, "State flows applied");
        self.run_middleware(action).await
    }

    /// Fold the state flows and commit the result if it changed.
    fn reduce(&self, action: &A) -> Result<bool, StoreError> {
        let _dispatch = self.inner.dispatch_lock.lock();

        let current = self.state().ok_or(StoreError::NotInitialized)?;
        let candidate = self.inner.state_flows.iter().enumerate().try_fold(
            S::clone(&current),
            |state, (index, flow)| {
                flow.handle(state, action)
                    .map_err(|source| StoreError::StateFlow {
                        index,
                        flow: flow.name(),
                        source,
                    })
            },
        )?;

        if candidate == *current {
            return Ok(false);
        }

        let next = Arc::new(candidate);
        let callbacks = {
            let mut registry = self.inner.subscriptions.lock();
            *self.inner.state.write() = Some(Arc::clone(&next));
            registry.collect_changed(&next)
        };

        tracing::debug!(notified = callbacks.len(), "State committed");

        // Still under the dispatch lock: no other commit can interleave.
        for callback in &callbacks {
            callback.call();
        }

        Ok(true)
    }

    async fn run_middleware(&self, action: &A) -> Result<(), StoreError> {
        let results = join_all(
            self.inner
                .middleware
                .iter()
                .map(|middleware| middleware.run(action, self)),
        )
        .await;

        let failures: Vec<HandlerFailure> = self
            .inner
            .middleware
            .iter()
            .zip(results)
            .filter_map(|(middleware, result)| {
                result.err().map(|error| HandlerFailure {
                    handler: middleware.name(),
                    error,
                })
            })
            .collect();

        if failures.is_empty() {
            return Ok(());
        }

        match self.inner.failure_policy {
            FailurePolicy::Ignore => Ok(()),
            FailurePolicy::Log => {
                for failure in &failures {
                    log_failure(failure);
                }
                Ok(())
            }
            FailurePolicy::Propagate => Err(StoreError::Middleware { failures }),
        }
    }
}

/// Warn about one middleware failure. Logic flow failures are reported per
/// flow.
fn log_failure(failure: &HandlerFailure) {
    match &failure.error {
        FlowError::LogicFlows { failures, .. } => {
            for flow in failures {
                tracing::warn!(
                    logic_flow = flow.handler,
                    error = %flow.error,
                    "Logic flow failed"
                );
            }
        }
        error => {
            tracing::warn!(
                middleware = failure.handler,
                %error,
                "Middleware failed"
            );
        }
    }
}
