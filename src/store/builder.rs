//! Explicit registration of everything a store runs.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::subscription::SubscriptionRegistry;
use super::{InitialState, Store, StoreInner};
use crate::config::{FailurePolicy, StoreConfig};
use crate::flow::{Action, AppState, LogicFlow, StateFlow};
use crate::middleware::{ActionLogSink, LoggingMiddleware, LogicFlowsMiddleware, Middleware};

/// Builder for [`Store`].
///
/// State flows run in the order they are added. Middleware and logic flows
/// run concurrently, so their order carries no meaning. The logic flow
/// fan-out is always installed; the logging middleware is installed when
/// the config enables it or a sink is given.
pub struct StoreBuilder<S, A> {
    state: Option<S>,
    state_flows: Vec<Arc<dyn StateFlow<S, A>>>,
    logic_flows: Vec<Arc<dyn LogicFlow<S, A>>>,
    middleware: Vec<Arc<dyn Middleware<S, A>>>,
    initializer: Option<Arc<dyn InitialState<S>>>,
    on_initialized: Option<Arc<dyn Fn() -> A + Send + Sync>>,
    log_sink: Option<Arc<dyn ActionLogSink>>,
    config: StoreConfig,
}

impl<S: AppState, A: Action> StoreBuilder<S, A> {
    pub fn new() -> Self {
        Self {
            state: None,
            state_flows: Vec::new(),
            logic_flows: Vec::new(),
            middleware: Vec::new(),
            initializer: None,
            on_initialized: None,
            log_sink: None,
            config: StoreConfig::default(),
        }
    }

    /// Start the store already initialized with `state`.
    pub fn initial_state(mut self, state: S) -> Self {
        self.state = Some(state);
        self
    }

    /// Provider used by [`Store::initialize`].
    pub fn initializer(mut self, initializer: impl InitialState<S> + 'static) -> Self {
        self.initializer = Some(Arc::new(initializer));
        self
    }

    /// Action to dispatch after initialization, so logic flows can run
    /// startup work.
    ///
    /// Only the [`Store::initialize`] call that actually runs the provider
    /// dispatches it. A store built with [`initial_state`](Self::initial_state)
    /// never does.
    pub fn on_initialized(mut self, action: impl Fn() -> A + Send + Sync + 'static) -> Self {
        self.on_initialized = Some(Arc::new(action));
        self
    }

    /// Append a state flow to the fold.
    pub fn state_flow(mut self, flow: impl StateFlow<S, A> + 'static) -> Self {
        self.state_flows.push(Arc::new(flow));
        self
    }

    /// Append several state flows, keeping their order.
    pub fn state_flows(
        mut self,
        flows: impl IntoIterator<Item = Arc<dyn StateFlow<S, A>>>,
    ) -> Self {
        self.state_flows.extend(flows);
        self
    }

    pub fn logic_flow(mut self, flow: impl LogicFlow<S, A> + 'static) -> Self {
        self.logic_flows.push(Arc::new(flow));
        self
    }

    pub fn middleware(mut self, middleware: impl Middleware<S, A> + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Apply a loaded configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.middleware.failure_policy = policy;
        self
    }

    /// Log every action through the default tracing sink.
    pub fn action_logging(mut self) -> Self {
        self.config.action_logging.enabled = true;
        self
    }

    /// Log every action to `sink`.
    pub fn action_log_sink(mut self, sink: impl ActionLogSink + 'static) -> Self {
        self.config.action_logging.enabled = true;
        self.log_sink = Some(Arc::new(sink));
        self
    }

    pub fn build(self) -> Store<S, A> {
        let mut middleware = self.middleware;
        middleware.push(Arc::new(LogicFlowsMiddleware::new(self.logic_flows)));

        let logging = &self.config.action_logging;
        if logging.enabled {
            let logger = match self.log_sink {
                Some(sink) => LoggingMiddleware::with_sink(logging, sink),
                None => LoggingMiddleware::new(logging),
            };
            middleware.push(Arc::new(logger));
        }

        tracing::debug!(
            state_flows = self.state_flows.len(),
            middleware = middleware.len(),
            initialized = self.state.is_some(),
            "Store built"
        );

        Store {
            inner: Arc::new(StoreInner {
                state: RwLock::new(self.state.map(Arc::new)),
                dispatch_lock: Mutex::new(()),
                init_lock: tokio::sync::Mutex::new(()),
                subscriptions: Arc::new(Mutex::new(SubscriptionRegistry::new())),
                state_flows: self.state_flows,
                middleware,
                initializer: self.initializer,
                on_initialized: self.on_initialized,
                failure_policy: self.config.middleware.failure_policy,
            }),
        }
    }
}

impl<S: AppState, A: Action> Default for StoreBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
