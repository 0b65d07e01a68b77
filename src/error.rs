//! Error types for handlers and the store.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by state flows, logic flows, middleware and initial
/// state providers.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The handler recognized the action but refused to apply it.
    #[error("{0}")]
    Rejected(String),

    /// The handler did not finish in time.
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Some of the logic flows run for one action failed.
    #[error("{failed} of {total} logic flows failed", failed = .failures.len())]
    LogicFlows {
        failures: Vec<HandlerFailure>,
        total: usize,
    },

    /// Any other failure inside a handler.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A failure attributed to one named handler.
#[derive(Debug, Error)]
#[error("{handler}: {error}")]
pub struct HandlerFailure {
    pub handler: &'static str,
    #[source]
    pub error: FlowError,
}

/// Errors returned by [`Store`](crate::Store) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has no state yet; call `initialize` first.
    #[error("Store is not initialized")]
    NotInitialized,

    /// `initialize` was called but no initial state provider was registered.
    #[error("No initial state provider registered")]
    MissingInitializer,

    /// The initial state provider failed. The store stays uninitialized.
    #[error("Initial state provider failed: {source}")]
    Initialization {
        #[source]
        source: FlowError,
    },

    /// A state flow failed. Nothing was committed.
    #[error("State flow #{index} ({flow}) failed: {source}")]
    StateFlow {
        index: usize,
        flow: &'static str,
        #[source]
        source: FlowError,
    },

    /// Middleware failed under the `propagate` policy. The state transition,
    /// if any, was already committed.
    #[error("{failed} middleware failed", failed = .failures.len())]
    Middleware { failures: Vec<HandlerFailure> },
}
