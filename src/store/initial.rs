//! Initial state provider contract.

use async_trait::async_trait;

use crate::error::FlowError;

/// Provides the first state of a store.
///
/// The store calls this at most once per successful initialization. A
/// failed call leaves the store uninitialized, so the host can retry.
#[async_trait]
pub trait InitialState<S>: Send + Sync {
    async fn initial_state(&self) -> Result<S, FlowError>;
}
