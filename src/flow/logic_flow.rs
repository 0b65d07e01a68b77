//! Logic flow trait for side effects.

use async_trait::async_trait;

use crate::error::FlowError;
use crate::store::Store;

/// Handler for business logic triggered by an action.
///
/// Logic flows run after the state flows, once per dispatched action, all of
/// them concurrently. They see the action and the store: a flow can read the
/// committed state, call out to a service and dispatch follow-up actions.
///
/// A failing logic flow never prevents its siblings from running. How the
/// failure reaches the dispatcher is decided by the store's
/// [`FailurePolicy`](crate::config::FailurePolicy).
#[async_trait]
pub trait LogicFlow<S, A>: Send + Sync {
    /// Returns the name of this flow for logging.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Handle an action that is being dispatched.
    async fn on_next(&self, action: &A, store: &Store<S, A>) -> Result<(), FlowError>;
}
