//! Middleware: async handlers run after every dispatch.
//!
//! The store runs all registered middleware concurrently once the state
//! flows have been applied, whether or not the state changed. Two
//! middleware ship with the crate:
//!
//! - [`LogicFlowsMiddleware`] fans the action out to every logic flow
//! - [`LoggingMiddleware`] records each action to an [`ActionLogSink`]

mod logging;
mod logic_flows;

use async_trait::async_trait;

use crate::error::FlowError;
use crate::store::Store;

pub use logging::{ActionLogSink, ActionRecord, LoggingMiddleware, TracingSink, ACTION_LOG_TARGET};
pub use logic_flows::LogicFlowsMiddleware;

/// Custom logic to execute when an action is being processed.
#[async_trait]
pub trait Middleware<S, A>: Send + Sync {
    /// Returns the name of this middleware for logging and error reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Run for one dispatched action.
    ///
    /// Called after the state flows were applied and any state change was
    /// committed, so `store.state()` already reflects this action.
    async fn run(&self, action: &A, store: &Store<S, A>) -> Result<(), FlowError>;
}
