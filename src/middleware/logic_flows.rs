//! Fan-out of one action to every registered logic flow.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use super::Middleware;
use crate::error::{FlowError, HandlerFailure};
use crate::flow::{AppState, LogicFlow};
use crate::store::Store;

/// Runs every logic flow concurrently and waits for all of them.
///
/// One flow failing never stops the others. Failures are reported as a
/// single [`FlowError::LogicFlows`]; the store's failure policy decides
/// whether they are logged or returned to the dispatcher.
pub struct LogicFlowsMiddleware<S, A> {
    flows: Vec<Arc<dyn LogicFlow<S, A>>>,
}

impl<S, A> LogicFlowsMiddleware<S, A> {
    pub fn new(flows: Vec<Arc<dyn LogicFlow<S, A>>>) -> Self {
        Self { flows }
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

#[async_trait]
impl<S, A> Middleware<S, A> for LogicFlowsMiddleware<S, A>
where
    S: AppState,
    A: Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "logic-flows"
    }

    async fn run(&self, action: &A, store: &Store<S, A>) -> Result<(), FlowError> {
        let results = join_all(self.flows.iter().map(|flow| flow.on_next(action, store))).await;

        let failures: Vec<HandlerFailure> = self
            .flows
            .iter()
            .zip(results)
            .filter_map(|(flow, result)| {
                result.err().map(|error| HandlerFailure {
                    handler: flow.name(),
                    error,
                })
            })
            .collect();

        if failures.is_empty() {
            return Ok(());
        }

        Err(FlowError::LogicFlows {
            failures,
            total: self.flows.len(),
        })
    }
}
