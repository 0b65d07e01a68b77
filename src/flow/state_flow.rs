//! State flow trait: the only place where state transitions happen.

use crate::error::FlowError;

/// A pure transition `(state, action) -> state`.
///
/// State flows are registered in order and folded left: each flow receives
/// the state returned by the previous one. A flow must be total. For an
/// action it doesn't handle it returns the input state unchanged.
///
/// Returning an error aborts the whole dispatch before anything is
/// committed, so `Err` is reserved for actions a flow recognizes but cannot
/// apply.
///
/// Plain closures `Fn(S, &A) -> S` are infallible state flows:
///
/// ```
/// use rudder::Store;
///
/// let store = Store::<u32, &'static str>::builder()
///     .initial_state(0)
///     .state_flow(|n: u32, action: &&'static str| if *action == "INC" { n + 1 } else { n })
///     .build();
/// assert_eq!(*store.state().unwrap(), 0);
/// ```
pub trait StateFlow<S, A>: Send + Sync {
    /// Returns the name of this flow for logging and error reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Produce the next state for `action`.
    fn handle(&self, state: S, action: &A) -> Result<S, FlowError>;
}

impl<S, A, F> StateFlow<S, A> for F
where
    F: Fn(S, &A) -> S + Send + Sync,
{
    fn handle(&self, state: S, action: &A) -> Result<S, FlowError> {
        Ok(self(state, action))
    }
}
