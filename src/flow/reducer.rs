//! Reducer trait and its state flow adapter.

use std::marker::PhantomData;

use super::state::AppState;
use super::state_flow::StateFlow;
use crate::error::FlowError;

/// Reducer transforms state based on actions.
///
/// It must be a pure function: (State, Action) -> State. Unlike
/// [`StateFlow`], a reducer has no instance data, so a whole module's
/// transitions can live in one `impl` block and be tested without a store.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: AppState;

    /// The action type this reducer handles.
    type Action;

    /// Process an action and return the new state.
    ///
    /// This should be a pure function with no side effects.
    fn reduce(state: Self::State, action: &Self::Action) -> Self::State;
}

/// Registers a [`Reducer`] as a state flow.
pub struct ReducerFlow<R>(PhantomData<fn() -> R>);

impl<R> ReducerFlow<R> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R> Default for ReducerFlow<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> StateFlow<R::State, R::Action> for ReducerFlow<R>
where
    R: Reducer,
{
    fn name(&self) -> &'static str {
        std::any::type_name::<R>()
    }

    fn handle(&self, state: R::State, action: &R::Action) -> Result<R::State, FlowError> {
        Ok(R::reduce(state, action))
    }
}
