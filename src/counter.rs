//! Counter domain replayed by the CLI.

use std::str::FromStr;

use async_trait::async_trait;
use rudder::config::StoreConfig;
use rudder::{FlowError, InitialState, LogicFlow, Reducer, ReducerFlow, StateFlow, Store};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterState {
    pub value: i64,
    /// Number of actions that changed the value.
    pub changes: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CounterAction {
    Increment,
    Decrement,
    Reset,
    Add(i64),
}

impl FromStr for CounterAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inc" => Ok(CounterAction::Increment),
            "dec" => Ok(CounterAction::Decrement),
            "reset" => Ok(CounterAction::Reset),
            other => {
                let amount = other
                    .strip_prefix("add:")
                    .ok_or_else(|| format!("unknown action '{other}' (expected inc, dec, reset or add:<n>)"))?;
                amount
                    .parse()
                    .map(CounterAction::Add)
                    .map_err(|e| format!("invalid amount in '{other}': {e}"))
            }
        }
    }
}

/// Step transitions: increment, decrement, reset.
pub struct CounterReducer;

impl Reducer for CounterReducer {
    type State = CounterState;
    type Action = CounterAction;

    fn reduce(state: Self::State, action: &Self::Action) -> Self::State {
        let value = match action {
            CounterAction::Increment => state.value.saturating_add(1),
            CounterAction::Decrement => state.value.saturating_sub(1),
            CounterAction::Reset => 0,
            CounterAction::Add(_) => return state,
        };
        if value == state.value {
            return state;
        }
        CounterState {
            value,
            changes: state.changes + 1,
        }
    }
}

/// Arbitrary additions; overflow rejects the whole dispatch.
pub struct AddFlow;

impl StateFlow<CounterState, CounterAction> for AddFlow {
    fn name(&self) -> &'static str {
        "add"
    }

    fn handle(&self, state: CounterState, action: &CounterAction) -> Result<CounterState, FlowError> {
        let CounterAction::Add(amount) = action else {
            return Ok(state);
        };
        if *amount == 0 {
            return Ok(state);
        }
        let value = state
            .value
            .checked_add(*amount)
            .ok_or_else(|| FlowError::Rejected(format!("{} + {} overflows", state.value, amount)))?;
        Ok(CounterState {
            value,
            changes: state.changes + 1,
        })
    }
}

/// Logs every multiple of ten the counter lands on.
pub struct Milestones;

#[async_trait]
impl LogicFlow<CounterState, CounterAction> for Milestones {
    fn name(&self) -> &'static str {
        "milestones"
    }

    async fn on_next(
        &self,
        _action: &CounterAction,
        store: &Store<CounterState, CounterAction>,
    ) -> Result<(), FlowError> {
        if let Some(state) = store.state() {
            if state.value != 0 && state.value % 10 == 0 {
                tracing::info!(value = state.value, "Milestone reached");
            }
        }
        Ok(())
    }
}

pub struct StartValue(pub i64);

#[async_trait]
impl InitialState<CounterState> for StartValue {
    async fn initial_state(&self) -> Result<CounterState, FlowError> {
        Ok(CounterState {
            value: self.0,
            changes: 0,
        })
    }
}

pub fn build_store(start: i64, config: StoreConfig) -> Store<CounterState, CounterAction> {
    Store::builder()
        .config(config)
        .initializer(StartValue(start))
        .state_flow(ReducerFlow::<CounterReducer>::new())
        .state_flow(AddFlow)
        .logic_flow(Milestones)
        .build()
}
