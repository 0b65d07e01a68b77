//! Shared fixtures: a small app model, flows, recording middleware.

#![allow(dead_code, unused_imports)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rudder::{Callback, FlowError, LogicFlow, Middleware, StateFlow, Store};

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub count: i64,
    pub label: String,
}

impl Model {
    pub fn new(count: i64) -> Self {
        Self {
            count,
            label: "start".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Inc,
    Dec,
    Rename(String),
    /// Recognized by `Strict`, which refuses it.
    Explode,
    /// Recognized by nobody.
    Noop,
}

/// Counts `Inc`/`Dec`, leaves everything else alone.
pub fn counting(model: Model, msg: &Msg) -> Model {
    match msg {
        Msg::Inc => Model {
            count: model.count + 1,
            ..model
        },
        Msg::Dec => Model {
            count: model.count - 1,
            ..model
        },
        _ => model,
    }
}

pub fn labelling(model: Model, msg: &Msg) -> Model {
    match msg {
        Msg::Rename(label) => Model {
            label: label.clone(),
            ..model
        },
        _ => model,
    }
}

/// Rejects `Explode`.
pub struct Strict;

impl StateFlow<Model, Msg> for Strict {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn handle(&self, model: Model, msg: &Msg) -> Result<Model, FlowError> {
        match msg {
            Msg::Explode => Err(FlowError::Rejected("explode is not allowed".into())),
            _ => Ok(model),
        }
    }
}

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// Records every action it sees, with the state the store had at that time.
pub struct Recorder {
    pub seen: Log,
}

#[async_trait]
impl Middleware<Model, Msg> for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    async fn run(&self, msg: &Msg, store: &Store<Model, Msg>) -> Result<(), FlowError> {
        let count = store.state().map(|m| m.count);
        self.seen.lock().push(format!("{msg:?}@{count:?}"));
        Ok(())
    }
}

pub struct FailingMiddleware;

#[async_trait]
impl Middleware<Model, Msg> for FailingMiddleware {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn run(&self, _msg: &Msg, _store: &Store<Model, Msg>) -> Result<(), FlowError> {
        Err(FlowError::Rejected("middleware down".into()))
    }
}

/// Logic flow that records actions after an optional delay.
pub struct Tracker {
    pub name: &'static str,
    pub seen: Log,
    pub delay: Duration,
}

#[async_trait]
impl LogicFlow<Model, Msg> for Tracker {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn on_next(&self, msg: &Msg, _store: &Store<Model, Msg>) -> Result<(), FlowError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.seen.lock().push(format!("{}:{msg:?}", self.name));
        Ok(())
    }
}

pub struct Broken;

#[async_trait]
impl LogicFlow<Model, Msg> for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn on_next(&self, _msg: &Msg, _store: &Store<Model, Msg>) -> Result<(), FlowError> {
        Err(FlowError::Other(anyhow::anyhow!("service unavailable")))
    }
}

/// Callback that counts its invocations.
pub fn counter() -> (Callback, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&hits);
    let callback = Callback::new(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (callback, hits)
}

pub fn hits(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

/// Store at `Model::new(count)` with the counting and labelling flows.
pub fn model_store(count: i64) -> Store<Model, Msg> {
    Store::<Model, Msg>::builder()
        .initial_state(Model::new(count))
        .state_flow(counting)
        .state_flow(labelling)
        .build()
}
