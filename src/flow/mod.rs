//! Handler contracts for the store's two pipelines.
//!
//! ```text
//!            ┌──────────── state flows (ordered fold) ─────────────┐
//! Action ──→ │ flow₁ ──→ flow₂ ──→ … ──→ flowₙ ──→ commit + notify │
//!    │       └─────────────────────────────────────────────────────┘
//!    └─────→ middleware (concurrent) ──→ logic flows (concurrent)
//! ```
//!
//! - **State flows** are pure and total: they return the input state for
//!   actions they don't recognize.
//! - **Logic flows** and **middleware** are async side effects that run for
//!   every action, whether or not the state changed.

mod action;
mod logic_flow;
mod reducer;
mod state;
mod state_flow;

pub use action::{action_name, Action};
pub use logic_flow::LogicFlow;
pub use reducer::{Reducer, ReducerFlow};
pub use state::AppState;
pub use state_flow::StateFlow;
