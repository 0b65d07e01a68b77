//! Observable single-writer state container.
//!
//! A [`Store`] holds one immutable state value. Dispatching an action folds
//! the registered [`StateFlow`]s over the current state; when the result
//! differs, it is committed and every subscription whose selected slice
//! changed gets its callback invoked, once per distinct callback. Then all
//! [`Middleware`] run concurrently, including the fan-out to every
//! [`LogicFlow`], whether or not the state changed.
//!
//! ```
//! use rudder::{Callback, Store};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), rudder::StoreError> {
//! let store = Store::<u32, &'static str>::builder()
//!     .initial_state(0)
//!     .state_flow(|n: u32, action: &&'static str| match *action {
//!         "INC" => n + 1,
//!         _ => n,
//!     })
//!     .build();
//!
//! let parity = store.subscribe(|n: &u32| n % 2, Callback::new(|| println!("parity flipped")))?;
//! store.put_async("INC").await?;
//! assert_eq!(*store.state().unwrap(), 1);
//! parity.unsubscribe();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod flow;
pub mod middleware;
pub mod store;
pub mod telemetry;
mod with;

pub use config::{FailurePolicy, StoreConfig};
pub use error::{FlowError, HandlerFailure, StoreError};
pub use flow::{Action, AppState, LogicFlow, Reducer, ReducerFlow, StateFlow};
pub use middleware::Middleware;
pub use store::{
    Callback, InitialState, StateMap, Store, StoreBuilder, Subscription, SubscriptionGroup,
    SubscriptionId,
};
pub use with::With;
