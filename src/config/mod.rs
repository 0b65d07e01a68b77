//! Store configuration: types, defaults and TOML loading.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{
    ActionLoggingConfig, FailurePolicy, LogFormat, LogLevel, MiddlewareConfig, StoreConfig,
};
