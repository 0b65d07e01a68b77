use serde::{Deserialize, Serialize};

/// Root configuration of a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub middleware: MiddlewareConfig,
    #[serde(default)]
    pub action_logging: ActionLoggingConfig,
}

/// Middleware execution settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// What a dispatch does with middleware failures (default: log).
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// How middleware and logic flow failures reach the dispatcher.
///
/// Whatever the policy, every middleware runs to completion first, and a
/// committed state transition is never rolled back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Drop failures silently.
    Ignore,
    /// Log each failure at `warn` and report success.
    #[default]
    Log,
    /// Return `StoreError::Middleware` with every failure.
    Propagate,
}

/// Action logging middleware settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLoggingConfig {
    /// Install the logging middleware (default: false).
    #[serde(default)]
    pub enabled: bool,
    /// Upper bound for one sink write in milliseconds (default: 100).
    #[serde(default = "default_log_timeout_ms")]
    pub timeout_ms: u64,
    /// Record rendering (default: console).
    #[serde(default)]
    pub format: LogFormat,
    /// Level of the emitted tracing events (default: info).
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Console,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

fn default_log_timeout_ms() -> u64 {
    100
}

impl Default for ActionLoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_ms: default_log_timeout_ms(),
            format: LogFormat::default(),
            level: LogLevel::default(),
        }
    }
}
