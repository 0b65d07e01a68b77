//! Action logging middleware.
//!
//! Every dispatched action is rendered to an [`ActionRecord`] and written to
//! an [`ActionLogSink`]. Logging is a side channel: a slow or failing sink is
//! cut off after the configured timeout and its error is dropped, so it can
//! never fail or stall a dispatch.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::Middleware;
use crate::config::{ActionLoggingConfig, LogFormat, LogLevel};
use crate::error::FlowError;
use crate::flow::action_name;
use crate::store::Store;

/// Tracing target used by [`TracingSink`].
pub const ACTION_LOG_TARGET: &str = "rudder::actions";

/// One dispatched action, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    /// Short type name of the action.
    pub name: &'static str,
    /// `Debug` rendering of the action value.
    pub payload: String,
    pub format: LogFormat,
    pub level: LogLevel,
}

impl ActionRecord {
    pub fn new<A: Debug>(action: &A, format: LogFormat, level: LogLevel) -> Self {
        Self {
            name: action_name::<A>(),
            payload: format!("{:?}", action),
            format,
            level,
        }
    }

    /// Render the record in its configured format.
    pub fn line(&self) -> String {
        match self.format {
            LogFormat::Console => format!("{} {}", self.name, self.payload),
            LogFormat::Json => json!({
                "action": self.name,
                "payload": self.payload,
            })
            .to_string(),
        }
    }
}

/// Destination for action records.
#[async_trait]
pub trait ActionLogSink: Send + Sync {
    async fn write(&self, record: &ActionRecord) -> Result<(), FlowError>;
}

/// Writes records as `tracing` events on [`ACTION_LOG_TARGET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl ActionLogSink for TracingSink {
    async fn write(&self, record: &ActionRecord) -> Result<(), FlowError> {
        let line = record.line();
        match record.level {
            LogLevel::Trace => tracing::trace!(target: ACTION_LOG_TARGET, "{}", line),
            LogLevel::Debug => tracing::debug!(target: ACTION_LOG_TARGET, "{}", line),
            LogLevel::Info => tracing::info!(target: ACTION_LOG_TARGET, "{}", line),
            LogLevel::Warn => tracing::warn!(target: ACTION_LOG_TARGET, "{}", line),
            LogLevel::Error => tracing::error!(target: ACTION_LOG_TARGET, "{}", line),
        }
        Ok(())
    }
}

/// Logs every dispatched action, best effort.
pub struct LoggingMiddleware {
    sink: Arc<dyn ActionLogSink>,
    timeout: Duration,
    format: LogFormat,
    level: LogLevel,
}

impl LoggingMiddleware {
    pub fn new(config: &ActionLoggingConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    pub fn with_sink(config: &ActionLoggingConfig, sink: Arc<dyn ActionLogSink>) -> Self {
        Self {
            sink,
            timeout: Duration::from_millis(config.timeout_ms),
            format: config.format,
            level: config.level,
        }
    }
}

#[async_trait]
impl<S, A> Middleware<S, A> for LoggingMiddleware
where
    S: Send + Sync + 'static,
    A: Debug + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "action-logging"
    }

    async fn run(&self, action: &A, _store: &Store<S, A>) -> Result<(), FlowError> {
        let record = ActionRecord::new(action, self.format, self.level);

        match tokio::time::timeout(self.timeout, self.sink.write(&record)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                tracing::trace!(action = record.name, %error, "Action log sink failed");
            }
            Err(_) => {
                tracing::trace!(
                    action = record.name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Action log sink timed out"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    #[allow(dead_code)]
    enum CartAction {
        Add { sku: &'static str, qty: u32 },
    }

    #[test]
    fn console_line_has_name_and_payload() {
        let record = ActionRecord::new(
            &CartAction::Add { sku: "A-1", qty: 2 },
            LogFormat::Console,
            LogLevel::Info,
        );
        assert_eq!(record.line(), r#"CartAction Add { sku: "A-1", qty: 2 }"#);
    }

    #[test]
    fn json_line_is_valid_json() {
        let record = ActionRecord::new(&"INC", LogFormat::Json, LogLevel::Debug);
        let value: serde_json::Value = serde_json::from_str(&record.line()).unwrap();
        assert_eq!(value["action"], "&str");
        assert_eq!(value["payload"], "\"INC\"");
    }
}
