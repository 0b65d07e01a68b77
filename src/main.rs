mod counter;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rudder::config::{LogFormat, StoreConfig};
use rudder::Callback;
use serde_json::json;

use crate::counter::CounterAction;

/// Replay counter actions through a store and print the final state.
#[derive(Debug, Parser)]
#[command(name = "rudder", version)]
struct Cli {
    /// Config file (default: ~/.config/rudder/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial counter value
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    start: i64,

    /// Log every dispatched action
    #[arg(long)]
    log_actions: bool,

    /// Action log format
    #[arg(long, value_enum)]
    log_format: Option<FormatArg>,

    /// Actions to dispatch: inc, dec, reset, add:<n>
    #[arg(required = true)]
    actions: Vec<CounterAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Console,
    Json,
}

impl From<FormatArg> for LogFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Console => LogFormat::Console,
            FormatArg::Json => LogFormat::Json,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load_from(path)?,
        None => StoreConfig::load()?,
    };
    if cli.log_actions {
        config.action_logging.enabled = true;
    }
    if let Some(format) = cli.log_format {
        config.action_logging.format = format.into();
    }
    Ok(config)
}

fn counting_callback() -> (Callback, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&hits);
    let callback = Callback::new(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (callback, hits)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rudder::telemetry::init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let store = counter::build_store(cli.start, config);
    store.initialize().await?;

    let (value_changed, value_hits) = counting_callback();
    let (parity_changed, parity_hits) = counting_callback();
    let value = store.subscribe(|s: &counter::CounterState| s.value, value_changed)?;
    let parity = store.subscribe(
        |s: &counter::CounterState| s.value.rem_euclid(2),
        parity_changed,
    )?;

    for action in cli.actions {
        store.put_async(action).await?;
    }

    value.unsubscribe();
    parity.unsubscribe();

    let state = store.state().context("store lost its state")?;
    let report = json!({
        "state": &*state,
        "notifications": {
            "value": value_hits.load(Ordering::SeqCst),
            "parity": parity_hits.load(Ordering::SeqCst),
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_and_flags() {
        let cli = Cli::try_parse_from([
            "rudder",
            "--start",
            "-2",
            "--log-format",
            "json",
            "inc",
            "add:5",
        ])
        .unwrap();
        assert_eq!(cli.start, -2);
        assert_eq!(cli.log_format, Some(FormatArg::Json));
        assert_eq!(
            cli.actions,
            vec![CounterAction::Increment, CounterAction::Add(5)]
        );
    }

    #[test]
    fn requires_at_least_one_action() {
        assert!(Cli::try_parse_from(["rudder"]).is_err());
    }

    #[test]
    fn rejects_unknown_action() {
        assert!(Cli::try_parse_from(["rudder", "jump"]).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let cli = Cli::try_parse_from([
            "rudder",
            "--config",
            "/nonexistent/rudder.toml",
            "inc",
        ])
        .unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn format_arg_maps_to_log_format() {
        assert_eq!(LogFormat::from(FormatArg::Json), LogFormat::Json);
        assert_eq!(LogFormat::from(FormatArg::Console), LogFormat::Console);
    }
}
