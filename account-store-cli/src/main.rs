//! Command-line entry point for the account store.
//!
//! Loads the configuration, opens the store (running its one-time load) and
//! executes a single command. Results go to stdout as JSON; logs go to
//! stderr so the output stays machine-readable.

mod cli;
mod commands;

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use account_store_app::{AppConfig, AppStateBuilder};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::commands::{Outcome, TracingObserver};

/// Exit code for a command that leaves an account invalid
const EXIT_INVALID: u8 = 2;
/// Exit code for an unknown account id
const EXIT_NOT_FOUND: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over the configured filter; a broken config still gets logging
    let config = AppConfig::load(cli.config.as_deref());
    let filter = config.as_ref().map_or("info", |c| c.log_filter.as_str());
    init_tracing(filter);

    let result = config
        .context("Failed to load configuration")
        .and_then(|config| run(cli, config));

    match result {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Invalid) => ExitCode::from(EXIT_INVALID),
        Ok(Outcome::NotFound) => ExitCode::from(EXIT_NOT_FOUND),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<Outcome> {
    if let Some(data_file) = cli.data_file {
        config.data_file = Some(data_file);
    }

    let mut state = AppStateBuilder::new()
        .config(config)
        .observer(Arc::new(TracingObserver))
        .build()
        .context("Failed to open account store")?;
    tracing::debug!(
        "Store opened with {} accounts under key '{}'",
        state.store.len(),
        state.ctx().storage_key()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = commands::execute(&mut state.store, cli.command, &mut out)?;
    out.flush()?;
    Ok(outcome)
}
