//! Headless runner for the cube clicker economy.
//!
//! Wires configuration, the save file, and the session loop together, then
//! takes operator commands from stdin until told to stop.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `clicker-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the upgrade catalog
//! 4. Restore the saved game from the save file
//! 5. Spawn the session loop
//! 6. Read console commands until `quit` or Ctrl-C
//! 7. Shut the session down, writing any pending change

mod console;
mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clicker_core::config::ClickerConfig;
use clicker_core::session::{self, SessionHandle};
use clicker_store::FileStore;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleExit;
use crate::error::EngineError;

/// Configuration file looked up in the working directory.
const CONFIG_FILE: &str = "clicker-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration or the catalog is invalid, or if the
/// session cannot be shut down.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration first so it can set the default log level.
    let config = load_config()?;

    // 2. Initialize structured logging. `RUST_LOG` wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!(
        tick_interval_ms = config.session.tick_interval_ms,
        save_debounce_ms = config.session.save_debounce_ms,
        unknown_upgrades = ?config.persistence.unknown_upgrades,
        "clicker-engine starting"
    );

    // 3. Build the catalog.
    let catalog = Arc::new(config.build_catalog()?);
    info!(upgrades = catalog.len(), "Upgrade catalog ready");

    // 4. Restore the saved game.
    let mut store = FileStore::new(&config.persistence.path);
    info!(save_path = %store.path().display(), "Opening save file");
    let game = session::load_game(
        Arc::clone(&catalog),
        &mut store,
        config.persistence.unknown_upgrades,
    );

    // 5. Spawn the session loop.
    let (handle, task) = session::spawn_session(game, store, &config.session);
    let _status = config
        .logging
        .status_interval()
        .map(|period| spawn_status_reporter(handle.clone(), period));

    // 6. Operator console.
    println!("{}", console::HELP);
    let console = tokio::spawn(console::run(handle.clone(), console::spawn_stdin_reader()));
    wait_for_stop(console).await;

    // 7. Shut down.
    let report = handle.shutdown().await?;
    task.await?;
    info!(
        ticks = report.ticks,
        balance = report.snapshot.balance,
        lifetime_earned = report.snapshot.lifetime_earned,
        playtime_seconds = report.snapshot.playtime_seconds,
        saved_on_exit = report.saved_on_exit,
        "clicker-engine shutdown complete"
    );
    Ok(())
}

/// Load configuration from `clicker-config.yaml` in the working directory.
fn load_config() -> Result<ClickerConfig, EngineError> {
    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() {
        Ok(ClickerConfig::from_file(config_path)?)
    } else {
        // Logging is not up yet; defaults still honour CLICKER_SAVE_PATH.
        Ok(ClickerConfig::parse("")?)
    }
}

/// Block until the operator quits or an interrupt arrives.
///
/// When stdin closes (the engine runs detached), keep running until Ctrl-C.
async fn wait_for_stop(console: JoinHandle<ConsoleExit>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!(error = %e, "Failed to listen for interrupt");
            }
            info!("Interrupt received");
        }
        exit = console => match exit {
            Ok(ConsoleExit::InputClosed) => {
                info!("Console input closed, running until interrupted");
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "Failed to listen for interrupt");
                }
                info!("Interrupt received");
            }
            Ok(reason) => info!(?reason, "Console stopped"),
            Err(e) => warn!(error = %e, "Console task failed"),
        },
    }
}

/// Log a status line every `period` until the session stops.
fn spawn_status_reporter(handle: SessionHandle, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let Ok(snapshot) = handle.snapshot().await else {
                break;
            };
            info!(
                balance = snapshot.balance,
                lifetime_earned = snapshot.lifetime_earned,
                per_action_yield = snapshot.derived_rates.per_action_yield,
                per_interval_yield = snapshot.derived_rates.per_interval_yield,
                playtime_seconds = snapshot.playtime_seconds,
                "Status"
            );
        }
    })
}
