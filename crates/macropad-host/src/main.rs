//! Macropad host daemon entry point.
//!
//! Wires the serial infrastructure and the window query into the update
//! dispatcher, then drives it from a single-threaded tick loop.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config / HostIdentity   -- fatal on startup errors
//!  └─ UpdateDispatcher
//!       ├─ DeviceRegistry  (UsbDataPortEnumerator + SerialTransportFactory)
//!       └─ NativeWindowTitleProvider
//!  └─ tick loop (current-thread tokio runtime)
//!       ├─ every 5 s   -> dispatch_discovery
//!       ├─ every 60 s  -> dispatch_time_sync
//!       ├─ every 2 s   -> dispatch_window_sync
//!       └─ Ctrl-C      -> clean shutdown
//! ```
//!
//! # Scheduling model (for beginners)
//!
//! The daemon is deliberately single-threaded: the runtime uses the
//! `current_thread` flavor and the three cadences are independent
//! [`tokio::time::interval`] tickers polled by one `select!` loop.  Each
//! dispatch runs to completion before the next tick of *any* cadence is
//! processed, so the registry and device handles need no locking at all.
//!
//! A tokio interval completes its first tick immediately, which is exactly
//! the startup contract we want: all three operations run once as soon as
//! the daemon starts, then settle into their cadences.  The `biased` keyword
//! makes `select!` check branches top-to-bottom, so at startup discovery
//! runs before the first fan-outs.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use macropad_core::{platform_id, HostIdentity};
use macropad_host::application::dispatcher::UpdateDispatcher;
use macropad_host::application::registry::DeviceRegistry;
use macropad_host::infrastructure::serial::{SerialTransportFactory, UsbDataPortEnumerator};
use macropad_host::infrastructure::storage::config::{self, AppConfig};
use macropad_host::infrastructure::window_title::NativeWindowTitleProvider;

/// Send clock and focused-window updates to attached macropad devices.
#[derive(Debug, Parser)]
#[command(name = "macropad-host", version, about)]
struct Cli {
    /// Display additional logging
    #[arg(short, long)]
    verbose: bool,

    /// Read configuration from this file instead of the platform default
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configuration must load before logging so the configured level can
    // seed the filter; a malformed file aborts startup.
    let config = match &cli.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => config::load_config().context("loading config")?,
    };

    // Initialise structured logging.  `RUST_LOG` wins over the CLI flag,
    // which wins over the config file.
    let default_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.host.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("macropad host starting");

    // Resolve who we are once; devices see these strings verbatim in every
    // connect handshake.  Running without a host name would announce blank
    // devices, so this is fatal.
    let host = match config.host.host_name.clone() {
        Some(name) => HostIdentity::new(name, platform_id()),
        None => HostIdentity::from_env().context("resolving host identity")?,
    };
    info!("announcing as {} ({})", host.name, host.os);

    let dispatcher = build_dispatcher(&config, host);
    run_tick_loop(dispatcher, &config).await;

    info!("macropad host stopped");
    Ok(())
}

/// Wires the production adapters into a dispatcher.
fn build_dispatcher(config: &AppConfig, host: HostIdentity) -> UpdateDispatcher {
    let registry = DeviceRegistry::new(
        Box::new(UsbDataPortEnumerator::new()),
        Box::new(SerialTransportFactory::new(config.serial.baud_rate)),
        host,
    );
    UpdateDispatcher::new(registry, Box::new(NativeWindowTitleProvider::new()))
}

/// Runs the three cadences until a shutdown signal arrives.
async fn run_tick_loop(mut dispatcher: UpdateDispatcher, config: &AppConfig) {
    let mut discovery = interval(Duration::from_secs(config.cadence.discovery_secs));
    let mut time_sync = interval(Duration::from_secs(config.cadence.time_sync_secs));
    let mut window_sync = interval(Duration::from_secs(config.cadence.window_sync_secs));
    // A blocking send can overrun a short cadence; resume on the next
    // aligned tick instead of bursting to catch up.
    for ticker in [&mut discovery, &mut time_sync, &mut window_sync] {
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    }

    info!(
        "cadences: discovery {}s, time sync {}s, window sync {}s; press Ctrl-C to exit",
        config.cadence.discovery_secs, config.cadence.time_sync_secs,
        config.cadence.window_sync_secs
    );

    // One long-lived listener, so a signal arriving mid-dispatch is not lost
    // between loop iterations.
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            signal = &mut shutdown => {
                if let Err(e) = signal {
                    debug!("ctrl-c listener failed: {e}");
                }
                info!("shutdown signal received");
                break;
            }
            _ = discovery.tick() => dispatcher.dispatch_discovery(),
            _ = time_sync.tick() => dispatcher.dispatch_time_sync(),
            _ = window_sync.tick() => dispatcher.dispatch_window_sync(),
        }
    }
}
