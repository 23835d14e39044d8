//! # mokkad, the mokka daemon
//!
//! Composition root that wires the hardware facade, the settings store and
//! the HTTP adapter together and serves requests.
//!
//! ## Responsibilities
//! - Parse configuration from the environment
//! - Initialize tracing
//! - Construct the hardware backends and the `CoffeeMachine` facade
//! - Build the axum router and serve it
//! - Handle graceful shutdown, cancelling the lifecycle token so deferred
//!   session watchers release the lines before the process exits
//!
//! This build ships the mock hardware backends; real GPIO/I2C backends plug
//! into the same enum dispatch seam behind feature flags.

mod config;

use config::DaemonConfig;
use mokka_api::AppState;
use mokka_hardware::CoffeeMachine;
use mokka_hardware::config::MachineConfig;
use mokka_hardware::devices::{AnyDacBus, AnyPinController};
use mokka_hardware::mock::{MockDacBus, MockPinController};
use mokka_storage::SettingsStore;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DaemonConfig::from_env();
    let shutdown = CancellationToken::new();

    // Hardware backends. The mock pin handle is kept alive so an operator
    // shell could be attached later; dropping it would not break the mock.
    let (pins, _pin_handle) = MockPinController::new();
    let (dac, _dac_handle) = MockDacBus::new();
    let machine = CoffeeMachine::new(
        AnyPinController::Mock(pins),
        AnyDacBus::Mock(dac),
        MachineConfig::default(),
    )
    .with_shutdown(shutdown.clone());

    let settings = SettingsStore::new(&config.settings_path);

    let state = AppState::new(machine, settings);
    let app = mokka_api::build(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "mokkad listening");

    let serve_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Release any deferred session watcher before exiting.
            serve_shutdown.cancel();
        })
        .await?;

    info!("mokkad stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received");
}
