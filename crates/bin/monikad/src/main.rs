//! # monikad — monika mock driver daemon
//!
//! Composition root that wires all adapters together and runs the driver.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file) and initialise logging
//! - Pick the device inventory (NetBox or mock), fetch its devices and
//!   attach the simulation to each
//! - Construct the gateway client, the error reconciler and the update worker
//! - Build the axum router over the driver service
//! - Connect to the gateway, serve until SIGINT, then disconnect
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;
mod inventory;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use monika_adapter_gateway_reqwest::GatewayClient;
use monika_adapter_http_axum::state::AppState;
use monika_adapter_mock::{MockDevice, iolet_stopped_checker};
use monika_app::ports::DeviceProvider;
use monika_app::reconciler::ErrorReconciler;
use monika_app::services::driver_service::DriverService;
use monika_app::session::DriverSession;
use monika_app::update_worker::{self, UpdateWorker};
use monika_domain::driver::DriverRegistration;

use crate::config::Config;
use crate::inventory::Inventory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Devices
    let provider = Inventory::from_config(&config).context("failed to build device inventory")?;
    tracing::info!(source = provider.source(), "fetching devices");
    provider
        .fetch_devices()
        .await
        .context("failed to fetch devices")?;

    let (queue, changes) = update_worker::channel();
    let settings = config.mock_settings();
    let mocks: Vec<MockDevice> = provider
        .devices()
        .into_iter()
        .map(|device| MockDevice::attach(device, queue.clone(), settings))
        .collect();
    drop(queue);

    // Gateway
    let gateway = Arc::new(
        GatewayClient::new(&config.gateway.url, config.gateway_timeout())
            .context("failed to build gateway client")?,
    );
    let mut reconciler = ErrorReconciler::new(Arc::clone(&gateway));
    reconciler.set_iolet_checker(iolet_stopped_checker);
    let worker = UpdateWorker::new(reconciler, Arc::clone(&gateway));

    let registration = DriverRegistration::new(provider.device_type(), config.server.port)
        .with_location(config.gateway.location.clone());
    let session = DriverSession::new(Arc::clone(&gateway), registration);

    // HTTP
    let state = AppState::new(DriverService::new(provider));
    let app = monika_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, gateway = %gateway.base_url(), "monikad listening");

    let served = session
        .run(async {
            let worker = tokio::spawn(worker.run(changes));
            let tickers: Vec<_> = mocks.iter().map(MockDevice::start_ticker).collect();

            let served = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await;

            for ticker in tickers {
                ticker.abort();
            }
            worker.abort();
            served
        })
        .await
        .context("gateway refused the driver")?;
    served.context("server error")?;

    tracing::info!("monikad stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
