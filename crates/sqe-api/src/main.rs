// SPDX-License-Identifier: BUSL-1.1
//! API binary: tracing init, config, store selection, driver start,
//! HTTP serve, graceful shutdown.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use sqe_api::config::AppConfig;
use sqe_api::state::AppState;
use sqe_engine::{DriverConfig, RecurringJobDriver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let state = match sqe_api::db::init_pool().await? {
        Some(pool) => AppState::with_stores(
            Arc::new(sqe_api::db::suppliers::PgSupplierDirectory::new(pool.clone())),
            Arc::new(sqe_api::db::assessments::PgAssessmentStore::new(pool.clone())),
            Arc::new(sqe_api::db::audit::PgAuditTrail::new(pool)),
        ),
        None => AppState::in_memory(),
    };

    let driver = if config.driver_enabled {
        Some(RecurringJobDriver::start(
            state.reconciler.clone(),
            DriverConfig {
                warmup: config.warmup,
            },
        ))
    } else {
        tracing::info!("recurring driver disabled by configuration");
        None
    };

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "sqe-api listening");

    axum::serve(listener, sqe_api::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(driver) = driver {
        driver.shutdown().await;
    }
    tracing::info!("sqe-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
