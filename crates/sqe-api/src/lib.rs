// SPDX-License-Identifier: BUSL-1.1
//! # sqe-api — Axum API for the Supplier Qualification Engine
//!
//! HTTP surface over `sqe-engine`:
//!
//! | Prefix                          | Module                 | Domain                    |
//! |---------------------------------|------------------------|---------------------------|
//! | `/v1/suppliers/*`               | [`routes::suppliers`]  | Supplier lifecycle        |
//! | `/v1/scheduler/*`               | [`routes::scheduler`]  | Reconciliation & status   |
//! | `/openapi.json`                 | [`openapi`]            | OpenAPI spec              |
//! | `/health/*`                     | —                      | Probes (outside the API)  |
//!
//! Persistence is optional: with `DATABASE_URL` set, the store contracts
//! run on Postgres ([`db`]); without it, everything is in-memory.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) are mounted outside the API routes and
/// body-size limit.
pub fn app(state: AppState) -> Router {
    // Body size limit: 2 MiB. Registration payloads are tiny; anything
    // larger is a client error.
    let api = Router::new()
        .merge(routes::suppliers::router())
        .merge(routes::scheduler::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(probes).merge(api)
}

/// GET /health/liveness — process is up.
async fn liveness() -> &'static str {
    "ok"
}

/// GET /health/readiness — stores are reachable.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.directory.count_active().await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "supplier directory unavailable")
        }
    }
}
