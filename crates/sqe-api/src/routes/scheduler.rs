// SPDX-License-Identifier: BUSL-1.1
//! # Scheduler API
//!
//! Privileged full-reconciliation trigger and the read-only status view.

use std::collections::HashMap;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::routes::AssessmentDto;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/scheduler/reconcile", post(reconcile))
        .route("/v1/scheduler/status", get(status))
}

/// Aggregate outcome of one reconciliation pass.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReconcileOutcomeDto {
    /// Suppliers for which a new assessment was created.
    pub scheduled: usize,
    /// Suppliers whose scheduling attempt failed.
    pub errors: usize,
    /// One descriptive message per failed supplier.
    pub messages: Vec<String>,
}

/// Read-only scheduler status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SchedulerStatusDto {
    pub active_suppliers: usize,
    pub suppliers_by_tier: HashMap<String, usize>,
    pub suppliers_by_risk: HashMap<String, usize>,
    pub non_compliant_suppliers: usize,
    pub assessments_due_soon: Vec<AssessmentDto>,
}

/// POST /v1/scheduler/reconcile — Run one reconciliation pass over all
/// active suppliers.
///
/// Per-supplier failures are isolated and reported in the aggregate; the
/// pass itself only fails when the supplier directory cannot be listed.
#[utoipa::path(
    post,
    path = "/v1/scheduler/reconcile",
    responses(
        (status = 200, description = "Pass outcome", body = ReconcileOutcomeDto),
    ),
    tag = "scheduler"
)]
pub(crate) async fn reconcile(State(state): State<AppState>) -> Result<Json<ReconcileOutcomeDto>, AppError> {
    let outcome = state
        .reconciler
        .reconcile_all(Local::now().date_naive())
        .await?;
    Ok(Json(ReconcileOutcomeDto {
        scheduled: outcome.scheduled,
        errors: outcome.errors,
        messages: outcome.messages,
    }))
}

/// GET /v1/scheduler/status — Supplier counts by tier/risk and the
/// assessments due in the near term. Mutates nothing.
#[utoipa::path(
    get,
    path = "/v1/scheduler/status",
    responses(
        (status = 200, description = "Scheduler status", body = SchedulerStatusDto),
    ),
    tag = "scheduler"
)]
pub(crate) async fn status(State(state): State<AppState>) -> Result<Json<SchedulerStatusDto>, AppError> {
    let status = state
        .reconciler
        .status_summary(Local::now().date_naive())
        .await?;
    Ok(Json(SchedulerStatusDto {
        active_suppliers: status.active_suppliers,
        suppliers_by_tier: status.suppliers_by_tier,
        suppliers_by_risk: status.suppliers_by_risk,
        non_compliant_suppliers: status.non_compliant_suppliers,
        assessments_due_soon: status
            .assessments_due_soon
            .into_iter()
            .map(AssessmentDto::from)
            .collect(),
    }))
}
