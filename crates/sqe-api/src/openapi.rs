// SPDX-License-Identifier: BUSL-1.1
//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SQE API — Supplier Qualification Engine",
        version = "0.3.2",
        description = "Supplier qualification lifecycle engine.\n\nProvides:\n- **Supplier lifecycle**: registration, qualification, tier-policy derived requalification and audit due dates\n- **Compliance snapshots**: on-demand status/issues/actions views\n- **Assessment scheduling**: per-supplier trigger and recurring reconciliation over all active suppliers\n- **Lifecycle audit trail**: immutable qualification/requalification/audit evidence\n\nHealth probes (`/health/*`) live outside the API surface.",
        license(name = "BUSL-1.1")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::suppliers::register_supplier,
        crate::routes::suppliers::list_suppliers,
        crate::routes::suppliers::get_supplier,
        crate::routes::suppliers::qualify_supplier,
        crate::routes::suppliers::get_compliance,
        crate::routes::suppliers::get_audit_trail,
        crate::routes::suppliers::trigger_schedule,
        crate::routes::scheduler::reconcile,
        crate::routes::scheduler::status,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::SupplierDto,
        crate::routes::AssessmentDto,
        crate::routes::AuditEntryDto,
        crate::routes::suppliers::RegisterSupplierRequest,
        crate::routes::suppliers::QualifySupplierRequest,
        crate::routes::suppliers::ComplianceDto,
        crate::routes::suppliers::ScheduleOutcomeDto,
        crate::routes::scheduler::ReconcileOutcomeDto,
        crate::routes::scheduler::SchedulerStatusDto,
    )),
    tags(
        (name = "suppliers", description = "Supplier lifecycle operations"),
        (name = "scheduler", description = "Assessment scheduling"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_spec))
}

async fn serve_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
