// SPDX-License-Identifier: BUSL-1.1
//! # Supplier Lifecycle API
//!
//! Registration, qualification, compliance snapshots, the per-supplier
//! scheduling trigger, and the lifecycle audit trail. Tier and risk
//! strings are parsed at this boundary — everything past the handlers
//! works with the closed enums.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use sqe_core::{
    compliance_snapshot, next_audit_date, next_requalification_date, tier_policy, AuditEventKind,
    CriticalityTier, RiskClassification, Supplier,
};
use sqe_engine::LifecycleDatePatch;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::{AuditEntryDto, PaginationParams, SupplierDto};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/suppliers", get(list_suppliers).post(register_supplier))
        .route("/v1/suppliers/:id", get(get_supplier))
        .route("/v1/suppliers/:id/qualify", post(qualify_supplier))
        .route("/v1/suppliers/:id/compliance", get(get_compliance))
        .route("/v1/suppliers/:id/audit-trail", get(get_audit_trail))
        .route("/v1/suppliers/:id/schedule", post(trigger_schedule))
}

/// Request to register a supplier.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterSupplierRequest {
    pub name: String,
    /// Criticality tier: "critical", "major", or "minor".
    pub tier: String,
    /// Optional risk override: "high", "medium", or "low". Defaults to
    /// the tier policy's classification.
    pub risk: Option<String>,
}

impl Validate for RegisterSupplierRequest {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must be non-empty".to_string());
        }
        if self.name.len() > 255 {
            return Err("name must not exceed 255 characters".to_string());
        }
        Ok(())
    }
}

/// Request to record a supplier's qualification.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QualifySupplierRequest {
    pub qualification_date: NaiveDate,
    /// Identity of the person completing the qualification.
    pub qualified_by: String,
}

impl Validate for QualifySupplierRequest {
    fn validate(&self) -> Result<(), String> {
        if self.qualified_by.trim().is_empty() {
            return Err("qualified_by must be non-empty".to_string());
        }
        Ok(())
    }
}

/// Compliance snapshot response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComplianceDto {
    /// "compliant", "warning", or "non_compliant".
    pub status: String,
    pub issues: Vec<String>,
    pub actions: Vec<String>,
}

/// Outcome of a manual scheduling trigger.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScheduleOutcomeDto {
    pub supplier_id: Uuid,
    /// True when a new assessment was created by this trigger.
    pub scheduled: bool,
}

/// POST /v1/suppliers — Register a supplier.
#[utoipa::path(
    post,
    path = "/v1/suppliers",
    request_body = RegisterSupplierRequest,
    responses(
        (status = 201, description = "Supplier registered", body = SupplierDto),
        (status = 422, description = "Invalid name, tier, or risk", body = crate::error::ErrorBody),
    ),
    tag = "suppliers"
)]
pub(crate) async fn register_supplier(
    State(state): State<AppState>,
    body: Result<Json<RegisterSupplierRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SupplierDto>), AppError> {
    let req = extract_validated_json(body)?;
    let tier: CriticalityTier = req.tier.parse()?;
    let risk = match &req.risk {
        Some(s) => parse_risk(s)?,
        None => tier_policy(tier).risk,
    };

    let now = Utc::now();
    let supplier = Supplier {
        id: Uuid::new_v4(),
        name: req.name,
        tier,
        risk,
        qualification_date: None,
        requalification_date: None,
        last_audit_date: None,
        next_audit_date: None,
        archived: false,
        created_at: now,
        updated_at: now,
    };
    let created = state.directory.register(supplier).await?;
    tracing::info!(supplier_id = %created.id, tier = %created.tier, "supplier registered");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /v1/suppliers — List active suppliers with pagination.
#[utoipa::path(
    get,
    path = "/v1/suppliers",
    params(
        ("limit" = Option<usize>, Query, description = "Max items to return (default 100, max 1000)"),
        ("offset" = Option<usize>, Query, description = "Items to skip (default 0)"),
    ),
    responses(
        (status = 200, description = "Active suppliers", body = Vec<SupplierDto>),
    ),
    tag = "suppliers"
)]
pub(crate) async fn list_suppliers(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Vec<SupplierDto>>, AppError> {
    let all = state.directory.active().await?;
    let offset = pagination.effective_offset().min(all.len());
    let limit = pagination.effective_limit();
    let page = all
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(SupplierDto::from)
        .collect();
    Ok(Json(page))
}

/// GET /v1/suppliers/:id — Get a supplier.
#[utoipa::path(
    get,
    path = "/v1/suppliers/{id}",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier found", body = SupplierDto),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "suppliers"
)]
pub(crate) async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SupplierDto>, AppError> {
    let supplier = state.directory.get(id).await?;
    Ok(Json(supplier.into()))
}

/// POST /v1/suppliers/:id/qualify — Record a qualification and derive the
/// requalification and audit due dates from the tier policy.
///
/// A Minor-tier supplier never receives a next audit date — the tier has
/// no periodic audit obligation.
#[utoipa::path(
    post,
    path = "/v1/suppliers/{id}/qualify",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    request_body = QualifySupplierRequest,
    responses(
        (status = 200, description = "Qualification recorded", body = SupplierDto),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "suppliers"
)]
pub(crate) async fn qualify_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<QualifySupplierRequest>, JsonRejection>,
) -> Result<Json<SupplierDto>, AppError> {
    let req = extract_validated_json(body)?;
    let supplier = state.directory.get(id).await?;

    let requalification = next_requalification_date(req.qualification_date, supplier.tier);
    // The audit cadence is anchored on the qualification until the first
    // audit is completed.
    let next_audit = next_audit_date(req.qualification_date, supplier.tier);

    let patch = LifecycleDatePatch {
        qualification_date: Some(req.qualification_date),
        requalification_date: Some(requalification),
        next_audit_date: next_audit,
        ..Default::default()
    };
    let updated = state.directory.update_lifecycle_dates(id, patch).await?;

    state
        .emitter
        .record(
            id,
            AuditEventKind::Qualification,
            Some(req.qualification_date.to_string()),
            supplier.qualification_date.map(|d| d.to_string()),
            &req.qualified_by,
            Utc::now(),
        )
        .await?;

    tracing::info!(
        supplier_id = %id,
        qualification_date = %req.qualification_date,
        requalification_date = %requalification,
        "supplier qualified"
    );
    Ok(Json(updated.into()))
}

/// GET /v1/suppliers/:id/compliance — On-demand compliance snapshot.
#[utoipa::path(
    get,
    path = "/v1/suppliers/{id}/compliance",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Compliance snapshot", body = ComplianceDto),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "suppliers"
)]
pub(crate) async fn get_compliance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComplianceDto>, AppError> {
    let supplier = state.directory.get(id).await?;
    let snapshot = compliance_snapshot(&supplier, Local::now().date_naive());
    let status = match snapshot.status {
        sqe_core::ComplianceStatus::Compliant => "compliant",
        sqe_core::ComplianceStatus::Warning => "warning",
        sqe_core::ComplianceStatus::NonCompliant => "non_compliant",
    };
    Ok(Json(ComplianceDto {
        status: status.to_string(),
        issues: snapshot.issues,
        actions: snapshot.actions,
    }))
}

/// GET /v1/suppliers/:id/audit-trail — Lifecycle audit entries, oldest first.
#[utoipa::path(
    get,
    path = "/v1/suppliers/{id}/audit-trail",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Audit trail", body = Vec<AuditEntryDto>),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "suppliers"
)]
pub(crate) async fn get_audit_trail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AuditEntryDto>>, AppError> {
    // 404 for unknown suppliers rather than an empty trail.
    state.directory.get(id).await?;
    let entries = state.emitter.for_supplier(id).await?;
    Ok(Json(entries.into_iter().map(AuditEntryDto::from).collect()))
}

/// POST /v1/suppliers/:id/schedule — Manually trigger the scheduling
/// decision for one supplier.
///
/// Shares the per-supplier critical section with the recurring pass, so a
/// concurrent trigger degrades to `scheduled: false` instead of a
/// duplicate assessment.
#[utoipa::path(
    post,
    path = "/v1/suppliers/{id}/schedule",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Trigger outcome", body = ScheduleOutcomeDto),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "suppliers"
)]
pub(crate) async fn trigger_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleOutcomeDto>, AppError> {
    let scheduled = state
        .scheduler
        .schedule_if_due(id, Local::now().date_naive())
        .await?;
    Ok(Json(ScheduleOutcomeDto {
        supplier_id: id,
        scheduled,
    }))
}

fn parse_risk(s: &str) -> Result<RiskClassification, AppError> {
    match s.to_ascii_lowercase().as_str() {
        "high" => Ok(RiskClassification::High),
        "medium" => Ok(RiskClassification::Medium),
        "low" => Ok(RiskClassification::Low),
        other => Err(AppError::Validation(format!(
            "invalid risk classification: {other:?}"
        ))),
    }
}
