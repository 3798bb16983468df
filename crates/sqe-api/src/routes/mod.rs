// SPDX-License-Identifier: BUSL-1.1
//! # API Route Modules
//!
//! - `suppliers` — Supplier registration, qualification, compliance
//!   snapshots, per-supplier scheduling trigger, and the lifecycle audit
//!   trail.
//! - `scheduler` — Privileged full reconciliation trigger and the
//!   read-only scheduler status view.
//!
//! Shared response DTOs live here; enums are rendered as their snake_case
//! strings so the wire format stays stable independent of the core types.

pub mod scheduler;
pub mod suppliers;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use sqe_core::{AssessmentRecord, LifecycleAuditEntry, Supplier};

/// Supplier as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupplierDto {
    pub id: Uuid,
    pub name: String,
    pub tier: String,
    pub risk: String,
    pub qualification_date: Option<NaiveDate>,
    pub requalification_date: Option<NaiveDate>,
    pub last_audit_date: Option<NaiveDate>,
    pub next_audit_date: Option<NaiveDate>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Supplier> for SupplierDto {
    fn from(s: Supplier) -> Self {
        Self {
            id: s.id,
            name: s.name,
            tier: s.tier.to_string(),
            risk: s.risk.to_string(),
            qualification_date: s.qualification_date,
            requalification_date: s.requalification_date,
            last_audit_date: s.last_audit_date,
            next_audit_date: s.next_audit_date,
            archived: s.archived,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Assessment work item as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssessmentDto {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub kind: String,
    pub scheduled_date: NaiveDate,
    pub status: String,
    pub findings: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<AssessmentRecord> for AssessmentDto {
    fn from(r: AssessmentRecord) -> Self {
        Self {
            id: r.id,
            supplier_id: r.supplier_id,
            kind: r.kind,
            scheduled_date: r.scheduled_date,
            status: r.status.to_string(),
            findings: r.findings,
            created_by: r.created_by,
            created_at: r.created_at,
        }
    }
}

/// Lifecycle audit entry as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditEntryDto {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub action: String,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
}

impl From<LifecycleAuditEntry> for AuditEntryDto {
    fn from(e: LifecycleAuditEntry) -> Self {
        Self {
            id: e.id,
            supplier_id: e.supplier_id,
            action: e.action,
            field: e.field,
            old_value: e.old_value,
            new_value: e.new_value,
            user_id: e.user_id,
            recorded_at: e.recorded_at,
        }
    }
}

/// Pagination parameters for list endpoints.
#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct PaginationParams {
    /// Maximum number of items to return (default: 100, max: 1000).
    pub limit: Option<usize>,
    /// Number of items to skip (default: 0).
    pub offset: Option<usize>,
}

impl PaginationParams {
    const DEFAULT_LIMIT: usize = 100;
    const MAX_LIMIT: usize = 1000;

    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Self::MAX_LIMIT)
    }

    pub fn effective_offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}
