// SPDX-License-Identifier: BUSL-1.1
//! Postgres-backed supplier directory.
//!
//! Tier and risk are stored as text and parsed into the closed enums when
//! rows are loaded. A row with a tier outside the closed set is rejected
//! with `InvalidTier` on point lookup and logged and skipped when listing,
//! so one corrupt row cannot poison a reconciliation pass.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sqe_core::{CriticalityTier, QualError, Result, RiskClassification, Supplier};
use sqe_engine::{LifecycleDatePatch, SupplierDirectory};

use super::storage_err;

/// Supplier directory over a Postgres pool.
pub struct PgSupplierDirectory {
    pool: PgPool,
}

impl PgSupplierDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    tier: String,
    risk: String,
    qualification_date: Option<NaiveDate>,
    requalification_date: Option<NaiveDate>,
    last_audit_date: Option<NaiveDate>,
    next_audit_date: Option<NaiveDate>,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SupplierRow {
    fn into_supplier(self) -> Result<Supplier> {
        let tier: CriticalityTier = self.tier.parse()?;
        let risk = parse_risk(&self.risk)?;
        Ok(Supplier {
            id: self.id,
            name: self.name,
            tier,
            risk,
            qualification_date: self.qualification_date,
            requalification_date: self.requalification_date,
            last_audit_date: self.last_audit_date,
            next_audit_date: self.next_audit_date,
            archived: self.archived,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_risk(s: &str) -> Result<RiskClassification> {
    match s {
        "high" => Ok(RiskClassification::High),
        "medium" => Ok(RiskClassification::Medium),
        "low" => Ok(RiskClassification::Low),
        other => Err(QualError::Storage(format!(
            "unrecognized risk classification in row: {other:?}"
        ))),
    }
}

const SELECT_COLUMNS: &str = "id, name, tier, risk, qualification_date, requalification_date,
     last_audit_date, next_audit_date, archived, created_at, updated_at";

#[async_trait]
impl SupplierDirectory for PgSupplierDirectory {
    async fn register(&self, supplier: Supplier) -> Result<Supplier> {
        sqlx::query(
            "INSERT INTO suppliers (id, name, tier, risk, qualification_date,
             requalification_date, last_audit_date, next_audit_date, archived,
             created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(supplier.id)
        .bind(&supplier.name)
        .bind(supplier.tier.as_str())
        .bind(supplier.risk.as_str())
        .bind(supplier.qualification_date)
        .bind(supplier.requalification_date)
        .bind(supplier.last_audit_date)
        .bind(supplier.next_audit_date)
        .bind(supplier.archived)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(supplier)
    }

    async fn get(&self, id: Uuid) -> Result<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM suppliers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?
        .ok_or(QualError::SupplierNotFound(id))?;
        row.into_supplier()
    }

    async fn active(&self) -> Result<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM suppliers
             WHERE archived = false ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id;
            match row.into_supplier() {
                Ok(supplier) => out.push(supplier),
                Err(err) => {
                    tracing::warn!(supplier_id = %id, error = %err, "skipping unparseable supplier row");
                }
            }
        }
        Ok(out)
    }

    async fn count_active(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE archived = false")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(count as usize)
    }

    async fn update_lifecycle_dates(&self, id: Uuid, patch: LifecycleDatePatch) -> Result<Supplier> {
        // COALESCE keeps unpatched fields: the engine only ever sets dates,
        // never clears them.
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "UPDATE suppliers SET
                 qualification_date = COALESCE($2, qualification_date),
                 requalification_date = COALESCE($3, requalification_date),
                 last_audit_date = COALESCE($4, last_audit_date),
                 next_audit_date = COALESCE($5, next_audit_date),
                 updated_at = $6
             WHERE id = $1
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.qualification_date)
        .bind(patch.requalification_date)
        .bind(patch.last_audit_date)
        .bind(patch.next_audit_date)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?
        .ok_or(QualError::SupplierNotFound(id))?;
        row.into_supplier()
    }
}
