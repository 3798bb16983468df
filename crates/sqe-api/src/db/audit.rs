// SPDX-License-Identifier: BUSL-1.1
//! Postgres-backed lifecycle audit trail.
//!
//! Entries are immutable once created — there are no update or delete
//! operations anywhere in this module or the schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sqe_core::{LifecycleAuditEntry, Result};
use sqe_engine::AuditTrail;

use super::storage_err;

/// Audit trail over a Postgres pool.
pub struct PgAuditTrail {
    pool: PgPool,
}

impl PgAuditTrail {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    supplier_id: Uuid,
    action: String,
    field: String,
    old_value: Option<String>,
    new_value: String,
    user_id: String,
    recorded_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_entry(self) -> LifecycleAuditEntry {
        LifecycleAuditEntry {
            id: self.id,
            supplier_id: self.supplier_id,
            action: self.action,
            field: self.field,
            old_value: self.old_value,
            new_value: self.new_value,
            user_id: self.user_id,
            recorded_at: self.recorded_at,
        }
    }
}

#[async_trait]
impl AuditTrail for PgAuditTrail {
    async fn append(&self, entry: LifecycleAuditEntry) -> Result<LifecycleAuditEntry> {
        sqlx::query(
            "INSERT INTO lifecycle_audit (id, supplier_id, action, field,
             old_value, new_value, user_id, recorded_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(entry.id)
        .bind(entry.supplier_id)
        .bind(&entry.action)
        .bind(&entry.field)
        .bind(&entry.old_value)
        .bind(&entry.new_value)
        .bind(&entry.user_id)
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(entry)
    }

    async fn for_supplier(&self, supplier_id: Uuid) -> Result<Vec<LifecycleAuditEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(
            "SELECT id, supplier_id, action, field, old_value, new_value,
             user_id, recorded_at
             FROM lifecycle_audit WHERE supplier_id = $1
             ORDER BY recorded_at",
        )
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(rows.into_iter().map(AuditRow::into_entry).collect())
    }
}
