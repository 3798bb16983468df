// SPDX-License-Identifier: BUSL-1.1
//! Postgres-backed assessment store.
//!
//! The UNIQUE (supplier_id, scheduled_date) index is the storage-level
//! backstop against racing triggers; a violation maps to
//! `SchedulingConflict` and the caller treats it as already-scheduled.

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sqe_core::{AssessmentRecord, AssessmentStatus, QualError, Result};
use sqe_engine::AssessmentStore;

use super::storage_err;

/// Assessment store over a Postgres pool.
pub struct PgAssessmentStore {
    pool: PgPool,
}

impl PgAssessmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AssessmentRow {
    id: Uuid,
    supplier_id: Uuid,
    kind: String,
    scheduled_date: NaiveDate,
    status: String,
    findings: String,
    created_by: String,
    updated_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssessmentRow {
    fn into_record(self) -> Result<AssessmentRecord> {
        let status = match self.status.as_str() {
            "scheduled" => AssessmentStatus::Scheduled,
            "in_progress" => AssessmentStatus::InProgress,
            "completed" => AssessmentStatus::Completed,
            "cancelled" => AssessmentStatus::Cancelled,
            other => {
                return Err(QualError::Storage(format!(
                    "unrecognized assessment status in row: {other:?}"
                )))
            }
        };
        Ok(AssessmentRecord {
            id: self.id,
            supplier_id: self.supplier_id,
            kind: self.kind,
            scheduled_date: self.scheduled_date,
            status,
            findings: self.findings,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, supplier_id, kind, scheduled_date, status, findings,
     created_by, updated_by, created_at, updated_at";

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn latest_for_supplier(&self, supplier_id: Uuid) -> Result<Option<AssessmentRecord>> {
        let row = sqlx::query_as::<_, AssessmentRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM assessments
             WHERE supplier_id = $1
             ORDER BY scheduled_date DESC LIMIT 1"
        ))
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        row.map(AssessmentRow::into_record).transpose()
    }

    async fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord> {
        let result = sqlx::query(
            "INSERT INTO assessments (id, supplier_id, kind, scheduled_date,
             status, findings, created_by, updated_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(record.id)
        .bind(record.supplier_id)
        .bind(&record.kind)
        .bind(record.scheduled_date)
        .bind(record.status.to_string())
        .bind(&record.findings)
        .bind(&record.created_by)
        .bind(&record.updated_by)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(record),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(QualError::SchedulingConflict {
                    supplier_id: record.supplier_id,
                    scheduled_date: record.scheduled_date,
                })
            }
            Err(err) => Err(storage_err(err)),
        }
    }

    async fn list(&self) -> Result<Vec<AssessmentRecord>> {
        let rows = sqlx::query_as::<_, AssessmentRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM assessments ORDER BY scheduled_date"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        rows.into_iter().map(AssessmentRow::into_record).collect()
    }

    async fn due_within(&self, days: u64, today: NaiveDate) -> Result<Vec<AssessmentRecord>> {
        let horizon = today
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        let rows = sqlx::query_as::<_, AssessmentRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM assessments
             WHERE status = 'scheduled' AND scheduled_date <= $1
             ORDER BY scheduled_date"
        ))
        .bind(horizon)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        rows.into_iter().map(AssessmentRow::into_record).collect()
    }
}
