// SPDX-License-Identifier: BUSL-1.1
//! Persistence contracts for the qualification engine.
//!
//! The engine never talks to a database directly — it goes through these
//! traits. `sqe-api` provides Postgres implementations; [`crate::memory`]
//! provides `DashMap`-backed ones for no-database mode and tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use sqe_core::{AssessmentRecord, LifecycleAuditEntry, Result, Supplier};

/// Partial update of a supplier's lifecycle date fields.
///
/// `None` leaves a field unchanged; the engine only ever proposes updates
/// to these four fields, never to identity or classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleDatePatch {
    pub qualification_date: Option<NaiveDate>,
    pub requalification_date: Option<NaiveDate>,
    pub last_audit_date: Option<NaiveDate>,
    pub next_audit_date: Option<NaiveDate>,
}

/// Read/write access to the supplier directory.
#[async_trait]
pub trait SupplierDirectory: Send + Sync {
    /// Register a new supplier (external qualification workflow surface).
    async fn register(&self, supplier: Supplier) -> Result<Supplier>;

    /// Fetch one supplier. Fails with `SupplierNotFound` when absent.
    async fn get(&self, id: Uuid) -> Result<Supplier>;

    /// All non-archived suppliers.
    async fn active(&self) -> Result<Vec<Supplier>>;

    /// Number of non-archived suppliers.
    async fn count_active(&self) -> Result<usize>;

    /// Apply a lifecycle date patch and return the updated supplier.
    async fn update_lifecycle_dates(&self, id: Uuid, patch: LifecycleDatePatch)
        -> Result<Supplier>;
}

/// Append-mostly store of assessment work items.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// The supplier's most recent assessment by scheduled date, if any.
    async fn latest_for_supplier(&self, supplier_id: Uuid) -> Result<Option<AssessmentRecord>>;

    /// Insert a new assessment.
    ///
    /// Implementations must enforce uniqueness on (supplier, scheduled
    /// date) and report a duplicate as `SchedulingConflict` so a racing
    /// second trigger degrades to a no-op instead of a double booking.
    async fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord>;

    /// All assessments, ordered by scheduled date.
    async fn list(&self) -> Result<Vec<AssessmentRecord>>;

    /// Scheduled-status assessments due within `days` of `today`.
    async fn due_within(&self, days: u64, today: NaiveDate) -> Result<Vec<AssessmentRecord>>;
}

/// Append-only lifecycle audit trail. No update or delete exists.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    async fn append(&self, entry: LifecycleAuditEntry) -> Result<LifecycleAuditEntry>;

    /// Entries for one supplier, oldest first.
    async fn for_supplier(&self, supplier_id: Uuid) -> Result<Vec<LifecycleAuditEntry>>;
}
