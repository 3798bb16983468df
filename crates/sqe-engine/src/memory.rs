// SPDX-License-Identifier: BUSL-1.1
//! In-memory store implementations backed by `DashMap`.
//!
//! Used when no `DATABASE_URL` is configured and throughout the engine
//! tests. The assessment store enforces the same (supplier, scheduled
//! date) uniqueness as the Postgres unique index, so both backends report
//! a racing duplicate identically.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use sqe_core::{
    AssessmentRecord, AssessmentStatus, LifecycleAuditEntry, QualError, Result, Supplier,
};

use crate::store::{AssessmentStore, AuditTrail, LifecycleDatePatch, SupplierDirectory};

// ---------------------------------------------------------------------------
// Supplier directory
// ---------------------------------------------------------------------------

/// In-memory supplier directory.
#[derive(Default)]
pub struct InMemorySupplierDirectory {
    suppliers: DashMap<Uuid, Supplier>,
}

impl InMemorySupplierDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a supplier (external workflow surface).
    pub fn insert(&self, supplier: Supplier) -> Supplier {
        self.suppliers.insert(supplier.id, supplier.clone());
        supplier
    }
}

#[async_trait]
impl SupplierDirectory for InMemorySupplierDirectory {
    async fn register(&self, supplier: Supplier) -> Result<Supplier> {
        Ok(self.insert(supplier))
    }

    async fn get(&self, id: Uuid) -> Result<Supplier> {
        self.suppliers
            .get(&id)
            .map(|s| s.clone())
            .ok_or(QualError::SupplierNotFound(id))
    }

    async fn active(&self) -> Result<Vec<Supplier>> {
        let mut out: Vec<Supplier> = self
            .suppliers
            .iter()
            .filter(|s| !s.archived)
            .map(|s| s.clone())
            .collect();
        out.sort_by_key(|s| s.created_at);
        Ok(out)
    }

    async fn count_active(&self) -> Result<usize> {
        Ok(self.suppliers.iter().filter(|s| !s.archived).count())
    }

    async fn update_lifecycle_dates(
        &self,
        id: Uuid,
        patch: LifecycleDatePatch,
    ) -> Result<Supplier> {
        let mut entry = self
            .suppliers
            .get_mut(&id)
            .ok_or(QualError::SupplierNotFound(id))?;
        let supplier = entry.value_mut();
        if let Some(d) = patch.qualification_date {
            supplier.qualification_date = Some(d);
        }
        if let Some(d) = patch.requalification_date {
            supplier.requalification_date = Some(d);
        }
        if let Some(d) = patch.last_audit_date {
            supplier.last_audit_date = Some(d);
        }
        if let Some(d) = patch.next_audit_date {
            supplier.next_audit_date = Some(d);
        }
        supplier.updated_at = Utc::now();
        Ok(supplier.clone())
    }
}

// ---------------------------------------------------------------------------
// Assessment store
// ---------------------------------------------------------------------------

/// In-memory assessment store with a (supplier, scheduled date) uniqueness
/// index mirroring the Postgres constraint.
#[derive(Default)]
pub struct InMemoryAssessmentStore {
    records: DashMap<Uuid, AssessmentRecord>,
    schedule_index: DashMap<(Uuid, NaiveDate), Uuid>,
}

impl InMemoryAssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssessmentStore for InMemoryAssessmentStore {
    async fn latest_for_supplier(&self, supplier_id: Uuid) -> Result<Option<AssessmentRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.supplier_id == supplier_id)
            .max_by_key(|r| r.scheduled_date)
            .map(|r| r.clone()))
    }

    async fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord> {
        let key = (record.supplier_id, record.scheduled_date);
        match self.schedule_index.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(QualError::SchedulingConflict {
                supplier_id: record.supplier_id,
                scheduled_date: record.scheduled_date,
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(record.id);
                self.records.insert(record.id, record.clone());
                Ok(record)
            }
        }
    }

    async fn list(&self) -> Result<Vec<AssessmentRecord>> {
        let mut out: Vec<AssessmentRecord> = self.records.iter().map(|r| r.clone()).collect();
        out.sort_by_key(|r| r.scheduled_date);
        Ok(out)
    }

    async fn due_within(&self, days: u64, today: NaiveDate) -> Result<Vec<AssessmentRecord>> {
        let horizon = today
            .checked_add_days(chrono::Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        let mut out: Vec<AssessmentRecord> = self
            .records
            .iter()
            .filter(|r| r.status == AssessmentStatus::Scheduled && r.scheduled_date <= horizon)
            .map(|r| r.clone())
            .collect();
        out.sort_by_key(|r| r.scheduled_date);
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

/// In-memory append-only audit trail.
#[derive(Default)]
pub struct InMemoryAuditTrail {
    entries: DashMap<Uuid, LifecycleAuditEntry>,
}

impl InMemoryAuditTrail {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditTrail for InMemoryAuditTrail {
    async fn append(&self, entry: LifecycleAuditEntry) -> Result<LifecycleAuditEntry> {
        self.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn for_supplier(&self, supplier_id: Uuid) -> Result<Vec<LifecycleAuditEntry>> {
        let mut out: Vec<LifecycleAuditEntry> = self
            .entries
            .iter()
            .filter(|e| e.supplier_id == supplier_id)
            .map(|e| e.clone())
            .collect();
        out.sort_by_key(|e| e.recorded_at);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sqe_core::{CriticalityTier, RiskClassification};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(supplier_id: Uuid, scheduled: NaiveDate) -> AssessmentRecord {
        let now = Utc::now();
        AssessmentRecord {
            id: Uuid::new_v4(),
            supplier_id,
            kind: "Risk Assessment".to_string(),
            scheduled_date: scheduled,
            status: AssessmentStatus::Scheduled,
            findings: String::new(),
            created_by: "test".to_string(),
            updated_by: "test".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_schedule_date_is_a_conflict() {
        let store = InMemoryAssessmentStore::new();
        let sid = Uuid::new_v4();
        store.insert(record(sid, date(2025, 3, 1))).await.unwrap();
        let err = store.insert(record(sid, date(2025, 3, 1))).await.unwrap_err();
        assert!(err.is_conflict());
        // A different date for the same supplier is fine.
        store.insert(record(sid, date(2025, 3, 2))).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn latest_picks_max_scheduled_date() {
        let store = InMemoryAssessmentStore::new();
        let sid = Uuid::new_v4();
        store.insert(record(sid, date(2024, 1, 1))).await.unwrap();
        store.insert(record(sid, date(2025, 1, 1))).await.unwrap();
        store.insert(record(Uuid::new_v4(), date(2026, 1, 1))).await.unwrap();
        let latest = store.latest_for_supplier(sid).await.unwrap().unwrap();
        assert_eq!(latest.scheduled_date, date(2025, 1, 1));
    }

    #[tokio::test]
    async fn archived_suppliers_are_not_active() {
        let dir = InMemorySupplierDirectory::new();
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for archived in [false, true] {
            dir.insert(Supplier {
                id: Uuid::new_v4(),
                name: "Vendor".to_string(),
                tier: CriticalityTier::Minor,
                risk: RiskClassification::Low,
                qualification_date: None,
                requalification_date: None,
                last_audit_date: None,
                next_audit_date: None,
                archived,
                created_at: created,
                updated_at: created,
            });
        }
        assert_eq!(dir.active().await.unwrap().len(), 1);
        assert_eq!(dir.count_active().await.unwrap(), 1);
    }
}
