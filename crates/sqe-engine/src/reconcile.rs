// SPDX-License-Identifier: BUSL-1.1
//! Batch reconciliation: one sweep over all active suppliers.
//!
//! Fan-out with isolated failure — each supplier's scheduling decision is
//! independent, a single failure is caught, counted, and never aborts the
//! siblings. Each per-supplier operation is bounded by a timeout so one
//! hung store call cannot stall the whole pass.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sqe_core::{compliance_snapshot, AssessmentRecord, ComplianceStatus, Result};

use crate::scheduler::AssessmentScheduler;
use crate::store::{AssessmentStore, SupplierDirectory};

/// Upper bound on one supplier's schedule decision within a batch.
const PER_SUPPLIER_TIMEOUT: Duration = Duration::from_secs(30);

/// Aggregate outcome of one reconciliation pass.
///
/// Order-independent: counts and messages do not depend on supplier
/// iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Suppliers for which a new assessment was created.
    pub scheduled: usize,
    /// Suppliers whose scheduling attempt failed or timed out.
    pub errors: usize,
    /// One descriptive message per failed supplier.
    pub messages: Vec<String>,
}

/// Read-only scheduler status: supplier counts grouped by tier and risk,
/// plus the assessments due in the near term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub active_suppliers: usize,
    pub suppliers_by_tier: HashMap<String, usize>,
    pub suppliers_by_risk: HashMap<String, usize>,
    pub non_compliant_suppliers: usize,
    pub assessments_due_soon: Vec<AssessmentRecord>,
}

/// Iterates all active suppliers and applies the scheduling decision to
/// each, isolating per-supplier failures.
pub struct BatchReconciler {
    directory: Arc<dyn SupplierDirectory>,
    assessments: Arc<dyn AssessmentStore>,
    scheduler: Arc<AssessmentScheduler>,
}

impl BatchReconciler {
    pub fn new(
        directory: Arc<dyn SupplierDirectory>,
        assessments: Arc<dyn AssessmentStore>,
        scheduler: Arc<AssessmentScheduler>,
    ) -> Self {
        Self {
            directory,
            assessments,
            scheduler,
        }
    }

    /// Run one reconciliation pass over every active supplier.
    ///
    /// Only a failure to list the directory itself escapes this call;
    /// every per-supplier failure is converted into a counted error.
    /// Each supplier is evaluated at most once per pass.
    pub async fn reconcile_all(&self, today: NaiveDate) -> Result<ReconcileOutcome> {
        let suppliers = self.directory.active().await?;
        tracing::info!(count = suppliers.len(), "reconciliation pass starting");

        let mut outcome = ReconcileOutcome::default();
        for supplier in &suppliers {
            // Incomplete records are logged and skipped, not counted as
            // errors (unparseable tiers never get past the store boundary).
            if supplier.name.trim().is_empty() {
                tracing::warn!(supplier_id = %supplier.id, "supplier record incomplete — skipping");
                continue;
            }

            match tokio::time::timeout(
                PER_SUPPLIER_TIMEOUT,
                self.scheduler.schedule_if_due(supplier.id, today),
            )
            .await
            {
                Ok(Ok(true)) => outcome.scheduled += 1,
                Ok(Ok(false)) => {}
                Ok(Err(err)) => {
                    tracing::warn!(
                        supplier_id = %supplier.id,
                        error = %err,
                        "scheduling failed — continuing with remaining suppliers"
                    );
                    outcome.errors += 1;
                    outcome
                        .messages
                        .push(format!("supplier {} ({}): {err}", supplier.id, supplier.name));
                }
                Err(_) => {
                    tracing::warn!(
                        supplier_id = %supplier.id,
                        timeout_secs = PER_SUPPLIER_TIMEOUT.as_secs(),
                        "scheduling timed out — continuing with remaining suppliers"
                    );
                    outcome.errors += 1;
                    outcome.messages.push(format!(
                        "supplier {} ({}): timed out after {}s",
                        supplier.id,
                        supplier.name,
                        PER_SUPPLIER_TIMEOUT.as_secs()
                    ));
                }
            }
        }

        tracing::info!(
            scheduled = outcome.scheduled,
            errors = outcome.errors,
            "reconciliation pass complete"
        );
        Ok(outcome)
    }

    /// Read-only status view. Mutates nothing.
    pub async fn status_summary(&self, today: NaiveDate) -> Result<SchedulerStatus> {
        let suppliers = self.directory.active().await?;

        let mut by_tier: HashMap<String, usize> = HashMap::new();
        let mut by_risk: HashMap<String, usize> = HashMap::new();
        let mut non_compliant = 0;
        for supplier in &suppliers {
            *by_tier.entry(supplier.tier.to_string()).or_default() += 1;
            *by_risk.entry(supplier.risk.to_string()).or_default() += 1;
            let snapshot = compliance_snapshot(supplier, today);
            if snapshot.status == ComplianceStatus::NonCompliant {
                non_compliant += 1;
            }
        }

        let due_soon = self
            .assessments
            .due_within(sqe_core::DUE_SOON_BUFFER_DAYS, today)
            .await?;

        Ok(SchedulerStatus {
            active_suppliers: suppliers.len(),
            suppliers_by_tier: by_tier,
            suppliers_by_risk: by_risk,
            non_compliant_suppliers: non_compliant,
            assessments_due_soon: due_soon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditTrailEmitter;
    use crate::memory::{InMemoryAssessmentStore, InMemoryAuditTrail, InMemorySupplierDirectory};
    use crate::store::LifecycleDatePatch;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use sqe_core::{CriticalityTier, QualError, RiskClassification, Supplier};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn supplier(name: &str, tier: CriticalityTier) -> Supplier {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Supplier {
            id: Uuid::new_v4(),
            name: name.to_string(),
            tier,
            risk: RiskClassification::Medium,
            qualification_date: Some(date(2024, 1, 15)),
            requalification_date: None,
            last_audit_date: None,
            next_audit_date: None,
            archived: false,
            created_at: created,
            updated_at: created,
        }
    }

    /// Directory wrapper that fails point lookups for one supplier,
    /// simulating a transient storage fault mid-batch.
    struct FlakyDirectory {
        inner: Arc<InMemorySupplierDirectory>,
        fail_id: Uuid,
    }

    #[async_trait]
    impl SupplierDirectory for FlakyDirectory {
        async fn register(&self, supplier: Supplier) -> sqe_core::Result<Supplier> {
            self.inner.register(supplier).await
        }

        async fn get(&self, id: Uuid) -> sqe_core::Result<Supplier> {
            if id == self.fail_id {
                return Err(QualError::Storage("connection reset".to_string()));
            }
            self.inner.get(id).await
        }

        async fn active(&self) -> sqe_core::Result<Vec<Supplier>> {
            self.inner.active().await
        }

        async fn count_active(&self) -> sqe_core::Result<usize> {
            self.inner.count_active().await
        }

        async fn update_lifecycle_dates(
            &self,
            id: Uuid,
            patch: LifecycleDatePatch,
        ) -> sqe_core::Result<Supplier> {
            self.inner.update_lifecycle_dates(id, patch).await
        }
    }

    fn reconciler_over(directory: Arc<dyn SupplierDirectory>) -> BatchReconciler {
        let assessments = Arc::new(InMemoryAssessmentStore::new());
        let trail = Arc::new(InMemoryAuditTrail::new());
        let scheduler = Arc::new(AssessmentScheduler::new(
            directory.clone(),
            assessments.clone(),
            AuditTrailEmitter::new(trail),
        ));
        BatchReconciler::new(directory, assessments, scheduler)
    }

    #[tokio::test]
    async fn one_failing_supplier_does_not_abort_the_batch() {
        let inner = Arc::new(InMemorySupplierDirectory::new());
        let a = inner.insert(supplier("Alpha Metals", CriticalityTier::Critical));
        let b = inner.insert(supplier("Beta Labs", CriticalityTier::Major));
        let c = inner.insert(supplier("Gamma Films", CriticalityTier::Minor));
        let _ = (a, c);

        let directory = Arc::new(FlakyDirectory {
            inner,
            fail_id: b.id,
        });
        let reconciler = reconciler_over(directory);

        let outcome = reconciler.reconcile_all(date(2025, 1, 1)).await.unwrap();
        // Suppliers with no prior assessment are all due; the failing one
        // is counted, the other two are scheduled.
        assert_eq!(outcome.scheduled, 2);
        assert_eq!(outcome.errors, 1);
        assert_eq!(outcome.messages.len(), 1);
        assert!(outcome.messages[0].contains("Beta Labs"));
        assert!(outcome.messages[0].contains("storage failure"));
    }

    #[tokio::test]
    async fn incomplete_records_are_skipped_without_error() {
        let inner = Arc::new(InMemorySupplierDirectory::new());
        inner.insert(supplier("", CriticalityTier::Critical));
        inner.insert(supplier("Delta Optics", CriticalityTier::Critical));

        let reconciler = reconciler_over(inner);
        let outcome = reconciler.reconcile_all(date(2025, 1, 1)).await.unwrap();
        assert_eq!(outcome.scheduled, 1);
        assert_eq!(outcome.errors, 0);
    }

    #[tokio::test]
    async fn second_pass_on_the_same_day_schedules_nothing() {
        let inner = Arc::new(InMemorySupplierDirectory::new());
        inner.insert(supplier("Epsilon Coatings", CriticalityTier::Major));

        let reconciler = reconciler_over(inner);
        let today = date(2025, 1, 1);
        let first = reconciler.reconcile_all(today).await.unwrap();
        assert_eq!(first.scheduled, 1);
        let second = reconciler.reconcile_all(today).await.unwrap();
        assert_eq!(second.scheduled, 0);
        assert_eq!(second.errors, 0);
    }

    #[tokio::test]
    async fn status_summary_groups_and_counts() {
        let inner = Arc::new(InMemorySupplierDirectory::new());
        inner.insert(supplier("Zeta Alloys", CriticalityTier::Critical));
        inner.insert(supplier("Eta Resins", CriticalityTier::Critical));
        let mut unqualified = supplier("Theta Glass", CriticalityTier::Minor);
        unqualified.qualification_date = None;
        inner.insert(unqualified);

        let reconciler = reconciler_over(inner);
        let today = date(2025, 1, 1);
        reconciler.reconcile_all(today).await.unwrap();

        let status = reconciler.status_summary(today).await.unwrap();
        assert_eq!(status.active_suppliers, 3);
        assert_eq!(status.suppliers_by_tier.get("critical"), Some(&2));
        assert_eq!(status.suppliers_by_tier.get("minor"), Some(&1));
        assert_eq!(status.non_compliant_suppliers, 1);
        // All three assessments were scheduled 30 days out — inside the
        // due-soon buffer.
        assert_eq!(status.assessments_due_soon.len(), 3);
    }
}
