// SPDX-License-Identifier: BUSL-1.1
//! Per-supplier assessment scheduling.
//!
//! The scheduling decision is read-then-write: read the latest assessment,
//! decide whether one is due, insert. Two triggers can target the same
//! supplier concurrently (manual API trigger vs the recurring pass), so
//! decide-and-insert runs under a per-supplier `tokio::Mutex`; the store's
//! (supplier, scheduled date) uniqueness guard backstops any backend that
//! is shared across processes. The lock is held only across the decision,
//! never across the driver's sleep interval.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use sqe_core::{
    AssessmentRecord, AssessmentStatus, AuditEventKind, CriticalityTier, Result,
    RiskClassification, Supplier,
};

use crate::audit::AuditTrailEmitter;
use crate::store::{AssessmentStore, SupplierDirectory};

/// Default cadence between risk assessments, in days.
const DEFAULT_INTERVAL_DAYS: u64 = 365;

/// Tightened cadence for Major-tier suppliers currently classified High.
const HIGH_RISK_MAJOR_INTERVAL_DAYS: u64 = 90;

/// Grace period granted when scheduling a new assessment.
const SCHEDULING_GRACE_DAYS: u64 = 30;

/// Identity recorded on engine-created assessments and audit entries.
pub const SYSTEM_USER: &str = "system-scheduler";

/// Decides, for one supplier, whether a new risk assessment is due and
/// creates it.
pub struct AssessmentScheduler {
    directory: Arc<dyn SupplierDirectory>,
    assessments: Arc<dyn AssessmentStore>,
    emitter: AuditTrailEmitter,
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl AssessmentScheduler {
    pub fn new(
        directory: Arc<dyn SupplierDirectory>,
        assessments: Arc<dyn AssessmentStore>,
        emitter: AuditTrailEmitter,
    ) -> Self {
        Self {
            directory,
            assessments,
            emitter,
            locks: DashMap::new(),
        }
    }

    /// Schedule a new assessment for the supplier if one is due.
    ///
    /// Returns `Ok(true)` when a record was created, `Ok(false)` when
    /// nothing is due (or a concurrent trigger already created it).
    /// `SupplierNotFound` and storage failures propagate; batch-level
    /// isolation is the reconciler's responsibility.
    pub async fn schedule_if_due(&self, supplier_id: Uuid, today: NaiveDate) -> Result<bool> {
        let lock = self
            .locks
            .entry(supplier_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let supplier = self.directory.get(supplier_id).await?;
        if supplier.archived {
            tracing::debug!(%supplier_id, "supplier archived — not scheduling");
            return Ok(false);
        }

        let latest = self.assessments.latest_for_supplier(supplier_id).await?;
        let interval_days = effective_interval_days(supplier.tier, supplier.risk);

        let due = match &latest {
            None => true,
            Some(prior) => {
                let threshold = prior
                    .scheduled_date
                    .checked_add_days(Days::new(interval_days))
                    .unwrap_or(NaiveDate::MAX);
                threshold <= today
            }
        };
        if !due {
            return Ok(false);
        }

        let scheduled_date = today
            .checked_add_days(Days::new(SCHEDULING_GRACE_DAYS))
            .unwrap_or(NaiveDate::MAX);
        let record = new_assessment(&supplier, scheduled_date, interval_days, latest.is_none());

        match self.assessments.insert(record).await {
            Ok(created) => {
                self.emitter
                    .record(
                        supplier_id,
                        AuditEventKind::Requalification,
                        Some(created.scheduled_date.to_string()),
                        latest.map(|prior| prior.scheduled_date.to_string()),
                        SYSTEM_USER,
                        Utc::now(),
                    )
                    .await?;
                tracing::info!(
                    %supplier_id,
                    tier = %supplier.tier,
                    risk = %supplier.risk,
                    scheduled_date = %created.scheduled_date,
                    "scheduled risk assessment"
                );
                Ok(true)
            }
            Err(err) if err.is_conflict() => {
                // A concurrent trigger won the insert. Already scheduled.
                tracing::debug!(%supplier_id, "assessment already scheduled by concurrent trigger");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

/// Effective scheduling interval for a supplier's tier/risk combination.
///
/// Critical suppliers are always on the annual cadence; Major suppliers
/// currently classified High are tightened to 90 days; everything else
/// falls back to the annual default.
fn effective_interval_days(tier: CriticalityTier, risk: RiskClassification) -> u64 {
    match (tier, risk) {
        (CriticalityTier::Critical, _) => DEFAULT_INTERVAL_DAYS,
        (CriticalityTier::Major, RiskClassification::High) => HIGH_RISK_MAJOR_INTERVAL_DAYS,
        _ => DEFAULT_INTERVAL_DAYS,
    }
}

fn new_assessment(
    supplier: &Supplier,
    scheduled_date: NaiveDate,
    interval_days: u64,
    initial: bool,
) -> AssessmentRecord {
    let basis = if initial {
        format!(
            "no prior assessment on record; initial {}-day grace period applied",
            SCHEDULING_GRACE_DAYS
        )
    } else {
        format!("prior assessment exceeded the {interval_days}-day cadence")
    };
    let findings = format!(
        "Automatically scheduled: {} tier supplier with {} current risk — {}",
        supplier.tier, supplier.risk, basis
    );
    let now = Utc::now();
    AssessmentRecord {
        id: Uuid::new_v4(),
        supplier_id: supplier.id,
        kind: "Risk Assessment".to_string(),
        scheduled_date,
        status: AssessmentStatus::Scheduled,
        findings,
        created_by: SYSTEM_USER.to_string(),
        updated_by: SYSTEM_USER.to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryAssessmentStore, InMemoryAuditTrail, InMemorySupplierDirectory};
    use crate::store::AuditTrail;
    use chrono::TimeZone;
    use sqe_core::QualError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn supplier(tier: CriticalityTier, risk: RiskClassification) -> Supplier {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Supplier {
            id: Uuid::new_v4(),
            name: "Orion Castings".to_string(),
            tier,
            risk,
            qualification_date: Some(date(2024, 1, 15)),
            requalification_date: None,
            last_audit_date: None,
            next_audit_date: None,
            archived: false,
            created_at: created,
            updated_at: created,
        }
    }

    struct Fixture {
        directory: Arc<InMemorySupplierDirectory>,
        assessments: Arc<InMemoryAssessmentStore>,
        trail: Arc<InMemoryAuditTrail>,
        scheduler: AssessmentScheduler,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(InMemorySupplierDirectory::new());
        let assessments = Arc::new(InMemoryAssessmentStore::new());
        let trail = Arc::new(InMemoryAuditTrail::new());
        let scheduler = AssessmentScheduler::new(
            directory.clone(),
            assessments.clone(),
            AuditTrailEmitter::new(trail.clone()),
        );
        Fixture {
            directory,
            assessments,
            trail,
            scheduler,
        }
    }

    fn prior(supplier_id: Uuid, scheduled: NaiveDate) -> AssessmentRecord {
        let now = Utc::now();
        AssessmentRecord {
            id: Uuid::new_v4(),
            supplier_id,
            kind: "Risk Assessment".to_string(),
            scheduled_date: scheduled,
            status: AssessmentStatus::Completed,
            findings: "completed on time".to_string(),
            created_by: "qa-lead".to_string(),
            updated_by: "qa-lead".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn unknown_supplier_is_not_found() {
        let f = fixture();
        let err = f
            .scheduler
            .schedule_if_due(Uuid::new_v4(), date(2025, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, QualError::SupplierNotFound(_)));
    }

    #[tokio::test]
    async fn first_assessment_lands_thirty_days_out() {
        let f = fixture();
        let s = f
            .directory
            .insert(supplier(CriticalityTier::Critical, RiskClassification::High));

        let created = f
            .scheduler
            .schedule_if_due(s.id, date(2025, 1, 1))
            .await
            .unwrap();
        assert!(created);

        let records = f.assessments.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].scheduled_date, date(2025, 1, 31));
        assert_eq!(records[0].kind, "Risk Assessment");
        assert_eq!(records[0].status, AssessmentStatus::Scheduled);
        assert_eq!(records[0].created_by, SYSTEM_USER);
        assert!(records[0].findings.contains("critical tier"));

        let trail = f.trail.for_supplier(s.id).await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, "requalification_scheduled");
        assert_eq!(trail[0].new_value, "2025-01-31");
        assert_eq!(trail[0].user_id, SYSTEM_USER);
    }

    #[tokio::test]
    async fn not_due_is_a_no_op() {
        let f = fixture();
        let s = f
            .directory
            .insert(supplier(CriticalityTier::Critical, RiskClassification::High));
        // Prior assessment 100 days ago on a 365-day cadence: not due.
        f.assessments
            .insert(prior(s.id, date(2024, 9, 23)))
            .await
            .unwrap();

        let created = f
            .scheduler
            .schedule_if_due(s.id, date(2025, 1, 1))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(f.assessments.list().await.unwrap().len(), 1);
        assert!(f.trail.for_supplier(s.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn major_high_risk_is_due_at_exactly_ninety_days() {
        let f = fixture();
        let s = f
            .directory
            .insert(supplier(CriticalityTier::Major, RiskClassification::High));
        // now = prior + 90 exactly: threshold <= today, so due.
        f.assessments
            .insert(prior(s.id, date(2025, 1, 1)))
            .await
            .unwrap();

        let created = f
            .scheduler
            .schedule_if_due(s.id, date(2025, 4, 1))
            .await
            .unwrap();
        assert!(created);

        // One day earlier it is not due.
        let f2 = fixture();
        let s2 = f2
            .directory
            .insert(supplier(CriticalityTier::Major, RiskClassification::High));
        f2.assessments
            .insert(prior(s2.id, date(2025, 1, 1)))
            .await
            .unwrap();
        let created = f2
            .scheduler
            .schedule_if_due(s2.id, date(2025, 3, 31))
            .await
            .unwrap();
        assert!(!created);
    }

    #[tokio::test]
    async fn major_medium_risk_stays_on_annual_cadence() {
        let f = fixture();
        let s = f
            .directory
            .insert(supplier(CriticalityTier::Major, RiskClassification::Medium));
        f.assessments
            .insert(prior(s.id, date(2025, 1, 1)))
            .await
            .unwrap();

        // 90 days later: not due on the 365-day default.
        let created = f
            .scheduler
            .schedule_if_due(s.id, date(2025, 4, 1))
            .await
            .unwrap();
        assert!(!created);

        // A year later: due.
        let created = f
            .scheduler
            .schedule_if_due(s.id, date(2026, 1, 1))
            .await
            .unwrap();
        assert!(created);
    }

    #[tokio::test]
    async fn archived_supplier_is_never_scheduled() {
        let f = fixture();
        let mut s = supplier(CriticalityTier::Critical, RiskClassification::High);
        s.archived = true;
        let s = f.directory.insert(s);

        let created = f
            .scheduler
            .schedule_if_due(s.id, date(2025, 1, 1))
            .await
            .unwrap();
        assert!(!created);
        assert!(f.assessments.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_triggers_create_exactly_one_record() {
        let f = fixture();
        let s = f
            .directory
            .insert(supplier(CriticalityTier::Critical, RiskClassification::High));
        let scheduler = Arc::new(f.scheduler);
        let today = date(2025, 1, 1);

        let a = {
            let scheduler = scheduler.clone();
            let id = s.id;
            tokio::spawn(async move { scheduler.schedule_if_due(id, today).await })
        };
        let b = {
            let scheduler = scheduler.clone();
            let id = s.id;
            tokio::spawn(async move { scheduler.schedule_if_due(id, today).await })
        };

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        // Exactly one trigger wins; the other observes the fresh record.
        assert!(a ^ b);
        assert_eq!(f.assessments.list().await.unwrap().len(), 1);
    }
}
