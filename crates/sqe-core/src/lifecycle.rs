// SPDX-License-Identifier: BUSL-1.1
//! Pure lifecycle date calculus and compliance snapshots.
//!
//! All functions here are side-effect free and operate on calendar dates —
//! time of day is never consulted. Month arithmetic uses [`chrono::Months`]
//! with end-of-month clamping (Jan 31 + 1 month = Feb 28/29).
//!
//! The compliance snapshot is a two-way signal: a deadline inside the
//! 30-day buffer and a deadline already past produce the same issue text
//! and both push the status to `NonCompliant`. `Warning` is representable
//! but currently unreachable, pending a three-way severity split.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::policy::tier_policy;
use crate::supplier::{CriticalityTier, Supplier};

/// Lookahead window, in days, used to flag an approaching deadline.
pub const DUE_SOON_BUFFER_DAYS: u64 = 30;

/// Aggregate compliance status of a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    Warning,
    NonCompliant,
}

/// Derived, never-persisted view of a supplier's current standing.
///
/// Recomputed on demand from the supplier's lifecycle fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceSnapshot {
    pub status: ComplianceStatus,
    /// Human-readable descriptions of everything currently wrong.
    pub issues: Vec<String>,
    /// Recommended next actions, one per issue.
    pub actions: Vec<String>,
}

/// Next requalification due date: qualification date plus the tier's
/// requalification interval.
pub fn next_requalification_date(qualification_date: NaiveDate, tier: CriticalityTier) -> NaiveDate {
    let months = tier_policy(tier).requalification_months;
    add_months_clamped(qualification_date, months)
}

/// Next audit due date: last audit date plus the tier's audit interval,
/// or `None` for tiers with no periodic audit obligation (Minor).
pub fn next_audit_date(last_audit_date: NaiveDate, tier: CriticalityTier) -> Option<NaiveDate> {
    tier_policy(tier)
        .audit_months
        .map(|months| add_months_clamped(last_audit_date, months))
}

/// True iff `date` is set and falls on or before `today + buffer_days`.
///
/// A `None` date is never due — a Minor-tier supplier's absent audit date
/// never raises an issue.
pub fn is_due_within(date: Option<NaiveDate>, buffer_days: u64, today: NaiveDate) -> bool {
    match date {
        Some(d) => d <= add_days_clamped(today, buffer_days),
        None => false,
    }
}

/// Compute the on-demand compliance snapshot for a supplier.
///
/// A missing qualification date alone forces `NonCompliant`; otherwise the
/// status is `NonCompliant` exactly when at least one deadline issue was
/// raised, and `Compliant` when the issue list is empty.
pub fn compliance_snapshot(supplier: &Supplier, today: NaiveDate) -> ComplianceSnapshot {
    let mut issues = Vec::new();
    let mut actions = Vec::new();

    if supplier.qualification_date.is_none() {
        issues.push("Supplier is not yet qualified".to_string());
        actions.push("Complete initial qualification".to_string());
    }

    if is_due_within(supplier.requalification_date, DUE_SOON_BUFFER_DAYS, today) {
        // is_due_within returned true, so the date is Some.
        let due = supplier.requalification_date.unwrap_or(today);
        issues.push(format!("Requalification due or overdue ({due})"));
        actions.push(requalification_action(supplier.tier).to_string());
    }

    if is_due_within(supplier.next_audit_date, DUE_SOON_BUFFER_DAYS, today) {
        let due = supplier.next_audit_date.unwrap_or(today);
        issues.push(format!("Audit due or overdue ({due})"));
        actions.push(audit_action(supplier.tier).to_string());
    }

    let status = if issues.is_empty() {
        ComplianceStatus::Compliant
    } else {
        ComplianceStatus::NonCompliant
    };

    ComplianceSnapshot {
        status,
        issues,
        actions,
    }
}

fn requalification_action(tier: CriticalityTier) -> &'static str {
    match tier {
        CriticalityTier::Critical => "Initiate full requalification with on-site assessment",
        CriticalityTier::Major => "Initiate requalification review",
        CriticalityTier::Minor => "Perform documentation-based requalification",
    }
}

fn audit_action(tier: CriticalityTier) -> &'static str {
    match tier {
        CriticalityTier::Critical => "Schedule on-site supplier audit",
        CriticalityTier::Major => "Schedule periodic supplier audit",
        // Minor suppliers never carry a next audit date, but the mapping
        // stays total so a hand-edited record still gets a sane action.
        CriticalityTier::Minor => "Review audit requirement for tier",
    }
}

/// Month addition clamped at the calendar's upper bound. Dates near
/// `NaiveDate::MAX` are not representable in any real supplier record.
fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn add_days_clamped(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supplier::RiskClassification;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn supplier(tier: CriticalityTier) -> Supplier {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Supplier {
            id: Uuid::new_v4(),
            name: "Acme Polymers".to_string(),
            tier,
            risk: tier_policy(tier).risk,
            qualification_date: None,
            requalification_date: None,
            last_audit_date: None,
            next_audit_date: None,
            archived: false,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn critical_requalification_is_one_year_out() {
        assert_eq!(
            next_requalification_date(date(2024, 1, 15), CriticalityTier::Critical),
            date(2025, 1, 15)
        );
    }

    #[test]
    fn major_audit_is_three_years_out() {
        assert_eq!(
            next_audit_date(date(2024, 1, 15), CriticalityTier::Major),
            Some(date(2027, 1, 15))
        );
    }

    #[test]
    fn minor_tier_has_no_audit_date() {
        assert_eq!(next_audit_date(date(2024, 1, 15), CriticalityTier::Minor), None);
        assert!(!is_due_within(None, 30, date(2024, 6, 1)));
    }

    #[test]
    fn month_addition_clamps_to_end_of_month() {
        // Feb 29 of a leap year + 12 months lands on Feb 28.
        assert_eq!(
            next_requalification_date(date(2024, 2, 29), CriticalityTier::Critical),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn due_within_boundary_is_inclusive() {
        let today = date(2025, 6, 1);
        assert!(is_due_within(Some(date(2025, 7, 1)), 30, today));
        assert!(!is_due_within(Some(date(2025, 7, 2)), 30, today));
        // Overdue dates are due as well.
        assert!(is_due_within(Some(date(2025, 1, 1)), 30, today));
    }

    #[test]
    fn unqualified_supplier_is_non_compliant() {
        let s = supplier(CriticalityTier::Major);
        let snap = compliance_snapshot(&s, date(2025, 6, 1));
        assert_eq!(snap.status, ComplianceStatus::NonCompliant);
        assert_eq!(snap.issues, vec!["Supplier is not yet qualified"]);
        assert_eq!(snap.actions, vec!["Complete initial qualification"]);
    }

    #[test]
    fn qualified_supplier_with_distant_deadlines_is_compliant() {
        let mut s = supplier(CriticalityTier::Critical);
        s.qualification_date = Some(date(2025, 1, 1));
        s.requalification_date = Some(date(2026, 1, 1));
        s.next_audit_date = Some(date(2026, 1, 1));
        let snap = compliance_snapshot(&s, date(2025, 6, 1));
        assert_eq!(snap.status, ComplianceStatus::Compliant);
        assert!(snap.issues.is_empty());
    }

    #[test]
    fn due_soon_and_overdue_collapse_to_the_same_signal() {
        let today = date(2025, 6, 1);

        let mut due_soon = supplier(CriticalityTier::Major);
        due_soon.qualification_date = Some(date(2023, 6, 15));
        due_soon.requalification_date = Some(date(2025, 6, 15));

        let mut overdue = supplier(CriticalityTier::Major);
        overdue.qualification_date = Some(date(2023, 1, 1));
        overdue.requalification_date = Some(date(2025, 1, 1));

        let a = compliance_snapshot(&due_soon, today);
        let b = compliance_snapshot(&overdue, today);
        assert_eq!(a.status, ComplianceStatus::NonCompliant);
        assert_eq!(b.status, ComplianceStatus::NonCompliant);
        assert!(a.issues[0].starts_with("Requalification due or overdue"));
        assert!(b.issues[0].starts_with("Requalification due or overdue"));
    }

    #[test]
    fn audit_due_adds_a_second_issue() {
        let today = date(2025, 6, 1);
        let mut s = supplier(CriticalityTier::Critical);
        s.qualification_date = Some(date(2024, 9, 1));
        s.requalification_date = Some(date(2025, 6, 10));
        s.next_audit_date = Some(date(2025, 5, 20));
        let snap = compliance_snapshot(&s, today);
        assert_eq!(snap.status, ComplianceStatus::NonCompliant);
        assert_eq!(snap.issues.len(), 2);
        assert_eq!(snap.actions.len(), 2);
    }

    proptest! {
        #[test]
        fn requalification_matches_policy_interval(
            days_offset in 0i64..40_000,
            tier_idx in 0usize..3,
        ) {
            let base = date(1990, 1, 1) + chrono::Duration::days(days_offset);
            let tier = CriticalityTier::ALL[tier_idx];
            let expected = base
                .checked_add_months(Months::new(tier_policy(tier).requalification_months))
                .unwrap();
            prop_assert_eq!(next_requalification_date(base, tier), expected);
        }

        #[test]
        fn audit_date_is_none_exactly_for_minor(
            days_offset in 0i64..40_000,
            tier_idx in 0usize..3,
        ) {
            let base = date(1990, 1, 1) + chrono::Duration::days(days_offset);
            let tier = CriticalityTier::ALL[tier_idx];
            let next = next_audit_date(base, tier);
            prop_assert_eq!(next.is_none(), tier == CriticalityTier::Minor);
        }

        #[test]
        fn missing_qualification_always_non_compliant(
            days_offset in 0i64..40_000,
            tier_idx in 0usize..3,
            has_requal in any::<bool>(),
            has_audit in any::<bool>(),
        ) {
            let today = date(2000, 1, 1) + chrono::Duration::days(days_offset % 20_000);
            let far = date(2000, 1, 1) + chrono::Duration::days(days_offset);
            let mut s = supplier(CriticalityTier::ALL[tier_idx]);
            s.risk = RiskClassification::Medium;
            s.qualification_date = None;
            s.requalification_date = has_requal.then_some(far);
            s.next_audit_date = has_audit.then_some(far);
            let snap = compliance_snapshot(&s, today);
            prop_assert_eq!(snap.status, ComplianceStatus::NonCompliant);
            prop_assert!(snap.issues.iter().any(|i| i.contains("not yet qualified")));
        }
    }
}
