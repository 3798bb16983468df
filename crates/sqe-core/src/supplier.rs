// SPDX-License-Identifier: BUSL-1.1
//! Supplier domain records and closed classification enumerations.
//!
//! Criticality tiers and risk classifications are closed enums parsed once
//! at the system boundary (API request or database row). Past that boundary
//! every `match` is exhaustive — adding a fourth tier is a compile error
//! until every policy and scheduling path is updated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QualError;

// ---------------------------------------------------------------------------
// Classification enums
// ---------------------------------------------------------------------------

/// A supplier's impact on product safety and compliance.
///
/// Drives the interval policy: how often the supplier must be requalified
/// and audited. See [`crate::policy::tier_policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalityTier {
    /// Direct impact on product safety — tightest cadence.
    Critical,
    /// Significant quality impact.
    Major,
    /// Low impact — documentation-level oversight, no periodic audit.
    Minor,
}

impl CriticalityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
        }
    }

    /// All tiers, in severity order. Used by status aggregation.
    pub const ALL: [CriticalityTier; 3] = [Self::Critical, Self::Major, Self::Minor];
}

impl FromStr for CriticalityTier {
    type Err = QualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            _ => Err(QualError::InvalidTier(s.to_string())),
        }
    }
}

impl fmt::Display for CriticalityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current risk classification of a supplier.
///
/// Defaults from the tier policy at qualification time but can be raised or
/// lowered by assessment outcomes through the external workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskClassification {
    High,
    Medium,
    Low,
}

impl RiskClassification {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub const ALL: [RiskClassification; 3] = [Self::High, Self::Medium, Self::Low];
}

impl fmt::Display for RiskClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A supplier as seen by this engine.
///
/// Owned by the supplier directory; the engine reads it and proposes
/// updates to the lifecycle date fields only. All lifecycle dates are
/// calendar dates — time of day is never consulted by the rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub tier: CriticalityTier,
    pub risk: RiskClassification,
    pub qualification_date: Option<NaiveDate>,
    pub requalification_date: Option<NaiveDate>,
    pub last_audit_date: Option<NaiveDate>,
    pub next_audit_date: Option<NaiveDate>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status of an assessment work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// An assessment work item, created by the scheduler or by a human action.
///
/// Append-mostly: once `Completed` it becomes the baseline for the next
/// interval computation and is never rescheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub supplier_id: Uuid,
    /// Assessment kind, e.g. "Risk Assessment" for engine-created records.
    pub kind: String,
    pub scheduled_date: NaiveDate,
    pub status: AssessmentStatus,
    /// Findings text; for engine-created records this is the generated
    /// scheduling rationale naming the tier/risk basis.
    pub findings: String,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle event kinds recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    Qualification,
    Requalification,
    AuditScheduled,
    AuditCompleted,
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Qualification => "qualification",
            Self::Requalification => "requalification",
            Self::AuditScheduled => "audit_scheduled",
            Self::AuditCompleted => "audit_completed",
        };
        f.write_str(s)
    }
}

/// An immutable lifecycle audit entry, kept as compliance evidence.
///
/// Entries are append-only: no update or delete operation exists anywhere
/// in the engine or its stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleAuditEntry {
    pub id: Uuid,
    pub supplier_id: Uuid,
    /// Action name, e.g. "requalification_scheduled".
    pub action: String,
    /// The supplier field the event concerns, e.g. "requalification_date".
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
}
