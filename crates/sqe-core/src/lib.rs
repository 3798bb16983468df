// SPDX-License-Identifier: BUSL-1.1
//! # sqe-core — Supplier Qualification Foundations
//!
//! Foundational types and pure rules for the supplier qualification
//! lifecycle engine:
//!
//! - **Supplier** ([`supplier`]): Closed criticality/risk enumerations and
//!   the supplier, assessment, and lifecycle-audit record types.
//!
//! - **Policy** ([`policy`]): Static mapping from criticality tier to
//!   requalification/audit intervals and risk classification.
//!
//! - **Lifecycle** ([`lifecycle`]): Pure date calculus — requalification and
//!   audit due dates, the due-soon predicate, and on-demand compliance
//!   snapshots.
//!
//! - **Error** ([`error`]): Structured error hierarchy for the qualification
//!   subsystem.
//!
//! Everything in this crate is side-effect free. Scheduling decisions,
//! storage, and the recurring driver live in `sqe-engine`.

pub mod error;
pub mod lifecycle;
pub mod policy;
pub mod supplier;

// Re-export primary types for ergonomic imports.

pub use error::QualError;

pub use supplier::{
    AssessmentRecord, AssessmentStatus, AuditEventKind, CriticalityTier, LifecycleAuditEntry,
    RiskClassification, Supplier,
};

pub use policy::{tier_policy, TierPolicy};

pub use lifecycle::{
    compliance_snapshot, is_due_within, next_audit_date, next_requalification_date,
    ComplianceSnapshot, ComplianceStatus, DUE_SOON_BUFFER_DAYS,
};

/// Convenience alias used across the engine crates.
pub type Result<T> = std::result::Result<T, QualError>;
