// SPDX-License-Identifier: BUSL-1.1
//! Structured error hierarchy for the qualification subsystem.
//!
//! Propagation policy: `SupplierNotFound` is surfaced to the immediate
//! caller and never retried. `InvalidTier` is rejected at the system
//! boundary — deep code never revalidates tier strings. `Storage` errors
//! propagate out of single-supplier operations; the batch reconciler catches
//! and counts them so one supplier's failure never aborts its siblings.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the supplier qualification engine.
#[derive(Debug, Error)]
pub enum QualError {
    /// No supplier exists with the given ID.
    #[error("supplier not found: {0}")]
    SupplierNotFound(Uuid),

    /// A criticality tier string outside the closed set
    /// {critical, major, minor}. Never coerced to a default.
    #[error("invalid criticality tier: {0:?}")]
    InvalidTier(String),

    /// Transient persistence failure.
    #[error("storage failure: {0}")]
    Storage(String),

    /// An assessment with the same (supplier, scheduled date) already
    /// exists. Raised by the uniqueness guard when two triggers race;
    /// callers treat it as already-scheduled, not as a hard failure.
    #[error("assessment already scheduled for supplier {supplier_id} on {scheduled_date}")]
    SchedulingConflict {
        supplier_id: Uuid,
        scheduled_date: chrono::NaiveDate,
    },
}

impl QualError {
    /// True when the error is the benign duplicate-schedule case.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::SchedulingConflict { .. })
    }
}
