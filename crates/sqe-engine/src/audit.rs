// SPDX-License-Identifier: BUSL-1.1
//! Lifecycle audit emission.
//!
//! Every lifecycle event maps to a fixed (action, field) pair. Entries are
//! immutable once written — the trail exposes append and read only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use sqe_core::{AuditEventKind, LifecycleAuditEntry, Result};

use crate::store::AuditTrail;

/// Converts lifecycle events into immutable audit records and appends
/// them to the trail.
#[derive(Clone)]
pub struct AuditTrailEmitter {
    trail: Arc<dyn AuditTrail>,
}

impl AuditTrailEmitter {
    pub fn new(trail: Arc<dyn AuditTrail>) -> Self {
        Self { trail }
    }

    /// Record one lifecycle event.
    ///
    /// `new_value` comes from `details` when provided, otherwise the event
    /// timestamp's date. `old_value` is the previous field value when the
    /// caller knows it.
    pub async fn record(
        &self,
        supplier_id: Uuid,
        kind: AuditEventKind,
        details: Option<String>,
        old_value: Option<String>,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<LifecycleAuditEntry> {
        let (action, field) = action_and_field(kind);
        let entry = LifecycleAuditEntry {
            id: Uuid::new_v4(),
            supplier_id,
            action: action.to_string(),
            field: field.to_string(),
            old_value,
            new_value: details.unwrap_or_else(|| now.date_naive().to_string()),
            user_id: user_id.to_string(),
            recorded_at: now,
        };
        self.trail.append(entry).await
    }

    /// Read a supplier's trail, oldest first.
    pub async fn for_supplier(&self, supplier_id: Uuid) -> Result<Vec<LifecycleAuditEntry>> {
        self.trail.for_supplier(supplier_id).await
    }
}

/// Fixed mapping from event kind to the recorded (action, field) pair.
fn action_and_field(kind: AuditEventKind) -> (&'static str, &'static str) {
    match kind {
        AuditEventKind::Qualification => ("supplier_qualified", "qualification_date"),
        AuditEventKind::Requalification => ("requalification_scheduled", "requalification_date"),
        AuditEventKind::AuditScheduled => ("audit_scheduled", "next_audit_date"),
        AuditEventKind::AuditCompleted => ("audit_completed", "last_audit_date"),
    }
}
