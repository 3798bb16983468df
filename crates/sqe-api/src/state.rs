// SPDX-License-Identifier: BUSL-1.1
//! Shared application state.
//!
//! Wires the store implementations (in-memory or Postgres) into the
//! engine components. The scheduler, reconciler, and emitter are shared
//! between the HTTP handlers and the recurring driver — both paths go
//! through the same per-supplier critical section.

use std::sync::Arc;

use sqe_engine::{
    AssessmentScheduler, AssessmentStore, AuditTrail, AuditTrailEmitter, BatchReconciler,
    InMemoryAssessmentStore, InMemoryAuditTrail, InMemorySupplierDirectory, SupplierDirectory,
};

/// Shared, cheaply cloneable application state.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn SupplierDirectory>,
    pub assessments: Arc<dyn AssessmentStore>,
    pub emitter: AuditTrailEmitter,
    pub scheduler: Arc<AssessmentScheduler>,
    pub reconciler: Arc<BatchReconciler>,
}

impl AppState {
    /// Assemble state over arbitrary store implementations.
    pub fn with_stores(
        directory: Arc<dyn SupplierDirectory>,
        assessments: Arc<dyn AssessmentStore>,
        trail: Arc<dyn AuditTrail>,
    ) -> Self {
        let emitter = AuditTrailEmitter::new(trail);
        let scheduler = Arc::new(AssessmentScheduler::new(
            directory.clone(),
            assessments.clone(),
            emitter.clone(),
        ));
        let reconciler = Arc::new(BatchReconciler::new(
            directory.clone(),
            assessments.clone(),
            scheduler.clone(),
        ));
        Self {
            directory,
            assessments,
            emitter,
            scheduler,
            reconciler,
        }
    }

    /// In-memory state (no `DATABASE_URL`; also used by the tests).
    pub fn in_memory() -> Self {
        Self::with_stores(
            Arc::new(InMemorySupplierDirectory::new()),
            Arc::new(InMemoryAssessmentStore::new()),
            Arc::new(InMemoryAuditTrail::new()),
        )
    }
}
