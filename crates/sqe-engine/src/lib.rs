// SPDX-License-Identifier: BUSL-1.1
//! # sqe-engine — Qualification Lifecycle Engine
//!
//! The stateful half of the supplier qualification engine:
//!
//! - **Store** ([`store`]): Async contracts for the supplier directory, the
//!   assessment store, and the lifecycle audit trail. The engine owns the
//!   contracts; the API crate provides the Postgres implementations.
//!
//! - **Memory** ([`memory`]): `DashMap`-backed in-memory store
//!   implementations, used in no-database mode and throughout the tests.
//!
//! - **Audit** ([`audit`]): Maps lifecycle events to immutable audit
//!   entries and appends them to the trail.
//!
//! - **Scheduler** ([`scheduler`]): The per-supplier scheduling decision —
//!   decide-and-insert runs under a per-supplier lock so a manual trigger
//!   and the recurring pass cannot race into duplicate assessments.
//!
//! - **Reconcile** ([`reconcile`]): Fan-out over all active suppliers with
//!   isolated per-supplier failure and an order-independent aggregate.
//!
//! - **Driver** ([`driver`]): Supervised recurring task — warm-up pass at
//!   startup, then one pass at every local midnight, always re-armed,
//!   cooperatively cancellable.

pub mod audit;
pub mod driver;
pub mod memory;
pub mod reconcile;
pub mod scheduler;
pub mod store;

pub use audit::AuditTrailEmitter;
pub use driver::{DriverConfig, DriverHandle, RecurringJobDriver};
pub use memory::{InMemoryAssessmentStore, InMemoryAuditTrail, InMemorySupplierDirectory};
pub use reconcile::{BatchReconciler, ReconcileOutcome, SchedulerStatus};
pub use scheduler::AssessmentScheduler;
pub use store::{AssessmentStore, AuditTrail, LifecycleDatePatch, SupplierDirectory};
