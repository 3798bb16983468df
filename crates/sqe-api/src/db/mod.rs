// SPDX-License-Identifier: BUSL-1.1
//! # Database Persistence Layer
//!
//! Postgres implementations of the engine's store contracts via SQLx.
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, supplier
//! records, assessments, and the lifecycle audit trail persist to
//! PostgreSQL. When absent, the API runs on the in-memory stores (suitable
//! for development and testing).
//!
//! The `assessments` table carries a UNIQUE (supplier_id, scheduled_date)
//! index; an insert hitting it maps to `QualError::SchedulingConflict`, so
//! two processes racing the same supplier degrade to a no-op instead of a
//! double booking.

pub mod assessments;
pub mod audit;
pub mod suppliers;

use sqe_core::QualError;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Map a SQLx error to the engine's storage failure variant.
pub(crate) fn storage_err(err: sqlx::Error) -> QualError {
    QualError::Storage(err.to_string())
}
