//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` at the workspace root are baked
//! into the binary and applied in filename order when the pool opens.
//!
//! ## Schema
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  suppliers ◄─── products ◄┄┄┄ movements   (no FK: survives deletes)     │
//! │                    ▲                                                    │
//! │                    ├┄┄┄┄┄┄ alerts                                       │
//! │                    └┄┄┄┄┄┄ replenishment_requests ───► users            │
//! │                                                                         │
//! │  ───► enforced foreign key      ┄┄┄► plain reference                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Schema changes go in a new `NNN_description.sql`; applied files are
//! checksummed and must not be edited.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever the `_sqlx_migrations` table has not seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(known = MIGRATOR.migrations.len(), "Applying schema migrations");
    MIGRATOR.run(pool).await?;
    info!("Schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;
    Ok((MIGRATOR.migrations.len(), applied as usize))
}
