//! # Movement Repository
//!
//! The movement log, and the one place where a movement changes stock.
//!
//! ## Atomic Application
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    apply(request)                                       │
//! │                                                                         │
//! │  request.validate() ── bad type / qty / reason ──► Rejected(Invalid)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN IMMEDIATE  (write lock before the read; waits on busy_timeout)  │
//! │   ├─ SELECT product            ── missing ──► ROLLBACK, Rejected(404)   │
//! │   ├─ plan_movement (core)                                               │
//! │   ├─ UPDATE products SET stock = new                                    │
//! │   │     WHERE id = ? AND stock = previous  ── 0 rows ──► ROLLBACK, retry│
//! │   ├─ INSERT movement                                                    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Either both rows change or neither does. A busy database or a lost    │
//! │  swap retries, up to MAX_APPLY_ATTEMPTS.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::product::PRODUCT_COLUMNS;
use stockroom_core::movement::{plan_movement, MovementRequest};
use stockroom_core::{new_id, CoreError, Movement, Product};

const MOVEMENT_COLUMNS: &str =
    "id, product_id, movement_type, quantity, reason, reference, cost_cents, created_at";

/// How many times a lost compare-and-swap is retried before giving up.
pub const MAX_APPLY_ATTEMPTS: u32 = 5;

/// Result of a committed movement.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMovement {
    pub movement: Movement,
    /// The product as it is after the commit.
    pub product: Product,
    /// True when an exit asked for more than was on hand and stock stopped
    /// at zero.
    pub clamped: bool,
    /// Units requested but not available.
    pub shortfall: i64,
}

#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Every movement in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Movement>> {
        let movements = sqlx::query_as::<_, Movement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Movements of one product, oldest first. Works for deleted products.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<Movement>> {
        let movements = sqlx::query_as::<_, Movement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements WHERE product_id = ?1 ORDER BY rowid"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Records a movement and moves the product's stock in one transaction.
    ///
    /// ## Errors
    /// - `Rejected(Validation)` for an invalid request
    /// - `Rejected(ProductNotFound)` when the product doesn't exist
    /// - `ConcurrentUpdate` after [`MAX_APPLY_ATTEMPTS`] lost races
    pub async fn apply(&self, request: &MovementRequest) -> DbResult<AppliedMovement> {
        request.validate()?;

        for attempt in 1..=MAX_APPLY_ATTEMPTS {
            match self.try_apply(request).await {
                Ok(Some(applied)) => return Ok(applied),
                Ok(None) => debug!(
                    product_id = %request.product_id,
                    attempt,
                    "Stock changed underneath movement, retrying"
                ),
                Err(DbError::Busy(reason)) => debug!(
                    product_id = %request.product_id,
                    attempt,
                    %reason,
                    "Database busy, retrying movement"
                ),
                Err(e) => return Err(e),
            }
        }

        warn!(
            product_id = %request.product_id,
            attempts = MAX_APPLY_ATTEMPTS,
            "Giving up on movement after repeated stock conflicts"
        );
        Err(DbError::ConcurrentUpdate {
            product_id: request.product_id.trim().to_string(),
            attempts: MAX_APPLY_ATTEMPTS,
        })
    }

    /// One transaction. `Ok(None)` means the stock swap lost and nothing
    /// was written.
    async fn try_apply(&self, request: &MovementRequest) -> DbResult<Option<AppliedMovement>> {
        // A deferred BEGIN would read under a shared lock and then fail the
        // upgrade with SQLITE_BUSY once another writer commits.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(transaction_error)?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(request.product_id.trim())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(request.product_id.trim().to_string()))?;

        let now = Utc::now();
        let plan = plan_movement(&product, request, new_id(), now)?;

        let swapped = sqlx::query(
            "UPDATE products SET stock = ?1, updated_at = ?2 WHERE id = ?3 AND stock = ?4",
        )
        .bind(plan.new_stock)
        .bind(now)
        .bind(&product.id)
        .bind(plan.previous_stock)
        .execute(&mut *tx)
        .await?;

        if swapped.rows_affected() == 0 {
            tx.rollback().await.map_err(transaction_error)?;
            return Ok(None);
        }

        let movement = &plan.movement;
        sqlx::query(
            r#"
            INSERT INTO movements (
                id, product_id, movement_type, quantity, reason, reference, cost_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.product_id)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(&movement.reason)
        .bind(&movement.reference)
        .bind(movement.cost_cents)
        .bind(movement.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(transaction_error)?;

        info!(
            movement_id = %movement.id,
            product_id = %movement.product_id,
            movement_type = %movement.movement_type,
            quantity = movement.quantity,
            from = plan.previous_stock,
            to = plan.new_stock,
            "Movement applied"
        );

        let shortfall = plan.shortfall();
        let clamped = plan.clamped;
        let mut updated = product;
        updated.stock = plan.new_stock;
        updated.updated_at = now;

        Ok(Some(AppliedMovement {
            movement: plan.movement,
            product: updated,
            clamped,
            shortfall,
        }))
    }
}

/// Keeps `Busy` retryable; anything else about BEGIN/COMMIT is fatal.
fn transaction_error(err: sqlx::Error) -> DbError {
    match DbError::from(err) {
        DbError::Busy(reason) => DbError::Busy(reason),
        other => DbError::TransactionFailed(other.to_string()),
    }
}

// =============================================================================
// Tests
// =============================================================================
