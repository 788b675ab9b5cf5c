//! # Alert Repository
//!
//! Alerts are inserted by the alert deriver and only ever flipped to read.
//! There is no delete and no way back to unread.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::Alert;

const ALERT_COLUMNS: &str = "id, alert_type, product_id, message, severity, is_read, created_at";

#[derive(Debug, Clone)]
pub struct AlertRepository {
    pool: SqlitePool,
}

impl AlertRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AlertRepository { pool }
    }

    /// All alerts, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Alert>> {
        let alerts = sqlx::query_as::<_, Alert>(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    pub async fn list_unread(&self) -> DbResult<Vec<Alert>> {
        let alerts = sqlx::query_as::<_, Alert>(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts WHERE is_read = 0 ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Alert>> {
        let alert = sqlx::query_as::<_, Alert>(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(alert)
    }

    /// Inserts a batch of freshly derived alerts in one transaction.
    pub async fn insert_many(&self, alerts: &[Alert]) -> DbResult<()> {
        if alerts.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for alert in alerts {
            sqlx::query(
                r#"
                INSERT INTO alerts (id, alert_type, product_id, message, severity, is_read, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&alert.id)
            .bind(alert.alert_type)
            .bind(&alert.product_id)
            .bind(&alert.message)
            .bind(alert.severity)
            .bind(alert.is_read)
            .bind(alert.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(count = alerts.len(), "Inserted alerts");
        Ok(())
    }

    /// Marks an alert read and returns it. Already-read alerts stay read.
    ///
    /// ## Errors
    /// `NotFound` for an unknown id.
    pub async fn mark_read(&self, id: &str) -> DbResult<Alert> {
        let result = sqlx::query("UPDATE alerts SET is_read = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Alert", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Alert", id))
    }
}
