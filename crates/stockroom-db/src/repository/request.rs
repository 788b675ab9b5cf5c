//! # Replenishment Request Repository

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{ReplenishmentRequest, RequestStatus};

const REQUEST_COLUMNS: &str =
    "id, product_id, requested_by, quantity, reason, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: SqlitePool,
}

impl RequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        RequestRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<ReplenishmentRequest>> {
        let requests = sqlx::query_as::<_, ReplenishmentRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM replenishment_requests ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ReplenishmentRequest>> {
        let request = sqlx::query_as::<_, ReplenishmentRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM replenishment_requests WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn insert(&self, request: &ReplenishmentRequest) -> DbResult<()> {
        debug!(id = %request.id, product_id = %request.product_id, "Inserting request");

        sqlx::query(
            r#"
            INSERT INTO replenishment_requests (
                id, product_id, requested_by, quantity, reason, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&request.id)
        .bind(&request.product_id)
        .bind(&request.requested_by)
        .bind(request.quantity)
        .bind(&request.reason)
        .bind(request.status)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes `updated.status` only if the row is still in `expected`.
    ///
    /// Two reviewers acting on the same pending request can't both win:
    /// the loser gets `Ok(false)` and should re-read.
    pub async fn update_status(
        &self,
        updated: &ReplenishmentRequest,
        expected: RequestStatus,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE replenishment_requests
            SET status = ?1, updated_at = ?2
            WHERE id = ?3 AND status = ?4
            "#,
        )
        .bind(updated.status)
        .bind(updated.updated_at)
        .bind(&updated.id)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            debug!(id = %updated.id, from = %expected, to = %updated.status, "Request status changed");
            return Ok(true);
        }

        match self.get_by_id(&updated.id).await? {
            Some(_) => Ok(false),
            None => Err(DbError::not_found("Request", &updated.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_user, seeded_db};
    use chrono::Utc;
    use stockroom_core::request::{transition, NewRequest};
    use stockroom_core::Role;

    #[tokio::test]
    async fn test_request_workflow() {
        let (db, _) = seeded_db().await;
        let user = sample_user("u-1", "ana", Role::Employee);
        db.users().insert(&user).await.unwrap();

        let pending = NewRequest {
            product_id: "p-1".into(),
            quantity: 12,
            reason: "Fin de semana largo".into(),
        }
        .into_request("r-1".into(), user.id.clone(), Utc::now())
        .unwrap();

        let repo = db.requests();
        repo.insert(&pending).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let approved = transition(&pending, RequestStatus::Approved, Utc::now()).unwrap();
        assert!(repo.update_status(&approved, RequestStatus::Pending).await.unwrap());

        // a second reviewer still holding the pending copy loses
        let rejected = transition(&pending, RequestStatus::Rejected, Utc::now()).unwrap();
        assert!(!repo.update_status(&rejected, RequestStatus::Pending).await.unwrap());

        let stored = repo.get_by_id("r-1").await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn test_update_unknown_request() {
        let (db, _) = seeded_db().await;
        let user = sample_user("u-1", "ana", Role::Employee);
        let ghost = NewRequest {
            product_id: "p-1".into(),
            quantity: 1,
            reason: "x".into(),
        }
        .into_request("ghost".into(), user.id, Utc::now())
        .unwrap();

        assert!(matches!(
            db.requests().update_status(&ghost, RequestStatus::Pending).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
