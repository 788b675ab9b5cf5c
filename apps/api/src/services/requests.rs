//! Replenishment requests: staff ask for stock, managers review.

use chrono::Utc;
use tracing::{info, warn};

use stockroom_core::request::{transition, NewRequest};
use stockroom_core::{new_id, CoreError, ReplenishmentRequest, RequestStatus};
use stockroom_db::Database;

use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;

#[derive(Debug, Clone)]
pub struct RequestService {
    db: Database,
}

impl RequestService {
    pub fn new(db: Database) -> Self {
        RequestService { db }
    }

    pub async fn list(&self) -> ApiResult<Vec<ReplenishmentRequest>> {
        Ok(self.db.requests().list().await?)
    }

    /// Files a pending request on behalf of `user`.
    pub async fn submit(&self, body: NewRequest, user: &CurrentUser) -> ApiResult<ReplenishmentRequest> {
        body.validate()?;

        let product_id = body.product_id.trim();
        if self.db.products().get_by_id(product_id).await?.is_none() {
            return Err(CoreError::ProductNotFound(product_id.to_string()).into());
        }

        let request = body.into_request(new_id(), user.id.clone(), Utc::now())?;
        self.db.requests().insert(&request).await?;
        info!(
            id = %request.id,
            product_id = %request.product_id,
            quantity = request.quantity,
            requested_by = %request.requested_by,
            "Replenishment request submitted"
        );
        Ok(request)
    }

    /// Moves a request to `next`. A reviewer who loses a race against
    /// another reviewer gets 409.
    pub async fn review(
        &self,
        id: &str,
        next: RequestStatus,
        reviewer: &CurrentUser,
    ) -> ApiResult<ReplenishmentRequest> {
        let current = self
            .db
            .requests()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::from(CoreError::RequestNotFound(id.to_string())))?;

        let updated = transition(&current, next, Utc::now())?;

        if !self.db.requests().update_status(&updated, current.status).await? {
            warn!(id = %id, expected = %current.status, "Request changed during review");
            return Err(ApiError::Conflict(format!(
                "Request {} was changed by someone else; reload and retry",
                id
            )));
        }

        info!(
            id = %id,
            from = %current.status,
            to = %updated.status,
            reviewer = %reviewer.id,
            "Replenishment request reviewed"
        );
        Ok(updated)
    }
}
