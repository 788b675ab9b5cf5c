//! # Replenishment Requests
//!
//! Floor staff ask for a product to be restocked; a manager approves or
//! rejects, and an approved request is later marked fulfilled.
//!
//! ```text
//!   pending ──► approved ──► fulfilled
//!      │
//!      └──────► rejected
//! ```
//!
//! Fulfilling a request does not move stock by itself. The goods arrive
//! through an ordinary entry movement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{ReplenishmentRequest, RequestStatus};
use crate::validation::{validate_movement_quantity, validate_required};

impl RequestStatus {
    /// Allowed transitions. Staying in the same state is not a transition.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Rejected)
                | (RequestStatus::Approved, RequestStatus::Fulfilled)
        )
    }

    /// True once nothing else can happen to the request.
    pub fn is_final(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Fulfilled)
    }
}

/// Body of `POST /requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub reason: String,
}

impl NewRequest {
    pub fn validate(&self) -> CoreResult<()> {
        if self.product_id.trim().is_empty() {
            return Err(ValidationError::required("productId").into());
        }
        validate_movement_quantity(self.quantity)?;
        validate_required("reason", &self.reason)?;
        Ok(())
    }

    /// Validates and builds a pending request owned by `requested_by`.
    pub fn into_request(
        self,
        id: String,
        requested_by: String,
        now: DateTime<Utc>,
    ) -> CoreResult<ReplenishmentRequest> {
        self.validate()?;
        Ok(ReplenishmentRequest {
            id,
            product_id: self.product_id.trim().to_string(),
            requested_by,
            quantity: self.quantity,
            reason: self.reason.trim().to_string(),
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Moves `request` to `next`, or fails with `InvalidTransition`.
pub fn transition(
    request: &ReplenishmentRequest,
    next: RequestStatus,
    now: DateTime<Utc>,
) -> CoreResult<ReplenishmentRequest> {
    if !request.status.can_transition_to(next) {
        return Err(CoreError::InvalidTransition {
            from: request.status.to_string(),
            to: next.to_string(),
        });
    }

    let mut updated = request.clone();
    updated.status = next;
    updated.updated_at = now;
    Ok(updated)
}
