//! Request and response bodies that only exist at the HTTP boundary.
//!
//! Domain bodies (`ProductDraft`, `MovementRequest`, `RegisterRequest`,
//! ...) live in `stockroom-core` so the client crate shares them.

use serde::{Deserialize, Serialize};

use stockroom_core::RequestStatus;

// =============================================================================
// Misc
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Body of `PUT /requests/:id/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: RequestStatus,
}

// =============================================================================
// Query strings
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementQuery {
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub unread: bool,
}

/// `start`/`end` as `YYYY-MM-DD`, both inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}
