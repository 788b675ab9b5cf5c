//! Bearer-token authentication and capability checks.
//!
//! ```text
//! request ──► require_auth ──► Authorization: Bearer <jwt>
//!                 │                  │
//!                 │ 401 if missing   ▼
//!                 │ or invalid    Claims { sub, role }
//!                 ▼                  │
//!            handler ◄── Extension<CurrentUser>
//!                 │
//!                 └── user.require(Capability::...)  ── 403 if the role lacks it
//! ```

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use stockroom_core::{Capability, Role};

use crate::auth::extract_bearer_token;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// The authenticated caller, as read from the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
}

impl CurrentUser {
    /// Fails with 403 unless the caller's role holds `capability`.
    pub fn require(&self, capability: Capability) -> ApiResult<()> {
        if self.role.can(capability) {
            return Ok(());
        }
        warn!(user_id = %self.id, role = %self.role, %capability, "Capability check failed");
        Err(ApiError::Forbidden(capability))
    }
}

/// Rejects the request with 401 unless it carries a valid bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, req.headers())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Reads and validates the bearer token.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> ApiResult<CurrentUser> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let token = header
        .to_str()
        .ok()
        .and_then(extract_bearer_token)
        .ok_or_else(|| ApiError::Unauthorized("Malformed Authorization header".to_string()))?;

    let claims = state.jwt.validate(token).map_err(|e| {
        warn!(error = %e, "Rejected bearer token");
        e
    })?;

    Ok(CurrentUser {
        id: claims.sub,
        role: claims.role,
    })
}

/// Like [`authenticate`], but a request without an Authorization header is
/// anonymous rather than rejected. A header that is present must be valid.
pub fn optional_user(state: &AppState, headers: &HeaderMap) -> ApiResult<Option<CurrentUser>> {
    if headers.contains_key(header::AUTHORIZATION) {
        authenticate(state, headers).map(Some)
    } else {
        Ok(None)
    }
}
