//! Error types for the Stockroom API.
//!
//! Every failure leaves a handler as an [`ApiError`] and reaches the
//! client as a status code plus `{"error": <code>, "message": <text>}`.
//!
//! ```text
//! CoreError ──kind()──┐
//!                     ├──► ApiError ──► (StatusCode, Json)
//! DbError ────────────┘
//! ```
//!
//! | Kind             | Status |
//! |------------------|--------|
//! | invalid_argument | 400    |
//! | unauthorized     | 401    |
//! | forbidden        | 403    |
//! | not_found        | 404    |
//! | conflict         | 409    |
//! | store_unavailable| 503    |

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use stockroom_core::{Capability, CoreError, ErrorKind};
use stockroom_db::DbError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Missing capability: {0}")]
    Forbidden(Capability),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Store failure. Details are logged where the error is created.
    #[error("The inventory store is temporarily unavailable")]
    StoreUnavailable,

    #[error("Internal server error")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidArgument(_) => "invalid_argument",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::StoreUnavailable => "store_unavailable",
            ApiError::Internal(_) => "internal",
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        json_error(self.status(), self.code(), self.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::InvalidArgument => ApiError::InvalidArgument(message),
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::Conflict => ApiError::Conflict(message),
        }
    }
}

impl From<stockroom_core::ValidationError> for ApiError {
    fn from(err: stockroom_core::ValidationError) -> Self {
        ApiError::from(CoreError::from(err))
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Rejected(core) => core.into(),
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } | DbError::ConcurrentUpdate { .. } => {
                ApiError::Conflict(err.to_string())
            }
            DbError::ForeignKeyViolation { .. } => ApiError::InvalidArgument(err.to_string()),
            other => {
                error!(error = %other, "Store operation failed");
                if other.is_store_unavailable() {
                    ApiError::StoreUnavailable
                } else {
                    ApiError::Internal(other.to_string())
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidArgument(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::ValidationError;

    #[test]
    fn test_core_errors_map_by_kind() {
        let err: ApiError = CoreError::ProductNotFound("p-1".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CoreError::DuplicateSku("LECHE-1L".into()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "conflict");

        let err: ApiError = ValidationError::required("name").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_db_errors() {
        let err: ApiError = DbError::Rejected(CoreError::ProductNotFound("p-9".into())).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = DbError::ConcurrentUpdate {
            product_id: "p-1".into(),
            attempts: 5,
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = DbError::PoolExhausted.into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        // store details stay in the logs
        assert!(!err.to_string().contains("pool"));
    }

    #[test]
    fn test_forbidden_names_capability() {
        let err = ApiError::Forbidden(Capability::ManageProducts);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Missing capability: manage_products");
    }
}
