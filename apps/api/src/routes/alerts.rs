use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use stockroom_core::{Alert, Capability};

use crate::dto::{AlertQuery, MessageResponse};
use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::middleware::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(list_alerts))
        .route("/alerts/refresh", post(refresh_alerts))
        .route("/alerts/:id/read", post(mark_read))
}

pub async fn list_alerts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<AlertQuery>,
) -> ApiResult<Json<Vec<Alert>>> {
    user.require(Capability::ViewInventory)?;
    Ok(Json(state.inventory().list_alerts(query.unread).await?))
}

/// Returns only the alerts this call created.
pub async fn refresh_alerts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Alert>>> {
    user.require(Capability::ManageAlerts)?;
    Ok(Json(state.inventory().refresh_alerts().await?))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    user.require(Capability::ManageAlerts)?;
    state.inventory().mark_alert_read(&id).await?;
    Ok(Json(MessageResponse::new("Alert marked as read")))
}
