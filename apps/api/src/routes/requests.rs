use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};

use stockroom_core::request::NewRequest;
use stockroom_core::{Capability, ReplenishmentRequest};

use crate::dto::StatusUpdate;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/requests", get(list_requests).post(submit_request))
        .route("/requests/:id/status", put(review_request))
}

pub async fn list_requests(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<ReplenishmentRequest>>> {
    user.require(Capability::ViewInventory)?;
    Ok(Json(state.requests().list().await?))
}

pub async fn submit_request(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(body): ApiJson<NewRequest>,
) -> ApiResult<(StatusCode, Json<ReplenishmentRequest>)> {
    user.require(Capability::SubmitRequests)?;
    let request = state.requests().submit(body, &user).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn review_request(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> ApiResult<Json<ReplenishmentRequest>> {
    user.require(Capability::ReviewRequests)?;
    Ok(Json(state.requests().review(&id, body.status, &user).await?))
}
