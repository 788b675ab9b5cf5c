use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

use stockroom_core::movement::MovementRequest;
use stockroom_core::{Capability, Movement};

use crate::dto::MovementQuery;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/movements", get(list_movements).post(record_movement))
}

/// `?productId=` narrows to one product.
pub async fn list_movements(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<MovementQuery>,
) -> ApiResult<Json<Vec<Movement>>> {
    user.require(Capability::ViewInventory)?;
    let movements = state
        .inventory()
        .list_movements(query.product_id.as_deref())
        .await?;
    Ok(Json(movements))
}

pub async fn record_movement(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(request): ApiJson<MovementRequest>,
) -> ApiResult<(StatusCode, Json<Movement>)> {
    user.require(Capability::RecordMovements)?;
    let movement = state.inventory().record_movement(request).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}
