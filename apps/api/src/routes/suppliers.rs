use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

use stockroom_core::supplier::SupplierDraft;
use stockroom_core::{Capability, Supplier};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::middleware::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route("/suppliers/:id", get(get_supplier))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Supplier>>> {
    user.require(Capability::ViewInventory)?;
    Ok(Json(state.inventory().list_suppliers().await?))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Supplier>> {
    user.require(Capability::ViewInventory)?;
    Ok(Json(state.inventory().get_supplier(&id).await?))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(draft): ApiJson<SupplierDraft>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    user.require(Capability::ManageSuppliers)?;
    let supplier = state.inventory().create_supplier(draft).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}
