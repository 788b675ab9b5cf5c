use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

use stockroom_core::product::{ProductDraft, ProductPatch};
use stockroom_core::{Capability, Product};

use crate::dto::{MessageResponse, ProductQuery};
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// `?q=` filters by name, SKU or category.
pub async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    user.require(Capability::ViewInventory)?;
    let products = state.inventory().list_products(query.q.as_deref()).await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    user.require(Capability::ViewInventory)?;
    Ok(Json(state.inventory().get_product(&id).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    user.require(Capability::ManageProducts)?;
    let product = state.inventory().create_product(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> ApiResult<Json<Product>> {
    user.require(Capability::ManageProducts)?;
    Ok(Json(state.inventory().update_product(&id, patch).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    user.require(Capability::ManageProducts)?;
    state.inventory().delete_product(&id).await?;
    Ok(Json(MessageResponse::new("Product deleted")))
}
