use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};

use stockroom_core::account::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::middleware::optional_user;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Open route; a bearer token is read only when one is sent.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let caller = optional_user(&state, &headers)?;
    let user = state.accounts().register(body, caller.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered".to_string(),
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    Ok(Json(state.accounts().login(body).await?))
}
