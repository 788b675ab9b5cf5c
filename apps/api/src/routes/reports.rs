//! Read-only reports. Ranges are inclusive calendar dates (UTC).

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};

use stockroom_core::report::{ReportRange, ReportSummary};
use stockroom_core::{Capability, Movement, ValidationError};

use crate::dto::RangeQuery;
use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::middleware::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports/movements", get(movement_report))
        .route("/reports/summary", get(summary))
        .route("/reports/products.csv", get(products_csv))
}

/// Both bounds or neither.
fn parse_range(query: &RangeQuery) -> ApiResult<Option<ReportRange>> {
    match (query.start.as_deref(), query.end.as_deref()) {
        (Some(start), Some(end)) => Ok(Some(ReportRange::parse(start, end)?)),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ValidationError::required("end").into()),
        (None, Some(_)) => Err(ValidationError::required("start").into()),
    }
}

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD`, both required.
pub async fn movement_report(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> ApiResult<Json<Vec<Movement>>> {
    user.require(Capability::ViewInventory)?;
    let range = parse_range(&query)?
        .ok_or_else(|| ValidationError::required("start"))?;
    Ok(Json(state.inventory().movement_report(&range).await?))
}

pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> ApiResult<Json<ReportSummary>> {
    user.require(Capability::ViewInventory)?;
    let range = parse_range(&query)?;
    Ok(Json(state.inventory().summary(range.as_ref()).await?))
}

pub async fn products_csv(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    user.require(Capability::ViewInventory)?;
    let csv = state.inventory().products_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"products.csv\"",
            ),
        ],
        csv,
    ))
}
