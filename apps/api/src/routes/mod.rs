//! HTTP routes, one file per resource.
//!
//! Public routes: `/health`, `/auth/*`. Everything else sits behind
//! [`require_auth`] and checks its own capability.

use axum::Router;

use crate::middleware::require_auth;
use crate::AppState;

pub mod alerts;
pub mod auth;
pub mod movements;
pub mod products;
pub mod reports;
pub mod requests;
pub mod suppliers;
pub mod system;

pub fn router(state: AppState) -> Router<AppState> {
    // route_layer: unknown paths still 404 instead of 401
    let protected = Router::new()
        .merge(products::router())
        .merge(suppliers::router())
        .merge(movements::router())
        .merge(alerts::router())
        .merge(requests::router())
        .merge(reports::router())
        .route_layer(axum::middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .merge(system::router())
        .merge(auth::router())
        .merge(protected)
}
