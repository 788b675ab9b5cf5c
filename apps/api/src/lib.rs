//! # Stockroom API
//!
//! axum server exposing the inventory over JSON.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Stockroom API                                  │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  TraceLayer ─► CorsLayer ─► Router                               │  │
//! │  │                                                                  │  │
//! │  │   public:     /health   /auth/register   /auth/login             │  │
//! │  │   protected:  require_auth ─► handler ─► user.require(cap)       │  │
//! │  │               /products /suppliers /movements /alerts            │  │
//! │  │               /requests /reports                                 │  │
//! │  └───────────────────────────────┬──────────────────────────────────┘  │
//! │                                  │                                      │
//! │  ┌───────────────────────────────▼──────────────────────────────────┐  │
//! │  │  Services:  InventoryService  RequestService  AccountService     │  │
//! │  └───────────────────────────────┬──────────────────────────────────┘  │
//! │                                  │                                      │
//! │  ┌───────────────────────────────▼──────────────────────────────────┐  │
//! │  │  stockroom-db (SQLite)        stockroom-core (rules)             │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `PORT` - listen port (default: 4000)
//! - `BIND_ADDR` - listen address (default: 0.0.0.0)
//! - `DATABASE_PATH` - SQLite file (default: stockroom.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_LIFETIME_SECS` - Token lifetime (default: 86400)
//! - `CORS_ALLOWED_ORIGIN` - Allowed origin (default: any)
//! - `LOG_FORMAT` - `pretty` or `json`

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use stockroom_db::Database;

use crate::auth::JwtManager;
use crate::services::{AccountService, InventoryService, RequestService};

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);
        AppState {
            db,
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        }
    }

    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(self.db.clone())
    }

    pub fn requests(&self) -> RequestService {
        RequestService::new(self.db.clone())
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.db.clone(), self.jwt.clone())
    }
}

/// Build the full HTTP router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_allowed_origin.as_deref());

    routes::router(state.clone())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin),
        Some(Err(_)) => {
            warn!("CORS_ALLOWED_ORIGIN is not a valid header value; allowing any origin");
            base.allow_origin(Any)
        }
        None => base.allow_origin(Any),
    }
}
