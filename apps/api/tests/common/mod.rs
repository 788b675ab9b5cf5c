//! Test harness: the full router over a fresh in-memory database.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use stockroom_api::{build_router, ApiConfig, AppState};
use stockroom_core::{Role, User};
use stockroom_db::{Database, DbConfig};

pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database");
        let config = ApiConfig {
            jwt_secret: "test_secret_key_for_testing_purposes_only".to_string(),
            ..ApiConfig::default()
        };
        let state = AppState::new(db, config);
        TestApp {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Inserts a user directly and returns a token for it. Skips argon2 so
    /// tests that only need a role stay fast.
    pub async fn token_for(&self, username: &str, role: Role) -> String {
        let user = User {
            id: format!("u-{}", username),
            username: username.to_string(),
            email: format!("{}@example.pe", username),
            password_hash: "unused".to_string(),
            role,
            created_at: Utc::now(),
        };
        self.state.db.users().insert(&user).await.expect("insert user");
        self.state.jwt.issue(&user).expect("issue token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(method, uri, token, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn create_supplier(&self, token: &str, name: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/suppliers",
                Some(token),
                Some(json!({ "name": name, "email": "ventas@example.pe" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    pub async fn create_product(&self, token: &str, body: Value) -> Value {
        let (status, body) = self
            .send(Method::POST, "/products", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

pub fn product_body(name: &str, sku: &str, supplier_id: &str, stock: i64, min_stock: i64) -> Value {
    json!({
        "name": name,
        "sku": sku,
        "category": "Lacteos",
        "priceCents": 450,
        "stock": stock,
        "minStock": min_stock,
        "maxStock": 100,
        "supplierId": supplier_id,
        "unit": "unidad",
        "location": "Pasillo 1",
    })
}
