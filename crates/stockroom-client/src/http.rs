//! Typed HTTP client, one method per API endpoint.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use stockroom_core::account::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use stockroom_core::movement::MovementRequest;
use stockroom_core::product::{ProductDraft, ProductPatch};
use stockroom_core::report::ReportSummary;
use stockroom_core::request::NewRequest;
use stockroom_core::supplier::SupplierDraft;
use stockroom_core::{Alert, Movement, Product, ReplenishmentRequest, RequestStatus, Supplier};

use crate::error::{ClientError, ClientResult};

/// `{"error": <code>, "message": <text>}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[allow(dead_code)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut client = ApiClient::new(base_url);
        client.token = Some(token.into());
        client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends and turns non-2xx answers into [`ClientError::Api`].
    async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.error, body.message),
            Err(_) => ("unknown".to_string(), text),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = self.send(builder).await?;
        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_json(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(self.request(Method::POST, path).json(body))
            .await
    }

    // =========================================================================
    // System & auth
    // =========================================================================

    /// True when the server and its database answer.
    pub async fn health(&self) -> bool {
        match self.request(Method::GET, "/health").send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn register(&self, body: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.post("/auth/register", body).await
    }

    /// Logs in and keeps the token for later calls.
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/auth/login", &body).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn list_products(&self, query: Option<&str>) -> ClientResult<Vec<Product>> {
        let mut builder = self.request(Method::GET, "/products");
        if let Some(q) = query {
            builder = builder.query(&[("q", q)]);
        }
        self.send_json(builder).await
    }

    pub async fn get_product(&self, id: &str) -> ClientResult<Product> {
        self.get(&format!("/products/{}", id)).await
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> ClientResult<Product> {
        self.post("/products", draft).await
    }

    pub async fn update_product(&self, id: &str, patch: &ProductPatch) -> ClientResult<Product> {
        self.send_json(
            self.request(Method::PUT, &format!("/products/{}", id))
                .json(patch),
        )
        .await
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        let _: MessageBody = self
            .send_json(self.request(Method::DELETE, &format!("/products/{}", id)))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    pub async fn list_suppliers(&self) -> ClientResult<Vec<Supplier>> {
        self.get("/suppliers").await
    }

    pub async fn get_supplier(&self, id: &str) -> ClientResult<Supplier> {
        self.get(&format!("/suppliers/{}", id)).await
    }

    pub async fn create_supplier(&self, draft: &SupplierDraft) -> ClientResult<Supplier> {
        self.post("/suppliers", draft).await
    }

    // =========================================================================
    // Movements
    // =========================================================================

    pub async fn list_movements(&self, product_id: Option<&str>) -> ClientResult<Vec<Movement>> {
        let mut builder = self.request(Method::GET, "/movements");
        if let Some(id) = product_id {
            builder = builder.query(&[("productId", id)]);
        }
        self.send_json(builder).await
    }

    pub async fn create_movement(&self, request: &MovementRequest) -> ClientResult<Movement> {
        self.post("/movements", request).await
    }

    // =========================================================================
    // Alerts
    // =========================================================================

    pub async fn list_alerts(&self, unread_only: bool) -> ClientResult<Vec<Alert>> {
        let mut builder = self.request(Method::GET, "/alerts");
        if unread_only {
            builder = builder.query(&[("unread", "true")]);
        }
        self.send_json(builder).await
    }

    /// Alerts the server raised on this call.
    pub async fn refresh_alerts(&self) -> ClientResult<Vec<Alert>> {
        self.send_json(self.request(Method::POST, "/alerts/refresh"))
            .await
    }

    pub async fn mark_alert_read(&self, id: &str) -> ClientResult<()> {
        let _: MessageBody = self
            .send_json(self.request(Method::POST, &format!("/alerts/{}/read", id)))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Replenishment requests
    // =========================================================================

    pub async fn list_requests(&self) -> ClientResult<Vec<ReplenishmentRequest>> {
        self.get("/requests").await
    }

    pub async fn submit_request(&self, body: &NewRequest) -> ClientResult<ReplenishmentRequest> {
        self.post("/requests", body).await
    }

    pub async fn review_request(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> ClientResult<ReplenishmentRequest> {
        self.send_json(
            self.request(Method::PUT, &format!("/requests/{}/status", id))
                .json(&json!({ "status": status })),
        )
        .await
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Movements between `start` and `end` (`YYYY-MM-DD`, inclusive).
    pub async fn movement_report(&self, start: &str, end: &str) -> ClientResult<Vec<Movement>> {
        self.send_json(
            self.request(Method::GET, "/reports/movements")
                .query(&[("start", start), ("end", end)]),
        )
        .await
    }

    pub async fn summary(&self) -> ClientResult<ReportSummary> {
        self.get("/reports/summary").await
    }

    pub async fn products_csv(&self) -> ClientResult<String> {
        let response = self
            .send(self.request(Method::GET, "/reports/products.csv"))
            .await?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:4000/");
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert!(client.token().is_none());

        let client = ApiClient::with_token("http://localhost:4000", "abc");
        assert_eq!(client.token(), Some("abc"));
    }

    #[test]
    fn test_error_body_shape() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"conflict","message":"SKU 'A' already exists"}"#)
                .unwrap();
        assert_eq!(body.error, "conflict");
    }
}
