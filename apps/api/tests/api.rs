//! End-to-end tests through the full router.

mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use serde_json::json;

use common::{product_body, TestApp};
use stockroom_core::Role;

#[tokio::test]
async fn health_reports_database() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = app
        .send(Method::GET, "/products", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // unknown paths are not hidden behind auth
    let (status, _) = app.send(Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_then_login() {
    let app = TestApp::new().await;

    // first account may bootstrap as admin
    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "username": "admin",
                "email": "admin@example.pe",
                "password": "secreto123",
                "role": "admin",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("passwordHash").is_none());

    // later elevated registrations need a token
    let (status, _) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "username": "gerente",
                "email": "gerente@example.pe",
                "password": "secreto123",
                "role": "manager",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "secreto123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["username"], "admin");

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/register",
            Some(&token),
            Some(json!({
                "username": "gerente",
                "email": "gerente@example.pe",
                "password": "secreto123",
                "role": "manager",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");
}

#[tokio::test]
async fn product_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.token_for("admin", Role::Admin).await;
    let supplier = app.create_supplier(&admin, "Gloria S.A.").await;
    let supplier_id = supplier["id"].as_str().unwrap();

    let product = app
        .create_product(
            &admin,
            product_body("Leche Gloria 1L", "LECHE-1L", supplier_id, 20, 10),
        )
        .await;
    let id = product["id"].as_str().unwrap();
    assert_eq!(product["stock"], 20);
    assert_eq!(product["priceCents"], 450);

    // duplicate SKU, any case
    let (status, body) = app
        .send(
            Method::POST,
            "/products",
            Some(&admin),
            Some(product_body("Otra leche", "leche-1l", supplier_id, 1, 0)),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    // unknown supplier
    let (status, _) = app
        .send(
            Method::POST,
            "/products",
            Some(&admin),
            Some(product_body("Yogurt", "YOG-1", "missing", 1, 0)),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // malformed body
    let (status, body) = app
        .send(Method::POST, "/products", Some(&admin), Some(json!({ "name": 3 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_argument");

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/products/{id}"),
            Some(&admin),
            Some(json!({ "location": "Pasillo 7", "stock": 40 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Pasillo 7");
    assert_eq!(body["stock"], 40);

    let (_, body) = app
        .send(Method::GET, "/products?q=gloria", Some(&admin), None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (_, body) = app
        .send(Method::GET, "/products?q=arroz", Some(&admin), None)
        .await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = app
        .send(Method::DELETE, &format!("/products/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted");

    let (status, _) = app
        .send(Method::GET, &format!("/products/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn capabilities_are_checked_per_route() {
    let app = TestApp::new().await;
    let admin = app.token_for("admin", Role::Admin).await;
    let employee = app.token_for("cajero", Role::Employee).await;
    let supplier = app.create_supplier(&admin, "Alicorp").await;
    let product = app
        .create_product(
            &admin,
            product_body("Arroz 5kg", "ARROZ-5", supplier["id"].as_str().unwrap(), 20, 5),
        )
        .await;

    // employees can look
    let (status, _) = app.send(Method::GET, "/products", Some(&employee), None).await;
    assert_eq!(status, StatusCode::OK);

    // but not touch stock
    let (status, body) = app
        .send(
            Method::POST,
            "/movements",
            Some(&employee),
            Some(json!({
                "productId": product["id"],
                "type": "exit",
                "quantity": 1,
                "reason": "Venta",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = app
        .send(
            Method::POST,
            "/suppliers",
            Some(&employee),
            Some(json!({ "name": "Nuevo" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn movements_move_stock_and_raise_alerts() {
    let app = TestApp::new().await;
    let manager = app.token_for("gerente", Role::Manager).await;
    let supplier = app.create_supplier(&manager, "Gloria S.A.").await;
    let product = app
        .create_product(
            &manager,
            product_body("Leche Gloria 1L", "LECHE-1L", supplier["id"].as_str().unwrap(), 12, 10),
        )
        .await;
    let id = product["id"].as_str().unwrap();

    let movement = |kind: &str, quantity: i64| {
        json!({
            "productId": id,
            "type": kind,
            "quantity": quantity,
            "reason": "Ajuste",
        })
    };

    let (status, body) = app
        .send(Method::POST, "/movements", Some(&manager), Some(movement("entry", 8)))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["type"], "entry");
    assert_eq!(body["quantity"], 8);

    let (_, body) = app
        .send(Method::GET, &format!("/products/{id}"), Some(&manager), None)
        .await;
    assert_eq!(body["stock"], 20);

    // low stock
    app.send(Method::POST, "/movements", Some(&manager), Some(movement("exit", 15)))
        .await;
    let (_, alerts) = app.send(Method::GET, "/alerts", Some(&manager), None).await;
    let alerts = alerts.as_array().unwrap().clone();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["type"], "low_stock");
    assert_eq!(alerts[0]["severity"], "medium");

    // oversized exit clamps at zero
    let (status, _) = app
        .send(Method::POST, "/movements", Some(&manager), Some(movement("exit", 99)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = app
        .send(Method::GET, &format!("/products/{id}"), Some(&manager), None)
        .await;
    assert_eq!(body["stock"], 0);

    let (_, unread) = app
        .send(Method::GET, "/alerts?unread=true", Some(&manager), None)
        .await;
    let unread = unread.as_array().unwrap().clone();
    assert_eq!(unread.len(), 2);
    assert_eq!(unread[1]["type"], "out_of_stock");
    assert_eq!(unread[1]["severity"], "high");

    // nothing new to derive
    let (_, fresh) = app
        .send(Method::POST, "/alerts/refresh", Some(&manager), None)
        .await;
    assert!(fresh.as_array().unwrap().is_empty());

    let alert_id = unread[0]["id"].as_str().unwrap();
    let (status, _) = app
        .send(
            Method::POST,
            &format!("/alerts/{alert_id}/read"),
            Some(&manager),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, unread) = app
        .send(Method::GET, "/alerts?unread=true", Some(&manager), None)
        .await;
    assert_eq!(unread.as_array().unwrap().len(), 1);

    let (_, history) = app
        .send(
            Method::GET,
            &format!("/movements?productId={id}"),
            Some(&manager),
            None,
        )
        .await;
    assert_eq!(history.as_array().unwrap().len(), 3);

    // invalid movements
    let (status, _) = app
        .send(Method::POST, "/movements", Some(&manager), Some(movement("entry", 0)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .send(Method::POST, "/movements", Some(&manager), Some(movement("transfer", 1)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .send(
            Method::POST,
            "/movements",
            Some(&manager),
            Some(json!({
                "productId": "missing",
                "type": "entry",
                "quantity": 1,
                "reason": "Ajuste",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn replenishment_request_workflow() {
    let app = TestApp::new().await;
    let manager = app.token_for("gerente", Role::Manager).await;
    let employee = app.token_for("cajero", Role::Employee).await;
    let supplier = app.create_supplier(&manager, "Alicorp").await;
    let product = app
        .create_product(
            &manager,
            product_body("Azucar Rubia 1kg", "AZU-1", supplier["id"].as_str().unwrap(), 4, 5),
        )
        .await;

    let (status, request) = app
        .send(
            Method::POST,
            "/requests",
            Some(&employee),
            Some(json!({
                "productId": product["id"],
                "quantity": 30,
                "reason": "Quedan pocas bolsas",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{request}");
    assert_eq!(request["status"], "pending");
    assert_eq!(request["requestedBy"], "u-cajero");
    let path = format!("/requests/{}/status", request["id"].as_str().unwrap());

    // employees can't review
    let (status, _) = app
        .send(Method::PUT, &path, Some(&employee), Some(json!({ "status": "approved" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::PUT, &path, Some(&manager), Some(json!({ "status": "approved" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, _) = app
        .send(Method::PUT, &path, Some(&manager), Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app.send(Method::GET, "/requests", Some(&employee), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn reports() {
    let app = TestApp::new().await;
    let admin = app.token_for("admin", Role::Admin).await;
    let supplier = app.create_supplier(&admin, "Gloria S.A.").await;
    let product = app
        .create_product(
            &admin,
            product_body("Leche, entera", "LECHE-1L", supplier["id"].as_str().unwrap(), 10, 5),
        )
        .await;
    app.send(
        Method::POST,
        "/movements",
        Some(&admin),
        Some(json!({
            "productId": product["id"],
            "type": "entry",
            "quantity": 5,
            "reason": "Compra",
        })),
    )
    .await;

    let today = Utc::now().date_naive();
    let (status, body) = app
        .send(
            Method::GET,
            &format!("/reports/movements?start={today}&end={today}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = app
        .send(
            Method::GET,
            "/reports/movements?start=2000-01-01&end=2000-01-31",
            Some(&admin),
            None,
        )
        .await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = app
        .send(
            Method::GET,
            "/reports/movements?start=2024-02-01&end=2024-01-01",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::GET, "/reports/movements", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, summary) = app
        .send(Method::GET, "/reports/summary", Some(&admin), None)
        .await;
    assert_eq!(summary["inventory"]["productCount"], 1);
    assert_eq!(summary["inventory"]["totalUnits"], 15);
    assert_eq!(summary["movements"]["count"], 1);

    let (status, bytes) = app
        .send_raw(Method::GET, "/reports/products.csv", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(bytes).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("sku,name,category,stock,minStock,maxStock,price,unit,location,status")
    );
    assert!(lines.next().unwrap().starts_with("LECHE-1L,\"Leche, entera\",Lacteos,15,"));
}
