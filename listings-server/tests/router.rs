//! Router-level tests
//!
//! The pool connects lazily to an unreachable address, so every request here
//! must be answered before the database is touched: routing, auth, rate
//! limiting, validation and media serving.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use listings_server::auth::admin_auth::create_token;
use listings_server::auth::menu_token::create_menu_token;
use listings_server::email::EmailService;
use listings_server::{AppState, Config, api};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";

fn test_config(media_dir: &TempDir) -> Config {
    Config {
        database_url: "postgres://invalid@127.0.0.1:1/none".into(),
        http_port: 0,
        environment: "development".into(),
        jwt_secret: SECRET.into(),
        media_dir: media_dir.path().to_string_lossy().into_owned(),
        public_base_url: "http://localhost:8080".into(),
        venue_timezone: chrono_tz::Europe::Madrid,
        ses_from_email: "noreply@example.com".into(),
        notify_email: None,
        email_enabled: false,
        cors_allowed_origins: Vec::new(),
    }
}

fn app(media_dir: &TempDir) -> Router {
    let config = test_config(media_dir);
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy(&config.database_url)
        .unwrap();
    let email = EmailService::log_only(&config.ses_from_email, None);
    let state = AppState::from_parts(pool, &config, email);
    api::create_router(state, &config)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn admin_token() -> String {
    create_token(1, "admin@example.com", SECRET).unwrap()
}

#[tokio::test]
async fn health_reports_service() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(&dir)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "listings-server");
}

#[tokio::test]
async fn admin_routes_require_admin_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let response = app
        .clone()
        .oneshot(Request::get("/api/admin/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], 1001);

    let (menu_token, _) = create_menu_token(7, "hash", SECRET).unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/admin/me")
                .header(header::AUTHORIZATION, format!("Bearer {menu_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let forged = create_token(1, "admin@example.com", "another-secret").unwrap();
    let response = app
        .oneshot(
            Request::get("/api/admin/bookings")
                .header(header::AUTHORIZATION, format!("Bearer {forged}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_rejects_invalid_fields() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(&dir)
        .oneshot(json_request(
            "POST",
            "/api/bookings",
            json!({
                "venue_kind": "restaurant",
                "venue_id": 1,
                "guest_name": "  ",
                "guest_email": "ana@example.com",
                "booking_date": "2099-01-01",
                "party_size": 2
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 7);
}

#[tokio::test]
async fn booking_rejects_past_date() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(&dir)
        .oneshot(json_request(
            "POST",
            "/api/bookings",
            json!({
                "venue_kind": "spa",
                "venue_id": 1,
                "guest_name": "Ana",
                "guest_email": "ana@example.com",
                "booking_date": "2001-05-01",
                "booking_time": "20:00",
                "party_size": 2
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 4003);
}

#[tokio::test]
async fn booking_rejects_unknown_venue_kind() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(&dir)
        .oneshot(json_request(
            "POST",
            "/api/bookings",
            json!({
                "venue_kind": "casino",
                "venue_id": 1,
                "guest_name": "Ana",
                "guest_email": "ana@example.com",
                "booking_date": "2099-01-01",
                "party_size": 2
            }),
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn menu_upload_requires_token_for_that_eatery() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let upload = |token: Option<String>| {
        let mut builder = Request::post("/api/eateries/42/menu")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=X");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from("--X--\r\n")).unwrap()
    };

    let response = app.clone().oneshot(upload(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], 5003);

    let (other_eatery, _) = create_menu_token(41, "hash", SECRET).unwrap();
    let response = app.clone().oneshot(upload(Some(other_eatery))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.oneshot(upload(Some(admin_token()))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_is_rate_limited() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    // Malformed bodies never reach the database but still count
    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/admin/login", json!({})))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    let response = app
        .oneshot(json_request("POST", "/api/admin/login", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(response).await["code"], 9);
}

#[tokio::test]
async fn media_serves_stored_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("menus")).unwrap();
    std::fs::write(dir.path().join("menus/abc.pdf"), b"%PDF-1.4 menu").unwrap();

    let response = app(&dir)
        .oneshot(Request::get("/media/menus/abc.pdf").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"%PDF-1.4 menu");
}

#[tokio::test]
async fn media_rejects_traversal_and_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let response = app
        .clone()
        .oneshot(
            Request::get("/media/venues/../../etc/passwd")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(Request::get("/media/venues/missing.jpg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn menu_password_is_validated_before_storage() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = json_request(
        "PUT",
        "/api/admin/eateries/42/menu-password",
        json!({ "password": "abc" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", admin_token()).parse().unwrap(),
    );

    let response = app(&dir).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 1005);
}

#[tokio::test]
async fn admin_venue_create_is_validated_before_storage() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = json_request(
        "POST",
        "/api/admin/restaurants",
        json!({ "name": "", "price_range": 2 }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", admin_token()).parse().unwrap(),
    );

    let response = app(&dir).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn events_have_no_status_route() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(&dir)
        .oneshot(Request::get("/api/events/1/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
