mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tokio::sync::mpsc;

use catering_api::auth::{AuthConfig, AuthService};
use catering_api::config::AppConfig;
use catering_api::events::{Event, EventSender};
use catering_api::db;

use common::{read_json, TestApp};

#[tokio::test]
async fn register_login_and_use_the_token() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({
                "name": "Meera Iyer",
                "email": "meera@example.com",
                "password": "another-l0ng-password",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["email"], "meera@example.com");

    // The same email cannot register twice.
    let response = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({
                "name": "Meera Iyer",
                "email": "meera@example.com",
                "password": "another-l0ng-password",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({
                "email": "meera@example.com",
                "password": "another-l0ng-password",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let tokens = read_json(response).await;
    let access = tokens["access_token"].as_str().unwrap().to_string();
    assert_eq!(tokens["token_type"], "Bearer");

    let response = app
        .request(Method::GET, "/api/v1/orders", None, Some(&access))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_with_a_wrong_password_fails() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({
                "email": "staff@example.com",
                "password": "wrong-password",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rotates_the_token_pair() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({
                "email": "staff@example.com",
                "password": "s3cure-test-password",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let tokens = read_json(response).await;
    let refresh = tokens["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::POST,
            "/auth/refresh",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = read_json(response).await;
    let new_access = rotated["access_token"].as_str().unwrap().to_string();
    assert_ne!(rotated["refresh_token"].as_str().unwrap(), refresh);

    let response = app
        .request(Method::GET, "/api/v1/orders", None, Some(&new_access))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The old refresh token was consumed by the rotation.
    let response = app
        .request(
            Method::POST,
            "/auth/refresh",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn account_lifecycle_events_are_published() {
    let db_file = format!(
        "catering_test_{}.db",
        uuid::Uuid::new_v4().simple()
    );
    let mut cfg = AppConfig::new(
        format!("sqlite://{db_file}?mode=rwc"),
        "integration_test_secret_that_is_long_enough_for_hs256_signing_0123456789".to_string(),
        3600,
        86_400,
        "127.0.0.1".to_string(),
        18_080,
        "test".to_string(),
    );
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .expect("create test database");
    db::run_migrations(&pool).await.expect("run migrations");

    let (event_tx, mut event_rx) = mpsc::channel(8);
    let auth_cfg = AuthConfig::new(
        cfg.jwt_secret.clone(),
        cfg.auth_audience.clone(),
        cfg.auth_issuer.clone(),
        Duration::from_secs(3600),
        Duration::from_secs(86_400),
    );
    let service = AuthService::new(auth_cfg, Arc::new(pool))
        .with_event_sender(Arc::new(EventSender::new(event_tx)));

    let user = service
        .register("Meera Iyer", "meera@example.com", "another-l0ng-password")
        .await
        .expect("register");
    assert!(matches!(
        event_rx.recv().await,
        Some(Event::UserRegistered(id)) if id == user.id
    ));

    service
        .login("meera@example.com", "another-l0ng-password")
        .await
        .expect("login");
    assert!(matches!(
        event_rx.recv().await,
        Some(Event::UserLoggedIn(id)) if id == user.id
    ));

    let _ = std::fs::remove_file(&db_file);
}

#[tokio::test]
async fn logout_revokes_the_access_token() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({
                "email": "staff@example.com",
                "password": "s3cure-test-password",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let tokens = read_json(response).await;
    let access = tokens["access_token"].as_str().unwrap().to_string();

    let response = app
        .request(Method::POST, "/auth/logout", None, Some(&access))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(Method::GET, "/api/v1/orders", None, Some(&access))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
