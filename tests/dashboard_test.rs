mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use common::{read_json, TestApp};

async fn seed_order(app: &TestApp, client: &str, date: &str, status: Option<&str>) -> String {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_name": client,
                "order_location": "Gachibowli",
                "people_count": 80,
                "order_date": date,
                "order_time": "13:00",
                "order_occasion": "housewarming",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    if let Some(status) = status {
        let response = app
            .request_authenticated(
                Method::PUT,
                &format!("/api/v1/orders/{order_id}/status"),
                Some(json!({ "status": status })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    order_id
}

#[tokio::test]
async fn today_view_only_lists_orders_dated_today() {
    let app = TestApp::new().await;

    let today = Utc::now().date_naive();
    let today_id = seed_order(&app, "Asha Rao", &today.to_string(), None).await;
    seed_order(
        &app,
        "Vikram Shetty",
        &(today + Duration::days(3)).to_string(),
        None,
    )
    .await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/dashboard/today", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], today_id.as_str());
}

#[tokio::test]
async fn pending_view_excludes_confirmed_orders() {
    let app = TestApp::new().await;

    let today = Utc::now().date_naive();
    let draft_id = seed_order(&app, "Asha Rao", &(today + Duration::days(1)).to_string(), None).await;
    let pending_id = seed_order(
        &app,
        "Vikram Shetty",
        &(today + Duration::days(2)).to_string(),
        Some("P"),
    )
    .await;
    seed_order(
        &app,
        "Meera Iyer",
        &(today + Duration::days(2)).to_string(),
        Some("confirmed"),
    )
    .await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/dashboard/pending", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|order| order["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&draft_id.as_str()));
    assert!(ids.contains(&pending_id.as_str()));
}

#[tokio::test]
async fn history_lists_orders_newest_event_first() {
    let app = TestApp::new().await;

    let today = Utc::now().date_naive();
    let last_week = seed_order(
        &app,
        "Asha Rao",
        &(today - Duration::days(7)).to_string(),
        Some("C"),
    )
    .await;
    let yesterday = seed_order(
        &app,
        "Vikram Shetty",
        &(today - Duration::days(1)).to_string(),
        Some("C"),
    )
    .await;
    let next_week = seed_order(
        &app,
        "Meera Iyer",
        &(today + Duration::days(5)).to_string(),
        None,
    )
    .await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/dashboard/history", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|order| order["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![next_week.as_str(), yesterday.as_str(), last_week.as_str()]
    );

    // Limit caps the page.
    let response = app
        .request_authenticated(Method::GET, "/api/v1/dashboard/history?limit=1", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
