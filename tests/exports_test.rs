mod common;

use axum::http::{header, Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use common::{read_bytes, read_json, TestApp};

async fn seed_order_with_menu(app: &TestApp, people_count: i32) -> String {
    let dal = app
        .seed_food_item("Dal Makhani", "chafing_dish", "serving_spoon_round")
        .await;
    let tikka = app.seed_food_item("Paneer Tikka", "platter", "tong").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_name": "Asha Rao",
                "order_location": "Jubilee Hills",
                "people_count": people_count,
                "order_date": (Utc::now().date_naive() + Duration::days(2)).to_string(),
                "order_time": "19:00",
                "order_occasion": "wedding",
                "items": [dal, tikka],
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

fn entry_count<'a>(entries: &'a [serde_json::Value], name: &str) -> &'a serde_json::Value {
    &entries
        .iter()
        .find(|entry| entry["name"] == name)
        .unwrap_or_else(|| panic!("missing checklist entry {name}"))["count"]
}

#[tokio::test]
async fn checklist_counts_follow_the_headcount() {
    let app = TestApp::new().await;
    let order_id = seed_order_with_menu(&app, 120).await;

    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/orders/{order_id}/checklist"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let entries = body["data"]["entries"].as_array().unwrap().clone();

    assert_eq!(entry_count(&entries, "Plates"), 120);
    assert_eq!(entry_count(&entries, "Spoons"), 120);
    assert_eq!(entry_count(&entries, "Chafing Dishes"), 1);
    assert_eq!(entry_count(&entries, "Platters"), 1);
    assert_eq!(entry_count(&entries, "Tongs"), 1);
    assert_eq!(entry_count(&entries, "Water Bottles"), 1);
    assert_eq!(entry_count(&entries, "Tissue Packs"), 4);
    // Two menu items: (2 + 1) / 4 tables.
    assert_eq!(entry_count(&entries, "Tables"), 0);
    assert!(entry_count(&entries, "Name Tags").is_null());
}

#[tokio::test]
async fn pdf_exports_return_pdf_documents() {
    let app = TestApp::new().await;
    let order_id = seed_order_with_menu(&app, 90).await;

    for path in [
        format!("/api/v1/orders/{order_id}/checklist/pdf"),
        format!("/api/v1/orders/{order_id}/name-tags/pdf"),
        format!("/api/v1/orders/{order_id}/invoice/pdf"),
    ] {
        let response = app.request_authenticated(Method::GET, &path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "export {path} failed");
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let bytes = read_bytes(response).await;
        assert!(bytes.starts_with(b"%PDF"), "export {path} is not a pdf");
    }
}

#[tokio::test]
async fn name_tags_require_a_menu() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_name": "Vikram Shetty",
                "order_location": "Banjara Hills",
                "people_count": 40,
                "order_date": (Utc::now().date_naive() + Duration::days(1)).to_string(),
                "order_time": "12:30",
                "order_occasion": "meeting",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/orders/{order_id}/name-tags/pdf"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invoice_rejects_a_non_positive_rate() {
    let app = TestApp::new().await;
    let order_id = seed_order_with_menu(&app, 60).await;

    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/orders/{order_id}/invoice/pdf?per_plate_cost=0"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/orders/{order_id}/invoice/pdf?per_plate_cost=325.5"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn exports_for_unknown_orders_are_not_found() {
    let app = TestApp::new().await;
    let missing = uuid::Uuid::new_v4();

    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/orders/{missing}/checklist"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
