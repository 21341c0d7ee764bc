mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{read_json, TestApp};

#[tokio::test]
async fn catalog_crud_flow() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/food-items",
            Some(json!({
                "item_name": "Gulab Jamun",
                "item_type": true,
                "cutlery_type": "chafing_dish",
                "serving_spoon": "serving_spoon_round",
                "category": "Desserts",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["data"]["item_name"], "Gulab Jamun");
    assert_eq!(body["data"]["category"], "Desserts");
    let item_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/food-items/{item_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["cutlery_type"], "chafing_dish");
    assert_eq!(body["data"]["serving_spoon"], "serving_spoon_round");

    let response = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/food-items/{item_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request_authenticated(Method::GET, &format!("/api/v1/food-items/{item_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_category() {
    let app = TestApp::new().await;

    app.seed_food_item("Paneer Tikka", "platter", "tong").await;
    app.seed_food_item("Veg Spring Rolls", "platter", "tong").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/food-items",
            Some(json!({
                "item_name": "Jeera Rice",
                "item_type": true,
                "cutlery_type": "chafing_dish",
                "serving_spoon": "serving_spoon_flat",
                "category": "Rice and Bread",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request_authenticated(Method::GET, "/api/v1/food-items", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["total"], 3);

    let response = app
        .request_authenticated(Method::GET, "/api/v1/food-items?category=Starters", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["total"], 2);
    let names: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["item_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Paneer Tikka", "Veg Spring Rolls"]);
}

#[tokio::test]
async fn create_rejects_bad_payloads() {
    let app = TestApp::new().await;

    // Category outside the fixed vocabulary.
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/food-items",
            Some(json!({
                "item_name": "Mulligatawny",
                "item_type": true,
                "cutlery_type": "chafing_dish",
                "serving_spoon": "serving_spoon_round",
                "category": "Soups",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown serving hardware never reaches the database.
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/food-items",
            Some(json!({
                "item_name": "Paneer Tikka",
                "item_type": true,
                "cutlery_type": "cauldron",
                "serving_spoon": "tong",
                "category": "Starters",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
