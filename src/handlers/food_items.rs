use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::consts as perm;
use crate::handlers::ApiJson;
use crate::services::food_items::{
    CreateFoodItemRequest, FoodItemListResponse, FoodItemResponse,
};
use crate::{auth::AuthUser, errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct FoodItemListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Restrict results to one menu category.
    pub category: Option<String>,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

#[utoipa::path(
    post,
    path = "/api/v1/food-items",
    summary = "Create food item",
    description = "Add a dish to the catalog with its serving hardware",
    request_body = CreateFoodItemRequest,
    responses(
        (status = 201, description = "Food item created", body = ApiResponse<FoodItemResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn create_food_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(payload): ApiJson<CreateFoodItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    if !auth_user.has_permission(perm::FOOD_ITEMS_CREATE) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions to create food items".to_string(),
        ));
    }
    payload.validate()?;

    let item = state.services.food_items.create_food_item(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

#[utoipa::path(
    get,
    path = "/api/v1/food-items",
    summary = "List food items",
    params(FoodItemListQuery),
    responses(
        (status = 200, description = "Food items retrieved", body = ApiResponse<FoodItemListResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn list_food_items(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<FoodItemListQuery>,
) -> Result<Json<ApiResponse<FoodItemListResponse>>, ServiceError> {
    if !auth_user.has_permission(perm::FOOD_ITEMS_READ) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions to read food items".to_string(),
        ));
    }

    let result = state
        .services
        .food_items
        .list_food_items(query.page, query.limit, query.category)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

#[utoipa::path(
    get,
    path = "/api/v1/food-items/{id}",
    summary = "Get food item",
    params(("id" = Uuid, Path, description = "Food item ID")),
    responses(
        (status = 200, description = "Food item retrieved", body = ApiResponse<FoodItemResponse>),
        (status = 404, description = "Food item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_food_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FoodItemResponse>>, ServiceError> {
    if !auth_user.has_permission(perm::FOOD_ITEMS_READ) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions to read food items".to_string(),
        ));
    }

    let item = state
        .services
        .food_items
        .get_food_item(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Food item with ID {} not found", id)))?;
    Ok(Json(ApiResponse::success(item)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/food-items/{id}",
    summary = "Delete food item",
    description = "Remove a dish from the catalog; menus keep their name snapshots",
    params(("id" = Uuid, Path, description = "Food item ID")),
    responses(
        (status = 200, description = "Food item deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Food item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn delete_food_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    if !auth_user.has_permission(perm::FOOD_ITEMS_DELETE) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions to delete food items".to_string(),
        ));
    }

    state.services.food_items.delete_food_item(id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": id }),
    )))
}
