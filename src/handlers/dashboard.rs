//! Dashboard feeds behind the three back-office views: today's
//! schedule, the pending queue, and recent history.

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::consts as perm;
use crate::services::orders::OrderResponse;
use crate::{auth::AuthUser, errors::ServiceError, ApiResponse, AppState};

const DEFAULT_HISTORY_LIMIT: u64 = 50;

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Maximum number of orders to return (default: 50).
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/today",
    summary = "Today's orders",
    description = "Orders scheduled for today, earliest serving time first",
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn today(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<OrderResponse>>>, ServiceError> {
    if !auth_user.has_permission(perm::DASHBOARD_READ) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions to read dashboards".to_string(),
        ));
    }

    let orders = state.services.orders.dashboard_today().await?;
    Ok(Json(ApiResponse::success(orders)))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/pending",
    summary = "Pending orders",
    description = "Orders not yet confirmed, soonest event first",
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn pending(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<OrderResponse>>>, ServiceError> {
    if !auth_user.has_permission(perm::DASHBOARD_READ) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions to read dashboards".to_string(),
        ));
    }

    let orders = state.services.orders.dashboard_pending().await?;
    Ok(Json(ApiResponse::success(orders)))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/history",
    summary = "Order history",
    description = "Most recent orders by event date",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn history(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<OrderResponse>>>, ServiceError> {
    if !auth_user.has_permission(perm::DASHBOARD_READ) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions to read dashboards".to_string(),
        ));
    }

    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500);
    let orders = state.services.orders.dashboard_history(limit).await?;
    Ok(Json(ApiResponse::success(orders)))
}
