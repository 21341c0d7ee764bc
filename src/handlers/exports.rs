//! Export endpoints: the derived supply checklist as JSON and the
//! three printable PDFs (checklist, name tags, invoice).

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::consts as perm;
use crate::services::checklist::{build_checklist, Checklist};
use crate::services::orders::OrderResponse;
use crate::services::pdf::name_tags::LabelOptions;
use crate::services::pdf::{checklist as checklist_pdf, invoice as invoice_pdf, name_tags};
use crate::{auth::AuthUser, errors::ServiceError, ApiResponse, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct InvoiceQuery {
    /// Billing rate per guest. Falls back to the configured default.
    pub per_plate_cost: Option<f64>,
}

async fn load_order(state: &AppState, id: Uuid) -> Result<OrderResponse, ServiceError> {
    state
        .services
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Order with ID {} not found", id)))
}

fn require_export_permission(auth_user: &AuthUser) -> Result<(), ServiceError> {
    if !auth_user.has_permission(perm::EXPORTS_READ) {
        return Err(ServiceError::Forbidden(
            "Insufficient permissions to read exports".to_string(),
        ));
    }
    Ok(())
}

fn pdf_response(bytes: Vec<u8>, filename: &str) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/checklist",
    summary = "Supply checklist",
    description = "Derived packing quantities for an order",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Checklist derived", body = ApiResponse<Checklist>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_checklist(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Checklist>>, ServiceError> {
    require_export_permission(&auth_user)?;

    let order = load_order(&state, id).await?;
    let items = state.services.food_items.order_menu_details(id).await?;
    let checklist = build_checklist(order.people_count, &items);
    Ok(Json(ApiResponse::success(checklist)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/checklist/pdf",
    summary = "Checklist PDF",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "PDF generated", content_type = "application/pdf"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_checklist_pdf(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    require_export_permission(&auth_user)?;

    let order = load_order(&state, id).await?;
    let items = state.services.food_items.order_menu_details(id).await?;
    let checklist = build_checklist(order.people_count, &items);
    let bytes = checklist_pdf::render_checklist_pdf(&order, &checklist)?;
    Ok(pdf_response(bytes, "catering_checklist.pdf"))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/name-tags/pdf",
    summary = "Name tag PDF",
    description = "One label per distinct menu item, packed onto A4 sheets",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        LabelOptions,
    ),
    responses(
        (status = 200, description = "PDF generated", content_type = "application/pdf"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 400, description = "Order has no menu items", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_name_tags_pdf(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Query(options): Query<LabelOptions>,
) -> Result<impl IntoResponse, ServiceError> {
    require_export_permission(&auth_user)?;

    let order = load_order(&state, id).await?;
    let names: Vec<String> = order
        .items
        .iter()
        .map(|item| item.food_item_name.clone())
        .collect();
    let bytes = name_tags::render_name_tags_pdf(&names, &options)?;
    Ok(pdf_response(bytes, "name_tags.pdf"))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/invoice/pdf",
    summary = "Invoice PDF",
    description = "Invoice billed as headcount times the per-plate rate",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        InvoiceQuery,
    ),
    responses(
        (status = 200, description = "PDF generated", content_type = "application/pdf"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = []))
)]
pub async fn get_invoice_pdf(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<InvoiceQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    require_export_permission(&auth_user)?;

    let per_plate_cost = match query.per_plate_cost {
        Some(cost) if cost > 0.0 => cost,
        Some(_) => {
            return Err(ServiceError::InvalidInput(
                "per_plate_cost must be positive".to_string(),
            ))
        }
        None => state.config.default_per_plate_cost,
    };

    let order = load_order(&state, id).await?;
    let bytes = invoice_pdf::render_invoice_pdf(&order, per_plate_cost)?;
    Ok(pdf_response(bytes, "invoice.pdf"))
}
