use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Registers the JWT bearer scheme referenced by the endpoint docs.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catering API",
        version = "1.0.0",
        description = r#"
# Catering Back-Office API

Single-tenant API for running a catering business: order scheduling,
the food catalog, packing checklists, and printable exports.

## Features

- **Orders**: Schedule catering orders with client, venue, headcount,
  and menu; track them through draft, pending, in-progress, and
  confirmed.
- **Food Catalog**: Dishes with their serving hardware and menu
  category.
- **Supply Checklist**: Packing quantities derived from headcount and
  the selected menu, as JSON or a printable PDF.
- **Exports**: Buffet name tag sheets and per-plate invoices as PDFs.
- **Dashboards**: Today's schedule, the pending queue, and history.
- **Calendar Sync**: Orders mirrored to Google Calendar when the
  client supplies an OAuth token.

## Authentication

All API endpoints require a JWT in the Authorization header:

```
Authorization: Bearer <your-jwt-token>
```

## Error Handling

Errors use a consistent JSON format with appropriate status codes:

```json
{
  "error": "Bad Request",
  "message": "Validation failed",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints take `page` (default: 1) and `limit` (default: 20)
query parameters.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080/api/v1", description = "Local development")
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Orders", description = "Order scheduling and menus"),
        (name = "Food Items", description = "Food catalog endpoints"),
        (name = "Dashboard", description = "Back-office dashboard feeds"),
        (name = "Exports", description = "Checklist and PDF exports"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Orders
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::create_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::delete_order,
        crate::handlers::orders::get_order_items,

        // Food catalog
        crate::handlers::food_items::list_food_items,
        crate::handlers::food_items::get_food_item,
        crate::handlers::food_items::create_food_item,
        crate::handlers::food_items::delete_food_item,

        // Dashboards
        crate::handlers::dashboard::today,
        crate::handlers::dashboard::pending,
        crate::handlers::dashboard::history,

        // Exports
        crate::handlers::exports::get_checklist,
        crate::handlers::exports::get_checklist_pdf,
        crate::handlers::exports::get_name_tags_pdf,
        crate::handlers::exports::get_invoice_pdf,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::ListQuery,

            // Order types
            crate::services::orders::OrderResponse,
            crate::services::orders::OrderItemResponse,
            crate::services::orders::OrderListResponse,
            crate::services::orders::CreateOrderRequest,
            crate::services::orders::UpdateOrderRequest,
            crate::handlers::orders::UpdateOrderStatusRequest,
            crate::models::OrderStatus,

            // Food catalog types
            crate::services::food_items::FoodItemResponse,
            crate::services::food_items::FoodItemListResponse,
            crate::services::food_items::CreateFoodItemRequest,
            crate::models::CutleryType,
            crate::models::ServingSpoon,

            // Checklist types
            crate::services::checklist::Checklist,
            crate::services::checklist::ChecklistEntry,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_core_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Catering API"));
        assert!(json.contains("/api/v1/orders"));
        assert!(json.contains("/api/v1/dashboard/today"));
    }
}
