pub mod dashboard;
pub mod exports;
pub mod food_items;
pub mod orders;

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::services;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// JSON body extractor that reports malformed or mistyped payloads as
/// 400 Bad Request, matching the documented error contract. Other
/// rejections (oversized bodies, wrong content type) keep their status.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => match rejection {
                JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                    Err(ServiceError::BadRequest(rejection.body_text()).into_response())
                }
                other => Err(other.into_response()),
            },
        }
    }
}

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<services::orders::OrderService>,
    pub food_items: Arc<services::food_items::FoodItemService>,
    pub calendar: Arc<services::calendar::CalendarService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, config: &AppConfig) -> Self {
        let orders = Arc::new(services::orders::OrderService::new(
            db_pool.clone(),
            Some(event_sender.clone()),
        ));
        let food_items = Arc::new(services::food_items::FoodItemService::new(
            db_pool,
            Some(event_sender.clone()),
        ));
        let calendar = Arc::new(services::calendar::CalendarService::new(
            config,
            Some(event_sender),
        ));

        Self {
            orders,
            food_items,
            calendar,
        }
    }
}
