use crate::{
    db::DbPool,
    entities::food_item::{
        self, ActiveModel as FoodItemActiveModel, Entity as FoodItemEntity, Model as FoodItemModel,
    },
    entities::order_food_item::{self, Entity as OrderFoodItemEntity},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{self, CutleryType, ServingSpoon},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateFoodItemRequest {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Item name must be between 3 and 100 characters"
    ))]
    pub item_name: String,

    /// true = vegetarian
    pub item_type: bool,

    pub cutlery_type: CutleryType,
    pub serving_spoon: ServingSpoon,

    #[validate(custom = "validate_category")]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FoodItemResponse {
    pub id: Uuid,
    pub item_name: String,
    pub item_type: bool,
    pub cutlery_type: CutleryType,
    pub serving_spoon: ServingSpoon,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FoodItemListResponse {
    pub items: Vec<FoodItemResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

fn validate_category(value: &str) -> Result<(), validator::ValidationError> {
    if !models::is_known_category(value) {
        let mut err = validator::ValidationError::new("category");
        err.message = Some("category is not a recognized menu category".into());
        return Err(err);
    }
    Ok(())
}

/// Service for managing the food catalog
#[derive(Clone)]
pub struct FoodItemService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl FoodItemService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Adds a new item to the catalog
    #[instrument(skip(self, request), fields(item_name = %request.item_name))]
    pub async fn create_food_item(
        &self,
        request: CreateFoodItemRequest,
    ) -> Result<FoodItemResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let item_id = Uuid::new_v4();

        let active = FoodItemActiveModel {
            id: Set(item_id),
            item_name: Set(request.item_name),
            item_type: Set(request.item_type),
            cutlery_type: Set(request.cutlery_type.as_str().to_string()),
            serving_spoon: Set(request.serving_spoon.as_str().to_string()),
            category: Set(request.category),
            created_at: Set(Utc::now()),
        };

        let model = active.insert(db).await.map_err(|e| {
            error!(error = %e, item_id = %item_id, "Failed to create food item");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item_id, "Food item created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::FoodItemCreated(item_id)).await {
                warn!(error = %e, item_id = %item_id, "Failed to send food item created event");
            }
        }

        model_to_response(model)
    }

    /// Retrieves a food item by ID
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn get_food_item(
        &self,
        item_id: Uuid,
    ) -> Result<Option<FoodItemResponse>, ServiceError> {
        let db = &*self.db_pool;

        let item = FoodItemEntity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        item.map(model_to_response).transpose()
    }

    /// Lists catalog items with pagination and an optional category filter
    #[instrument(skip(self))]
    pub async fn list_food_items(
        &self,
        page: u64,
        per_page: u64,
        category: Option<String>,
    ) -> Result<FoodItemListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = FoodItemEntity::find().order_by_asc(food_item::Column::ItemName);
        if let Some(category) = category {
            query = query.filter(food_item::Column::Category.eq(category));
        }

        let paginator = query.paginate(db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        let items = items
            .into_iter()
            .map(model_to_response)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FoodItemListResponse {
            items,
            total,
            page,
            per_page,
        })
    }

    /// Resolves an order's menu to full catalog rows, skipping items
    /// that were deleted from the catalog after the order was placed.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn order_menu_details(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<FoodItemResponse>, ServiceError> {
        let db = &*self.db_pool;

        let item_ids: Vec<Uuid> = OrderFoodItemEntity::find()
            .filter(order_food_item::Column::OrderId.eq(order_id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|row| row.food_item_id)
            .collect();

        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = FoodItemEntity::find()
            .filter(food_item::Column::Id.is_in(item_ids))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        items.into_iter().map(model_to_response).collect()
    }

    /// Removes an item from the catalog
    ///
    /// Items referenced by an order keep their denormalized name on the
    /// join rows, so past orders are unaffected.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn delete_food_item(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let item = FoodItemEntity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Food item {} not found", item_id)))?;

        FoodItemEntity::delete_by_id(item.id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(item_id = %item_id, "Food item deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::FoodItemDeleted(item_id)).await {
                warn!(error = %e, item_id = %item_id, "Failed to send food item deleted event");
            }
        }

        Ok(())
    }
}

fn model_to_response(model: FoodItemModel) -> Result<FoodItemResponse, ServiceError> {
    let cutlery_type = CutleryType::parse(&model.cutlery_type).ok_or_else(|| {
        ServiceError::InternalError(format!("Unknown cutlery type: {}", model.cutlery_type))
    })?;
    let serving_spoon = ServingSpoon::parse(&model.serving_spoon).ok_or_else(|| {
        ServiceError::InternalError(format!("Unknown serving spoon: {}", model.serving_spoon))
    })?;

    Ok(FoodItemResponse {
        id: model.id,
        item_name: model.item_name,
        item_type: model.item_type,
        cutlery_type,
        serving_spoon,
        category: model.category,
        created_at: model.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> FoodItemModel {
        FoodItemModel {
            id: Uuid::new_v4(),
            item_name: "Paneer Tikka".to_string(),
            item_type: true,
            cutlery_type: "chafing_dish".to_string(),
            serving_spoon: "tong".to_string(),
            category: "Starters".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn model_to_response_decodes_vocab() {
        let response = model_to_response(sample_model()).expect("valid model");
        assert_eq!(response.cutlery_type, CutleryType::ChafingDish);
        assert_eq!(response.serving_spoon, ServingSpoon::Tong);
    }

    #[test]
    fn model_to_response_rejects_unknown_vocab() {
        let mut model = sample_model();
        model.cutlery_type = "bucket".to_string();
        assert!(model_to_response(model).is_err());
    }

    #[test]
    fn create_request_rejects_unknown_category() {
        let request = CreateFoodItemRequest {
            item_name: "Paneer Tikka".to_string(),
            item_type: true,
            cutlery_type: CutleryType::ChafingDish,
            serving_spoon: ServingSpoon::Tong,
            category: "Soups".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
