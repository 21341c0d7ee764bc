use crate::{
    db::DbPool,
    entities::food_item::{self, Entity as FoodItemEntity},
    entities::order::{
        self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel,
    },
    entities::order_food_item::{
        self, ActiveModel as OrderFoodItemActiveModel, Entity as OrderFoodItemEntity,
        Model as OrderFoodItemModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::OrderStatus,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request/Response types for the order service
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Client name must be between 3 and 100 characters"
    ))]
    pub client_name: String,

    #[validate(length(
        min = 3,
        max = 100,
        message = "Order location must be between 3 and 100 characters"
    ))]
    pub order_location: String,

    #[validate(range(min = 1, message = "People count must be at least 1"))]
    pub people_count: i32,

    pub order_date: NaiveDate,

    /// 24h wall-clock time, "HH:MM"
    #[validate(custom = "validate_time_of_day")]
    pub order_time: String,

    #[validate(length(min = 1, max = 100, message = "Occasion is required"))]
    pub order_occasion: String,

    /// Food item ids to attach to the order
    #[serde(default)]
    pub items: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 3, max = 100))]
    pub client_name: Option<String>,

    #[validate(length(min = 3, max = 100))]
    pub order_location: Option<String>,

    #[validate(range(min = 1))]
    pub people_count: Option<i32>,

    pub order_date: Option<NaiveDate>,

    #[validate(custom = "validate_time_of_day")]
    pub order_time: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub order_occasion: Option<String>,

    /// When present the order's menu is replaced wholesale
    pub items: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub food_item_id: Uuid,
    pub food_item_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub client_name: String,
    pub order_location: String,
    pub people_count: i32,
    pub order_date: NaiveDate,
    pub order_time: String,
    pub order_occasion: String,
    pub order_status: OrderStatus,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

fn validate_time_of_day(value: &str) -> Result<(), validator::ValidationError> {
    if NaiveTime::parse_from_str(value, "%H:%M").is_err() {
        let mut err = validator::ValidationError::new("order_time");
        err.message = Some("order_time must be in HH:MM format".into());
        return Err(err);
    }
    Ok(())
}

/// Service for managing catering orders
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl OrderService {
    /// Creates a new order service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a new order, attaching menu items when supplied
    #[instrument(skip(self, request), fields(client_name = %request.client_name))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        let order_active_model = OrderActiveModel {
            id: Set(order_id),
            client_name: Set(request.client_name.clone()),
            order_location: Set(request.order_location),
            people_count: Set(request.people_count),
            order_date: Set(request.order_date),
            order_time: Set(request.order_time),
            order_occasion: Set(request.order_occasion),
            order_status: Set(OrderStatus::Draft.as_code().to_string()),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let order_model = order_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create order in database");
            ServiceError::DatabaseError(e)
        })?;

        let item_ids = request.items.unwrap_or_default();
        let items = self
            .insert_menu_rows(&txn, order_id, &item_ids, now)
            .await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, item_count = items.len(), "Order created successfully");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OrderCreated(order_id)).await {
                warn!(error = %e, order_id = %order_id, "Failed to send order created event");
            }
        }

        Ok(model_to_response(order_model, items))
    }

    /// Retrieves an order with its menu by ID
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        let order = OrderEntity::find_by_id(order_id).one(db).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to fetch order from database");
            ServiceError::DatabaseError(e)
        })?;

        match order {
            Some(order_model) => {
                let items = self.fetch_menu_rows(db, order_id).await?;
                Ok(Some(model_to_response(order_model, items)))
            }
            None => Ok(None),
        }
    }

    /// Lists orders with pagination, newest first
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<OrderListResponse, ServiceError> {
        let db = &*self.db_pool;

        let paginator = OrderEntity::find()
            .order_by_desc(order::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count orders");
            ServiceError::DatabaseError(e)
        })?;

        let orders = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(error = %e, page = page, per_page = per_page, "Failed to fetch orders page");
            ServiceError::DatabaseError(e)
        })?;

        let orders = self.attach_menus(db, orders).await?;

        Ok(OrderListResponse {
            orders,
            total,
            page,
            per_page,
        })
    }

    /// Updates order header fields and, when items are present, replaces
    /// the menu wholesale inside the same transaction
    #[instrument(skip(self, request), fields(order_id = %order_id))]
    pub async fn update_order(
        &self,
        order_id: Uuid,
        request: UpdateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to start transaction for order update");
            ServiceError::DatabaseError(e)
        })?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let mut active: OrderActiveModel = order.into();
        if let Some(client_name) = request.client_name {
            active.client_name = Set(client_name);
        }
        if let Some(order_location) = request.order_location {
            active.order_location = Set(order_location);
        }
        if let Some(people_count) = request.people_count {
            active.people_count = Set(people_count);
        }
        if let Some(order_date) = request.order_date {
            active.order_date = Set(order_date);
        }
        if let Some(order_time) = request.order_time {
            active.order_time = Set(order_time);
        }
        if let Some(order_occasion) = request.order_occasion {
            active.order_occasion = Set(order_occasion);
        }
        active.updated_at = Set(Some(now));

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update order");
            ServiceError::DatabaseError(e)
        })?;

        let menu_replaced = request.items.is_some();
        let items = match request.items {
            Some(item_ids) => {
                OrderFoodItemEntity::delete_many()
                    .filter(order_food_item::Column::OrderId.eq(order_id))
                    .exec(&txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                self.insert_menu_rows(&txn, order_id, &item_ids, now).await?
            }
            None => self.fetch_menu_rows(&txn, order_id).await?,
        };

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, menu_replaced = menu_replaced, "Order updated successfully");

        if let Some(event_sender) = &self.event_sender {
            let event = if menu_replaced {
                Event::OrderMenuReplaced {
                    order_id,
                    item_count: items.len(),
                }
            } else {
                Event::OrderUpdated(order_id)
            };
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, order_id = %order_id, "Failed to send order updated event");
            }
        }

        Ok(model_to_response(updated, items))
    }

    /// Updates an order's status
    ///
    /// Statuses carry no workflow rules; any of the four codes is
    /// accepted in any order.
    #[instrument(skip(self), fields(order_id = %order_id, new_status = %status))]
    pub async fn update_order_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let order = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let old_status = order.order_status.clone();

        let mut active: OrderActiveModel = order.into();
        active.order_status = Set(status.as_code().to_string());
        active.updated_at = Set(Some(now));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update order status");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, old_status = %old_status, new_status = %status, "Order status updated");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::OrderStatusChanged {
                    order_id,
                    old_status,
                    new_status: status.as_code().to_string(),
                })
                .await
            {
                warn!(error = %e, order_id = %order_id, "Failed to send status changed event");
            }
        }

        let items = self.fetch_menu_rows(db, order_id).await?;
        Ok(model_to_response(updated, items))
    }

    /// Deletes an order together with its menu rows
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_order(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        OrderFoodItemEntity::delete_many()
            .filter(order_food_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        OrderEntity::delete_by_id(order.id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(order_id = %order_id, "Order deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::OrderDeleted(order_id)).await {
                warn!(error = %e, order_id = %order_id, "Failed to send order deleted event");
            }
        }

        Ok(())
    }

    /// Returns the menu rows for an order
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order_items(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemResponse>, ServiceError> {
        let db = &*self.db_pool;

        let exists = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if exists.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Order {} not found",
                order_id
            )));
        }

        self.fetch_menu_rows(db, order_id).await
    }

    /// Orders scheduled for today, earliest serving time first
    #[instrument(skip(self))]
    pub async fn dashboard_today(&self) -> Result<Vec<OrderResponse>, ServiceError> {
        let db = &*self.db_pool;
        let today = Utc::now().date_naive();

        let orders = OrderEntity::find()
            .filter(order::Column::OrderDate.eq(today))
            .order_by_asc(order::Column::OrderTime)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.attach_menus(db, orders).await
    }

    /// Orders that have not yet been confirmed
    #[instrument(skip(self))]
    pub async fn dashboard_pending(&self) -> Result<Vec<OrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        let orders = OrderEntity::find()
            .filter(order::Column::OrderStatus.ne(OrderStatus::Confirmed.as_code()))
            .order_by_asc(order::Column::OrderDate)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.attach_menus(db, orders).await
    }

    /// Most recent orders by event date
    #[instrument(skip(self))]
    pub async fn dashboard_history(&self, limit: u64) -> Result<Vec<OrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        let orders = OrderEntity::find()
            .order_by_desc(order::Column::OrderDate)
            .limit(limit)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.attach_menus(db, orders).await
    }

    /// Inserts menu join rows, snapshotting item names
    async fn insert_menu_rows<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: Uuid,
        item_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> Result<Vec<OrderItemResponse>, ServiceError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let food_items = FoodItemEntity::find()
            .filter(food_item::Column::Id.is_in(item_ids.to_vec()))
            .all(conn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let by_id: HashMap<Uuid, &food_item::Model> =
            food_items.iter().map(|item| (item.id, item)).collect();

        let mut rows = Vec::with_capacity(item_ids.len());
        let mut responses = Vec::with_capacity(item_ids.len());
        for item_id in item_ids {
            let item = by_id.get(item_id).ok_or_else(|| {
                ServiceError::InvalidInput(format!("Unknown food item: {}", item_id))
            })?;

            let row_id = Uuid::new_v4();
            rows.push(OrderFoodItemActiveModel {
                id: Set(row_id),
                order_id: Set(order_id),
                food_item_id: Set(item.id),
                food_item_name: Set(item.item_name.clone()),
                created_at: Set(now),
            });
            responses.push(OrderItemResponse {
                id: row_id,
                food_item_id: item.id,
                food_item_name: item.item_name.clone(),
            });
        }

        OrderFoodItemEntity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(responses)
    }

    /// Fetches the menu rows for one order
    async fn fetch_menu_rows<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemResponse>, ServiceError> {
        let rows = OrderFoodItemEntity::find()
            .filter(order_food_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_food_item::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(rows.into_iter().map(item_to_response).collect())
    }

    /// Builds responses for a batch of orders with one join-row query
    async fn attach_menus<C: ConnectionTrait>(
        &self,
        conn: &C,
        orders: Vec<OrderModel>,
    ) -> Result<Vec<OrderResponse>, ServiceError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let rows = OrderFoodItemEntity::find()
            .filter(order_food_item::Column::OrderId.is_in(order_ids))
            .all(conn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut by_order: HashMap<Uuid, Vec<OrderItemResponse>> = HashMap::new();
        for row in rows {
            by_order
                .entry(row.order_id)
                .or_default()
                .push(item_to_response(row));
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                model_to_response(order, items)
            })
            .collect())
    }
}

fn item_to_response(model: OrderFoodItemModel) -> OrderItemResponse {
    OrderItemResponse {
        id: model.id,
        food_item_id: model.food_item_id,
        food_item_name: model.food_item_name,
    }
}

/// Converts an order model to response format
pub(crate) fn model_to_response(model: OrderModel, items: Vec<OrderItemResponse>) -> OrderResponse {
    let order_status =
        OrderStatus::parse(&model.order_status).unwrap_or(OrderStatus::Draft);

    OrderResponse {
        id: model.id,
        client_name: model.client_name,
        order_location: model.order_location,
        people_count: model.people_count,
        order_date: model.order_date,
        order_time: model.order_time,
        order_occasion: model.order_occasion,
        order_status,
        items,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DatabaseConnection;

    fn sample_model() -> OrderModel {
        OrderModel {
            id: Uuid::new_v4(),
            client_name: "Sharma Family".to_string(),
            order_location: "Green Banquet Hall".to_string(),
            people_count: 120,
            order_date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            order_time: "18:30".to_string(),
            order_occasion: "Wedding Reception".to_string(),
            order_status: "P".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn model_to_response_decodes_status() {
        let model = sample_model();
        let id = model.id;

        let response = model_to_response(model, Vec::new());

        assert_eq!(response.id, id);
        assert_eq!(response.order_status, OrderStatus::Pending);
        assert_eq!(response.people_count, 120);
        assert!(response.items.is_empty());
    }

    #[test]
    fn unknown_status_code_falls_back_to_draft() {
        let mut model = sample_model();
        model.order_status = "X".to_string();

        let response = model_to_response(model, Vec::new());
        assert_eq!(response.order_status, OrderStatus::Draft);
    }

    #[test]
    fn create_request_rejects_bad_time() {
        let request = CreateOrderRequest {
            client_name: "Sharma Family".to_string(),
            order_location: "Green Banquet Hall".to_string(),
            people_count: 50,
            order_date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            order_time: "6:30 pm".to_string(),
            order_occasion: "Birthday".to_string(),
            items: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_rejects_short_client_name() {
        let request = CreateOrderRequest {
            client_name: "ab".to_string(),
            order_location: "Green Banquet Hall".to_string(),
            people_count: 50,
            order_date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            order_time: "18:30".to_string(),
            order_occasion: "Birthday".to_string(),
            items: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn service_constructs_without_event_sender() {
        let db_pool = Arc::new(DatabaseConnection::Disconnected);
        let _service = OrderService::new(db_pool, None);
    }
}
