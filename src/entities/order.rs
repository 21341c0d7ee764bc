use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "order_datetime_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

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

    pub people_count: i32,
    pub order_date: NaiveDate,
    /// 24h wall-clock time, "HH:MM"
    pub order_time: String,
    pub order_occasion: String,
    /// Single-letter status code: D, P, I or C
    pub order_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_food_item::Entity")]
    OrderFoodItem,
}

impl Related<super::order_food_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderFoodItem.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(self)
    }
}
