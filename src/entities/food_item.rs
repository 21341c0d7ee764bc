use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "food_item_data")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(
        min = 3,
        max = 100,
        message = "Item name must be between 3 and 100 characters"
    ))]
    pub item_name: String,

    /// true = vegetarian
    pub item_type: bool,
    /// One of: chafing_dish, platter, salver
    pub cutlery_type: String,
    /// One of: serving_spoon_round, serving_spoon_flat, serving_spoon_small,
    /// serving_spoon_large, tong, none
    pub serving_spoon: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
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
impl ActiveModelBehavior for ActiveModel {}
