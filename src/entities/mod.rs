pub mod food_item;
pub mod order;
pub mod order_food_item;
pub mod user;
