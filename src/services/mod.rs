// Core services
pub mod food_items;
pub mod orders;

// Derived data and integrations
pub mod calendar;
pub mod checklist;

// Export rendering
pub mod pdf;
