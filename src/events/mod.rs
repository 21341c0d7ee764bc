use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Lightweight handle for publishing lifecycle events from services.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// The various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Order events
    OrderCreated(Uuid),
    OrderUpdated(Uuid),
    OrderDeleted(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    OrderMenuReplaced {
        order_id: Uuid,
        item_count: usize,
    },

    // Catalog events
    FoodItemCreated(Uuid),
    FoodItemDeleted(Uuid),

    // Calendar events
    CalendarEventPublished {
        order_id: Uuid,
    },
    CalendarEventFailed {
        order_id: Uuid,
        reason: String,
    },

    // Auth events
    UserRegistered(Uuid),
    UserLoggedIn(Uuid),
}

/// Consumes events from the channel and logs them.
///
/// Runs until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::OrderCreated(order_id) => {
                info!("Order created: {}", order_id);
            }
            Event::OrderUpdated(order_id) => {
                info!("Order updated: {}", order_id);
            }
            Event::OrderDeleted(order_id) => {
                info!("Order deleted: {}", order_id);
            }
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => {
                info!(
                    "Order {} status changed: {} -> {}",
                    order_id, old_status, new_status
                );
            }
            Event::OrderMenuReplaced {
                order_id,
                item_count,
            } => {
                info!("Order {} menu replaced with {} items", order_id, item_count);
            }
            Event::FoodItemCreated(item_id) => {
                info!("Food item created: {}", item_id);
            }
            Event::FoodItemDeleted(item_id) => {
                info!("Food item deleted: {}", item_id);
            }
            Event::CalendarEventPublished { order_id } => {
                info!("Calendar event published for order {}", order_id);
            }
            Event::CalendarEventFailed { order_id, reason } => {
                warn!(
                    "Calendar event failed for order {}: {}",
                    order_id, reason
                );
            }
            Event::UserRegistered(user_id) => {
                info!("User registered: {}", user_id);
            }
            Event::UserLoggedIn(user_id) => {
                info!("User logged in: {}", user_id);
            }
        }
    }

    warn!("Event processing loop has ended");
}
