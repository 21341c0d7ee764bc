use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::orders::OrderResponse;

const CALENDAR_TIME_ZONE: &str = "Asia/Kolkata";

/// Payload for the Google Calendar events endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: CalendarEventTime,
    pub end: CalendarEventTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// Publishes order bookings to the operator's Google Calendar.
///
/// The service is best effort: a failed publish is logged and surfaced
/// through the event stream, but never fails the order operation that
/// triggered it.
#[derive(Clone)]
pub struct CalendarService {
    client: reqwest::Client,
    api_base: String,
    enabled: bool,
    event_sender: Option<Arc<EventSender>>,
}

impl CalendarService {
    pub fn new(config: &AppConfig, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.calendar_timeout_secs))
                .build()
                .unwrap_or_default(),
            api_base: config.calendar_api_base.trim_end_matches('/').to_string(),
            enabled: config.calendar_sync_enabled,
            event_sender,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Builds the calendar payload for an order booking.
    pub fn event_for_order(order: &OrderResponse) -> CalendarEvent {
        let date_time = format!("{}T{}:00", order.order_date, order.order_time);
        let time = CalendarEventTime {
            date_time,
            time_zone: CALENDAR_TIME_ZONE.to_string(),
        };
        CalendarEvent {
            summary: format!(
                "Order {} for {}",
                order.client_name, order.order_occasion
            ),
            location: order.order_location.clone(),
            description: order.order_occasion.clone(),
            start: time.clone(),
            end: time,
        }
    }

    /// Publishes the order to the caller's primary calendar.
    ///
    /// Errors are swallowed after logging so order creation never
    /// depends on the calendar being reachable.
    #[instrument(skip(self, provider_token), fields(order_id = %order.id))]
    pub async fn publish_order(&self, order: &OrderResponse, provider_token: &str) {
        if !self.enabled {
            return;
        }

        match self.try_publish(order, provider_token).await {
            Ok(()) => {
                info!(order_id = %order.id, "Published order to calendar");
                self.emit(Event::CalendarEventPublished { order_id: order.id });
            }
            Err(err) => {
                warn!(order_id = %order.id, error = %err, "Calendar publish failed");
                self.emit(Event::CalendarEventFailed {
                    order_id: order.id,
                    reason: err.to_string(),
                });
            }
        }
    }

    async fn try_publish(
        &self,
        order: &OrderResponse,
        provider_token: &str,
    ) -> Result<(), ServiceError> {
        let url = format!("{}/calendars/primary/events", self.api_base);
        let event = Self::event_for_order(order);

        let response = self
            .client
            .post(&url)
            .bearer_auth(provider_token)
            .json(&event)
            .send()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("calendar: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            error!(%status, %message, "Calendar API rejected event");
            return Err(ServiceError::ExternalServiceError(format!(
                "calendar: {} ({})",
                message, status
            )));
        }

        Ok(())
    }

    fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            let sender = sender.clone();
            tokio::spawn(async move {
                if let Err(e) = sender.send(event).await {
                    error!("Failed to send event: {}", e);
                }
            });
        }
    }
}
