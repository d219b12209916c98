//! Event and ticket-type models

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::utils::helpers::deserialize_lenient_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_tickets: i64,
    #[serde(default)]
    pub tickets_sold: i64,
    /// Computed by the server
    #[serde(default)]
    pub is_past: bool,
    #[serde(default)]
    pub organizer_id: Option<i64>,
    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(default)]
    pub ticket_types: Vec<TicketType>,
}

impl Event {
    /// Aggregate sold-out check across the whole event
    pub fn is_sold_out(&self) -> bool {
        self.tickets_sold >= self.total_tickets
    }

    /// Tickets left across all types, never negative
    pub fn tickets_remaining(&self) -> i64 {
        (self.total_tickets - self.tickets_sold).max(0)
    }

    pub fn ticket_type(&self, ticket_type_id: i64) -> Option<&TicketType> {
        self.ticket_types.iter().find(|t| t.id == ticket_type_id)
    }

    pub fn organizer_label(&self) -> String {
        match (&self.organizer_name, self.organizer_id) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(id)) => format!("Organizer #{}", id),
            _ => "Unknown organizer".to_string(),
        }
    }
}

/// A priced category of admission within one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketType {
    pub id: i64,
    #[serde(default)]
    pub event_id: Option<i64>,
    #[serde(rename = "type")]
    pub label: String,
    pub price: Decimal,
    #[serde(default)]
    pub total_tickets: i64,
    #[serde(default)]
    pub tickets_sold: i64,
}

impl TicketType {
    /// `total_tickets - tickets_sold`, clamped at zero
    pub fn available(&self) -> i64 {
        (self.total_tickets - self.tickets_sold).max(0)
    }

    pub fn is_sold_out(&self) -> bool {
        self.available() <= 0
    }
}

/// Event listing filter understood by `GET /events`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    Upcoming,
    Past,
    All,
}

impl EventFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventFilter::Upcoming => "upcoming",
            EventFilter::Past => "past",
            EventFilter::All => "all",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "upcoming" => Some(EventFilter::Upcoming),
            "past" => Some(EventFilter::Past),
            "all" => Some(EventFilter::All),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: Option<u64>,
}

/// One page of `GET /events`
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub pagination: Option<Pagination>,
}

/// Body of `POST /events` and `PUT /events/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPayload {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_datetime: String,
    pub end_datetime: String,
    pub organizer_id: i64,
    /// Always the sum of the ticket types' totals
    pub total_tickets: i64,
}

/// Body of `POST /ticket-types` and `PATCH /ticket-types/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketTypePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    #[serde(rename = "type")]
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub total_tickets: i64,
}

/// Body of `DELETE /events/:id`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteEventRequest {
    pub organizer_id: i64,
}

/// Response of `GET /events/:id/analytics`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnalytics {
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub transaction_count: i64,
    #[serde(default)]
    pub waitlist_count: i64,
    #[serde(default)]
    pub ticket_types: Vec<TicketType>,
    #[serde(default)]
    pub recent_sales: Vec<RecentSale>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethodStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentSale {
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub ticket_type: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodStats {
    pub payment_method: String,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub total_revenue: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_deserialization_with_string_prices() {
        let event: Event = serde_json::from_value(json!({
            "id": 7,
            "title": "Lindy Exchange",
            "start_datetime": "2030-05-01T19:00:00.000Z",
            "end_datetime": null,
            "total_tickets": 10,
            "tickets_sold": 10,
            "is_past": false,
            "ticket_types": [
                {"id": 1, "event_id": 7, "type": "Early bird", "price": "20.00", "total_tickets": 4, "tickets_sold": 4},
                {"id": 2, "event_id": 7, "type": "Regular", "price": 35, "total_tickets": 6, "tickets_sold": 6}
            ]
        }))
        .unwrap();

        assert!(event.is_sold_out());
        assert!(event.end_datetime.is_none());
        assert_eq!(event.ticket_types[0].price, Decimal::from(20));
        assert_eq!(event.ticket_types[1].label, "Regular");
        assert!(event.ticket_types.iter().all(TicketType::is_sold_out));
    }

    #[test]
    fn test_available_never_negative() {
        let ticket_type = TicketType {
            id: 1,
            event_id: None,
            label: "Regular".to_string(),
            price: Decimal::from(10),
            total_tickets: 5,
            tickets_sold: 7,
        };
        assert_eq!(ticket_type.available(), 0);
        assert!(ticket_type.is_sold_out());
    }

    #[test]
    fn test_ticket_type_payload_sends_numeric_price() {
        let payload = TicketTypePayload {
            event_id: Some(3),
            label: "VIP".to_string(),
            price: Decimal::new(4550, 2),
            total_tickets: 20,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "VIP");
        assert_eq!(value["price"], json!(45.5));
    }
}
