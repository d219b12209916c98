//! Ticket model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::utils::helpers::deserialize_lenient_timestamp;

/// Lifecycle status as reported by the API.
///
/// Unknown, null or missing statuses land in `Unrecognized` so a new
/// server-side status never breaks parsing of the whole ticket list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Active,
    Reserved,
    PendingReturn,
    Refunded,
    #[default]
    #[serde(other)]
    Unrecognized,
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<TicketStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<TicketStatus>::deserialize(deserializer)?.unwrap_or_default())
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Active => "active",
            TicketStatus::Reserved => "reserved",
            TicketStatus::PendingReturn => "pending_return",
            TicketStatus::Refunded => "refunded",
            TicketStatus::Unrecognized => "unknown",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    #[serde(default)]
    pub event_id: Option<i64>,
    #[serde(default)]
    pub ticket_type_id: Option<i64>,
    #[serde(default)]
    pub ticket_type: Option<String>,
    #[serde(default)]
    pub ticket_price: Option<Decimal>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: TicketStatus,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub end_datetime: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Date the ticket's validity is judged against: end, else start
    pub fn reference_date(&self) -> Option<DateTime<Utc>> {
        self.end_datetime.or(self.start_datetime)
    }

    pub fn label(&self) -> &str {
        self.ticket_type.as_deref().unwrap_or("Ticket")
    }
}

/// Body of `POST /tickets`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub event_id: i64,
    pub ticket_type_id: i64,
    pub quantity: u32,
    pub payment_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_status_does_not_fail_parsing() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": 1,
            "event_id": 4,
            "status": "transferred",
            "start_datetime": "2030-01-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(ticket.status, TicketStatus::Unrecognized);
    }

    #[test]
    fn test_missing_or_null_status_is_unrecognized() {
        let tickets: Vec<Ticket> = serde_json::from_value(json!([
            { "id": 1, "end_datetime": "2030-01-02T10:00:00Z" },
            { "id": 2, "status": null },
            { "id": 3, "status": "active" }
        ]))
        .unwrap();

        let statuses: Vec<TicketStatus> = tickets.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![TicketStatus::Unrecognized, TicketStatus::Unrecognized, TicketStatus::Active]
        );
    }

    #[test]
    fn test_reference_date_prefers_end() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": 1,
            "status": "pending_return",
            "start_datetime": "2030-01-01T10:00:00Z",
            "end_datetime": "2030-01-02T10:00:00Z",
            "issued_at": "garbage"
        }))
        .unwrap();
        assert_eq!(ticket.status, TicketStatus::PendingReturn);
        assert_eq!(ticket.reference_date(), ticket.end_datetime);
        assert!(ticket.issued_at.is_none());
    }
}
