//! Waitlist models

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::utils::helpers::deserialize_lenient_timestamp;

/// A queue position held by a user for a sold-out event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub event_id: Option<i64>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub position: Option<i64>,
    /// Only present on the organizer's view of the queue
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub joined_at: Option<DateTime<Utc>>,
}

/// Body of `POST /waitlist`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinWaitlistRequest {
    pub user_id: i64,
    pub event_id: i64,
}
