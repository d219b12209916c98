//! Waitlist service

use serde::Deserialize;
use crate::models::{JoinWaitlistRequest, WaitlistEntry};
use crate::utils::errors::Result;
use super::api::ApiClient;
use super::MessageResponse;

#[derive(Deserialize)]
struct WaitlistList {
    #[serde(default)]
    waitlist: Vec<WaitlistEntry>,
}

#[derive(Deserialize)]
struct JoinResponse {
    #[serde(default)]
    position: Option<i64>,
}

#[derive(Clone)]
pub struct WaitlistService {
    api: ApiClient,
}

impl WaitlistService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Join the queue and return the position the server assigned
    pub async fn join(&self, user_id: i64, event_id: i64) -> Result<Option<i64>> {
        let response: Option<JoinResponse> = self
            .api
            .post("/waitlist", &JoinWaitlistRequest { user_id, event_id })
            .await?;
        Ok(response.and_then(|r| r.position))
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<WaitlistEntry>> {
        let list: Option<WaitlistList> = self.api.get(&format!("/waitlist/user/{}", user_id)).await?;
        Ok(list.map(|l| l.waitlist).unwrap_or_default())
    }

    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<WaitlistEntry>> {
        let list: Option<WaitlistList> = self.api.get(&format!("/waitlist/event/{}", event_id)).await?;
        Ok(list.map(|l| l.waitlist).unwrap_or_default())
    }

    pub async fn accept_offer(&self, transaction_id: i64) -> Result<Option<String>> {
        let response: Option<MessageResponse> = self
            .api
            .post_empty(&format!("/waitlist/accept-ticket/{}", transaction_id))
            .await?;
        Ok(response.and_then(|r| r.message))
    }

    pub async fn decline_offer(&self, transaction_id: i64) -> Result<Option<String>> {
        let response: Option<MessageResponse> = self
            .api
            .post_empty(&format!("/waitlist/decline-ticket/{}", transaction_id))
            .await?;
        Ok(response.and_then(|r| r.message))
    }

    pub async fn remove(&self, entry_id: i64) -> Result<()> {
        let _: serde_json::Value = self.api.delete(&format!("/waitlist/{}", entry_id)).await?;
        Ok(())
    }
}
