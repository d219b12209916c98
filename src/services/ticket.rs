//! Ticket and ticket-type service

use serde::Deserialize;
use crate::models::{Event, PurchaseRequest, Ticket, TicketTypePayload};
use crate::utils::errors::Result;
use super::api::ApiClient;
use super::MessageResponse;

#[derive(Deserialize)]
struct TicketList {
    #[serde(default)]
    tickets: Vec<Ticket>,
}

#[derive(Deserialize)]
struct EventTickets {
    event: Event,
    #[serde(default)]
    tickets: Vec<Ticket>,
}

#[derive(Clone)]
pub struct TicketService {
    api: ApiClient,
}

impl TicketService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `POST /tickets`; returns the server's confirmation message
    pub async fn purchase(&self, request: &PurchaseRequest) -> Result<Option<String>> {
        let response: Option<MessageResponse> = self.api.post("/tickets", request).await?;
        Ok(response.and_then(|r| r.message))
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Ticket>> {
        let list: Option<TicketList> = self.api.get(&format!("/tickets/user/{}", user_id)).await?;
        Ok(list.map(|l| l.tickets).unwrap_or_default())
    }

    /// The user's tickets for one event, with the event itself
    pub async fn list_for_user_event(&self, user_id: i64, event_id: i64) -> Result<(Event, Vec<Ticket>)> {
        let response: EventTickets = self
            .api
            .get(&format!("/tickets/user/{}/event/{}", user_id, event_id))
            .await?;
        Ok((response.event, response.tickets))
    }

    /// Every ticket issued for an event (organizer view)
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Ticket>> {
        let list: Option<TicketList> = self.api.get(&format!("/tickets/event/{}", event_id)).await?;
        Ok(list.map(|l| l.tickets).unwrap_or_default())
    }

    /// Owner return: the ticket goes to the waitlist
    pub async fn request_refund(&self, ticket_id: i64) -> Result<Option<String>> {
        let response: Option<MessageResponse> = self.api.put_empty(&format!("/tickets/{}/refund", ticket_id)).await?;
        Ok(response.and_then(|r| r.message))
    }

    pub async fn organizer_refund(&self, ticket_id: i64) -> Result<Option<String>> {
        let response: Option<MessageResponse> = self
            .api
            .put_empty(&format!("/tickets/{}/organizer-refund", ticket_id))
            .await?;
        Ok(response.and_then(|r| r.message))
    }

    pub async fn create_type(&self, payload: &TicketTypePayload) -> Result<()> {
        let _: serde_json::Value = self.api.post("/ticket-types", payload).await?;
        Ok(())
    }

    pub async fn update_type(&self, ticket_type_id: i64, payload: &TicketTypePayload) -> Result<()> {
        let _: serde_json::Value = self.api.patch(&format!("/ticket-types/{}", ticket_type_id), payload).await?;
        Ok(())
    }

    pub async fn delete_type(&self, ticket_type_id: i64) -> Result<()> {
        let _: serde_json::Value = self.api.delete(&format!("/ticket-types/{}", ticket_type_id)).await?;
        Ok(())
    }
}
