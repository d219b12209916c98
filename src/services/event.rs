//! Event service

use serde::Deserialize;
use tracing::debug;
use crate::models::{
    DeleteEventRequest, Event, EventAnalytics, EventFilter, EventPage, EventPayload, Pagination,
};
use crate::utils::errors::Result;
use super::api::ApiClient;
use super::MessageResponse;

/// `GET /events` answers either with a paginated envelope or a bare list
#[derive(Deserialize)]
#[serde(untagged)]
enum EventListResponse {
    Paged {
        events: Vec<Event>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    Bare(Vec<Event>),
}

#[derive(Deserialize)]
struct CreatedEvent {
    event: CreatedEventId,
}

#[derive(Deserialize)]
struct CreatedEventId {
    id: i64,
}

#[derive(Clone)]
pub struct EventService {
    api: ApiClient,
}

impl EventService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// One page of the public listing
    pub async fn list(&self, filter: EventFilter, page: u32, search: Option<&str>) -> Result<EventPage> {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("page", &page.max(1).to_string());
        query.append_pair("filter", filter.as_str());
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query.append_pair("search", search);
        }
        let path = format!("/events?{}", query.finish());

        debug!(filter = filter.as_str(), page = page, "Listing events");
        let page = match self.api.get::<EventListResponse>(&path).await? {
            EventListResponse::Paged { events, pagination } => EventPage { events, pagination },
            EventListResponse::Bare(events) => EventPage { events, pagination: None },
        };
        Ok(page)
    }

    pub async fn get(&self, event_id: i64) -> Result<Event> {
        self.api.get(&format!("/events/{}", event_id)).await
    }

    pub async fn list_by_organizer(&self, organizer_id: i64) -> Result<Vec<Event>> {
        self.api.get(&format!("/events/organizer/{}", organizer_id)).await
    }

    /// Create an event and return its id
    pub async fn create(&self, payload: &EventPayload) -> Result<i64> {
        let created: CreatedEvent = self.api.post("/events", payload).await?;
        Ok(created.event.id)
    }

    pub async fn update(&self, event_id: i64, payload: &EventPayload) -> Result<()> {
        let _: serde_json::Value = self.api.put(&format!("/events/{}", event_id), payload).await?;
        Ok(())
    }

    pub async fn delete(&self, event_id: i64, organizer_id: i64) -> Result<Option<String>> {
        let response: Option<MessageResponse> = self
            .api
            .delete_with_body(&format!("/events/{}", event_id), &DeleteEventRequest { organizer_id })
            .await?;
        Ok(response.and_then(|r| r.message))
    }

    pub async fn analytics(&self, event_id: i64) -> Result<EventAnalytics> {
        self.api.get(&format!("/events/{}/analytics", event_id)).await
    }
}
