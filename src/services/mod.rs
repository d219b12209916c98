//! Services module
//!
//! Typed wrappers around the REST API, all sharing one [`ApiClient`].

pub mod api;
pub mod auth;
pub mod event;
pub mod ticket;
pub mod transaction;
pub mod user;
pub mod waitlist;

pub use api::ApiClient;
pub use auth::AuthService;
pub use event::EventService;
pub use ticket::TicketService;
pub use transaction::TransactionService;
pub use user::UserService;
pub use waitlist::WaitlistService;

use std::sync::Arc;
use serde::Deserialize;
use crate::config::Settings;
use crate::state::{Navigator, SessionStore};
use crate::utils::errors::Result;

/// `{ "message": ... }` envelope returned by most mutating endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub api: ApiClient,
    pub session: Arc<SessionStore>,
    pub navigator: Arc<dyn Navigator>,
    pub auth_service: AuthService,
    pub event_service: EventService,
    pub ticket_service: TicketService,
    pub waitlist_service: WaitlistService,
    pub transaction_service: TransactionService,
    pub user_service: UserService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let api = ApiClient::new(&settings.api, session.clone(), navigator.clone())?;

        Ok(Self {
            auth_service: AuthService::new(api.clone(), session.clone()),
            event_service: EventService::new(api.clone()),
            ticket_service: TicketService::new(api.clone()),
            waitlist_service: WaitlistService::new(api.clone()),
            transaction_service: TransactionService::new(api.clone()),
            user_service: UserService::new(api.clone(), session.clone()),
            api,
            session,
            navigator,
        })
    }
}
