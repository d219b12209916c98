//! TicketDesk
//!
//! Client library and terminal front-end for an event-ticketing platform.
//! The REST API owns inventory, payments, waitlist order and refunds; this
//! crate authenticates against it, derives view state from what it returns
//! (ticket lifecycle buckets, availability, return eligibility) and drives
//! the purchase, waitlist and organizer workflows.

pub mod config;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod workflows;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{TicketDeskError, Result};

// Re-export main components for easy access
pub use services::{ApiClient, ServiceFactory};
pub use state::{Navigator, SessionStore};
pub use workflows::{Confirmer, WorkflowOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
