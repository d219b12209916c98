//! Confirmation step
//!
//! Mutating actions ask before they touch the API. The front-end supplies a
//! [`Confirmer`]; workflows await its answer and treat anything but an
//! explicit yes as "do nothing".

use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::utils::helpers::format_euros;

/// Title and body of a confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
}

impl ConfirmPrompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn purchase(quantity: u32, ticket_type: &str, total: Decimal) -> Self {
        Self::new(
            "Confirm Purchase",
            format!(
                "Are you sure you want to purchase {} {} ticket(s) for {}?",
                quantity,
                ticket_type,
                format_euros(total)
            ),
        )
    }

    pub fn join_waitlist() -> Self {
        Self::new(
            "Join Waitlist",
            "Are you sure you want to join the waitlist? You'll be notified if a ticket becomes available.",
        )
    }

    pub fn decline_offer() -> Self {
        Self::new("Decline Ticket Offer", "Are you sure you want to decline this ticket offer?")
    }

    pub fn return_ticket() -> Self {
        Self::new(
            "Return Ticket to Waitlist",
            "Your ticket will be offered to the waitlist. You'll keep access until someone else accepts it. \
             You will receive a refund of 98% of the ticket price (2% platform fee).",
        )
    }

    pub fn organizer_refund() -> Self {
        Self::new(
            "Refund Ticket",
            "Are you sure you want to refund this ticket? The ticket will be made available for purchase again \
             (or offered to waitlist if sold out).",
        )
    }

    pub fn delete_event() -> Self {
        Self::new("Delete Event", "Are you sure you want to delete this event?")
    }

    pub fn remove_waitlist_entry() -> Self {
        Self::new("Remove from Waitlist", "Remove this person from the waitlist?")
    }
}

#[async_trait]
pub trait Confirmer: Send + Sync {
    /// `true` only when the user explicitly agreed
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// Confirms everything; for scripted and non-interactive use
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl Confirmer for AutoConfirm {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        true
    }
}
