//! User-facing workflows
//!
//! Each workflow validates locally, asks for confirmation, calls the API
//! and re-fetches what the call changed. None of them retain derived state.

pub mod account;
pub mod confirm;
pub mod organizer;
pub mod purchase;
pub mod waitlist;

pub use account::{transaction_display_status, AccountWorkflow, ProfileData, ProfileForm, RegistrationForm};
pub use confirm::{AutoConfirm, ConfirmPrompt, Confirmer};
pub use organizer::{
    plan_ticket_type_sync, AnalyticsSummary, EditableEvent, EventForm, EventTicketsView, EventWaitlistView,
    OrganizerWorkflow, TicketTypeRow, TicketTypeSyncPlan,
};
pub use purchase::{quote, PurchasePhase, PurchaseQuote, PurchaseSelection, PurchaseWorkflow, Quantity, QuantityBounds};
pub use waitlist::{TicketsAndWaitlist, WaitlistWorkflow};

/// How a confirmable action ended
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome<T> {
    /// The API accepted the action; `refreshed` is the re-fetched data
    Completed { message: String, refreshed: T },
    /// The user declined or abandoned the confirmation
    Cancelled,
    /// Refused locally or by the server
    Rejected { message: String },
}

impl<T> WorkflowOutcome<T> {
    pub fn completed(message: impl Into<String>, refreshed: T) -> Self {
        WorkflowOutcome::Completed {
            message: message.into(),
            refreshed,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        WorkflowOutcome::Rejected {
            message: message.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, WorkflowOutcome::Completed { .. })
    }

    /// Text to show for this outcome, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            WorkflowOutcome::Completed { message, .. } | WorkflowOutcome::Rejected { message } => Some(message),
            WorkflowOutcome::Cancelled => None,
        }
    }
}
