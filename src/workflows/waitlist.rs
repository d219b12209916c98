//! Waitlist workflow
//!
//! Joining a sold-out event's queue, answering a reserved-ticket offer,
//! returning an active ticket to the queue, and the organizer-side refund
//! and queue maintenance.

use tracing::{info, warn};
use crate::lifecycle::{is_return_eligible, EventOffer};
use crate::models::{Event, Ticket, TicketStatus, WaitlistEntry};
use crate::services::ServiceFactory;
use crate::utils::errors::TicketDeskError;
use crate::utils::logging::{log_ticket_action, log_user_action};
use super::confirm::{ConfirmPrompt, Confirmer};
use super::organizer::{EventTicketsView, OrganizerWorkflow};
use super::WorkflowOutcome;

/// The owner's tickets and queue entries after a return
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketsAndWaitlist {
    pub tickets: Vec<Ticket>,
    pub waitlist: Vec<WaitlistEntry>,
}

pub struct WaitlistWorkflow {
    services: ServiceFactory,
    /// Set once this view has joined; a fresh workflow starts unset
    joined: bool,
}

impl WaitlistWorkflow {
    pub fn new(services: ServiceFactory) -> Self {
        Self {
            services,
            joined: false,
        }
    }

    pub fn has_joined(&self) -> bool {
        self.joined
    }

    fn require_user(&self, return_to: &str) -> Option<i64> {
        if !self
            .services
            .session
            .require_auth(self.services.navigator.as_ref(), Some(return_to.to_string()))
        {
            return None;
        }
        self.services.session.user_id()
    }

    /// `None` when the re-fetch failed; callers must not show it as empty
    async fn reload_tickets(&self, user_id: i64) -> Option<Vec<Ticket>> {
        match self.services.ticket_service.list_for_user(user_id).await {
            Ok(tickets) => Some(tickets),
            Err(e) => {
                warn!(user_id = user_id, error = %e, "Failed to reload tickets");
                None
            }
        }
    }

    /// Queue up for a sold-out event; the result carries the position
    pub async fn join(&mut self, event: &Event, confirmer: &dyn Confirmer) -> WorkflowOutcome<Option<i64>> {
        if self.joined {
            return WorkflowOutcome::rejected("You have already joined the waitlist for this event.");
        }
        if EventOffer::for_event(event) != EventOffer::Waitlist {
            return WorkflowOutcome::rejected("The waitlist is only open for sold-out events.");
        }

        if !confirmer.confirm(&ConfirmPrompt::join_waitlist()).await {
            return WorkflowOutcome::Cancelled;
        }

        let Some(user_id) = self.require_user(&format!("/events/{}", event.id)) else {
            return WorkflowOutcome::rejected(TicketDeskError::NotAuthenticated.user_message(""));
        };

        match self.services.waitlist_service.join(user_id, event.id).await {
            Ok(position) => {
                self.joined = true;
                info!(user_id = user_id, event_id = event.id, position = ?position, "Joined waitlist");
                log_user_action(Some(user_id), "join_waitlist", Some(&event.title));

                let message = match position {
                    Some(position) => format!("You've been added to the waitlist! You are #{} in line.", position),
                    None => "You've been added to the waitlist!".to_string(),
                };
                WorkflowOutcome::completed(message, position)
            }
            Err(e) => {
                warn!(user_id = user_id, event_id = event.id, error = %e, "Joining waitlist failed");
                WorkflowOutcome::rejected(e.user_message("Error joining waitlist."))
            }
        }
    }

    /// Take a reserved ticket; no confirmation step
    pub async fn accept_offer(&self, transaction_id: i64) -> WorkflowOutcome<Option<Vec<Ticket>>> {
        let Some(user_id) = self.require_user("/profile") else {
            return WorkflowOutcome::rejected(TicketDeskError::NotAuthenticated.user_message(""));
        };

        match self.services.waitlist_service.accept_offer(transaction_id).await {
            Ok(message) => {
                log_ticket_action(transaction_id, "accept_offer", Some(user_id), true);
                let tickets = self.reload_tickets(user_id).await;
                WorkflowOutcome::completed(message.unwrap_or_else(|| "Ticket accepted!".to_string()), tickets)
            }
            Err(e) => {
                log_ticket_action(transaction_id, "accept_offer", Some(user_id), false);
                WorkflowOutcome::rejected(e.user_message("Error accepting ticket."))
            }
        }
    }

    pub async fn decline_offer(
        &self,
        transaction_id: i64,
        confirmer: &dyn Confirmer,
    ) -> WorkflowOutcome<Option<Vec<Ticket>>> {
        if !confirmer.confirm(&ConfirmPrompt::decline_offer()).await {
            return WorkflowOutcome::Cancelled;
        }

        let Some(user_id) = self.require_user("/profile") else {
            return WorkflowOutcome::rejected(TicketDeskError::NotAuthenticated.user_message(""));
        };

        match self.services.waitlist_service.decline_offer(transaction_id).await {
            Ok(message) => {
                log_ticket_action(transaction_id, "decline_offer", Some(user_id), true);
                let tickets = self.reload_tickets(user_id).await;
                WorkflowOutcome::completed(message.unwrap_or_else(|| "Ticket offer declined.".to_string()), tickets)
            }
            Err(e) => {
                log_ticket_action(transaction_id, "decline_offer", Some(user_id), false);
                WorkflowOutcome::rejected(e.user_message("Error declining ticket."))
            }
        }
    }

    /// Hand an active ticket of a sold-out event back to the queue.
    ///
    /// Eligibility is checked locally against `events` first; an ineligible
    /// ticket never reaches the API.
    pub async fn return_ticket(
        &self,
        ticket: &Ticket,
        events: &[Event],
        confirmer: &dyn Confirmer,
    ) -> WorkflowOutcome<Option<TicketsAndWaitlist>> {
        if !is_return_eligible(ticket, events, chrono::Utc::now()) {
            return WorkflowOutcome::rejected(
                "Only active tickets for sold-out events can be returned to the waitlist.",
            );
        }

        if !confirmer.confirm(&ConfirmPrompt::return_ticket()).await {
            return WorkflowOutcome::Cancelled;
        }

        let Some(user_id) = self.require_user("/profile") else {
            return WorkflowOutcome::rejected(TicketDeskError::NotAuthenticated.user_message(""));
        };

        match self.services.ticket_service.request_refund(ticket.id).await {
            Ok(message) => {
                log_ticket_action(ticket.id, "return", Some(user_id), true);
                let reloaded = futures::try_join!(
                    self.services.ticket_service.list_for_user(user_id),
                    self.services.waitlist_service.list_for_user(user_id),
                );
                let refreshed = match reloaded {
                    Ok((tickets, waitlist)) => Some(TicketsAndWaitlist { tickets, waitlist }),
                    Err(e) => {
                        warn!(user_id = user_id, error = %e, "Failed to reload tickets and waitlist");
                        None
                    }
                };
                WorkflowOutcome::completed(
                    message.unwrap_or_else(|| "Ticket returned to the waitlist.".to_string()),
                    refreshed,
                )
            }
            Err(e) => {
                log_ticket_action(ticket.id, "return", Some(user_id), false);
                WorkflowOutcome::rejected(e.user_message("Error refunding ticket."))
            }
        }
    }

    /// Organizer refund; allowed any time except on an already refunded ticket
    pub async fn organizer_refund(
        &self,
        event_id: i64,
        ticket: &Ticket,
        confirmer: &dyn Confirmer,
    ) -> WorkflowOutcome<Option<EventTicketsView>> {
        if ticket.status == TicketStatus::Refunded {
            return WorkflowOutcome::rejected("This ticket has already been refunded.");
        }

        if !confirmer.confirm(&ConfirmPrompt::organizer_refund()).await {
            return WorkflowOutcome::Cancelled;
        }

        let organizer_id = self.services.session.user_id();
        match self.services.ticket_service.organizer_refund(ticket.id).await {
            Ok(message) => {
                log_ticket_action(ticket.id, "organizer_refund", organizer_id, true);
                let view = match OrganizerWorkflow::new(self.services.clone()).load_event_tickets(event_id).await {
                    Ok(view) => Some(view),
                    Err(e) => {
                        warn!(event_id = event_id, error = %e, "Failed to reload event tickets");
                        None
                    }
                };
                WorkflowOutcome::completed(message.unwrap_or_else(|| "Ticket refunded.".to_string()), view)
            }
            Err(e) => {
                log_ticket_action(ticket.id, "organizer_refund", organizer_id, false);
                let detail = match &e {
                    TicketDeskError::Api { message, .. } | TicketDeskError::Authentication(message) => message.clone(),
                    other => other.to_string(),
                };
                WorkflowOutcome::rejected(format!("Refund failed: {}", detail))
            }
        }
    }

    /// Drop someone from an event's queue (organizer)
    pub async fn remove_entry(
        &self,
        entries: &mut Vec<WaitlistEntry>,
        entry_id: i64,
        confirmer: &dyn Confirmer,
    ) -> WorkflowOutcome<()> {
        if !confirmer.confirm(&ConfirmPrompt::remove_waitlist_entry()).await {
            return WorkflowOutcome::Cancelled;
        }

        match self.services.waitlist_service.remove(entry_id).await {
            Ok(()) => {
                entries.retain(|entry| entry.id != entry_id);
                info!(entry_id = entry_id, "Waitlist entry removed");
                WorkflowOutcome::completed("Removed from waitlist successfully!", ())
            }
            Err(e) => {
                warn!(entry_id = entry_id, error = %e, "Removing waitlist entry failed");
                WorkflowOutcome::rejected(e.user_message("Failed to remove from waitlist"))
            }
        }
    }
}
