//! Purchase workflow
//!
//! Selecting a ticket type and quantity, confirming the price, buying, and
//! reconciling the event's counters afterwards.

use std::fmt;
use rust_decimal::Decimal;
use tracing::{info, warn};
use crate::config::PurchaseConfig;
use crate::lifecycle::EventOffer;
use crate::models::{Event, PurchaseRequest, TicketType};
use crate::services::ServiceFactory;
use crate::utils::errors::{TicketDeskError, Result};
use crate::utils::logging::{log_user_action, log_workflow_transition};
use super::confirm::{ConfirmPrompt, Confirmer};

/// Allowed quantity range for one purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for QuantityBounds {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl From<&PurchaseConfig> for QuantityBounds {
    fn from(config: &PurchaseConfig) -> Self {
        Self {
            min: config.min_quantity,
            max: config.max_quantity,
        }
    }
}

/// A ticket count within its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(u32);

impl Quantity {
    pub fn get(self) -> u32 {
        self.0
    }

    /// Parse with the default bounds (1 to 10)
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_within(raw, QuantityBounds::default())
    }

    pub fn parse_within(raw: &str, bounds: QuantityBounds) -> Result<Self> {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| TicketDeskError::Validation(format!("Quantity must be a number between {} and {}.", bounds.min, bounds.max)))?;

        if value < i64::from(bounds.min) || value > i64::from(bounds.max) {
            return Err(TicketDeskError::Validation(format!(
                "Quantity must be between {} and {}.",
                bounds.min, bounds.max
            )));
        }

        Ok(Quantity(value as u32))
    }

    /// Behaves like the quantity input: a valid value replaces `current`,
    /// clearing the field resets to the minimum, anything else is ignored.
    pub fn apply_input(current: Quantity, raw: &str, bounds: QuantityBounds) -> Quantity {
        if raw.is_empty() {
            return Quantity(bounds.min);
        }
        Self::parse_within(raw, bounds).unwrap_or(current)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity(1)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the user has picked on the event page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseSelection {
    pub ticket_type_id: Option<i64>,
    pub quantity: Quantity,
}

/// A validated purchase, ready to confirm
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseQuote {
    pub event_id: i64,
    pub ticket_type: TicketType,
    pub quantity: Quantity,
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl PurchaseQuote {
    pub fn prompt(&self) -> ConfirmPrompt {
        ConfirmPrompt::purchase(self.quantity.get(), &self.ticket_type.label, self.total)
    }
}

/// Check a selection against the event as last loaded
pub fn quote(event: &Event, selection: &PurchaseSelection) -> Result<PurchaseQuote> {
    let ticket_type_id = selection
        .ticket_type_id
        .ok_or_else(|| TicketDeskError::Validation("Please select a ticket type.".to_string()))?;

    let ticket_type = event
        .ticket_type(ticket_type_id)
        .ok_or_else(|| TicketDeskError::Validation("Please select a ticket type.".to_string()))?;

    let available = ticket_type.available();
    if available < i64::from(selection.quantity.get()) {
        return Err(TicketDeskError::Validation(format!(
            "Only {} ticket(s) available for this type.",
            available
        )));
    }

    let unit_price = ticket_type.price;
    Ok(PurchaseQuote {
        event_id: event.id,
        ticket_type: ticket_type.clone(),
        quantity: selection.quantity,
        unit_price,
        total: unit_price * Decimal::from(selection.quantity.get()),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum PurchasePhase {
    Selecting,
    Confirming(PurchaseQuote),
    Submitting,
    Settled { message: String },
    Failed { message: String },
}

impl PurchasePhase {
    fn name(&self) -> &'static str {
        match self {
            PurchasePhase::Selecting => "selecting",
            PurchasePhase::Confirming(_) => "confirming",
            PurchasePhase::Submitting => "submitting",
            PurchasePhase::Settled { .. } => "settled",
            PurchasePhase::Failed { .. } => "failed",
        }
    }
}

pub struct PurchaseWorkflow {
    services: ServiceFactory,
    payment_method: String,
    phase: PurchasePhase,
}

impl PurchaseWorkflow {
    pub fn new(services: ServiceFactory, config: &PurchaseConfig) -> Self {
        Self {
            services,
            payment_method: config.payment_method.clone(),
            phase: PurchasePhase::Selecting,
        }
    }

    pub fn phase(&self) -> &PurchasePhase {
        &self.phase
    }

    fn transition(&mut self, next: PurchasePhase) {
        log_workflow_transition("purchase", self.phase.name(), next.name());
        self.phase = next;
    }

    /// Back to the selection form after a settled or failed attempt
    pub fn reset(&mut self) {
        self.transition(PurchasePhase::Selecting);
    }

    /// Run one purchase attempt and return the phase it ended in.
    ///
    /// On success `event` is replaced by a fresh copy from the server; if that
    /// re-fetch fails the stale copy is kept.
    pub async fn run(
        &mut self,
        event: &mut Event,
        selection: &PurchaseSelection,
        confirmer: &dyn Confirmer,
    ) -> PurchasePhase {
        if EventOffer::for_event(event) != EventOffer::Purchase {
            self.transition(PurchasePhase::Failed {
                message: "Tickets for this event are not on sale.".to_string(),
            });
            return self.phase.clone();
        }

        let quote = match quote(event, selection) {
            Ok(quote) => quote,
            Err(e) => {
                self.transition(PurchasePhase::Failed {
                    message: e.user_message("Error purchasing tickets."),
                });
                return self.phase.clone();
            }
        };

        let prompt = quote.prompt();
        self.transition(PurchasePhase::Confirming(quote.clone()));
        if !confirmer.confirm(&prompt).await {
            self.transition(PurchasePhase::Selecting);
            return self.phase.clone();
        }

        let return_to = format!("/events/{}", event.id);
        if !self.services.session.require_auth(self.services.navigator.as_ref(), Some(return_to)) {
            self.transition(PurchasePhase::Selecting);
            return self.phase.clone();
        }

        self.transition(PurchasePhase::Submitting);
        let request = PurchaseRequest {
            event_id: quote.event_id,
            ticket_type_id: quote.ticket_type.id,
            quantity: quote.quantity.get(),
            payment_method: self.payment_method.clone(),
        };

        match self.services.ticket_service.purchase(&request).await {
            Ok(message) => {
                info!(
                    event_id = request.event_id,
                    ticket_type_id = request.ticket_type_id,
                    quantity = request.quantity,
                    "Tickets purchased"
                );
                log_user_action(self.services.session.user_id(), "purchase", Some(&quote.ticket_type.label));

                match self.services.event_service.get(event.id).await {
                    Ok(fresh) => *event = fresh,
                    Err(e) => warn!(event_id = event.id, error = %e, "Failed to reload event after purchase"),
                }

                self.transition(PurchasePhase::Settled {
                    message: message.unwrap_or_else(|| "Purchase successful!".to_string()),
                });
            }
            Err(e) => {
                warn!(event_id = request.event_id, error = %e, "Purchase failed");
                self.transition(PurchasePhase::Failed {
                    message: e.user_message("Error purchasing tickets."),
                });
            }
        }

        self.phase.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn event() -> Event {
        serde_json::from_value(serde_json::json!({
            "id": 5,
            "title": "Balboa bash",
            "total_tickets": 10,
            "tickets_sold": 6,
            "ticket_types": [
                {"id": 1, "type": "Regular", "price": "20.00", "total_tickets": 6, "tickets_sold": 4},
                {"id": 2, "type": "VIP", "price": 50, "total_tickets": 4, "tickets_sold": 2}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_quantity_bounds() {
        for raw in ["0", "-1", "11", "abc", ""] {
            assert_matches!(Quantity::parse(raw), Err(TicketDeskError::Validation(_)), "{}", raw);
        }
        assert_eq!(Quantity::parse("5").unwrap().get(), 5);
        assert_eq!(Quantity::parse(" 10 ").unwrap().get(), 10);
    }

    #[test]
    fn test_apply_input_like_the_widget() {
        let bounds = QuantityBounds::default();
        let current = Quantity::parse("4").unwrap();
        assert_eq!(Quantity::apply_input(current, "7", bounds).get(), 7);
        assert_eq!(Quantity::apply_input(current, "", bounds).get(), 1);
        assert_eq!(Quantity::apply_input(current, "11", bounds).get(), 4);
        assert_eq!(Quantity::apply_input(current, "x", bounds).get(), 4);
    }

    #[test]
    fn test_quote_total() {
        let selection = PurchaseSelection {
            ticket_type_id: Some(1),
            quantity: Quantity::parse("2").unwrap(),
        };
        let quote = quote(&event(), &selection).unwrap();
        assert_eq!(quote.total, Decimal::from(40));
        assert_eq!(
            quote.prompt().message,
            "Are you sure you want to purchase 2 Regular ticket(s) for €40.00?"
        );
    }

    #[test]
    fn test_quote_rejections() {
        let no_type = PurchaseSelection::default();
        assert_matches!(
            quote(&event(), &no_type),
            Err(TicketDeskError::Validation(msg)) if msg == "Please select a ticket type."
        );

        let too_many = PurchaseSelection {
            ticket_type_id: Some(2),
            quantity: Quantity::parse("3").unwrap(),
        };
        assert_matches!(
            quote(&event(), &too_many),
            Err(TicketDeskError::Validation(msg)) if msg == "Only 2 ticket(s) available for this type."
        );
    }
}
