//! Ticket availability and the offer an event page shows

use crate::models::{Event, TicketType};

/// Remaining tickets of one type, clamped at zero
pub fn available(ticket_type: &TicketType) -> i64 {
    ticket_type.available()
}

/// Every type is sold out. An event without types falls back to its
/// aggregate counters.
pub fn all_types_sold_out(event: &Event) -> bool {
    if event.ticket_types.is_empty() {
        return event.is_sold_out();
    }
    event.ticket_types.iter().all(TicketType::is_sold_out)
}

/// What the event page lets the user do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOffer {
    /// The event is over
    Closed,
    Waitlist,
    Purchase,
}

impl EventOffer {
    pub fn for_event(event: &Event) -> Self {
        if event.is_past {
            EventOffer::Closed
        } else if all_types_sold_out(event) {
            EventOffer::Waitlist
        } else {
            EventOffer::Purchase
        }
    }
}
