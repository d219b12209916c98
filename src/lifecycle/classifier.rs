//! Ticket lifecycle classification
//!
//! Splits a user's tickets into the buckets the ticket views show and
//! decides whether an active ticket may be handed back to the waitlist.
//! Nothing here is cached: callers classify fresh API data on every render.

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use crate::models::{Event, Ticket, TicketStatus};

/// Disjoint partition of a ticket list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketBuckets {
    /// Waitlist offers awaiting accept/decline
    pub reserved: Vec<Ticket>,
    /// Returned by the owner, waiting for someone on the waitlist
    pub pending_return: Vec<Ticket>,
    pub refunded: Vec<Ticket>,
    pub active: Vec<Ticket>,
    pub expired: Vec<Ticket>,
}

impl TicketBuckets {
    pub fn len(&self) -> usize {
        self.reserved.len() + self.pending_return.len() + self.refunded.len() + self.active.len() + self.expired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucket a single ticket belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Reserved,
    PendingReturn,
    Refunded,
    Active,
    Expired,
}

/// Status buckets win; everything else is judged by its date.
///
/// The date is the event end, else its start. A ticket with no usable date
/// stays active.
pub fn bucket_of(ticket: &Ticket, now: DateTime<Utc>) -> Bucket {
    match ticket.status {
        TicketStatus::Reserved => Bucket::Reserved,
        TicketStatus::PendingReturn => Bucket::PendingReturn,
        TicketStatus::Refunded => Bucket::Refunded,
        TicketStatus::Active | TicketStatus::Unrecognized => match ticket.reference_date() {
            Some(date) if date <= now => Bucket::Expired,
            _ => Bucket::Active,
        },
    }
}

pub fn classify(tickets: &[Ticket], now: DateTime<Utc>) -> TicketBuckets {
    let mut buckets = TicketBuckets::default();
    for ticket in tickets {
        let target = match bucket_of(ticket, now) {
            Bucket::Reserved => &mut buckets.reserved,
            Bucket::PendingReturn => &mut buckets.pending_return,
            Bucket::Refunded => &mut buckets.refunded,
            Bucket::Active => &mut buckets.active,
            Bucket::Expired => &mut buckets.expired,
        };
        target.push(ticket.clone());
    }
    buckets
}

/// A ticket can be returned only while active and only if its event is sold
/// out, judged against the freshly loaded `events`.
pub fn is_return_eligible(ticket: &Ticket, events: &[Event], now: DateTime<Utc>) -> bool {
    if bucket_of(ticket, now) != Bucket::Active {
        return false;
    }

    let Some(event_id) = ticket.event_id else {
        return false;
    };

    events
        .iter()
        .find(|event| event.id == event_id)
        .map(Event::is_sold_out)
        .unwrap_or(false)
}

/// Per-status tally for the organizer's ticket list; no date logic
pub fn status_counts(tickets: &[Ticket]) -> HashMap<TicketStatus, usize> {
    let mut counts = HashMap::new();
    for ticket in tickets {
        *counts.entry(ticket.status).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn ticket(id: i64, status: TicketStatus, end: Option<DateTime<Utc>>) -> Ticket {
        Ticket {
            id,
            event_id: Some(1),
            ticket_type_id: Some(1),
            ticket_type: Some("Regular".to_string()),
            ticket_price: None,
            user_id: Some(1),
            buyer_name: None,
            transaction_id: None,
            status,
            issued_at: None,
            event_name: None,
            start_datetime: None,
            end_datetime: end,
        }
    }

    fn event(sold: i64, total: i64) -> Event {
        Event {
            id: 1,
            title: "Swing night".to_string(),
            description: None,
            location: None,
            start_datetime: None,
            end_datetime: None,
            total_tickets: total,
            tickets_sold: sold,
            is_past: false,
            organizer_id: None,
            organizer_name: None,
            ticket_types: Vec::new(),
        }
    }

    #[test]
    fn test_date_boundaries() {
        let now = Utc::now();
        assert_eq!(bucket_of(&ticket(1, TicketStatus::Active, Some(now)), now), Bucket::Expired);
        assert_eq!(
            bucket_of(&ticket(1, TicketStatus::Active, Some(now + Duration::seconds(1))), now),
            Bucket::Active
        );
        assert_eq!(bucket_of(&ticket(1, TicketStatus::Active, None), now), Bucket::Active);
    }

    #[test]
    fn test_start_used_when_no_end() {
        let now = Utc::now();
        let mut past = ticket(1, TicketStatus::Unrecognized, None);
        past.start_datetime = Some(now - Duration::days(1));
        assert_eq!(bucket_of(&past, now), Bucket::Expired);
    }

    #[test]
    fn test_status_wins_over_date() {
        let now = Utc::now();
        let old = Some(now - Duration::days(30));
        assert_eq!(bucket_of(&ticket(1, TicketStatus::Reserved, old), now), Bucket::Reserved);
        assert_eq!(bucket_of(&ticket(1, TicketStatus::Refunded, old), now), Bucket::Refunded);
        assert_eq!(bucket_of(&ticket(1, TicketStatus::PendingReturn, old), now), Bucket::PendingReturn);
    }

    #[test]
    fn test_return_requires_sold_out_event() {
        let now = Utc::now();
        let active = ticket(1, TicketStatus::Active, Some(now + Duration::days(3)));

        assert!(is_return_eligible(&active, &[event(10, 10)], now));
        assert!(!is_return_eligible(&active, &[event(9, 10)], now));
        assert!(!is_return_eligible(&active, &[], now));

        let expired = ticket(2, TicketStatus::Active, Some(now - Duration::days(3)));
        assert!(!is_return_eligible(&expired, &[event(10, 10)], now));

        let reserved = ticket(3, TicketStatus::Reserved, Some(now + Duration::days(3)));
        assert!(!is_return_eligible(&reserved, &[event(10, 10)], now));
    }

    #[test]
    fn test_status_counts() {
        let tickets = vec![
            ticket(1, TicketStatus::Active, None),
            ticket(2, TicketStatus::Active, None),
            ticket(3, TicketStatus::Refunded, None),
        ];
        let counts = status_counts(&tickets);
        assert_eq!(counts.get(&TicketStatus::Active), Some(&2));
        assert_eq!(counts.get(&TicketStatus::Refunded), Some(&1));
        assert_eq!(counts.get(&TicketStatus::Reserved), None);
    }

    fn status_strategy() -> impl Strategy<Value = TicketStatus> {
        prop_oneof![
            Just(TicketStatus::Active),
            Just(TicketStatus::Reserved),
            Just(TicketStatus::PendingReturn),
            Just(TicketStatus::Refunded),
            Just(TicketStatus::Unrecognized),
        ]
    }

    proptest! {
        #[test]
        fn prop_partition_is_total_and_disjoint(
            specs in prop::collection::vec(
                (status_strategy(), prop::option::of(-10_000i64..10_000), prop::option::of(-10_000i64..10_000)),
                0..40,
            )
        ) {
            let now = Utc::now();
            let tickets: Vec<Ticket> = specs
                .iter()
                .enumerate()
                .map(|(i, (status, start, end))| {
                    let mut t = ticket(i as i64, *status, end.map(|s| now + Duration::seconds(s)));
                    t.start_datetime = start.map(|s| now + Duration::seconds(s));
                    t
                })
                .collect();

            let buckets = classify(&tickets, now);
            prop_assert_eq!(buckets.len(), tickets.len());

            let mut seen: Vec<i64> = [
                &buckets.reserved,
                &buckets.pending_return,
                &buckets.refunded,
                &buckets.active,
                &buckets.expired,
            ]
            .iter()
            .flat_map(|bucket| bucket.iter().map(|t| t.id))
            .collect();
            seen.sort_unstable();
            let expected: Vec<i64> = (0..tickets.len() as i64).collect();
            prop_assert_eq!(seen, expected);
        }
    }
}
