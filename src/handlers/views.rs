//! Text renderers
//!
//! Pure functions from API data to the text the terminal shows. Derived
//! state (buckets, offers, eligibility) is recomputed on every call.

use std::fmt::Write;
use chrono::{DateTime, Utc};
use crate::lifecycle::{classify, is_return_eligible, EventOffer};
use crate::models::{Event, EventAnalytics, EventPage, Ticket, TicketStatus, Transaction, User, WaitlistEntry};
use crate::utils::helpers::{format_euros, format_optional_timestamp, truncate_text};
use crate::workflows::account::transaction_display_status;
use crate::workflows::{AnalyticsSummary, EventTicketsView, EventWaitlistView};

pub fn render_user(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            "Logged in as {} <{}> ({})",
            user.display_name(),
            user.email,
            if user.is_organizer() { "organizer" } else { "user" }
        ),
        None => "Not logged in.".to_string(),
    }
}

pub fn render_event_page(page: &EventPage) -> String {
    if page.events.is_empty() {
        return "No events found.".to_string();
    }

    let mut out = String::new();
    for event in &page.events {
        let _ = writeln!(
            out,
            "#{:<5} {:<40} {}  [{}]",
            event.id,
            truncate_text(&event.title, 40),
            format_optional_timestamp(event.start_datetime),
            offer_label(EventOffer::for_event(event))
        );
    }
    if let Some(pagination) = &page.pagination {
        let _ = write!(out, "Page {} of {}", pagination.current_page, pagination.total_pages.max(1));
    }
    out.trim_end().to_string()
}

fn offer_label(offer: EventOffer) -> &'static str {
    match offer {
        EventOffer::Closed => "event ended",
        EventOffer::Waitlist => "sold out, waitlist open",
        EventOffer::Purchase => "on sale",
    }
}

pub fn render_event(event: &Event) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", event.title, event.id);
    let _ = writeln!(out, "When:  {}", format_optional_timestamp(event.start_datetime));
    if let Some(end) = event.end_datetime {
        let _ = writeln!(out, "Until: {}", format_optional_timestamp(Some(end)));
    }
    if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
        let _ = writeln!(out, "Where: {}", location);
    }
    let _ = writeln!(out, "By:    {}", event.organizer_label());
    if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "\n{}\n", description);
    }

    for ticket_type in &event.ticket_types {
        let availability = if ticket_type.is_sold_out() {
            "sold out".to_string()
        } else {
            format!("{} left", ticket_type.available())
        };
        let _ = writeln!(
            out,
            "  [{}] {:<20} {:>10}  {}",
            ticket_type.id,
            ticket_type.label,
            format_euros(ticket_type.price),
            availability
        );
    }

    let hint = match EventOffer::for_event(event) {
        EventOffer::Closed => "This event has ended.".to_string(),
        EventOffer::Waitlist => format!("Sold out. Use `join {}` to join the waitlist.", event.id),
        EventOffer::Purchase => format!("Use `buy {} <ticket-type> <quantity>` to purchase.", event.id),
    };
    let _ = write!(out, "{}", hint);
    out
}

fn ticket_line(ticket: &Ticket) -> String {
    format!(
        "#{:<5} {:<30} {:<12} {}",
        ticket.id,
        truncate_text(ticket.event_name.as_deref().unwrap_or("Event"), 30),
        ticket.label(),
        format_optional_timestamp(ticket.reference_date())
    )
}

/// The user's tickets by bucket, with the actions each one allows
pub fn render_ticket_buckets(tickets: &[Ticket], events: &[Event], now: DateTime<Utc>) -> String {
    let buckets = classify(tickets, now);
    if buckets.is_empty() {
        return "You have no tickets yet.".to_string();
    }

    let mut out = String::new();
    if !buckets.reserved.is_empty() {
        let _ = writeln!(out, "Waitlist offers:");
        for ticket in &buckets.reserved {
            let _ = write!(out, "  {}", ticket_line(ticket));
            match ticket.transaction_id {
                Some(tx) => {
                    let _ = writeln!(out, "  -> `accept {}` or `decline {}`", tx, tx);
                }
                None => {
                    let _ = writeln!(out);
                }
            }
        }
    }
    if !buckets.active.is_empty() {
        let _ = writeln!(out, "Active:");
        for ticket in &buckets.active {
            let hint = if is_return_eligible(ticket, events, now) {
                format!("  -> `return {}` to offer it to the waitlist", ticket.id)
            } else {
                String::new()
            };
            let _ = writeln!(out, "  {}{}", ticket_line(ticket), hint);
        }
    }
    for (title, bucket) in [
        ("Pending return (offered to the waitlist):", &buckets.pending_return),
        ("Refunded:", &buckets.refunded),
        ("Past:", &buckets.expired),
    ] {
        if bucket.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", title);
        for ticket in bucket {
            let _ = writeln!(out, "  {}", ticket_line(ticket));
        }
    }
    out.trim_end().to_string()
}

pub fn render_waitlist(entries: &[WaitlistEntry]) -> String {
    if entries.is_empty() {
        return "You are not on any waitlist.".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{:<40} position #{}  {}",
                truncate_text(entry.event_name.as_deref().unwrap_or("Event"), 40),
                entry.position.map(|p| p.to_string()).unwrap_or_else(|| "?".to_string()),
                format_optional_timestamp(entry.start_datetime)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Transactions as given (already newest first)
pub fn render_transactions(transactions: &[Transaction], tickets: &[Ticket]) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }
    transactions
        .iter()
        .map(|tx| {
            format!(
                "Transaction #{:<5} {:<10} {:>10}  {}  {}",
                tx.id,
                transaction_display_status(tx, tickets),
                format_euros(tx.total_price),
                tx.event_title.as_deref().unwrap_or(""),
                format_optional_timestamp(tx.created_at)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_organizer_events(events: &[Event]) -> String {
    if events.is_empty() {
        return "You have no events yet.".to_string();
    }
    events
        .iter()
        .map(|event| {
            format!(
                "#{:<5} {:<40} {}/{} sold  {}",
                event.id,
                truncate_text(&event.title, 40),
                event.tickets_sold,
                event.total_tickets,
                format_optional_timestamp(event.start_datetime)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_event_tickets(view: &EventTicketsView) -> String {
    let mut out = format!(
        "Active: {}  Reserved (Waitlist): {}  Pending Return: {}  Refunded: {}\n",
        view.count(TicketStatus::Active),
        view.count(TicketStatus::Reserved),
        view.count(TicketStatus::PendingReturn),
        view.count(TicketStatus::Refunded)
    );
    for ticket in &view.tickets {
        let reference = ticket
            .transaction_id
            .and_then(|id| view.transactions.get(&id))
            .and_then(|tx| tx.reference_code.clone())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  #{:<5} {:<24} {:<12} {:<15} {:>10}  {}",
            ticket.id,
            truncate_text(ticket.buyer_name.as_deref().unwrap_or("-"), 24),
            ticket.label(),
            ticket.status,
            ticket.ticket_price.map(format_euros).unwrap_or_default(),
            reference
        );
    }
    out.trim_end().to_string()
}

pub fn render_organizer_waitlist(view: &EventWaitlistView) -> String {
    let mut out = format!("Waitlist - {}\n", view.event.title);
    if view.entries.is_empty() {
        out.push_str("Nobody is waiting.");
        return out;
    }
    for (index, entry) in view.entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}. [{}] {:<24} {:<30} joined {}",
            index + 1,
            entry.id,
            entry.user_name.as_deref().unwrap_or("-"),
            entry.email.as_deref().unwrap_or("-"),
            format_optional_timestamp(entry.joined_at)
        );
    }
    out.trim_end().to_string()
}

pub fn render_analytics(event: &Event, analytics: &EventAnalytics, summary: &AnalyticsSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analytics - {}", event.title);
    let _ = writeln!(out, "Revenue:      {}", format_euros(analytics.total_revenue));
    let _ = writeln!(
        out,
        "Tickets sold: {}/{} ({}%), {} remaining",
        event.tickets_sold, event.total_tickets, summary.sold_percentage, summary.tickets_remaining
    );
    let _ = writeln!(out, "Transactions: {}", analytics.transaction_count);
    let _ = writeln!(out, "Waitlist:     {}", analytics.waitlist_count);

    if !summary.per_type.is_empty() {
        let _ = writeln!(out, "By ticket type:");
        for sales in &summary.per_type {
            let _ = writeln!(
                out,
                "  {:<20} {}/{} ({}%)  {}",
                sales.label,
                sales.tickets_sold,
                sales.total_tickets,
                sales.sold_percentage,
                format_euros(sales.revenue)
            );
        }
    }
    if !analytics.recent_sales.is_empty() {
        let _ = writeln!(out, "Recent sales:");
        for sale in &analytics.recent_sales {
            let _ = writeln!(
                out,
                "  {:<24} {:<12} {:>10}  {}",
                sale.buyer_name.as_deref().unwrap_or("-"),
                sale.ticket_type.as_deref().unwrap_or("-"),
                sale.price.map(format_euros).unwrap_or_default(),
                format_optional_timestamp(sale.created_at)
            );
        }
    }
    if !analytics.payment_methods.is_empty() {
        let _ = writeln!(out, "Payment methods:");
        for method in &analytics.payment_methods {
            let _ = writeln!(
                out,
                "  {:<12} {:>4}  {}",
                method.payment_method,
                method.count,
                format_euros(method.total_revenue)
            );
        }
    }
    out.trim_end().to_string()
}

/// An action's message followed by the re-fetched view, or by a note that
/// the reload failed and how to retry it
pub fn render_after_action<T>(
    message: &str,
    refreshed: Option<&T>,
    render: impl FnOnce(&T) -> String,
    reload_command: &str,
) -> String {
    match refreshed {
        Some(data) => format!("{}\n\n{}", message, render(data)),
        None => format!(
            "{}\n\nCould not refresh the list; run `{}` to reload it.",
            message, reload_command
        ),
    }
}

pub fn help_text() -> &'static str {
    "Session:    login <email> <password> | organizer-login <email> <password>
            register <first> <last> <email> <password> <confirm> | organizer-register ...
            logout | whoami
Events:     events [upcoming|past|all] [page] [search...] | event <id>
            buy <event> <ticket-type> <quantity> | join <event>
Tickets:    tickets | accept <transaction> | decline <transaction> | return <ticket>
Account:    waitlist | transactions | my-event <event>
            profile <first> <last> <email> [old-password new-password]
Organizer:  org-events | org-analytics <event> | org-tickets <event> | org-waitlist <event>
            org-refund <event> <ticket> | org-remove <event> <entry> | org-delete <event>
            org-create <title>|<location>|<start>|<end>|<description>|<Type:price:total;...>
            org-edit <event> <title>|<location>|<start>|<end>|<description>|<[id=]Type:price:total;...>
Other:      help | quit"
}
