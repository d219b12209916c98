//! Organizer management
//!
//! Event CRUD, ticket-type synchronisation, and the read-only dashboards
//! (analytics, tickets sold, waitlist).

use std::collections::{HashMap, HashSet};
use futures::future::try_join_all;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use crate::lifecycle::status_counts;
use crate::models::{
    Event, EventAnalytics, EventPayload, Ticket, TicketStatus, TicketType, TicketTypePayload, Transaction,
    WaitlistEntry,
};
use crate::services::ServiceFactory;
use crate::utils::errors::{TicketDeskError, Result};
use crate::utils::helpers::percentage;
use crate::utils::logging::log_user_action;
use crate::utils::validation::{validate_input, DEFAULT_MAX_INPUT_LENGTH};
use super::confirm::{ConfirmPrompt, Confirmer};
use super::WorkflowOutcome;

const INPUT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Event fields edited by the organizer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_datetime: String,
    pub end_datetime: String,
}

impl EventForm {
    pub fn from_event(event: &Event) -> Self {
        let format = |dt: Option<chrono::DateTime<chrono::Utc>>| {
            dt.map(|d| d.format(INPUT_DATETIME_FORMAT).to_string()).unwrap_or_default()
        };
        Self {
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            location: event.location.clone().unwrap_or_default(),
            start_datetime: format(event.start_datetime),
            end_datetime: format(event.end_datetime),
        }
    }

    fn payload(&self, organizer_id: i64, total_tickets: i64) -> Result<EventPayload> {
        Ok(EventPayload {
            title: validate_input(&self.title, "Title", DEFAULT_MAX_INPUT_LENGTH)?,
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            start_datetime: self.start_datetime.trim().to_string(),
            end_datetime: self.end_datetime.trim().to_string(),
            organizer_id,
            total_tickets,
        })
    }
}

/// One row of the ticket-type editor; `id` is `None` for rows not yet saved
#[derive(Debug, Clone, PartialEq)]
pub struct TicketTypeRow {
    pub id: Option<i64>,
    pub label: String,
    pub price: Decimal,
    pub total_tickets: i64,
}

impl TicketTypeRow {
    pub fn blank() -> Self {
        Self {
            id: None,
            label: String::new(),
            price: Decimal::ZERO,
            total_tickets: 0,
        }
    }

    fn payload(&self, event_id: Option<i64>) -> TicketTypePayload {
        TicketTypePayload {
            event_id,
            label: self.label.trim().to_string(),
            price: self.price,
            total_tickets: self.total_tickets,
        }
    }
}

impl From<&TicketType> for TicketTypeRow {
    fn from(ticket_type: &TicketType) -> Self {
        Self {
            id: Some(ticket_type.id),
            label: ticket_type.label.clone(),
            price: ticket_type.price,
            total_tickets: ticket_type.total_tickets,
        }
    }
}

/// Reject rows the server would refuse before anything is sent
pub fn validate_rows(rows: &[TicketTypeRow]) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        if row.label.trim().is_empty() {
            return Err(TicketDeskError::Validation(format!(
                "Ticket type #{} needs a name.",
                index + 1
            )));
        }
        if row.price < Decimal::ZERO {
            return Err(TicketDeskError::Validation(format!(
                "Ticket type \"{}\" cannot have a negative price.",
                row.label.trim()
            )));
        }
        if row.total_tickets < 0 {
            return Err(TicketDeskError::Validation(format!(
                "Ticket type \"{}\" cannot have a negative ticket count.",
                row.label.trim()
            )));
        }
    }
    Ok(())
}

/// Event capacity is always the sum of its types
pub fn total_tickets(rows: &[TicketTypeRow]) -> i64 {
    rows.iter().map(|row| row.total_tickets).sum()
}

/// Calls needed to bring the server's ticket types in line with the editor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketTypeSyncPlan {
    pub deletes: Vec<i64>,
    pub updates: Vec<TicketTypeRow>,
    pub creates: Vec<TicketTypeRow>,
}

impl TicketTypeSyncPlan {
    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty() && self.updates.is_empty() && self.creates.is_empty()
    }
}

/// Baseline ids missing from `current` are deleted, rows with an id are
/// updated, rows without one are created.
pub fn plan_ticket_type_sync(baseline: &[TicketTypeRow], current: &[TicketTypeRow]) -> TicketTypeSyncPlan {
    let current_ids: HashSet<i64> = current.iter().filter_map(|row| row.id).collect();

    TicketTypeSyncPlan {
        deletes: baseline
            .iter()
            .filter_map(|row| row.id)
            .filter(|id| !current_ids.contains(id))
            .collect(),
        updates: current.iter().filter(|row| row.id.is_some()).cloned().collect(),
        creates: current.iter().filter(|row| row.id.is_none()).cloned().collect(),
    }
}

/// Edit form for an existing event plus the ticket types it was loaded with
#[derive(Debug, Clone, PartialEq)]
pub struct EditableEvent {
    pub event_id: i64,
    pub form: EventForm,
    pub baseline: Vec<TicketTypeRow>,
    pub rows: Vec<TicketTypeRow>,
}

impl EditableEvent {
    pub fn from_event(event: &Event) -> Self {
        let baseline: Vec<TicketTypeRow> = event.ticket_types.iter().map(TicketTypeRow::from).collect();
        let rows = if baseline.is_empty() {
            vec![TicketTypeRow::blank()]
        } else {
            baseline.clone()
        };

        Self {
            event_id: event.id,
            form: EventForm::from_event(event),
            baseline,
            rows,
        }
    }
}

/// Derived figures for the analytics dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSummary {
    pub sold_percentage: f64,
    pub tickets_remaining: i64,
    pub per_type: Vec<TicketTypeSales>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketTypeSales {
    pub label: String,
    pub tickets_sold: i64,
    pub total_tickets: i64,
    pub sold_percentage: f64,
    pub revenue: Decimal,
}

impl AnalyticsSummary {
    pub fn new(event: &Event, analytics: &EventAnalytics) -> Self {
        let per_type = analytics
            .ticket_types
            .iter()
            .map(|tt| TicketTypeSales {
                label: tt.label.clone(),
                tickets_sold: tt.tickets_sold,
                total_tickets: tt.total_tickets,
                sold_percentage: percentage(tt.tickets_sold, tt.total_tickets),
                revenue: tt.price * Decimal::from(tt.tickets_sold),
            })
            .collect();

        Self {
            sold_percentage: percentage(event.tickets_sold, event.total_tickets),
            tickets_remaining: event.tickets_remaining(),
            per_type,
        }
    }
}

/// Organizer's list of tickets sold for one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTicketsView {
    pub tickets: Vec<Ticket>,
    pub transactions: HashMap<i64, Transaction>,
    pub counts: HashMap<TicketStatus, usize>,
}

impl EventTicketsView {
    pub fn count(&self, status: TicketStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct EventWaitlistView {
    pub event: Event,
    pub entries: Vec<WaitlistEntry>,
}

pub struct OrganizerWorkflow {
    services: ServiceFactory,
}

impl OrganizerWorkflow {
    pub fn new(services: ServiceFactory) -> Self {
        Self { services }
    }

    /// The logged-in organizer's id; anyone else is turned away
    fn organizer_id(&self) -> Result<i64> {
        if !self
            .services
            .session
            .require_auth(self.services.navigator.as_ref(), Some("/organizer/events".to_string()))
        {
            return Err(TicketDeskError::NotAuthenticated);
        }

        match self.services.session.user() {
            Some(user) if user.is_organizer() => Ok(user.id),
            Some(_) => Err(TicketDeskError::Validation("Organizer account required.".to_string())),
            None => Err(TicketDeskError::NotAuthenticated),
        }
    }

    pub async fn list_events(&self) -> Result<Vec<Event>> {
        let organizer_id = self.organizer_id()?;
        self.services.event_service.list_by_organizer(organizer_id).await
    }

    /// Create the event, then each of its ticket types in order
    pub async fn create_event(&self, form: &EventForm, rows: &[TicketTypeRow]) -> Result<i64> {
        let organizer_id = self.organizer_id()?;
        validate_rows(rows)?;
        let payload = form.payload(organizer_id, total_tickets(rows))?;

        let event_id = self.services.event_service.create(&payload).await?;
        info!(event_id = event_id, organizer_id = organizer_id, "Event created");

        for row in rows {
            self.services.ticket_service.create_type(&row.payload(Some(event_id))).await?;
        }

        log_user_action(Some(organizer_id), "create_event", Some(&payload.title));
        Ok(event_id)
    }

    /// Update the event, then apply the ticket-type plan: deletes, updates,
    /// creates, one call at a time. The first failure stops the sync.
    pub async fn save_event(
        &self,
        event_id: i64,
        form: &EventForm,
        baseline: &[TicketTypeRow],
        current: &[TicketTypeRow],
    ) -> Result<TicketTypeSyncPlan> {
        let organizer_id = self.organizer_id()?;
        validate_rows(current)?;
        let payload = form.payload(organizer_id, total_tickets(current))?;

        self.services.event_service.update(event_id, &payload).await?;

        let plan = plan_ticket_type_sync(baseline, current);
        debug!(
            event_id = event_id,
            deletes = plan.deletes.len(),
            updates = plan.updates.len(),
            creates = plan.creates.len(),
            "Syncing ticket types"
        );

        for id in &plan.deletes {
            self.services.ticket_service.delete_type(*id).await?;
        }
        for row in &plan.updates {
            if let Some(id) = row.id {
                self.services.ticket_service.update_type(id, &row.payload(None)).await?;
            }
        }
        for row in &plan.creates {
            self.services.ticket_service.create_type(&row.payload(Some(event_id))).await?;
        }

        info!(event_id = event_id, organizer_id = organizer_id, "Event updated");
        Ok(plan)
    }

    pub async fn save_editable(&self, editable: &EditableEvent) -> Result<TicketTypeSyncPlan> {
        self.save_event(editable.event_id, &editable.form, &editable.baseline, &editable.rows)
            .await
    }

    /// Delete after confirmation and drop the event from `events`
    pub async fn delete_event(
        &self,
        event_id: i64,
        events: &mut Vec<Event>,
        confirmer: &dyn Confirmer,
    ) -> WorkflowOutcome<()> {
        if !confirmer.confirm(&ConfirmPrompt::delete_event()).await {
            return WorkflowOutcome::Cancelled;
        }

        let organizer_id = match self.organizer_id() {
            Ok(id) => id,
            Err(e) => return WorkflowOutcome::rejected(e.user_message("Could not delete event.")),
        };

        match self.services.event_service.delete(event_id, organizer_id).await {
            Ok(message) => {
                events.retain(|event| event.id != event_id);
                info!(event_id = event_id, organizer_id = organizer_id, "Event deleted");
                WorkflowOutcome::completed(message.unwrap_or_else(|| "Event deleted.".to_string()), ())
            }
            Err(e) => {
                warn!(event_id = event_id, error = %e, "Event deletion failed");
                WorkflowOutcome::rejected(e.user_message("Could not delete event."))
            }
        }
    }

    /// Event and analytics, fetched concurrently
    pub async fn load_analytics(&self, event_id: i64) -> Result<(Event, EventAnalytics, AnalyticsSummary)> {
        self.organizer_id()?;
        let (event, analytics) = futures::try_join!(
            self.services.event_service.get(event_id),
            self.services.event_service.analytics(event_id),
        )?;
        let summary = AnalyticsSummary::new(&event, &analytics);
        Ok((event, analytics, summary))
    }

    /// Tickets sold for an event, with each referenced transaction
    pub async fn load_event_tickets(&self, event_id: i64) -> Result<EventTicketsView> {
        self.organizer_id()?;
        let tickets = self.services.ticket_service.list_for_event(event_id).await?;

        let mut transaction_ids: Vec<i64> = tickets.iter().filter_map(|t| t.transaction_id).collect();
        transaction_ids.sort_unstable();
        transaction_ids.dedup();

        let transactions = try_join_all(
            transaction_ids
                .iter()
                .map(|id| self.services.transaction_service.get(*id)),
        )
        .await?;

        Ok(EventTicketsView {
            counts: status_counts(&tickets),
            transactions: transactions.into_iter().map(|tx| (tx.id, tx)).collect(),
            tickets,
        })
    }

    pub async fn load_waitlist(&self, event_id: i64) -> Result<EventWaitlistView> {
        self.organizer_id()?;
        let (event, entries) = futures::try_join!(
            self.services.event_service.get(event_id),
            self.services.waitlist_service.list_for_event(event_id),
        )?;
        Ok(EventWaitlistView { event, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: Option<i64>, label: &str, total: i64) -> TicketTypeRow {
        TicketTypeRow {
            id,
            label: label.to_string(),
            price: Decimal::from(15),
            total_tickets: total,
        }
    }

    #[test]
    fn test_sync_plan() {
        let baseline = vec![row(Some(1), "Regular", 10), row(Some(2), "VIP", 5)];
        let current = vec![row(Some(1), "Regular", 12), row(None, "Student", 4)];

        let plan = plan_ticket_type_sync(&baseline, &current);
        assert_eq!(plan.deletes, vec![2]);
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].id, Some(1));
        assert_eq!(plan.creates.len(), 1);
        assert_eq!(plan.creates[0].label, "Student");
        assert_eq!(total_tickets(&current), 16);
    }

    #[test]
    fn test_unknown_ids_are_still_updated() {
        let plan = plan_ticket_type_sync(&[], &[row(Some(9), "Late", 3)]);
        assert!(plan.deletes.is_empty());
        assert_eq!(plan.updates.len(), 1);
    }

    #[test]
    fn test_validate_rows() {
        assert!(validate_rows(&[row(None, "Regular", 3)]).is_ok());
        assert!(validate_rows(&[TicketTypeRow::blank()]).is_err());
        assert!(validate_rows(&[row(None, "Regular", -1)]).is_err());

        let mut negative = row(None, "Regular", 3);
        negative.price = Decimal::from(-1);
        assert!(validate_rows(&[negative]).is_err());
    }

    #[test]
    fn test_editable_event_starts_with_blank_row() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": 4,
            "title": "Shag social",
            "start_datetime": "2030-03-01T20:00:00Z"
        }))
        .unwrap();

        let editable = EditableEvent::from_event(&event);
        assert!(editable.baseline.is_empty());
        assert_eq!(editable.rows, vec![TicketTypeRow::blank()]);
        assert_eq!(editable.form.start_datetime, "2030-03-01T20:00");
        assert_eq!(editable.form.end_datetime, "");
    }

    #[test]
    fn test_analytics_summary() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": 4,
            "title": "Shag social",
            "total_tickets": 3,
            "tickets_sold": 1
        }))
        .unwrap();
        let analytics: EventAnalytics = serde_json::from_value(serde_json::json!({
            "totalRevenue": "25.00",
            "ticketTypes": [
                {"id": 1, "type": "Regular", "price": "12.50", "tickets_sold": 1, "total_tickets": 2},
                {"id": 2, "type": "Comp", "price": 0, "tickets_sold": 0, "total_tickets": 0}
            ]
        }))
        .unwrap();

        let summary = AnalyticsSummary::new(&event, &analytics);
        assert_eq!(summary.sold_percentage, 33.3);
        assert_eq!(summary.tickets_remaining, 2);
        assert_eq!(summary.per_type[0].sold_percentage, 50.0);
        assert_eq!(summary.per_type[0].revenue, Decimal::new(1250, 2));
        assert_eq!(summary.per_type[1].sold_percentage, 0.0);
    }
}
