//! Organizer dashboard commands

use std::str::FromStr;
use rust_decimal::Decimal;
use crate::utils::errors::{TicketDeskError, Result};
use crate::workflows::{EditableEvent, EventForm, OrganizerWorkflow, TicketTypeRow, WorkflowOutcome};
use super::super::context::AppContext;
use super::super::views::{
    render_after_action, render_analytics, render_event_tickets, render_organizer_events, render_organizer_waitlist,
};

fn organizer(ctx: &AppContext) -> OrganizerWorkflow {
    OrganizerWorkflow::new(ctx.services.clone())
}

/// Parse `title|location|start|end|description|rows`.
///
/// Rows are `;`-separated `[id=]Label:price:total`.
pub fn parse_event_definition(definition: &str) -> Result<(EventForm, Vec<TicketTypeRow>)> {
    let fields: Vec<&str> = definition.split('|').map(str::trim).collect();
    let &[title, location, start, end, description, rows] = fields.as_slice() else {
        return Err(TicketDeskError::Validation(
            "Expected six |-separated fields: title|location|start|end|description|ticket types".to_string(),
        ));
    };

    let form = EventForm {
        title: title.to_string(),
        description: description.to_string(),
        location: location.to_string(),
        start_datetime: start.to_string(),
        end_datetime: end.to_string(),
    };

    let rows = rows
        .split(';')
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .map(parse_row)
        .collect::<Result<Vec<_>>>()?;

    Ok((form, rows))
}

fn parse_row(raw: &str) -> Result<TicketTypeRow> {
    let invalid = || TicketDeskError::Validation(format!("Invalid ticket type \"{}\"; expected [id=]Label:price:total", raw));

    let (id, rest) = match raw.split_once('=') {
        Some((id, rest)) => (Some(id.trim().parse::<i64>().map_err(|_| invalid())?), rest),
        None => (None, raw),
    };
    let parts: Vec<&str> = rest.split(':').map(str::trim).collect();
    let &[label, price, total] = parts.as_slice() else {
        return Err(invalid());
    };

    Ok(TicketTypeRow {
        id,
        label: label.to_string(),
        price: Decimal::from_str(price).map_err(|_| invalid())?,
        total_tickets: total.parse().map_err(|_| invalid())?,
    })
}

pub async fn handle_org_events(ctx: &AppContext) -> Result<String> {
    let events = organizer(ctx).list_events().await?;
    Ok(render_organizer_events(&events))
}

pub async fn handle_org_create(ctx: &AppContext, definition: &str) -> Result<String> {
    let (form, rows) = parse_event_definition(definition)?;
    let event_id = organizer(ctx).create_event(&form, &rows).await?;
    Ok(format!("Event created successfully! (#{})", event_id))
}

/// Edit an event; ticket types left out of the list are deleted
pub async fn handle_org_edit(ctx: &AppContext, event_id: i64, definition: &str) -> Result<String> {
    let (form, rows) = parse_event_definition(definition)?;
    let current = ctx.services.event_service.get(event_id).await?;
    let editable = EditableEvent {
        form,
        rows,
        ..EditableEvent::from_event(&current)
    };

    let plan = organizer(ctx).save_editable(&editable).await?;
    Ok(format!(
        "Event updated successfully! ({} ticket type(s) updated, {} created, {} deleted)",
        plan.updates.len(),
        plan.creates.len(),
        plan.deletes.len()
    ))
}

pub async fn handle_org_delete(ctx: &AppContext, event_id: i64) -> Result<String> {
    let workflow = organizer(ctx);
    let mut events = workflow.list_events().await?;
    let outcome = workflow
        .delete_event(event_id, &mut events, ctx.confirmer.as_ref())
        .await;

    Ok(match outcome {
        WorkflowOutcome::Completed { message, .. } => format!("{}\n\n{}", message, render_organizer_events(&events)),
        WorkflowOutcome::Cancelled => "Cancelled.".to_string(),
        WorkflowOutcome::Rejected { message } => message,
    })
}

pub async fn handle_org_tickets(ctx: &AppContext, event_id: i64) -> Result<String> {
    let view = organizer(ctx).load_event_tickets(event_id).await?;
    Ok(render_event_tickets(&view))
}

pub async fn handle_org_refund(ctx: &AppContext, event_id: i64, ticket_id: i64) -> Result<String> {
    let view = organizer(ctx).load_event_tickets(event_id).await?;
    let ticket = view
        .tickets
        .iter()
        .find(|t| t.id == ticket_id)
        .ok_or_else(|| TicketDeskError::Validation(format!("Ticket #{} does not belong to event #{}.", ticket_id, event_id)))?;

    let outcome = ctx
        .waitlist_actions()
        .organizer_refund(event_id, ticket, ctx.confirmer.as_ref())
        .await;

    Ok(match outcome {
        WorkflowOutcome::Completed { message, refreshed } => render_after_action(
            &message,
            refreshed.as_ref(),
            render_event_tickets,
            &format!("org-tickets {}", event_id),
        ),
        WorkflowOutcome::Cancelled => "Cancelled.".to_string(),
        WorkflowOutcome::Rejected { message } => message,
    })
}

pub async fn handle_org_waitlist(ctx: &AppContext, event_id: i64) -> Result<String> {
    let view = organizer(ctx).load_waitlist(event_id).await?;
    Ok(render_organizer_waitlist(&view))
}

pub async fn handle_org_remove(ctx: &AppContext, event_id: i64, entry_id: i64) -> Result<String> {
    let mut view = organizer(ctx).load_waitlist(event_id).await?;
    let outcome = ctx
        .waitlist_actions()
        .remove_entry(&mut view.entries, entry_id, ctx.confirmer.as_ref())
        .await;

    Ok(match outcome {
        WorkflowOutcome::Completed { message, .. } => format!("{}\n\n{}", message, render_organizer_waitlist(&view)),
        WorkflowOutcome::Cancelled => "Cancelled.".to_string(),
        WorkflowOutcome::Rejected { message } => message,
    })
}

pub async fn handle_org_analytics(ctx: &AppContext, event_id: i64) -> Result<String> {
    let (event, analytics, summary) = organizer(ctx).load_analytics(event_id).await?;
    Ok(render_analytics(&event, &analytics, &summary))
}
