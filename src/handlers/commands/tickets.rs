//! The user's own tickets

use chrono::Utc;
use crate::utils::errors::{TicketDeskError, Result};
use crate::workflows::{AccountWorkflow, WorkflowOutcome};
use super::super::context::AppContext;
use super::super::views::{render_after_action, render_event, render_ticket_buckets};

pub async fn handle_tickets(ctx: &AppContext) -> Result<String> {
    let profile = AccountWorkflow::new(ctx.services.clone()).load_profile().await?;
    Ok(render_ticket_buckets(&profile.tickets, &profile.events, Utc::now()))
}

pub async fn handle_my_event(ctx: &AppContext, event_id: i64) -> Result<String> {
    let (event, tickets) = AccountWorkflow::new(ctx.services.clone())
        .load_event_tickets(event_id)
        .await?;
    let buckets = render_ticket_buckets(&tickets, std::slice::from_ref(&event), Utc::now());
    Ok(format!("{}\n\n{}", render_event(&event), buckets))
}

fn outcome_text<T>(outcome: WorkflowOutcome<Option<T>>, render: impl FnOnce(&T) -> String) -> String {
    match outcome {
        WorkflowOutcome::Completed { message, refreshed } => {
            render_after_action(&message, refreshed.as_ref(), render, "tickets")
        }
        WorkflowOutcome::Cancelled => "Cancelled.".to_string(),
        WorkflowOutcome::Rejected { message } => message,
    }
}

pub async fn handle_accept(ctx: &AppContext, transaction_id: i64) -> Result<String> {
    let outcome = ctx.waitlist_actions().accept_offer(transaction_id).await;
    Ok(outcome_text(outcome, |tickets| render_ticket_buckets(tickets, &[], Utc::now())))
}

pub async fn handle_decline(ctx: &AppContext, transaction_id: i64) -> Result<String> {
    let outcome = ctx
        .waitlist_actions()
        .decline_offer(transaction_id, ctx.confirmer.as_ref())
        .await;
    Ok(outcome_text(outcome, |tickets| render_ticket_buckets(tickets, &[], Utc::now())))
}

/// Return a ticket, checked against freshly loaded tickets and events
pub async fn handle_return(ctx: &AppContext, ticket_id: i64) -> Result<String> {
    let profile = AccountWorkflow::new(ctx.services.clone()).load_profile().await?;
    let ticket = profile
        .tickets
        .iter()
        .find(|t| t.id == ticket_id)
        .ok_or_else(|| TicketDeskError::Validation(format!("You have no ticket #{}.", ticket_id)))?;

    let outcome = ctx
        .waitlist_actions()
        .return_ticket(ticket, &profile.events, ctx.confirmer.as_ref())
        .await;
    Ok(outcome_text(outcome, |refreshed| {
        render_ticket_buckets(&refreshed.tickets, &profile.events, Utc::now())
    }))
}
