//! Event browsing, purchase and waitlist join

use crate::models::EventFilter;
use crate::utils::errors::Result;
use crate::workflows::{PurchasePhase, PurchaseSelection, PurchaseWorkflow, Quantity, QuantityBounds, WorkflowOutcome};
use super::super::context::AppContext;
use super::super::views::{render_event, render_event_page};

pub async fn handle_events_list(ctx: &AppContext, filter: EventFilter, page: u32, search: Option<&str>) -> Result<String> {
    let page = ctx.services.event_service.list(filter, page, search).await?;
    Ok(render_event_page(&page))
}

/// Open an event page
pub async fn handle_event_detail(ctx: &mut AppContext, event_id: i64) -> Result<String> {
    let event = ctx.services.event_service.get(event_id).await?;
    ctx.reset_waitlist_view(event_id);
    Ok(render_event(&event))
}

pub async fn handle_buy(ctx: &AppContext, event_id: i64, ticket_type_id: i64, raw_quantity: &str) -> Result<String> {
    let bounds = QuantityBounds::from(&ctx.purchase);
    let quantity = Quantity::parse_within(raw_quantity, bounds)?;
    let mut event = ctx.services.event_service.get(event_id).await?;

    let selection = PurchaseSelection {
        ticket_type_id: Some(ticket_type_id),
        quantity,
    };
    let mut workflow = PurchaseWorkflow::new(ctx.services.clone(), &ctx.purchase);
    let phase = workflow.run(&mut event, &selection, ctx.confirmer.as_ref()).await;

    let text = match phase {
        PurchasePhase::Settled { message } => {
            let remaining = event
                .ticket_type(ticket_type_id)
                .map(|t| format!(" {} left of this type.", t.available()))
                .unwrap_or_default();
            format!("{}{}", message, remaining)
        }
        PurchasePhase::Failed { message } => {
            workflow.reset();
            message
        }
        PurchasePhase::Selecting => "Purchase cancelled.".to_string(),
        PurchasePhase::Confirming(_) | PurchasePhase::Submitting => String::new(),
    };
    Ok(text)
}

pub async fn handle_join(ctx: &mut AppContext, event_id: i64) -> Result<String> {
    let event = ctx.services.event_service.get(event_id).await?;
    let confirmer = ctx.confirmer.clone();
    let outcome = ctx.waitlist_view(event_id).join(&event, confirmer.as_ref()).await;

    Ok(match outcome {
        WorkflowOutcome::Cancelled => "Cancelled.".to_string(),
        other => other.message().unwrap_or_default().to_string(),
    })
}
