//! Terminal front-end handlers
//!
//! This module contains the command parser, the handlers behind each
//! command and the text views they render.

pub mod command;
pub mod commands;
pub mod console;
pub mod context;
pub mod views;

pub use command::Command;
pub use console::{ConsoleConfirmer, ConsoleInput};
pub use context::AppContext;

use tracing::{debug, error, warn};
use crate::utils::errors::{ErrorSeverity, TicketDeskError};
use crate::workflows::{ProfileForm, RegistrationForm};
use commands::{account, events, organizer, session, tickets};

/// What the command loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Show(String),
    Quit,
}

/// Run one command and render its result; errors become text, never a
/// reason to stop the loop
pub async fn handle_command(ctx: &mut AppContext, command: Command) -> Reply {
    debug!(command = command_name(&command), "Handling command");

    let result = match command {
        Command::Quit => return Reply::Quit,
        Command::Help => Ok(views::help_text().to_string()),
        Command::Login { email, password, organizer } => {
            session::handle_login(ctx, &email, &password, organizer).await
        }
        Command::Register {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
            organizer,
        } => {
            let form = RegistrationForm {
                first_name,
                last_name,
                email,
                password,
                confirm_password,
            };
            session::handle_register(ctx, &form, organizer).await
        }
        Command::Logout => Ok(session::handle_logout(ctx)),
        Command::Whoami => Ok(session::handle_whoami(ctx)),
        Command::Events { filter, page, search } => {
            events::handle_events_list(ctx, filter, page, search.as_deref()).await
        }
        Command::Event { event_id } => events::handle_event_detail(ctx, event_id).await,
        Command::Buy { event_id, ticket_type_id, quantity } => {
            events::handle_buy(ctx, event_id, ticket_type_id, &quantity).await
        }
        Command::Join { event_id } => events::handle_join(ctx, event_id).await,
        Command::Tickets => tickets::handle_tickets(ctx).await,
        Command::Accept { transaction_id } => tickets::handle_accept(ctx, transaction_id).await,
        Command::Decline { transaction_id } => tickets::handle_decline(ctx, transaction_id).await,
        Command::Return { ticket_id } => tickets::handle_return(ctx, ticket_id).await,
        Command::MyEvent { event_id } => tickets::handle_my_event(ctx, event_id).await,
        Command::Waitlist => account::handle_waitlist(ctx).await,
        Command::Transactions => account::handle_transactions(ctx).await,
        Command::Profile {
            first_name,
            last_name,
            email,
            old_password,
            password,
        } => {
            let form = ProfileForm {
                first_name,
                last_name,
                email,
                old_password: old_password.unwrap_or_default(),
                password: password.unwrap_or_default(),
            };
            account::handle_profile(ctx, form).await
        }
        Command::OrgEvents => organizer::handle_org_events(ctx).await,
        Command::OrgCreate { definition } => organizer::handle_org_create(ctx, &definition).await,
        Command::OrgEdit { event_id, definition } => organizer::handle_org_edit(ctx, event_id, &definition).await,
        Command::OrgDelete { event_id } => organizer::handle_org_delete(ctx, event_id).await,
        Command::OrgTickets { event_id } => organizer::handle_org_tickets(ctx, event_id).await,
        Command::OrgRefund { event_id, ticket_id } => organizer::handle_org_refund(ctx, event_id, ticket_id).await,
        Command::OrgWaitlist { event_id } => organizer::handle_org_waitlist(ctx, event_id).await,
        Command::OrgRemove { event_id, entry_id } => organizer::handle_org_remove(ctx, event_id, entry_id).await,
        Command::OrgAnalytics { event_id } => organizer::handle_org_analytics(ctx, event_id).await,
    };

    let mut text = match result {
        Ok(text) => text,
        Err(e) => render_error(&e),
    };

    if let Some(destination) = ctx.services.navigator.take_pending() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&navigation_hint(&destination));
    }

    Reply::Show(text)
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Login { .. } => "login",
        Command::Register { .. } => "register",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Events { .. } => "events",
        Command::Event { .. } => "event",
        Command::Buy { .. } => "buy",
        Command::Join { .. } => "join",
        Command::Tickets => "tickets",
        Command::Accept { .. } => "accept",
        Command::Decline { .. } => "decline",
        Command::Return { .. } => "return",
        Command::Waitlist => "waitlist",
        Command::Transactions => "transactions",
        Command::MyEvent { .. } => "my-event",
        Command::Profile { .. } => "profile",
        Command::OrgEvents => "org-events",
        Command::OrgCreate { .. } => "org-create",
        Command::OrgEdit { .. } => "org-edit",
        Command::OrgDelete { .. } => "org-delete",
        Command::OrgTickets { .. } => "org-tickets",
        Command::OrgRefund { .. } => "org-refund",
        Command::OrgWaitlist { .. } => "org-waitlist",
        Command::OrgRemove { .. } => "org-remove",
        Command::OrgAnalytics { .. } => "org-analytics",
        Command::Help => "help",
        Command::Quit => "quit",
    }
}

pub fn render_error(error: &TicketDeskError) -> String {
    match error.severity() {
        ErrorSeverity::Critical | ErrorSeverity::Error => error!(error = %error, "Command failed"),
        _ => warn!(error = %error, "Command rejected"),
    }
    format!("Error: {}", error.user_message("Something went wrong. Please try again."))
}

fn navigation_hint(destination: &str) -> String {
    match destination {
        crate::state::LOGIN_PATH => "Please log in with `login <email> <password>`.".to_string(),
        "/" => "Back at the start. Type `events` to browse.".to_string(),
        other => format!("(navigated to {})", other),
    }
}
