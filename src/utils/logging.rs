//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the TicketDesk application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{TicketDeskError, Result};

/// Initialize logging based on configuration.
///
/// Returns the appender guard; dropping it flushes and stops the file writer,
/// so the caller keeps it alive for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // stdout belongs to the views, so terminal logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| TicketDeskError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: Option<i64>, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log ticket lifecycle actions (return, accept, decline, refund)
pub fn log_ticket_action(ticket_ref: i64, action: &str, user_id: Option<i64>, success: bool) {
    if success {
        info!(
            ticket_ref = ticket_ref,
            action = action,
            user_id = user_id,
            "Ticket action completed"
        );
    } else {
        warn!(
            ticket_ref = ticket_ref,
            action = action,
            user_id = user_id,
            "Ticket action failed"
        );
    }
}

/// Log a workflow phase change
pub fn log_workflow_transition(workflow: &str, from: &str, to: &str) {
    debug!(
        workflow = workflow,
        from = from,
        to = to,
        "Workflow transition"
    );
}

/// Log API errors with context
pub fn log_api_error(method: &str, path: &str, status: Option<u16>, error: &str) {
    error!(
        method = method,
        path = path,
        status = status,
        error = error,
        "API error occurred"
    );
}

/// Log token refresh attempts
pub fn log_refresh_event(success: bool, details: Option<&str>) {
    if success {
        info!(details = details, "Access token refreshed");
    } else {
        warn!(details = details, "Access token refresh failed, session cleared");
    }
}
