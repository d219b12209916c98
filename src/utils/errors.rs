//! Error handling for TicketDesk
//!
//! This module defines the main error type used throughout the application
//! and the helpers views use to turn failures into user-facing messages.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for TicketDesk
#[derive(Error, Debug)]
pub enum TicketDeskError {
    /// Rejected locally, before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// 401 on a login or registration endpoint (bad credentials)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Session could not be refreshed; it has already been cleared
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// The `require_auth` guard refused to proceed
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Server rejected the request with a message payload
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for TicketDesk operations
pub type Result<T> = std::result::Result<T, TicketDeskError>;

impl From<config::ConfigError> for TicketDeskError {
    fn from(err: config::ConfigError) -> Self {
        TicketDeskError::Config(err.to_string())
    }
}

impl TicketDeskError {
    /// Message to show the user.
    ///
    /// Server and validation messages are shown verbatim; everything else
    /// collapses to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            TicketDeskError::Validation(msg) | TicketDeskError::Authentication(msg) => msg.clone(),
            TicketDeskError::Api { message, .. } if !message.is_empty() => message.clone(),
            TicketDeskError::SessionExpired => self.to_string(),
            TicketDeskError::NotAuthenticated => "Please log in to continue.".to_string(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TicketDeskError::Api { status, .. } => Some(*status),
            TicketDeskError::Authentication(_) | TicketDeskError::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            TicketDeskError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            TicketDeskError::Validation(_) => true,
            TicketDeskError::Authentication(_) => true,
            TicketDeskError::SessionExpired => true,
            TicketDeskError::NotAuthenticated => true,
            TicketDeskError::Api { status, .. } => !status.is_server_error(),
            TicketDeskError::Http(_) => true,
            TicketDeskError::Serialization(_) => false,
            TicketDeskError::Token(_) => true,
            TicketDeskError::Io(_) => true,
            TicketDeskError::UrlParse(_) => false,
            TicketDeskError::Storage(_) => false,
            TicketDeskError::Config(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TicketDeskError::Validation(_) => ErrorSeverity::Info,
            TicketDeskError::Authentication(_) => ErrorSeverity::Warning,
            TicketDeskError::SessionExpired => ErrorSeverity::Warning,
            TicketDeskError::NotAuthenticated => ErrorSeverity::Info,
            TicketDeskError::Api { status, .. } if status.is_client_error() => ErrorSeverity::Warning,
            TicketDeskError::Config(_) => ErrorSeverity::Critical,
            TicketDeskError::Storage(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
