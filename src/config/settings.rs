//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub purchase: PurchaseConfig,
    pub logging: LoggingConfig,
}

/// REST API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// No timeout unless set; the HTTP client defaults apply
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

/// Session persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// JSON file holding `token`, `refreshToken` and `user`
    pub storage_path: String,
    /// A token this close to its `exp` claim already counts as expired
    pub expiry_margin_seconds: i64,
}

/// Ticket purchase configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PurchaseConfig {
    pub min_quantity: u32,
    pub max_quantity: u32,
    pub payment_method: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub file_name: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("TICKETDESK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::TicketDeskError> {
        super::validation::validate_settings(self)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_seconds: None,
            user_agent: format!("TicketDesk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: ".ticketdesk/session.json".to_string(),
            expiry_margin_seconds: 60,
        }
    }
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            min_quantity: 1,
            max_quantity: 10,
            payment_method: "card".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: ".ticketdesk/logs".to_string(),
            file_name: "ticketdesk.log".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            purchase: PurchaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
