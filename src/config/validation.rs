//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{TicketDeskError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_api_config(&settings.api)?;
    validate_session_config(&settings.session)?;
    validate_purchase_config(&settings.purchase)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(TicketDeskError::Config(
            "API base URL is required".to_string()
        ));
    }

    url::Url::parse(&config.base_url)
        .map_err(|e| TicketDeskError::Config(format!("Invalid API base URL: {}", e)))?;

    if config.timeout_seconds == Some(0) {
        return Err(TicketDeskError::Config(
            "API timeout must be greater than 0 when set".to_string()
        ));
    }

    Ok(())
}

/// Validate session configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if config.storage_path.is_empty() {
        return Err(TicketDeskError::Config(
            "Session storage path is required".to_string()
        ));
    }

    if config.expiry_margin_seconds < 0 {
        return Err(TicketDeskError::Config(
            "Session expiry margin cannot be negative".to_string()
        ));
    }

    Ok(())
}

/// Validate purchase configuration
fn validate_purchase_config(config: &super::PurchaseConfig) -> Result<()> {
    if config.min_quantity == 0 {
        return Err(TicketDeskError::Config(
            "Minimum purchase quantity must be at least 1".to_string()
        ));
    }

    if config.min_quantity > config.max_quantity {
        return Err(TicketDeskError::Config(
            "Minimum purchase quantity cannot be greater than maximum".to_string()
        ));
    }

    if config.payment_method.is_empty() {
        return Err(TicketDeskError::Config(
            "Payment method is required".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(TicketDeskError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(TicketDeskError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
