//! Form input validation
//!
//! Registration and profile forms are checked here before anything is sent
//! to the API.

use std::sync::OnceLock;
use regex::Regex;
use crate::utils::errors::{TicketDeskError, Result};

/// Maximum length accepted for free-text fields such as names
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 255;

/// Password strength as reported to the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Medium,
    Strong,
}

fn email_regex() -> Result<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .ok_or_else(|| TicketDeskError::Config("Invalid email regex pattern".to_string()))
}

/// Validate a required text field and return its trimmed value
pub fn validate_input(input: &str, field: &str, max_length: usize) -> Result<String> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(TicketDeskError::Validation(format!("{} is required", field)));
    }

    if trimmed.chars().count() > max_length {
        return Err(TicketDeskError::Validation(format!(
            "{} is too long (max {} characters)",
            field, max_length
        )));
    }

    Ok(trimmed.to_string())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<String> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(TicketDeskError::Validation("Email is required".to_string()));
    }

    if !email_regex()?.is_match(trimmed) {
        return Err(TicketDeskError::Validation("Invalid email format".to_string()));
    }

    if trimmed.len() > DEFAULT_MAX_INPUT_LENGTH {
        return Err(TicketDeskError::Validation("Email is too long".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validate password strength: 8-128 characters and at least three of
/// uppercase, lowercase, digit, special character.
pub fn validate_password(password: &str) -> Result<PasswordStrength> {
    if password.is_empty() {
        return Err(TicketDeskError::Validation("Password is required".to_string()));
    }

    let length = password.chars().count();
    if length < 8 {
        return Err(TicketDeskError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if length > 128 {
        return Err(TicketDeskError::Validation(
            "Password is too long (max 128 characters)".to_string(),
        ));
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?".contains(c));

    let criteria = [has_upper, has_lower, has_digit, has_special]
        .iter()
        .filter(|met| **met)
        .count();

    if criteria < 3 {
        return Err(TicketDeskError::Validation(
            "Password must contain at least 3 of: uppercase, lowercase, number, special character".to_string(),
        ));
    }

    if length >= 12 && criteria == 4 {
        Ok(PasswordStrength::Strong)
    } else {
        Ok(PasswordStrength::Medium)
    }
}

/// Check the confirmation field of a registration form
pub fn validate_password_match(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(TicketDeskError::Validation("Passwords do not match.".to_string()));
    }
    Ok(())
}
