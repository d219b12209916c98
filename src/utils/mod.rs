//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, form validation and helper functions.

pub mod errors;
pub mod logging;
pub mod helpers;
pub mod validation;

pub use errors::{TicketDeskError, Result};
