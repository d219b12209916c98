//! Test helpers module
//!
//! Shared setup for the integration tests: a mock ticketing API, session
//! fixtures and scripted front-end seams.

#![allow(dead_code)]

pub mod test_context;
pub mod test_data;

pub use test_context::*;
pub use test_data::*;
