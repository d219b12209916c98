//! Command handlers, one module per area of the front-end

pub mod account;
pub mod events;
pub mod organizer;
pub mod session;
pub mod tickets;
