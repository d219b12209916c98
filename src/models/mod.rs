//! Data models
//!
//! Transient client-side copies of server-owned entities, shaped after the
//! REST API's JSON.

pub mod auth;
pub mod event;
pub mod ticket;
pub mod transaction;
pub mod user;
pub mod waitlist;

pub use auth::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
pub use event::{
    DeleteEventRequest, Event, EventAnalytics, EventFilter, EventPage, EventPayload, Pagination,
    PaymentMethodStats, RecentSale, TicketType, TicketTypePayload,
};
pub use ticket::{PurchaseRequest, Ticket, TicketStatus};
pub use transaction::Transaction;
pub use user::{UpdateUserRequest, User, UserRole};
pub use waitlist::{JoinWaitlistRequest, WaitlistEntry};
