//! Ticket lifecycle
//!
//! Pure derivations over API data: ticket buckets, return eligibility and
//! per-event availability.

pub mod availability;
pub mod classifier;

pub use availability::{all_types_sold_out, available, EventOffer};
pub use classifier::{bucket_of, classify, is_return_eligible, status_counts, Bucket, TicketBuckets};
