//! Client-side state
//!
//! The session context, its persistence, the navigation seam and the
//! stale-response guard.

pub mod latest;
pub mod navigation;
pub mod session;
pub mod storage;

pub use latest::{LatestRequests, RequestToken};
pub use navigation::{ConsoleNavigator, Navigator, LOGIN_PATH};
pub use session::{token_expiry, SessionStore, DEFAULT_EXPIRY_MARGIN_SECONDS};
pub use storage::{FileSessionStorage, MemorySessionStorage, PersistedSession, SessionStorage};
