//! Navigation seam
//!
//! Routing lives outside the crate; session and API code only ask for a
//! destination through this trait.

use std::sync::Mutex;

/// Path of the login view
pub const LOGIN_PATH: &str = "/login";

pub trait Navigator: Send + Sync {
    /// Send the user to the login view, remembering where to come back to
    fn redirect_to_login(&self, return_to: Option<String>);

    fn navigate(&self, path: &str);

    /// Destination requested since the last call, for front-ends that
    /// render navigation themselves
    fn take_pending(&self) -> Option<String> {
        None
    }

    /// Where to go back to after the next successful login
    fn take_return_to(&self) -> Option<String> {
        None
    }
}

/// Navigator for the terminal front-end: records the pending destination so
/// the command loop can show a hint and resume after login.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    pending: Mutex<Option<String>>,
    return_to: Mutex<Option<String>>,
}

impl ConsoleNavigator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Navigator for ConsoleNavigator {
    fn redirect_to_login(&self, return_to: Option<String>) {
        tracing::debug!(return_to = ?return_to, "Redirecting to login");
        *self.return_to.lock().unwrap_or_else(|p| p.into_inner()) = return_to;
        *self.pending.lock().unwrap_or_else(|p| p.into_inner()) = Some(LOGIN_PATH.to_string());
    }

    fn navigate(&self, path: &str) {
        tracing::debug!(path = path, "Navigating");
        *self.pending.lock().unwrap_or_else(|p| p.into_inner()) = Some(path.to_string());
    }

    fn take_pending(&self) -> Option<String> {
        self.pending.lock().unwrap_or_else(|p| p.into_inner()).take()
    }

    fn take_return_to(&self) -> Option<String> {
        self.return_to.lock().unwrap_or_else(|p| p.into_inner()).take()
    }
}
