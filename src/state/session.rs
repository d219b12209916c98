//! Session and identity store
//!
//! One `SessionStore` exists per process and is shared as
//! `Arc<SessionStore>`. It is the only place the token pair and the current
//! user are mutated: login, refresh and logout all go through it.

use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::{debug, info, warn};
use crate::models::{AuthResponse, User};
use crate::utils::errors::Result;
use super::navigation::Navigator;
use super::storage::{PersistedSession, SessionStorage};

/// Seconds before `exp` at which a token already counts as expired
pub const DEFAULT_EXPIRY_MARGIN_SECONDS: i64 = 60;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

/// Read the `exp` claim of an access token.
///
/// The signature is not checked: the client has no key and only needs the
/// expiry to decide whether to refresh.
pub fn token_expiry(token: &str) -> Result<i64> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::from(["exp".to_string()]);

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims.exp)
}

#[derive(Debug, Default, Clone)]
struct SessionState {
    token: Option<String>,
    refresh_token: Option<String>,
    user: Option<User>,
}

pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: Arc<dyn SessionStorage>,
    expiry_margin_seconds: i64,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>, expiry_margin_seconds: i64) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            storage,
            expiry_margin_seconds,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Hydrate from storage.
    ///
    /// A token that cannot be decoded wipes storage. So does an expired
    /// token with no refresh token. An expired token that can still be
    /// refreshed keeps the user; the API client refreshes on the first 401.
    pub fn init(&self) -> Result<()> {
        let persisted = match self.storage.load() {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                debug!("No stored session");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "Stored session unreadable, clearing");
                self.storage.clear()?;
                return Ok(());
            }
        };

        let (token, user) = match (persisted.token.clone(), persisted.user.clone()) {
            (Some(token), Some(user)) => (token, user),
            _ => {
                debug!("Stored session incomplete, ignoring");
                return Ok(());
            }
        };

        let expiry = match token_expiry(&token) {
            Ok(exp) => exp,
            Err(e) => {
                warn!(error = %e, "Stored token could not be decoded, clearing session");
                self.storage.clear()?;
                return Ok(());
            }
        };

        if self.expired_at(expiry, Utc::now().timestamp()) && persisted.refresh_token.is_none() {
            info!(user_id = user.id, "Stored token expired without refresh token, clearing session");
            self.storage.clear()?;
            return Ok(());
        }

        info!(user_id = user.id, "Session restored");
        *self.write() = SessionState {
            token: Some(token),
            refresh_token: persisted.refresh_token,
            user: Some(user),
        };
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.read().user.as_ref().map(|u| u.id)
    }

    fn expired_at(&self, exp: i64, now: i64) -> bool {
        now >= exp - self.expiry_margin_seconds
    }

    /// True with no token, an undecodable token, or one within the margin
    /// of its expiry
    pub fn is_token_expired(&self) -> bool {
        self.is_token_expired_at(Utc::now().timestamp())
    }

    pub fn is_token_expired_at(&self, now: i64) -> bool {
        match self.token() {
            None => true,
            Some(token) => match token_expiry(&token) {
                Ok(exp) => self.expired_at(exp, now),
                Err(_) => true,
            },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().user.is_some() && !self.is_token_expired()
    }

    /// Same check as `is_authenticated`, logged for route guards
    pub fn check_auth(&self) -> bool {
        let authenticated = self.is_authenticated();
        debug!(authenticated = authenticated, "Auth check");
        authenticated
    }

    /// Guard for actions that need a logged-in user.
    ///
    /// Redirects to login (with `return_to`) and returns `false` when there
    /// is no user or the token has expired; in the latter case the session
    /// is cleared first.
    pub fn require_auth(&self, navigator: &dyn Navigator, return_to: Option<String>) -> bool {
        if self.read().user.is_none() {
            debug!("No user in session, redirecting to login");
            navigator.redirect_to_login(return_to);
            return false;
        }

        if self.is_token_expired() {
            info!("Session token expired, logging out");
            self.clear();
            navigator.redirect_to_login(return_to);
            return false;
        }

        true
    }

    /// Store the result of a login, registration or refresh
    pub fn establish(&self, auth: AuthResponse) {
        let user_id = auth.user.id;
        let state = SessionState {
            token: Some(auth.token),
            refresh_token: Some(auth.refresh_token),
            user: Some(auth.user),
        };
        *self.write() = state.clone();
        self.persist(&state);
        debug!(user_id = user_id, "Session established");
    }

    /// Replace the cached user after a profile update
    pub fn set_user(&self, user: User) {
        let state = {
            let mut guard = self.write();
            guard.user = Some(user);
            guard.clone()
        };
        self.persist(&state);
    }

    fn persist(&self, state: &SessionState) {
        let snapshot = PersistedSession {
            token: state.token.clone(),
            refresh_token: state.refresh_token.clone(),
            user: state.user.clone(),
        };
        if let Err(e) = self.storage.save(&snapshot) {
            warn!(error = %e, "Failed to persist session");
        }
    }

    /// Drop the token pair and user, in memory and in storage
    pub fn clear(&self) {
        *self.write() = SessionState::default();
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }
    }

    pub fn logout(&self, navigator: &dyn Navigator) {
        let user_id = self.user_id();
        self.clear();
        info!(user_id = user_id, "User logged out");
        navigator.navigate("/");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::state::storage::MemorySessionStorage;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token_expiring_in(seconds: i64) -> String {
        let claims = json!({ "id": 1, "exp": Utc::now().timestamp() + seconds });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap()
    }

    fn user() -> User {
        User {
            id: 1,
            first_name: Some("Ana".to_string()),
            last_name: Some("Silva".to_string()),
            email: "ana@example.com".to_string(),
            role: UserRole::User,
        }
    }

    fn store_with(token: Option<String>, refresh: Option<&str>) -> (SessionStore, Arc<MemorySessionStorage>) {
        let storage = Arc::new(MemorySessionStorage::with_session(PersistedSession {
            token,
            refresh_token: refresh.map(str::to_string),
            user: Some(user()),
        }));
        let store = SessionStore::new(storage.clone(), DEFAULT_EXPIRY_MARGIN_SECONDS);
        (store, storage)
    }

    #[test]
    fn test_expiry_margin() {
        let (store, _) = store_with(Some(token_expiring_in(30)), Some("r"));
        store.init().unwrap();
        assert!(store.is_token_expired());

        let (store, _) = store_with(Some(token_expiring_in(120)), Some("r"));
        store.init().unwrap();
        assert!(!store.is_token_expired());
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_init_clears_undecodable_token() {
        let (store, storage) = store_with(Some("not-a-jwt".to_string()), Some("r"));
        store.init().unwrap();
        assert!(store.user().is_none());
        assert!(storage.snapshot().is_none());
    }

    #[test]
    fn test_init_clears_expired_token_without_refresh() {
        let (store, storage) = store_with(Some(token_expiring_in(-600)), None);
        store.init().unwrap();
        assert!(store.user().is_none());
        assert!(storage.snapshot().is_none());
    }

    #[test]
    fn test_init_keeps_expired_token_with_refresh() {
        let (store, storage) = store_with(Some(token_expiring_in(-600)), Some("r"));
        store.init().unwrap();
        assert_eq!(store.user(), Some(user()));
        assert!(store.is_token_expired());
        assert!(!store.is_authenticated());
        assert!(storage.snapshot().is_some());
    }

    #[test]
    fn test_establish_and_clear() {
        let storage = Arc::new(MemorySessionStorage::new());
        let store = SessionStore::new(storage.clone(), DEFAULT_EXPIRY_MARGIN_SECONDS);
        store.establish(AuthResponse {
            token: token_expiring_in(3600),
            refresh_token: "refresh".to_string(),
            user: user(),
        });

        assert!(store.is_authenticated());
        assert_eq!(storage.snapshot().unwrap().refresh_token.as_deref(), Some("refresh"));

        store.clear();
        assert!(store.token().is_none());
        assert!(storage.snapshot().is_none());
    }
}
