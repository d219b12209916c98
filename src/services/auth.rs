//! Authentication service
//!
//! Login and registration for buyers and organizers. Every successful call
//! funnels its token pair into the shared [`SessionStore`].

use std::sync::Arc;
use tracing::info;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::state::SessionStore;
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;
use super::api::ApiClient;

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.authenticate("/users/login", &Self::credentials(email, password)).await
    }

    pub async fn organizer_login(&self, email: &str, password: &str) -> Result<User> {
        self.authenticate("/users/organizer-login", &Self::credentials(email, password)).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.authenticate("/users/register", request).await
    }

    pub async fn organizer_register(&self, request: &RegisterRequest) -> Result<User> {
        self.authenticate("/users/organizer-register", request).await
    }

    fn credentials(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    async fn authenticate<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<User> {
        let auth: AuthResponse = self.api.post(path, body).await?;
        let user = auth.user.clone();
        self.session.establish(auth);

        info!(user_id = user.id, role = ?user.role, path = path, "User authenticated");
        log_user_action(Some(user.id), "authenticate", Some(path));
        Ok(user)
    }
}
