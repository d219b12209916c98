//! User profile service

use std::sync::Arc;
use tracing::info;
use crate::models::{UpdateUserRequest, User};
use crate::state::SessionStore;
use crate::utils::errors::Result;
use super::api::ApiClient;

#[derive(Clone)]
pub struct UserService {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl UserService {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// `PUT /users/:id`, then refresh the cached user.
    ///
    /// The response may or may not echo the user back; without it the
    /// cached copy is patched from the request.
    pub async fn update_profile(&self, user: &User, request: &UpdateUserRequest) -> Result<User> {
        let response: Option<serde_json::Value> = self.api.put(&format!("/users/{}", user.id), request).await?;

        let updated = response
            .and_then(|body| body.get("user").cloned())
            .and_then(|value| serde_json::from_value::<User>(value).ok())
            .unwrap_or_else(|| User {
                first_name: Some(request.first_name.clone()),
                last_name: Some(request.last_name.clone()),
                email: request.email.clone(),
                ..user.clone()
            });

        self.session.set_user(updated.clone());
        info!(user_id = user.id, password_changed = request.password.is_some(), "Profile updated");
        Ok(updated)
    }
}
