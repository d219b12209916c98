//! Login, registration and logout

use tracing::info;
use crate::state::Navigator;
use crate::utils::errors::Result;
use crate::workflows::{AccountWorkflow, RegistrationForm};
use super::super::context::AppContext;
use super::super::views::render_user;

pub async fn handle_login(ctx: &AppContext, email: &str, password: &str, organizer: bool) -> Result<String> {
    let auth = &ctx.services.auth_service;
    let user = if organizer {
        auth.organizer_login(email, password).await?
    } else {
        auth.login(email, password).await?
    };

    info!(user_id = user.id, organizer = organizer, "Login successful");
    let mut text = format!("Welcome, {}!", user.display_name());
    if let Some(return_to) = ctx.services.navigator.take_return_to() {
        text.push_str(&format!(" You can pick up where you left off ({}).", return_to));
    }
    Ok(text)
}

pub async fn handle_register(ctx: &AppContext, form: &RegistrationForm, organizer: bool) -> Result<String> {
    let user = AccountWorkflow::new(ctx.services.clone())
        .register(form, organizer)
        .await?;
    Ok(format!("Account created. Welcome, {}!", user.display_name()))
}

pub fn handle_logout(ctx: &AppContext) -> String {
    let navigator: &dyn Navigator = ctx.services.navigator.as_ref();
    ctx.services.session.logout(navigator);
    "You have been logged out.".to_string()
}

pub fn handle_whoami(ctx: &AppContext) -> String {
    let user = ctx.services.session.user();
    let mut text = render_user(user.as_ref());
    if user.is_some() && ctx.services.session.is_token_expired() {
        text.push_str(" (session token expired; it will be refreshed on the next request)");
    }
    text
}
