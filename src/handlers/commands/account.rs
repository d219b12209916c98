//! Profile, waitlist and transaction history

use crate::utils::errors::Result;
use crate::workflows::{AccountWorkflow, ProfileForm};
use super::super::context::AppContext;
use super::super::views::{render_transactions, render_waitlist};

pub async fn handle_waitlist(ctx: &AppContext) -> Result<String> {
    let entries = AccountWorkflow::new(ctx.services.clone()).load_waitlist().await?;
    Ok(render_waitlist(&entries))
}

pub async fn handle_transactions(ctx: &AppContext) -> Result<String> {
    let (transactions, tickets) = AccountWorkflow::new(ctx.services.clone())
        .load_transactions()
        .await?;
    Ok(render_transactions(&transactions, &tickets))
}

pub async fn handle_profile(ctx: &AppContext, mut form: ProfileForm) -> Result<String> {
    AccountWorkflow::new(ctx.services.clone())
        .update_profile(&mut form)
        .await
}
