//! Account management
//!
//! Registration, profile updates and the data behind the profile page:
//! tickets (with the events they belong to), waitlist entries and
//! transaction history.

use std::cmp::Reverse;
use futures::future::try_join_all;
use tracing::{debug, info};
use crate::models::{Event, RegisterRequest, Ticket, TicketStatus, Transaction, UpdateUserRequest, User, WaitlistEntry};
use crate::services::ServiceFactory;
use crate::utils::errors::{TicketDeskError, Result};
use crate::utils::validation::{
    validate_email, validate_input, validate_password, validate_password_match, PasswordStrength,
    DEFAULT_MAX_INPUT_LENGTH,
};

/// Registration form as typed by the user
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Validate every field and build the request body
    pub fn validate(&self) -> Result<(RegisterRequest, PasswordStrength)> {
        let first_name = validate_input(&self.first_name, "First name", DEFAULT_MAX_INPUT_LENGTH)?;
        let last_name = validate_input(&self.last_name, "Last name", DEFAULT_MAX_INPUT_LENGTH)?;
        let email = validate_email(&self.email)?;
        let strength = validate_password(&self.password)?;
        validate_password_match(&self.password, &self.confirm_password)?;

        Ok((
            RegisterRequest {
                first_name,
                last_name,
                email,
                password: self.password.clone(),
            },
            strength,
        ))
    }
}

/// Profile edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub old_password: String,
    pub password: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
            email: user.email.clone(),
            old_password: String::new(),
            password: String::new(),
        }
    }

    /// Build the `PUT /users/:id` body.
    ///
    /// Password fields are sent only when a new password is given, and a new
    /// password needs the current one.
    pub fn request(&self) -> Result<UpdateUserRequest> {
        let changing_password = !self.password.is_empty();
        if changing_password && self.old_password.is_empty() {
            return Err(TicketDeskError::Validation(
                "Please enter your current password to change it.".to_string(),
            ));
        }

        Ok(UpdateUserRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: validate_email(&self.email)?,
            old_password: changing_password.then(|| self.old_password.clone()),
            password: changing_password.then(|| self.password.clone()),
        })
    }

    fn clear_passwords(&mut self) {
        self.old_password.clear();
        self.password.clear();
    }
}

/// "refunded" once every ticket of the transaction is refunded, else the
/// transaction's own status
pub fn transaction_display_status<'a>(transaction: &'a Transaction, tickets: &[Ticket]) -> &'a str {
    let mut owned = tickets
        .iter()
        .filter(|t| t.transaction_id == Some(transaction.id))
        .peekable();

    if owned.peek().is_some() && owned.all(|t| t.status == TicketStatus::Refunded) {
        "refunded"
    } else {
        &transaction.status
    }
}

/// Newest first; undated transactions go last
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|tx| Reverse(tx.created_at));
}

/// Everything the profile page shows
#[derive(Debug, Clone, Default)]
pub struct ProfileData {
    pub tickets: Vec<Ticket>,
    /// Events referenced by `tickets`; used for return eligibility
    pub events: Vec<Event>,
    pub waitlist: Vec<WaitlistEntry>,
    pub transactions: Vec<Transaction>,
}

impl ProfileData {
    /// Tickets first, then their events concurrently, then waitlist and
    /// transactions
    pub async fn load(services: &ServiceFactory, user: &User) -> Result<Self> {
        let tickets = services.ticket_service.list_for_user(user.id).await?;

        let mut event_ids: Vec<i64> = tickets.iter().filter_map(|t| t.event_id).collect();
        event_ids.sort_unstable();
        event_ids.dedup();
        debug!(user_id = user.id, events = event_ids.len(), "Loading events for tickets");

        let events = try_join_all(event_ids.iter().map(|id| services.event_service.get(*id))).await?;
        let waitlist = services.waitlist_service.list_for_user(user.id).await?;
        let mut transactions = services.transaction_service.list_for_user(user.id).await?;
        sort_newest_first(&mut transactions);

        Ok(Self {
            tickets,
            events,
            waitlist,
            transactions,
        })
    }
}

pub struct AccountWorkflow {
    services: ServiceFactory,
}

impl AccountWorkflow {
    pub fn new(services: ServiceFactory) -> Self {
        Self { services }
    }

    fn current_user(&self, return_to: &str) -> Result<User> {
        if !self
            .services
            .session
            .require_auth(self.services.navigator.as_ref(), Some(return_to.to_string()))
        {
            return Err(TicketDeskError::NotAuthenticated);
        }
        self.services.session.user().ok_or(TicketDeskError::NotAuthenticated)
    }

    pub async fn register(&self, form: &RegistrationForm, organizer: bool) -> Result<User> {
        let (request, strength) = form.validate()?;
        debug!(strength = ?strength, organizer = organizer, "Registration form valid");

        if organizer {
            self.services.auth_service.organizer_register(&request).await
        } else {
            self.services.auth_service.register(&request).await
        }
    }

    /// Save the profile; on success the password fields are cleared
    pub async fn update_profile(&self, form: &mut ProfileForm) -> Result<String> {
        let request = form.request()?;
        let user = self.current_user("/profile")?;

        self.services.user_service.update_profile(&user, &request).await?;
        form.clear_passwords();
        Ok("Profile updated!".to_string())
    }

    pub async fn load_profile(&self) -> Result<ProfileData> {
        let user = self.current_user("/profile")?;
        ProfileData::load(&self.services, &user).await
    }

    pub async fn load_waitlist(&self) -> Result<Vec<WaitlistEntry>> {
        let user = self.current_user("/waitlist")?;
        self.services.waitlist_service.list_for_user(user.id).await
    }

    /// Transactions with the tickets needed for their display status
    pub async fn load_transactions(&self) -> Result<(Vec<Transaction>, Vec<Ticket>)> {
        let user = self.current_user("/profile")?;
        let (mut transactions, tickets) = futures::try_join!(
            self.services.transaction_service.list_for_user(user.id),
            self.services.ticket_service.list_for_user(user.id),
        )?;
        sort_newest_first(&mut transactions);
        Ok((transactions, tickets))
    }

    /// The user's tickets for one event
    pub async fn load_event_tickets(&self, event_id: i64) -> Result<(Event, Vec<Ticket>)> {
        let user = self.current_user(&format!("/my-tickets/event/{}", event_id))?;
        let result = self.services.ticket_service.list_for_user_event(user.id, event_id).await?;
        info!(user_id = user.id, event_id = event_id, tickets = result.1.len(), "Loaded event tickets");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn ticket(id: i64, transaction_id: i64, status: TicketStatus) -> Ticket {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "transaction_id": transaction_id,
            "status": status.as_str(),
        }))
        .unwrap()
    }

    fn transaction(id: i64, minutes_ago: Option<i64>) -> Transaction {
        Transaction {
            id,
            user_id: Some(1),
            event_id: Some(1),
            event_title: None,
            ticket_type: None,
            quantity: Some(1),
            total_price: Decimal::from(20),
            payment_method: Some("card".to_string()),
            status: "completed".to_string(),
            reference_code: None,
            created_at: minutes_ago.map(|m| Utc::now() - Duration::minutes(m)),
        }
    }

    #[test]
    fn test_profile_form_password_rules() {
        let mut form = ProfileForm {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            email: "ana@example.com".to_string(),
            old_password: String::new(),
            password: "N3wPassword!".to_string(),
        };
        assert_matches!(
            form.request(),
            Err(TicketDeskError::Validation(msg)) if msg == "Please enter your current password to change it."
        );

        form.password.clear();
        let request = form.request().unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("password").is_none());
        assert!(body.get("oldPassword").is_none());

        form.old_password = "0ldPassword!".to_string();
        form.password = "N3wPassword!".to_string();
        let body = serde_json::to_value(form.request().unwrap()).unwrap();
        assert_eq!(body["oldPassword"], "0ldPassword!");
        assert_eq!(body["password"], "N3wPassword!");
    }

    #[test]
    fn test_transaction_display_status() {
        let tx = transaction(7, Some(5));
        let all_refunded = vec![ticket(1, 7, TicketStatus::Refunded), ticket(2, 7, TicketStatus::Refunded)];
        assert_eq!(transaction_display_status(&tx, &all_refunded), "refunded");

        let mixed = vec![ticket(1, 7, TicketStatus::Refunded), ticket(2, 7, TicketStatus::Active)];
        assert_eq!(transaction_display_status(&tx, &mixed), "completed");

        assert_eq!(transaction_display_status(&tx, &[]), "completed");
    }

    #[test]
    fn test_sort_newest_first() {
        let mut transactions = vec![transaction(1, Some(60)), transaction(2, None), transaction(3, Some(1))];
        sort_newest_first(&mut transactions);
        let ids: Vec<i64> = transactions.iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_registration_form() {
        let form = RegistrationForm {
            first_name: " Ana ".to_string(),
            last_name: "Silva".to_string(),
            email: "ana@example.com".to_string(),
            password: "Passw0rd".to_string(),
            confirm_password: "Passw0rd".to_string(),
        };
        let (request, strength) = form.validate().unwrap();
        assert_eq!(request.first_name, "Ana");
        assert_eq!(strength, PasswordStrength::Medium);

        let mismatch = RegistrationForm {
            confirm_password: "different".to_string(),
            ..form
        };
        assert!(mismatch.validate().is_err());
    }
}
