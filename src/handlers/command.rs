//! Command parsing for the terminal front-end

use crate::models::EventFilter;
use crate::utils::errors::{TicketDeskError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: String, password: String, organizer: bool },
    Register {
        first_name: String,
        last_name: String,
        email: String,
        password: String,
        confirm_password: String,
        organizer: bool,
    },
    Logout,
    Whoami,
    Events { filter: EventFilter, page: u32, search: Option<String> },
    Event { event_id: i64 },
    Buy { event_id: i64, ticket_type_id: i64, quantity: String },
    Join { event_id: i64 },
    Tickets,
    Accept { transaction_id: i64 },
    Decline { transaction_id: i64 },
    Return { ticket_id: i64 },
    Waitlist,
    Transactions,
    MyEvent { event_id: i64 },
    Profile {
        first_name: String,
        last_name: String,
        email: String,
        old_password: Option<String>,
        password: Option<String>,
    },
    OrgEvents,
    OrgCreate { definition: String },
    OrgEdit { event_id: i64, definition: String },
    OrgDelete { event_id: i64 },
    OrgTickets { event_id: i64 },
    OrgRefund { event_id: i64, ticket_id: i64 },
    OrgWaitlist { event_id: i64 },
    OrgRemove { event_id: i64, entry_id: i64 },
    OrgAnalytics { event_id: i64 },
    Help,
    Quit,
}

fn usage(text: &str) -> TicketDeskError {
    TicketDeskError::Validation(format!("Usage: {}", text))
}

fn id_arg(args: &[&str], index: usize, usage_text: &str) -> Result<i64> {
    args.get(index)
        .and_then(|raw| raw.trim_start_matches('#').parse::<i64>().ok())
        .ok_or_else(|| usage(usage_text))
}

impl Command {
    /// Parse one input line; `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match name.to_lowercase().as_str() {
            "login" | "organizer-login" => {
                let &[email, password] = args.as_slice() else {
                    return Err(usage(&format!("{} <email> <password>", name)));
                };
                Command::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                    organizer: name.eq_ignore_ascii_case("organizer-login"),
                }
            }
            "register" | "organizer-register" => {
                let &[first, last, email, password, confirm] = args.as_slice() else {
                    return Err(usage(&format!(
                        "{} <first> <last> <email> <password> <confirm-password>",
                        name
                    )));
                };
                Command::Register {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    confirm_password: confirm.to_string(),
                    organizer: name.eq_ignore_ascii_case("organizer-register"),
                }
            }
            "logout" => Command::Logout,
            "whoami" => Command::Whoami,
            "events" => {
                let mut rest = args.as_slice();
                let mut filter = EventFilter::default();
                let mut page = 1;
                if let Some(parsed) = rest.first().and_then(|raw| EventFilter::parse(raw)) {
                    filter = parsed;
                    rest = &rest[1..];
                }
                if let Some(parsed) = rest.first().and_then(|raw| raw.parse::<u32>().ok()) {
                    page = parsed.max(1);
                    rest = &rest[1..];
                }
                let search = (!rest.is_empty()).then(|| rest.join(" "));
                Command::Events { filter, page, search }
            }
            "event" => Command::Event {
                event_id: id_arg(&args, 0, "event <id>")?,
            },
            "buy" => {
                if args.len() != 3 {
                    return Err(usage("buy <event> <ticket-type> <quantity>"));
                }
                Command::Buy {
                    event_id: id_arg(&args, 0, "buy <event> <ticket-type> <quantity>")?,
                    ticket_type_id: id_arg(&args, 1, "buy <event> <ticket-type> <quantity>")?,
                    quantity: args[2].to_string(),
                }
            }
            "join" => Command::Join {
                event_id: id_arg(&args, 0, "join <event>")?,
            },
            "tickets" => Command::Tickets,
            "accept" => Command::Accept {
                transaction_id: id_arg(&args, 0, "accept <transaction>")?,
            },
            "decline" => Command::Decline {
                transaction_id: id_arg(&args, 0, "decline <transaction>")?,
            },
            "return" => Command::Return {
                ticket_id: id_arg(&args, 0, "return <ticket>")?,
            },
            "waitlist" => Command::Waitlist,
            "transactions" => Command::Transactions,
            "my-event" => Command::MyEvent {
                event_id: id_arg(&args, 0, "my-event <event>")?,
            },
            "profile" => match args.as_slice() {
                &[first, last, email] => Command::Profile {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: email.to_string(),
                    old_password: None,
                    password: None,
                },
                &[first, last, email, old, new] => Command::Profile {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: email.to_string(),
                    old_password: Some(old.to_string()),
                    password: Some(new.to_string()),
                },
                _ => return Err(usage("profile <first> <last> <email> [old-password new-password]")),
            },
            "org-events" => Command::OrgEvents,
            "org-create" => {
                if rest.is_empty() {
                    return Err(usage(
                        "org-create <title>|<location>|<start>|<end>|<description>|<Type:price:total;...>",
                    ));
                }
                Command::OrgCreate { definition: rest.to_string() }
            }
            "org-edit" => {
                let usage_text = "org-edit <id> <title>|<location>|<start>|<end>|<description>|<[id=]Type:price:total;...>";
                let (id, definition) = rest.split_once(char::is_whitespace).ok_or_else(|| usage(usage_text))?;
                Command::OrgEdit {
                    event_id: id_arg(&[id], 0, usage_text)?,
                    definition: definition.trim().to_string(),
                }
            }
            "org-delete" => Command::OrgDelete {
                event_id: id_arg(&args, 0, "org-delete <event>")?,
            },
            "org-tickets" => Command::OrgTickets {
                event_id: id_arg(&args, 0, "org-tickets <event>")?,
            },
            "org-refund" => Command::OrgRefund {
                event_id: id_arg(&args, 0, "org-refund <event> <ticket>")?,
                ticket_id: id_arg(&args, 1, "org-refund <event> <ticket>")?,
            },
            "org-waitlist" => Command::OrgWaitlist {
                event_id: id_arg(&args, 0, "org-waitlist <event>")?,
            },
            "org-remove" => Command::OrgRemove {
                event_id: id_arg(&args, 0, "org-remove <event> <entry>")?,
                entry_id: id_arg(&args, 1, "org-remove <event> <entry>")?,
            },
            "org-analytics" => Command::OrgAnalytics {
                event_id: id_arg(&args, 0, "org-analytics <event>")?,
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(TicketDeskError::Validation(format!(
                    "Unknown command \"{}\". Type help for a list of commands.",
                    other
                )))
            }
        };

        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_events_arguments() {
        assert_eq!(
            Command::parse("events").unwrap(),
            Some(Command::Events { filter: EventFilter::Upcoming, page: 1, search: None })
        );
        assert_eq!(
            Command::parse("events past 2 lindy hop").unwrap(),
            Some(Command::Events {
                filter: EventFilter::Past,
                page: 2,
                search: Some("lindy hop".to_string())
            })
        );
    }

    #[test]
    fn test_buy_keeps_raw_quantity() {
        assert_eq!(
            Command::parse("buy 4 2 abc").unwrap(),
            Some(Command::Buy { event_id: 4, ticket_type_id: 2, quantity: "abc".to_string() })
        );
        assert_matches!(Command::parse("buy 4"), Err(TicketDeskError::Validation(_)));
    }

    #[test]
    fn test_org_edit_splits_id() {
        assert_eq!(
            Command::parse("org-edit 9 Gala|Hall|2030-01-01T20:00||Fun|1=Regular:20:50").unwrap(),
            Some(Command::OrgEdit {
                event_id: 9,
                definition: "Gala|Hall|2030-01-01T20:00||Fun|1=Regular:20:50".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_matches!(Command::parse("dance"), Err(TicketDeskError::Validation(_)));
        assert_eq!(
            Command::parse("organizer-login a@b.co secret").unwrap(),
            Some(Command::Login { email: "a@b.co".to_string(), password: "secret".to_string(), organizer: true })
        );
    }
}
