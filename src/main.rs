//! TicketDesk terminal front-end
//!
//! Main application entry point

use std::sync::Arc;
use tracing::{info, warn};

use ticketdesk::{
    config::Settings,
    handlers::{handle_command, render_error, AppContext, Command, ConsoleConfirmer, ConsoleInput, Reply},
    services::ServiceFactory,
    state::{ConsoleNavigator, FileSessionStorage, Navigator, SessionStore},
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", ticketdesk::info());

    // Restore the persisted session
    let storage = Arc::new(FileSessionStorage::new(&settings.session.storage_path));
    let session = Arc::new(SessionStore::new(storage, settings.session.expiry_margin_seconds));
    session.init()?;

    let navigator: Arc<dyn Navigator> = Arc::new(ConsoleNavigator::new());
    let services = ServiceFactory::new(&settings, session.clone(), navigator)?;

    let input = ConsoleInput::stdin();
    let confirmer = Arc::new(ConsoleConfirmer::new(input.clone()));
    let mut ctx = AppContext::new(services, settings.purchase.clone(), confirmer);

    println!("TicketDesk - connected to {}", settings.api.base_url);
    println!("{}", ticketdesk::handlers::views::render_user(session.user().as_ref()));
    println!("Type `help` for a list of commands.");

    while let Some(line) = input.read_line("> ").await {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", render_error(&e));
                continue;
            }
        };

        match handle_command(&mut ctx, command).await {
            Reply::Show(text) if text.is_empty() => {}
            Reply::Show(text) => println!("{}", text),
            Reply::Quit => break,
        }
    }

    if !session.is_authenticated() && session.user().is_some() {
        warn!("Exiting with an expired session; it will be refreshed on next start");
    }
    info!("TicketDesk stopped");
    Ok(())
}
