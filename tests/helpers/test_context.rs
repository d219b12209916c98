//! Test context: mock API server plus a fully wired service factory

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use wiremock::MockServer;
use ticketdesk::config::Settings;
use ticketdesk::models::{AuthResponse, User};
use ticketdesk::services::ServiceFactory;
use ticketdesk::state::{MemorySessionStorage, Navigator, SessionStore, DEFAULT_EXPIRY_MARGIN_SECONDS};
use ticketdesk::workflows::{ConfirmPrompt, Confirmer};
use super::test_data::access_token;

/// Navigator that records every destination it is asked for
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    login_redirects: Mutex<Vec<Option<String>>>,
    navigations: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn login_redirects(&self) -> Vec<Option<String>> {
        self.login_redirects.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self, return_to: Option<String>) {
        self.login_redirects.lock().unwrap().push(return_to);
    }

    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
    }
}

/// Confirmer answering from a script; declines once the script runs out
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<ConfirmPrompt>>,
}

impl ScriptedConfirmer {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

pub struct TestContext {
    pub server: MockServer,
    pub settings: Settings,
    pub storage: Arc<MemorySessionStorage>,
    pub session: Arc<SessionStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub services: ServiceFactory,
}

impl TestContext {
    /// Services pointed at a fresh mock server, with an empty session
    pub async fn new() -> Self {
        let server = MockServer::start().await;

        let mut settings = Settings::default();
        settings.api.base_url = server.uri();

        let storage = Arc::new(MemorySessionStorage::new());
        let session = Arc::new(SessionStore::new(storage.clone(), DEFAULT_EXPIRY_MARGIN_SECONDS));
        let navigator = Arc::new(RecordingNavigator::default());
        let services = ServiceFactory::new(&settings, session.clone(), navigator.clone())
            .expect("Failed to build services");

        Self {
            server,
            settings,
            storage,
            session,
            navigator,
            services,
        }
    }

    /// Log `user` in with a valid access token; returns that token
    pub fn login_as(&self, user: User) -> String {
        let token = access_token(user.id, 3600);
        self.session.establish(AuthResponse {
            token: token.clone(),
            refresh_token: format!("refresh-{}", user.id),
            user,
        });
        token
    }

    /// Requests the mock server saw, as `METHOD /path` in arrival order
    pub async fn request_log(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| format!("{} {}", request.method.as_str(), request.url.path()))
            .collect()
    }
}
