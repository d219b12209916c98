//! Authenticated REST client
//!
//! Every call to the ticketing API goes through [`ApiClient`]. It attaches
//! the bearer token, turns non-2xx responses into [`TicketDeskError`]s and
//! recovers from an expired access token with a single in-flight refresh.

use std::sync::Arc;
use std::time::Duration;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;
use crate::config::ApiConfig;
use crate::models::{AuthResponse, RefreshRequest};
use crate::state::{Navigator, SessionStore};
use crate::utils::errors::{TicketDeskError, Result};
use crate::utils::logging::{log_api_error, log_refresh_event};

/// Endpoint exchanging a refresh token for a new token pair
pub const REFRESH_PATH: &str = "/users/refresh-token";

/// Attendee and organizer login/registration endpoints
const CREDENTIALS_PATHS: [&str; 4] = [
    "/users/login",
    "/users/register",
    "/users/organizer-login",
    "/users/organizer-register",
];

/// 401s on these paths are bad credentials, not an expired session
fn is_credentials_endpoint(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path).trim_end_matches('/');
    CREDENTIALS_PATHS.contains(&path)
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    /// Held for the whole duration of a refresh
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Result<Self> {
        url::Url::parse(&config.base_url)?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
            refresh_gate: Arc::new(Mutex::new(())),
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    fn url(&self, path: &str) -> Result<url::Url> {
        Ok(url::Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// POST without a request body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<(), T>(Method::POST, path, None).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// PUT without a request body
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<(), T>(Method::PUT, path, None).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<(), T>(Method::DELETE, path, None).await
    }

    pub async fn delete_with_body<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(Method::DELETE, path, Some(body)).await
    }

    /// Send a request, refreshing the session once on a 401
    pub async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let token = self.session.token();
        let response = self.execute(&method, path, body, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return self.handle_response(&method, path, response).await;
        }

        let message = Self::error_message(response).await;

        if is_credentials_endpoint(path) {
            debug!(path = path, "401 on credentials endpoint, not refreshing");
            return Err(TicketDeskError::Authentication(message));
        }

        if path.starts_with(REFRESH_PATH) {
            self.expire_session();
            return Err(TicketDeskError::SessionExpired);
        }

        let fresh_token = self.refresh_after_unauthorized(token.as_deref()).await?;

        debug!(method = %method, path = path, "Replaying request with refreshed token");
        let replay = self.execute(&method, path, body, Some(&fresh_token)).await?;
        if replay.status() == StatusCode::UNAUTHORIZED {
            warn!(method = %method, path = path, "Replayed request still unauthorized");
            self.expire_session();
            return Err(TicketDeskError::SessionExpired);
        }

        self.handle_response(&method, path, replay).await
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: &Method,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<reqwest::Response> {
        let request_id = Uuid::new_v4();
        let mut request = self.http.request(method.clone(), self.url(path)?);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(request_id = %request_id, method = %method, path = path, "API request");
        let response = request.send().await.map_err(|e| {
            log_api_error(method.as_str(), path, None, &e.to_string());
            TicketDeskError::Http(e)
        })?;
        debug!(
            request_id = %request_id,
            method = %method,
            path = path,
            status = response.status().as_u16(),
            "API response"
        );

        Ok(response)
    }

    /// Resolve a 401 seen while holding `stale_token`.
    ///
    /// Callers queue on the gate. The first one through refreshes; the rest
    /// find a different token in the session and reuse it, or find the
    /// session cleared because that refresh failed.
    async fn refresh_after_unauthorized(&self, stale_token: Option<&str>) -> Result<String> {
        let _gate = self.refresh_gate.lock().await;

        let current = self.session.token();
        match (&current, stale_token) {
            (Some(current), stale) if Some(current.as_str()) != stale => {
                debug!("Token already refreshed by another request");
                return Ok(current.clone());
            }
            (None, Some(_)) => {
                debug!("Session cleared by a failed refresh");
                return Err(TicketDeskError::SessionExpired);
            }
            _ => {}
        }

        let Some(refresh_token) = self.session.refresh_token() else {
            log_refresh_event(false, Some("no refresh token"));
            self.expire_session();
            return Err(TicketDeskError::SessionExpired);
        };

        match self.request_refresh(&refresh_token).await {
            Ok(auth) => {
                let token = auth.token.clone();
                self.session.establish(auth);
                log_refresh_event(true, None);
                Ok(token)
            }
            Err(e) => {
                log_refresh_event(false, Some(&e.to_string()));
                self.expire_session();
                Err(TicketDeskError::SessionExpired)
            }
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<AuthResponse> {
        info!("Refreshing access token");
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let response = self.execute(&Method::POST, REFRESH_PATH, Some(&body), None).await?;
        self.handle_response(&Method::POST, REFRESH_PATH, response).await
    }

    fn expire_session(&self) {
        self.session.clear();
        self.navigator.redirect_to_login(None);
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            log_api_error(method.as_str(), path, Some(status.as_u16()), &message);
            return Err(TicketDeskError::Api { status, message });
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// The server's `message` field, or `HTTP <status>`
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let fallback = format!("HTTP {}", status.as_u16());
        match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or(fallback),
            Err(_) => fallback,
        }
    }
}
