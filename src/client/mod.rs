//! Typed HTTP client for the task API.
//!
//! One shared `ApiClient` carries the base URL, the session store and the
//! navigation hook. Every request passes through a single send path that
//! decorates it with the bearer token when one is stored, and every failure
//! passes through a single response policy: a 401 whose body says
//! `invalid token` clears the session and redirects to Login, then the error
//! is re-raised to the caller. Nothing is retried or swallowed.

pub mod routes;
pub mod session;

pub use routes::{check_navigation, guard, resolve, NavOutcome, Route, RouteName};
pub use session::{FileSession, MemorySession, SessionError, SessionStore};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::api::response::{DataEnvelope, ErrorBody, ListEnvelope};
use crate::api::{AuthResponse, LoginRequest, TaskBody, TaskResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Missing configuration: {0}")]
    Config(String),
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Receiver for the redirect side effect of the response policy. The app
/// shell wires this into its routing; tests record the calls.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: RouteName);
}

/// Navigator that just logs where it was told to go. Useful for headless
/// embedders that have no routing of their own.
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, to: RouteName) {
        tracing::info!(route = ?to, "Navigation requested");
    }
}

/// Query parameters for the task listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListTasksQuery {
    pub limit: u64,
    pub page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl Default for ListTasksQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            page: 1,
            search: None,
            status: None,
            sort_by: None,
            order: None,
        }
    }
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            base_url,
            http,
            session,
            navigator,
        })
    }

    /// Construct a client from `API_BASE_URL`.
    pub fn from_env(
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let base_url = std::env::var("API_BASE_URL")
            .map_err(|_| ClientError::Config("API_BASE_URL is not set".to_string()))?;
        Self::new(base_url, session, navigator)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Log in and persist the issued token in the session store.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let req = self.http.post(self.url("/login")).json(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        });

        let auth: AuthResponse = parse_data(self.send(req).await?).await?;
        self.session.set_token(&auth.token).await?;
        Ok(auth)
    }

    pub async fn list_tasks(
        &self,
        query: &ListTasksQuery,
    ) -> Result<ListEnvelope<TaskResponse>, ClientError> {
        let req = self.http.get(self.url("/tasks")).query(query);
        let resp = self.send(req).await?;
        Ok(resp.json().await?)
    }

    pub async fn get_task(&self, id: &str) -> Result<TaskResponse, ClientError> {
        let req = self.http.get(self.url(&format!("/tasks/{id}")));
        parse_data(self.send(req).await?).await
    }

    pub async fn create_task(&self, body: &TaskBody) -> Result<TaskResponse, ClientError> {
        let req = self.http.post(self.url("/tasks")).json(body);
        parse_data(self.send(req).await?).await
    }

    pub async fn update_task(&self, id: &str, body: &TaskBody) -> Result<TaskResponse, ClientError> {
        let req = self.http.put(self.url(&format!("/tasks/{id}"))).json(body);
        parse_data(self.send(req).await?).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ClientError> {
        let req = self.http.delete(self.url(&format!("/tasks/{id}")));
        self.send(req).await?;
        Ok(())
    }

    // ========================================================================
    // Send path
    // ========================================================================

    /// Decorate, send, and apply the shared response policy.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        // Token presence is re-read on every request rather than snapshotted
        // at construction time
        let req = match self.session.token().await {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().await?;
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body: ErrorBody = resp.json().await.unwrap_or_default();

        // The backend reports a revoked session as exactly this pair; any
        // other 401 body is left for the caller to surface
        if status == StatusCode::UNAUTHORIZED && body.error == "invalid token" {
            self.session.clear().await?;
            self.navigator.navigate(RouteName::Login);
        }

        Err(ClientError::Api {
            status,
            message: body.error,
        })
    }
}

async fn parse_data<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let envelope: DataEnvelope<T> = resp.json().await?;
    Ok(envelope.data)
}
