//! Session bootstrap over the server's REST API.
//!
//! Before the channel opens the binary checks that the server is reachable
//! and creates a session for the project directory. The session id from that
//! call is stamped on every envelope for the rest of the run.

use std::{future::Future, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request timeout for every bootstrap call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bootstrap errors.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected session creation.
    #[error("create session failed ({status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Result of the health probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    /// Status string, e.g. `ok`.
    #[serde(default)]
    pub status: String,
    /// Server timestamp, if reported.
    #[serde(default)]
    pub timestamp: String,
    /// Number of sessions the server is running.
    #[serde(default)]
    pub active_sessions: u32,
}

impl Health {
    /// Parse a health body. Bodies that are not a JSON object (a proxy's
    /// plain-text `OK`, for instance) become the status string.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body)
            .unwrap_or_else(|_| Self { status: body.trim().to_owned(), ..Self::default() })
    }
}

/// A server-side session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session identifier.
    pub id: String,
    /// Project directory the session runs in.
    #[serde(default)]
    pub project_path: String,
    /// Server-reported status.
    #[serde(default)]
    pub status: String,
    /// Messages exchanged so far.
    #[serde(default)]
    pub message_count: u64,
    /// Last activity, milliseconds since the epoch.
    #[serde(default)]
    pub last_activity: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest<'a> {
    project_path: &'a str,
}

/// Capability to prepare a session before the channel opens.
pub trait SessionBootstrap: Send + Sync {
    /// Probe server health.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached.
    fn health(&self) -> impl Future<Output = Result<Health, BootstrapError>> + Send;

    /// Create a session for `project_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server does not answer
    /// `201 Created` with a session.
    fn create_session(
        &self,
        project_path: &str,
    ) -> impl Future<Output = Result<Session, BootstrapError>> + Send;
}

/// [`SessionBootstrap`] over HTTP with bearer authentication.
#[derive(Debug, Clone)]
pub struct RestBootstrap {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl RestBootstrap {
    /// Create a client for `base_url`. An empty `token` sends no
    /// `Authorization` header.
    pub fn new(base_url: &str, token: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { base_url: base_url.trim_end_matches('/').to_owned(), token: token.into(), http }
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        if self.token.is_empty() { builder } else { builder.bearer_auth(&self.token) }
    }
}

impl SessionBootstrap for RestBootstrap {
    async fn health(&self) -> Result<Health, BootstrapError> {
        let body = self.request(reqwest::Method::GET, "/health").send().await?.text().await?;
        let health = Health::from_body(&body);

        tracing::debug!(status = %health.status, "health probe");
        Ok(health)
    }

    async fn create_session(&self, project_path: &str) -> Result<Session, BootstrapError> {
        let resp = self
            .request(reqwest::Method::POST, "/api/sessions")
            .json(&CreateSessionRequest { project_path })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status != reqwest::StatusCode::CREATED {
            tracing::warn!(status = status.as_u16(), "session creation rejected");
            return Err(BootstrapError::Rejected { status: status.as_u16(), body });
        }

        let session: Session = serde_json::from_str(&body)?;
        tracing::info!(session_id = %session.id, "session created");
        Ok(session)
    }
}
