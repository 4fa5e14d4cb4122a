//! Identity provider client (GoTrue REST API).
//!
//! Thin HTTP wrapper for `/auth/v1/signup` and `/auth/v1/token`. The session
//! returned by a successful call is kept in-process and handed out by
//! `get_session`. Pure parsing in `parse_session` / `error_message` for
//! testability.

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider refused the credentials; carries its message verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The HTTP request to the provider failed.
    #[error("identity request failed: {0}")]
    Request(String),

    /// The provider response body could not be understood.
    #[error("unexpected identity response: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: SessionUser,
}

/// The three identity operations the login flow consumes.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and, when the provider allows it, sign straight in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), IdentityError>;

    /// Authenticate an existing account.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), IdentityError>;

    /// Current session, if the last call produced one.
    async fn get_session(&self) -> Result<Option<Session>, IdentityError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct GoTrueClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: Mutex<Option<Session>>,
}

impl GoTrueClient {
    /// `base_url` is the project URL (the client appends `/auth/v1/...`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| IdentityError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            anon_key: anon_key.into(),
            session: Mutex::new(None),
        })
    }

    async fn post_credentials(&self, path: &str, email: &str, password: &str) -> Result<Value, IdentityError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(%status, path, "identity provider rejected request");
            return Err(IdentityError::Rejected(error_message(status.as_u16(), &text)));
        }

        serde_json::from_str(&text).map_err(|e| IdentityError::Parse(e.to_string()))
    }

    fn store_session(&self, session: Option<Session>) {
        let mut slot = self
            .session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = session;
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoTrueClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), IdentityError> {
        let body = self.post_credentials("/auth/v1/signup", email, password).await?;
        // With email confirmation enabled the provider returns a bare user and no session.
        self.store_session(parse_session(&body)?);
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), IdentityError> {
        let body = self
            .post_credentials("/auth/v1/token?grant_type=password", email, password)
            .await?;
        let session =
            parse_session(&body)?.ok_or_else(|| IdentityError::Parse("token response without access_token".into()))?;
        self.store_session(Some(session));
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, IdentityError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Extract a session from a signup/token response. `Ok(None)` when the body
/// carries no `access_token`.
pub(crate) fn parse_session(body: &Value) -> Result<Option<Session>, IdentityError> {
    if body.get("access_token").and_then(Value::as_str).is_none() {
        return Ok(None);
    }
    serde_json::from_value(body.clone())
        .map(Some)
        .map_err(|e| IdentityError::Parse(e.to_string()))
}

/// Best human-readable message from an error body.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str))
        })
        .map_or_else(
            || {
                if body.trim().is_empty() {
                    format!("identity provider returned status {status}")
                } else {
                    body.trim().to_owned()
                }
            },
            str::to_owned,
        )
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
