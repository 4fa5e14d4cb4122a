//! Login flow state machine.
//!
//! `idle → submitting → authenticated → provisioning → done`, with any step
//! able to drop to `failed`. A failed flow keeps its message and may be
//! submitted again; nothing is retried automatically.

use std::fmt::Display;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;

use super::form::{AuthMode, Credentials};
use super::identity::{IdentityError, IdentityProvider};

const PROVISION_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Submitting,
    Authenticated { user_id: String },
    Provisioning { user_id: String },
    /// Terminal: the caller should navigate to `redirect_to`.
    Done { redirect_to: String },
    /// Terminal: show `message`; the form stays editable.
    Failed { message: String },
}

impl FlowState {
    #[cfg(test)]
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }
}

/// Why a submission stopped. `Display` is the message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("Logged in, but no session found.")]
    NoSession,
    #[error("Ensure user failed: {0}")]
    Provision(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

pub struct AuthFlow<P> {
    provider: P,
    http: reqwest::Client,
    app_base_url: String,
    state: FlowState,
    history: Vec<FlowState>,
}

impl<P: IdentityProvider> AuthFlow<P> {
    /// `app_base_url` is the server hosting `/api/ensure-user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(provider: P, app_base_url: &str) -> Result<Self, FlowError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROVISION_TIMEOUT_SECS))
            .build()
            .map_err(|e| FlowError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            provider,
            http,
            app_base_url: app_base_url.trim_end_matches('/').to_owned(),
            state: FlowState::Idle,
            history: vec![FlowState::Idle],
        })
    }

    #[must_use]
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// States entered by the latest submission, oldest first. The first entry
    /// is the state the submission started from.
    #[must_use]
    pub fn history(&self) -> &[FlowState] {
        &self.history
    }

    /// Run one submission to a terminal state.
    pub async fn submit(&mut self, creds: &Credentials) -> &FlowState {
        self.history = vec![self.state.clone()];
        self.transition(FlowState::Submitting);
        let terminal = match self.run(creds).await {
            Ok(redirect_to) => FlowState::Done { redirect_to },
            Err(e) => {
                tracing::warn!(error = %e, mode = creds.mode.as_str(), "login flow failed");
                FlowState::Failed { message: e.to_string() }
            }
        };
        self.transition(terminal);
        &self.state
    }

    async fn run(&mut self, creds: &Credentials) -> Result<String, FlowError> {
        match creds.mode {
            AuthMode::SignUp => self.provider.sign_up(&creds.email, &creds.password).await?,
            AuthMode::SignIn => {
                self.provider
                    .sign_in_with_password(&creds.email, &creds.password)
                    .await?;
            }
        }

        let session = self
            .provider
            .get_session()
            .await?
            .filter(|s| !s.access_token.is_empty())
            .ok_or(FlowError::NoSession)?;
        let user_id = session.user.id.clone();
        self.transition(FlowState::Authenticated { user_id: user_id.clone() });

        self.transition(FlowState::Provisioning { user_id: user_id.clone() });
        let email = session.user.email.as_deref().unwrap_or(&creds.email);
        let response = self
            .http
            .post(format!("{}/api/ensure-user", self.app_base_url))
            .bearer_auth(&session.access_token)
            .json(&json!({ "id": user_id, "email": email, "role": creds.role }))
            .send()
            .await
            .map_err(|e| FlowError::Provision(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await;
            return Err(FlowError::Provision(provision_failure_detail(status, text)));
        }

        tracing::info!(%user_id, role = %creds.role, "login complete");
        Ok(format!("{}/", self.app_base_url))
    }

    fn transition(&mut self, next: FlowState) {
        tracing::debug!(from = ?self.state, to = ?next, "login flow transition");
        self.history.push(next.clone());
        self.state = next;
    }
}

/// Response body text, or the status line when the body is empty or unreadable.
pub(crate) fn provision_failure_detail<E: Display>(status: StatusCode, body: Result<String, E>) -> String {
    match body {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => status.to_string(),
        Err(e) => format!("{status} ({e})"),
    }
}

#[cfg(test)]
#[path = "flow_test.rs"]
mod tests;
