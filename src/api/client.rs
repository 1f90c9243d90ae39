use failsafe::futures::CircuitBreaker;
use failsafe::{backoff, failure_policy, Config as BreakerConfig, Error as FailsafeError, StateMachine};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::envelope::{ApiRequest, ApiResponse, RawResponse};
use super::routing::{select_domain, Domain};
use super::scope::{RequestScope, ScopeHandle};
use crate::config::Config;
use crate::storage::{SessionStore, StorageError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response from API: {0}")]
    InvalidResponse(String),
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Could not read session: {0}")]
    Session(#[from] StorageError),
    #[error("Circuit breaker open - API unavailable")]
    CircuitBreakerOpen,
    #[error("Request cancelled")]
    Cancelled,
}

/// HTTP client for the BNPL mobile API.
///
/// Routes each call to the identity or application domain, attaches the
/// bearer token from the session store for application calls and never
/// retries. Consecutive transport failures open a circuit breaker so a dead
/// backend fails fast instead of piling up timeouts.
pub struct MobileApiClient {
    client: Client,
    identity_url: String,
    app_url: String,
    api_key: Option<String>,
    session: SessionStore,
    scope: Option<ScopeHandle>,
    circuit_breaker: StateMachine<
        failure_policy::ConsecutiveFailures<backoff::Exponential>,
        (),
    >,
}

impl MobileApiClient {
    pub fn new(identity_url: String, app_url: String, session: SessionStore) -> Self {
        Self::with_settings(
            identity_url,
            app_url,
            session,
            Duration::from_secs(30),
            5,
            Duration::from_secs(60),
        )
    }

    pub fn from_config(config: &Config, session: SessionStore) -> Self {
        let mut client = Self::with_settings(
            config.identity_url.clone(),
            config.app_url.clone(),
            session,
            Duration::from_secs(config.request_timeout_secs),
            config.breaker_failure_threshold,
            Duration::from_secs(60),
        );
        client.api_key = config.api_key.clone();
        client
    }

    pub fn with_settings(
        identity_url: String,
        app_url: String,
        session: SessionStore,
        timeout: Duration,
        failure_threshold: u32,
        reset_timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        let backoff = backoff::exponential(Duration::from_secs(10), reset_timeout);
        let policy = failure_policy::consecutive_failures(failure_threshold, backoff);
        let circuit_breaker = BreakerConfig::new().failure_policy(policy).build();

        MobileApiClient {
            client,
            identity_url,
            app_url,
            api_key: None,
            session,
            scope: None,
            circuit_breaker,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// A copy of this client whose calls belong to `scope`. They are aborted
    /// when the scope is cancelled or dropped. The circuit breaker is shared.
    pub fn scoped(&self, scope: &RequestScope) -> Self {
        let mut client = self.clone();
        client.scope = Some(scope.handle());
        client
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url_for(&self, domain: Domain) -> &str {
        match domain {
            Domain::Identity => &self.identity_url,
            Domain::App => &self.app_url,
        }
    }

    /// Shorthand for an application-domain call with default options.
    pub async fn call(&self, function_name: &str, payload: Value) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::new(function_name, payload)).await
    }

    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        match &self.scope {
            Some(scope) => scope.run(self.dispatch(request)).await,
            None => self.dispatch(request).await,
        }
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if request.function_name.trim().is_empty() {
            return Err(ApiError::InvalidRequest("function name is required".to_string()));
        }

        let domain = select_domain(&request.function_name, request.endpoint_type);
        let url = self.url_for(domain).to_string();
        let envelope = request.envelope();

        let mut builder = self.client.post(&url).json(&envelope);
        if domain == Domain::App {
            if let Some(token) = self.session.token().await? {
                builder = builder.bearer_auth(token);
            }
        }
        if let Some(key) = request.api_key.as_ref().or(self.api_key.as_ref()) {
            builder = builder.header("X-API-KEY", key);
        }

        tracing::debug!(
            function = %envelope.function_name,
            reference = %envelope.reference,
            domain = ?domain,
            "Calling mobile API"
        );

        let result = self
            .circuit_breaker
            .call(async move {
                let response = builder.send().await?;
                let status = response.status().as_u16();
                let body = response.text().await?;

                match serde_json::from_str::<RawResponse>(&body) {
                    Ok(raw) => Ok(ApiResponse::from_raw(raw, status)),
                    Err(_) if !(200..300).contains(&status) => {
                        Err(ApiError::Status { status, body })
                    }
                    Err(e) => Err(ApiError::InvalidResponse(e.to_string())),
                }
            })
            .await;

        match result {
            Ok(response) => {
                tracing::debug!(
                    function = %envelope.function_name,
                    status = response.status_code,
                    "Mobile API responded"
                );
                Ok(response)
            }
            Err(FailsafeError::Rejected) => {
                tracing::warn!(function = %envelope.function_name, "Circuit breaker open, call rejected");
                Err(ApiError::CircuitBreakerOpen)
            }
            Err(FailsafeError::Inner(e)) => {
                tracing::warn!(function = %envelope.function_name, error = %e, "Mobile API call failed");
                Err(e)
            }
        }
    }
}

impl Clone for MobileApiClient {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            identity_url: self.identity_url.clone(),
            app_url: self.app_url.clone(),
            api_key: self.api_key.clone(),
            session: self.session.clone(),
            scope: self.scope.clone(),
            circuit_breaker: self.circuit_breaker.clone(),
        }
    }
}
