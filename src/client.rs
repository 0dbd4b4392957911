//! HTTP client for the hosted workflow service.
//!
//! Every request carries:
//! - `Authorization: Bearer <api key>`
//! - `Content-Type: application/json`
//! - a uniform timeout taken from configuration
//!
//! Failures are classified into [`ApiError`] so callers can tell a dead
//! network apart from a rejected key or a missing workflow.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::ResolvedConfig;
use crate::{Error, Result};

/// User-Agent sent with every request
const USER_AGENT: &str = concat!("bearing/", env!("CARGO_PKG_VERSION"));

/// Longest server error body echoed into an error message
const MAX_DETAIL_LEN: usize = 300;

/// Errors from a workflow service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response: DNS failure, refused connection, reset
    #[error("Cannot reach workflow service: {0}")]
    Transport(String),

    /// No response within the configured timeout
    #[error("Workflow service timed out after {0}s")]
    Timeout(u64),

    /// API key rejected (401 Unauthorized)
    #[error("Authentication failed: workflow service returned 401 Unauthorized")]
    Unauthorized,

    /// Request rejected (400 Bad Request) with the server's explanation
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Workflow or app missing (404 Not Found)
    #[error("Workflow not found: workflow service returned 404")]
    NotFound,

    /// Any other non-2xx status
    #[error("Workflow service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The run finished but reported a failure in its body
    #[error("Workflow run failed: {0}")]
    WorkflowFailed(String),

    /// The body could not be interpreted
    #[error("Unexpected response from workflow service: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-2xx response.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            400 => ApiError::BadRequest(message),
            404 => ApiError::NotFound,
            _ => ApiError::Status { status, message },
        }
    }

    /// Short machine-readable category.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "transport",
            ApiError::Timeout(_) => "timeout",
            ApiError::Unauthorized => "unauthorized",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound => "not_found",
            ApiError::Status { .. } => "status",
            ApiError::WorkflowFailed(_) => "workflow_failed",
            ApiError::Decode(_) => "decode",
        }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::BadRequest(_) => Some(400),
            ApiError::NotFound => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Connection settings for [`WorkflowClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    /// End-user identifier included in request bodies
    pub user: String,
}

impl ClientSettings {
    /// Build settings from resolved configuration. Fails without an API key.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url().to_string(),
            api_key: config.require_api_key()?.to_string(),
            timeout: config.timeout(),
            user: config.user().to_string(),
        })
    }
}

/// Thin wrapper over `reqwest` preconfigured for the workflow service.
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    user: String,
}

impl WorkflowClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.api_key.trim()))
            .map_err(|_| Error::Config("API key contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: settings.timeout,
            user: settings.user,
        })
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        Self::new(ClientSettings::from_config(config)?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// POST a JSON body to `path` (relative to the base URL) and return the
    /// decoded JSON response.
    pub async fn post<B>(&self, path: &str, body: &B) -> std::result::Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = "POST", %url, "workflow request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify_send_error(path, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.classify_send_error(path, e))?;
        tracing::debug!(%url, status = status.as_u16(), bytes = text.len(), "workflow response");

        if !status.is_success() {
            let error = ApiError::from_status(status.as_u16(), error_detail(&text));
            tracing::warn!(
                %url,
                status = status.as_u16(),
                error = %error,
                "workflow request rejected"
            );
            return Err(error);
        }

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(%url, error = %e, "workflow response is not JSON");
            ApiError::Decode(format!("invalid JSON: {}", e))
        })?;

        if let Some(detail) = failed_run_detail(&value) {
            tracing::warn!(%url, error = %detail, "workflow run reported failure");
            return Err(ApiError::WorkflowFailed(detail));
        }
        Ok(value)
    }

    fn classify_send_error(&self, path: &str, e: reqwest::Error) -> ApiError {
        let error = if e.is_timeout() {
            ApiError::Timeout(self.timeout.as_secs())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(root_cause(&e))
        };
        tracing::warn!(path, error = %error, "workflow request failed");
        error
    }
}

/// Pull a human explanation out of an error body.
///
/// The service answers `{"code": ..., "message": ...}`; some proxies use
/// `error` instead. Anything else is echoed raw, truncated.
fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                if !msg.trim().is_empty() {
                    return msg.trim().to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no details".to_string();
    }
    trimmed.chars().take(MAX_DETAIL_LEN).collect()
}

/// A blocking workflow run can answer 200 with `data.status = "failed"`.
fn failed_run_detail(body: &Value) -> Option<String> {
    let data = body.get("data")?;
    if data.get("status").and_then(Value::as_str) != Some("failed") {
        return None;
    }
    let detail = data
        .get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("no details");
    Some(detail.to_string())
}

fn root_cause(e: &reqwest::Error) -> String {
    let mut source: &dyn std::error::Error = e;
    while let Some(next) = source.source() {
        source = next;
    }
    let cause = source.to_string();
    if cause == e.to_string() {
        cause
    } else {
        format!("{} ({})", e, cause)
    }
}
