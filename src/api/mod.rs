//! Domain API over the workflow service.
//!
//! Every operation is one `POST /workflows/run` carrying an `action` tag and
//! its parameters in `inputs`. Results come back as [`Fetched`], which says
//! whether the data is live or deterministic sample data substituted after a
//! failure. Whether substitution happens at all is decided by
//! [`FallbackPolicy`]; with `Off` the [`ApiError`] reaches the caller.
//!
//! Operations are grouped by capability:
//! - [`tasks`] - create, list, update, delete
//! - [`risks`] - alerts, resolve, risk report
//! - [`reports`] - health report
//! - [`dashboard`] - overview data
//! - [`chat`] - assistant messages (never substituted)

pub mod chat;
pub mod dashboard;
pub mod mock;
pub mod payload;
pub mod reports;
pub mod risks;
pub mod tasks;

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::Result;
use crate::client::{ApiError, WorkflowClient};
use crate::config::{ChatEndpoint, FallbackPolicy, ResolvedConfig};

pub use chat::{ChatApi, ChatOutcome, ChatRequest, diagnostic};
pub use dashboard::DashboardDataApi;
pub use reports::ReportsApi;
pub use risks::RisksApi;
pub use tasks::{Acknowledgement, TaskFilters, TasksApi, UpdatedTask};

/// Path of the workflow run endpoint.
pub const WORKFLOW_RUN_PATH: &str = "/workflows/run";

/// Where a [`Fetched`] value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Decoded from a successful remote response
    Live,
    /// Sample data substituted because the remote call failed
    Fallback { cause: ApiError },
}

impl Serialize for Origin {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Origin::Live => {
                let mut s = serializer.serialize_struct("Origin", 1)?;
                s.serialize_field("source", "live")?;
                s.end()
            }
            Origin::Fallback { cause } => {
                let mut s = serializer.serialize_struct("Origin", 3)?;
                s.serialize_field("source", "fallback")?;
                s.serialize_field("cause", cause.kind())?;
                s.serialize_field("message", &cause.to_string())?;
                s.end()
            }
        }
    }
}

/// Data returned by a facade operation, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fetched<T> {
    pub data: T,
    pub origin: Origin,
}

impl<T> Fetched<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            origin: Origin::Live,
        }
    }

    pub fn fallback(data: T, cause: ApiError) -> Self {
        Self {
            data,
            origin: Origin::Fallback { cause },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, Origin::Fallback { .. })
    }

    /// The failure that caused substitution, if any.
    pub fn fallback_cause(&self) -> Option<&ApiError> {
        match &self.origin {
            Origin::Fallback { cause } => Some(cause),
            Origin::Live => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            origin: self.origin,
        }
    }
}

/// Entry point for all remote operations.
///
/// Cheap to clone; the underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: Arc<WorkflowClient>,
    fallback: FallbackPolicy,
    chat_endpoint: ChatEndpoint,
}

impl DashboardApi {
    pub fn new(
        client: Arc<WorkflowClient>,
        fallback: FallbackPolicy,
        chat_endpoint: ChatEndpoint,
    ) -> Self {
        Self {
            client,
            fallback,
            chat_endpoint,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let client = WorkflowClient::from_config(config)?;
        Ok(Self::new(
            Arc::new(client),
            config.fallback(),
            config.chat_endpoint(),
        ))
    }

    pub fn tasks(&self) -> TasksApi<'_> {
        TasksApi::new(self)
    }

    pub fn risks(&self) -> RisksApi<'_> {
        RisksApi::new(self)
    }

    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }

    pub fn dashboard(&self) -> DashboardDataApi<'_> {
        DashboardDataApi::new(self)
    }

    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi::new(self)
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn chat_endpoint(&self) -> ChatEndpoint {
        self.chat_endpoint
    }

    pub(crate) fn client(&self) -> &WorkflowClient {
        &self.client
    }

    /// Run one workflow action and decode the payload stored under `key`.
    ///
    /// On failure the policy decides between `mock()` (marked as fallback)
    /// and returning the error.
    pub(crate) async fn fetch<T, F>(
        &self,
        action: &str,
        params: Map<String, Value>,
        key: &str,
        mock: F,
    ) -> Result<Fetched<T>>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let result = match self.run_action(action, params).await {
            Ok(body) => payload::extract::<T>(&body, key),
            Err(e) => Err(e),
        };
        self.settle(action, result, mock)
    }

    async fn run_action(
        &self,
        action: &str,
        params: Map<String, Value>,
    ) -> std::result::Result<Value, ApiError> {
        let request = payload::WorkflowRunRequest::action(action, params, self.client.user());
        tracing::debug!(action, "running workflow action");
        self.client.post(WORKFLOW_RUN_PATH, &request).await
    }

    fn settle<T>(
        &self,
        action: &str,
        result: std::result::Result<T, ApiError>,
        mock: impl FnOnce() -> T,
    ) -> Result<Fetched<T>> {
        match result {
            Ok(data) => Ok(Fetched::live(data)),
            Err(cause) => match self.fallback {
                FallbackPolicy::Mock => {
                    tracing::warn!(action, error = %cause, "remote call failed, using sample data");
                    Ok(Fetched::fallback(mock(), cause))
                }
                FallbackPolicy::Off => Err(cause.into()),
            },
        }
    }
}
