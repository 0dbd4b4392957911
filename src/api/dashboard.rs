//! Dashboard overview operation.

use serde_json::Map;

use super::{DashboardApi, Fetched, mock};
use crate::Result;
use crate::models::Dashboard;

pub struct DashboardDataApi<'a> {
    api: &'a DashboardApi,
}

impl<'a> DashboardDataApi<'a> {
    pub(crate) fn new(api: &'a DashboardApi) -> Self {
        Self { api }
    }

    pub async fn overview(&self) -> Result<Fetched<Dashboard>> {
        self.api
            .fetch("get_dashboard_data", Map::new(), "dashboard", mock::dashboard)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackPolicy;
    use crate::test_utils::{StubReply, StubServer, test_api};
    use serde_json::json;

    #[tokio::test]
    async fn test_overview_live() {
        let stub = StubServer::start(|_, _| {
            StubReply::Outputs(json!({
                "dashboard": {"stats": {"total_projects": 2, "risk_alerts": 1}}
            }))
        })
        .await;
        let api = test_api(&stub.base_url, FallbackPolicy::Off);
        let fetched = api.dashboard().overview().await.unwrap();
        assert_eq!(fetched.data.stats.total_projects, 2);
        assert!(fetched.data.project_progress.is_empty());
        assert_eq!(stub.last_request().body["inputs"]["action"], "get_dashboard_data");
    }

    #[tokio::test]
    async fn test_overview_fallback_on_workflow_failure() {
        let stub = StubServer::start(|_, _| {
            StubReply::Raw(json!({"data": {"status": "failed", "error": "LLM quota"}}))
        })
        .await;
        let api = test_api(&stub.base_url, FallbackPolicy::Mock);
        let fetched = api.dashboard().overview().await.unwrap();
        assert!(fetched.is_fallback());
        assert_eq!(fetched.data.stats.total_projects, 12);
    }

    #[tokio::test]
    async fn test_overview_without_stats_is_not_live_data() {
        let stub = StubServer::start(|_, _| {
            StubReply::Outputs(json!({"text": "Sorry, I cannot answer that."}))
        })
        .await;
        let api = test_api(&stub.base_url, FallbackPolicy::Off);
        let err = api.dashboard().overview().await.unwrap_err();
        assert!(matches!(err, crate::Error::Api(crate::ApiError::Decode(_))));

        let api = test_api(&stub.base_url, FallbackPolicy::Mock);
        assert!(api.dashboard().overview().await.unwrap().is_fallback());
    }
}
