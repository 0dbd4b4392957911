//! Health report operation.

use serde_json::json;

use super::payload::params;
use super::{DashboardApi, Fetched, mock};
use crate::Result;
use crate::models::HealthReport;

pub struct ReportsApi<'a> {
    api: &'a DashboardApi,
}

impl<'a> ReportsApi<'a> {
    pub(crate) fn new(api: &'a DashboardApi) -> Self {
        Self { api }
    }

    /// `get_health_report` for a free-text query ("last 30 days", or a
    /// question typed by the user).
    pub async fn health_report(&self, query: &str) -> Result<Fetched<HealthReport>> {
        self.api
            .fetch(
                "get_health_report",
                params([("query", json!(query))]),
                "report",
                mock::health_report,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackPolicy;
    use crate::models::OverallHealth;
    use crate::test_utils::{StubReply, StubServer, test_api, unreachable_base_url};

    #[tokio::test]
    async fn test_health_report_live_from_outputs_data() {
        let stub = StubServer::start(|_, _| {
            StubReply::Outputs(json!({
                "data": {
                    "overall_health": "POOR",
                    "health_score": 31,
                    "metrics": {"total_tasks": 10, "completed_tasks": 5}
                }
            }))
        })
        .await;
        let api = test_api(&stub.base_url, FallbackPolicy::Off);
        let fetched = api.reports().health_report("last 7 days").await.unwrap();
        assert_eq!(fetched.data.overall_health, OverallHealth::Poor);
        assert_eq!(fetched.data.metrics.completion_rate(), 50.0);
        assert_eq!(stub.last_request().body["inputs"]["query"], "last 7 days");
    }

    #[tokio::test]
    async fn test_health_report_fallback() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let fetched = api.reports().health_report("anything").await.unwrap();
        assert!(fetched.is_fallback());
        assert_eq!(fetched.data.health_score, 78);
    }
}
