//! Risk alert operations.

use serde_json::{Map, json};

use super::payload::params;
use super::tasks::{Acknowledgement, require_id};
use super::{DashboardApi, Fetched, mock};
use crate::Result;
use crate::models::{RiskAlert, RiskReport};

/// Project id used for a portfolio-wide risk report.
pub const ALL_PROJECTS: &str = "all-projects";

pub struct RisksApi<'a> {
    api: &'a DashboardApi,
}

impl<'a> RisksApi<'a> {
    pub(crate) fn new(api: &'a DashboardApi) -> Self {
        Self { api }
    }

    pub async fn alerts(&self) -> Result<Fetched<Vec<RiskAlert>>> {
        self.api
            .fetch("get_risk_alerts", Map::new(), "alerts", mock::risk_alerts)
            .await
    }

    pub async fn generate_report(&self, project_id: &str) -> Result<Fetched<RiskReport>> {
        require_id(project_id)?;
        self.api
            .fetch(
                "generate_risk_report",
                params([("project_id", json!(project_id))]),
                "report",
                || mock::risk_report(project_id),
            )
            .await
    }

    /// Mark an alert resolved.
    pub async fn resolve(&self, alert_id: &str) -> Result<Fetched<Acknowledgement>> {
        require_id(alert_id)?;
        self.api
            .fetch(
                "resolve_risk_alert",
                params([("alert_id", json!(alert_id))]),
                "result",
                || mock::acknowledged("Alert resolved"),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use crate::config::FallbackPolicy;
    use crate::models::{RiskType, Severity};
    use crate::test_utils::{StubReply, StubServer, test_api};

    #[tokio::test]
    async fn test_alerts_live_from_json_string() {
        let alerts = json!([{
            "id": "RISK-9",
            "type": "BUDGET_OVERRUN",
            "title": "Over budget",
            "severity": "HIGH"
        }])
        .to_string();
        let stub =
            StubServer::start(move |_, _| StubReply::Outputs(json!({"alerts": alerts.clone()})))
                .await;
        let api = test_api(&stub.base_url, FallbackPolicy::Off);
        let fetched = api.risks().alerts().await.unwrap();
        assert_eq!(fetched.data.len(), 1);
        assert_eq!(fetched.data[0].kind, RiskType::BudgetOverrun);
        assert_eq!(fetched.data[0].severity, Severity::High);
        assert!(fetched.data[0].is_active());
    }

    #[tokio::test]
    async fn test_alerts_fallback_on_unauthorized() {
        let stub = StubServer::always_status(401, json!({"message": "bad key"})).await;
        let api = test_api(&stub.base_url, FallbackPolicy::Mock);
        let fetched = api.risks().alerts().await.unwrap();
        assert_eq!(fetched.data.len(), 3);
        assert_eq!(fetched.fallback_cause(), Some(&ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_report_sends_project_id() {
        let stub = StubServer::start(|_, body| {
            StubReply::Outputs(json!({
                "report": {
                    "project_id": body["inputs"]["project_id"],
                    "risk_score": 40,
                    "overall_risk_level": "LOW"
                }
            }))
        })
        .await;
        let api = test_api(&stub.base_url, FallbackPolicy::Off);
        let fetched = api.risks().generate_report(ALL_PROJECTS).await.unwrap();
        assert_eq!(fetched.data.project_id, "all-projects");
        assert_eq!(fetched.data.risk_score, 40);
        assert_eq!(stub.last_request().body["inputs"]["action"], "generate_risk_report");
    }

    #[tokio::test]
    async fn test_resolve_sends_alert_id() {
        let stub = StubServer::start(|_, _| StubReply::Outputs(json!({"result": {"success": true}}))).await;
        let api = test_api(&stub.base_url, FallbackPolicy::Off);
        let fetched = api.risks().resolve("RISK-002").await.unwrap();
        assert!(fetched.data.success);
        let body = stub.last_request().body;
        assert_eq!(body["inputs"]["action"], "resolve_risk_alert");
        assert_eq!(body["inputs"]["alert_id"], "RISK-002");
    }
}
