//! Risk alert commands.

use serde::Serialize;

use super::{Output, origin_note, require_loaded, status_note, to_json};
use crate::api::{Acknowledgement, DashboardApi, Origin};
use crate::models::{RiskAlert, RiskReport};
use crate::views::{Filter, PageStatus, RiskBoard, RiskStats};
use crate::{Error, Result};

#[derive(Serialize)]
pub struct RiskList {
    pub stats: RiskStats,
    pub count: usize,
    pub alerts: Vec<RiskAlert>,
    pub data: PageStatus,
}

impl Output for RiskList {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let s = &self.stats;
        let mut lines = vec![format!(
            "{} active risk(s): {} high, {} medium, {} low",
            s.total, s.high, s.medium, s.low
        )];
        for a in &self.alerts {
            let resolved = if a.is_active() { "" } else { " [resolved]" };
            lines.push(format!(
                "  [{}] {} {} ({}, {}){}",
                a.severity.as_str(),
                a.id,
                a.title,
                a.kind.label(),
                a.project,
                resolved
            ));
        }
        lines.join("\n") + &status_note(&self.data)
    }
}

/// Load alerts and filter them the way the risk page does.
pub async fn risk_list(
    api: &DashboardApi,
    severity: Option<&str>,
    kind: Option<&str>,
    search: Option<&str>,
    include_resolved: bool,
) -> Result<RiskList> {
    let mut board = RiskBoard::new();
    if let Some(raw) = severity {
        board.severity = Filter::parse(raw).map_err(Error::InvalidInput)?;
    }
    if let Some(raw) = kind {
        board.kind = Filter::parse(raw).map_err(Error::InvalidInput)?;
    }
    board.search = search.unwrap_or_default().to_string();
    board.show_resolved = include_resolved;
    board.load(api).await?;
    require_loaded(&board.status)?;

    let alerts: Vec<RiskAlert> = board.visible().into_iter().cloned().collect();
    Ok(RiskList {
        stats: board.stats(),
        count: alerts.len(),
        alerts,
        data: board.status,
    })
}

#[derive(Serialize)]
pub struct RiskResolved {
    pub id: String,
    #[serde(flatten)]
    pub ack: Acknowledgement,
    pub origin: Origin,
}

impl Output for RiskResolved {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let message = if self.ack.message.is_empty() {
            format!("Resolved {}", self.id)
        } else {
            self.ack.message.clone()
        };
        message + &origin_note(&self.origin)
    }

    fn succeeded(&self) -> bool {
        self.ack.success
    }
}

pub async fn risk_resolve(api: &DashboardApi, id: &str) -> Result<RiskResolved> {
    let fetched = api.risks().resolve(id).await?;
    Ok(RiskResolved {
        id: id.to_string(),
        ack: fetched.data,
        origin: fetched.origin,
    })
}

#[derive(Serialize)]
pub struct RiskReportResult {
    pub report: RiskReport,
    pub origin: Origin,
}

impl Output for RiskReportResult {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let r = &self.report;
        let mut lines = vec![
            format!("Risk report {} for {}", r.report_id, r.project_id),
            format!(
                "Overall: {} (score {}/100), generated {}",
                r.overall_risk_level.label(),
                r.risk_score,
                r.generated_at.format("%Y-%m-%d %H:%M")
            ),
            "Key risks:".to_string(),
        ];
        lines.extend(r.key_risks.iter().map(|k| format!("  - {}", k)));
        lines.push("Recommendations:".to_string());
        lines.extend(r.recommendations.iter().map(|k| format!("  - {}", k)));
        lines.join("\n") + &origin_note(&self.origin)
    }
}

pub async fn risk_report(api: &DashboardApi, project_id: &str) -> Result<RiskReportResult> {
    let fetched = api.risks().generate_report(project_id).await?;
    Ok(RiskReportResult {
        report: fetched.data,
        origin: fetched.origin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackPolicy;
    use crate::models::{RiskStatus, Severity};
    use crate::test_utils::{StubReply, StubServer, test_api, unreachable_base_url};
    use serde_json::json;

    #[tokio::test]
    async fn test_default_list_hides_resolved() {
        let stub = StubServer::start(|_, _| {
            StubReply::Outputs(json!({"alerts": [
                {"id": "R-1", "type": "SCHEDULE_DELAY", "title": "Late", "severity": "LOW"},
                {"id": "R-2", "type": "QUALITY_ISSUE", "title": "Bugs", "severity": "HIGH",
                 "status": "RESOLVED"},
                {"id": "R-3", "type": "BUDGET_OVERRUN", "title": "Spend", "severity": "HIGH"}
            ]}))
        })
        .await;
        let api = test_api(&stub.base_url, FallbackPolicy::Off);

        let list = risk_list(&api, None, None, None, false).await.unwrap();
        let ids: Vec<&str> = list.alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["R-3", "R-1"]);
        assert_eq!(list.stats.total, 2);
        assert_eq!(list.stats.high, 1);

        let all = risk_list(&api, Some("HIGH"), None, None, true).await.unwrap();
        assert_eq!(all.count, 2);
        assert!(all.alerts.iter().any(|a| a.status == RiskStatus::Resolved));
        assert!(all.alerts.iter().all(|a| a.severity == Severity::High));
    }

    #[tokio::test]
    async fn test_unknown_type_filter_is_rejected() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let err = risk_list(&api, None, Some("weather"), None, false).await.err().unwrap();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_report_human_output_marks_sample() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let result = risk_report(&api, "all-projects").await.unwrap();
        let text = result.to_human();
        assert!(text.contains("all-projects"));
        assert!(text.contains("(sample data:"));
    }
}
