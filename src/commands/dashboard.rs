//! Dashboard overview command.

use serde::Serialize;

use super::{Output, require_loaded, status_note, to_json};
use crate::Result;
use crate::api::DashboardApi;
use crate::models::Dashboard;
use crate::views::{DashboardView, PageStatus};

#[derive(Serialize)]
pub struct DashboardSummary {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub data: PageStatus,
}

impl Output for DashboardSummary {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let d = &self.dashboard;
        let s = &d.stats;
        let mut lines = vec![
            format!(
                "Projects: {} total, {} active | Tasks: {} completed, {} pending",
                s.total_projects, s.active_projects, s.completed_tasks, s.pending_tasks
            ),
            format!(
                "Team members: {} | Risk alerts: {}",
                s.team_members, s.risk_alerts
            ),
        ];
        if !d.recent_activities.is_empty() {
            lines.push("Recent activity:".to_string());
            lines.extend(
                d.recent_activities
                    .iter()
                    .map(|a| format!("  {} ({})", a.message, a.time)),
            );
        }
        if !d.upcoming_deadlines.is_empty() {
            lines.push("Upcoming deadlines:".to_string());
            lines.extend(d.upcoming_deadlines.iter().map(|u| {
                format!(
                    "  {} [{}] {} - {} day(s) left ({})",
                    u.deadline,
                    u.project,
                    u.task,
                    u.days_left,
                    u.priority.label()
                )
            }));
        }
        lines.join("\n") + &status_note(&self.data)
    }
}

pub async fn dashboard(api: &DashboardApi) -> Result<DashboardSummary> {
    let mut view = DashboardView::new();
    view.load(api).await?;
    require_loaded(&view.status)?;
    Ok(DashboardSummary {
        dashboard: view.data.unwrap_or_default(),
        data: view.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackPolicy;
    use crate::test_utils::{StubReply, StubServer, test_api};
    use serde_json::json;

    #[tokio::test]
    async fn test_live_dashboard() {
        let stub = StubServer::start(|_, _| {
            StubReply::Outputs(json!({"dashboard": {"stats": {"total_projects": 2}}}))
        })
        .await;
        let api = test_api(&stub.base_url, FallbackPolicy::Off);
        let summary = dashboard(&api).await.unwrap();
        assert_eq!(summary.dashboard.stats.total_projects, 2);
        assert_eq!(summary.data.as_str(), "live");

        let value: serde_json::Value = serde_json::from_str(&summary.to_json()).unwrap();
        assert_eq!(value["stats"]["total_projects"], 2);
        assert_eq!(value["data"], "live");
    }
}
