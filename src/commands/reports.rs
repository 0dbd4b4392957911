//! Health report command.

use serde::Serialize;

use super::{Output, origin_note, require_loaded, status_note, to_json};
use crate::api::DashboardApi;
use crate::models::HealthReport;
use crate::views::{BarPoint, PageStatus, QueryResult, ReportView, TimeRange};
use crate::{Error, Result};

#[derive(Serialize)]
pub struct HealthSummary {
    pub range: TimeRange,
    pub report: HealthReport,
    pub completion_rate: f64,
    pub task_breakdown: Vec<BarPoint>,
    pub velocity: Vec<BarPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryResult>,
    pub data: PageStatus,
}

impl Output for HealthSummary {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let r = &self.report;
        let m = &r.metrics;
        let mut lines = vec![
            format!(
                "Health ({}): {} - score {}/100",
                self.range.label(),
                r.overall_health.label(),
                r.health_score
            ),
            format!(
                "Tasks: {} total, {} completed ({:.1}%), {} in progress, {} overdue",
                m.total_tasks, m.completed_tasks, self.completion_rate, m.in_progress_tasks,
                m.overdue_tasks
            ),
            format!("Velocity {}, bug rate {}", m.team_velocity, m.bug_rate),
            "Projects:".to_string(),
        ];
        for p in &r.projects {
            lines.push(format!(
                "  {} - {} {}% (risk {}, team {})",
                p.name,
                p.health.label(),
                p.progress,
                p.risk_level.label(),
                p.team_size
            ));
        }
        let mut out = lines.join("\n") + &status_note(&self.data);
        if let Some(q) = &self.query {
            out.push_str(&format!(
                "\n\nQ: {}\nA: {} health, score {}/100{}",
                q.query,
                q.result.overall_health.label(),
                q.result.health_score,
                origin_note(&q.origin)
            ));
        }
        out
    }
}

/// Load the report for `range`, optionally asking `query` as well.
pub async fn report(api: &DashboardApi, range: &str, query: Option<&str>) -> Result<HealthSummary> {
    let range = ReportView::parse_range(range)?;
    let mut view = ReportView::new();
    view.set_range(api, range).await?;
    require_loaded(&view.status)?;
    if let Some(query) = query {
        view.ask(api, query).await?;
    }

    let completion_rate = view.completion_rate().unwrap_or_default();
    let task_breakdown = view.task_breakdown();
    let velocity = view.velocity_series();
    let Some(report) = view.report else {
        return Err(Error::Other("health report missing after load".to_string()));
    };
    Ok(HealthSummary {
        range,
        report,
        completion_rate,
        task_breakdown,
        velocity,
        query: view.query_result,
        data: view.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackPolicy;
    use crate::test_utils::{test_api, unreachable_base_url};

    #[tokio::test]
    async fn test_report_with_query() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let summary = report(&api, "7d", Some("Who is overloaded?")).await.unwrap();
        assert_eq!(summary.range, TimeRange::Week);
        assert_eq!(summary.velocity.len(), 6);
        assert_eq!(summary.query.as_ref().unwrap().query, "Who is overloaded?");
        assert!(summary.to_human().contains("Q: Who is overloaded?"));
    }

    #[tokio::test]
    async fn test_bad_range() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        assert!(report(&api, "1y", None).await.is_err());
    }

    #[tokio::test]
    async fn test_policy_off_fails() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Off);
        let err = report(&api, "30d", None).await.err().unwrap();
        assert!(matches!(err, crate::Error::Api(_)));
    }
}
