//! Health report page.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::{PageStatus, absorb};
use crate::api::{DashboardApi, Origin};
use crate::models::HealthReport;
use crate::{Error, Result};

/// Reporting window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Week, TimeRange::Month, TimeRange::Quarter];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
        }
    }

    pub fn days(self) -> u32 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
        }
    }

    pub fn label(self) -> String {
        format!("Last {} days", self.days())
    }

    /// Query text sent for this window.
    pub fn query(self) -> String {
        format!("Get the project health report for the last {} days", self.days())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" | "7" | "week" => Ok(TimeRange::Week),
            "30d" | "30" | "month" => Ok(TimeRange::Month),
            "90d" | "90" | "quarter" => Ok(TimeRange::Quarter),
            _ => Err(format!("Unknown time range: {} (expected 7d, 30d or 90d)", s)),
        }
    }
}

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
}

impl BarPoint {
    fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Answer to a natural-language question, kept apart from the main report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub query: String,
    pub result: HealthReport,
    pub origin: Origin,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportView {
    pub range: TimeRange,
    pub status: PageStatus,
    pub report: Option<HealthReport>,
    pub query_result: Option<QueryResult>,
}

impl ReportView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the report for the current range.
    pub async fn load(&mut self, api: &DashboardApi) -> Result<()> {
        let result = api.reports().health_report(&self.range.query()).await;
        if let Some(report) = absorb(&mut self.status, result)? {
            self.report = Some(report);
        }
        Ok(())
    }

    /// Switch range and reload.
    pub async fn set_range(&mut self, api: &DashboardApi, range: TimeRange) -> Result<()> {
        self.range = range;
        self.load(api).await
    }

    /// Ask a question about project health. Blank questions are ignored.
    pub async fn ask(&mut self, api: &DashboardApi, query: &str) -> Result<Option<&QueryResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        let fetched = api.reports().health_report(query).await?;
        let result = QueryResult {
            query: query.to_string(),
            result: fetched.data,
            origin: fetched.origin,
            timestamp: Utc::now(),
        };
        Ok(Some(self.query_result.insert(result)))
    }

    pub fn completion_rate(&self) -> Option<f64> {
        self.report.as_ref().map(|r| r.metrics.completion_rate())
    }

    /// Progress (percent) per project.
    pub fn project_progress(&self) -> Vec<BarPoint> {
        self.report
            .iter()
            .flat_map(|r| &r.projects)
            .map(|p| BarPoint::new(&p.name, f64::from(p.progress)))
            .collect()
    }

    /// Risk level (1 low, 2 medium, 3 high) per project.
    pub fn project_risk(&self) -> Vec<BarPoint> {
        self.report
            .iter()
            .flat_map(|r| &r.projects)
            .map(|p| BarPoint::new(&p.name, f64::from(p.risk_level.rank())))
            .collect()
    }

    /// Completed, in-progress and overdue task counts.
    pub fn task_breakdown(&self) -> Vec<BarPoint> {
        let Some(report) = &self.report else {
            return Vec::new();
        };
        let m = &report.metrics;
        vec![
            BarPoint::new("Completed", f64::from(m.completed_tasks)),
            BarPoint::new("In progress", f64::from(m.in_progress_tasks)),
            BarPoint::new("Overdue", f64::from(m.overdue_tasks)),
        ]
    }

    /// Six weeks of velocity; week 5 is the reported team velocity.
    pub fn velocity_series(&self) -> Vec<BarPoint> {
        let Some(report) = &self.report else {
            return Vec::new();
        };
        let weeks = [20.0, 25.0, 23.0, 28.0, report.metrics.team_velocity, 26.0];
        weeks
            .iter()
            .enumerate()
            .map(|(i, v)| BarPoint::new(format!("W{}", i + 1), *v))
            .collect()
    }

    /// Parse and apply a range from a form or flag.
    pub fn parse_range(raw: &str) -> Result<TimeRange> {
        raw.parse().map_err(Error::InvalidInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackPolicy;
    use crate::test_utils::{StubReply, StubServer, test_api, unreachable_base_url};
    use serde_json::json;

    #[test]
    fn test_time_range_parse_and_query() {
        assert_eq!("7d".parse::<TimeRange>().unwrap(), TimeRange::Week);
        assert_eq!(TimeRange::default(), TimeRange::Month);
        assert!(TimeRange::Quarter.query().contains("90 days"));
        assert!(ReportView::parse_range("1y").is_err());
    }

    #[tokio::test]
    async fn test_range_becomes_query() {
        let stub = StubServer::start(|_, _| StubReply::Status(500, json!({}))).await;
        let api = test_api(&stub.base_url, FallbackPolicy::Mock);
        let mut view = ReportView::new();
        view.set_range(&api, TimeRange::Week).await.unwrap();
        let body = stub.last_request().body;
        assert_eq!(body["inputs"]["query"], TimeRange::Week.query());
        assert_eq!(view.status.as_str(), "sample");
    }

    #[tokio::test]
    async fn test_chart_series_from_sample_report() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let mut view = ReportView::new();
        assert!(view.velocity_series().is_empty());
        view.load(&api).await.unwrap();

        let progress = view.project_progress();
        assert_eq!(progress.len(), 3);
        assert_eq!(progress[2].value, 95.0);

        let breakdown = view.task_breakdown();
        let labels: Vec<&str> = breakdown.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Completed", "In progress", "Overdue"]);

        let velocity = view.velocity_series();
        assert_eq!(velocity.len(), 6);
        assert_eq!(velocity[4].value, 23.5);

        assert_eq!(view.project_risk()[0].value, 2.0);
        let rate = view.completion_rate().unwrap();
        assert!((rate - 57.05).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_ask_keeps_separate_result() {
        let api = test_api(&unreachable_base_url(), FallbackPolicy::Mock);
        let mut view = ReportView::new();
        assert!(view.ask(&api, "   ").await.unwrap().is_none());

        let result = view.ask(&api, "Which project is at risk?").await.unwrap().unwrap();
        assert_eq!(result.query, "Which project is at risk?");
        assert!(matches!(result.origin, Origin::Fallback { .. }));
        assert!(view.report.is_none());
    }
}
