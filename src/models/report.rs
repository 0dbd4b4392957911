//! Health and risk reports. Both are read-only and regenerated wholesale on
//! every fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::risk::Severity;
use super::{flexible_time, flexible_time_opt, wire_token};

/// Overall health grade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallHealth {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl OverallHealth {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallHealth::Excellent => "EXCELLENT",
            OverallHealth::Good => "GOOD",
            OverallHealth::Fair => "FAIR",
            OverallHealth::Poor => "POOR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OverallHealth::Excellent => "Excellent",
            OverallHealth::Good => "Good",
            OverallHealth::Fair => "Fair",
            OverallHealth::Poor => "Poor",
        }
    }
}

impl fmt::Display for OverallHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OverallHealth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match wire_token(s).as_str() {
            "EXCELLENT" => Ok(OverallHealth::Excellent),
            "GOOD" => Ok(OverallHealth::Good),
            "FAIR" => Ok(OverallHealth::Fair),
            "POOR" => Ok(OverallHealth::Poor),
            _ => Err(format!("Unknown health grade: {}", s)),
        }
    }
}

/// One project row of a health report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectHealth {
    pub name: String,

    #[serde(default)]
    pub health: OverallHealth,

    /// Completion percentage (0-100)
    #[serde(default)]
    pub progress: u8,

    #[serde(default)]
    pub risk_level: Severity,

    #[serde(default)]
    pub team_size: u32,

    #[serde(
        default,
        with = "flexible_time_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<DateTime<Utc>>,
}

/// Aggregate task metrics across all projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub in_progress_tasks: u32,
    #[serde(default)]
    pub overdue_tasks: u32,
    /// Story points (or tasks) closed per week
    #[serde(default)]
    pub team_velocity: f64,
    /// Bugs per hundred closed tasks
    #[serde(default)]
    pub bug_rate: f64,
}

impl HealthMetrics {
    /// Completed share of all tasks, in percent. Zero when there are no tasks.
    pub fn completion_rate(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        f64::from(self.completed_tasks) * 100.0 / f64::from(self.total_tasks)
    }
}

/// Portfolio health snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_health: OverallHealth,

    /// Score from 0 to 100
    pub health_score: u8,

    #[serde(default)]
    pub projects: Vec<ProjectHealth>,

    #[serde(default)]
    pub metrics: HealthMetrics,

    #[serde(default = "Utc::now", with = "flexible_time")]
    pub generated_at: DateTime<Utc>,
}

/// Risk assessment generated for a project (or `all-projects`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub project_id: String,

    #[serde(default)]
    pub report_id: String,

    #[serde(default)]
    pub overall_risk_level: Severity,

    /// Score from 0 to 100, higher is riskier
    #[serde(default)]
    pub risk_score: u8,

    #[serde(default)]
    pub key_risks: Vec<String>,

    #[serde(default)]
    pub recommendations: Vec<String>,

    #[serde(default = "Utc::now", with = "flexible_time")]
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_report_deserialize() {
        let json = r#"{
            "overall_health": "GOOD",
            "health_score": 78,
            "projects": [
                {"name": "Storefront", "health": "FAIR", "progress": 65,
                 "risk_level": "MEDIUM", "team_size": 8, "deadline": "2024-02-15"}
            ],
            "metrics": {"total_tasks": 156, "completed_tasks": 89,
                        "in_progress_tasks": 45, "overdue_tasks": 12,
                        "team_velocity": 23.5, "bug_rate": 2.1},
            "generated_at": "2024-01-17T08:30:00Z"
        }"#;
        let report: HealthReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.overall_health, OverallHealth::Good);
        assert_eq!(report.projects[0].risk_level, Severity::Medium);
        assert!(report.projects[0].deadline.is_some());
        assert_eq!(report.metrics.overdue_tasks, 12);
    }

    #[test]
    fn test_completion_rate() {
        let metrics = HealthMetrics {
            total_tasks: 200,
            completed_tasks: 50,
            ..HealthMetrics::default()
        };
        assert!((metrics.completion_rate() - 25.0).abs() < f64::EPSILON);
        assert_eq!(HealthMetrics::default().completion_rate(), 0.0);
    }

    #[test]
    fn test_risk_report_defaults() {
        let report: RiskReport =
            serde_json::from_str(r#"{"project_id":"all-projects","risk_score":65}"#).unwrap();
        assert_eq!(report.overall_risk_level, Severity::Medium);
        assert!(report.key_risks.is_empty());
    }
}
