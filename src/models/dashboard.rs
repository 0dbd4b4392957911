//! Overview data for the dashboard page.

use serde::{Deserialize, Serialize};

use super::task::Priority;

/// Headline counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_projects: u32,
    #[serde(default)]
    pub active_projects: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub pending_tasks: u32,
    #[serde(default)]
    pub team_members: u32,
    #[serde(default)]
    pub risk_alerts: u32,
}

/// Completed vs planned work for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub label: String,
    pub completed: u32,
    pub planned: u32,
}

/// One slice of the task distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub label: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityPoint {
    pub label: String,
    pub velocity: f64,
}

/// A line in the recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// e.g. `task_completed`, `risk_alert`, `task_assigned`, `milestone`
    pub kind: String,
    pub message: String,
    /// Relative time as reported by the service ("15 minutes ago")
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingDeadline {
    pub task: String,
    pub project: String,
    pub deadline: String,
    pub days_left: i64,
    #[serde(default)]
    pub priority: Priority,
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    #[serde(default)]
    pub project_progress: Vec<ProgressPoint>,
    #[serde(default)]
    pub task_distribution: Vec<DistributionSlice>,
    #[serde(default)]
    pub team_velocity: Vec<VelocityPoint>,
    #[serde(default)]
    pub recent_activities: Vec<Activity>,
    #[serde(default)]
    pub upcoming_deadlines: Vec<UpcomingDeadline>,
}
