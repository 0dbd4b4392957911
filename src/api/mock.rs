//! Deterministic sample data substituted when a remote call fails.
//!
//! Fixed records use fixed timestamps so repeated failures render the same
//! page. Echo mocks (create, update, risk report) reflect the caller's input.

use chrono::{DateTime, TimeZone, Utc};

use super::tasks::{Acknowledgement, UpdatedTask};
use crate::models::{
    Activity, Dashboard, DashboardStats, DistributionSlice, HealthMetrics, HealthReport, NewTask,
    OverallHealth, Priority, ProgressPoint, ProjectHealth, RiskAlert, RiskReport, RiskStatus,
    RiskType, Severity, Task, TaskStatus, TaskUpdate, UpcomingDeadline, VelocityPoint,
};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .unwrap_or_default()
}

pub fn tasks() -> Vec<Task> {
    vec![
        Task {
            id: "TASK-001".into(),
            title: "Implement user login".into(),
            description: "Build the login and authentication flow".into(),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            assignee: "Alex Chen".into(),
            created_at: at(2024, 1, 15, 10, 0),
            due_date: Some(at(2024, 1, 20, 18, 0)),
        },
        Task {
            id: "TASK-002".into(),
            title: "Optimize database queries".into(),
            description: "Profile and fix slow queries to improve performance".into(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            assignee: "Sam Li".into(),
            created_at: at(2024, 1, 16, 9, 30),
            due_date: Some(at(2024, 1, 25, 17, 0)),
        },
        Task {
            id: "TASK-003".into(),
            title: "Fix payment module bug".into(),
            description: "Handle exceptions in the payment flow correctly".into(),
            status: TaskStatus::Done,
            priority: Priority::High,
            assignee: "Jordan Wang".into(),
            created_at: at(2024, 1, 10, 14, 20),
            due_date: Some(at(2024, 1, 15, 16, 0)),
        },
    ]
}

/// The submitted task as a fresh TODO item with a time-based id.
pub fn created_task(new: &NewTask) -> Task {
    let now = Utc::now();
    new.clone()
        .into_task(format!("TASK-{}", now.timestamp_millis()), now)
}

pub fn updated_task(id: &str, update: &TaskUpdate) -> UpdatedTask {
    UpdatedTask {
        id: id.to_string(),
        changes: update.clone(),
        updated_at: Utc::now(),
    }
}

pub fn acknowledged(message: &str) -> Acknowledgement {
    Acknowledgement {
        success: true,
        message: message.to_string(),
    }
}

pub fn risk_alerts() -> Vec<RiskAlert> {
    vec![
        RiskAlert {
            id: "RISK-001".into(),
            kind: RiskType::ScheduleDelay,
            title: "Schedule slip risk".into(),
            description: "Mobile work is expected to slip 3 days and may delay the release".into(),
            severity: Severity::High,
            project: "Storefront upgrade".into(),
            created_at: at(2024, 1, 17, 8, 30),
            status: RiskStatus::Active,
        },
        RiskAlert {
            id: "RISK-002".into(),
            kind: RiskType::ResourceConflict,
            title: "Resource conflict".into(),
            description: "Alex Chen is assigned to two high-priority tasks at once".into(),
            severity: Severity::Medium,
            project: "Account service rewrite".into(),
            created_at: at(2024, 1, 17, 10, 15),
            status: RiskStatus::Active,
        },
        RiskAlert {
            id: "RISK-003".into(),
            kind: RiskType::QualityIssue,
            title: "Code quality risk".into(),
            description: "The last 3 commits exceed the complexity threshold; consider refactoring"
                .into(),
            severity: Severity::Low,
            project: "Payment optimization".into(),
            created_at: at(2024, 1, 17, 14, 20),
            status: RiskStatus::Active,
        },
    ]
}

pub fn risk_report(project_id: &str) -> RiskReport {
    let now = Utc::now();
    RiskReport {
        project_id: project_id.to_string(),
        report_id: format!("RPT-{}", now.timestamp_millis()),
        overall_risk_level: Severity::Medium,
        risk_score: 65,
        key_risks: vec![
            "High risk of schedule slip".into(),
            "Uneven distribution of team capacity".into(),
            "Accumulating technical debt".into(),
        ],
        recommendations: vec![
            "Reprioritize so critical-path tasks finish on time".into(),
            "Rebalance assignments across the team".into(),
            "Schedule time to pay down technical debt".into(),
        ],
        generated_at: now,
    }
}

pub fn health_report() -> HealthReport {
    HealthReport {
        overall_health: OverallHealth::Good,
        health_score: 78,
        projects: vec![
            ProjectHealth {
                name: "Storefront upgrade".into(),
                health: OverallHealth::Fair,
                progress: 65,
                risk_level: Severity::Medium,
                team_size: 8,
                deadline: Some(at(2024, 2, 15, 0, 0)),
            },
            ProjectHealth {
                name: "Account service rewrite".into(),
                health: OverallHealth::Good,
                progress: 80,
                risk_level: Severity::Low,
                team_size: 5,
                deadline: Some(at(2024, 1, 30, 0, 0)),
            },
            ProjectHealth {
                name: "Payment optimization".into(),
                health: OverallHealth::Excellent,
                progress: 95,
                risk_level: Severity::Low,
                team_size: 3,
                deadline: Some(at(2024, 1, 25, 0, 0)),
            },
        ],
        metrics: HealthMetrics {
            total_tasks: 156,
            completed_tasks: 89,
            in_progress_tasks: 45,
            overdue_tasks: 12,
            team_velocity: 23.5,
            bug_rate: 2.1,
        },
        generated_at: Utc::now(),
    }
}

pub fn dashboard() -> Dashboard {
    let progress = [(45, 50), (52, 55), (48, 60), (61, 65), (55, 70), (67, 75)];
    let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
    let velocity = [23.0, 27.0, 31.0, 28.0, 35.0, 32.0];

    Dashboard {
        stats: DashboardStats {
            total_projects: 12,
            active_projects: 8,
            completed_tasks: 156,
            pending_tasks: 43,
            team_members: 24,
            risk_alerts: 5,
        },
        project_progress: months
            .iter()
            .zip(progress)
            .map(|(m, (completed, planned))| ProgressPoint {
                label: m.to_string(),
                completed,
                planned,
            })
            .collect(),
        task_distribution: [
            ("Completed", 156),
            ("In progress", 43),
            ("Not started", 28),
            ("Overdue", 12),
        ]
        .into_iter()
        .map(|(label, value)| DistributionSlice {
            label: label.to_string(),
            value,
        })
        .collect(),
        team_velocity: velocity
            .iter()
            .enumerate()
            .map(|(i, v)| VelocityPoint {
                label: format!("W{}", i + 1),
                velocity: *v,
            })
            .collect(),
        recent_activities: vec![
            activity("task_completed", "Alex Chen completed \"User login\"", "2 minutes ago"),
            activity(
                "risk_alert",
                "Schedule slip risk detected on \"Storefront upgrade\"",
                "15 minutes ago",
            ),
            activity(
                "task_assigned",
                "Sam Li was assigned \"Database performance tuning\"",
                "1 hour ago",
            ),
            activity(
                "milestone",
                "\"Account service rewrite\" reached a milestone",
                "2 hours ago",
            ),
        ],
        upcoming_deadlines: vec![
            deadline(
                ("Finish mobile UI design", "Storefront upgrade"),
                "2024-01-20",
                3,
                Priority::High,
            ),
            deadline(
                ("Payment module testing", "Payment optimization"),
                "2024-01-22",
                5,
                Priority::Medium,
            ),
            deadline(
                ("Collect user feedback", "Account service rewrite"),
                "2024-01-25",
                8,
                Priority::Low,
            ),
        ],
    }
}

fn activity(kind: &str, message: &str, time: &str) -> Activity {
    Activity {
        kind: kind.to_string(),
        message: message.to_string(),
        time: time.to_string(),
    }
}

fn deadline(
    (task, project): (&str, &str),
    date: &str,
    days_left: i64,
    priority: Priority,
) -> UpcomingDeadline {
    UpcomingDeadline {
        task: task.to_string(),
        project: project.to_string(),
        deadline: date.to_string(),
        days_left,
        priority,
    }
}
