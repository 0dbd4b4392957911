//! Risk alerts raised by the workflow service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{flexible_time, wire_token};

/// Category of a detected risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskType {
    ScheduleDelay,
    ResourceConflict,
    QualityIssue,
    BudgetOverrun,
    TechnicalDebt,
}

impl RiskType {
    pub const ALL: [RiskType; 5] = [
        RiskType::ScheduleDelay,
        RiskType::ResourceConflict,
        RiskType::QualityIssue,
        RiskType::BudgetOverrun,
        RiskType::TechnicalDebt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskType::ScheduleDelay => "SCHEDULE_DELAY",
            RiskType::ResourceConflict => "RESOURCE_CONFLICT",
            RiskType::QualityIssue => "QUALITY_ISSUE",
            RiskType::BudgetOverrun => "BUDGET_OVERRUN",
            RiskType::TechnicalDebt => "TECHNICAL_DEBT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskType::ScheduleDelay => "Schedule delay",
            RiskType::ResourceConflict => "Resource conflict",
            RiskType::QualityIssue => "Quality issue",
            RiskType::BudgetOverrun => "Budget overrun",
            RiskType::TechnicalDebt => "Technical debt",
        }
    }
}

impl fmt::Display for RiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let token = wire_token(s);
        RiskType::ALL
            .into_iter()
            .find(|t| t.as_str() == token)
            .ok_or_else(|| format!("Unknown risk type: {}", s))
    }
}

/// Severity of a risk, also used for project risk levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    /// Numeric rank for charts (low = 1, high = 3).
    pub fn rank(self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match wire_token(s).as_str() {
            "HIGH" => Ok(Severity::High),
            "MEDIUM" => Ok(Severity::Medium),
            "LOW" => Ok(Severity::Low),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Lifecycle of an alert. Alerts only move from ACTIVE to RESOLVED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    #[default]
    Active,
    Resolved,
}

impl RiskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskStatus::Active => "ACTIVE",
            RiskStatus::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match wire_token(s).as_str() {
            "ACTIVE" => Ok(RiskStatus::Active),
            "RESOLVED" => Ok(RiskStatus::Resolved),
            _ => Err(format!("Unknown risk status: {}", s)),
        }
    }
}

/// A risk detected for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: RiskType,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub severity: Severity,

    /// Name of the affected project
    #[serde(default)]
    pub project: String,

    #[serde(default = "Utc::now", with = "flexible_time")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub status: RiskStatus,
}

impl RiskAlert {
    pub fn is_active(&self) -> bool {
        self.status == RiskStatus::Active
    }
}
