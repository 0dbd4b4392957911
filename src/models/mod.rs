//! Data models for Bearing entities.
//!
//! This module defines the records exchanged with the workflow service:
//! - `Task` - Work items with status, priority and assignee
//! - `RiskAlert` - Detected project risks with type, severity and status
//! - `HealthReport` - Portfolio health snapshot with per-project rows and metrics
//! - `RiskReport` - Generated risk assessment for a project
//! - `ChatMessage` - Assistant conversation entries (page memory only)
//! - `Dashboard` - Overview statistics and trend series
//!
//! All records are plain data: no invariants beyond field presence, and
//! nothing outlives the process that fetched it.

pub mod chat;
pub mod dashboard;
pub mod report;
pub mod risk;
pub mod task;

pub use chat::{ChatMessage, ChatReply, Role, Suggestion};
pub use dashboard::{
    Activity, Dashboard, DashboardStats, DistributionSlice, ProgressPoint, UpcomingDeadline,
    VelocityPoint,
};
pub use report::{HealthMetrics, HealthReport, OverallHealth, ProjectHealth, RiskReport};
pub use risk::{RiskAlert, RiskStatus, RiskType, Severity};
pub use task::{NewTask, Priority, Task, TaskStatus, TaskUpdate};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Parse a timestamp as sent by the workflow service.
///
/// Accepts RFC 3339 (`2024-01-15T10:00:00Z`), a naive date-time
/// (`2024-01-15T10:00:00`, assumed UTC) or a bare date (`2024-01-15`,
/// midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    None
}

/// Format a timestamp the way it is sent back to the service.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serde adapter for required timestamps in any format [`parse_timestamp`] accepts.
pub(crate) mod flexible_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

/// Serde adapter for optional timestamps; an empty string means absent.
pub(crate) mod flexible_time_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => s.serialize_str(&super::format_timestamp(dt)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_timestamp(s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", s))),
        }
    }
}

/// Normalize a user-supplied enum token to its wire form
/// (`in-progress` / `In Progress` -> `IN_PROGRESS`).
pub(crate) fn wire_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}
