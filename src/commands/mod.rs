//! Command implementations for the Bearing CLI.
//!
//! Each command drives the facade (or a page controller, where the command
//! needs page behaviour such as filtering or the status workflow) and returns
//! a result that can be printed as JSON or as text:
//! - `dashboard` - overview
//! - `tasks` - list, create, advance, update, delete
//! - `risks` - list, resolve, risk report
//! - `reports` - health report and questions
//! - `chat` - one assistant exchange
//! - `config` - resolved settings

pub mod chat;
pub mod config;
pub mod dashboard;
pub mod reports;
pub mod risks;
pub mod tasks;

pub use chat::{ChatAnswer, chat_ask};
pub use config::{ConfigPath, ConfigShow, config_path, config_show};
pub use dashboard::{DashboardSummary, dashboard};
pub use reports::{HealthSummary, report};
pub use risks::{RiskList, RiskReportResult, RiskResolved, risk_list, risk_report, risk_resolve};
pub use tasks::{
    TaskAdvanced, TaskCreated, TaskDeleted, TaskList, TaskUpdated, task_advance, task_create,
    task_delete, task_list, task_update,
};

use serde::Serialize;

use crate::api::Origin;
use crate::views::PageStatus;
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;

    /// Whether the command achieved what was asked. Failed results are still
    /// printed, but the process exits non-zero.
    fn succeeded(&self) -> bool {
        true
    }
}

/// Serialize a result, falling back to an error object.
pub(crate) fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

/// Trailing note for results built from sample data.
pub(crate) fn origin_note(origin: &Origin) -> String {
    match origin {
        Origin::Live => String::new(),
        Origin::Fallback { cause } => format!("\n(sample data: {})", cause),
    }
}

pub(crate) fn status_note(status: &PageStatus) -> String {
    status.banner().map(|b| format!("\n({})", b)).unwrap_or_default()
}

/// Turn a failed page load into an error; commands have nothing to show
/// without data.
pub(crate) fn require_loaded(status: &PageStatus) -> Result<()> {
    match status {
        PageStatus::Failed { error } => Err(Error::Api(error.clone())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;

    #[test]
    fn test_origin_note() {
        assert_eq!(origin_note(&Origin::Live), "");
        let note = origin_note(&Origin::Fallback {
            cause: ApiError::Timeout(30),
        });
        assert!(note.starts_with("\n(sample data:"));
    }

    #[test]
    fn test_require_loaded() {
        assert!(require_loaded(&PageStatus::Live).is_ok());
        let failed = PageStatus::Failed {
            error: ApiError::Unauthorized,
        };
        assert!(matches!(require_loaded(&failed), Err(Error::Api(ApiError::Unauthorized))));
    }
}
