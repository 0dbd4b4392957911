//! Task operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::payload::params;
use super::{DashboardApi, Fetched, mock};
use crate::models::{NewTask, Task, TaskStatus, TaskUpdate, flexible_time};
use crate::{Error, Result};

/// Filters forwarded with `list_tasks`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Result of `update_task`: the id, the fields that changed, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatedTask {
    pub id: String,
    #[serde(flatten)]
    pub changes: TaskUpdate,
    #[serde(default = "Utc::now", with = "flexible_time")]
    pub updated_at: DateTime<Utc>,
}

/// Acknowledgement for operations that return no record.
///
/// The payload must carry `success` or `message`; a missing `success` with a
/// message counts as success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AcknowledgementWire")]
pub struct Acknowledgement {
    pub success: bool,
    pub message: String,
}

impl Acknowledgement {
    /// `Err` when the service answered but declined the operation.
    pub fn confirm(&self, what: &str) -> Result<()> {
        if self.success {
            return Ok(());
        }
        let reason = if self.message.is_empty() {
            "no reason given"
        } else {
            self.message.as_str()
        };
        Err(Error::Other(format!("service declined to {}: {}", what, reason)))
    }
}

#[derive(Deserialize)]
struct AcknowledgementWire {
    success: Option<bool>,
    message: Option<String>,
}

impl TryFrom<AcknowledgementWire> for Acknowledgement {
    type Error = String;

    fn try_from(wire: AcknowledgementWire) -> std::result::Result<Self, String> {
        if wire.success.is_none() && wire.message.is_none() {
            return Err("acknowledgement has neither success nor message".to_string());
        }
        Ok(Self {
            success: wire.success.unwrap_or(true),
            message: wire.message.unwrap_or_default(),
        })
    }
}

pub struct TasksApi<'a> {
    api: &'a DashboardApi,
}

impl<'a> TasksApi<'a> {
    pub(crate) fn new(api: &'a DashboardApi) -> Self {
        Self { api }
    }

    /// `create_task`: the task is sent as a JSON string in `task_data`.
    pub async fn create(&self, new: &NewTask) -> Result<Fetched<Task>> {
        new.validate().map_err(Error::InvalidInput)?;
        let task_data = serde_json::to_string(new)?;
        self.api
            .fetch(
                "create_task",
                params([("task_data", Value::String(task_data))]),
                "task",
                || mock::created_task(new),
            )
            .await
    }

    pub async fn list(&self, filters: &TaskFilters) -> Result<Fetched<Vec<Task>>> {
        self.api
            .fetch(
                "list_tasks",
                params([("filters", serde_json::to_value(filters)?)]),
                "tasks",
                mock::tasks,
            )
            .await
    }

    pub async fn update(&self, id: &str, update: &TaskUpdate) -> Result<Fetched<UpdatedTask>> {
        require_id(id)?;
        if update.is_empty() {
            return Err(Error::InvalidInput("update has no fields".to_string()));
        }
        self.api
            .fetch(
                "update_task",
                params([
                    ("task_id", json!(id)),
                    ("update_data", serde_json::to_value(update)?),
                ]),
                "task",
                || mock::updated_task(id, update),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Fetched<Acknowledgement>> {
        require_id(id)?;
        self.api
            .fetch(
                "delete_task",
                params([("task_id", json!(id))]),
                "result",
                || mock::acknowledged("Task deleted"),
            )
            .await
    }
}

pub(crate) fn require_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::InvalidInput("id must not be empty".to_string()));
    }
    Ok(())
}
