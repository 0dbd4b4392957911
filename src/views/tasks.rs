//! Task list page.

use serde_json::{Map, json};

use super::chat::ChatSession;
use super::filter::{Filter, matches_search};
use super::{PageStatus, absorb};
use crate::api::{DashboardApi, TaskFilters};
use crate::models::{ChatMessage, NewTask, Task, TaskStatus, TaskUpdate};
use crate::{Error, Result};

/// Context sent by the embedded assistant.
pub const ASSISTANT_CONTEXT: &str = "task_management";

#[derive(Debug, Clone)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    pub status: PageStatus,
    pub search: String,
    pub status_filter: Filter<TaskStatus>,
    pub assistant: ChatSession,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            status: PageStatus::Idle,
            search: String::new(),
            status_filter: Filter::All,
            assistant: ChatSession::embedded(ASSISTANT_CONTEXT),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Fetch the list. Service failures end up in [`status`](Self::status).
    pub async fn load(&mut self, api: &DashboardApi) -> Result<()> {
        let result = api.tasks().list(&TaskFilters::default()).await;
        if let Some(tasks) = absorb(&mut self.status, result)? {
            self.tasks = tasks;
        }
        Ok(())
    }

    /// Tasks matching the search term (title or description) and status filter.
    pub fn visible(&self) -> Vec<&Task> {
        let search = self.search.as_str();
        self.tasks
            .iter()
            .filter(|t| matches_search(search, &[t.title.as_str(), t.description.as_str()]))
            .filter(|t| self.status_filter.matches(&t.status))
            .collect()
    }

    /// Count of loaded tasks per status, in display order.
    pub fn counts(&self) -> Vec<(TaskStatus, usize)> {
        TaskStatus::ALL
            .iter()
            .map(|s| (*s, self.tasks.iter().filter(|t| t.status == *s).count()))
            .collect()
    }

    /// Create a task and put it at the head of the list.
    pub async fn create(&mut self, api: &DashboardApi, new: NewTask) -> Result<&Task> {
        let fetched = api.tasks().create(&new).await?;
        self.status.note(&fetched.origin);
        self.tasks.insert(0, fetched.data);
        Ok(&self.tasks[0])
    }

    /// Move a task one step along TODO -> IN_PROGRESS -> DONE.
    pub async fn advance(&mut self, api: &DashboardApi, id: &str) -> Result<TaskStatus> {
        let current = self
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("task {}", id)))?
            .status;
        let next = current
            .next()
            .ok_or_else(|| Error::InvalidInput(format!("task {} is already done", id)))?;
        self.set_status(api, id, next).await?;
        Ok(next)
    }

    /// Change a task's status; only the single forward transition is allowed.
    pub async fn set_status(&mut self, api: &DashboardApi, id: &str, to: TaskStatus) -> Result<()> {
        self.check_transition(id, to)?;
        let update = TaskUpdate::status(to);
        let fetched = api.tasks().update(id, &update).await?;
        self.status.note(&fetched.origin);
        if let Some(index) = self.tasks.iter().position(|t| t.id == id) {
            update.apply_to(&mut self.tasks[index]);
        }
        Ok(())
    }

    /// Fails unless `to` is the single valid next status of task `id`;
    /// returns the current status.
    pub fn check_transition(&self, id: &str, to: TaskStatus) -> Result<TaskStatus> {
        let from = self.tasks[self.index_of(id)?].status;
        if !from.can_transition_to(to) {
            return Err(Error::InvalidInput(format!(
                "cannot move task {} from {} to {}",
                id, from, to
            )));
        }
        Ok(from)
    }

    pub async fn delete(&mut self, api: &DashboardApi, id: &str) -> Result<()> {
        self.index_of(id)?;
        let fetched = api.tasks().delete(id).await?;
        fetched.data.confirm(&format!("delete task {}", id))?;
        self.status.note(&fetched.origin);
        self.tasks.retain(|t| t.id != id);
        Ok(())
    }

    /// Ask the embedded assistant, passing the current task count.
    pub async fn ask_assistant(&mut self, api: &DashboardApi, text: &str) -> Result<&ChatMessage> {
        let mut inputs = Map::new();
        inputs.insert("task_count".to_string(), json!(self.tasks.len()));
        self.assistant.send_with(api, text, inputs).await
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("task {}", id)))
    }
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new()
    }
}
