//! Task commands.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Output, origin_note, require_loaded, status_note, to_json};
use crate::api::{Acknowledgement, DashboardApi, Origin, UpdatedTask};
use crate::models::{NewTask, Priority, Task, TaskStatus, TaskUpdate, parse_timestamp};
use crate::views::{Filter, PageStatus, TaskBoard};
use crate::{Error, Result};

fn parse_priority(raw: &str) -> Result<Priority> {
    raw.parse().map_err(Error::InvalidInput)
}

fn parse_due(raw: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| Error::InvalidInput(format!("invalid due date: {}", raw)))
}

fn task_line(task: &Task) -> String {
    let mut line = format!(
        "[{}] {} {} ({})",
        task.status.as_str(),
        task.id,
        task.title,
        task.priority.label()
    );
    if !task.assignee.is_empty() {
        line.push_str(&format!(" @{}", task.assignee));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due {}", due.format("%Y-%m-%d")));
    }
    line
}

#[derive(Serialize)]
pub struct TaskList {
    pub count: usize,
    pub tasks: Vec<Task>,
    pub data: PageStatus,
}

impl Output for TaskList {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("{} task(s)", self.count)];
        lines.extend(self.tasks.iter().map(|t| format!("  {}", task_line(t))));
        lines.join("\n") + &status_note(&self.data)
    }
}

/// Load the list, then filter in memory by status, search term and assignee.
pub async fn task_list(
    api: &DashboardApi,
    status: Option<&str>,
    assignee: Option<&str>,
    search: Option<&str>,
) -> Result<TaskList> {
    let mut board = TaskBoard::new();
    if let Some(raw) = status {
        board.status_filter = Filter::parse(raw).map_err(Error::InvalidInput)?;
    }
    board.search = search.unwrap_or_default().to_string();
    board.load(api).await?;
    require_loaded(&board.status)?;

    let tasks: Vec<Task> = board
        .visible()
        .into_iter()
        .filter(|t| assignee.is_none_or(|a| t.assignee.eq_ignore_ascii_case(a.trim())))
        .cloned()
        .collect();
    Ok(TaskList {
        count: tasks.len(),
        tasks,
        data: board.status,
    })
}

#[derive(Serialize)]
pub struct TaskCreated {
    pub task: Task,
    pub origin: Origin,
}

impl Output for TaskCreated {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        format!("Created {}{}", task_line(&self.task), origin_note(&self.origin))
    }
}

pub async fn task_create(
    api: &DashboardApi,
    title: String,
    description: Option<String>,
    priority: Option<&str>,
    assignee: Option<String>,
    due: Option<&str>,
) -> Result<TaskCreated> {
    let new = NewTask {
        title,
        description: description.unwrap_or_default(),
        priority: priority.map(parse_priority).transpose()?.unwrap_or_default(),
        assignee: assignee.unwrap_or_default(),
        due_date: due.map(parse_due).transpose()?,
    };
    let fetched = api.tasks().create(&new).await?;
    Ok(TaskCreated {
        task: fetched.data,
        origin: fetched.origin,
    })
}

#[derive(Serialize)]
pub struct TaskAdvanced {
    pub id: String,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub data: PageStatus,
}

impl Output for TaskAdvanced {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "{}: {} -> {}{}",
            self.id,
            self.from.label(),
            self.to.label(),
            status_note(&self.data)
        )
    }
}

/// Move a task one step along its workflow. The current status comes from
/// the task list, so the only transition offered is the valid next one.
pub async fn task_advance(api: &DashboardApi, id: &str) -> Result<TaskAdvanced> {
    let mut board = TaskBoard::new();
    board.load(api).await?;
    require_loaded(&board.status)?;
    let from = board
        .get(id)
        .ok_or_else(|| Error::NotFound(format!("task {}", id)))?
        .status;
    let to = board.advance(api, id).await?;
    Ok(TaskAdvanced {
        id: id.to_string(),
        from,
        to,
        data: board.status,
    })
}

#[derive(Serialize)]
pub struct TaskUpdated {
    pub task: UpdatedTask,
    pub origin: Origin,
}

impl Output for TaskUpdated {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let c = &self.task.changes;
        let mut fields = Vec::new();
        if let Some(status) = c.status {
            fields.push(format!("status={}", status));
        }
        if let Some(title) = &c.title {
            fields.push(format!("title={:?}", title));
        }
        if c.description.is_some() {
            fields.push("description".to_string());
        }
        if let Some(priority) = c.priority {
            fields.push(format!("priority={}", priority.as_str()));
        }
        if let Some(assignee) = &c.assignee {
            fields.push(format!("assignee={}", assignee));
        }
        if let Some(due) = c.due_date {
            fields.push(format!("due={}", due.format("%Y-%m-%d")));
        }
        format!(
            "Updated {}: {}{}",
            self.task.id,
            fields.join(", "),
            origin_note(&self.origin)
        )
    }
}

/// Field changes for `task update`, as given on the command line.
#[derive(Debug, Default)]
pub struct UpdateArgs<'a> {
    pub status: Option<&'a str>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<&'a str>,
    pub assignee: Option<String>,
    pub due: Option<&'a str>,
}

impl UpdateArgs<'_> {
    fn into_update(self) -> Result<TaskUpdate> {
        Ok(TaskUpdate {
            status: self
                .status
                .map(|s| s.parse::<TaskStatus>().map_err(Error::InvalidInput))
                .transpose()?,
            title: self.title,
            description: self.description,
            priority: self.priority.map(parse_priority).transpose()?,
            assignee: self.assignee,
            due_date: self.due.map(parse_due).transpose()?,
        })
    }
}

/// Apply field changes. A status change is checked against the task's
/// current status first, so only the next step of the workflow is accepted.
pub async fn task_update(api: &DashboardApi, id: &str, args: UpdateArgs<'_>) -> Result<TaskUpdated> {
    let update = args.into_update()?;
    if let Some(to) = update.status {
        let mut board = TaskBoard::new();
        board.load(api).await?;
        require_loaded(&board.status)?;
        board.check_transition(id, to)?;
    }
    let fetched = api.tasks().update(id, &update).await?;
    Ok(TaskUpdated {
        task: fetched.data,
        origin: fetched.origin,
    })
}

#[derive(Serialize)]
pub struct TaskDeleted {
    pub id: String,
    #[serde(flatten)]
    pub ack: Acknowledgement,
    pub origin: Origin,
}

impl Output for TaskDeleted {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let message = if self.ack.message.is_empty() {
            format!("Deleted {}", self.id)
        } else {
            self.ack.message.clone()
        };
        message + &origin_note(&self.origin)
    }

    fn succeeded(&self) -> bool {
        self.ack.success
    }
}

pub async fn task_delete(api: &DashboardApi, id: &str) -> Result<TaskDeleted> {
    let fetched = api.tasks().delete(id).await?;
    Ok(TaskDeleted {
        id: id.to_string(),
        ack: fetched.data,
        origin: fetched.origin,
    })
}
