//! Task use-case service.
//!
//! # Responsibility
//! - Orchestrate lifecycle transitions with persistence.
//! - Run deadline normalization before every status-dependent read.
//!
//! # Invariants
//! - Normalization is an explicit step (`normalize`), invoked by
//!   `list_tasks`/`get_task` and available to callers directly.
//! - A task is written only when a lifecycle function reports a change.

use crate::clock::Clock;
use crate::lifecycle::{self, LifecycleError};
use crate::model::task::{NewTask, Task, TaskId, TaskValidationError};
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{RecordKind, RepoError};
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    TaskNotFound(TaskId),
    Lifecycle(LifecycleError),
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Lifecycle(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TaskNotFound(_) => None,
            Self::Lifecycle(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                kind: RecordKind::Task,
                id,
            } => Self::TaskNotFound(TaskId(id)),
            RepoError::Validation(err) => Self::Lifecycle(LifecycleError::Validation(err)),
            other => Self::Repo(other),
        }
    }
}

impl From<LifecycleError> for TaskServiceError {
    fn from(value: LifecycleError) -> Self {
        Self::Lifecycle(value)
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Lifecycle(LifecycleError::Validation(value))
    }
}

/// Task service facade over a repository implementation.
pub struct TaskService<'a, R: TaskRepository> {
    repo: R,
    clock: &'a dyn Clock,
}

impl<'a, R: TaskRepository> TaskService<'a, R> {
    pub fn new(repo: R, clock: &'a dyn Clock) -> Self {
        Self { repo, clock }
    }

    /// Current instant from the service clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Creates a `todo` task.
    pub fn create_task(
        &self,
        description: &str,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Task, TaskServiceError> {
        let draft = NewTask::new(description, deadline, self.clock.now())?;
        let task = self.repo.insert_task(&draft)?;
        info!(
            "event=task_create module=service status=ok task_id={} has_deadline={}",
            task.id,
            task.deadline.is_some()
        );
        Ok(task)
    }

    /// Marks overdue `todo` tasks as `missed` and persists them.
    ///
    /// Returns the ids that transitioned.
    pub fn normalize(&self) -> Result<Vec<TaskId>, TaskServiceError> {
        let mut candidates = self.repo.list_open_with_deadline()?;
        let changed = lifecycle::normalize(&mut candidates, self.clock.now());
        for task in candidates.iter().filter(|task| changed.contains(&task.id)) {
            self.repo.update_task(task)?;
        }
        if !changed.is_empty() {
            info!(
                "event=task_normalize module=service status=ok missed={}",
                changed.len()
            );
        }
        Ok(changed)
    }

    /// Lists tasks after normalization. Without `show_all`, `done` tasks
    /// are hidden and the rest are ordered by deadline.
    pub fn list_tasks(&self, show_all: bool) -> Result<Vec<Task>, TaskServiceError> {
        self.normalize()?;
        let query = TaskListQuery {
            include_done: show_all,
        };
        Ok(self.repo.list_tasks(&query)?)
    }

    /// Gets one task after normalization.
    pub fn get_task(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.normalize()?;
        self.require_task(id)
    }

    /// `todo|missed -> done`.
    pub fn complete_task(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        let mut task = self.require_task(id)?;
        lifecycle::complete(&mut task, self.clock.now())?;
        self.repo.update_task(&task)?;
        info!("event=task_complete module=service status=ok task_id={id}");
        Ok(task)
    }

    /// Replaces the description. Returns the task and whether it changed.
    pub fn edit_description(&self, id: TaskId, description: &str) -> Result<(Task, bool), TaskServiceError> {
        let mut task = self.require_task(id)?;
        let changed = lifecycle::edit_description(&mut task, description, self.clock.now())?;
        if changed {
            self.repo.update_task(&task)?;
            info!("event=task_edit module=service status=ok field=description task_id={id}");
        }
        Ok((task, changed))
    }

    /// Sets or clears the deadline without touching status.
    pub fn edit_deadline(
        &self,
        id: TaskId,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<(Task, bool), TaskServiceError> {
        let mut task = self.require_task(id)?;
        let changed = lifecycle::edit_deadline(&mut task, deadline, self.clock.now());
        if changed {
            self.repo.update_task(&task)?;
            info!(
                "event=task_edit module=service status=ok field=deadline task_id={} cleared={}",
                id,
                deadline.is_none()
            );
        }
        Ok((task, changed))
    }

    /// Deletes a task regardless of status.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    /// Loads a task without normalizing.
    pub fn require_task(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }
}
