//! Task lifecycle state machine.
//!
//! # Responsibility
//! - Apply explicit transitions (complete, edit description/deadline).
//! - Reconcile `todo` tasks against their deadline (`normalize`).
//!
//! # Invariants
//! - `normalize` only ever moves `todo -> missed`; `done` and `missed` are
//!   never touched, and tasks without a deadline never become `missed`.
//! - `normalize` is idempotent for a fixed `now`.
//! - `updated_at` changes iff status, description or deadline changes, and
//!   never moves backwards.
//! - Editing a `missed` task's deadline does not revert its status.
//!
//! All functions are pure; the caller persists returned changes.

use crate::model::task::{validate_description, Task, TaskId, TaskStatus, TaskValidationError};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// `complete` on a task that is already `done`.
    AlreadyDone(TaskId),
    Validation(TaskValidationError),
}

impl Display for LifecycleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyDone(id) => write!(f, "task {id} is already done"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LifecycleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadyDone(_) => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for LifecycleError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Whether an open task's deadline is strictly before `now`.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    task.status == TaskStatus::Todo && task.deadline.is_some_and(|deadline| deadline < now)
}

/// Marks overdue `todo` tasks as `missed`.
///
/// Returns the ids that transitioned, in input order.
pub fn normalize(tasks: &mut [Task], now: DateTime<Utc>) -> Vec<TaskId> {
    let mut changed = Vec::new();
    for task in tasks.iter_mut() {
        if is_overdue(task, now) {
            task.status = TaskStatus::Missed;
            touch(task, now);
            changed.push(task.id);
        }
    }
    changed
}

/// `todo -> done` or `missed -> done`.
pub fn complete(task: &mut Task, now: DateTime<Utc>) -> Result<(), LifecycleError> {
    if task.status == TaskStatus::Done {
        return Err(LifecycleError::AlreadyDone(task.id));
    }
    task.status = TaskStatus::Done;
    touch(task, now);
    Ok(())
}

/// Replaces the description. Returns whether anything changed.
pub fn edit_description(task: &mut Task, description: &str, now: DateTime<Utc>) -> Result<bool, LifecycleError> {
    let description = description.trim();
    validate_description(description)?;
    if task.description == description {
        return Ok(false);
    }
    task.description = description.to_string();
    touch(task, now);
    Ok(true)
}

/// Sets or clears the deadline. Status is left as-is. Returns whether
/// anything changed.
pub fn edit_deadline(task: &mut Task, deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    if task.deadline == deadline {
        return false;
    }
    task.deadline = deadline;
    touch(task, now);
    true
}

fn touch(task: &mut Task, now: DateTime<Utc>) {
    task.updated_at = task.updated_at.max(now);
}
