//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record, its status and insert draft.
//! - Validate description invariants before persistence.
//!
//! # Invariants
//! - `description` is never blank.
//! - `deadline`, when set, is an absolute UTC instant.
//! - New tasks always start as `TaskStatus::Todo`.
//!
//! # See also
//! - `crate::lifecycle` for status transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Open; subject to deadline normalization.
    Todo,
    /// Completed by explicit command.
    Done,
    /// Deadline passed while still open.
    Missed,
}

impl TaskStatus {
    /// Stable storage/display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Done => "done",
            Self::Missed => "missed",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTaskStatus(pub String);

impl Display for UnknownTaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown task status `{}`", self.0)
    }
}

impl Error for UnknownTaskStatus {}

impl FromStr for TaskStatus {
    type Err = UnknownTaskStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "todo" => Ok(Self::Todo),
            "done" => Ok(Self::Done),
            "missed" => Ok(Self::Missed),
            other => Err(UnknownTaskStatus(other.to_string())),
        }
    }
}

/// Validation errors for task write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyDescription,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "task description must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Validates invariants that must hold before persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_description(&self.description)
    }
}

/// Insert draft; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NewTask {
    /// Builds a draft with trimmed description.
    ///
    /// # Errors
    /// - `EmptyDescription` when the description is blank.
    pub fn new(
        description: &str,
        deadline: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let description = description.trim().to_string();
        validate_description(&description)?;
        Ok(Self {
            description,
            deadline,
            created_at: now,
        })
    }
}

pub(crate) fn validate_description(description: &str) -> Result<(), TaskValidationError> {
    if description.trim().is_empty() {
        return Err(TaskValidationError::EmptyDescription);
    }
    Ok(())
}
