//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Open-task lists are ordered by deadline ascending, tasks without a
//!   deadline last; full lists by `updated_at DESC`.
//! - Deadlines are stored in the sortable form from
//!   `crate::deadline::format_deadline`.

use super::{parse_db_instant, timestamp_to_db, RecordKind, RepoError, RepoResult};
use crate::deadline::format_deadline;
use crate::model::task::{NewTask, Task, TaskId, TaskStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    description,
    deadline,
    status,
    created_at,
    updated_at
FROM tasks";

/// Query options for listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Include `done` tasks (and switch to recency order).
    pub include_done: bool,
}

/// Repository interface for task records.
pub trait TaskRepository {
    /// Inserts a `todo` task and returns it with its assigned id.
    fn insert_task(&self, draft: &NewTask) -> RepoResult<Task>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    /// `todo` tasks that carry a deadline.
    fn list_open_with_deadline(&self) -> RepoResult<Vec<Task>>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_tasks(&self, sql: &str) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(RawTask::from_row(row)?.decode()?);
        }
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, draft: &NewTask) -> RepoResult<Task> {
        let task = Task {
            id: TaskId(0),
            description: draft.description.clone(),
            deadline: draft.deadline,
            status: TaskStatus::Todo,
            created_at: draft.created_at,
            updated_at: draft.created_at,
        };
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (description, deadline, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4);",
            params![
                task.description.as_str(),
                task.deadline.map(format_deadline),
                task.status.as_str(),
                timestamp_to_db(task.created_at),
            ],
        )?;

        Ok(Task {
            id: TaskId(self.conn.last_insert_rowid()),
            ..task
        })
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let raw = stmt.query_row([id.0], RawTask::from_row).optional()?;
        raw.map(RawTask::decode).transpose()
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        if query.include_done {
            self.query_tasks(&format!(
                "{TASK_SELECT_SQL} ORDER BY updated_at DESC, id DESC;"
            ))
        } else {
            self.query_tasks(&format!(
                "{TASK_SELECT_SQL}
                 WHERE status != 'done'
                 ORDER BY deadline IS NULL, deadline ASC, id ASC;"
            ))
        }
    }

    fn list_open_with_deadline(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks(&format!(
            "{TASK_SELECT_SQL}
             WHERE status = 'todo'
               AND deadline IS NOT NULL
             ORDER BY id ASC;"
        ))
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                description = ?1,
                deadline = ?2,
                status = ?3,
                updated_at = ?4
             WHERE id = ?5;",
            params![
                task.description.as_str(),
                task.deadline.map(format_deadline),
                task.status.as_str(),
                timestamp_to_db(task.updated_at),
                task.id.0,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Task,
                id: task.id.0,
            });
        }
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id.0])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Task,
                id: id.0,
            });
        }
        Ok(())
    }
}

struct RawTask {
    id: i64,
    description: String,
    deadline: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl RawTask {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            description: row.get("description")?,
            deadline: row.get("deadline")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn decode(self) -> RepoResult<Task> {
        let status = self.status.parse::<TaskStatus>().map_err(|err| {
            RepoError::InvalidData(format!("{err} in tasks.status"))
        })?;
        let deadline = match self.deadline.as_deref() {
            Some(value) => Some(parse_db_instant(value, "tasks.deadline")?),
            None => None,
        };

        let task = Task {
            id: TaskId(self.id),
            description: self.description,
            deadline,
            status,
            created_at: parse_db_instant(&self.created_at, "tasks.created_at")?,
            updated_at: parse_db_instant(&self.updated_at, "tasks.updated_at")?,
        };
        task.validate()?;
        Ok(task)
    }
}
