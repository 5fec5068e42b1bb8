//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define record-level get/list/insert/update/delete contracts.
//! - Keep SQL and column encodings inside the persistence boundary.
//!
//! # Invariants
//! - Timestamps are stored as ISO-8601 UTC text.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Update/delete of a missing id reports `NotFound`.

use crate::db::DbError;
use crate::model::task::TaskValidationError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Record family for `NotFound` reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Note,
    Task,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Note => f.write_str("note"),
            Self::Task => f.write_str("task"),
        }
    }
}

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound { kind: RecordKind, id: i64 },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Encodes a record timestamp (microsecond precision, `Z` suffix).
pub(crate) fn timestamp_to_db(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decodes a stored instant. Offset-less values are read as UTC.
pub(crate) fn parse_db_instant(value: &str, column: &str) -> Result<DateTime<Utc>, RepoError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}
