//! Core logic for taskpad: line-addressable notes and deadline-bound tasks.
//! The command layer in `taskpad_cli` only parses input and prints output;
//! every rule about content edits and task status lives here.

pub mod clock;
pub mod db;
pub mod deadline;
pub mod editor;
pub mod gateway;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use deadline::{format_deadline, parse_deadline, UnparseableDate};
pub use editor::{EditError, EditOp, RefactorScope};
pub use gateway::{GatewayConfig, OpenAiGateway, RewriteGateway, StaticGateway, FALLBACK_SENTINEL};
pub use lifecycle::LifecycleError;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{NewNote, Note, NoteId};
pub use model::task::{NewTask, Task, TaskId, TaskStatus, TaskValidationError};
pub use model::{parse_record_id, InvalidIdentifier};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::{RecordKind, RepoError, RepoResult};
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::task_service::{TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
