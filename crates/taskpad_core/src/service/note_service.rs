//! Note use-case service.
//!
//! # Responsibility
//! - Load a note, run a line-editor operation, persist the result.
//! - Own `updated_at` bumping for note mutations.
//!
//! # Invariants
//! - Nothing is written when the editor reports a failure.
//! - A gateway-backed edit writes only after the gateway has answered.

use crate::clock::Clock;
use crate::editor::{self, EditError, EditOp};
use crate::gateway::RewriteGateway;
use crate::model::note::{NewNote, Note, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RecordKind, RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Editor rejected the operation; the note is unchanged.
    Edit(EditError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Edit(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoteNotFound(_) => None,
            Self::Edit(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                kind: RecordKind::Note,
                id,
            } => Self::NoteNotFound(NoteId(id)),
            other => Self::Repo(other),
        }
    }
}

impl From<EditError> for NoteServiceError {
    fn from(value: EditError) -> Self {
        Self::Edit(value)
    }
}

/// Note service facade over a repository implementation.
pub struct NoteService<'a, R: NoteRepository> {
    repo: R,
    clock: &'a dyn Clock,
}

impl<'a, R: NoteRepository> NoteService<'a, R> {
    pub fn new(repo: R, clock: &'a dyn Clock) -> Self {
        Self { repo, clock }
    }

    /// Creates a note from a raw title and content lines.
    pub fn create_note<S: AsRef<str>>(&self, title: &str, lines: &[S]) -> Result<Note, NoteServiceError> {
        let draft = NewNote::new(title, lines, self.clock.now());
        let note = self.repo.insert_note(&draft)?;
        info!(
            "event=note_create module=service status=ok note_id={} lines={}",
            note.id,
            lines.len()
        );
        Ok(note)
    }

    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    /// Like `get_note` but maps absence to `NoteNotFound`.
    pub fn require_note(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }

    /// Notes ordered by most recently updated.
    pub fn list_notes(&self) -> RepoResult<Vec<Note>> {
        self.repo.list_notes()
    }

    /// Replaces the whole content.
    pub fn replace_content<S: AsRef<str>>(&self, id: NoteId, lines: &[S]) -> Result<Note, NoteServiceError> {
        let mut note = self.require_note(id)?;
        note.set_lines(lines, self.clock.now());
        self.repo.update_note(&note)?;
        info!(
            "event=note_edit module=service status=ok op=replace_whole note_id={} lines={}",
            id,
            lines.len()
        );
        Ok(note)
    }

    /// Applies one line-editor operation and persists the result.
    ///
    /// # Errors
    /// - `NoteNotFound` when the id does not exist.
    /// - `Edit` when the editor rejects the operation; nothing is written.
    pub fn apply_edit<G: RewriteGateway + ?Sized>(
        &self,
        id: NoteId,
        op: &EditOp,
        gateway: &G,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.require_note(id)?;
        let edited = match editor::apply(&note.lines(), op, gateway) {
            Ok(lines) => lines,
            Err(err) => {
                warn!(
                    "event=note_edit module=service status=rejected op={} note_id={} error={}",
                    op.name(),
                    id,
                    err
                );
                return Err(err.into());
            }
        };

        note.set_lines(&edited, self.clock.now());
        self.repo.update_note(&note)?;
        info!(
            "event=note_edit module=service status=ok op={} note_id={} lines={}",
            op.name(),
            id,
            edited.len()
        );
        Ok(note)
    }

    /// Deletes a note permanently.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }
}
