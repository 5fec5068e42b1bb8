//! Note repository contract and SQLite implementation.
//!
//! # Invariants
//! - Lists are ordered by `updated_at DESC, id DESC`.
//! - `update_note` writes title, content and `updated_at` as given; the
//!   caller owns timestamp bumping.

use super::{parse_db_instant, timestamp_to_db, RecordKind, RepoError, RepoResult};
use crate::model::note::{NewNote, Note, NoteId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    created_at,
    updated_at
FROM notes";

/// Repository interface for note records.
pub trait NoteRepository {
    /// Inserts a note and returns it with its assigned id.
    fn insert_note(&self, draft: &NewNote) -> RepoResult<Note>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, draft: &NewNote) -> RepoResult<Note> {
        let created_at = timestamp_to_db(draft.created_at);
        self.conn.execute(
            "INSERT INTO notes (title, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3);",
            params![draft.title.as_deref(), draft.content.as_str(), created_at],
        )?;

        Ok(Note {
            id: NoteId(self.conn.last_insert_rowid()),
            title: draft.title.clone(),
            content: draft.content.clone(),
            created_at: draft.created_at,
            updated_at: draft.created_at,
        })
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let raw = stmt.query_row([id.0], RawNote::from_row).optional()?;
        raw.map(RawNote::decode).transpose()
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY updated_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(RawNote::from_row(row)?.decode()?);
        }
        Ok(notes)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?1,
                content = ?2,
                updated_at = ?3
             WHERE id = ?4;",
            params![
                note.title.as_deref(),
                note.content.as_str(),
                timestamp_to_db(note.updated_at),
                note.id.0,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Note,
                id: note.id.0,
            });
        }
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id.0])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Note,
                id: id.0,
            });
        }
        Ok(())
    }
}

struct RawNote {
    id: i64,
    title: Option<String>,
    content: String,
    created_at: String,
    updated_at: String,
}

impl RawNote {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn decode(self) -> RepoResult<Note> {
        Ok(Note {
            id: NoteId(self.id),
            title: self.title.filter(|title| !title.trim().is_empty()),
            content: self.content,
            created_at: parse_db_instant(&self.created_at, "notes.created_at")?,
            updated_at: parse_db_instant(&self.updated_at, "notes.updated_at")?,
        })
    }
}
