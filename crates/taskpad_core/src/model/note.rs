//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its insert draft.
//! - Expose content as an ordered line sequence for the line editor.
//!
//! # Invariants
//! - `id` is assigned by the store and immutable afterwards.
//! - `updated_at` never moves backwards; bumped on every content mutation.

use super::lines::{join_lines, split_lines};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned note identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// `None` when the user left the title blank.
    pub title: Option<String>,
    /// Lines joined with `\n`.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Returns content as editable lines.
    pub fn lines(&self) -> Vec<String> {
        split_lines(&self.content)
    }

    /// Replaces content with `lines` and bumps `updated_at` to `now`
    /// (or keeps the previous value if the clock went backwards).
    pub fn set_lines<S: AsRef<str>>(&mut self, lines: &[S], now: DateTime<Utc>) {
        self.content = join_lines(lines);
        self.updated_at = self.updated_at.max(now);
    }

    /// Title for list output.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("<no title>")
    }
}

/// Insert draft; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewNote {
    /// Builds a draft from raw title input and content lines.
    pub fn new<S: AsRef<str>>(title: &str, lines: &[S], now: DateTime<Utc>) -> Self {
        Self {
            title: normalize_title(title),
            content: join_lines(lines),
            created_at: now,
        }
    }
}

/// Blank titles are stored as `NULL`.
pub fn normalize_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{NewNote, Note, NoteId};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn new_note_drops_blank_title() {
        let now = Utc::now();
        let draft = NewNote::new("   ", &["a", "b"], now);
        assert_eq!(draft.title, None);
        assert_eq!(draft.content, "a\nb");
    }

    #[test]
    fn set_lines_never_moves_updated_at_backwards() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut note = Note {
            id: NoteId(1),
            title: None,
            content: "a".to_string(),
            created_at: created,
            updated_at: created,
        };

        note.set_lines(&["b"], created - Duration::hours(1));
        assert_eq!(note.content, "b");
        assert_eq!(note.updated_at, created);

        let later = created + Duration::minutes(5);
        note.set_lines(&["c"], later);
        assert_eq!(note.updated_at, later);
    }
}
