//! `notes ...` handlers.

use crate::app::App;
use crate::command::{parse_part_edit, parse_refactor_scope, PartEdit};
use std::io::{self, BufRead, Write};
use taskpad_core::editor::checked_span;
use taskpad_core::{EditError, EditOp, NoteId, NoteServiceError, RefactorScope};

const PART_OPTIONS: &str =
    "Options: 'replace N' 'replace N-M' 'delete N' 'append' 'insert N' 'llm-refactor' 'cancel'";

impl<'a, R: BufRead, W: Write> App<'a, R, W> {
    pub(crate) fn create_note(&mut self) -> io::Result<()> {
        let title = self.console.prompt("Title (optional): ")?.unwrap_or_default();
        self.console
            .say("Enter note content. Finish with a single line with only 'END'.")?;
        let lines = self.console.read_block()?;
        match self.notes().create_note(&title, &lines) {
            Ok(note) => self.console.say(format!("Note saved [{}].", note.id)),
            Err(err) => self.report(&err),
        }
    }

    pub(crate) fn list_notes(&mut self) -> io::Result<()> {
        let notes = match self.notes().list_notes() {
            Ok(notes) => notes,
            Err(err) => return self.report(&err),
        };
        if notes.is_empty() {
            return self.console.say("No notes.");
        }
        for note in notes {
            self.console.say(format!(
                "[{}] {} (updated: {})",
                note.id,
                note.display_title(),
                note.updated_at.format("%Y-%m-%d %H:%M:%S")
            ))?;
        }
        Ok(())
    }

    pub(crate) fn view_note(&mut self, raw_id: Option<String>) -> io::Result<()> {
        let Some(id) = self.resolve_id(raw_id, "Note id: ")? else {
            return Ok(());
        };
        match self.notes().require_note(NoteId(id)) {
            Ok(note) => {
                self.console.say(format!(
                    "--- Note [{}] {} ---",
                    note.id,
                    note.title.as_deref().unwrap_or_default()
                ))?;
                self.console.say(&note.content)?;
                self.console.say("--- end ---")
            }
            Err(err) => self.note_failure(err),
        }
    }

    pub(crate) fn delete_note(&mut self, raw_id: Option<String>) -> io::Result<()> {
        let Some(id) = self.resolve_id(raw_id, "Note id to delete: ")? else {
            return Ok(());
        };
        match self.notes().delete_note(NoteId(id)) {
            Ok(()) => self.console.say("Deleted."),
            Err(err) => self.note_failure(err),
        }
    }

    pub(crate) fn edit_note(&mut self, raw_id: Option<String>) -> io::Result<()> {
        let Some(id) = self.resolve_id(raw_id, "Note id to edit: ")? else {
            return Ok(());
        };
        let id = NoteId(id);
        let note = match self.notes().require_note(id) {
            Ok(note) => note,
            Err(err) => return self.note_failure(err),
        };

        self.console.say("Edit whole note or part? (whole/part)")?;
        let choice = self.console.prompt("> ")?.unwrap_or_default();
        match choice.trim().to_ascii_lowercase().as_str() {
            "whole" | "w" => {
                self.console.say("Current content:")?;
                self.console.say(&note.content)?;
                self.console
                    .say("Enter new content. Finish with single line 'END'.")?;
                let lines = self.console.read_block()?;
                match self.notes().replace_content(id, &lines) {
                    Ok(_) => self.console.say("Note replaced."),
                    Err(err) => self.note_failure(err),
                }
            }
            "part" | "p" | "" => self.edit_note_part(id, note.lines()),
            _ => self.console.say("Cancelled."),
        }
    }

    fn edit_note_part(&mut self, id: NoteId, lines: Vec<String>) -> io::Result<()> {
        if lines.is_empty() {
            self.console.say("[empty note] You can append lines.")?;
        }
        self.console.say("Current note (lines numbered):")?;
        for (number, line) in lines.iter().enumerate() {
            self.console.say(format!("{:3}: {}", number + 1, line))?;
        }
        self.console.say(PART_OPTIONS)?;
        let input = self.console.prompt("> ")?.unwrap_or_default();
        let command = match parse_part_edit(&input) {
            Ok(command) => command,
            Err(err) => return self.console.say(format!("{err}. Cancelled.")),
        };

        let (op, done) = match command {
            PartEdit::Cancel => return self.console.say("Cancelled."),
            PartEdit::ReplaceLine(index) => {
                let old = usize::try_from(index - 1)
                    .ok()
                    .and_then(|position| lines.get(position))
                    .map_or("<no line>", String::as_str);
                self.console.say(format!("Old: {old}"))?;
                let text = self.console.prompt("New text: ")?.unwrap_or_default();
                (EditOp::ReplaceLine { index, text }, "Updated.")
            }
            PartEdit::ReplaceRange(start, end) => {
                if let Err(err) = checked_span(&lines, start, end) {
                    return self.console.say(format!("Bad range: {err}."));
                }
                self.console
                    .say("Enter replacement text (END on its own line):")?;
                let block = self.console.read_block()?.join("\n");
                (EditOp::ReplaceRange { start, end, block }, "Updated.")
            }
            PartEdit::DeleteLine(index) => (EditOp::DeleteLine { index }, "Line deleted."),
            PartEdit::Append => {
                self.console.say("Enter text lines to append (END to finish):")?;
                let new_lines = self.console.read_block()?;
                (EditOp::Append { lines: new_lines }, "Appended.")
            }
            PartEdit::Insert(index) => {
                self.console
                    .say("Enter lines to insert BEFORE that line (END to finish):")?;
                let new_lines = self.console.read_block()?;
                (
                    EditOp::InsertBefore {
                        index,
                        lines: new_lines,
                    },
                    "Inserted.",
                )
            }
            PartEdit::Refactor => {
                self.console
                    .say("Choose scope: 'whole' or 'lines N-M' or 'lines N'")?;
                let input = self.console.prompt("> ")?.unwrap_or_default();
                let scope = match parse_refactor_scope(&input) {
                    Ok(scope) => scope,
                    Err(err) => return self.console.say(format!("Unknown scope: {err}.")),
                };
                let done = match scope {
                    RefactorScope::Whole => "Note replaced with rewritten text.",
                    RefactorScope::Range(..) => "Selection replaced with rewritten text.",
                    RefactorScope::Line(_) => "Line replaced with rewritten text.",
                };
                self.console.say("Sending the selection for rewriting...")?;
                (EditOp::Refactor { scope }, done)
            }
        };

        let gateway = self.gateway();
        match self.notes().apply_edit(id, &op, gateway) {
            Ok(_) => self.console.say(done),
            Err(err) => self.note_failure(err),
        }
    }

    fn note_failure(&mut self, err: NoteServiceError) -> io::Result<()> {
        match err {
            NoteServiceError::NoteNotFound(_) => self.console.say("Note not found."),
            NoteServiceError::Edit(EditError::OutOfRange { .. }) => {
                self.console.say(format!("Index out of range: {err}."))
            }
            NoteServiceError::Edit(EditError::EmptyRewrite) => self
                .console
                .say("The rewrite came back empty. Note unchanged."),
            NoteServiceError::Repo(_) => self.report(&err),
        }
    }
}
