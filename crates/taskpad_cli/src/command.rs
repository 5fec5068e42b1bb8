//! Command grammar.
//!
//! Top level (whitespace-tokenized):
//! `notes {create|list|view <id>|edit <id>|delete <id>}`,
//! `tasks {create|list [all]|view <id>|edit <id>|done <id>|delete <id>}`,
//! `ask <question>`, `help`, `exit|quit`.
//!
//! Ids stay raw text here; handlers parse them so an invalid id can be
//! reported in context. A missing id makes the handler prompt for one.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use taskpad_core::RefactorScope;

static INDEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").expect("valid index regex"));
static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+)\s*-\s*(-?\d+)$").expect("valid range regex"));

pub const NOTES_USAGE: &str = "notes: subcommands create/list/view/edit/delete";
pub const TASKS_USAGE: &str = "tasks: subcommands create/list/view/edit/done/delete";
pub const ASK_USAGE: &str = "Type your question after 'ask'.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    Exit,
    Notes(NoteCommand),
    Tasks(TaskCommand),
    Ask(String),
    /// Recognized group but incomplete input.
    Usage(&'static str),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteCommand {
    Create,
    List,
    View(Option<String>),
    Edit(Option<String>),
    Delete(Option<String>),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    Create,
    List { all: bool },
    View(Option<String>),
    Edit(Option<String>),
    Done(Option<String>),
    Delete(Option<String>),
    Unknown(String),
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let mut tokens = trimmed.split_whitespace();
    let Some(head) = tokens.next() else {
        return Command::Empty;
    };
    let sub = tokens.next();
    let arg = tokens.next().map(str::to_string);

    match head {
        "exit" | "quit" => Command::Exit,
        "help" => Command::Help,
        "ask" => {
            let question = trimmed["ask".len()..].trim();
            if question.is_empty() {
                Command::Usage(ASK_USAGE)
            } else {
                Command::Ask(question.to_string())
            }
        }
        "notes" => match sub {
            None => Command::Usage(NOTES_USAGE),
            Some(sub) => Command::Notes(match sub {
                "create" => NoteCommand::Create,
                "list" => NoteCommand::List,
                "view" => NoteCommand::View(arg),
                "edit" => NoteCommand::Edit(arg),
                "delete" => NoteCommand::Delete(arg),
                other => NoteCommand::Unknown(other.to_string()),
            }),
        },
        "tasks" => match sub {
            None => Command::Usage(TASKS_USAGE),
            Some(sub) => Command::Tasks(match sub {
                "create" => TaskCommand::Create,
                "list" => TaskCommand::List {
                    all: arg.as_deref() == Some("all"),
                },
                "view" => TaskCommand::View(arg),
                "edit" => TaskCommand::Edit(arg),
                "done" => TaskCommand::Done(arg),
                "delete" => TaskCommand::Delete(arg),
                other => TaskCommand::Unknown(other.to_string()),
            }),
        },
        other => Command::Unknown(other.to_string()),
    }
}

/// Sub-command of a partial note edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartEdit {
    ReplaceLine(i64),
    ReplaceRange(i64, i64),
    DeleteLine(i64),
    Append,
    Insert(i64),
    Refactor,
    Cancel,
}

/// Malformed partial-edit or scope input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    MissingArgument(&'static str),
    BadIndex(String),
    BadRange(String),
    Unknown(String),
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingArgument(command) => write!(f, "`{command}` needs a line number"),
            Self::BadIndex(value) => write!(f, "bad index `{value}`"),
            Self::BadRange(value) => write!(f, "bad range `{value}`"),
            Self::Unknown(value) => write!(f, "unknown command `{value}`"),
        }
    }
}

impl Error for GrammarError {}

/// Parses `replace N`, `replace N-M`, `delete N`, `append`, `insert N`,
/// `llm-refactor`, `cancel`.
pub fn parse_part_edit(line: &str) -> Result<PartEdit, GrammarError> {
    let trimmed = line.trim();
    let (head, rest) = split_head(trimmed);
    match head {
        "replace" => match parse_position(rest, "replace")? {
            Position::Line(index) => Ok(PartEdit::ReplaceLine(index)),
            Position::Range(start, end) => Ok(PartEdit::ReplaceRange(start, end)),
        },
        "delete" => Ok(PartEdit::DeleteLine(parse_index(rest, "delete")?)),
        "insert" => Ok(PartEdit::Insert(parse_index(rest, "insert")?)),
        "append" if rest.is_empty() => Ok(PartEdit::Append),
        "llm-refactor" if rest.is_empty() => Ok(PartEdit::Refactor),
        "cancel" if rest.is_empty() => Ok(PartEdit::Cancel),
        _ => Err(GrammarError::Unknown(trimmed.to_string())),
    }
}

/// Parses `whole`, `lines N`, `lines N-M`.
pub fn parse_refactor_scope(line: &str) -> Result<RefactorScope, GrammarError> {
    let trimmed = line.trim();
    let (head, rest) = split_head(trimmed);
    match head {
        "whole" if rest.is_empty() => Ok(RefactorScope::Whole),
        "lines" | "line" => match parse_position(rest, "lines")? {
            Position::Line(index) => Ok(RefactorScope::Line(index)),
            Position::Range(start, end) => Ok(RefactorScope::Range(start, end)),
        },
        _ => Err(GrammarError::Unknown(trimmed.to_string())),
    }
}

enum Position {
    Line(i64),
    Range(i64, i64),
}

fn split_head(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    }
}

fn parse_position(text: &str, command: &'static str) -> Result<Position, GrammarError> {
    if text.is_empty() {
        return Err(GrammarError::MissingArgument(command));
    }
    if let Some(caps) = RANGE_RE.captures(text) {
        let start = caps[1].parse().map_err(|_| GrammarError::BadRange(text.to_string()))?;
        let end = caps[2].parse().map_err(|_| GrammarError::BadRange(text.to_string()))?;
        return Ok(Position::Range(start, end));
    }
    parse_index(text, command).map(Position::Line)
}

fn parse_index(text: &str, command: &'static str) -> Result<i64, GrammarError> {
    if text.is_empty() {
        return Err(GrammarError::MissingArgument(command));
    }
    if !INDEX_RE.is_match(text) {
        return Err(GrammarError::BadIndex(text.to_string()));
    }
    text.parse().map_err(|_| GrammarError::BadIndex(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{
        parse_command, parse_part_edit, parse_refactor_scope, Command, GrammarError, NoteCommand,
        PartEdit, TaskCommand, ASK_USAGE, NOTES_USAGE,
    };
    use taskpad_core::RefactorScope;

    #[test]
    fn top_level_commands_parse() {
        assert_eq!(parse_command("   "), Command::Empty);
        assert_eq!(parse_command("quit"), Command::Exit);
        assert_eq!(parse_command("help"), Command::Help);
        assert_eq!(
            parse_command("notes view 3"),
            Command::Notes(NoteCommand::View(Some("3".to_string())))
        );
        assert_eq!(parse_command("notes edit"), Command::Notes(NoteCommand::Edit(None)));
        assert_eq!(
            parse_command("tasks list all"),
            Command::Tasks(TaskCommand::List { all: true })
        );
        assert_eq!(
            parse_command("tasks list"),
            Command::Tasks(TaskCommand::List { all: false })
        );
        assert_eq!(
            parse_command("tasks done x"),
            Command::Tasks(TaskCommand::Done(Some("x".to_string())))
        );
        assert_eq!(parse_command("notes"), Command::Usage(NOTES_USAGE));
        assert_eq!(parse_command("dance"), Command::Unknown("dance".to_string()));
    }

    #[test]
    fn ask_keeps_question_text_verbatim() {
        assert_eq!(
            parse_command("ask  what is   2+2? "),
            Command::Ask("what is   2+2?".to_string())
        );
        assert_eq!(parse_command("ask"), Command::Usage(ASK_USAGE));
    }

    #[test]
    fn part_edit_grammar() {
        assert_eq!(parse_part_edit("replace 2"), Ok(PartEdit::ReplaceLine(2)));
        assert_eq!(parse_part_edit("replace 1-3"), Ok(PartEdit::ReplaceRange(1, 3)));
        assert_eq!(parse_part_edit("replace 1 - 3"), Ok(PartEdit::ReplaceRange(1, 3)));
        assert_eq!(parse_part_edit("delete 4"), Ok(PartEdit::DeleteLine(4)));
        assert_eq!(parse_part_edit("insert 0"), Ok(PartEdit::Insert(0)));
        assert_eq!(parse_part_edit("append"), Ok(PartEdit::Append));
        assert_eq!(parse_part_edit("llm-refactor"), Ok(PartEdit::Refactor));
        assert_eq!(parse_part_edit(" cancel "), Ok(PartEdit::Cancel));
    }

    #[test]
    fn part_edit_errors() {
        assert_eq!(
            parse_part_edit("replace"),
            Err(GrammarError::MissingArgument("replace"))
        );
        assert_eq!(
            parse_part_edit("delete two"),
            Err(GrammarError::BadIndex("two".to_string()))
        );
        assert!(matches!(parse_part_edit("replace a-b"), Err(GrammarError::BadIndex(_))));
        assert!(matches!(parse_part_edit("frobnicate"), Err(GrammarError::Unknown(_))));
    }

    #[test]
    fn refactor_scope_grammar() {
        assert_eq!(parse_refactor_scope("whole"), Ok(RefactorScope::Whole));
        assert_eq!(parse_refactor_scope("lines 2"), Ok(RefactorScope::Line(2)));
        assert_eq!(parse_refactor_scope("lines 2-5"), Ok(RefactorScope::Range(2, 5)));
        assert!(parse_refactor_scope("lines").is_err());
        assert!(parse_refactor_scope("everything").is_err());
    }
}
