//! Line-addressable note editor.
//!
//! # Responsibility
//! - Transform a note's line sequence by 1-based position or range.
//! - Splice rewrite-gateway output into a selected span.
//!
//! # Invariants
//! - Every operation is a pure function of (lines, arguments); persistence
//!   and timestamp bumping happen in the service layer, only on success.
//! - Failed operations never return a partially edited sequence.
//! - Bounds policy differs per operation: `replace_line` appends past the
//!   end, `insert_before` clamps, everything else rejects.

use crate::gateway::RewriteGateway;
use crate::model::lines::{expand_text, join_lines, split_lines};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod refactor;

pub use refactor::{
    refactor_selection, RefactorScope, LINE_INSTRUCTION, RANGE_INSTRUCTION, WHOLE_INSTRUCTION,
};

pub type EditResult = Result<Vec<String>, EditError>;

/// Editor failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Index or range violates the operation's bounds.
    OutOfRange {
        start: i64,
        end: i64,
        len: usize,
    },
    /// Rewrite gateway produced blank text; nothing to splice.
    EmptyRewrite,
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { start, end, len } if start == end => {
                write!(f, "line {start} is out of range (note has {len} lines)")
            }
            Self::OutOfRange { start, end, len } => {
                write!(f, "range {start}-{end} is out of range (note has {len} lines)")
            }
            Self::EmptyRewrite => write!(f, "rewrite returned no text"),
        }
    }
}

impl Error for EditError {}

/// One edit, as resolved by the command layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    ReplaceLine { index: i64, text: String },
    ReplaceRange { start: i64, end: i64, block: String },
    DeleteLine { index: i64 },
    Append { lines: Vec<String> },
    InsertBefore { index: i64, lines: Vec<String> },
    Refactor { scope: RefactorScope },
}

impl EditOp {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReplaceLine { .. } => "replace_line",
            Self::ReplaceRange { .. } => "replace_range",
            Self::DeleteLine { .. } => "delete_line",
            Self::Append { .. } => "append",
            Self::InsertBefore { .. } => "insert_before",
            Self::Refactor { .. } => "refactor",
        }
    }
}

/// Applies one edit. Only `Refactor` touches the gateway.
pub fn apply<G: RewriteGateway + ?Sized>(lines: &[String], op: &EditOp, gateway: &G) -> EditResult {
    match op {
        EditOp::ReplaceLine { index, text } => replace_line(lines, *index, text),
        EditOp::ReplaceRange { start, end, block } => replace_range(lines, *start, *end, block),
        EditOp::DeleteLine { index } => delete_line(lines, *index),
        EditOp::Append { lines: new_lines } => Ok(append(lines, new_lines)),
        EditOp::InsertBefore {
            index,
            lines: new_lines,
        } => Ok(insert_before(lines, *index, new_lines)),
        EditOp::Refactor { scope } => refactor_selection(lines, *scope, gateway),
    }
}

/// Overwrites line `index` with `text`.
///
/// `text` containing separators expands into several lines. An index past
/// the end appends `text` as trailing line(s) instead of failing.
pub fn replace_line(lines: &[String], index: i64, text: &str) -> EditResult {
    if index < 1 {
        return Err(out_of_range(index, index, lines));
    }
    let replacement = expand_text(text);
    let position = index as usize;
    if position > lines.len() {
        let mut out = lines.to_vec();
        out.extend(replacement);
        return Ok(out);
    }
    Ok(splice(lines, position - 1, position, replacement))
}

/// Replaces the span `[start, end]` with the lines of `block`.
///
/// An empty block deletes the span.
pub fn replace_range(lines: &[String], start: i64, end: i64, block: &str) -> EditResult {
    let (from, to) = checked_span(lines, start, end)?;
    Ok(splice(lines, from, to, split_lines(block)))
}

/// Removes exactly one line.
pub fn delete_line(lines: &[String], index: i64) -> EditResult {
    let (from, to) = checked_span(lines, index, index)?;
    Ok(splice(lines, from, to, Vec::new()))
}

/// Concatenates `new_lines` after `lines`. Never fails.
pub fn append<S: AsRef<str>>(lines: &[String], new_lines: &[S]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() + new_lines.len());
    out.extend_from_slice(lines);
    out.extend(new_lines.iter().map(|line| line.as_ref().to_string()));
    out
}

/// Inserts `new_lines` before position `index`, clamped into
/// `[1, len + 1]`.
pub fn insert_before<S: AsRef<str>>(lines: &[String], index: i64, new_lines: &[S]) -> Vec<String> {
    let upper = lines.len() as i64 + 1;
    let position = (index.clamp(1, upper) - 1) as usize;
    let inserted = new_lines.iter().map(|line| line.as_ref().to_string()).collect();
    splice(lines, position, position, inserted)
}

/// Joins a span into one text blob.
pub(crate) fn extract(lines: &[String], from: usize, to: usize) -> String {
    join_lines(&lines[from..to])
}

/// Validates `1 <= start <= end <= len` and returns the 0-based half-open
/// span.
pub fn checked_span(lines: &[String], start: i64, end: i64) -> Result<(usize, usize), EditError> {
    let len = lines.len() as i64;
    if start < 1 || start > end || end > len {
        return Err(out_of_range(start, end, lines));
    }
    Ok(((start - 1) as usize, end as usize))
}

pub(crate) fn splice(lines: &[String], from: usize, to: usize, replacement: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() - (to - from) + replacement.len());
    out.extend_from_slice(&lines[..from]);
    out.extend(replacement);
    out.extend_from_slice(&lines[to..]);
    out
}

fn out_of_range(start: i64, end: i64, lines: &[String]) -> EditError {
    EditError::OutOfRange {
        start,
        end,
        len: lines.len(),
    }
}
