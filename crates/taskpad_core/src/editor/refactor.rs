//! Gateway-assisted rewrite of a note selection.

use super::{checked_span, extract, splice, EditError, EditResult};
use crate::gateway::RewriteGateway;
use crate::model::lines::split_lines;
use log::debug;

pub const WHOLE_INSTRUCTION: &str = "You are an assistant that rewrites notes to be clear and concise. \
Refactor or improve the note content you are given. Provide the improved version only.";
pub const RANGE_INSTRUCTION: &str = "You are an assistant that rewrites snippets for clarity. \
Refactor or improve the given selection of a note for clarity and conciseness. \
Return only the improved selection.";
pub const LINE_INSTRUCTION: &str = "Refactor the given line for clarity and conciseness. \
Return only the improved line.";

/// Portion of a note sent for rewriting (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefactorScope {
    Whole,
    Range(i64, i64),
    Line(i64),
}

impl RefactorScope {
    fn instruction(self) -> &'static str {
        match self {
            Self::Whole => WHOLE_INSTRUCTION,
            Self::Range(..) => RANGE_INSTRUCTION,
            Self::Line(_) => LINE_INSTRUCTION,
        }
    }

    fn span(self, lines: &[String]) -> Result<(usize, usize), EditError> {
        match self {
            Self::Whole => Ok((0, lines.len())),
            Self::Range(start, end) => checked_span(lines, start, end),
            Self::Line(index) => checked_span(lines, index, index),
        }
    }
}

/// Rewrites the span selected by `scope` through `gateway`.
///
/// The response replaces exactly the extracted span. A `Line` scope keeps
/// only the first response line. The fallback sentinel is spliced like any
/// other text.
///
/// # Errors
/// - `OutOfRange` when the scope's bounds are invalid; the gateway is not
///   called in that case.
/// - `EmptyRewrite` when the gateway answers with blank text.
pub fn refactor_selection<G: RewriteGateway + ?Sized>(
    lines: &[String],
    scope: RefactorScope,
    gateway: &G,
) -> EditResult {
    let (from, to) = scope.span(lines)?;
    let selection = extract(lines, from, to);
    let response = gateway.rewrite(&selection, Some(scope.instruction()));
    if response.trim().is_empty() {
        return Err(EditError::EmptyRewrite);
    }

    let mut replacement = split_lines(&response);
    if let RefactorScope::Line(_) = scope {
        replacement.truncate(1);
    }
    debug!(
        "event=refactor_splice module=editor status=ok span_lines={} replacement_lines={}",
        to - from,
        replacement.len()
    );
    Ok(splice(lines, from, to, replacement))
}

#[cfg(test)]
mod tests {
    use super::{refactor_selection, RefactorScope, LINE_INSTRUCTION, WHOLE_INSTRUCTION};
    use crate::editor::EditError;
    use crate::gateway::{RewriteGateway, StaticGateway, FALLBACK_SENTINEL};
    use std::cell::RefCell;

    struct RecordingGateway {
        reply: String,
        calls: RefCell<Vec<(String, Option<String>)>>,
    }

    impl RecordingGateway {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl RewriteGateway for RecordingGateway {
        fn rewrite(&self, prompt: &str, instruction: Option<&str>) -> String {
            self.calls
                .borrow_mut()
                .push((prompt.to_string(), instruction.map(str::to_string)));
            self.reply.clone()
        }
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn whole_scope_replaces_everything_and_sends_joined_blob() {
        let gateway = RecordingGateway::new("short\nversion");
        let edited =
            refactor_selection(&lines(&["a", "b", "c"]), RefactorScope::Whole, &gateway).unwrap();
        assert_eq!(edited, lines(&["short", "version"]));

        let calls = gateway.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "a\nb\nc");
        assert_eq!(calls[0].1.as_deref(), Some(WHOLE_INSTRUCTION));
    }

    #[test]
    fn range_scope_replaces_only_extracted_span() {
        let gateway = RecordingGateway::new("X\nY\nZ");
        let edited = refactor_selection(
            &lines(&["a", "b", "c", "d"]),
            RefactorScope::Range(2, 3),
            &gateway,
        )
        .unwrap();
        assert_eq!(edited, lines(&["a", "X", "Y", "Z", "d"]));
        assert_eq!(gateway.calls.borrow()[0].0, "b\nc");
    }

    #[test]
    fn line_scope_keeps_first_response_line_only() {
        let gateway = RecordingGateway::new("first\nsecond\nthird");
        let edited =
            refactor_selection(&lines(&["a", "b", "c"]), RefactorScope::Line(2), &gateway).unwrap();
        assert_eq!(edited, lines(&["a", "first", "c"]));
        assert_eq!(gateway.calls.borrow()[0].1.as_deref(), Some(LINE_INSTRUCTION));
    }

    #[test]
    fn sentinel_is_spliced_verbatim() {
        let gateway = StaticGateway::unavailable();
        let edited =
            refactor_selection(&lines(&["a", "b"]), RefactorScope::Line(1), &gateway).unwrap();
        assert_eq!(edited, vec![FALLBACK_SENTINEL.to_string(), "b".to_string()]);
    }

    #[test]
    fn out_of_range_scope_does_not_call_gateway() {
        let gateway = RecordingGateway::new("x");
        let err = refactor_selection(&lines(&["a"]), RefactorScope::Range(1, 3), &gateway)
            .unwrap_err();
        assert!(matches!(err, EditError::OutOfRange { .. }));
        assert!(refactor_selection(&lines(&["a"]), RefactorScope::Line(0), &gateway).is_err());
        assert!(gateway.calls.borrow().is_empty());
    }

    #[test]
    fn blank_response_is_reported() {
        let gateway = RecordingGateway::new("  \n ");
        let err =
            refactor_selection(&lines(&["a"]), RefactorScope::Whole, &gateway).unwrap_err();
        assert_eq!(err, EditError::EmptyRewrite);
    }
}
