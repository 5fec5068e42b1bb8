//! Line codec between stored note text and editable line sequences.
//!
//! # Invariants
//! - No returned line contains `\n`; a trailing `\r` is stripped.
//! - `split_lines(join_lines(x)) == x` for every `x` that is not exactly
//!   one empty line (that sequence and the empty sequence share one
//!   encoding and both decode to zero lines).

/// Splits stored content into lines. Empty content has zero lines.
pub fn split_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    content.split('\n').map(strip_cr).collect()
}

/// Splits a single piece of replacement text. Always yields at least one
/// line, so an empty replacement keeps the line as an empty line.
pub fn expand_text(text: &str) -> Vec<String> {
    text.split('\n').map(strip_cr).collect()
}

/// Joins lines back into stored content.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

fn strip_cr(line: &str) -> String {
    line.strip_suffix('\r').unwrap_or(line).to_string()
}

#[cfg(test)]
mod tests {
    use super::{expand_text, join_lines, split_lines};

    #[test]
    fn empty_content_has_no_lines() {
        assert!(split_lines("").is_empty());
        assert_eq!(join_lines::<String>(&[]), "");
    }

    #[test]
    fn join_then_split_preserves_blank_and_trailing_lines() {
        let lines = vec!["a".to_string(), String::new(), "b".to_string(), String::new()];
        assert_eq!(split_lines(&join_lines(&lines)), lines);
    }

    #[test]
    fn crlf_is_tolerated() {
        assert_eq!(split_lines("a\r\nb"), vec!["a", "b"]);
    }

    #[test]
    fn expand_text_never_returns_empty() {
        assert_eq!(expand_text(""), vec![""]);
        assert_eq!(expand_text("x\ny"), vec!["x", "y"]);
    }
}
