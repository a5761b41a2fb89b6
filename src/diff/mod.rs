//! Textual change summaries between two document renditions
//!
//! Texts are compared line by line. The edit script is reduced to the lines
//! removed from the previous version and the lines added in the current one;
//! no pairing between them is attempted beyond the diff's own matching.

mod html;

pub use html::generate_html_diff;

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// Default number of removed/added lines listed in a report
pub const SUMMARY_LIMIT: usize = 10;

/// Report line used when both texts have the same significant lines
pub const NO_CHANGES: &str = "No significant textual changes detected.";

/// Marker appended when a list is longer than the limit
pub const TRUNCATION_MARKER: &str = "   - ...";

/// Lines removed and added between two texts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    /// Lines only in the previous text, in order
    pub removed: Vec<String>,
    /// Lines only in the current text, in order
    pub added: Vec<String>,
}

impl ChangeSummary {
    /// Compare the non-empty, trimmed lines of two texts
    pub fn compute(previous: &str, current: &str) -> Self {
        let old_lines = significant_lines(previous);
        let new_lines = significant_lines(current);

        let diff = TextDiff::from_slices(&old_lines, &new_lines);
        let mut summary = Self::default();

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Delete => summary.removed.push(change.value().to_string()),
                ChangeTag::Insert => summary.added.push(change.value().to_string()),
                ChangeTag::Equal => {}
            }
        }

        summary
    }

    /// Whether no significant line changed
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }

    /// Human-readable report listing at most `limit` lines per side
    pub fn report(&self, limit: usize) -> Vec<String> {
        if self.is_unchanged() {
            return vec![NO_CHANGES.to_string()];
        }

        let mut lines = Vec::new();

        if !self.removed.is_empty() {
            lines.push(format!(
                "{} lines removed/changed (previous version):",
                self.removed.len()
            ));
            push_bounded(&mut lines, &self.removed, limit);
        }

        if !self.added.is_empty() {
            lines.push(format!(
                "{} lines added/new (current version):",
                self.added.len()
            ));
            push_bounded(&mut lines, &self.added, limit);
        }

        lines
    }
}

/// Bounded change report between two texts
pub fn summarize_changes(previous: &str, current: &str) -> Vec<String> {
    ChangeSummary::compute(previous, current).report(SUMMARY_LIMIT)
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split text into lines on every line boundary found in extracted text.
///
/// Besides `\n` this breaks on a lone `\r`, form and vertical tabs, the
/// separator controls and the Unicode line and paragraph separators. `\r\n`
/// counts as one break and a trailing break adds no empty line.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn significant_lines(text: &str) -> Vec<&str> {
    split_lines(text)
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn push_bounded(out: &mut Vec<String>, items: &[String], limit: usize) {
    for item in items.iter().take(limit) {
        out.push(format!("   - {}", item));
    }
    if items.len() > limit {
        out.push(TRUNCATION_MARKER.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts() {
        let text = "PLANO ESTRUCTURAL\nEscala 1:100\n";
        assert_eq!(summarize_changes(text, text), vec![NO_CHANGES.to_string()]);
    }

    #[test]
    fn test_whitespace_only_differences_ignored() {
        let a = "uno\n\n  dos  \n";
        let b = "  uno\ndos\n\n\n";
        assert!(ChangeSummary::compute(a, b).is_unchanged());
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b"]);
        assert_eq!(split_lines("hoja 1\x0choja 2"), vec!["hoja 1", "hoja 2"]);
        assert_eq!(split_lines("x\u{2028}y\u{85}z"), vec!["x", "y", "z"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_line_endings_do_not_count_as_changes() {
        assert!(ChangeSummary::compute("a\rb", "a\nb").is_unchanged());
        assert!(ChangeSummary::compute("a\r\nb\r\n", "a\nb").is_unchanged());
        assert!(ChangeSummary::compute("pagina 1\x0cpagina 2", "pagina 1\npagina 2").is_unchanged());
    }

    #[test]
    fn test_single_line_replaced() {
        let summary = ChangeSummary::compute("a\nb\nc", "a\nx\nc");
        assert_eq!(summary.removed, vec!["b"]);
        assert_eq!(summary.added, vec!["x"]);

        let report = summary.report(SUMMARY_LIMIT);
        assert_eq!(
            report,
            vec![
                "1 lines removed/changed (previous version):",
                "   - b",
                "1 lines added/new (current version):",
                "   - x",
            ]
        );
    }

    #[test]
    fn test_truncation() {
        let previous: String = (1..=15).map(|i| format!("linea {}\n", i)).collect();
        let report = summarize_changes(&previous, "");

        assert_eq!(report.len(), 12);
        assert_eq!(report[0], "15 lines removed/changed (previous version):");
        let listed = report.iter().filter(|l| l.starts_with("   - linea")).count();
        assert_eq!(listed, 10);
        assert_eq!(report.last().map(String::as_str), Some(TRUNCATION_MARKER));
    }

    #[test]
    fn test_only_additions() {
        let report = summarize_changes("a", "a\nb");
        assert_eq!(
            report,
            vec!["1 lines added/new (current version):", "   - b"]
        );
    }

    #[test]
    fn test_custom_limit() {
        let summary = ChangeSummary::compute("", "a\nb\nc");
        assert_eq!(summary.report(2).len(), 4);
    }
}
