//! Side-by-side HTML rendering of a line diff

use super::split_lines;
use similar::{DiffTag, TextDiff};
use std::fmt::Write;

const PREVIOUS_LABEL: &str = "Previous Version";
const CURRENT_LABEL: &str = "Current Version";

const STYLE: &str = r#"
    table.diff { font-family: Courier, monospace; border-collapse: collapse; border: medium; }
    .diff_header { background-color: #e0e0e0; }
    td.diff_header { text-align: right; padding: 0 4px; }
    .diff_next { background-color: #c0c0c0; }
    .diff_add { background-color: #aaffaa; }
    .diff_chg { background-color: #ffff77; }
    .diff_sub { background-color: #ffaaaa; }
    td { white-space: pre-wrap; vertical-align: top; }
"#;

/// Render a complete HTML document comparing two texts line by line
pub fn generate_html_diff(previous: &str, current: &str) -> String {
    let old_lines = split_lines(previous);
    let new_lines = split_lines(current);
    let diff = TextDiff::from_slices(&old_lines, &new_lines);

    let mut rows = String::new();
    for op in diff.ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                for (o, n) in old_range.zip(new_range) {
                    push_row(&mut rows, Some((o, old_lines[o])), Some((n, new_lines[n])), "");
                }
            }
            DiffTag::Delete => {
                for o in old_range {
                    push_row(&mut rows, Some((o, old_lines[o])), None, "diff_sub");
                }
            }
            DiffTag::Insert => {
                for n in new_range {
                    push_row(&mut rows, None, Some((n, new_lines[n])), "diff_add");
                }
            }
            DiffTag::Replace => {
                let old: Vec<usize> = old_range.collect();
                let new: Vec<usize> = new_range.collect();
                for i in 0..old.len().max(new.len()) {
                    let left = old.get(i).map(|&o| (o, old_lines[o]));
                    let right = new.get(i).map(|&n| (n, new_lines[n]));
                    let class = match (left, right) {
                        (Some(_), Some(_)) => "diff_chg",
                        (Some(_), None) => "diff_sub",
                        _ => "diff_add",
                    };
                    push_row(&mut rows, left, right, class);
                }
            }
        }
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
            "<title>{previous} / {current}</title>\n<style>{style}</style>\n</head>\n<body>\n",
            "<table class=\"diff\">\n",
            "<thead><tr><th class=\"diff_next\"></th><th class=\"diff_header\">{previous}</th>",
            "<th class=\"diff_next\"></th><th class=\"diff_header\">{current}</th></tr></thead>\n",
            "<tbody>\n{rows}</tbody>\n</table>\n",
            "<table class=\"diff\" summary=\"Legends\"><tr>",
            "<td class=\"diff_add\">Added</td><td class=\"diff_chg\">Changed</td>",
            "<td class=\"diff_sub\">Deleted</td></tr></table>\n",
            "</body>\n</html>\n"
        ),
        previous = PREVIOUS_LABEL,
        current = CURRENT_LABEL,
        style = STYLE,
        rows = rows,
    )
}

fn push_row(out: &mut String, left: Option<(usize, &str)>, right: Option<(usize, &str)>, class: &str) {
    out.push_str("<tr>");
    push_cells(out, left, class);
    push_cells(out, right, class);
    out.push_str("</tr>\n");
}

fn push_cells(out: &mut String, side: Option<(usize, &str)>, class: &str) {
    match side {
        Some((index, text)) => {
            let _ = write!(
                out,
                "<td class=\"diff_header\">{}</td><td class=\"{}\">{}</td>",
                index + 1,
                class,
                escape_html(text)
            );
        }
        None => out.push_str("<td class=\"diff_header\"></td><td></td>"),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_structure() {
        let html = generate_html_diff("a\nb", "a\nc");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Previous Version"));
        assert!(html.contains("Current Version"));
        assert!(html.contains("diff_chg"));
    }

    #[test]
    fn test_insert_and_delete_rows() {
        let html = generate_html_diff("a\nb", "a\nb\nc");
        assert!(html.contains("<td class=\"diff_add\">c</td>"));

        let html = generate_html_diff("a\nb\nc", "a\nc");
        assert!(html.contains("<td class=\"diff_sub\">b</td>"));
    }

    #[test]
    fn test_carriage_returns_split_rows() {
        let html = generate_html_diff("a\rb", "a\nb");
        assert!(html.contains("<td class=\"\">a</td><td class=\"diff_header\">1</td>"));
        assert!(html.contains("<td class=\"\">b</td></tr>"));
        assert!(!html.contains("<td class=\"diff_chg\">a"));
    }

    #[test]
    fn test_content_is_escaped() {
        let html = generate_html_diff("<b>x</b>", "a & b");
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<b>x</b>"));
    }

    #[test]
    fn test_empty_texts() {
        let html = generate_html_diff("", "");
        assert!(html.contains("<tbody>\n</tbody>"));
    }
}
