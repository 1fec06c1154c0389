//! Flattening styled output back into plain text.
//!
//! Copy requests return what the user sees, minus styling. These helpers
//! are the single place where styled lines turn back into strings, so
//! clipboard content and rendered content cannot drift apart.

use ratatui::text::{Line, Text};

pub fn line_to_string(line: &Line) -> String {
    line.spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect()
}

/// Join rendered lines with single newlines.
pub fn lines_to_string(lines: &[Line]) -> String {
    lines
        .iter()
        .map(line_to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn text_to_string(text: &Text) -> String {
    lines_to_string(&text.lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Style};
    use ratatui::text::Span;

    #[test]
    fn flattening_drops_styles_but_keeps_content() {
        let line = Line::from(vec![
            Span::styled("a", Style::default().fg(Color::Red)),
            Span::raw("b"),
        ]);
        assert_eq!(line_to_string(&line), "ab");
    }

    #[test]
    fn lines_join_with_single_newlines() {
        let lines = vec![Line::from("one"), Line::from(""), Line::from("two")];
        assert_eq!(lines_to_string(&lines), "one\n\ntwo");
    }
}
