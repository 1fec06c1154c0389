//! Width-aware pre-wrapping for entity content.
//!
//! Entity views wrap their own lines instead of relying on the paragraph
//! widget, so the heights reported to the shell always match what the
//! terminal shows. Wrapping happens at word boundaries, long tokens are
//! chunked by display width, and span styles survive the wrap.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Sum of the display columns the string occupies.
pub fn display_width(text: &str) -> usize {
    text.chars().filter_map(UnicodeWidthChar::width).sum()
}

/// Wrap a plain string into styled lines of at most `width` columns.
pub fn wrap_text(text: &str, width: u16, style: Style) -> Vec<Line<'static>> {
    let source: Vec<Line> = text
        .split('\n')
        .map(|part| Line::from(Span::styled(part.to_string(), style)))
        .collect();
    wrap_lines(&source, width)
}

/// Wrap already-styled lines to `width` columns.
pub fn wrap_lines(lines: &[Line], width: u16) -> Vec<Line<'static>> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        out.extend(wrap_line(line, width));
    }
    out
}

pub fn wrap_line(line: &Line, width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    if width == 0 {
        return vec![own_line(line)];
    }
    if line.spans.is_empty() {
        return vec![Line::from("")];
    }

    let mut out: Vec<Line<'static>> = Vec::new();
    let mut cur: Vec<Span<'static>> = Vec::new();
    let mut cur_len = 0usize;

    // The word in flight, as styled segments.
    let mut word: Vec<(String, Style)> = Vec::new();
    let mut word_len = 0usize;

    let flush_word = |cur: &mut Vec<Span<'static>>,
                      cur_len: &mut usize,
                      word: &mut Vec<(String, Style)>,
                      word_len: &mut usize,
                      out: &mut Vec<Line<'static>>| {
        if *word_len == 0 {
            return;
        }
        if *cur_len > 0 && *cur_len + *word_len > width {
            out.push(Line::from(std::mem::take(cur)));
            *cur_len = 0;
        }
        for (text, style) in word.drain(..) {
            for ch in text.chars() {
                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                if *cur_len + ch_width > width && *cur_len > 0 {
                    out.push(Line::from(std::mem::take(cur)));
                    *cur_len = 0;
                }
                append_run(cur, style, ch);
                *cur_len += ch_width;
            }
        }
        *word_len = 0;
    };

    for span in &line.spans {
        for ch in span.content.chars() {
            if ch == ' ' {
                flush_word(&mut cur, &mut cur_len, &mut word, &mut word_len, &mut out);
                if cur_len + 1 <= width {
                    append_run(&mut cur, span.style, ' ');
                    cur_len += 1;
                } else {
                    // The space becomes the break point.
                    out.push(Line::from(std::mem::take(&mut cur)));
                    cur_len = 0;
                }
            } else {
                match word.last_mut() {
                    Some((text, style)) if *style == span.style => text.push(ch),
                    _ => word.push((ch.to_string(), span.style)),
                }
                word_len += UnicodeWidthChar::width(ch).unwrap_or(0);
            }
        }
    }
    flush_word(&mut cur, &mut cur_len, &mut word, &mut word_len, &mut out);

    if !cur.is_empty() || out.is_empty() {
        out.push(Line::from(cur));
    }
    out
}

fn append_run(collector: &mut Vec<Span<'static>>, style: Style, ch: char) {
    if let Some(last) = collector.last_mut() {
        if last.style == style {
            let mut combined = String::with_capacity(last.content.len() + ch.len_utf8());
            combined.push_str(&last.content);
            combined.push(ch);
            *last = Span::styled(combined, style);
            return;
        }
    }
    collector.push(Span::styled(ch.to_string(), style));
}

fn own_line(line: &Line) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans
        .iter()
        .map(|s| Span::styled(s.content.to_string(), s.style))
        .collect();
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn rendered(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap_text("the quick brown fox", 10, Style::default());
        assert_eq!(rendered(&lines), vec!["the quick ", "brown fox"]);
    }

    #[test]
    fn chunks_tokens_longer_than_width() {
        let lines = wrap_text("abcdefghij", 4, Style::default());
        assert_eq!(rendered(&lines), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn keeps_span_styles_across_the_wrap() {
        let red = Style::default().fg(Color::Red);
        let blue = Style::default().fg(Color::Blue);
        let line = Line::from(vec![
            Span::styled("alpha ", red),
            Span::styled("betagamma", blue),
        ]);
        let wrapped = wrap_line(&line, 8);
        assert_eq!(rendered(&wrapped), vec!["alpha ", "betagamm", "a"]);
        assert_eq!(wrapped[0].spans[0].style, red);
        assert_eq!(wrapped[1].spans[0].style, blue);
        assert_eq!(wrapped[2].spans[0].style, blue);
    }

    #[test]
    fn counts_wide_characters_by_display_width() {
        assert_eq!(display_width("你好"), 4);
        let lines = wrap_text("你好你好", 4, Style::default());
        assert_eq!(rendered(&lines), vec!["你好", "你好"]);
    }

    #[test]
    fn empty_input_is_one_blank_line() {
        let lines = wrap_text("", 10, Style::default());
        assert_eq!(rendered(&lines), vec![""]);
    }

    #[test]
    fn zero_width_passes_lines_through() {
        let lines = wrap_text("unchanged text", 0, Style::default());
        assert_eq!(rendered(&lines), vec!["unchanged text"]);
    }
}
