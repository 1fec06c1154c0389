//! Markdown rendering for timeline entities.
//!
//! A single pass over pulldown-cmark events builds styled, pre-wrapped
//! lines. Inline styles nest through a style stack; block structure is
//! handled with list and quote state. Code blocks stay verbatim with
//! their fences so copied code matches what is on screen.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::theme::Theme;
use super::wrap::{display_width, wrap_line};

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options
}

/// Render markdown source into styled lines wrapped to `width`.
pub fn render_markdown(source: &str, theme: &Theme, width: u16) -> Vec<Line<'static>> {
    let mut renderer = Renderer::new(theme, width);
    for event in Parser::new_ext(source, parser_options()) {
        renderer.handle(event);
    }
    renderer.finish()
}

/// Collect the contents of every fenced or indented code block, in order.
pub fn extract_code_blocks(source: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;
    for event in Parser::new_ext(source, parser_options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => current = Some(String::new()),
            Event::End(TagEnd::CodeBlock) => {
                if let Some(mut block) = current.take() {
                    while block.ends_with('\n') {
                        block.pop();
                    }
                    blocks.push(block);
                }
            }
            Event::Text(text) => {
                if let Some(block) = current.as_mut() {
                    block.push_str(&text);
                }
            }
            _ => {}
        }
    }
    blocks
}

/// All code blocks joined by a blank line, or None when there are none.
pub fn code_blocks_joined(source: &str) -> Option<String> {
    let blocks = extract_code_blocks(source);
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}

struct Renderer<'t> {
    theme: &'t Theme,
    width: u16,
    lines: Vec<Line<'static>>,
    inline: Vec<Span<'static>>,
    styles: Vec<Style>,
    // Some(next ordinal) for ordered lists, None for bullets.
    lists: Vec<Option<u64>>,
    item_marker: Option<String>,
    quote_depth: usize,
    code: Option<CodeCapture>,
}

struct CodeCapture {
    lang: String,
    buffer: String,
}

impl<'t> Renderer<'t> {
    fn new(theme: &'t Theme, width: u16) -> Self {
        Self {
            theme,
            width,
            lines: Vec::new(),
            inline: Vec::new(),
            styles: vec![theme.text_style],
            lists: Vec::new(),
            item_marker: None,
            quote_depth: 0,
            code: None,
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.buffer.push_str(&text);
                } else {
                    self.push_inline(&text);
                }
            }
            Event::Code(text) => {
                let style = self.current_style().patch(self.theme.md_code_style);
                self.inline.push(Span::styled(text.to_string(), style));
            }
            Event::SoftBreak => self.push_inline(" "),
            Event::HardBreak => self.inline.push(Span::raw("\n")),
            Event::Rule => {
                self.start_block();
                let rule = "─".repeat(self.width.max(1) as usize);
                self.lines
                    .push(Line::from(Span::styled(rule, self.theme.metadata_style)));
            }
            Event::Html(text) | Event::InlineHtml(text) => self.push_inline(&text),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.start_block();
                }
            }
            Tag::Heading { .. } => {
                self.start_block();
                self.push_style(self.theme.md_heading_style);
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.quote_depth += 1;
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_inline();
                let marker = match self.lists.last_mut() {
                    Some(Some(ordinal)) => {
                        let text = format!("{ordinal}. ");
                        *ordinal += 1;
                        text
                    }
                    _ => "- ".to_string(),
                };
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                self.item_marker = Some(format!("{indent}{marker}"));
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeCapture {
                    lang,
                    buffer: String::new(),
                });
            }
            Tag::Emphasis => self.push_style(self.theme.md_emphasis_style),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { .. } | Tag::Image { .. } => {
                self.push_modifier(Modifier::UNDERLINED);
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.flush_inline(),
            TagEnd::Heading(_) => {
                self.flush_inline();
                self.pop_style();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_inline();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::List(_) => {
                self.flush_inline();
                self.lists.pop();
            }
            TagEnd::Item => self.flush_inline(),
            TagEnd::CodeBlock => self.flush_code_block(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link | TagEnd::Image => self.pop_style(),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_inline();
        if self.lines.is_empty() {
            self.lines.push(Line::from(""));
        }
        self.lines
    }

    fn current_style(&self) -> Style {
        *self.styles.last().unwrap_or(&Style::default())
    }

    fn push_style(&mut self, patch: Style) {
        self.styles.push(self.current_style().patch(patch));
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn push_inline(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let style = self.current_style();
        if let Some(last) = self.inline.last_mut() {
            if last.style == style {
                let mut combined = String::with_capacity(last.content.len() + text.len());
                combined.push_str(&last.content);
                combined.push_str(text);
                *last = Span::styled(combined, style);
                return;
            }
        }
        self.inline.push(Span::styled(text.to_string(), style));
    }

    /// Blank separator before a new top-level block.
    fn start_block(&mut self) {
        self.flush_inline();
        if let Some(last) = self.lines.last() {
            let blank = last.spans.iter().all(|s| s.content.is_empty());
            if !blank {
                self.lines.push(Line::from(""));
            }
        }
    }

    fn flush_inline(&mut self) {
        if self.inline.is_empty() {
            self.item_marker = None;
            return;
        }
        let spans = std::mem::take(&mut self.inline);
        let quote_prefix = "> ".repeat(self.quote_depth);
        let marker = self.item_marker.take().unwrap_or_default();
        let hang = " ".repeat(display_width(&marker));

        let prefix_width = (display_width(&quote_prefix) + display_width(&marker)) as u16;
        let inner_width = self.width.saturating_sub(prefix_width);

        for segment in split_on_newlines(spans) {
            let wrapped = wrap_line(&Line::from(segment), inner_width);
            for (i, line) in wrapped.into_iter().enumerate() {
                let lead = if i == 0 {
                    format!("{quote_prefix}{marker}")
                } else {
                    format!("{quote_prefix}{hang}")
                };
                if lead.is_empty() {
                    self.lines.push(line);
                } else {
                    let mut spans = vec![Span::styled(lead, self.theme.metadata_style)];
                    spans.extend(line.spans);
                    self.lines.push(Line::from(spans));
                }
            }
        }
    }

    fn flush_code_block(&mut self) {
        let Some(code) = self.code.take() else {
            return;
        };
        let style = self.theme.code_block_style;
        self.lines
            .push(Line::from(Span::styled(format!("```{}", code.lang), style)));
        let body = code.buffer.strip_suffix('\n').unwrap_or(&code.buffer);
        for code_line in body.split('\n') {
            self.lines
                .push(Line::from(Span::styled(code_line.to_string(), style)));
        }
        self.lines.push(Line::from(Span::styled("```", style)));
    }
}

fn split_on_newlines(spans: Vec<Span<'static>>) -> Vec<Vec<Span<'static>>> {
    let mut segments = vec![Vec::new()];
    for span in spans {
        if !span.content.contains('\n') {
            if let Some(seg) = segments.last_mut() {
                seg.push(span);
            }
            continue;
        }
        let style = span.style;
        let mut parts = span.content.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                if let Some(seg) = segments.last_mut() {
                    seg.push(Span::styled(part.to_string(), style));
                }
            }
            if parts.peek().is_some() {
                segments.push(Vec::new());
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line]) -> Vec<String> {
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
    fn headings_take_the_heading_style() {
        let theme = Theme::dark_default();
        let lines = render_markdown("# Title", &theme, 40);
        assert_eq!(plain(&lines), vec!["Title"]);
        assert_eq!(
            lines[0].spans[0].style,
            theme.text_style.patch(theme.md_heading_style)
        );
    }

    #[test]
    fn paragraphs_are_separated_by_a_blank_line() {
        let theme = Theme::dark_default();
        let lines = render_markdown("one\n\ntwo", &theme, 40);
        assert_eq!(plain(&lines), vec!["one", "", "two"]);
    }

    #[test]
    fn code_blocks_keep_fences_and_verbatim_lines() {
        let theme = Theme::dark_default();
        let source = "```rust\nfn main() {}\n```";
        let lines = render_markdown(source, &theme, 40);
        assert_eq!(plain(&lines), vec!["```rust", "fn main() {}", "```"]);
        assert_eq!(lines[1].spans[0].style, theme.code_block_style);
    }

    #[test]
    fn list_items_get_markers_and_hanging_indent() {
        let theme = Theme::dark_default();
        let lines = render_markdown("- alpha beta gamma delta", &theme, 12);
        let rendered = plain(&lines);
        assert_eq!(rendered[0], "- alpha beta");
        assert_eq!(rendered[1], "  gamma ");
        assert_eq!(rendered[2], "  delta");
    }

    #[test]
    fn ordered_lists_count_upward() {
        let theme = Theme::dark_default();
        let lines = render_markdown("1. one\n2. two", &theme, 40);
        let rendered = plain(&lines);
        assert_eq!(rendered[0], "1. one");
        assert_eq!(rendered[1], "2. two");
    }

    #[test]
    fn emphasis_nests_inside_strong() {
        let theme = Theme::dark_default();
        let lines = render_markdown("**bold *both***", &theme, 40);
        let spans = &lines[0].spans;
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
        let last = spans.last().expect("spans");
        assert!(last.style.add_modifier.contains(Modifier::BOLD));
        assert!(last.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn extracts_every_code_block() {
        let source = "pre\n\n```\nfirst\n```\n\nmid\n\n```py\nsecond\n```\n";
        let blocks = extract_code_blocks(source);
        assert_eq!(blocks, vec!["first".to_string(), "second".to_string()]);
        assert_eq!(
            code_blocks_joined(source).as_deref(),
            Some("first\n\nsecond")
        );
        assert_eq!(code_blocks_joined("no code here"), None);
    }

    #[test]
    fn blockquotes_carry_their_prefix() {
        let theme = Theme::dark_default();
        let lines = render_markdown("> quoted", &theme, 40);
        assert_eq!(plain(&lines), vec!["> quoted"]);
    }
}
