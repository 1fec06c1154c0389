//! Web search panel entity.
//!
//! Aggregates the whole life of one search: status and query, pages the
//! agent opened, ranked results with snippets, and a terminal error. List
//! props arrive either as full replacements (`opened_urls`, `results`) or
//! as increments (`opened_urls.append`, `results.append`).

use ratatui::text::{Line, Span, Text};
use serde_json::Value;

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{get_array, get_str, Props};
use crate::ui::wrap::wrap_text;

use super::{marker_width, with_selection_marker};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchResult {
    fn from_value(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            title: field("title"),
            url: field("url"),
            snippet: field("snippet"),
        }
    }
}

pub struct WebSearchEntity {
    status: String,
    query: String,
    opened_urls: Vec<String>,
    results: Vec<SearchResult>,
    error: Option<String>,
}

impl WebSearchEntity {
    pub fn new(props: &Props) -> Self {
        let mut entity = Self {
            status: "in_progress".to_string(),
            query: String::new(),
            opened_urls: Vec::new(),
            results: Vec::new(),
            error: None,
        };
        entity.apply(props);
        entity
    }

    fn apply(&mut self, patch: &Props) {
        if let Some(status) = get_str(patch, "status") {
            self.status = status.to_string();
        }
        if let Some(query) = get_str(patch, "query") {
            self.query = query.to_string();
        }
        if let Some(error) = get_str(patch, "error") {
            self.error = Some(error.to_string());
        }

        if let Some(urls) = get_array(patch, "opened_urls") {
            self.opened_urls = urls
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }
        match patch.get("opened_urls.append") {
            Some(Value::String(url)) => self.opened_urls.push(url.clone()),
            Some(Value::Array(urls)) => self
                .opened_urls
                .extend(urls.iter().filter_map(Value::as_str).map(str::to_string)),
            _ => {}
        }

        if let Some(results) = get_array(patch, "results") {
            self.results = results.iter().map(SearchResult::from_value).collect();
        }
        match patch.get("results.append") {
            Some(Value::Array(results)) => self
                .results
                .extend(results.iter().map(SearchResult::from_value)),
            Some(value @ Value::Object(_)) => self.results.push(SearchResult::from_value(value)),
            _ => {}
        }
    }

    fn status_line(&self) -> String {
        format!("{} {}: {}", status_icon(&self.status), title_case(&self.status), self.query)
    }

    fn plain_content(&self) -> String {
        let mut out = vec![self.status_line()];
        if let Some(error) = &self.error {
            out.push(format!("Error: {error}"));
        }
        if !self.opened_urls.is_empty() {
            out.push("Opened:".to_string());
            for url in &self.opened_urls {
                out.push(format!("  {url}"));
            }
        }
        for result in &self.results {
            out.push(format!("{} ({})", result.title, result.url));
            if !result.snippet.is_empty() {
                out.push(format!("  {}", result.snippet));
            }
        }
        out.join("\n")
    }
}

fn status_icon(status: &str) -> &'static str {
    match status {
        "completed" => "✓",
        "failed" | "error" => "✗",
        "in_progress" | "searching" => "…",
        _ => "•",
    }
}

/// `in_progress` reads as `In Progress`.
fn title_case(status: &str) -> String {
    status
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl EntityModel for WebSearchEntity {
    fn update(&mut self, msg: EntityMsg) -> Option<EntityReply> {
        match msg {
            EntityMsg::PropsUpdated(patch) => {
                self.apply(&patch);
                None
            }
            EntityMsg::CopyText => Some(EntityReply::CopyText(self.plain_content())),
            EntityMsg::CopyCode => Some(EntityReply::CopyCode(self.plain_content())),
            _ => None,
        }
    }

    fn view(&self, ctx: &ViewContext) -> Text<'static> {
        let width = ctx.width.saturating_sub(marker_width(ctx));
        let status_style = if self.error.is_some() || self.status == "failed" {
            ctx.theme.error_text_style
        } else {
            ctx.theme.search_status_style
        };
        let mut lines = wrap_text(&self.status_line(), width, status_style);

        if let Some(error) = &self.error {
            lines.extend(wrap_text(
                &format!("Error: {error}"),
                width,
                ctx.theme.error_text_style,
            ));
        }

        if !self.opened_urls.is_empty() {
            lines.push(Line::from(Span::styled(
                "Opened:".to_string(),
                ctx.theme.metadata_style,
            )));
            for url in &self.opened_urls {
                lines.extend(wrap_text(
                    &format!("  {url}"),
                    width,
                    ctx.theme.search_url_style,
                ));
            }
        }

        for result in &self.results {
            let title_line = Line::from(vec![
                Span::styled(result.title.clone(), ctx.theme.text_style),
                Span::styled(format!(" ({})", result.url), ctx.theme.search_url_style),
            ]);
            lines.extend(crate::ui::wrap::wrap_line(&title_line, width));
            if !result.snippet.is_empty() {
                // Snippets wrap to the content width, indented under the title.
                let snippet_width = width.saturating_sub(2);
                for line in wrap_text(&result.snippet, snippet_width, ctx.theme.search_snippet_style)
                {
                    let mut spans = vec![Span::raw("  ")];
                    spans.extend(line.spans);
                    lines.push(Line::from(spans));
                }
            }
        }
        with_selection_marker(lines, ctx)
    }
}

pub struct WebSearchFactory;

impl EntityFactory for WebSearchFactory {
    fn key(&self) -> &'static str {
        "web_search"
    }

    fn kind(&self) -> &'static str {
        "web_search"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(WebSearchEntity::new(props))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&[
            "status",
            "query",
            "opened_urls",
            "opened_urls.append",
            "results",
            "results.append",
            "error",
        ])
    }
}
