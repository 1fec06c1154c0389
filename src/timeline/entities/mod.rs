//! Built-in entity models.
//!
//! Each submodule pairs a model (the state machine) with a factory (the
//! registry entry). Models fold patches into typed state through the
//! getters in [`crate::timeline::props`], so malformed values degrade to
//! keeping the previous state instead of erroring.
//!
//! Registered kinds: `plain`, `text`, `llm_text`, `markdown`,
//! `structured_data`, `tool_call`, `tool_call_result`, `tool_calls_panel`,
//! `log_event`, `structured_log_event`, `web_search`, `agent_mode`.

pub mod agent_mode;
pub mod llm_text;
pub mod log_event;
pub mod markdown;
pub mod plain;
pub mod structured;
pub mod structured_log;
pub mod text;
pub mod tool_call;
pub mod tool_panel;
pub mod tool_result;
pub mod web_search;

use std::sync::Arc;

use ratatui::text::{Line, Span, Text};

use super::model::{EntityFactory, ViewContext};

/// Every built-in factory, in registration order.
pub fn builtin_factories() -> Vec<Arc<dyn EntityFactory>> {
    vec![
        Arc::new(plain::PlainFactory),
        Arc::new(text::TextFactory),
        Arc::new(llm_text::LlmTextFactory),
        Arc::new(markdown::MarkdownFactory::default()),
        Arc::new(structured::StructuredDataFactory),
        Arc::new(tool_call::ToolCallFactory),
        Arc::new(tool_result::ToolResultFactory),
        Arc::new(tool_panel::ToolCallsPanelFactory),
        Arc::new(log_event::LogEventFactory::default()),
        Arc::new(structured_log::StructuredLogFactory::default()),
        Arc::new(web_search::WebSearchFactory),
        Arc::new(agent_mode::AgentModeFactory),
    ]
}

/// Columns the selection marker occupies when present.
pub(crate) fn marker_width(ctx: &ViewContext) -> u16 {
    if ctx.selected {
        2
    } else {
        0
    }
}

/// Prefix every line with the selection marker when the entity is
/// selected. Content should already be wrapped to `ctx.width` minus
/// [`marker_width`].
pub(crate) fn with_selection_marker(lines: Vec<Line<'static>>, ctx: &ViewContext) -> Text<'static> {
    if !ctx.selected {
        return Text::from(lines);
    }
    let marked = lines
        .into_iter()
        .map(|line| {
            let mut spans = vec![Span::styled("▌ ", ctx.theme.selected_marker_style)];
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect::<Vec<_>>();
    Text::from(marked)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_keys_are_unique() {
        let factories = builtin_factories();
        let keys: HashSet<&str> = factories.iter().map(|f| f.key()).collect();
        assert_eq!(keys.len(), factories.len());
    }

    #[test]
    fn builtin_set_covers_every_documented_kind() {
        let kinds: HashSet<&str> = builtin_factories().iter().map(|f| f.kind()).collect();
        for kind in [
            "plain",
            "text",
            "llm_text",
            "markdown",
            "structured_data",
            "tool_call",
            "tool_call_result",
            "tool_calls_panel",
            "log_event",
            "structured_log_event",
            "web_search",
            "agent_mode",
        ] {
            assert!(kinds.contains(kind), "missing builtin kind {kind}");
        }
    }
}
