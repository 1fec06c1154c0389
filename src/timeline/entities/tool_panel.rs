//! Tool calls panel: a summary over an array of calls.

use ratatui::text::{Line, Span, Text};
use serde_json::Value;

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{get_array, get_str, Props};
use crate::ui::wrap::wrap_text;

use super::{marker_width, with_selection_marker};

pub struct ToolCallsPanelEntity {
    calls: Vec<Value>,
    summary: Option<String>,
}

impl ToolCallsPanelEntity {
    pub fn new(props: &Props) -> Self {
        let mut entity = Self {
            calls: Vec::new(),
            summary: None,
        };
        entity.apply(props);
        entity
    }

    fn apply(&mut self, patch: &Props) {
        if let Some(calls) = get_array(patch, "calls") {
            self.calls = calls.clone();
        }
        if let Some(summary) = get_str(patch, "summary") {
            self.summary = Some(summary.to_string());
        }
    }

    fn call_label(call: &Value, index: usize) -> String {
        match call.get("name").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => format!("call #{}", index + 1),
        }
    }

    fn plain_content(&self) -> String {
        let mut out = vec![format!("Tool calls ({})", self.calls.len())];
        for (index, call) in self.calls.iter().enumerate() {
            out.push(format!("- {}", Self::call_label(call, index)));
        }
        if let Some(summary) = &self.summary {
            out.push(summary.clone());
        }
        out.join("\n")
    }
}

impl EntityModel for ToolCallsPanelEntity {
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
        let mut lines = vec![Line::from(Span::styled(
            format!("Tool calls ({})", self.calls.len()),
            ctx.theme.tool_title_style,
        ))];
        for (index, call) in self.calls.iter().enumerate() {
            let label = Self::call_label(call, index);
            lines.extend(wrap_text(
                &format!("- {label}"),
                width,
                ctx.theme.text_style,
            ));
        }
        if let Some(summary) = &self.summary {
            lines.extend(wrap_text(summary, width, ctx.theme.metadata_style));
        }
        with_selection_marker(lines, ctx)
    }
}

pub struct ToolCallsPanelFactory;

impl EntityFactory for ToolCallsPanelFactory {
    fn key(&self) -> &'static str {
        "tool_calls_panel"
    }

    fn kind(&self) -> &'static str {
        "tool_calls_panel"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(ToolCallsPanelEntity::new(props))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&["calls", "summary"])
    }
}
