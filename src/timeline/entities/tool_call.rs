//! Tool call entity.
//!
//! Shows the tool name and its input. Inputs that parse as JSON render
//! as YAML inside a fenced `yaml` code section; anything else is shown
//! verbatim. Raw JSON blobs are what producers have, YAML is what humans
//! can scan.

use ratatui::text::{Line, Span, Text};
use serde_json::Value;

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{get_str, Props};
use crate::ui::wrap::wrap_text;
use crate::ui::yaml::to_display_yaml;

use super::{marker_width, with_selection_marker};

pub struct ToolCallEntity {
    name: String,
    input: String,
}

impl ToolCallEntity {
    pub fn new(props: &Props) -> Self {
        let mut entity = Self {
            name: String::new(),
            input: String::new(),
        };
        entity.apply(props);
        entity
    }

    fn apply(&mut self, patch: &Props) {
        if let Some(name) = get_str(patch, "name") {
            self.name = name.to_string();
        }
        if let Some(input) = get_str(patch, "input") {
            self.input = input.to_string();
        }
    }

    fn input_as_yaml(&self) -> Option<String> {
        if self.input.trim().is_empty() {
            return None;
        }
        serde_json::from_str::<Value>(&self.input)
            .ok()
            .map(|value| to_display_yaml(&value))
    }
}

impl EntityModel for ToolCallEntity {
    fn update(&mut self, msg: EntityMsg) -> Option<EntityReply> {
        match msg {
            EntityMsg::PropsUpdated(patch) => {
                self.apply(&patch);
                None
            }
            EntityMsg::CopyText => Some(EntityReply::CopyText(self.input.clone())),
            EntityMsg::CopyCode => {
                let content = self.input_as_yaml().unwrap_or_else(|| self.input.clone());
                Some(EntityReply::CopyCode(content))
            }
            _ => None,
        }
    }

    fn view(&self, ctx: &ViewContext) -> Text<'static> {
        let width = ctx.width.saturating_sub(marker_width(ctx));
        let mut lines = vec![Line::from(Span::styled(
            format!("Tool: {}", self.name),
            ctx.theme.tool_title_style,
        ))];

        match self.input_as_yaml() {
            Some(yaml) => {
                let style = ctx.theme.code_block_style;
                lines.push(Line::from(Span::styled("```yaml", style)));
                for yaml_line in yaml.lines() {
                    lines.push(Line::from(Span::styled(yaml_line.to_string(), style)));
                }
                lines.push(Line::from(Span::styled("```", style)));
            }
            None if self.input.is_empty() => {}
            None => lines.extend(wrap_text(&self.input, width, ctx.theme.text_style)),
        }
        with_selection_marker(lines, ctx)
    }
}

pub struct ToolCallFactory;

impl EntityFactory for ToolCallFactory {
    fn key(&self) -> &'static str {
        "tool_call"
    }

    fn kind(&self) -> &'static str {
        "tool_call"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(ToolCallEntity::new(props))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&["name", "input"])
    }
}
