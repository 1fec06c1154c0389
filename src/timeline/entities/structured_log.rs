//! Structured log event entity.
//!
//! Like [`log_event`], but the structured payload is the point, so it is
//! visible by default. A `yaml` string prop is trusted as ready-to-show
//! YAML; otherwise `data`, `metadata`, or `fields` are formatted here.
//!
//! [`log_event`]: super::log_event

use ratatui::crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};
use serde_json::Value;

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{get_str, Props};
use crate::ui::wrap::wrap_text;
use crate::ui::yaml::to_display_yaml;

use super::{marker_width, with_selection_marker};

pub struct StructuredLogEntity {
    level: String,
    message: String,
    yaml: Option<String>,
    payload: Option<Value>,
    show_payload: bool,
    toggle_key: char,
}

impl StructuredLogEntity {
    pub fn new(props: &Props, toggle_key: char) -> Self {
        let mut entity = Self {
            level: "info".to_string(),
            message: String::new(),
            yaml: None,
            payload: None,
            show_payload: true,
            toggle_key,
        };
        entity.apply(props);
        entity
    }

    fn apply(&mut self, patch: &Props) {
        if let Some(level) = get_str(patch, "level") {
            self.level = level.to_string();
        }
        if let Some(message) = get_str(patch, "message") {
            self.message = message.to_string();
        }
        if let Some(yaml) = get_str(patch, "yaml") {
            self.yaml = Some(yaml.to_string());
        }
        for key in ["data", "metadata", "fields"] {
            if let Some(value) = patch.get(key) {
                self.payload = Some(value.clone());
                break;
            }
        }
    }

    fn payload_yaml(&self) -> Option<String> {
        if let Some(yaml) = &self.yaml {
            return Some(yaml.clone());
        }
        self.payload
            .as_ref()
            .filter(|value| !value.is_null())
            .map(to_display_yaml)
    }

    fn plain_content(&self) -> String {
        let mut out = format!("[{}] {}", self.level, self.message);
        if self.show_payload {
            if let Some(yaml) = self.payload_yaml() {
                out.push('\n');
                out.push_str(&yaml);
            }
        }
        out
    }
}

impl EntityModel for StructuredLogEntity {
    fn update(&mut self, msg: EntityMsg) -> Option<EntityReply> {
        match msg {
            EntityMsg::PropsUpdated(patch) => {
                self.apply(&patch);
                None
            }
            EntityMsg::Key(key) if key.code == KeyCode::Char(self.toggle_key) => {
                if self.payload_yaml().is_some() {
                    self.show_payload = !self.show_payload;
                    return Some(EntityReply::Redraw);
                }
                None
            }
            EntityMsg::CopyText => Some(EntityReply::CopyText(self.plain_content())),
            EntityMsg::CopyCode => Some(EntityReply::CopyCode(
                self.payload_yaml().unwrap_or_else(|| self.plain_content()),
            )),
            _ => None,
        }
    }

    fn view(&self, ctx: &ViewContext) -> Text<'static> {
        let width = ctx.width.saturating_sub(marker_width(ctx));
        let level_style = ctx.theme.level_style(&self.level);

        let header = vec![
            Span::styled(format!("[{}] ", self.level.to_uppercase()), level_style),
            Span::styled(self.message.clone(), ctx.theme.text_style),
        ];
        let mut lines = crate::ui::wrap::wrap_line(&Line::from(header), width);

        if self.show_payload {
            if let Some(yaml) = self.payload_yaml() {
                for yaml_line in yaml.lines() {
                    lines.extend(wrap_text(
                        &format!("  {yaml_line}"),
                        width,
                        ctx.theme.metadata_style,
                    ));
                }
            }
        }
        with_selection_marker(lines, ctx)
    }
}

pub struct StructuredLogFactory {
    toggle_key: char,
}

impl StructuredLogFactory {
    pub fn with_toggle_key(toggle_key: char) -> Self {
        Self { toggle_key }
    }
}

impl Default for StructuredLogFactory {
    fn default() -> Self {
        Self { toggle_key: 'm' }
    }
}

impl EntityFactory for StructuredLogFactory {
    fn key(&self) -> &'static str {
        "structured_log_event"
    }

    fn kind(&self) -> &'static str {
        "structured_log_event"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(StructuredLogEntity::new(props, self.toggle_key))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&["level", "message", "yaml", "data", "metadata", "fields"])
    }
}
