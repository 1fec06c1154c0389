//! Structured data entity: pretty-printed JSON.
//!
//! Accepts `json` or `data`. String values are parsed as JSON first;
//! strings that do not parse stay strings and render JSON-quoted, so the
//! output is always valid JSON either way.

use ratatui::text::Text;
use serde_json::Value;

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::Props;
use crate::ui::wrap::wrap_text;

use super::{marker_width, with_selection_marker};

pub struct StructuredDataEntity {
    value: Value,
}

impl StructuredDataEntity {
    pub fn new(props: &Props) -> Self {
        let mut entity = Self { value: Value::Null };
        entity.apply(props);
        entity
    }

    fn apply(&mut self, patch: &Props) {
        let incoming = patch.get("json").or_else(|| patch.get("data"));
        if let Some(incoming) = incoming {
            self.value = normalize(incoming);
        }
    }

    fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.value).unwrap_or_else(|_| self.value.to_string())
    }
}

/// Parse JSON out of strings; leave everything else as-is.
fn normalize(value: &Value) -> Value {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed) => parsed,
            Err(_) => Value::String(text.clone()),
        },
        other => other.clone(),
    }
}

impl EntityModel for StructuredDataEntity {
    fn update(&mut self, msg: EntityMsg) -> Option<EntityReply> {
        match msg {
            EntityMsg::PropsUpdated(patch) => {
                self.apply(&patch);
                None
            }
            EntityMsg::CopyText => Some(EntityReply::CopyText(self.pretty())),
            EntityMsg::CopyCode => Some(EntityReply::CopyCode(self.pretty())),
            _ => None,
        }
    }

    fn view(&self, ctx: &ViewContext) -> Text<'static> {
        let width = ctx.width.saturating_sub(marker_width(ctx));
        let lines = wrap_text(&self.pretty(), width, ctx.theme.code_block_style);
        with_selection_marker(lines, ctx)
    }
}

pub struct StructuredDataFactory;

impl EntityFactory for StructuredDataFactory {
    fn key(&self) -> &'static str {
        "structured_data"
    }

    fn kind(&self) -> &'static str {
        "structured_data"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(StructuredDataEntity::new(props))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&["json", "data"])
    }
}
