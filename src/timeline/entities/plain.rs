//! Debug catch-all renderer: sorted `key=value` pairs.
//!
//! Everything without a better renderer lands here, so the timeline never
//! shows a hole for an unknown kind.

use ratatui::text::Text;
use serde_json::Value;

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{apply_patch, Props};
use crate::ui::wrap::wrap_text;

use super::{marker_width, with_selection_marker};

pub struct PlainEntity {
    props: Props,
}

impl PlainEntity {
    pub fn new(props: &Props) -> Self {
        Self {
            props: props.clone(),
        }
    }

    fn content(&self) -> String {
        let mut keys: Vec<&String> = self.props.keys().collect();
        keys.sort();
        keys.iter()
            .map(|key| format!("{key}={}", display_value(&self.props[key.as_str()])))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl EntityModel for PlainEntity {
    fn update(&mut self, msg: EntityMsg) -> Option<EntityReply> {
        match msg {
            EntityMsg::PropsUpdated(patch) => {
                apply_patch(&mut self.props, &patch);
                None
            }
            EntityMsg::CopyText => Some(EntityReply::CopyText(self.content())),
            EntityMsg::CopyCode => Some(EntityReply::CopyCode(self.content())),
            _ => None,
        }
    }

    fn view(&self, ctx: &ViewContext) -> Text<'static> {
        let width = ctx.width.saturating_sub(marker_width(ctx));
        let lines = wrap_text(&self.content(), width, ctx.theme.text_style);
        with_selection_marker(lines, ctx)
    }
}

pub struct PlainFactory;

impl EntityFactory for PlainFactory {
    fn key(&self) -> &'static str {
        "plain"
    }

    fn kind(&self) -> &'static str {
        "plain"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(PlainEntity::new(props))
    }
}
