//! Tool call result entity.
//!
//! A string `result`, rendered in its own color so call and outcome read
//! as a pair in the stream.

use ratatui::text::Text;

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{get_str, Props};
use crate::ui::markdown::code_blocks_joined;
use crate::ui::wrap::wrap_text;

use super::{marker_width, with_selection_marker};

pub struct ToolResultEntity {
    result: String,
}

impl ToolResultEntity {
    pub fn new(props: &Props) -> Self {
        let mut entity = Self {
            result: String::new(),
        };
        entity.apply(props);
        entity
    }

    fn apply(&mut self, patch: &Props) {
        if let Some(result) = get_str(patch, "result") {
            self.result = result.to_string();
        }
    }
}

impl EntityModel for ToolResultEntity {
    fn update(&mut self, msg: EntityMsg) -> Option<EntityReply> {
        match msg {
            EntityMsg::PropsUpdated(patch) => {
                self.apply(&patch);
                None
            }
            EntityMsg::CopyText => Some(EntityReply::CopyText(self.result.clone())),
            EntityMsg::CopyCode => {
                let content =
                    code_blocks_joined(&self.result).unwrap_or_else(|| self.result.clone());
                Some(EntityReply::CopyCode(content))
            }
            _ => None,
        }
    }

    fn view(&self, ctx: &ViewContext) -> Text<'static> {
        let width = ctx.width.saturating_sub(marker_width(ctx));
        let lines = wrap_text(&self.result, width, ctx.theme.tool_result_style);
        with_selection_marker(lines, ctx)
    }
}

pub struct ToolResultFactory;

impl EntityFactory for ToolResultFactory {
    fn key(&self) -> &'static str {
        "tool_call_result"
    }

    fn kind(&self) -> &'static str {
        "tool_call_result"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(ToolResultEntity::new(props))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&["result"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::entities::testing::{ctx, props_of, render_plain};
    use crate::ui::theme::Theme;
    use serde_json::json;

    #[test]
    fn result_renders_in_the_tool_result_style() {
        let model = ToolResultEntity::new(&props_of(json!({"result": "3 files"})));
        let theme = Theme::dark_default();
        let view = model.view(&ctx(&theme, 40));
        assert_eq!(render_plain(&view), vec!["3 files"]);
        assert_eq!(view.lines[0].spans[0].style, theme.tool_result_style);
    }

    #[test]
    fn result_replaces_on_patch() {
        let mut model = ToolResultEntity::new(&props_of(json!({"result": "partial"})));
        model.update(EntityMsg::PropsUpdated(props_of(json!({"result": "done"}))));
        assert_eq!(model.result, "done");
    }
}
