//! Accumulating text entity.
//!
//! The workhorse for streamed output. `text` replaces the buffer, `append`
//! extends it, and both may appear in the same patch (replace first, then
//! append).

use ratatui::text::Text;

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{get_bool, get_str, Props};
use crate::ui::markdown::code_blocks_joined;
use crate::ui::wrap::wrap_text;

use super::{marker_width, with_selection_marker};

pub struct TextEntity {
    text: String,
    is_error: bool,
    streaming: bool,
}

impl TextEntity {
    pub fn new(props: &Props) -> Self {
        let mut entity = Self {
            text: String::new(),
            is_error: false,
            streaming: false,
        };
        entity.apply(props);
        entity
    }

    fn apply(&mut self, patch: &Props) {
        if let Some(text) = get_str(patch, "text") {
            self.text = text.to_string();
        }
        if let Some(chunk) = get_str(patch, "append") {
            self.text.push_str(chunk);
        }
        if let Some(is_error) = get_bool(patch, "is_error") {
            self.is_error = is_error;
        }
        if let Some(streaming) = get_bool(patch, "streaming") {
            self.streaming = streaming;
        }
    }
}

impl EntityModel for TextEntity {
    fn update(&mut self, msg: EntityMsg) -> Option<EntityReply> {
        match msg {
            EntityMsg::PropsUpdated(patch) => {
                self.apply(&patch);
                None
            }
            EntityMsg::CopyText => Some(EntityReply::CopyText(self.text.clone())),
            EntityMsg::CopyCode => {
                let content = code_blocks_joined(&self.text).unwrap_or_else(|| self.text.clone());
                Some(EntityReply::CopyCode(content))
            }
            _ => None,
        }
    }

    fn view(&self, ctx: &ViewContext) -> Text<'static> {
        let style = if self.is_error {
            ctx.theme.error_text_style
        } else {
            ctx.theme.text_style
        };
        let width = ctx.width.saturating_sub(marker_width(ctx));
        let mut content = self.text.clone();
        if self.streaming {
            content.push('…');
        }
        let lines = wrap_text(&content, width, style);
        with_selection_marker(lines, ctx)
    }
}

pub struct TextFactory;

impl EntityFactory for TextFactory {
    fn key(&self) -> &'static str {
        "text"
    }

    fn kind(&self) -> &'static str {
        "text"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(TextEntity::new(props))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&["text", "append", "is_error", "streaming"])
    }
}
