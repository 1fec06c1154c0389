//! Role-bearing message entity.
//!
//! A header line names the speaker, the body carries the message. The
//! role defaults to assistant, which is what streaming producers almost
//! always mean when they omit it.

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{get_str, Props};
use crate::ui::markdown::code_blocks_joined;
use crate::ui::wrap::wrap_text;

use super::{marker_width, with_selection_marker};

pub struct LlmTextEntity {
    role: String,
    text: String,
}

impl LlmTextEntity {
    pub fn new(props: &Props) -> Self {
        let mut entity = Self {
            role: "assistant".to_string(),
            text: String::new(),
        };
        entity.apply(props);
        entity
    }

    fn apply(&mut self, patch: &Props) {
        if let Some(role) = get_str(patch, "role") {
            if role.is_empty() {
                self.role = "assistant".to_string();
            } else {
                self.role = role.to_string();
            }
        }
        if let Some(text) = get_str(patch, "text") {
            self.text = text.to_string();
        }
    }

    fn role_style(&self, ctx: &ViewContext) -> Style {
        match self.role.as_str() {
            "user" => ctx.theme.user_prefix_style,
            "system" => ctx.theme.system_prefix_style,
            _ => ctx.theme.assistant_prefix_style,
        }
    }

    fn role_label(&self) -> String {
        let mut chars = self.role.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl EntityModel for LlmTextEntity {
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
        let width = ctx.width.saturating_sub(marker_width(ctx));
        let mut header_style = self.role_style(ctx);
        if ctx.focused {
            header_style = header_style.patch(ctx.theme.focus_border_style);
        }
        let mut lines = vec![Line::from(Span::styled(self.role_label(), header_style))];
        lines.extend(wrap_text(&self.text, width, ctx.theme.text_style));
        with_selection_marker(lines, ctx)
    }
}

pub struct LlmTextFactory;

impl EntityFactory for LlmTextFactory {
    fn key(&self) -> &'static str {
        "llm_text"
    }

    fn kind(&self) -> &'static str {
        "llm_text"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(LlmTextEntity::new(props))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&["role", "text"])
    }
}
