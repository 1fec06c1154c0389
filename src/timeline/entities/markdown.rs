//! Markdown entity.
//!
//! Accepts `markdown` or `text` as the source prop. Styled rendering can
//! be disabled at construction for terminals without color support, in
//! which case the raw source is shown wrapped.

use ratatui::text::Text;

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{get_bool, get_str, Props};
use crate::ui::markdown::{code_blocks_joined, render_markdown};
use crate::ui::wrap::wrap_text;

use super::{marker_width, with_selection_marker};

pub struct MarkdownEntity {
    source: String,
    streaming: bool,
    styled: bool,
}

impl MarkdownEntity {
    pub fn new(props: &Props, styled: bool) -> Self {
        let mut entity = Self {
            source: String::new(),
            streaming: false,
            styled,
        };
        entity.apply(props);
        entity
    }

    fn apply(&mut self, patch: &Props) {
        if let Some(markdown) = get_str(patch, "markdown") {
            self.source = markdown.to_string();
        } else if let Some(text) = get_str(patch, "text") {
            self.source = text.to_string();
        }
        if let Some(streaming) = get_bool(patch, "streaming") {
            self.streaming = streaming;
        }
    }
}

impl EntityModel for MarkdownEntity {
    fn update(&mut self, msg: EntityMsg) -> Option<EntityReply> {
        match msg {
            EntityMsg::PropsUpdated(patch) => {
                self.apply(&patch);
                None
            }
            EntityMsg::CopyText => Some(EntityReply::CopyText(self.source.clone())),
            EntityMsg::CopyCode => {
                let content =
                    code_blocks_joined(&self.source).unwrap_or_else(|| self.source.clone());
                Some(EntityReply::CopyCode(content))
            }
            _ => None,
        }
    }

    fn view(&self, ctx: &ViewContext) -> Text<'static> {
        let width = ctx.width.saturating_sub(marker_width(ctx));
        let mut lines = if self.styled {
            render_markdown(&self.source, ctx.theme, width)
        } else {
            wrap_text(&self.source, width, ctx.theme.text_style)
        };
        if self.streaming {
            lines.extend(wrap_text("…", width, ctx.theme.metadata_style));
        }
        with_selection_marker(lines, ctx)
    }
}

/// Factory for styled markdown; `raw()` builds one for color-less
/// terminals.
pub struct MarkdownFactory {
    styled: bool,
}

impl MarkdownFactory {
    pub fn raw() -> Self {
        Self { styled: false }
    }
}

impl Default for MarkdownFactory {
    fn default() -> Self {
        Self { styled: true }
    }
}

impl EntityFactory for MarkdownFactory {
    fn key(&self) -> &'static str {
        "markdown"
    }

    fn kind(&self) -> &'static str {
        "markdown"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(MarkdownEntity::new(props, self.styled))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&["markdown", "text", "streaming"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::entities::testing::{ctx, props_of, render_plain};
    use crate::ui::theme::Theme;
    use serde_json::json;

    #[test]
    fn markdown_prop_wins_over_text() {
        let model = MarkdownEntity::new(
            &props_of(json!({"markdown": "# md", "text": "plain"})),
            true,
        );
        let theme = Theme::dark_default();
        assert_eq!(render_plain(&model.view(&ctx(&theme, 40))), vec!["md"]);
    }

    #[test]
    fn text_prop_is_accepted_alone() {
        let mut model = MarkdownEntity::new(&Props::new(), true);
        model.update(EntityMsg::PropsUpdated(props_of(json!({"text": "body"}))));
        let theme = Theme::dark_default();
        assert_eq!(render_plain(&model.view(&ctx(&theme, 40))), vec!["body"]);
    }

    #[test]
    fn raw_mode_skips_markdown_styling() {
        let model = MarkdownEntity::new(&props_of(json!({"markdown": "# raw"})), false);
        let theme = Theme::dark_default();
        let view = model.view(&ctx(&theme, 40));
        assert_eq!(render_plain(&view), vec!["# raw"]);
        assert_eq!(view.lines[0].spans[0].style, theme.text_style);
    }

    #[test]
    fn copy_code_extracts_fenced_blocks() {
        let mut model = MarkdownEntity::new(
            &props_of(json!({"markdown": "intro\n\n```sh\nls\n```\n"})),
            true,
        );
        assert_eq!(
            model.update(EntityMsg::CopyCode),
            Some(EntityReply::CopyCode("ls".into()))
        );
    }
}
