//! Log event entity.
//!
//! One severity-colored line, with optional metadata and fields shown as
//! YAML. Metadata starts hidden and toggles on a designated key while the
//! entity is selected.

use ratatui::crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};
use serde_json::Value;

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{get_str, Props};
use crate::ui::wrap::wrap_text;
use crate::ui::yaml::to_display_yaml;

use super::{marker_width, with_selection_marker};

pub struct LogEventEntity {
    level: String,
    message: String,
    metadata: Option<Value>,
    fields: Option<Value>,
    show_metadata: bool,
    toggle_key: char,
}

impl LogEventEntity {
    pub fn new(props: &Props, toggle_key: char) -> Self {
        let mut entity = Self {
            level: "info".to_string(),
            message: String::new(),
            metadata: None,
            fields: None,
            show_metadata: false,
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
        if let Some(metadata) = patch.get("metadata") {
            self.metadata = Some(metadata.clone());
        }
        if let Some(fields) = patch.get("fields") {
            self.fields = Some(fields.clone());
        }
    }

    fn metadata_yaml(&self) -> Option<String> {
        let mut parts = Vec::new();
        for value in [&self.metadata, &self.fields].into_iter().flatten() {
            if !value.is_null() {
                parts.push(to_display_yaml(value));
            }
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }

    fn plain_content(&self) -> String {
        let mut out = format!("[{}] {}", self.level, self.message);
        if self.show_metadata {
            if let Some(yaml) = self.metadata_yaml() {
                out.push('\n');
                out.push_str(&yaml);
            }
        }
        out
    }
}

impl EntityModel for LogEventEntity {
    fn update(&mut self, msg: EntityMsg) -> Option<EntityReply> {
        match msg {
            EntityMsg::PropsUpdated(patch) => {
                self.apply(&patch);
                None
            }
            EntityMsg::Key(key) if key.code == KeyCode::Char(self.toggle_key) => {
                if self.metadata_yaml().is_some() {
                    self.show_metadata = !self.show_metadata;
                    return Some(EntityReply::Redraw);
                }
                None
            }
            EntityMsg::Unselected => {
                // Collapse again once the user moves on.
                if self.show_metadata {
                    self.show_metadata = false;
                    return Some(EntityReply::Redraw);
                }
                None
            }
            EntityMsg::CopyText => Some(EntityReply::CopyText(self.plain_content())),
            EntityMsg::CopyCode => Some(EntityReply::CopyCode(
                self.metadata_yaml().unwrap_or_else(|| self.plain_content()),
            )),
            _ => None,
        }
    }

    fn view(&self, ctx: &ViewContext) -> Text<'static> {
        let width = ctx.width.saturating_sub(marker_width(ctx));
        let level_style = ctx.theme.level_style(&self.level);

        let mut first = vec![Span::styled(
            format!("[{}] ", self.level.to_uppercase()),
            level_style,
        )];
        first.push(Span::styled(self.message.clone(), ctx.theme.text_style));
        let mut lines = crate::ui::wrap::wrap_line(&Line::from(first), width);

        if self.show_metadata {
            if let Some(yaml) = self.metadata_yaml() {
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

/// Builds log entities; the metadata toggle key is configurable.
pub struct LogEventFactory {
    toggle_key: char,
}

impl LogEventFactory {
    pub fn with_toggle_key(toggle_key: char) -> Self {
        Self { toggle_key }
    }
}

impl Default for LogEventFactory {
    fn default() -> Self {
        Self { toggle_key: 'm' }
    }
}

impl EntityFactory for LogEventFactory {
    fn key(&self) -> &'static str {
        "log_event"
    }

    fn kind(&self) -> &'static str {
        "log_event"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(LogEventEntity::new(props, self.toggle_key))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&["level", "message", "metadata", "fields"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::entities::testing::{ctx, props_of, render_plain};
    use crate::ui::theme::Theme;
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};
    use serde_json::json;

    fn key(ch: char) -> EntityMsg {
        EntityMsg::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE))
    }

    #[test]
    fn severity_colors_the_level_tag() {
        let model = LogEventEntity::new(
            &props_of(json!({"level": "warn", "message": "careful"})),
            'm',
        );
        let theme = Theme::dark_default();
        let view = model.view(&ctx(&theme, 60));
        assert_eq!(render_plain(&view), vec!["[WARN] careful"]);
        assert_eq!(view.lines[0].spans[0].style, theme.log_warn_style);
    }

    #[test]
    fn metadata_is_hidden_until_toggled() {
        let mut model = LogEventEntity::new(
            &props_of(json!({
                "message": "request done",
                "metadata": {"status": 200}
            })),
            'm',
        );
        let theme = Theme::dark_default();
        assert_eq!(render_plain(&model.view(&ctx(&theme, 60))).len(), 1);

        assert_eq!(model.update(key('m')), Some(EntityReply::Redraw));
        let lines = render_plain(&model.view(&ctx(&theme, 60)));
        assert_eq!(lines, vec!["[INFO] request done", "  status: 200"]);

        assert_eq!(model.update(key('m')), Some(EntityReply::Redraw));
        assert_eq!(render_plain(&model.view(&ctx(&theme, 60))).len(), 1);
    }

    #[test]
    fn toggle_without_metadata_does_nothing() {
        let mut model = LogEventEntity::new(&props_of(json!({"message": "bare"})), 'm');
        assert_eq!(model.update(key('m')), None);
    }

    #[test]
    fn unselecting_collapses_metadata() {
        let mut model = LogEventEntity::new(
            &props_of(json!({"message": "x", "fields": {"a": 1}})),
            'm',
        );
        model.update(key('m'));
        assert_eq!(model.update(EntityMsg::Unselected), Some(EntityReply::Redraw));
        assert!(!model.show_metadata);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut model = LogEventEntity::new(
            &props_of(json!({"message": "x", "fields": {"a": 1}})),
            'm',
        );
        assert_eq!(model.update(key('q')), None);
    }
}
