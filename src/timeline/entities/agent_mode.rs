//! Agent mode banner entity.
//!
//! Announces a mode transition with an accent border down the left edge:
//! a title, the from/to pair, and an optional analysis body.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span, Text};

use crate::timeline::model::{EntityFactory, EntityModel, ViewContext};
use crate::timeline::msg::{EntityMsg, EntityReply};
use crate::timeline::props::{get_str, Props};
use crate::ui::wrap::wrap_text;

use super::{marker_width, with_selection_marker};

pub struct AgentModeEntity {
    title: String,
    from: Option<String>,
    to: Option<String>,
    analysis: Option<String>,
}

impl AgentModeEntity {
    pub fn new(props: &Props) -> Self {
        let mut entity = Self {
            title: "Agent mode".to_string(),
            from: None,
            to: None,
            analysis: None,
        };
        entity.apply(props);
        entity
    }

    fn apply(&mut self, patch: &Props) {
        if let Some(title) = get_str(patch, "title") {
            self.title = title.to_string();
        }
        if let Some(from) = get_str(patch, "from") {
            self.from = Some(from.to_string());
        }
        if let Some(to) = get_str(patch, "to") {
            self.to = Some(to.to_string());
        }
        if let Some(analysis) = get_str(patch, "analysis") {
            self.analysis = Some(analysis.to_string());
        }
    }

    fn transition(&self) -> Option<String> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Some(format!("{from} → {to}")),
            (None, Some(to)) => Some(format!("→ {to}")),
            _ => None,
        }
    }

    fn plain_content(&self) -> String {
        let mut out = vec![self.title.clone()];
        if let Some(transition) = self.transition() {
            out.push(transition);
        }
        if let Some(analysis) = &self.analysis {
            out.push(analysis.clone());
        }
        out.join("\n")
    }
}

impl EntityModel for AgentModeEntity {
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
        let border = Span::styled("▎ ", ctx.theme.accent_border_style);
        let width = ctx.width.saturating_sub(marker_width(ctx)).saturating_sub(2);

        let mut body: Vec<Line<'static>> = vec![Line::from(Span::styled(
            self.title.clone(),
            ctx.theme.text_style.add_modifier(Modifier::BOLD),
        ))];
        if let Some(transition) = self.transition() {
            body.push(Line::from(Span::styled(
                transition,
                ctx.theme.metadata_style,
            )));
        }
        if let Some(analysis) = &self.analysis {
            body.extend(wrap_text(analysis, width, ctx.theme.text_style));
        }

        let bordered = body
            .into_iter()
            .map(|line| {
                let mut spans = vec![border.clone()];
                spans.extend(line.spans);
                Line::from(spans)
            })
            .collect();
        with_selection_marker(bordered, ctx)
    }
}

pub struct AgentModeFactory;

impl EntityFactory for AgentModeFactory {
    fn key(&self) -> &'static str {
        "agent_mode"
    }

    fn kind(&self) -> &'static str {
        "agent_mode"
    }

    fn build(&self, props: &Props) -> Box<dyn EntityModel> {
        Box::new(AgentModeEntity::new(props))
    }

    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        Some(&["title", "from", "to", "analysis"])
    }
}
