//! The capability contract every entity model satisfies.
//!
//! Entity models are small cooperative state machines. The controller
//! feeds them [`EntityMsg`] values and renders them through [`view`];
//! it never matches on concrete model types. New renderers plug in by
//! implementing [`EntityModel`] plus an [`EntityFactory`] and registering
//! the factory.
//!
//! [`view`]: EntityModel::view

use ratatui::text::Text;

use super::msg::{EntityMsg, EntityReply};
use super::props::Props;
use crate::ui::theme::Theme;

/// Per-render inputs passed to [`EntityModel::view`].
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub width: u16,
    pub selected: bool,
    pub focused: bool,
    pub theme: &'a Theme,
}

/// An interactive entity in the timeline.
///
/// `update` must tolerate unknown messages, unknown patch keys, and
/// wrong-typed patch values; the prior state wins in all three cases.
/// `view` is pure with respect to the model: rendering twice with the
/// same context yields the same lines.
pub trait EntityModel: Send {
    /// One-time setup hook. Most models need nothing here.
    fn initialize(&mut self) {}

    fn update(&mut self, msg: EntityMsg) -> Option<EntityReply>;

    fn view(&self, ctx: &ViewContext) -> Text<'static>;
}

/// Builds entity models for a renderer and describes its cache behavior.
pub trait EntityFactory: Send + Sync {
    /// Specific renderer key, unique per implementation.
    fn key(&self) -> &'static str;

    /// Renderer family used for fallback resolution.
    fn kind(&self) -> &'static str;

    fn build(&self, props: &Props) -> Box<dyn EntityModel>;

    /// Props keys that affect this renderer's output. `None` means every
    /// key participates in the cache hash.
    fn relevant_props(&self) -> Option<&'static [&'static str]> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::Line;

    struct Fixed;

    impl EntityModel for Fixed {
        fn update(&mut self, _msg: EntityMsg) -> Option<EntityReply> {
            None
        }

        fn view(&self, _ctx: &ViewContext) -> Text<'static> {
            Text::from(vec![Line::from("fixed")])
        }
    }

    struct FixedFactory;

    impl EntityFactory for FixedFactory {
        fn key(&self) -> &'static str {
            "fixed"
        }

        fn kind(&self) -> &'static str {
            "fixed"
        }

        fn build(&self, _props: &Props) -> Box<dyn EntityModel> {
            Box::new(Fixed)
        }
    }

    #[test]
    fn defaults_are_inert() {
        let factory = FixedFactory;
        assert_eq!(factory.relevant_props(), None);
        let mut model = factory.build(&Props::new());
        model.initialize();
        let theme = Theme::dark_default();
        let ctx = ViewContext {
            width: 10,
            selected: false,
            focused: false,
            theme: &theme,
        };
        assert_eq!(model.view(&ctx).lines.len(), 1);
    }
}
