//! The timeline controller.
//!
//! Owns the store, the render cache, a registry pointer, dimensions,
//! theme, and selection state. Every mutation arrives as a
//! [`TimelineMsg`]; rendering happens in [`view`] and
//! [`view_and_selected_position`]. Lifecycle handling is idempotent so
//! at-least-once delivery from the bus needs no dedup upstream.
//!
//! [`view`]: TimelineController::view
//! [`view_and_selected_position`]: TimelineController::view_and_selected_position

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use ratatui::text::{Line, Span, Text};
use tracing::{debug, warn};

use super::cache::{CacheKey, RenderCache};
use super::event::{
    EntityCompleted, EntityCreated, EntityDeleted, EntityUpdated, LifecycleEvent,
};
use super::id::EntityKey;
use super::model::ViewContext;
use super::msg::{EntityMsg, EntityReply, TimelineMsg, TimelineReply};
use super::props::{apply_patch, as_patch, props_hash};
use super::registry::EntityRegistry;
use super::store::{EntityRecord, EntityStore};
use crate::ui::theme::Theme;

/// Line position of the selected entity inside the joined view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedPosition {
    pub top: usize,
    pub height: usize,
}

pub struct ViewAndSelectedPosition {
    pub text: Text<'static>,
    pub selected: Option<SelectedPosition>,
}

pub struct TimelineController {
    store: EntityStore,
    cache: RenderCache,
    registry: Arc<EntityRegistry>,
    width: u16,
    height: u16,
    theme: Theme,
    selected: Option<usize>,
    entering: bool,
}

impl TimelineController {
    pub fn new(registry: Arc<EntityRegistry>) -> Self {
        Self {
            store: EntityStore::new(),
            cache: RenderCache::new(),
            registry,
            width: 80,
            height: 24,
            theme: Theme::default(),
            selected: None,
            entering: false,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_entering_selection(&self) -> bool {
        self.entering
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Apply one message. Returns a request the embedding application
    /// must service, if any.
    pub fn update(&mut self, msg: TimelineMsg) -> Option<TimelineReply> {
        match msg {
            TimelineMsg::Lifecycle(event) => {
                self.apply_lifecycle(event);
                None
            }
            TimelineMsg::SelectNext => {
                self.select_next();
                None
            }
            TimelineMsg::SelectPrev => {
                self.select_prev();
                None
            }
            TimelineMsg::SelectLast => {
                self.select_last();
                None
            }
            TimelineMsg::Unselect => {
                self.unselect();
                None
            }
            TimelineMsg::EnterSelection => {
                self.enter_selection();
                None
            }
            TimelineMsg::LeaveSelection => {
                self.leave_selection();
                None
            }
            TimelineMsg::SetSize { width, height } => {
                self.set_size(width, height);
                None
            }
            TimelineMsg::SetTheme(theme) => {
                self.theme = theme;
                None
            }
            TimelineMsg::CopyText => self.send_to_selected(EntityMsg::CopyText),
            TimelineMsg::CopyCode => self.send_to_selected(EntityMsg::CopyCode),
            TimelineMsg::Key(key) => {
                if self.entering {
                    self.send_to_selected(EntityMsg::Key(key))
                } else {
                    // Outside entering-selection the surrounding app owns keys.
                    None
                }
            }
        }
    }

    pub fn apply_lifecycle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Created(created) => self.on_created(created),
            LifecycleEvent::Updated(updated) => self.on_updated(updated),
            LifecycleEvent::Completed(completed) => self.on_completed(completed),
            LifecycleEvent::Deleted(deleted) => self.on_deleted(deleted),
        }
    }

    fn on_created(&mut self, created: EntityCreated) {
        let key = created.id.key();
        if self.store.contains(&key) {
            debug!(entity = %key, "Duplicate create ignored");
            return;
        }

        let descriptor = created
            .renderer
            .clone()
            .unwrap_or_default()
            .normalized(&created.id.kind);
        let factory = self.registry.resolve(&descriptor);
        let mut model = factory.build(&created.props);
        model.initialize();

        debug!(entity = %key, renderer = factory.key(), "Entity created");
        self.store.insert(EntityRecord::new(&created, model));

        if self.selected.is_none() {
            self.set_selected(Some(0));
        }
    }

    fn on_updated(&mut self, updated: EntityUpdated) {
        let key = updated.id.key();
        let Some(patch) = as_patch(&updated.patch) else {
            debug!(entity = %key, "Non-mapping patch ignored");
            return;
        };
        let Some(record) = self.store.get_mut(&key) else {
            debug!(entity = %key, "Update for unknown entity ignored");
            return;
        };

        apply_patch(&mut record.props, patch);
        record.version = record.version.max(updated.version);
        record.updated_at = updated.updated_at;
        record.model.update(EntityMsg::PropsUpdated(patch.clone()));
        self.cache.invalidate_entity(&key);
    }

    fn on_completed(&mut self, completed: EntityCompleted) {
        let key = completed.id.key();
        let Some(record) = self.store.get_mut(&key) else {
            debug!(entity = %key, "Completion for unknown entity ignored");
            return;
        };

        if let Some(result) = as_patch(&completed.result) {
            apply_patch(&mut record.props, result);
            record.model.update(EntityMsg::PropsUpdated(result.clone()));
        }
        record.completed = true;
        record.updated_at = completed.completed_at;
        self.cache.invalidate_entity(&key);
    }

    fn on_deleted(&mut self, deleted: EntityDeleted) {
        let key = deleted.id.key();
        let selected_key = self.selected_key();
        if self.store.remove(&key).is_none() {
            debug!(entity = %key, "Delete for unknown entity ignored");
            return;
        }
        self.cache.invalidate_entity(&key);

        // Clamp to the last valid index, or clear when empty.
        let clamped = match self.store.len() {
            0 => None,
            len => self.selected.map(|index| index.min(len - 1)),
        };
        self.selected = clamped;

        // The clamped index may now name a different entity. The old
        // selection survives when an earlier entity was removed; it still
        // needs the unselected notice and a cache drop, or its render
        // keeps the selected styling.
        if self.selected_key() != selected_key {
            let old = selected_key
                .as_ref()
                .and_then(|key| self.store.index_of(key));
            self.notify_selection(old, self.selected);
            for key in [selected_key, self.selected_key()].into_iter().flatten() {
                self.cache.invalidate_entity(&key);
            }
        }
    }

    fn selected_key(&self) -> Option<EntityKey> {
        self.selected
            .and_then(|index| self.store.by_index(index))
            .map(|(key, _)| key.clone())
    }

    fn select_next(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let next = match self.selected {
            Some(index) => (index + 1).min(self.store.len() - 1),
            None => 0,
        };
        self.set_selected(Some(next));
    }

    fn select_prev(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let prev = match self.selected {
            Some(index) => index.saturating_sub(1),
            None => 0,
        };
        self.set_selected(Some(prev));
    }

    fn select_last(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.set_selected(Some(self.store.len() - 1));
    }

    fn unselect(&mut self) {
        // Keep `entering` set while notifying so the old model gets Blur
        // alongside Unselected.
        self.set_selected(None);
        self.entering = false;
    }

    fn enter_selection(&mut self) {
        if self.selected.is_none() {
            return;
        }
        self.entering = true;
        self.notify_selected_model(EntityMsg::Focus);
        self.invalidate_selected();
    }

    fn leave_selection(&mut self) {
        if !self.entering {
            return;
        }
        self.entering = false;
        self.notify_selected_model(EntityMsg::Blur);
        self.invalidate_selected();
    }

    /// Focus is not part of the cache key, so entering or leaving the
    /// selection must drop the selected entity's cached render.
    fn invalidate_selected(&mut self) {
        if let Some(key) = self.selected_key() {
            self.cache.invalidate_entity(&key);
        }
    }

    /// Move selection, notifying the old and new models and invalidating
    /// their cached renders (selection changes their appearance).
    fn set_selected(&mut self, new: Option<usize>) {
        if self.selected == new {
            return;
        }
        let old = self.selected;
        self.selected = new;
        self.notify_selection(old, new);

        for index in [old, new].into_iter().flatten() {
            if let Some((key, _)) = self.store.by_index(index) {
                let key = key.clone();
                self.cache.invalidate_entity(&key);
            }
        }
    }

    fn notify_selection(&mut self, old: Option<usize>, new: Option<usize>) {
        if let Some(index) = old {
            if let Some((_, record)) = self.store.by_index_mut(index) {
                record.model.update(EntityMsg::Unselected);
                if self.entering {
                    record.model.update(EntityMsg::Blur);
                }
            }
        }
        if let Some(index) = new {
            if let Some((_, record)) = self.store.by_index_mut(index) {
                record.model.update(EntityMsg::Selected);
                if self.entering {
                    record.model.update(EntityMsg::Focus);
                }
            }
        }
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let mut redraws = Vec::new();
        for (key, record) in self.store.iter_mut() {
            if let Some(EntityReply::Redraw) = record.model.update(EntityMsg::SetSize { width, height })
            {
                redraws.push(key.clone());
            }
        }
        for key in redraws {
            self.cache.invalidate_entity(&key);
        }
    }

    fn notify_selected_model(&mut self, msg: EntityMsg) -> Option<EntityReply> {
        let index = self.selected?;
        let (_, record) = self.store.by_index_mut(index)?;
        record.model.update(msg)
    }

    fn send_to_selected(&mut self, msg: EntityMsg) -> Option<TimelineReply> {
        match self.notify_selected_model(msg)? {
            EntityReply::CopyText(content) => Some(TimelineReply::CopyText(content)),
            EntityReply::CopyCode(content) => Some(TimelineReply::CopyCode(content)),
            EntityReply::Redraw => {
                self.invalidate_selected();
                None
            }
        }
    }

    /// The joined view: every entity's lines in store order, one newline
    /// between entities when flattened.
    pub fn view(&mut self) -> Text<'static> {
        self.view_and_selected_position().text
    }

    /// The joined view plus where the selected entity sits inside it.
    pub fn view_and_selected_position(&mut self) -> ViewAndSelectedPosition {
        let theme_sig = self.theme.signature();
        let selected = self.selected;
        let entering = self.entering;

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut selected_pos = None;

        for index in 0..self.store.len() {
            let Some((key, record)) = self.store.by_index(index) else {
                break;
            };
            let key = key.clone();
            let descriptor = record.descriptor();
            let factory = self.registry.resolve(&descriptor);
            let is_selected = selected == Some(index);
            let cache_key = CacheKey::new(
                factory.key(),
                key.clone(),
                self.width,
                theme_sig,
                props_hash(&record.props, factory.relevant_props()),
            );

            let top = lines.len();
            let height;
            if let Some(hit) = self.cache.get(&cache_key) {
                height = hit.height;
                lines.extend(hit.text.lines.iter().cloned());
            } else {
                let ctx = ViewContext {
                    width: self.width,
                    selected: is_selected,
                    focused: entering && is_selected,
                    theme: &self.theme,
                };
                let rendered = catch_unwind(AssertUnwindSafe(|| record.model.view(&ctx)))
                    .unwrap_or_else(|_| {
                        warn!(entity = %key, "Entity renderer panicked; using placeholder");
                        placeholder(&self.theme)
                    });
                height = rendered.lines.len();
                lines.extend(rendered.lines.iter().cloned());
                self.cache.insert(cache_key, rendered);
            }

            if is_selected {
                selected_pos = Some(SelectedPosition { top, height });
            }
        }

        ViewAndSelectedPosition {
            text: Text::from(lines),
            selected: selected_pos,
        }
    }

    #[cfg(test)]
    pub(crate) fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

fn placeholder(theme: &Theme) -> Text<'static> {
    Text::from(vec![Line::from(Span::styled(
        "⚠ entity failed to render",
        theme.error_text_style,
    ))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::event::{EntityCompleted, EntityCreated, EntityDeleted, EntityUpdated};
    use crate::timeline::id::{EntityId, RendererDescriptor};
    use crate::timeline::model::{EntityFactory, EntityModel};
    use crate::timeline::props::Props;
    use crate::ui::span::text_to_string;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::json;

    fn controller() -> TimelineController {
        TimelineController::new(Arc::new(EntityRegistry::with_builtins()))
    }

    fn props_of(value: serde_json::Value) -> Props {
        value.as_object().cloned().expect("object literal")
    }

    fn created(kind: &str, local: &str, props: serde_json::Value) -> LifecycleEvent {
        LifecycleEvent::Created(
            EntityCreated::new(EntityId::local(kind, local)).with_props(props_of(props)),
        )
    }

    fn updated(kind: &str, local: &str, patch: serde_json::Value, version: u64) -> LifecycleEvent {
        LifecycleEvent::Updated(EntityUpdated::new(
            EntityId::local(kind, local),
            patch,
            version,
        ))
    }

    fn completed(kind: &str, local: &str, result: serde_json::Value) -> LifecycleEvent {
        let mut event = EntityCompleted::new(EntityId::local(kind, local));
        event.result = result;
        LifecycleEvent::Completed(event)
    }

    fn deleted(kind: &str, local: &str) -> LifecycleEvent {
        LifecycleEvent::Deleted(EntityDeleted {
            id: EntityId::local(kind, local),
        })
    }

    fn record_of<'a>(
        controller: &'a TimelineController,
        kind: &str,
        local: &str,
    ) -> &'a EntityRecord {
        controller
            .store()
            .get(&EntityId::local(kind, local).key())
            .expect("record")
    }

    #[test]
    fn streaming_text_accumulates_and_completes() {
        let mut c = controller();
        c.apply_lifecycle(created("llm_text", "t1", json!({"text": ""})));
        c.apply_lifecycle(updated("llm_text", "t1", json!({"text": "Hello"}), 1));
        c.apply_lifecycle(updated("llm_text", "t1", json!({"text": "Hello, world"}), 2));
        c.apply_lifecycle(completed("llm_text", "t1", json!({"text": "Hello, world!"})));

        assert_eq!(c.len(), 1);
        let record = record_of(&c, "llm_text", "t1");
        assert_eq!(record.props["text"], "Hello, world!");
        assert!(record.completed);
        // The result patch does not bump the version.
        assert_eq!(record.version, 2);
    }

    #[test]
    fn out_of_order_updates_keep_arrival_content_and_max_version() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "t2", json!({})));
        c.apply_lifecycle(updated("text", "t2", json!({"text": "c"}), 3));
        c.apply_lifecycle(updated("text", "t2", json!({"text": "a"}), 1));

        let record = record_of(&c, "text", "t2");
        assert_eq!(record.props["text"], "a");
        assert_eq!(record.version, 3);
    }

    #[test]
    fn repeated_created_is_a_no_op() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "a", json!({"text": "first"})));
        c.apply_lifecycle(created("text", "b", json!({})));
        c.apply_lifecycle(created("text", "a", json!({"text": "second"})));

        assert_eq!(c.len(), 2);
        assert_eq!(record_of(&c, "text", "a").props["text"], "first");
        let order: Vec<_> = c
            .store()
            .iter()
            .map(|(_, r)| r.id.local.clone().unwrap_or_default())
            .collect();
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn deleted_then_updated_is_a_no_op() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "gone", json!({})));
        c.apply_lifecycle(deleted("text", "gone"));
        c.apply_lifecycle(updated("text", "gone", json!({"text": "zombie"}), 1));
        assert!(c.is_empty());
    }

    #[test]
    fn completed_is_terminal_but_patches_still_apply() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "t", json!({"text": "body"})));
        c.apply_lifecycle(completed("text", "t", serde_json::Value::Null));
        c.apply_lifecycle(updated("text", "t", json!({"text": "late"}), 5));

        let record = record_of(&c, "text", "t");
        assert!(record.completed);
        assert_eq!(record.props["text"], "late");
        assert_eq!(record.version, 5);
    }

    #[test]
    fn first_create_selects_index_zero() {
        let mut c = controller();
        assert_eq!(c.selected_index(), None);
        c.apply_lifecycle(created("text", "a", json!({})));
        assert_eq!(c.selected_index(), Some(0));
        c.apply_lifecycle(created("text", "b", json!({})));
        assert_eq!(c.selected_index(), Some(0));
    }

    #[test]
    fn selection_steps_clamp_and_deletion_clamps() {
        let mut c = controller();
        for name in ["A", "B", "C"] {
            c.apply_lifecycle(created("text", name, json!({"text": name})));
        }
        c.update(TimelineMsg::SelectNext);
        c.update(TimelineMsg::SelectNext);
        assert_eq!(c.selected_index(), Some(2));
        // Already at the tail: stepping further stays put.
        c.update(TimelineMsg::SelectNext);
        assert_eq!(c.selected_index(), Some(2));

        c.apply_lifecycle(deleted("text", "B"));
        let order: Vec<_> = c
            .store()
            .iter()
            .map(|(_, r)| r.id.local.clone().unwrap_or_default())
            .collect();
        assert_eq!(order, ["A", "C"]);
        assert_eq!(c.selected_index(), Some(1));
        let (_, still_c) = c.store().by_index(1).expect("C");
        assert_eq!(still_c.id.local.as_deref(), Some("C"));
    }

    #[test]
    fn deleting_before_the_selection_unselects_the_survivor() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "a", json!({"text": "aaa"})));
        c.apply_lifecycle(created(
            "log_event",
            "b",
            json!({"message": "request done", "metadata": {"status": 200}}),
        ));
        c.apply_lifecycle(created("text", "c", json!({"text": "ccc"})));
        c.update(TimelineMsg::SelectNext);
        c.update(TimelineMsg::EnterSelection);
        c.update(TimelineMsg::Key(KeyEvent::new(
            KeyCode::Char('m'),
            KeyModifiers::NONE,
        )));
        assert!(text_to_string(&c.view()).contains("status: 200"));

        // The clamp keeps index 1, which now names "c". The log entity
        // survives at index 0 and must shed its selected state, both in
        // the model and in the cache.
        c.apply_lifecycle(deleted("text", "a"));
        let text = text_to_string(&c.view());
        assert_eq!(text.matches('▌').count(), 1);
        assert!(text.contains("▌ ccc"));
        assert!(!text.contains("status: 200"));
    }

    #[test]
    fn deleting_everything_clears_selection() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "only", json!({})));
        c.update(TimelineMsg::SelectLast);
        c.apply_lifecycle(deleted("text", "only"));
        assert_eq!(c.selected_index(), None);
    }

    #[test]
    fn view_joins_entities_with_single_newlines() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "1", json!({"text": "first"})));
        c.apply_lifecycle(created("text", "2", json!({"text": "second"})));
        c.update(TimelineMsg::Unselect);

        let text = c.view();
        assert_eq!(text_to_string(&text), "first\nsecond");
    }

    #[test]
    fn view_reports_the_selected_position() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "1", json!({"text": "a\nb"})));
        c.apply_lifecycle(created("text", "2", json!({"text": "c"})));
        c.apply_lifecycle(created("text", "3", json!({"text": "d"})));
        c.update(TimelineMsg::SelectNext);

        let view = c.view_and_selected_position();
        let pos = view.selected.expect("selected position");
        assert_eq!(pos, SelectedPosition { top: 2, height: 1 });
    }

    #[test]
    fn renders_are_cached_until_invalidated() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "a", json!({"text": "stable"})));
        c.update(TimelineMsg::Unselect);

        c.view();
        assert_eq!(c.cache_len(), 1);
        c.view();
        assert_eq!(c.cache_len(), 1);

        c.apply_lifecycle(updated("text", "a", json!({"text": "changed"}), 1));
        assert_eq!(c.cache_len(), 0);
        let text = c.view();
        assert_eq!(text_to_string(&text), "changed");
    }

    #[test]
    fn cached_output_equals_fresh_output() {
        let mut c = controller();
        c.apply_lifecycle(created("tool_call", "t", json!({
            "name": "search",
            "input": "{\"q\":\"x\",\"n\":2}"
        })));
        c.update(TimelineMsg::Unselect);

        let fresh = text_to_string(&c.view());
        let cached = text_to_string(&c.view());
        assert_eq!(fresh, cached);
        assert!(fresh.contains("```yaml"));
        assert!(fresh.contains("q: x"));
        assert!(fresh.contains("n: 2"));
    }

    #[test]
    fn selection_marker_appears_and_moves() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "a", json!({"text": "first"})));
        c.apply_lifecycle(created("text", "b", json!({"text": "second"})));

        let text = text_to_string(&c.view());
        assert!(text.starts_with("▌ first"));

        c.update(TimelineMsg::SelectNext);
        let text = text_to_string(&c.view());
        assert!(text.contains("first\n▌ second"));
    }

    #[test]
    fn non_mapping_patches_are_ignored_whole() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "a", json!({"text": "keep"})));
        c.apply_lifecycle(updated("text", "a", json!("not a patch"), 9));

        let record = record_of(&c, "text", "a");
        assert_eq!(record.props["text"], "keep");
        assert_eq!(record.version, 0);
    }

    #[test]
    fn unknown_renderers_fall_back_to_plain() {
        let mut c = controller();
        c.apply_lifecycle(created("mystery_kind", "m", json!({"alpha": 1})));
        c.update(TimelineMsg::Unselect);
        assert_eq!(text_to_string(&c.view()), "alpha=1");
    }

    #[test]
    fn explicit_renderer_key_overrides_the_id_kind() {
        let mut c = controller();
        c.apply_lifecycle(LifecycleEvent::Created(
            EntityCreated::new(EntityId::local("mystery_kind", "m"))
                .with_props(props_of(json!({"markdown": "# Heading"})))
                .with_renderer(RendererDescriptor {
                    key: Some("markdown".into()),
                    kind: None,
                }),
        ));
        c.update(TimelineMsg::Unselect);
        assert_eq!(text_to_string(&c.view()), "Heading");
    }

    struct Panicky;

    impl EntityModel for Panicky {
        fn update(&mut self, _msg: EntityMsg) -> Option<EntityReply> {
            None
        }

        fn view(&self, _ctx: &ViewContext) -> Text<'static> {
            panic!("render bug")
        }
    }

    struct PanickyFactory;

    impl EntityFactory for PanickyFactory {
        fn key(&self) -> &'static str {
            "panicky"
        }

        fn kind(&self) -> &'static str {
            "panicky"
        }

        fn build(&self, _props: &Props) -> Box<dyn EntityModel> {
            Box::new(Panicky)
        }
    }

    #[test]
    fn a_panicking_model_becomes_a_placeholder() {
        let registry = EntityRegistry::with_builtins();
        registry.register(Arc::new(PanickyFactory));
        let mut c = TimelineController::new(Arc::new(registry));

        c.apply_lifecycle(created("text", "ok", json!({"text": "fine"})));
        c.apply_lifecycle(created("panicky", "bad", json!({})));
        c.update(TimelineMsg::Unselect);

        let text = text_to_string(&c.view());
        assert_eq!(text, "fine\n⚠ entity failed to render");
    }

    #[test]
    fn keys_route_to_the_selected_model_only_while_entering() {
        let mut c = controller();
        c.apply_lifecycle(created(
            "log_event",
            "l",
            json!({"message": "done", "metadata": {"code": 7}}),
        ));
        c.update(TimelineMsg::Unselect);
        c.update(TimelineMsg::SelectLast);

        let toggle = TimelineMsg::Key(KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE));

        c.update(toggle.clone());
        assert!(!text_to_string(&c.view()).contains("code: 7"));

        c.update(TimelineMsg::EnterSelection);
        c.update(toggle);
        assert!(text_to_string(&c.view()).contains("code: 7"));
    }

    #[test]
    fn copy_requests_surface_entity_content() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "a", json!({"text": "copy me"})));
        c.update(TimelineMsg::SelectLast);

        assert_eq!(
            c.update(TimelineMsg::CopyText),
            Some(TimelineReply::CopyText("copy me".into()))
        );
        assert_eq!(c.update(TimelineMsg::Unselect), None);
        assert_eq!(c.update(TimelineMsg::CopyText), None);
    }

    #[test]
    fn theme_changes_miss_the_cache_without_invalidation() {
        let mut c = controller();
        c.apply_lifecycle(created("text", "a", json!({"text": "themed"})));
        c.update(TimelineMsg::Unselect);

        c.view();
        assert_eq!(c.cache_len(), 1);
        c.update(TimelineMsg::SetTheme(Theme::light()));
        c.view();
        // Old entry still present, new one added under the new signature.
        assert_eq!(c.cache_len(), 2);
    }
}
