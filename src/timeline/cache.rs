//! Cache for rendered entity output.
//!
//! Width and theme changes never need explicit invalidation: they are part
//! of the key, so stale entries simply stop being hit. Props and model
//! state changes do need it, and always happen scoped to one entity key.

use std::collections::HashMap;

use ratatui::text::Text;
use tracing::trace;

use super::id::EntityKey;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    renderer_key: &'static str,
    entity_key: EntityKey,
    width: u16,
    theme_sig: u64,
    props_hash: u64,
}

impl CacheKey {
    pub fn new(
        renderer_key: &'static str,
        entity_key: EntityKey,
        width: u16,
        theme_sig: u64,
        props_hash: u64,
    ) -> Self {
        Self {
            renderer_key,
            entity_key,
            width,
            theme_sig,
            props_hash,
        }
    }
}

pub struct CachedRender {
    pub text: Text<'static>,
    pub height: usize,
}

#[derive(Default)]
pub struct RenderCache {
    entries: HashMap<CacheKey, CachedRender>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CachedRender> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: CacheKey, text: Text<'static>) {
        let height = text.lines.len();
        self.entries.insert(key, CachedRender { text, height });
    }

    /// Drop every entry for one entity, whatever width or theme it was
    /// rendered under.
    pub fn invalidate_entity(&mut self, entity_key: &EntityKey) {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.entity_key != *entity_key);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            trace!(entity = %entity_key, dropped, "Invalidated cached renders");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::id::EntityId;

    fn key_for(local: &str, width: u16, theme_sig: u64, props_hash: u64) -> CacheKey {
        CacheKey::new(
            "text",
            EntityId::local("text", local).key(),
            width,
            theme_sig,
            props_hash,
        )
    }

    #[test]
    fn hits_require_every_component_to_match() {
        let mut cache = RenderCache::new();
        cache.insert(key_for("a", 80, 1, 42), Text::from("body"));

        assert!(cache.get(&key_for("a", 80, 1, 42)).is_some());
        assert!(cache.get(&key_for("a", 79, 1, 42)).is_none());
        assert!(cache.get(&key_for("a", 80, 2, 42)).is_none());
        assert!(cache.get(&key_for("a", 80, 1, 43)).is_none());
        assert!(cache.get(&key_for("b", 80, 1, 42)).is_none());
    }

    #[test]
    fn cached_height_matches_line_count() {
        let mut cache = RenderCache::new();
        cache.insert(key_for("a", 80, 1, 1), Text::from("one\ntwo\nthree"));
        let hit = cache.get(&key_for("a", 80, 1, 1)).expect("hit");
        assert_eq!(hit.height, 3);
    }

    #[test]
    fn invalidation_is_scoped_to_one_entity() {
        let mut cache = RenderCache::new();
        cache.insert(key_for("a", 80, 1, 1), Text::from("a"));
        cache.insert(key_for("a", 100, 1, 1), Text::from("a wide"));
        cache.insert(key_for("b", 80, 1, 1), Text::from("b"));

        cache.invalidate_entity(&EntityId::local("text", "a").key());
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key_for("b", 80, 1, 1)).is_some());
    }
}
