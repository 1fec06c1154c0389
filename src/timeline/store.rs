//! Insertion-ordered storage for entity records.
//!
//! The store owns exactly one record per canonical entity key. Iteration
//! order is creation order, which is also rendering order; removals
//! compact the order without disturbing the survivors.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::event::EntityCreated;
use super::id::{EntityId, EntityKey, RendererDescriptor};
use super::model::EntityModel;
use super::props::Props;

pub struct EntityRecord {
    pub id: EntityId,
    pub renderer: Option<RendererDescriptor>,
    pub props: Props,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
    pub completed: bool,
    pub model: Box<dyn EntityModel>,
}

impl EntityRecord {
    pub fn new(created: &EntityCreated, model: Box<dyn EntityModel>) -> Self {
        Self {
            id: created.id.clone(),
            renderer: created.renderer.clone(),
            props: created.props.clone(),
            started_at: created.started_at,
            updated_at: created.started_at,
            version: 0,
            completed: false,
            model,
        }
    }

    /// Renderer descriptor with the id's kind backfilled, for resolution
    /// and cache keying.
    pub fn descriptor(&self) -> RendererDescriptor {
        self.renderer
            .clone()
            .unwrap_or_default()
            .normalized(&self.id.kind)
    }
}

impl fmt::Debug for EntityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRecord")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("completed", &self.completed)
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct EntityStore {
    records: IndexMap<EntityKey, EntityRecord>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its canonical key. Returns false and leaves
    /// the store untouched when the key is already present.
    pub fn insert(&mut self, record: EntityRecord) -> bool {
        let key = record.id.key();
        if self.records.contains_key(&key) {
            return false;
        }
        self.records.insert(key, record);
        true
    }

    pub fn get(&self, key: &EntityKey) -> Option<&EntityRecord> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &EntityKey) -> Option<&mut EntityRecord> {
        self.records.get_mut(key)
    }

    /// Remove a record, compacting the order of the survivors.
    pub fn remove(&mut self, key: &EntityKey) -> Option<EntityRecord> {
        self.records.shift_remove(key)
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn index_of(&self, key: &EntityKey) -> Option<usize> {
        self.records.get_index_of(key)
    }

    pub fn by_index(&self, index: usize) -> Option<(&EntityKey, &EntityRecord)> {
        self.records.get_index(index)
    }

    pub fn by_index_mut(&mut self, index: usize) -> Option<(&EntityKey, &mut EntityRecord)> {
        self.records.get_index_mut(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityKey, &EntityRecord)> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&EntityKey, &mut EntityRecord)> {
        self.records.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::model::ViewContext;
    use crate::timeline::msg::{EntityMsg, EntityReply};
    use ratatui::text::Text;

    struct Null;

    impl EntityModel for Null {
        fn update(&mut self, _msg: EntityMsg) -> Option<EntityReply> {
            None
        }

        fn view(&self, _ctx: &ViewContext) -> Text<'static> {
            Text::from("")
        }
    }

    fn record(local: &str) -> EntityRecord {
        let created = EntityCreated::new(EntityId::local("text", local));
        EntityRecord::new(&created, Box::new(Null))
    }

    fn order(store: &EntityStore) -> Vec<String> {
        store
            .iter()
            .map(|(_, r)| r.id.local.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn preserves_insertion_order() {
        let mut store = EntityStore::new();
        for name in ["a", "b", "c"] {
            assert!(store.insert(record(name)));
        }
        assert_eq!(order(&store), ["a", "b", "c"]);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut store = EntityStore::new();
        assert!(store.insert(record("a")));
        assert!(!store.insert(record("a")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removal_compacts_order() {
        let mut store = EntityStore::new();
        for name in ["a", "b", "c"] {
            store.insert(record(name));
        }
        let key = EntityId::local("text", "b").key();
        assert!(store.remove(&key).is_some());
        assert_eq!(order(&store), ["a", "c"]);
        assert_eq!(store.index_of(&EntityId::local("text", "c").key()), Some(1));
    }

    #[test]
    fn descriptor_falls_back_to_id_kind() {
        let store_record = record("a");
        let desc = store_record.descriptor();
        assert_eq!(desc.kind.as_deref(), Some("text"));
        assert_eq!(desc.key, None);
    }
}
