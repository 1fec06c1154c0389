//! Renderer resolution: descriptor in, factory out.
//!
//! Two parallel indexes map renderer keys and renderer kinds to
//! factories. Resolution tries the specific key first, then the family
//! kind, and finally the built-in plain factory, so an unknown renderer
//! degrades to a readable key=value dump instead of a hole in the
//! timeline.
//!
//! The registry is the only timeline component touched from outside the
//! UI thread (registrations at startup), hence the shared/exclusive lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::entities::plain::PlainFactory;
use super::id::RendererDescriptor;
use super::model::EntityFactory;

#[derive(Default)]
struct Indexes {
    by_key: HashMap<String, Arc<dyn EntityFactory>>,
    by_kind: HashMap<String, Arc<dyn EntityFactory>>,
}

pub struct EntityRegistry {
    indexes: RwLock<Indexes>,
    fallback: Arc<dyn EntityFactory>,
}

impl EntityRegistry {
    /// An empty registry. Even empty, resolution still lands on plain.
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(Indexes::default()),
            fallback: Arc::new(PlainFactory),
        }
    }

    /// A registry preloaded with every built-in entity factory.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for factory in super::entities::builtin_factories() {
            registry.register(factory);
        }
        registry
    }

    /// Index a factory under both its key and its kind. Later
    /// registrations overwrite earlier ones for the same name.
    pub fn register(&self, factory: Arc<dyn EntityFactory>) {
        let mut indexes = self
            .indexes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(key = factory.key(), kind = factory.kind(), "Registering renderer");
        indexes
            .by_key
            .insert(factory.key().to_string(), Arc::clone(&factory));
        indexes.by_kind.insert(factory.kind().to_string(), factory);
    }

    pub fn lookup_key(&self, key: &str) -> Option<Arc<dyn EntityFactory>> {
        let indexes = self.indexes.read().unwrap_or_else(PoisonError::into_inner);
        indexes.by_key.get(key).cloned()
    }

    pub fn lookup_kind(&self, kind: &str) -> Option<Arc<dyn EntityFactory>> {
        let indexes = self.indexes.read().unwrap_or_else(PoisonError::into_inner);
        indexes.by_kind.get(kind).cloned()
    }

    /// Key, then kind, then plain. Never fails.
    pub fn resolve(&self, descriptor: &RendererDescriptor) -> Arc<dyn EntityFactory> {
        let indexes = self.indexes.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(key) = descriptor.key.as_deref() {
            if let Some(factory) = indexes.by_key.get(key) {
                return Arc::clone(factory);
            }
        }
        if let Some(kind) = descriptor.kind.as_deref() {
            if let Some(factory) = indexes.by_kind.get(kind) {
                return Arc::clone(factory);
            }
        }
        Arc::clone(&self.fallback)
    }

    pub fn fallback(&self) -> Arc<dyn EntityFactory> {
        Arc::clone(&self.fallback)
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
