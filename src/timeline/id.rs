//! Entity identity and renderer selection types.
//!
//! Every timeline entity is addressed by a composite [`EntityId`]. The id's
//! canonical serialization ([`EntityKey`]) is the stable string used for
//! store lookups and render-cache keys, so its encoding must be byte-stable:
//! the JSON array `[run, turn, block, local, kind]` with `null` for absent
//! fields. JSON escaping keeps field contents from colliding with the
//! encoding itself.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Composite identity for a timeline entity.
///
/// All fields are optional except `kind`, which doubles as the renderer
/// family fallback when no renderer descriptor accompanies the entity.
/// Two ids are equal iff every field matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    #[serde(default, rename = "run_id", skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    #[serde(default, rename = "turn_id", skip_serializing_if = "Option::is_none")]
    pub turn: Option<String>,
    #[serde(default, rename = "block_id", skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(default, rename = "local_id", skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    #[serde(default)]
    pub kind: String,
}

impl EntityId {
    /// Shorthand for the common case of a kind plus a local discriminator.
    pub fn local(kind: impl Into<String>, local: impl Into<String>) -> Self {
        EntityId {
            local: Some(local.into()),
            kind: kind.into(),
            ..EntityId::default()
        }
    }

    /// Canonical, byte-stable key for map and cache lookups.
    pub fn key(&self) -> EntityKey {
        let field = |f: &Option<String>| match f {
            Some(s) => Value::String(s.clone()),
            None => Value::Null,
        };
        let encoded = Value::Array(vec![
            field(&self.run),
            field(&self.turn),
            field(&self.block),
            field(&self.local),
            Value::String(self.kind.clone()),
        ]);
        EntityKey(Arc::from(encoded.to_string().as_str()))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Canonical serialization of an [`EntityId`].
///
/// Cheap to clone (`Arc<str>`) so cache keys can carry it without
/// reallocating on every render pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey(Arc<str>);

impl EntityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selects the renderer for an entity.
///
/// `key` names a specific versioned renderer implementation; `kind` names a
/// family used for fallback resolution when the key is unknown. Either side
/// may be absent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl RendererDescriptor {
    pub fn for_kind(kind: impl Into<String>) -> Self {
        RendererDescriptor {
            key: None,
            kind: Some(kind.into()),
        }
    }

    /// Fill in a missing `kind` from the entity id so resolution always has
    /// a family to fall back on.
    pub fn normalized(mut self, id_kind: &str) -> Self {
        if self.kind.as_deref().map_or(true, str::is_empty) && !id_kind.is_empty() {
            self.kind = Some(id_kind.to_string());
        }
        self
    }
}
