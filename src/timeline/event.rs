//! Lifecycle events that drive the timeline.
//!
//! Producers emit these for every entity they own; the controller folds
//! them into the store and the bus forwarder moves them between processes.
//! On the wire each event is an envelope `{"type": ..., "payload": ...}`
//! with `timeline.created`, `timeline.updated`, `timeline.completed` and
//! `timeline.deleted` as the recognized types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::{EntityId, RendererDescriptor};
use super::props::Props;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCreated {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<RendererDescriptor>,
    #[serde(default)]
    pub props: Props,
    #[serde(default = "Utc::now")]
    pub started_at: DateTime<Utc>,
    /// Free-form producer labels; carried for bus consumers, not stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Props>,
}

impl EntityCreated {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            renderer: None,
            props: Props::new(),
            started_at: Utc::now(),
            labels: None,
        }
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_renderer(mut self, renderer: RendererDescriptor) -> Self {
        self.renderer = Some(renderer);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityUpdated {
    pub id: EntityId,
    /// Top-level overwrite patch. Anything other than an object is ignored.
    #[serde(default)]
    pub patch: Value,
    #[serde(default)]
    pub version: u64,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl EntityUpdated {
    pub fn new(id: EntityId, patch: Value, version: u64) -> Self {
        Self {
            id,
            patch,
            version,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCompleted {
    pub id: EntityId,
    /// Final patch folded in before the entity is marked complete.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub result: Value,
    #[serde(default = "Utc::now")]
    pub completed_at: DateTime<Utc>,
}

impl EntityCompleted {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            result: Value::Null,
            completed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDeleted {
    pub id: EntityId,
}

/// One entity lifecycle event, in its wire envelope shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum LifecycleEvent {
    #[serde(rename = "timeline.created")]
    Created(EntityCreated),
    #[serde(rename = "timeline.updated")]
    Updated(EntityUpdated),
    #[serde(rename = "timeline.completed")]
    Completed(EntityCompleted),
    #[serde(rename = "timeline.deleted")]
    Deleted(EntityDeleted),
}

impl LifecycleEvent {
    pub fn id(&self) -> &EntityId {
        match self {
            LifecycleEvent::Created(e) => &e.id,
            LifecycleEvent::Updated(e) => &e.id,
            LifecycleEvent::Completed(e) => &e.id,
            LifecycleEvent::Deleted(e) => &e.id,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            LifecycleEvent::Created(_) => "timeline.created",
            LifecycleEvent::Updated(_) => "timeline.updated",
            LifecycleEvent::Completed(_) => "timeline.completed",
            LifecycleEvent::Deleted(_) => "timeline.deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_carries_type_and_payload() {
        let id = EntityId::local("text", "x");
        let event = LifecycleEvent::Updated(EntityUpdated::new(id, json!({"text": "Hi"}), 1));
        let wire: Value = serde_json::to_value(&event).expect("serialize");

        assert_eq!(wire["type"], "timeline.updated");
        assert_eq!(wire["payload"]["id"]["local_id"], "x");
        assert_eq!(wire["payload"]["patch"]["text"], "Hi");
        assert_eq!(wire["payload"]["version"], 1);
        assert!(wire["payload"]["updated_at"].is_string());
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let wire = json!({
            "type": "timeline.created",
            "payload": {"id": {"kind": "text", "local_id": "a"}}
        });
        let event: LifecycleEvent = serde_json::from_value(wire).expect("decode");
        match event {
            LifecycleEvent::Created(created) => {
                assert!(created.props.is_empty());
                assert!(created.renderer.is_none());
                assert!(created.labels.is_none());
            }
            other => panic!("expected created, got {other:?}"),
        }
    }

    #[test]
    fn unknown_envelope_type_is_an_error() {
        let wire = json!({"type": "timeline.nonsense", "payload": {"id": {}}});
        assert!(serde_json::from_value::<LifecycleEvent>(wire).is_err());
    }

    #[test]
    fn completed_without_result_omits_the_field() {
        let event = LifecycleEvent::Completed(EntityCompleted::new(EntityId::local("text", "y")));
        let wire = serde_json::to_value(&event).expect("serialize");
        assert!(wire["payload"].get("result").is_none());
    }

    #[test]
    fn round_trips_through_json_text() {
        let created = EntityCreated::new(EntityId::local("tool_call", "t1"))
            .with_props(json!({"name": "search"}).as_object().cloned().unwrap());
        let event = LifecycleEvent::Created(created);

        let text = serde_json::to_string(&event).expect("serialize");
        let back: LifecycleEvent = serde_json::from_str(&text).expect("decode");
        assert_eq!(back, event);
    }
}
