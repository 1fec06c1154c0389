//! The timeline subsystem.
//!
//! An ordered log of entities, each owned by a renderer-specific
//! sub-model. Lifecycle events create, patch, complete, and delete
//! entities; the controller folds them into the store and composes the
//! joined view through a per-entity render cache; the shell adds the
//! scrollable viewport.

pub mod cache;
pub mod controller;
pub mod entities;
pub mod event;
pub mod id;
pub mod model;
pub mod msg;
pub mod props;
pub mod registry;
pub mod shell;
pub mod store;

pub use controller::{SelectedPosition, TimelineController, ViewAndSelectedPosition};
pub use event::{EntityCompleted, EntityCreated, EntityDeleted, EntityUpdated, LifecycleEvent};
pub use id::{EntityId, EntityKey, RendererDescriptor};
pub use model::{EntityFactory, EntityModel, ViewContext};
pub use msg::{EntityMsg, EntityReply, TimelineMsg, TimelineReply, TimelineSender};
pub use registry::EntityRegistry;
pub use shell::{TimelineShell, Viewport};
