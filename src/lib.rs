//! Chyron is a collection of reusable terminal-UI components for rendering an
//! ordered log of streaming, interactive entities.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`timeline`] owns the core subsystem: the entity store, renderer
//!   registry, render cache, controller, and the viewport shell that stitch
//!   lifecycle events into a scrollable, selectable transcript.
//! - [`ui`] provides the shared presentation plumbing: themes, width-aware
//!   wrapping, a compact markdown renderer, and display-YAML formatting.
//! - [`bus`] bridges an out-of-process publish/subscribe topic into the
//!   in-process message queue that drives the timeline.
//! - [`config`] loads the small TOML surface embedders use to pick a theme
//!   and tune timeline behavior.
//!
//! The timeline is message-driven: embedders feed [`timeline::TimelineMsg`]
//! values (lifecycle events, selection moves, routed keys) into
//! [`timeline::TimelineController::update`] or the higher-level
//! [`timeline::TimelineShell`], then draw the composed view with ratatui.
//! The crate never owns the terminal or the event loop.

pub mod bus;
pub mod config;
pub mod timeline;
pub mod ui;
