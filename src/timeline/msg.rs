//! Messages exchanged inside the UI runtime.
//!
//! `TimelineMsg` is what the embedding application and the bus forwarder
//! enqueue for the controller; `EntityMsg` is what the controller forwards
//! to individual entity models. Both sides reply with request values
//! (`TimelineReply`, `EntityReply`) instead of performing effects
//! themselves, so the single-threaded runtime stays in charge.

use ratatui::crossterm::event::KeyEvent;
use tokio::sync::mpsc;
use tracing::warn;

use super::event::LifecycleEvent;
use super::props::Props;
use crate::ui::theme::Theme;

/// Top-level message consumed by [`TimelineController::update`].
///
/// [`TimelineController::update`]: super::controller::TimelineController::update
#[derive(Debug, Clone)]
pub enum TimelineMsg {
    Lifecycle(LifecycleEvent),
    SelectNext,
    SelectPrev,
    SelectLast,
    Unselect,
    /// Toggle the modal mode that routes keys to the selected entity.
    EnterSelection,
    LeaveSelection,
    SetSize { width: u16, height: u16 },
    SetTheme(Theme),
    CopyText,
    CopyCode,
    Key(KeyEvent),
}

/// Message delivered to a single entity model.
#[derive(Debug, Clone)]
pub enum EntityMsg {
    Selected,
    Unselected,
    /// The same patch that was folded into the record's props.
    PropsUpdated(Props),
    SetSize { width: u16, height: u16 },
    Focus,
    Blur,
    CopyText,
    CopyCode,
    Key(KeyEvent),
}

/// Request returned by an entity model from `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityReply {
    /// Plain content for the clipboard.
    CopyText(String),
    /// Code-block content for the clipboard, falling back to plain content.
    CopyCode(String),
    /// The model changed its display state without a props change.
    Redraw,
}

/// Request surfaced to the embedding application.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineReply {
    CopyText(String),
    CopyCode(String),
}

/// Cloneable handle producer threads use to enqueue timeline messages.
#[derive(Clone)]
pub struct TimelineSender {
    tx: mpsc::UnboundedSender<TimelineMsg>,
}

impl TimelineSender {
    pub fn new(tx: mpsc::UnboundedSender<TimelineMsg>) -> Self {
        Self { tx }
    }

    /// Enqueue one message. Returns false once the runtime has shut down.
    pub fn send(&self, msg: TimelineMsg) -> bool {
        if self.tx.send(msg).is_err() {
            warn!("Timeline runtime is gone; dropping message");
            return false;
        }
        true
    }
}
