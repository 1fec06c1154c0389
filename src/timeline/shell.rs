//! Timeline shell: the controller plus a scrollable viewport.
//!
//! The shell owns scroll state so the embedding application only routes
//! messages and calls [`render`]. Content following works like a pager:
//! new output keeps the view pinned to the bottom until the user
//! navigates, and jumping back to the bottom resumes following.
//!
//! [`render`]: TimelineShell::render

use std::sync::Arc;

use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::controller::TimelineController;
use super::msg::{TimelineMsg, TimelineReply};
use super::registry::EntityRegistry;
use crate::ui::theme::Theme;

/// Scroll window over the joined timeline view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub offset: u16,
}

pub struct TimelineShell {
    controller: TimelineController,
    viewport: Viewport,
    follow_output: bool,
    content_height: u16,
}

impl TimelineShell {
    pub fn new(registry: Arc<EntityRegistry>) -> Self {
        Self {
            controller: TimelineController::new(registry),
            viewport: Viewport {
                width: 80,
                height: 24,
                offset: 0,
            },
            follow_output: true,
            content_height: 0,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.controller = self.controller.with_theme(theme);
        self
    }

    pub fn controller(&self) -> &TimelineController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TimelineController {
        &mut self.controller
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_following_output(&self) -> bool {
        self.follow_output
    }

    /// Route one message through the controller, then keep the viewport
    /// consistent with whatever it changed.
    pub fn handle(&mut self, msg: TimelineMsg) -> Option<TimelineReply> {
        match msg {
            TimelineMsg::Lifecycle(event) => {
                self.controller.update(TimelineMsg::Lifecycle(event));
                self.refresh_view(false);
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
                self.follow_output = false;
                self.controller.update(TimelineMsg::SelectLast);
                self.scroll_to_selected();
                None
            }
            TimelineMsg::SetSize { width, height } => {
                self.viewport.width = width;
                self.viewport.height = height;
                self.controller
                    .update(TimelineMsg::SetSize { width, height });
                self.refresh_view(false);
                None
            }
            TimelineMsg::SetTheme(theme) => {
                self.controller.update(TimelineMsg::SetTheme(theme));
                self.refresh_view(false);
                None
            }
            other => self.controller.update(other),
        }
    }

    /// Re-measure the content and re-pin the viewport. Jumps to the
    /// bottom when asked to or while following output.
    pub fn refresh_view(&mut self, go_to_bottom: bool) {
        self.sync_content_height();
        if go_to_bottom || self.follow_output {
            self.viewport.offset = self.max_offset();
        } else {
            self.viewport.offset = self.viewport.offset.min(self.max_offset());
        }
    }

    /// Move selection forward and bring it into view.
    pub fn select_next(&mut self) {
        self.follow_output = false;
        self.controller.update(TimelineMsg::SelectNext);
        self.scroll_to_selected();
    }

    /// Move selection backward and bring it into view.
    pub fn select_prev(&mut self) {
        self.follow_output = false;
        self.controller.update(TimelineMsg::SelectPrev);
        self.scroll_to_selected();
    }

    /// Scroll so the selected entity is visible.
    ///
    /// Selections drifting below the fold advance the viewport by at
    /// least half a screen; selections above the fold snap the offset to
    /// the entity's first line.
    pub fn scroll_to_selected(&mut self) {
        let view = self.controller.view_and_selected_position();
        self.content_height = clamp_height(view.text.lines.len());
        let Some(pos) = view.selected else {
            return;
        };

        let top = pos.top.min(u16::MAX as usize) as u16;
        let entity_height = pos.height.min(u16::MAX as usize) as u16;
        let height = self.viewport.height;
        let offset = self.viewport.offset;

        let bottom = top.saturating_add(entity_height);
        let viewport_bottom = offset.saturating_add(height);
        let midpoint = offset.saturating_add(height / 2);

        if bottom > viewport_bottom && top > midpoint {
            let step = height
                .saturating_sub(entity_height.saturating_add(1))
                .max(height / 2);
            self.viewport.offset = offset.saturating_add(step).min(self.max_offset());
        }
        if top < self.viewport.offset {
            self.viewport.offset = top;
        }
    }

    /// Scroll to the very top of the timeline and stop following output.
    pub fn scroll_to_top(&mut self) {
        self.follow_output = false;
        self.viewport.offset = 0;
    }

    /// Scroll to the very bottom and resume following output.
    pub fn scroll_to_bottom(&mut self) {
        self.sync_content_height();
        self.viewport.offset = self.max_offset();
        self.follow_output = true;
    }

    /// Scroll up one line. Stops following output.
    pub fn scroll_line_up(&mut self) {
        self.follow_output = false;
        self.viewport.offset = self.viewport.offset.saturating_sub(1);
    }

    /// Scroll down one line. Resumes following when the bottom is reached.
    pub fn scroll_line_down(&mut self) {
        self.sync_content_height();
        let max = self.max_offset();
        self.viewport.offset = self.viewport.offset.saturating_add(1).min(max);
        self.follow_output = self.viewport.offset == max;
    }

    /// Page up by one viewport (minus one line overlap). Stops following.
    pub fn page_up(&mut self) {
        self.follow_output = false;
        let step = self.viewport.height.saturating_sub(1);
        self.viewport.offset = self.viewport.offset.saturating_sub(step);
    }

    /// Page down by one viewport (minus one line overlap). Resumes
    /// following when the bottom is reached.
    pub fn page_down(&mut self) {
        self.sync_content_height();
        let step = self.viewport.height.saturating_sub(1);
        let max = self.max_offset();
        self.viewport.offset = self.viewport.offset.saturating_add(step).min(max);
        self.follow_output = self.viewport.offset == max;
    }

    /// Draw the timeline into `area`, resizing first when the area
    /// changed since the last frame.
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        if area.width != self.viewport.width || area.height != self.viewport.height {
            self.handle(TimelineMsg::SetSize {
                width: area.width,
                height: area.height,
            });
        }
        let text = self.controller.view();
        let paragraph = Paragraph::new(text).scroll((self.viewport.offset, 0));
        f.render_widget(paragraph, area);
    }

    fn sync_content_height(&mut self) {
        self.content_height = clamp_height(self.controller.view().lines.len());
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport.height)
    }
}

/// Saturate line counts into the u16 scroll domain instead of wrapping.
fn clamp_height(lines: usize) -> u16 {
    lines.min(u16::MAX as usize) as u16
}
