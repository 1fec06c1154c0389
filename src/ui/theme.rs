use ratatui::style::{Color, Modifier, Style};

/// Style slots the timeline and its entity models draw from.
///
/// Widths and theme participate in every cache key, so two themes that
/// hash differently never share cached renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Theme {
    // Plain and streaming text
    pub text_style: Style,
    pub error_text_style: Style,
    pub selected_marker_style: Style,
    pub focus_border_style: Style,

    // Role prefixes
    pub user_prefix_style: Style,
    pub assistant_prefix_style: Style,
    pub system_prefix_style: Style,

    // Tool activity
    pub tool_title_style: Style,
    pub tool_result_style: Style,
    pub code_block_style: Style,

    // Log severities
    pub log_error_style: Style,
    pub log_warn_style: Style,
    pub log_info_style: Style,
    pub log_debug_style: Style,
    pub log_trace_style: Style,
    pub metadata_style: Style,

    // Web search panel
    pub search_status_style: Style,
    pub search_url_style: Style,
    pub search_snippet_style: Style,

    // Banners and markdown
    pub accent_border_style: Style,
    pub md_heading_style: Style,
    pub md_emphasis_style: Style,
    pub md_code_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            text_style: Style::default().fg(Color::White),
            error_text_style: Style::default().fg(Color::Red),
            selected_marker_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            focus_border_style: Style::default().fg(Color::Cyan),

            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            assistant_prefix_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            system_prefix_style: Style::default().fg(Color::DarkGray),

            tool_title_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tool_result_style: Style::default().fg(Color::Magenta),
            code_block_style: Style::default().fg(Color::Gray),

            log_error_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            log_warn_style: Style::default().fg(Color::Yellow),
            log_info_style: Style::default().fg(Color::Green),
            log_debug_style: Style::default().fg(Color::Blue),
            log_trace_style: Style::default().fg(Color::DarkGray),
            metadata_style: Style::default().fg(Color::DarkGray),

            search_status_style: Style::default().fg(Color::Cyan),
            search_url_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            search_snippet_style: Style::default().fg(Color::Gray),

            accent_border_style: Style::default().fg(Color::Magenta),
            md_heading_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            md_emphasis_style: Style::default().add_modifier(Modifier::ITALIC),
            md_code_style: Style::default().fg(Color::Gray),
        }
    }

    pub fn light() -> Self {
        Theme {
            text_style: Style::default().fg(Color::Black),
            error_text_style: Style::default().fg(Color::Red),
            selected_marker_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            focus_border_style: Style::default().fg(Color::Blue),

            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            assistant_prefix_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            system_prefix_style: Style::default().fg(Color::Gray),

            tool_title_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tool_result_style: Style::default().fg(Color::Magenta),
            code_block_style: Style::default().fg(Color::DarkGray),

            log_error_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            log_warn_style: Style::default().fg(Color::Yellow),
            log_info_style: Style::default().fg(Color::Green),
            log_debug_style: Style::default().fg(Color::Blue),
            log_trace_style: Style::default().fg(Color::Gray),
            metadata_style: Style::default().fg(Color::Gray),

            search_status_style: Style::default().fg(Color::Blue),
            search_url_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            search_snippet_style: Style::default().fg(Color::DarkGray),

            accent_border_style: Style::default().fg(Color::Magenta),
            md_heading_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            md_emphasis_style: Style::default().add_modifier(Modifier::ITALIC),
            md_code_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark_default()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Style for a log severity name; unknown levels render as info.
    pub fn level_style(&self, level: &str) -> Style {
        match level.to_lowercase().as_str() {
            "error" | "fatal" | "critical" => self.log_error_style,
            "warn" | "warning" => self.log_warn_style,
            "debug" => self.log_debug_style,
            "trace" => self.log_trace_style,
            _ => self.log_info_style,
        }
    }

    /// Stable hash used as the theme component of cache keys.
    pub fn signature(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut h = DefaultHasher::new();
        self.hash(&mut h);
        h.finish()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}
