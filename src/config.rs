//! Timeline configuration.
//!
//! A small TOML file covering the knobs embedders most often override:
//! theme, markdown rendering, output following, and the metadata toggle
//! key. Every field is optional; absent fields fall back to defaults so
//! a missing file behaves like an empty one.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timeline::entities::log_event::LogEventFactory;
use crate::timeline::entities::markdown::MarkdownFactory;
use crate::timeline::entities::structured_log::StructuredLogFactory;
use crate::timeline::registry::EntityRegistry;
use crate::ui::theme::Theme;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TimelineConfig {
    /// UI theme name (e.g. "dark", "light").
    pub theme: Option<String>,
    /// Render markdown entities with styling.
    pub markdown: Option<bool>,
    /// Keep the viewport pinned to new output until the user navigates.
    pub follow_output: Option<bool>,
    /// Key that expands or collapses metadata on log entities.
    pub metadata_toggle_key: Option<char>,
}

impl TimelineConfig {
    pub fn load() -> Result<TimelineConfig, ConfigError> {
        Self::load_from_path(&Self::default_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<TimelineConfig, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok(TimelineConfig::default());
        }
        let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(ConfigError::Parse)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, contents).map_err(ConfigError::Io)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("org", "permacommons", "chyron").ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    pub fn theme(&self) -> Theme {
        self.theme
            .as_deref()
            .and_then(Theme::from_name)
            .unwrap_or_default()
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }

    pub fn follow_output_enabled(&self) -> bool {
        self.follow_output.unwrap_or(true)
    }

    pub fn metadata_toggle_key(&self) -> char {
        self.metadata_toggle_key.unwrap_or('m')
    }

    /// Build the entity registry this configuration asks for: built-in
    /// factories with the markdown variant and toggle key applied.
    pub fn registry(&self) -> EntityRegistry {
        let registry = EntityRegistry::with_builtins();
        if !self.markdown_enabled() {
            registry.register(Arc::new(MarkdownFactory::raw()));
        }
        let key = self.metadata_toggle_key();
        if key != 'm' {
            registry.register(Arc::new(LogEventFactory::with_toggle_key(key)));
            registry.register(Arc::new(StructuredLogFactory::with_toggle_key(key)));
        }
        registry
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config file error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Serialize(e) => write!(f, "config serialize error: {e}"),
            ConfigError::NoConfigDir => write!(f, "could not determine config directory"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
            ConfigError::NoConfigDir => None,
        }
    }
}
