use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persisted application preferences: window geometry, panel widths, the
/// last selected snippet and the search/view toggles. Any failure to read
/// or parse the file falls back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_width: u32,
    pub window_height: u32,
    pub window_x: i32,
    pub window_y: i32,
    pub source_list_width: u32,
    pub editor_width: u32,
    pub selected_snippet: Option<String>,

    pub search_in_name: bool,
    pub search_in_tags: bool,
    pub search_in_code: bool,
    pub search_in_comment: bool,
    pub search_case_sensitive: bool,

    pub show_line_numbers: bool,
    pub show_comment_panel: bool,
    pub auto_hide_comment_panel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 750,
            window_height: 580,
            window_x: 100,
            window_y: 50,
            source_list_width: 250,
            editor_width: 311,
            selected_snippet: None,
            search_in_name: true,
            search_in_tags: true,
            search_in_code: true,
            search_in_comment: false,
            search_case_sensitive: false,
            show_line_numbers: true,
            show_comment_panel: true,
            auto_hide_comment_panel: false,
        }
    }
}

impl Settings {
    /// Platform config file, e.g. `~/.config/snipkeep/settings.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("snipkeep");
        Ok(dir.join("settings.toml"))
    }

    /// Loads settings from `path`, falling back to defaults on any error.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                debug!("settings file not readable ({err}), using defaults");
                return Self::default();
            }
        };

        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("settings file is malformed ({err}), using defaults");
                Self::default()
            }
        }
    }

    pub fn load_default() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load(&path),
            Err(err) => {
                warn!("no config directory ({err}), using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn save_default(&self) -> Result<()> {
        self.save(&Self::default_path()?)
    }
}
