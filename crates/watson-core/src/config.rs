//! Launcher configuration.
//!
//! User settings live in the backend. This file covers what only the front end
//! cares about: layout metrics for window sizing and keybinding overrides, read
//! from `launcher.toml` in the Watson config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Front-end configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Layout metrics used to size the window.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Keybinding overrides, applied after the defaults.
    #[serde(default)]
    pub keymap: Vec<KeyBindingConfig>,
}

/// Fixed layout metrics, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub header_height: u32,
    pub search_height: u32,
    pub result_row_height: u32,
    /// Cap on the results panel; longer lists scroll.
    pub max_results_height: u32,
    pub settings_height: u32,
    pub scratchpad_height: u32,
    pub note_editor_height: u32,
    /// Height of the quick-tips panel shown with no results.
    pub empty_state_height: u32,
    /// Extra room for rounded corners.
    pub padding: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_height: 56,
            search_height: 56,
            result_row_height: 64,
            max_results_height: 320,
            settings_height: 350,
            scratchpad_height: 300,
            note_editor_height: 380,
            empty_state_height: 110,
            padding: 28,
        }
    }
}

/// One keybinding entry, e.g. `{ key = "ctrl+j", action = "cursor_down" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindingConfig {
    /// Keystroke string, e.g. "ctrl+n" or "shift-tab".
    pub key: String,

    /// Built-in action name, e.g. "cursor_down".
    pub action: String,

    /// Keymap context. Defaults to "Launcher".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("watson"))
}

/// Get the path to launcher.toml.
pub fn launcher_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("launcher.toml"))
}

/// Load launcher.toml from the config directory.
///
/// A missing file yields the default configuration.
pub fn load_config() -> Result<LauncherConfig, ConfigError> {
    let path = launcher_config_path().ok_or(ConfigError::NoConfigDir)?;
    load_config_from(&path)
}

/// Load a launcher config file. A missing file yields the default configuration.
pub fn load_config_from(path: &Path) -> Result<LauncherConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(LauncherConfig::default());
        }
        Err(e) => return Err(ConfigError::Io(format!("{}: {}", path.display(), e))),
    };

    toml::from_str(&raw).map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
}
