//! Core types for the Watson launcher.
//!
//! This crate contains shared data structures that are used across all Watson crates:
//! - Search results and the actions they carry
//! - Notes and the scratchpad
//! - User settings persisted by the backend
//! - Launcher configuration (layout, keybindings)
//! - Error types

mod action;
mod config;
mod error;
mod note;
mod result;
mod settings;

pub use action::SearchAction;
pub use config::{
    config_dir, launcher_config_path, load_config, load_config_from, KeyBindingConfig,
    LauncherConfig, LayoutConfig,
};
pub use error::{BackendError, ConfigError};
pub use note::{extract_tags, Note, NoteDraft, Scratchpad};
pub use result::{ResultKind, SearchResult};
pub use settings::{
    ActivationSettings, CustomTheme, FileSearchSettings, GeneralSettings, SearchSettings,
    Settings, ThemeSettings, WebSearch,
};
