//! Keybinding registry.
//!
//! Keystrokes resolve to [`LauncherAction`]s per context. Defaults are
//! registered first, then overrides from `launcher.toml`; a later binding for
//! the same (keystroke, context) replaces the earlier one.
//!
//! ## Contexts
//!
//! - `Shortcut`: Results mode with an empty query (single-letter shortcuts)
//! - `Launcher`: Results mode
//! - `Settings`, `Scratchpad`, `NoteEditor`: the matching overlay

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use watson_core::{ConfigError, KeyBindingConfig};

use crate::actions::{action_from_name, LauncherAction};
use crate::model::ModeKind;

// =============================================================================
// Keystrokes
// =============================================================================

/// A logical key, independent of platform key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
    Home,
    End,
    /// A printable character, always stored lowercase for letters.
    Char(char),
}

/// A key plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub cmd: bool,
}

impl Keystroke {
    /// A key with no modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            alt: false,
            cmd: false,
        }
    }

    /// A typed character. Uppercase letters become shift + lowercase when the
    /// case mapping round-trips; others ('İ', 'ẞ') stay as typed.
    pub fn typed(c: char) -> Self {
        match single_char(c.to_lowercase()) {
            Some(lower) if lower != c && single_char(lower.to_uppercase()) == Some(c) => {
                Self::new(Key::Char(lower)).with_shift()
            }
            _ => Self::new(Key::Char(c)),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[cfg(test)]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[cfg(test)]
    pub fn with_cmd(mut self) -> Self {
        self.cmd = true;
        self
    }

    /// Parse "ctrl+n", "shift-tab", "N" or "`".
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidBinding(format!("Invalid keystroke '{}'", s));

        let parts = split_keystroke(s.trim());
        let (key_part, modifiers) = parts.split_last().ok_or_else(invalid)?;

        let mut keystroke = parse_key(key_part).ok_or_else(invalid)?;
        for modifier in modifiers {
            match modifier.to_ascii_lowercase().as_str() {
                "shift" => keystroke.shift = true,
                "ctrl" | "control" => keystroke.ctrl = true,
                "alt" | "option" => keystroke.alt = true,
                "cmd" | "super" | "meta" | "win" => keystroke.cmd = true,
                _ => return Err(invalid()),
            }
        }
        Ok(keystroke)
    }

    /// The character this keystroke inserts into a text field, if any.
    pub fn text(&self) -> Option<char> {
        if self.ctrl || self.alt || self.cmd {
            return None;
        }
        match self.key {
            Key::Char(c) if self.shift => Some(single_char(c.to_uppercase()).unwrap_or(c)),
            Key::Char(c) => Some(c),
            _ => None,
        }
    }

    /// True when no modifier is held.
    pub fn is_plain(&self) -> bool {
        !(self.shift || self.ctrl || self.alt || self.cmd)
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (held, name) in [
            (self.cmd, "cmd"),
            (self.ctrl, "ctrl"),
            (self.alt, "alt"),
            (self.shift, "shift"),
        ] {
            if held {
                write!(f, "{}+", name)?;
            }
        }
        match self.key {
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Tab => f.write_str("tab"),
            Key::Enter => f.write_str("enter"),
            Key::Escape => f.write_str("escape"),
            Key::Backspace => f.write_str("backspace"),
            Key::Delete => f.write_str("delete"),
            Key::Home => f.write_str("home"),
            Key::End => f.write_str("end"),
            Key::Char(' ') => f.write_str("space"),
            Key::Char(c) => write!(f, "{}", c),
        }
    }
}

/// The only char of a case mapping, if it maps to exactly one.
fn single_char(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Split on '+', or on '-' for the "cmd-shift-z" style. A lone separator is a key.
fn split_keystroke(s: &str) -> Vec<&str> {
    if s.chars().count() <= 1 {
        return vec![s];
    }
    let separator = if s.contains('+') { '+' } else { '-' };
    match s.strip_suffix(separator) {
        // "ctrl++" / "ctrl--": the key is the separator itself
        Some(head) if head.ends_with(separator) => {
            let mut parts: Vec<&str> = head[..head.len() - 1].split(separator).collect();
            parts.push(&s[s.len() - 1..]);
            parts
        }
        _ => s.split(separator).collect(),
    }
}

fn parse_key(name: &str) -> Option<Keystroke> {
    let key = match name.to_ascii_lowercase().as_str() {
        "" => return None,
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "tab" => Key::Tab,
        "enter" | "return" => Key::Enter,
        "escape" | "esc" => Key::Escape,
        "backspace" => Key::Backspace,
        "delete" => Key::Delete,
        "home" => Key::Home,
        "end" => Key::End,
        "space" => Key::Char(' '),
        "backtick" => Key::Char('`'),
        _ => {
            let mut chars = name.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            return Some(Keystroke::typed(c));
        }
    };
    Some(Keystroke::new(key))
}

// =============================================================================
// Contexts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeymapContext {
    /// Results mode with an empty query.
    Shortcut,
    /// Results mode.
    Launcher,
    Settings,
    Scratchpad,
    NoteEditor,
}

impl KeymapContext {
    /// The context that owns keys in the given mode.
    pub fn for_mode(mode: ModeKind) -> Self {
        match mode {
            ModeKind::Results => KeymapContext::Launcher,
            ModeKind::Settings => KeymapContext::Settings,
            ModeKind::Scratchpad => KeymapContext::Scratchpad,
            ModeKind::NoteEditor => KeymapContext::NoteEditor,
        }
    }
}

impl FromStr for KeymapContext {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Shortcut" => Ok(KeymapContext::Shortcut),
            "Launcher" => Ok(KeymapContext::Launcher),
            "Settings" => Ok(KeymapContext::Settings),
            "Scratchpad" => Ok(KeymapContext::Scratchpad),
            "NoteEditor" => Ok(KeymapContext::NoteEditor),
            other => Err(ConfigError::InvalidBinding(format!(
                "Unknown keymap context '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// Keymap Registry
// =============================================================================

/// A resolved keybinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub keystroke: Keystroke,
    pub action: LauncherAction,
    pub context: KeymapContext,
}

impl KeyBinding {
    fn parse(key: &str, action: &str, context: KeymapContext) -> Result<Self, ConfigError> {
        let keystroke = Keystroke::parse(key)?;
        let action = action_from_name(action)
            .ok_or_else(|| ConfigError::InvalidBinding(format!("Unknown action '{}'", action)))?;
        Ok(Self {
            keystroke,
            action,
            context,
        })
    }
}

/// Composite key for deduplication: (keystroke, context).
type BindingKey = (Keystroke, KeymapContext);

#[derive(Debug, Clone, Default)]
pub struct KeymapRegistry {
    bindings: HashMap<BindingKey, LauncherAction>,
}

impl KeymapRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the default bindings.
    pub fn with_defaults() -> Self {
        let mut keymap = Self::new();
        register_default_bindings(&mut keymap);
        keymap
    }

    /// Add a binding. If the same (keystroke, context) exists, it's overwritten.
    pub fn set(&mut self, binding: KeyBinding) {
        self.bindings
            .insert((binding.keystroke, binding.context), binding.action);
    }

    /// Remove a binding. Returns true if it existed.
    pub fn del(&mut self, keystroke: &Keystroke, context: KeymapContext) -> bool {
        self.bindings.remove(&(*keystroke, context)).is_some()
    }

    /// Resolve a keystroke in a context.
    pub fn lookup(&self, context: KeymapContext, keystroke: &Keystroke) -> Option<LauncherAction> {
        self.bindings.get(&(*keystroke, context)).copied()
    }

    /// Apply bindings from `launcher.toml`.
    ///
    /// Valid entries are applied even if others fail; the failures are returned.
    pub fn apply_config(&mut self, entries: &[KeyBindingConfig]) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for entry in entries {
            let binding = entry
                .context
                .as_deref()
                .map_or(Ok(KeymapContext::Launcher), str::parse)
                .and_then(|context| KeyBinding::parse(&entry.key, &entry.action, context));

            match binding {
                Ok(binding) => {
                    tracing::debug!(
                        "Registered binding: {} -> {} ({:?})",
                        binding.keystroke,
                        binding.action.name(),
                        binding.context
                    );
                    self.set(binding);
                }
                Err(e) => errors.push(e),
            }
        }

        errors
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}

// =============================================================================
// Default Keybindings
// =============================================================================

const DEFAULT_BINDINGS: &[(&str, &str, KeymapContext)] = &[
    // Shortcuts - empty query only
    ("s", "open_scratchpad", KeymapContext::Shortcut),
    ("`", "open_scratchpad", KeymapContext::Shortcut),
    ("n", "new_note", KeymapContext::Shortcut),
    ("shift+n", "search_notes", KeymapContext::Shortcut),
    ("f", "search_files", KeymapContext::Shortcut),
    // Navigation - Launcher context
    ("up", "cursor_up", KeymapContext::Launcher),
    ("down", "cursor_down", KeymapContext::Launcher),
    ("tab", "cursor_down", KeymapContext::Launcher),
    ("shift+tab", "cursor_up", KeymapContext::Launcher),
    ("enter", "submit", KeymapContext::Launcher),
    ("escape", "dismiss", KeymapContext::Launcher),
    ("cmd+,", "toggle_settings", KeymapContext::Launcher),
    // Overlays
    ("escape", "close_settings", KeymapContext::Settings),
    ("cmd+,", "toggle_settings", KeymapContext::Settings),
    ("escape", "close_scratchpad", KeymapContext::Scratchpad),
    ("escape", "close_note_editor", KeymapContext::NoteEditor),
    ("ctrl+s", "save_note", KeymapContext::NoteEditor),
    ("cmd+s", "save_note", KeymapContext::NoteEditor),
];

/// Register the default bindings. Called before user overrides are applied.
pub fn register_default_bindings(keymap: &mut KeymapRegistry) {
    for (key, action, context) in DEFAULT_BINDINGS {
        match KeyBinding::parse(key, action, *context) {
            Ok(binding) => keymap.set(binding),
            Err(e) => tracing::warn!("Skipping default binding '{}': {}", key, e),
        }
    }

    tracing::debug!("Registered {} default bindings", keymap.binding_count());
}
