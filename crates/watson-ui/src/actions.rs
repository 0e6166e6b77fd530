//! Centralized actions for the Watson launcher.
//!
//! Every key the launcher intercepts resolves to one of these actions through
//! the keymap. Names are the strings used in `launcher.toml`.

// =============================================================================
// Launcher Actions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LauncherAction {
    // Navigation
    CursorUp,
    CursorDown,

    // Execution
    Submit,
    Dismiss,

    // Shortcuts
    OpenScratchpad,
    NewNote,
    SearchNotes,
    SearchFiles,

    // Overlays
    CloseScratchpad,
    SaveNote,
    CloseNoteEditor,
    ToggleSettings,
    CloseSettings,
}

impl LauncherAction {
    /// Name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            LauncherAction::CursorUp => "cursor_up",
            LauncherAction::CursorDown => "cursor_down",
            LauncherAction::Submit => "submit",
            LauncherAction::Dismiss => "dismiss",
            LauncherAction::OpenScratchpad => "open_scratchpad",
            LauncherAction::NewNote => "new_note",
            LauncherAction::SearchNotes => "search_notes",
            LauncherAction::SearchFiles => "search_files",
            LauncherAction::CloseScratchpad => "close_scratchpad",
            LauncherAction::SaveNote => "save_note",
            LauncherAction::CloseNoteEditor => "close_note_editor",
            LauncherAction::ToggleSettings => "toggle_settings",
            LauncherAction::CloseSettings => "close_settings",
        }
    }
}

// =============================================================================
// Action Lookup
// =============================================================================

/// Look up an action by name.
pub fn action_from_name(name: &str) -> Option<LauncherAction> {
    available_actions()
        .iter()
        .copied()
        .find(|action| action.name() == name)
}

/// Get all available actions.
pub fn available_actions() -> &'static [LauncherAction] {
    &[
        // Navigation
        LauncherAction::CursorUp,
        LauncherAction::CursorDown,
        // Execution
        LauncherAction::Submit,
        LauncherAction::Dismiss,
        // Shortcuts
        LauncherAction::OpenScratchpad,
        LauncherAction::NewNote,
        LauncherAction::SearchNotes,
        LauncherAction::SearchFiles,
        // Overlays
        LauncherAction::CloseScratchpad,
        LauncherAction::SaveNote,
        LauncherAction::CloseNoteEditor,
        LauncherAction::ToggleSettings,
        LauncherAction::CloseSettings,
    ]
}
