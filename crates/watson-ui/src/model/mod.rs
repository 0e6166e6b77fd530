//! State model for the Watson launcher.
//!
//! This module contains the state machine and data structures that drive the launcher.
//! All types are backend-independent for testability.

mod state;

pub use state::{LauncherState, ModeKind, NoteEditorState, ViewMode};
