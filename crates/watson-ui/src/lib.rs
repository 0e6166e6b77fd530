//! Front-end control layer for the Watson launcher.
//!
//! This crate provides:
//! - `Launcher`, the coordinator that owns launcher state and sequences
//!   backend calls
//! - The view-mode state model and window geometry
//! - Keyboard routing through a configurable keymap
//! - The `Backend` gateway trait and an in-process implementation
//! - Failure sinks for swallowed backend errors

pub mod actions;
pub mod backend;
pub mod diagnostics;
pub mod geometry;
pub mod keymap;
pub mod launcher;
pub mod model;
pub mod router;

// Re-export commonly used types
pub use actions::{action_from_name, available_actions, LauncherAction};
pub use backend::{Backend, BackendFuture, LocalBackend};
pub use diagnostics::{Failure, FailureSink, Operation, RecordingSink, TracingSink};
pub use geometry::window_height;
pub use keymap::{Key, KeyBinding, KeymapContext, KeymapRegistry, Keystroke};
pub use launcher::{KeyOutcome, Launcher};
pub use model::{LauncherState, ModeKind, NoteEditorState, ViewMode};
pub use router::{route_key, KeyRoute, TextEdit};
