//! Launcher state model.
//!
//! `LauncherState` holds everything the launcher shows: the query, the latest
//! result set, the selection cursor and the active view mode. Methods here are
//! synchronous transitions; the coordinator in `launcher.rs` performs the
//! backend calls around them.

use watson_core::{LayoutConfig, Note, NoteDraft, Scratchpad, SearchResult, Settings};

use crate::geometry;

// =============================================================================
// View Mode State Machine
// =============================================================================

/// The active panel. Exactly one is active; overlays replace each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Query and ranked results (the fallback).
    #[default]
    Results,
    /// Settings panel.
    Settings,
    /// Scratch note pad.
    Scratchpad,
    /// Note editor, carrying the note being edited.
    NoteEditor(NoteEditorState),
}

impl ViewMode {
    /// Payload-free discriminant, used for keymap contexts and geometry.
    pub fn kind(&self) -> ModeKind {
        match self {
            ViewMode::Results => ModeKind::Results,
            ViewMode::Settings => ModeKind::Settings,
            ViewMode::Scratchpad => ModeKind::Scratchpad,
            ViewMode::NoteEditor(_) => ModeKind::NoteEditor,
        }
    }

    pub fn note_editor(&self) -> Option<&NoteEditorState> {
        match self {
            ViewMode::NoteEditor(editor) => Some(editor),
            _ => None,
        }
    }

    pub fn note_editor_mut(&mut self) -> Option<&mut NoteEditorState> {
        match self {
            ViewMode::NoteEditor(editor) => Some(editor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Results,
    Settings,
    Scratchpad,
    NoteEditor,
}

/// Note editor state. `note` is `None` when creating a new note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEditorState {
    note: Option<Note>,
    /// Editable title and content.
    pub draft: NoteDraft,
}

impl NoteEditorState {
    pub fn new(note: Option<Note>) -> Self {
        let draft = note.as_ref().map(NoteDraft::from).unwrap_or_default();
        Self { note, draft }
    }

    /// The note being edited, if it already exists.
    pub fn note(&self) -> Option<&Note> {
        self.note.as_ref()
    }

    pub fn is_new(&self) -> bool {
        self.note.is_none()
    }
}

// =============================================================================
// Launcher State
// =============================================================================

/// Everything the launcher displays.
///
/// Invariant: when the query is blank the result set is empty and the cursor
/// is 0.
#[derive(Debug, Default)]
pub struct LauncherState {
    query: String,
    results: Vec<SearchResult>,
    cursor_index: usize,
    mode: ViewMode,
    settings: Option<Settings>,
    scratch_content: String,
    visible: bool,
    indexing: bool,
    indexed_file_count: usize,

    // Generation counters for async cancellation, one per request class.
    search_generation: u64,
    note_fetch_generation: u64,
    note_edit_generation: u64,
    scratch_generation: u64,
}

impl LauncherState {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.cursor_index
    }

    /// The result under the cursor.
    pub fn selected(&self) -> Option<&SearchResult> {
        self.results.get(self.cursor_index)
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    pub fn scratch_content(&self) -> &str {
        &self.scratch_content
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_indexing(&self) -> bool {
        self.indexing
    }

    pub fn indexed_file_count(&self) -> usize {
        self.indexed_file_count
    }

    /// Window height derived from the current mode and result count.
    pub fn window_height(&self, layout: &LayoutConfig) -> u32 {
        geometry::window_height(layout, self.mode.kind(), self.results.len())
    }

    // -------------------------------------------------------------------------
    // Query / Search
    // -------------------------------------------------------------------------

    /// Replace the query and invalidate any in-flight search.
    ///
    /// Returns the generation to tag the search request with, or `None` when
    /// the query is blank and results were cleared synchronously.
    pub fn begin_query(&mut self, text: String) -> Option<u64> {
        self.search_generation += 1;
        self.cursor_index = 0;
        self.query = text;

        if self.query.trim().is_empty() {
            self.results.clear();
            return None;
        }
        Some(self.search_generation)
    }

    /// Apply a search response. Returns false if a newer query superseded it.
    pub fn apply_search_results(&mut self, generation: u64, results: Vec<SearchResult>) -> bool {
        if generation != self.search_generation {
            return false;
        }
        self.results = results;
        self.clamp_cursor();
        true
    }

    /// Clear query, results and cursor, and drop any in-flight search.
    pub fn reset_query(&mut self) {
        self.search_generation += 1;
        self.query.clear();
        self.results.clear();
        self.cursor_index = 0;
    }

    // -------------------------------------------------------------------------
    // Selection Cursor
    // -------------------------------------------------------------------------

    /// Move the cursor by `delta`, clamped to the result set.
    pub fn move_selection(&mut self, delta: isize) {
        let Some(last) = self.results.len().checked_sub(1) else {
            self.cursor_index = 0;
            return;
        };
        self.cursor_index = self.cursor_index.saturating_add_signed(delta).min(last);
    }

    /// Set the cursor. Out-of-range indices are ignored.
    pub fn set_selected_index(&mut self, index: usize) {
        if index < self.results.len() {
            self.cursor_index = index;
        }
    }

    fn clamp_cursor(&mut self) {
        if self.cursor_index >= self.results.len() {
            self.cursor_index = self.results.len().saturating_sub(1);
        }
    }

    // -------------------------------------------------------------------------
    // Mode Transitions
    // -------------------------------------------------------------------------

    fn set_mode(&mut self, mode: ViewMode) {
        tracing::debug!("mode {:?} -> {:?}", self.mode.kind(), mode.kind());
        // Note fetches and saves started before this transition must not act on it.
        self.note_fetch_generation += 1;
        self.note_edit_generation += 1;
        self.mode = mode;
    }

    /// Settings <-> Results. Entering Settings leaves any other overlay.
    pub fn toggle_settings(&mut self) {
        if self.mode == ViewMode::Settings {
            self.set_mode(ViewMode::Results);
        } else {
            self.set_mode(ViewMode::Settings);
        }
    }

    /// Returns true if Settings was active.
    pub fn leave_settings(&mut self) -> bool {
        self.leave(ModeKind::Settings)
    }

    pub fn enter_scratchpad(&mut self) {
        self.set_mode(ViewMode::Scratchpad);
    }

    /// Returns true if the scratchpad was active.
    pub fn leave_scratchpad(&mut self) -> bool {
        self.leave(ModeKind::Scratchpad)
    }

    pub fn enter_note_editor(&mut self, note: Option<Note>) {
        self.set_mode(ViewMode::NoteEditor(NoteEditorState::new(note)));
    }

    /// Returns true if the note editor was active. The current note is dropped.
    pub fn leave_note_editor(&mut self) -> bool {
        self.leave(ModeKind::NoteEditor)
    }

    fn leave(&mut self, kind: ModeKind) -> bool {
        if self.mode.kind() != kind {
            return false;
        }
        self.set_mode(ViewMode::Results);
        true
    }

    /// Start fetching a note for the editor, superseding earlier fetches.
    pub fn begin_note_fetch(&mut self) -> u64 {
        self.note_fetch_generation += 1;
        self.note_fetch_generation
    }

    /// Enter the editor with a fetched note, unless the fetch is stale.
    pub fn apply_fetched_note(&mut self, generation: u64, note: Note) -> bool {
        if generation != self.note_fetch_generation {
            return false;
        }
        self.enter_note_editor(Some(note));
        true
    }

    /// Start a save or delete of the note being edited.
    pub fn begin_note_edit(&mut self) -> u64 {
        self.note_edit_generation += 1;
        self.note_edit_generation
    }

    /// Leave the editor after a save or delete, unless the user moved on.
    pub fn finish_note_edit(&mut self, generation: u64) -> bool {
        generation == self.note_edit_generation && self.leave_note_editor()
    }

    pub fn note_draft_mut(&mut self) -> Option<&mut NoteDraft> {
        self.mode.note_editor_mut().map(|editor| &mut editor.draft)
    }

    // -------------------------------------------------------------------------
    // Scratchpad
    // -------------------------------------------------------------------------

    /// Start a scratchpad load, superseding earlier loads and saves.
    pub fn begin_scratch_sync(&mut self) -> u64 {
        self.scratch_generation += 1;
        self.scratch_generation
    }

    /// Apply a local edit and return the generation for the backend write.
    pub fn edit_scratch(&mut self, content: String) -> u64 {
        self.scratch_content = content;
        self.begin_scratch_sync()
    }

    /// Replace the local copy with the backend's, unless a newer edit exists.
    pub fn apply_scratchpad(&mut self, generation: u64, scratchpad: Scratchpad) -> bool {
        if generation != self.scratch_generation {
            return false;
        }
        self.scratch_content = scratchpad.content;
        true
    }

    // -------------------------------------------------------------------------
    // Misc
    // -------------------------------------------------------------------------

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = Some(settings);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Fresh state for a hotkey reveal: empty query, Results mode.
    pub fn reset_for_show(&mut self) {
        self.reset_query();
        if self.mode != ViewMode::Results {
            self.set_mode(ViewMode::Results);
        }
        self.visible = true;
    }

    pub fn set_indexing(&mut self, indexing: bool) {
        self.indexing = indexing;
    }

    pub fn set_indexed_file_count(&mut self, count: usize) {
        self.indexed_file_count = count;
    }
}

// =============================================================================
// Tests
// =============================================================================
