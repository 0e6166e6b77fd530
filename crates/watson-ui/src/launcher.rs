//! Launcher coordinator.
//!
//! `Launcher` owns the state and sequences backend calls around its
//! transitions. Every method follows the same shape: mutate state under the
//! lock, release it, await the backend, then re-lock to apply the response if
//! its generation is still current. The lock is never held across an await.
//!
//! Backend failures are resolved here to a safe default and reported to the
//! `FailureSink`; nothing is returned to the caller as an error.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use unicode_segmentation::UnicodeSegmentation;
use watson_core::{BackendError, LayoutConfig, Settings};

use crate::actions::LauncherAction;
use crate::backend::Backend;
use crate::diagnostics::{Failure, FailureSink, Operation, TracingSink};
use crate::keymap::{KeymapRegistry, Keystroke};
use crate::model::LauncherState;
use crate::router::{route_key, KeyRoute, TextEdit};

/// What `handle_key` did with a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Resolved to an action, which has been carried out.
    Action(LauncherAction),
    /// Edited the query.
    Edited,
    /// Not handled.
    PassThrough,
}

/// Cloneable handle to the launcher. Clones share state.
#[derive(Clone)]
pub struct Launcher {
    backend: Arc<dyn Backend>,
    state: Arc<Mutex<LauncherState>>,
    keymap: Arc<KeymapRegistry>,
    layout: LayoutConfig,
    sink: Arc<dyn FailureSink>,
}

impl Launcher {
    /// Create a launcher with the default keymap, layout and tracing sink.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(LauncherState::new())),
            keymap: Arc::new(KeymapRegistry::with_defaults()),
            layout: LayoutConfig::default(),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_keymap(mut self, keymap: KeymapRegistry) -> Self {
        self.keymap = Arc::new(keymap);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Lock the state for reading. Do not hold the guard across an await.
    pub fn state(&self) -> MutexGuard<'_, LauncherState> {
        self.state.lock()
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Height the window should have for the current state.
    pub fn window_height(&self) -> u32 {
        self.state.lock().window_height(&self.layout)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Load settings and size the window for the empty state.
    pub async fn initialize(&self) {
        self.load_settings().await;
        self.request_resize().await;
        tracing::info!("Launcher initialized");
    }

    /// Reveal the launcher with a fresh query.
    pub async fn show(&self) {
        self.state.lock().reset_for_show();
        if let Err(e) = self.backend.show_window().await {
            self.record(Operation::ShowWindow, e);
        }
        self.request_resize().await;
    }

    pub async fn hide(&self) {
        self.state.lock().set_visible(false);
        if let Err(e) = self.backend.hide_window().await {
            self.record(Operation::HideWindow, e);
        }
    }

    // -------------------------------------------------------------------------
    // Query / Search
    // -------------------------------------------------------------------------

    /// Replace the query and search for it.
    ///
    /// A blank query clears results without a backend call. A failed search
    /// counts as an empty result set. Responses for superseded queries are
    /// dropped.
    pub async fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        let generation = self.state.lock().begin_query(text.clone());
        let Some(generation) = generation else {
            self.request_resize().await;
            return;
        };

        let results = match self.backend.search(text).await {
            Ok(results) => results,
            Err(e) => {
                self.record(Operation::Search, e);
                Vec::new()
            }
        };

        let applied = self.state.lock().apply_search_results(generation, results);
        if applied {
            self.request_resize().await;
        } else {
            tracing::debug!("Dropping stale search response (generation {})", generation);
        }
    }

    pub fn move_selection(&self, delta: isize) {
        self.state.lock().move_selection(delta);
    }

    pub fn set_selected_index(&self, index: usize) {
        self.state.lock().set_selected_index(index);
    }

    /// Reset the launcher, hide it, then run the selected result's action.
    ///
    /// The reset is not undone if hiding or the action fails.
    pub async fn execute_selected(&self) {
        let action = {
            let mut state = self.state.lock();
            let Some(action) = state.selected().map(|result| result.action.clone()) else {
                return;
            };
            state.reset_query();
            state.set_visible(false);
            action
        };

        tracing::debug!("Executing {}", action.label());

        if let Err(e) = self.backend.hide_window().await {
            self.record(Operation::HideWindow, e);
        }
        if let Err(e) = self.backend.execute_action(action).await {
            self.record(Operation::ExecuteAction, e);
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Route a keystroke and carry out the result.
    pub async fn handle_key(&self, keystroke: &Keystroke) -> KeyOutcome {
        let route = {
            let state = self.state.lock();
            route_key(&self.keymap, state.mode().kind(), state.query(), keystroke)
        };

        match route {
            KeyRoute::Action(action) => {
                self.dispatch(action).await;
                KeyOutcome::Action(action)
            }
            KeyRoute::Text(edit) => {
                let mut query = self.state.lock().query().to_string();
                match edit {
                    TextEdit::Insert(c) => query.push(c),
                    TextEdit::Backspace => {
                        if let Some((index, _)) = query.grapheme_indices(true).next_back() {
                            query.truncate(index);
                        }
                    }
                }
                self.set_query(query).await;
                KeyOutcome::Edited
            }
            KeyRoute::PassThrough => KeyOutcome::PassThrough,
        }
    }

    async fn dispatch(&self, action: LauncherAction) {
        match action {
            LauncherAction::CursorUp => self.move_selection(-1),
            LauncherAction::CursorDown => self.move_selection(1),
            LauncherAction::Submit => self.execute_selected().await,
            LauncherAction::Dismiss => {
                let has_query = !self.state.lock().query().is_empty();
                if has_query {
                    self.set_query(String::new()).await;
                } else {
                    self.hide().await;
                }
            }
            LauncherAction::OpenScratchpad => self.open_scratchpad().await,
            LauncherAction::NewNote => self.open_note_editor(None).await,
            LauncherAction::SearchNotes => self.set_query("n ").await,
            LauncherAction::SearchFiles => self.set_query("f ").await,
            LauncherAction::CloseScratchpad => self.close_scratchpad().await,
            LauncherAction::SaveNote => {
                self.save_note().await;
            }
            LauncherAction::CloseNoteEditor => self.close_note_editor().await,
            LauncherAction::ToggleSettings => self.toggle_settings().await,
            LauncherAction::CloseSettings => self.close_settings().await,
        }
    }

    // -------------------------------------------------------------------------
    // Mode Transitions
    // -------------------------------------------------------------------------

    pub async fn toggle_settings(&self) {
        self.state.lock().toggle_settings();
        self.request_resize().await;
    }

    pub async fn close_settings(&self) {
        let left = self.state.lock().leave_settings();
        if left {
            self.request_resize().await;
        }
    }

    /// Switch to the scratchpad, then load its content.
    pub async fn open_scratchpad(&self) {
        self.state.lock().enter_scratchpad();
        self.request_resize().await;
        self.load_scratchpad().await;
    }

    pub async fn close_scratchpad(&self) {
        let left = self.state.lock().leave_scratchpad();
        if left {
            self.request_resize().await;
        }
    }

    /// Open the note editor.
    ///
    /// With an id, the note is fetched first and the editor opens only if the
    /// fetch finds it and no later transition happened meanwhile. Without an
    /// id, the editor opens immediately for a new note.
    pub async fn open_note_editor(&self, note_id: Option<String>) {
        let Some(note_id) = note_id else {
            self.state.lock().enter_note_editor(None);
            self.request_resize().await;
            return;
        };

        let generation = self.state.lock().begin_note_fetch();
        match self.backend.get_note(note_id.clone()).await {
            Ok(Some(note)) => {
                let applied = self.state.lock().apply_fetched_note(generation, note);
                if applied {
                    self.request_resize().await;
                } else {
                    tracing::debug!("Dropping stale note fetch for {}", note_id);
                }
            }
            Ok(None) => tracing::debug!("Note {} not found", note_id),
            Err(e) => self.record(Operation::Note, e),
        }
    }

    /// Leave the note editor, dropping the current note and any unsaved draft.
    pub async fn close_note_editor(&self) {
        let left = self.state.lock().leave_note_editor();
        if left {
            self.request_resize().await;
        }
    }

    // -------------------------------------------------------------------------
    // Notes
    // -------------------------------------------------------------------------

    pub fn set_note_title(&self, title: impl Into<String>) {
        if let Some(draft) = self.state.lock().note_draft_mut() {
            draft.title = title.into();
        }
    }

    pub fn set_note_content(&self, content: impl Into<String>) {
        if let Some(draft) = self.state.lock().note_draft_mut() {
            draft.content = content.into();
        }
    }

    /// Create or update the note being edited, then close the editor.
    ///
    /// Returns false without calling the backend when the editor is not open
    /// or the title is blank, and false when the backend call fails.
    pub async fn save_note(&self) -> bool {
        let (generation, note_id, draft) = {
            let mut state = self.state.lock();
            let Some(editor) = state.mode().note_editor() else {
                return false;
            };
            if !editor.draft.can_save() {
                tracing::debug!("Note save blocked: title is blank");
                return false;
            }
            let note_id = editor.note().map(|note| note.id.clone());
            let draft = editor.draft.clone();
            (state.begin_note_edit(), note_id, draft)
        };

        let saved = match note_id {
            Some(id) => self.backend.update_note(id, draft.title, draft.content).await,
            None => self.backend.create_note(draft.title, draft.content).await,
        };

        match saved {
            Ok(note) => {
                tracing::debug!("Saved note {}", note.id);
                self.finish_note_edit(generation).await;
                true
            }
            Err(e) => {
                self.record(Operation::Note, e);
                false
            }
        }
    }

    /// Delete the note being edited, then close the editor.
    ///
    /// Returns false when no stored note is open or the backend call fails.
    pub async fn delete_note(&self) -> bool {
        let (generation, note_id) = {
            let mut state = self.state.lock();
            let Some(note_id) = state
                .mode()
                .note_editor()
                .and_then(|editor| editor.note())
                .map(|note| note.id.clone())
            else {
                return false;
            };
            (state.begin_note_edit(), note_id)
        };

        match self.backend.delete_note(note_id).await {
            Ok(()) => {
                self.finish_note_edit(generation).await;
                true
            }
            Err(e) => {
                self.record(Operation::Note, e);
                false
            }
        }
    }

    async fn finish_note_edit(&self, generation: u64) {
        let left = self.state.lock().finish_note_edit(generation);
        if left {
            self.request_resize().await;
        }
    }

    // -------------------------------------------------------------------------
    // Scratchpad
    // -------------------------------------------------------------------------

    /// Replace the local scratch content with the stored one.
    pub async fn load_scratchpad(&self) {
        let generation = self.state.lock().begin_scratch_sync();
        match self.backend.get_scratchpad().await {
            Ok(scratchpad) => {
                self.state.lock().apply_scratchpad(generation, scratchpad);
            }
            Err(e) => self.record(Operation::Scratchpad, e),
        }
    }

    /// Update the scratch content and write it through to the backend.
    pub async fn save_scratchpad(&self, content: impl Into<String>) {
        let content = content.into();
        let generation = self.state.lock().edit_scratch(content.clone());
        match self.backend.set_scratchpad(content).await {
            Ok(scratchpad) => {
                self.state.lock().apply_scratchpad(generation, scratchpad);
            }
            Err(e) => self.record(Operation::Scratchpad, e),
        }
    }

    pub async fn clear_scratchpad(&self) {
        let generation = self.state.lock().edit_scratch(String::new());
        match self.backend.clear_scratchpad().await {
            Ok(scratchpad) => {
                self.state.lock().apply_scratchpad(generation, scratchpad);
            }
            Err(e) => self.record(Operation::Scratchpad, e),
        }
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    pub async fn load_settings(&self) {
        match self.backend.get_settings().await {
            Ok(settings) => self.state.lock().set_settings(settings),
            Err(e) => self.record(Operation::GetSettings, e),
        }
    }

    /// Validate and save settings.
    ///
    /// Invalid web searches block the save and return false. Otherwise the
    /// local copy is replaced before the backend call, and stays replaced if
    /// that call fails.
    pub async fn save_settings(&self, settings: Settings) -> bool {
        if !settings.can_save() {
            for search in settings.invalid_web_searches() {
                tracing::debug!(
                    "Web search '{}' missing: {}",
                    search.name,
                    search.missing_fields().join(", ")
                );
            }
            return false;
        }

        self.state.lock().set_settings(settings.clone());
        if let Err(e) = self.backend.save_settings(settings).await {
            self.record(Operation::SaveSettings, e);
        }
        true
    }

    // -------------------------------------------------------------------------
    // Maintenance
    // -------------------------------------------------------------------------

    pub async fn reindex_apps(&self) {
        self.state.lock().set_indexing(true);
        let outcome = self.backend.reindex_apps().await;
        self.state.lock().set_indexing(false);

        match outcome {
            Ok(count) => tracing::info!("Indexed {} applications", count),
            Err(e) => self.record(Operation::ReindexApps, e),
        }
    }

    /// Rebuild the file index. Returns the file count, or 0 on failure.
    pub async fn reindex_files(&self) -> usize {
        match self.backend.reindex_files().await {
            Ok(count) => {
                self.state.lock().set_indexed_file_count(count);
                tracing::info!("Indexed {} files", count);
                count
            }
            Err(e) => {
                self.record(Operation::ReindexFiles, e);
                0
            }
        }
    }

    pub async fn clear_clipboard_history(&self) {
        if let Err(e) = self.backend.clear_clipboard_history().await {
            self.record(Operation::ClearClipboardHistory, e);
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Send the derived height to the backend. Failures are recorded only.
    async fn request_resize(&self) {
        let height = self.window_height();
        if let Err(e) = self.backend.resize_window(height).await {
            self.record(Operation::ResizeWindow, e);
        }
    }

    fn record(&self, operation: Operation, error: BackendError) {
        self.sink.record(Failure { operation, error });
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::backend::{ready, MockBackend};
    use crate::diagnostics::RecordingSink;
    use crate::keymap::Key;
    use crate::model::{ModeKind, ViewMode};
    use std::time::Duration;
    use tokio::time::sleep;
    use watson_core::{Note, ResultKind, SearchAction, SearchResult};

    const EMPTY_HEIGHT: u32 = 56 + 56 + 110 + 28;

    fn app(name: &str) -> SearchResult {
        SearchResult::new(
            format!("app:{name}"),
            name,
            ResultKind::Application,
            SearchAction::LaunchApp {
                path: format!("/Applications/{name}.app"),
            },
        )
    }

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: "body".to_string(),
            tags: vec![],
            created_at: 0,
            modified_at: 0,
        }
    }

    fn setup(backend: FakeBackend) -> (Launcher, Arc<FakeBackend>, Arc<RecordingSink>) {
        let backend = Arc::new(backend);
        let sink = Arc::new(RecordingSink::new());
        let launcher = Launcher::new(backend.clone()).with_sink(sink.clone());
        (launcher, backend, sink)
    }

    fn key(s: &str) -> Keystroke {
        Keystroke::parse(s).unwrap()
    }

    // -------------------------------------------------------------------------
    // Query / Search
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_blank_query_issues_no_search() {
        let mut backend = MockBackend::new();
        backend.expect_search().never();
        backend
            .expect_resize_window()
            .withf(|height| *height == EMPTY_HEIGHT)
            .times(2)
            .returning(|_| ready(Ok(())));

        let launcher = Launcher::new(Arc::new(backend));
        launcher.set_query("").await;
        launcher.set_query("   ").await;

        let state = launcher.state();
        assert!(state.results().is_empty());
        assert_eq!(state.selected_index(), 0);
    }

    #[tokio::test]
    async fn test_results_replace_and_cursor_resets() {
        let (launcher, backend, _) = setup(
            FakeBackend::new()
                .with_results("s", vec![app("Safari"), app("Slack"), app("Spotify")])
                .with_results("sa", vec![app("Safari")]),
        );

        launcher.set_query("s").await;
        launcher.move_selection(2);
        assert_eq!(launcher.state().selected_index(), 2);

        launcher.set_query("sa").await;
        {
            let state = launcher.state();
            assert_eq!(state.results(), &[app("Safari")]);
            assert_eq!(state.selected_index(), 0);
        }

        assert_eq!(backend.search_calls(), vec!["s", "sa"]);
        assert_eq!(backend.resizes(), vec![56 + 56 + 192 + 28, 56 + 56 + 64 + 28]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_older_response_is_dropped() {
        let (launcher, _, _) = setup(
            FakeBackend::new()
                .with_results("a", vec![app("Alacritty"), app("Arc")])
                .with_delay("a", Duration::from_millis(100))
                .with_results("ab", vec![app("Ableton")]),
        );

        tokio::join!(launcher.set_query("a"), async {
            sleep(Duration::from_millis(10)).await;
            launcher.set_query("ab").await;
        });

        let state = launcher.state();
        assert_eq!(state.query(), "ab");
        assert_eq!(state.results(), &[app("Ableton")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_newer_response_wins() {
        let (launcher, _, _) = setup(
            FakeBackend::new()
                .with_results("a", vec![app("Alacritty"), app("Arc")])
                .with_results("ab", vec![app("Ableton")])
                .with_delay("ab", Duration::from_millis(100)),
        );

        tokio::join!(launcher.set_query("a"), launcher.set_query("ab"));

        assert_eq!(launcher.state().results(), &[app("Ableton")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_query_drops_in_flight_search() {
        let (launcher, _, _) = setup(
            FakeBackend::new()
                .with_results("abc", vec![app("Abc")])
                .with_delay("abc", Duration::from_millis(50)),
        );

        tokio::join!(launcher.set_query("abc"), async {
            sleep(Duration::from_millis(10)).await;
            launcher.set_query("").await;
        });

        let state = launcher.state();
        assert!(state.query().is_empty());
        assert!(state.results().is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_yields_empty_results() {
        let (launcher, backend, sink) = setup(
            FakeBackend::new()
                .with_results("a", vec![app("Arc")])
                .failing("search"),
        );

        launcher.set_query("a").await;

        assert!(launcher.state().results().is_empty());
        assert_eq!(sink.operations(), vec![Operation::Search]);
        assert_eq!(backend.resizes(), vec![EMPTY_HEIGHT]);
    }

    // -------------------------------------------------------------------------
    // Keyboard Scenarios
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_n_opens_new_note() {
        let (launcher, backend, _) = setup(FakeBackend::new());

        let outcome = launcher.handle_key(&Keystroke::typed('n')).await;
        assert_eq!(outcome, KeyOutcome::Action(LauncherAction::NewNote));

        {
            let state = launcher.state();
            let editor = state.mode().note_editor().unwrap();
            assert!(editor.is_new());
        }
        assert_eq!(backend.resizes(), vec![56 + 56 + 380 + 28]);
        assert!(backend.search_calls().is_empty());
    }

    #[tokio::test]
    async fn test_shift_n_searches_notes() {
        let (launcher, backend, _) = setup(FakeBackend::new());

        launcher.handle_key(&Keystroke::typed('N')).await;

        assert_eq!(launcher.state().query(), "n ");
        assert_eq!(launcher.state().mode(), &ViewMode::Results);
        assert_eq!(backend.search_calls(), vec!["n "]);
    }

    #[tokio::test]
    async fn test_f_searches_files() {
        let (launcher, backend, _) = setup(FakeBackend::new());

        launcher.handle_key(&Keystroke::typed('f')).await;

        assert_eq!(backend.search_calls(), vec!["f "]);
    }

    #[tokio::test]
    async fn test_s_and_backtick_open_scratchpad() {
        for c in ['s', '`'] {
            let (launcher, backend, _) = setup(FakeBackend::new());

            launcher.handle_key(&Keystroke::typed(c)).await;

            assert_eq!(launcher.state().mode(), &ViewMode::Scratchpad);
            assert!(backend.calls().contains(&"get_scratchpad".to_string()));
        }
    }

    #[tokio::test]
    async fn test_letters_type_into_non_empty_query() {
        let (launcher, backend, _) = setup(FakeBackend::new());

        launcher.handle_key(&Keystroke::typed('a')).await;
        launcher.handle_key(&Keystroke::typed('s')).await;
        launcher.handle_key(&Keystroke::typed('N')).await;

        assert_eq!(launcher.state().query(), "asN");
        assert_eq!(launcher.state().mode(), &ViewMode::Results);
        assert_eq!(backend.search_calls(), vec!["a", "as", "asN"]);
    }

    #[tokio::test]
    async fn test_backspace_removes_grapheme() {
        let (launcher, _, _) = setup(FakeBackend::new());
        launcher.set_query("cafe\u{301}").await;

        let outcome = launcher.handle_key(&Keystroke::new(Key::Backspace)).await;

        assert_eq!(outcome, KeyOutcome::Edited);
        assert_eq!(launcher.state().query(), "caf");
    }

    #[tokio::test]
    async fn test_tab_twice_selects_third() {
        let (launcher, _, _) = setup(
            FakeBackend::new().with_results("a", vec![app("A1"), app("A2"), app("A3")]),
        );
        launcher.set_query("a").await;

        launcher.handle_key(&key("tab")).await;
        launcher.handle_key(&key("tab")).await;
        assert_eq!(launcher.state().selected_index(), 2);

        launcher.handle_key(&key("tab")).await;
        assert_eq!(launcher.state().selected_index(), 2);

        launcher.handle_key(&key("shift+tab")).await;
        launcher.handle_key(&key("up")).await;
        launcher.handle_key(&key("up")).await;
        assert_eq!(launcher.state().selected_index(), 0);
    }

    #[tokio::test]
    async fn test_escape_clears_query() {
        let (launcher, backend, _) =
            setup(FakeBackend::new().with_results("abc", vec![app("Abc")]));
        launcher.set_query("abc").await;

        launcher.handle_key(&key("escape")).await;

        let state = launcher.state();
        assert!(state.query().is_empty());
        assert!(state.results().is_empty());
        assert_eq!(backend.hide_count(), 0);
    }

    #[tokio::test]
    async fn test_escape_on_empty_query_hides() {
        let (launcher, backend, _) = setup(FakeBackend::new());
        launcher.show().await;

        launcher.handle_key(&key("escape")).await;

        assert_eq!(backend.hide_count(), 1);
        assert!(!launcher.state().is_visible());
    }

    #[tokio::test]
    async fn test_escape_closes_overlays() {
        let (launcher, _, _) = setup(FakeBackend::new());

        launcher.open_scratchpad().await;
        launcher.handle_key(&key("escape")).await;
        assert_eq!(launcher.state().mode(), &ViewMode::Results);

        launcher.toggle_settings().await;
        launcher.handle_key(&key("escape")).await;
        assert_eq!(launcher.state().mode(), &ViewMode::Results);

        launcher.open_note_editor(None).await;
        launcher.handle_key(&key("escape")).await;
        assert_eq!(launcher.state().mode(), &ViewMode::Results);
    }

    // -------------------------------------------------------------------------
    // Action Execution
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_enter_hides_then_executes() {
        let (launcher, backend, _) =
            setup(FakeBackend::new().with_results("saf", vec![app("Safari")]));
        launcher.set_query("saf").await;

        launcher.handle_key(&key("enter")).await;

        let calls = backend.calls();
        let hide = calls.iter().position(|c| c == "hide_window").unwrap();
        let exec = calls
            .iter()
            .position(|c| c == "execute_action:launch_app")
            .unwrap();
        assert!(hide < exec);
        assert_eq!(backend.executed(), vec![app("Safari").action]);

        let state = launcher.state();
        assert!(state.query().is_empty());
        assert!(state.results().is_empty());
        assert!(!state.is_visible());
    }

    #[tokio::test]
    async fn test_execute_failure_does_not_restore() {
        let (launcher, _, sink) = setup(
            FakeBackend::new()
                .with_results("saf", vec![app("Safari")])
                .failing("hide_window")
                .failing("execute_action"),
        );
        launcher.set_query("saf").await;

        launcher.execute_selected().await;

        assert!(launcher.state().query().is_empty());
        assert!(launcher.state().results().is_empty());
        assert_eq!(
            sink.operations(),
            vec![Operation::HideWindow, Operation::ExecuteAction]
        );
    }

    #[tokio::test]
    async fn test_execute_with_nothing_selected() {
        let (launcher, backend, _) = setup(FakeBackend::new());

        launcher.execute_selected().await;

        assert!(backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_search_does_not_repopulate_after_execute() {
        let (launcher, _, _) = setup(
            FakeBackend::new()
                .with_results("a", vec![app("Arc")])
                .with_results("ab", vec![app("Ableton")])
                .with_delay("ab", Duration::from_millis(50)),
        );
        launcher.set_query("a").await;

        tokio::join!(launcher.set_query("ab"), async {
            sleep(Duration::from_millis(10)).await;
            launcher.execute_selected().await;
        });

        assert!(launcher.state().results().is_empty());
        assert!(launcher.state().query().is_empty());
    }

    // -------------------------------------------------------------------------
    // Notes
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_open_existing_note() {
        let (launcher, _, _) = setup(FakeBackend::new().with_note(note("note:7", "Standup")));

        launcher.open_note_editor(Some("note:7".to_string())).await;

        let state = launcher.state();
        let editor = state.mode().note_editor().unwrap();
        assert_eq!(editor.note().unwrap().id, "note:7");
        assert_eq!(editor.draft.title, "Standup");
    }

    #[tokio::test]
    async fn test_open_missing_note_is_noop() {
        let (launcher, backend, sink) = setup(FakeBackend::new());

        launcher.open_note_editor(Some("note:404".to_string())).await;

        assert_eq!(launcher.state().mode(), &ViewMode::Results);
        assert!(sink.failures().is_empty());
        assert!(backend.resizes().is_empty());
    }

    #[tokio::test]
    async fn test_open_note_failure_is_recorded() {
        let (launcher, _, sink) = setup(FakeBackend::new().failing("get_note"));

        launcher.open_note_editor(Some("note:1".to_string())).await;

        assert_eq!(launcher.state().mode(), &ViewMode::Results);
        assert_eq!(sink.operations(), vec![Operation::Note]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_note_fetch_superseded_by_transition() {
        let (launcher, _, _) = setup(
            FakeBackend::new()
                .with_note(note("note:1", "Slow"))
                .with_call_delay("get_note", Duration::from_millis(50)),
        );

        tokio::join!(launcher.open_note_editor(Some("note:1".to_string())), async {
            sleep(Duration::from_millis(10)).await;
            launcher.open_scratchpad().await;
        });

        assert_eq!(launcher.state().mode(), &ViewMode::Scratchpad);
    }

    #[tokio::test]
    async fn test_save_note_blocked_without_title() {
        let (launcher, backend, _) = setup(FakeBackend::new());
        launcher.open_note_editor(None).await;

        launcher.set_note_title("   ");
        launcher.set_note_content("something");
        assert!(!launcher.save_note().await);
        assert_eq!(launcher.state().mode().kind(), ModeKind::NoteEditor);
        assert!(!backend.calls().contains(&"create_note".to_string()));

        launcher.set_note_title("Todo");
        launcher.set_note_content("ship it #work");
        assert!(launcher.save_note().await);
        assert_eq!(launcher.state().mode(), &ViewMode::Results);

        let saved = backend.note("note:1").unwrap();
        assert_eq!(saved.title, "Todo");
        assert_eq!(saved.tags, vec!["work"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_note_fetch_does_not_strand_save() {
        let (launcher, backend, _) = setup(
            FakeBackend::new().with_call_delay("create_note", Duration::from_millis(50)),
        );
        launcher.open_note_editor(None).await;
        launcher.set_note_title("Todo");

        let (saved, ()) = tokio::join!(launcher.save_note(), async {
            sleep(Duration::from_millis(10)).await;
            launcher.open_note_editor(Some("note:missing".to_string())).await;
        });

        assert!(saved);
        assert_eq!(launcher.state().mode(), &ViewMode::Results);

        // The editor is closed, so a second save is a no-op.
        assert!(!launcher.save_note().await);
        let creates = backend.calls().iter().filter(|c| *c == "create_note").count();
        assert_eq!(creates, 1);
    }

    #[tokio::test]
    async fn test_non_ascii_uppercase_typed_verbatim() {
        let (launcher, _, _) = setup(FakeBackend::new());

        for c in ['x', 'İ', 'ẞ', 'É'] {
            launcher.handle_key(&Keystroke::typed(c)).await;
        }

        assert_eq!(launcher.state().query(), "xİẞÉ");
    }

    #[tokio::test]
    async fn test_ctrl_s_updates_existing_note() {
        let (launcher, backend, _) = setup(FakeBackend::new().with_note(note("note:3", "Old")));
        launcher.open_note_editor(Some("note:3".to_string())).await;
        launcher.set_note_title("New");

        let outcome = launcher.handle_key(&key("ctrl+s")).await;

        assert_eq!(outcome, KeyOutcome::Action(LauncherAction::SaveNote));
        assert_eq!(backend.note("note:3").unwrap().title, "New");
        assert_eq!(launcher.state().mode(), &ViewMode::Results);
    }

    #[tokio::test]
    async fn test_save_note_failure_keeps_editor() {
        let (launcher, _, sink) = setup(FakeBackend::new().failing("create_note"));
        launcher.open_note_editor(None).await;
        launcher.set_note_title("Draft");

        assert!(!launcher.save_note().await);
        assert_eq!(launcher.state().mode().kind(), ModeKind::NoteEditor);
        assert_eq!(sink.operations(), vec![Operation::Note]);
    }

    #[tokio::test]
    async fn test_delete_note() {
        let (launcher, backend, _) = setup(FakeBackend::new().with_note(note("note:5", "Gone")));

        launcher.open_note_editor(None).await;
        assert!(!launcher.delete_note().await);

        launcher.open_note_editor(Some("note:5".to_string())).await;
        assert!(launcher.delete_note().await);
        assert!(backend.note("note:5").is_none());
        assert_eq!(launcher.state().mode(), &ViewMode::Results);
    }

    // -------------------------------------------------------------------------
    // Scratchpad
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_scratchpad_round_trip() {
        let (launcher, backend, _) = setup(FakeBackend::new());

        launcher.open_scratchpad().await;
        assert_eq!(launcher.state().scratch_content(), "");

        launcher.save_scratchpad("remember the milk").await;
        assert_eq!(backend.stored_scratchpad(), "remember the milk");

        launcher.close_scratchpad().await;
        launcher.open_scratchpad().await;
        assert_eq!(launcher.state().scratch_content(), "remember the milk");

        launcher.clear_scratchpad().await;
        assert_eq!(launcher.state().scratch_content(), "");
        assert_eq!(backend.stored_scratchpad(), "");
    }

    #[tokio::test]
    async fn test_scratchpad_failure_keeps_local_edit() {
        let (launcher, _, sink) = setup(FakeBackend::new().failing("set_scratchpad"));

        launcher.save_scratchpad("unsaved").await;

        assert_eq!(launcher.state().scratch_content(), "unsaved");
        assert_eq!(sink.operations(), vec![Operation::Scratchpad]);
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_resize_failure_keeps_transition() {
        let (launcher, _, sink) = setup(FakeBackend::new().failing("resize_window"));

        launcher.toggle_settings().await;

        assert_eq!(launcher.state().mode(), &ViewMode::Settings);
        assert_eq!(sink.operations(), vec![Operation::ResizeWindow]);
    }

    #[tokio::test]
    async fn test_overlay_heights() {
        let (launcher, backend, _) = setup(FakeBackend::new());

        launcher.toggle_settings().await;
        launcher.open_scratchpad().await;
        launcher.close_scratchpad().await;

        assert_eq!(
            backend.resizes(),
            vec![56 + 56 + 350 + 28, 56 + 56 + 300 + 28, EMPTY_HEIGHT]
        );
    }

    #[tokio::test]
    async fn test_custom_layout() {
        let backend = Arc::new(FakeBackend::new());
        let layout = LayoutConfig {
            padding: 0,
            ..LayoutConfig::default()
        };
        let launcher = Launcher::new(backend.clone()).with_layout(layout);

        launcher.set_query("").await;

        assert_eq!(backend.resizes(), vec![56 + 56 + 110]);
    }

    // -------------------------------------------------------------------------
    // Lifecycle, Settings, Maintenance
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_initialize_loads_settings() {
        let (launcher, backend, _) = setup(FakeBackend::new());

        launcher.initialize().await;

        assert_eq!(launcher.state().settings(), Some(&Settings::default()));
        assert_eq!(backend.resizes(), vec![EMPTY_HEIGHT]);
    }

    #[tokio::test]
    async fn test_initialize_without_settings() {
        let (launcher, _, sink) = setup(FakeBackend::new().failing("get_settings"));

        launcher.initialize().await;

        assert!(launcher.state().settings().is_none());
        assert_eq!(sink.operations(), vec![Operation::GetSettings]);
    }

    #[tokio::test]
    async fn test_show_resets_state() {
        let (launcher, backend, _) =
            setup(FakeBackend::new().with_results("abc", vec![app("Abc")]));
        launcher.set_query("abc").await;
        launcher.toggle_settings().await;

        launcher.show().await;

        let state = launcher.state();
        assert!(state.is_visible());
        assert!(state.query().is_empty());
        assert_eq!(state.mode(), &ViewMode::Results);
        assert!(backend.calls().contains(&"show_window".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_settings_blocked() {
        let (launcher, backend, _) = setup(FakeBackend::new());

        let mut settings = Settings::default();
        let mut broken = settings.web_searches[0].clone();
        broken.keyword = "two words".to_string();
        settings.web_searches.push(broken);

        assert!(!launcher.save_settings(settings).await);
        assert!(launcher.state().settings().is_none());
        assert!(!backend.calls().contains(&"save_settings".to_string()));
    }

    #[tokio::test]
    async fn test_save_settings_updates_locally_first() {
        let (launcher, backend, sink) = setup(FakeBackend::new().failing("save_settings"));

        let mut settings = Settings::default();
        settings.search.max_results = 5;

        assert!(launcher.save_settings(settings.clone()).await);
        assert_eq!(launcher.state().settings(), Some(&settings));
        assert_ne!(backend.stored_settings(), settings);
        assert_eq!(sink.operations(), vec![Operation::SaveSettings]);
    }

    #[tokio::test]
    async fn test_reindex() {
        let (launcher, _, _) = setup(FakeBackend::new());

        launcher.reindex_apps().await;
        assert!(!launcher.state().is_indexing());

        assert_eq!(launcher.reindex_files().await, 1234);
        assert_eq!(launcher.state().indexed_file_count(), 1234);
    }

    #[tokio::test]
    async fn test_maintenance_failures() {
        let (launcher, _, sink) = setup(
            FakeBackend::new()
                .failing("reindex_apps")
                .failing("reindex_files")
                .failing("clear_clipboard_history"),
        );

        launcher.reindex_apps().await;
        assert_eq!(launcher.reindex_files().await, 0);
        launcher.clear_clipboard_history().await;

        assert!(!launcher.state().is_indexing());
        assert_eq!(
            sink.operations(),
            vec![
                Operation::ReindexApps,
                Operation::ReindexFiles,
                Operation::ClearClipboardHistory
            ]
        );
    }
}
