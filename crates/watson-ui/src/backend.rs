//! Backend gateway for the Watson launcher.
//!
//! The `Backend` trait is the launcher's only I/O boundary. It returns futures,
//! allowing the caller to drive them however it wants. This enables testing
//! with fake backends.
//!
//! Every call is fallible. The launcher never propagates a `BackendError`; see
//! `diagnostics` for where failures go.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use watson_core::{
    extract_tags, BackendError, Note, ResultKind, Scratchpad, SearchAction, SearchResult,
    Settings,
};

/// Future returned by every backend call.
pub type BackendFuture<T> = BoxFuture<'static, Result<T, BackendError>>;

// =============================================================================
// Backend Trait
// =============================================================================

/// Operations the launcher needs from the backend.
#[cfg_attr(test, mockall::automock)]
pub trait Backend: Send + Sync {
    /// Search with the given query. Results arrive ranked.
    fn search(&self, query: String) -> BackendFuture<Vec<SearchResult>>;

    fn get_settings(&self) -> BackendFuture<Settings>;

    fn save_settings(&self, settings: Settings) -> BackendFuture<()>;

    /// Perform a result's action (launch, open, copy, ...).
    fn execute_action(&self, action: SearchAction) -> BackendFuture<()>;

    /// Rebuild the application index. Returns the number of apps.
    fn reindex_apps(&self) -> BackendFuture<usize>;

    /// Rebuild the file index. Returns the number of files.
    fn reindex_files(&self) -> BackendFuture<usize>;

    fn show_window(&self) -> BackendFuture<()>;

    fn hide_window(&self) -> BackendFuture<()>;

    fn resize_window(&self, height: u32) -> BackendFuture<()>;

    fn get_scratchpad(&self) -> BackendFuture<Scratchpad>;

    fn set_scratchpad(&self, content: String) -> BackendFuture<Scratchpad>;

    fn clear_scratchpad(&self) -> BackendFuture<Scratchpad>;

    fn create_note(&self, title: String, content: String) -> BackendFuture<Note>;

    fn update_note(&self, id: String, title: String, content: String) -> BackendFuture<Note>;

    fn delete_note(&self, id: String) -> BackendFuture<()>;

    /// Fetch a note. `Ok(None)` when it does not exist.
    fn get_note(&self, id: String) -> BackendFuture<Option<Note>>;

    fn clear_clipboard_history(&self) -> BackendFuture<()>;
}

// =============================================================================
// Local Backend
// =============================================================================

/// In-process backend keeping notes, the scratchpad and settings in memory.
///
/// Window calls only track visibility and height. Search covers notes and
/// keyword web searches; `n <text>` restricts it to notes.
pub struct LocalBackend {
    store: Arc<Mutex<LocalStore>>,
}

#[derive(Default)]
struct LocalStore {
    settings: Settings,
    scratchpad: Scratchpad,
    notes: Vec<Note>,
    visible: bool,
    height: u32,
}

impl LocalBackend {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(LocalStore::default())),
        }
    }

    /// Seed with existing notes.
    #[cfg(test)]
    pub fn with_notes(self, notes: Vec<Note>) -> Self {
        self.store.lock().notes = notes;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.store.lock().visible
    }

    pub fn height(&self) -> u32 {
        self.store.lock().height
    }

    fn search_now(&self, query: &str) -> Vec<SearchResult> {
        let store = self.store.lock();
        let mut results = Vec::new();

        let (notes_only, needle) = match query.strip_prefix("n ") {
            Some(rest) => (true, rest.trim().to_lowercase()),
            None => (false, query.trim().to_lowercase()),
        };

        if !notes_only {
            results.extend(web_search_results(&store.settings, query));
        }

        results.extend(
            store
                .notes
                .iter()
                .filter(|note| {
                    (notes_only && needle.is_empty())
                        || note.title.to_lowercase().contains(&needle)
                        || note.tags.iter().any(|tag| *tag == needle)
                })
                .map(note_result),
        );

        results.truncate(store.settings.search.max_results);
        results
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
        .unwrap_or_default()
}

fn note_result(note: &Note) -> SearchResult {
    SearchResult::new(
        note.id.clone(),
        note.title.clone(),
        ResultKind::Note,
        SearchAction::OpenNote {
            note_id: note.id.clone(),
        },
    )
    .with_description(if note.tags.is_empty() {
        "Note".to_string()
    } else {
        format!("Note · #{}", note.tags.join(" #"))
    })
}

/// `<keyword> <text>` expands the matching web search template.
fn web_search_results(settings: &Settings, query: &str) -> Vec<SearchResult> {
    let Some((keyword, text)) = query.split_once(' ') else {
        return Vec::new();
    };
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    settings
        .web_searches
        .iter()
        .filter(|ws| ws.keyword == keyword)
        .filter_map(|ws| {
            let url = if ws.url.contains("{instance}") {
                let instance = ws.instance.as_deref().filter(|i| !i.is_empty())?;
                ws.url.replace("{instance}", instance)
            } else {
                ws.url.clone()
            };
            let url = url.replace("{query}", &urlencoding::encode(text));
            let mut result = SearchResult::new(
                format!("web:{}", ws.keyword),
                format!("{}: {}", ws.name, text),
                ResultKind::WebSearch,
                SearchAction::OpenUrl { url },
            )
            .with_description("Web Search");
            result.icon = ws.icon.clone();
            Some(result)
        })
        .collect()
}

/// An already-resolved backend future.
pub(crate) fn ready<T: Send + 'static>(value: Result<T, BackendError>) -> BackendFuture<T> {
    Box::pin(async move { value })
}

impl Backend for LocalBackend {
    fn search(&self, query: String) -> BackendFuture<Vec<SearchResult>> {
        ready(Ok(self.search_now(&query)))
    }

    fn get_settings(&self) -> BackendFuture<Settings> {
        ready(Ok(self.store.lock().settings.clone()))
    }

    fn save_settings(&self, settings: Settings) -> BackendFuture<()> {
        self.store.lock().settings = settings;
        ready(Ok(()))
    }

    fn execute_action(&self, action: SearchAction) -> BackendFuture<()> {
        tracing::info!("Executing {:?}", action);
        ready(Ok(()))
    }

    fn reindex_apps(&self) -> BackendFuture<usize> {
        ready(Ok(0))
    }

    fn reindex_files(&self) -> BackendFuture<usize> {
        ready(Ok(0))
    }

    fn show_window(&self) -> BackendFuture<()> {
        self.store.lock().visible = true;
        ready(Ok(()))
    }

    fn hide_window(&self) -> BackendFuture<()> {
        self.store.lock().visible = false;
        ready(Ok(()))
    }

    fn resize_window(&self, height: u32) -> BackendFuture<()> {
        self.store.lock().height = height;
        ready(Ok(()))
    }

    fn get_scratchpad(&self) -> BackendFuture<Scratchpad> {
        ready(Ok(self.store.lock().scratchpad.clone()))
    }

    fn set_scratchpad(&self, content: String) -> BackendFuture<Scratchpad> {
        let scratchpad = Scratchpad {
            content,
            modified_at: now(),
        };
        self.store.lock().scratchpad = scratchpad.clone();
        ready(Ok(scratchpad))
    }

    fn clear_scratchpad(&self) -> BackendFuture<Scratchpad> {
        self.set_scratchpad(String::new())
    }

    fn create_note(&self, title: String, content: String) -> BackendFuture<Note> {
        let timestamp = now();
        let note = Note {
            id: format!("note:{}", uuid::Uuid::new_v4()),
            tags: extract_tags(&content),
            title,
            content,
            created_at: timestamp,
            modified_at: timestamp,
        };
        self.store.lock().notes.push(note.clone());
        ready(Ok(note))
    }

    fn update_note(&self, id: String, title: String, content: String) -> BackendFuture<Note> {
        let mut store = self.store.lock();
        let Some(note) = store.notes.iter_mut().find(|note| note.id == id) else {
            return ready(Err(BackendError::NotFound(id)));
        };
        note.tags = extract_tags(&content);
        note.title = title;
        note.content = content;
        note.modified_at = now();
        ready(Ok(note.clone()))
    }

    fn delete_note(&self, id: String) -> BackendFuture<()> {
        let mut store = self.store.lock();
        let before = store.notes.len();
        store.notes.retain(|note| note.id != id);
        if store.notes.len() == before {
            return ready(Err(BackendError::NotFound(id)));
        }
        ready(Ok(()))
    }

    fn get_note(&self, id: String) -> BackendFuture<Option<Note>> {
        let note = self.store.lock().notes.iter().find(|n| n.id == id).cloned();
        ready(Ok(note))
    }

    fn clear_clipboard_history(&self) -> BackendFuture<()> {
        ready(Ok(()))
    }
}

// =============================================================================
// Fake Backend for Testing
// =============================================================================


// =============================================================================
// Tests
// =============================================================================
