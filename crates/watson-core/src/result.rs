//! Search result types.

use serde::{Deserialize, Serialize};

use crate::SearchAction;

/// Closed set of result categories reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Application,
    WebSearch,
    SystemCommand,
    Clipboard,
    Note,
    File,
}

/// A search result is one selectable row in the launcher.
///
/// Results arrive already ranked; their order is the display and selection
/// order. A result lives until the next query change or until it is executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Unique identifier within the current result set.
    pub id: String,

    /// Primary display text.
    pub name: String,

    /// Secondary display text.
    #[serde(default)]
    pub description: String,

    /// Icon identifier (path or named icon).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Result category.
    #[serde(rename = "result_type")]
    pub kind: ResultKind,

    /// Backend ranking score. Informational only.
    #[serde(default)]
    pub score: i64,

    /// What happens when the result is activated.
    pub action: SearchAction,
}

impl SearchResult {
    /// Create a new result with required fields.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ResultKind,
        action: SearchAction,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            icon: None,
            kind,
            score: 0,
            action,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
