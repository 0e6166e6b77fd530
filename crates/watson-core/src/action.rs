//! Action-related types.

use serde::{Deserialize, Serialize};

/// What happens when a search result is activated.
///
/// Attached to a [`SearchResult`](crate::SearchResult) by the backend and never
/// modified afterwards. The launcher only forwards it back to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchAction {
    /// Launch an installed application.
    LaunchApp { path: String },

    /// Open a URL in the default browser.
    OpenUrl { url: String },

    /// Run a system command by id (sleep, lock, empty trash, ...).
    RunCommand { command: String },

    /// Copy content back to the clipboard.
    CopyClipboard { content: String },

    /// Open a note by id.
    OpenNote { note_id: String },

    /// Open a file with its default handler.
    OpenFile { path: String },
}

impl SearchAction {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            SearchAction::LaunchApp { .. } => "launch_app",
            SearchAction::OpenUrl { .. } => "open_url",
            SearchAction::RunCommand { .. } => "run_command",
            SearchAction::CopyClipboard { .. } => "copy_clipboard",
            SearchAction::OpenNote { .. } => "open_note",
            SearchAction::OpenFile { .. } => "open_file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_shape() {
        let json = serde_json::to_string(&SearchAction::LaunchApp {
            path: "/Applications/Safari.app".to_string(),
        })
        .unwrap();
        insta::assert_snapshot!(json, @r#"{"type":"launch_app","path":"/Applications/Safari.app"}"#);
    }

    #[test]
    fn test_action_from_wire() {
        let action: SearchAction =
            serde_json::from_str(r#"{"type":"open_note","note_id":"note:1"}"#).unwrap();
        assert_eq!(
            action,
            SearchAction::OpenNote {
                note_id: "note:1".to_string()
            }
        );
        assert_eq!(action.label(), "open_note");
    }
}
