//! Keyboard routing.
//!
//! Decides what a keystroke means given the active mode and the query. The
//! decision is pure; `Launcher::handle_key` carries it out.
//!
//! Priority:
//! 1. Results mode with an empty query: single-letter shortcuts.
//! 2. The context for the active mode (navigation, Escape, overlay keys).
//! 3. In Results mode, plain typing edits the query.

use crate::actions::LauncherAction;
use crate::keymap::{Key, KeymapContext, KeymapRegistry, Keystroke};
use crate::model::ModeKind;

/// Query edit produced by typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    /// Remove the last grapheme.
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRoute {
    Action(LauncherAction),
    Text(TextEdit),
    /// Not handled; the host's focused control gets the key.
    PassThrough,
}

/// Route a keystroke.
pub fn route_key(
    keymap: &KeymapRegistry,
    mode: ModeKind,
    query: &str,
    keystroke: &Keystroke,
) -> KeyRoute {
    // Shortcuts only fire on an exactly empty query; a lone space is text.
    if mode == ModeKind::Results && query.is_empty() {
        if let Some(action) = keymap.lookup(KeymapContext::Shortcut, keystroke) {
            return KeyRoute::Action(action);
        }
    }

    if let Some(action) = keymap.lookup(KeymapContext::for_mode(mode), keystroke) {
        return KeyRoute::Action(action);
    }

    if mode != ModeKind::Results {
        return KeyRoute::PassThrough;
    }

    if keystroke.key == Key::Backspace && keystroke.is_plain() {
        return KeyRoute::Text(TextEdit::Backspace);
    }

    match keystroke.text() {
        Some(c) => KeyRoute::Text(TextEdit::Insert(c)),
        None => KeyRoute::PassThrough,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(mode: ModeKind, query: &str, key: &str) -> KeyRoute {
        let keymap = KeymapRegistry::with_defaults();
        route_key(&keymap, mode, query, &Keystroke::parse(key).unwrap())
    }

    #[test]
    fn test_shortcuts_on_empty_query() {
        use LauncherAction::*;

        assert_eq!(route(ModeKind::Results, "", "s"), KeyRoute::Action(OpenScratchpad));
        assert_eq!(route(ModeKind::Results, "", "`"), KeyRoute::Action(OpenScratchpad));
        assert_eq!(route(ModeKind::Results, "", "n"), KeyRoute::Action(NewNote));
        assert_eq!(route(ModeKind::Results, "", "N"), KeyRoute::Action(SearchNotes));
        assert_eq!(route(ModeKind::Results, "", "shift+n"), KeyRoute::Action(SearchNotes));
        assert_eq!(route(ModeKind::Results, "", "f"), KeyRoute::Action(SearchFiles));
    }

    #[test]
    fn test_shortcuts_ignored_with_query() {
        assert_eq!(
            route(ModeKind::Results, "a", "s"),
            KeyRoute::Text(TextEdit::Insert('s'))
        );
        assert_eq!(
            route(ModeKind::Results, " ", "n"),
            KeyRoute::Text(TextEdit::Insert('n'))
        );
        assert_eq!(
            route(ModeKind::Results, "a", "N"),
            KeyRoute::Text(TextEdit::Insert('N'))
        );
    }

    #[test]
    fn test_navigation_regardless_of_query() {
        use LauncherAction::*;

        for query in ["", "abc"] {
            assert_eq!(route(ModeKind::Results, query, "down"), KeyRoute::Action(CursorDown));
            assert_eq!(route(ModeKind::Results, query, "up"), KeyRoute::Action(CursorUp));
            assert_eq!(route(ModeKind::Results, query, "tab"), KeyRoute::Action(CursorDown));
            assert_eq!(route(ModeKind::Results, query, "shift+tab"), KeyRoute::Action(CursorUp));
            assert_eq!(route(ModeKind::Results, query, "enter"), KeyRoute::Action(Submit));
            assert_eq!(route(ModeKind::Results, query, "escape"), KeyRoute::Action(Dismiss));
        }
    }

    #[test]
    fn test_text_editing() {
        assert_eq!(
            route(ModeKind::Results, "", "a"),
            KeyRoute::Text(TextEdit::Insert('a'))
        );
        assert_eq!(
            route(ModeKind::Results, "ab", "backspace"),
            KeyRoute::Text(TextEdit::Backspace)
        );
        assert_eq!(route(ModeKind::Results, "ab", "ctrl+a"), KeyRoute::PassThrough);
        assert_eq!(route(ModeKind::Results, "ab", "left"), KeyRoute::PassThrough);
    }

    #[test]
    fn test_overlay_contexts() {
        use LauncherAction::*;

        assert_eq!(
            route(ModeKind::Scratchpad, "", "escape"),
            KeyRoute::Action(CloseScratchpad)
        );
        // Shortcuts don't fire outside Results mode.
        assert_eq!(route(ModeKind::Scratchpad, "", "s"), KeyRoute::PassThrough);
        assert_eq!(
            route(ModeKind::NoteEditor, "", "ctrl+s"),
            KeyRoute::Action(SaveNote)
        );
        assert_eq!(
            route(ModeKind::NoteEditor, "", "cmd+s"),
            KeyRoute::Action(SaveNote)
        );
        assert_eq!(route(ModeKind::NoteEditor, "", "down"), KeyRoute::PassThrough);
        assert_eq!(
            route(ModeKind::Settings, "", "escape"),
            KeyRoute::Action(CloseSettings)
        );
    }

    #[test]
    fn test_user_override_wins() {
        let mut keymap = KeymapRegistry::with_defaults();
        let errors = keymap.apply_config(&[watson_core::KeyBindingConfig {
            key: "ctrl+j".to_string(),
            action: "cursor_down".to_string(),
            context: None,
        }]);
        assert!(errors.is_empty());

        let keystroke = Keystroke::parse("ctrl+j").unwrap();
        assert_eq!(
            route_key(&keymap, ModeKind::Results, "abc", &keystroke),
            KeyRoute::Action(LauncherAction::CursorDown)
        );
    }
}
