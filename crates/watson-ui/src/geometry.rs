//! Window sizing.
//!
//! The window height is never stored; it is derived from the active mode and the
//! number of results every time something changes.

use watson_core::LayoutConfig;

use crate::model::ModeKind;

/// Target window height for the given state.
///
/// Precedence is fixed: NoteEditor > Scratchpad > Settings > results > empty.
pub fn window_height(layout: &LayoutConfig, mode: ModeKind, result_count: usize) -> u32 {
    let chrome = layout.header_height + layout.search_height + layout.padding;
    chrome + panel_height(layout, mode, result_count)
}

/// Height of the panel below the search box.
pub fn panel_height(layout: &LayoutConfig, mode: ModeKind, result_count: usize) -> u32 {
    match mode {
        ModeKind::NoteEditor => layout.note_editor_height,
        ModeKind::Scratchpad => layout.scratchpad_height,
        ModeKind::Settings => layout.settings_height,
        ModeKind::Results if result_count > 0 => {
            let rows = u32::try_from(result_count).unwrap_or(u32::MAX);
            rows.saturating_mul(layout.result_row_height)
                .min(layout.max_results_height)
        }
        ModeKind::Results => layout.empty_state_height,
    }
}
