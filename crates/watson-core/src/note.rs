//! Notes and the scratchpad.

use serde::{Deserialize, Serialize};

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Lowercased hashtags found in the content.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds.
    pub modified_at: i64,
}

/// Editable copy of a note's title and content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    /// A note cannot be saved without a title.
    pub fn can_save(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

impl From<&Note> for NoteDraft {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }
}

/// The single backend-held scratchpad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scratchpad {
    pub content: String,
    /// Unix seconds.
    pub modified_at: i64,
}

/// Extract hashtags from note content.
///
/// Tags are lowercased, stripped of trailing punctuation, sorted and deduplicated.
pub fn extract_tags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = content
        .split_whitespace()
        .filter_map(|word| word.strip_prefix('#'))
        .map(|tag| {
            tag.trim_start_matches('#')
                .trim_end_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|tag| !tag.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}
