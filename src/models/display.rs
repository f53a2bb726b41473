//! Textarea display list
//!
//! The shape the engine returns from its textarea calls: one entry per line
//! with the line text, the engine-normalized cursor (a character index) and
//! overlay items anchored at character indices.

use serde::{Deserialize, Serialize};

/// Display data for a single line rendered as textarea
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct TextareaLineDisplay {
    /// Line index in document
    pub line_index: usize,

    /// Text content for the textarea
    pub text: String,

    /// Optional cursor position (character index in text)
    #[serde(default)]
    pub cursor_pos: Option<usize>,

    /// Optional selection range
    #[serde(default)]
    pub selection: Option<TextRange>,

    /// Lyrics overlay items with character positions
    #[serde(default)]
    pub lyrics: Vec<OverlayItem>,

    /// Tala marker overlay items with character positions
    #[serde(default)]
    pub talas: Vec<OverlayItem>,

    /// Optional line label
    #[serde(default)]
    pub label: Option<String>,
}

impl TextareaLineDisplay {
    pub fn new(line_index: usize, text: impl Into<String>) -> Self {
        Self {
            line_index,
            text: text.into(),
            ..Self::default()
        }
    }

    /// All overlay items of the line, tagged by kind
    pub fn overlay_items(&self) -> Vec<(OverlayKind, OverlayItem)> {
        self.lyrics
            .iter()
            .map(|item| (OverlayKind::Lyric, item.clone()))
            .chain(self.talas.iter().map(|item| (OverlayKind::Tala, item.clone())))
            .collect()
    }
}

/// A text range in character indices (for selection)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An overlay item positioned at a character index
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OverlayItem {
    /// Character index in the line text (0-based)
    pub char_index: usize,

    /// Content to display (syllable, tala marker, etc.)
    pub content: String,
}

impl OverlayItem {
    pub fn new(char_index: usize, content: impl Into<String>) -> Self {
        Self {
            char_index,
            content: content.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Lyric,
    Tala,
}

impl OverlayKind {
    /// CSS class used for the overlay element
    pub fn class_name(&self) -> &'static str {
        match self {
            OverlayKind::Lyric => "lyric-overlay",
            OverlayKind::Tala => "tala-overlay",
        }
    }
}

/// Result from textarea display list computation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct TextareaDisplayList {
    /// All lines as textarea displays
    pub lines: Vec<TextareaLineDisplay>,

    /// Document title (optional)
    #[serde(default)]
    pub title: Option<String>,

    /// Document composer (optional)
    #[serde(default)]
    pub composer: Option<String>,
}
