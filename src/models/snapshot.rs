//! Document snapshot as exposed by the notation engine
//!
//! Lines are ordered sequences of cells. A cell covers one or more characters
//! of the line text (e.g. `1#` is a single cell of two characters), and cell
//! boundaries partition the line's character index space without gaps.

use serde::{Deserialize, Serialize};

/// A single notation cell
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SnapshotCell {
    /// Display character(s) of the cell
    pub char: String,

    /// True if this cell visually continues the previous cell's glyph
    /// (e.g. a combining mark) and is not an independent boundary for width
    #[serde(default)]
    pub continuation: bool,
}

impl SnapshotCell {
    pub fn new(char: impl Into<String>) -> Self {
        Self {
            char: char.into(),
            continuation: false,
        }
    }

    pub fn continuation(char: impl Into<String>) -> Self {
        Self {
            char: char.into(),
            continuation: true,
        }
    }

    /// Number of character indices this cell consumes
    pub fn char_len(&self) -> usize {
        self.char.chars().count()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct SnapshotLine {
    pub cells: Vec<SnapshotCell>,
}

impl SnapshotLine {
    pub fn new(cells: Vec<SnapshotCell>) -> Self {
        Self { cells }
    }

    /// One cell per string, none of them continuations
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        Self {
            cells: cells.iter().map(|c| SnapshotCell::new(c.as_ref())).collect(),
        }
    }

    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.char.as_str()).collect()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct DocumentSnapshot {
    pub lines: Vec<SnapshotLine>,
}

impl DocumentSnapshot {
    pub fn line(&self, index: usize) -> Option<&SnapshotLine> {
        self.lines.get(index)
    }
}
