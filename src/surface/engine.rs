//! Notation engine call boundary
//!
//! The engine parses, normalizes and lays out lines; this crate never does.
//! All calls are synchronous and return the engine's authoritative result.

use crate::error::EngineError;
use crate::models::{SnapshotLine, TextareaDisplayList, TextareaLineDisplay};

pub trait NotationEngine {
    /// Replace a line's text. `cursor_char_pos` is a character index into
    /// `text`. Returns the normalized line with the engine's cursor.
    fn set_line_text(
        &mut self,
        line_index: usize,
        text: &str,
        cursor_char_pos: Option<usize>,
    ) -> Result<TextareaLineDisplay, EngineError>;

    /// Split a line at a character index; the new line follows it
    fn split_line(&mut self, line_index: usize, char_index: usize) -> Result<TextareaDisplayList, EngineError>;

    /// Merge a line into the previous one
    fn join_lines(&mut self, line_index: usize) -> Result<TextareaDisplayList, EngineError>;

    /// Current display list for the whole document
    fn display_list(&self) -> Result<TextareaDisplayList, EngineError>;

    /// Cell view of one line
    fn line_cells(&self, line_index: usize) -> Result<SnapshotLine, EngineError>;
}
