//! Cell/character index mapping
//!
//! A line is an ordered run of cells, each consuming `char_len()` character
//! indices. These functions walk the cell lengths to translate between the two
//! index spaces.

use serde::{Deserialize, Serialize};

use crate::models::SnapshotLine;

/// Result of converting character position to cell index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharPosToCellResult {
    /// The cell index
    pub cell_index: usize,
    /// Character offset within the cell (0-based)
    pub char_offset_in_cell: usize,
}

/// Total number of characters in the line
pub fn line_char_count(line: &SnapshotLine) -> usize {
    line.cells.iter().map(|cell| cell.char_len()).sum()
}

/// Convert character position to cell index and offset within cell
///
/// Positions at or past the end map to `{cell_count, 0}`.
pub fn char_pos_to_cell_index(line: &SnapshotLine, char_pos: usize) -> CharPosToCellResult {
    let mut accumulated_chars = 0;
    for (cell_index, cell) in line.cells.iter().enumerate() {
        let cell_length = cell.char_len();

        if char_pos < accumulated_chars + cell_length {
            return CharPosToCellResult {
                cell_index,
                char_offset_in_cell: char_pos - accumulated_chars,
            };
        }

        accumulated_chars += cell_length;
    }

    // Position after last cell
    CharPosToCellResult {
        cell_index: line.cells.len(),
        char_offset_in_cell: 0,
    }
}

/// Convert cell index to the character position at the start of that cell
///
/// A cell index past the last cell yields the end-of-line position.
pub fn cell_index_to_char_pos(line: &SnapshotLine, cell_index: usize) -> usize {
    line.cells
        .iter()
        .take(cell_index)
        .map(|cell| cell.char_len())
        .sum()
}

/// Cell index at which text typed at `char_pos` is inserted.
///
/// The engine only inserts between cells, so a position strictly inside a
/// cell targets the slot after that cell.
pub fn insertion_cell_index(line: &SnapshotLine, char_pos: usize) -> usize {
    let position = char_pos_to_cell_index(line, char_pos);
    if position.char_offset_in_cell > 0 {
        position.cell_index + 1
    } else {
        position.cell_index
    }
}

/// Whether a caret may sit at `char_pos`.
///
/// False strictly inside a multi-character cell and directly before a
/// continuation cell (which draws on top of the previous glyph).
pub fn is_char_boundary(line: &SnapshotLine, char_pos: usize) -> bool {
    let position = char_pos_to_cell_index(line, char_pos);
    if position.char_offset_in_cell > 0 {
        return false;
    }
    match line.cells.get(position.cell_index) {
        Some(cell) => !cell.continuation || position.cell_index == 0,
        None => true,
    }
}

/// Move `char_pos` forward to the nearest caret boundary (clamped to the line end)
pub fn snap_to_boundary(line: &SnapshotLine, char_pos: usize) -> usize {
    let total = line_char_count(line);
    let mut pos = char_pos.min(total);
    while pos < total && !is_char_boundary(line, pos) {
        pos += 1;
    }
    pos
}

/// Spread per-cell pixel widths over the line's characters.
///
/// Continuation cells contribute zero width; a cell without a supplied width
/// counts as zero wide.
pub fn char_widths(line: &SnapshotLine, cell_widths: &[f64]) -> Vec<f64> {
    let mut widths = Vec::with_capacity(line_char_count(line));
    for (cell_index, cell) in line.cells.iter().enumerate() {
        let cell_length = cell.char_len();
        if cell_length == 0 {
            continue;
        }
        let width = if cell.continuation {
            0.0
        } else {
            cell_widths.get(cell_index).copied().unwrap_or(0.0)
        };
        let per_char = width / cell_length as f64;
        widths.extend(std::iter::repeat(per_char).take(cell_length));
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnapshotCell;

    fn line_1_2_1() -> SnapshotLine {
        SnapshotLine::from_cells(&["A", "BC", "D"])
    }

    #[test]
    fn test_char_pos_to_cell_index_simple() {
        let line = line_1_2_1();
        let expected = [(0, 0), (1, 0), (1, 1), (2, 0), (3, 0)];
        for (char_pos, (cell_index, offset)) in expected.into_iter().enumerate() {
            let result = char_pos_to_cell_index(&line, char_pos);
            assert_eq!(result.cell_index, cell_index, "cell for char_pos {}", char_pos);
            assert_eq!(result.char_offset_in_cell, offset, "offset for char_pos {}", char_pos);
        }

        // Far past the end
        assert_eq!(char_pos_to_cell_index(&line, 40).cell_index, 3);
    }

    #[test]
    fn test_cell_index_to_char_pos_simple() {
        let line = line_1_2_1();
        assert_eq!(cell_index_to_char_pos(&line, 0), 0);
        assert_eq!(cell_index_to_char_pos(&line, 1), 1);
        assert_eq!(cell_index_to_char_pos(&line, 2), 3);
        assert_eq!(cell_index_to_char_pos(&line, 3), 4);
        assert_eq!(cell_index_to_char_pos(&line, 12), 4);
        assert_eq!(cell_index_to_char_pos(&SnapshotLine::default(), 3), 0);
    }

    #[test]
    fn test_insertion_never_lands_mid_cell() {
        let line = line_1_2_1();
        assert_eq!(insertion_cell_index(&line, 1), 1);
        assert_eq!(insertion_cell_index(&line, 2), 2);
        assert_eq!(insertion_cell_index(&line, 4), 3);

        let spaced = SnapshotLine::from_cells(&["1", " ", "3"]);
        assert_eq!(insertion_cell_index(&spaced, 1), 1);
    }

    #[test]
    fn test_boundaries_skip_continuations() {
        let line = SnapshotLine::new(vec![
            SnapshotCell::new("1#"),
            SnapshotCell::new("a"),
            SnapshotCell::continuation("\u{0301}"),
            SnapshotCell::new("2"),
        ]);
        assert!(is_char_boundary(&line, 0));
        assert!(!is_char_boundary(&line, 1));
        assert!(is_char_boundary(&line, 2));
        assert!(!is_char_boundary(&line, 3));
        assert!(is_char_boundary(&line, 4));
        assert_eq!(snap_to_boundary(&line, 1), 2);
        assert_eq!(snap_to_boundary(&line, 3), 4);
        assert_eq!(snap_to_boundary(&line, 9), 5);
    }

    #[test]
    fn test_char_widths() {
        let line = SnapshotLine::new(vec![
            SnapshotCell::new("1#"),
            SnapshotCell::new("a"),
            SnapshotCell::continuation("\u{0301}"),
        ]);
        assert_eq!(char_widths(&line, &[20.0, 8.0, 8.0]), vec![10.0, 10.0, 8.0, 0.0]);
        // Missing widths count as zero
        assert_eq!(char_widths(&line, &[20.0]), vec![10.0, 10.0, 0.0, 0.0]);
    }
}
