//! In-memory notation engine
//!
//! A small engine with the same call contract as the WASM notation engine:
//! it owns the lines, normalizes text into cells and reports cursors as
//! character indices snapped to cell boundaries. Cell rules:
//!
//! - a pitch digit `1`-`7` absorbs a following `#`, `##`, `b` or `bb`
//! - combining marks (U+0300..U+036F) become continuation cells
//! - control characters are dropped, tabs become spaces
//! - everything else is one cell per character

use crate::error::EngineError;
use crate::models::{
    OverlayItem, SnapshotCell, SnapshotLine, TextareaDisplayList, TextareaLineDisplay,
};
use crate::surface::engine::NotationEngine;
use crate::text::cell_map::{insertion_cell_index, line_char_count, snap_to_boundary};

#[derive(Debug, Clone, Default, PartialEq)]
struct MemoryLine {
    cells: SnapshotLine,
    lyrics: String,
    tala: String,
    label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEngine {
    lines: Vec<MemoryLine>,
    title: Option<String>,
    composer: Option<String>,
    /// (line, char index) of the document cursor
    cursor: (usize, usize),
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    /// A document with one empty line
    pub fn new() -> Self {
        Self::from_lines(&[""])
    }

    pub fn from_lines(lines: &[&str]) -> Self {
        let lines: Vec<MemoryLine> = if lines.is_empty() {
            vec![MemoryLine::default()]
        } else {
            lines
                .iter()
                .map(|text| MemoryLine {
                    cells: parse_cells(text),
                    ..MemoryLine::default()
                })
                .collect()
        };
        Self {
            lines,
            title: None,
            composer: None,
            cursor: (0, 0),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_text(&self, line_index: usize) -> Option<String> {
        self.lines.get(line_index).map(|line| line.cells.text())
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn set_lyrics(&mut self, line_index: usize, lyrics: &str) -> Result<(), EngineError> {
        self.line_mut(line_index)?.lyrics = lyrics.to_string();
        Ok(())
    }

    pub fn set_tala(&mut self, line_index: usize, tala: &str) -> Result<(), EngineError> {
        self.line_mut(line_index)?.tala = tala.to_string();
        Ok(())
    }

    pub fn set_label(&mut self, line_index: usize, label: &str) -> Result<(), EngineError> {
        self.line_mut(line_index)?.label = label.to_string();
        Ok(())
    }

    fn check_line(&self, line_index: usize) -> Result<(), EngineError> {
        if line_index >= self.lines.len() {
            return Err(EngineError::LineOutOfRange {
                index: line_index,
                count: self.lines.len(),
            });
        }
        Ok(())
    }

    fn line_mut(&mut self, line_index: usize) -> Result<&mut MemoryLine, EngineError> {
        self.check_line(line_index)?;
        Ok(&mut self.lines[line_index])
    }

    fn line_display(&self, line_index: usize) -> TextareaLineDisplay {
        let line = &self.lines[line_index];
        let (cursor_line, cursor_char) = self.cursor;
        TextareaLineDisplay {
            line_index,
            text: line.cells.text(),
            cursor_pos: (cursor_line == line_index).then_some(cursor_char),
            selection: None,
            lyrics: build_lyric_overlays(&line.lyrics, &line.cells),
            talas: build_tala_overlays(&line.tala, &line.cells),
            label: (!line.label.is_empty()).then(|| line.label.clone()),
        }
    }

    fn build_display_list(&self) -> TextareaDisplayList {
        TextareaDisplayList {
            lines: (0..self.lines.len()).map(|i| self.line_display(i)).collect(),
            title: self.title.clone(),
            composer: self.composer.clone(),
        }
    }
}

impl NotationEngine for MemoryEngine {
    fn set_line_text(
        &mut self,
        line_index: usize,
        text: &str,
        cursor_char_pos: Option<usize>,
    ) -> Result<TextareaLineDisplay, EngineError> {
        let line = self.line_mut(line_index)?;
        line.cells = parse_cells(text);

        let cursor = match cursor_char_pos {
            // Characters dropped by normalization shift the cursor left
            Some(char_pos) => {
                let kept = text
                    .chars()
                    .take(char_pos)
                    .filter(|&c| normalize_char(c).is_some())
                    .count();
                snap_to_boundary(&line.cells, kept)
            }
            None => line_char_count(&line.cells),
        };
        self.cursor = (line_index, cursor);

        crate::wasm_log!(
            "memory engine setLineText line={} cells={} cursor={}",
            line_index,
            self.lines[line_index].cells.cell_count(),
            cursor
        );
        Ok(self.line_display(line_index))
    }

    fn split_line(&mut self, line_index: usize, char_index: usize) -> Result<TextareaDisplayList, EngineError> {
        let line = self.line_mut(line_index)?;
        let split_pos = insertion_cell_index(&line.cells, char_index).min(line.cells.cell_count());

        let tail = line.cells.cells.split_off(split_pos);
        let new_line = MemoryLine {
            cells: SnapshotLine::new(tail),
            ..MemoryLine::default()
        };
        self.lines.insert(line_index + 1, new_line);
        self.cursor = (line_index + 1, 0);

        Ok(self.build_display_list())
    }

    fn join_lines(&mut self, line_index: usize) -> Result<TextareaDisplayList, EngineError> {
        // First line has no previous line to join
        if line_index == 0 {
            return Ok(self.build_display_list());
        }
        self.check_line(line_index)?;

        let removed = self.lines.remove(line_index);
        let previous = &mut self.lines[line_index - 1];
        let join_point = line_char_count(&previous.cells);
        previous.cells.cells.extend(removed.cells.cells);
        self.cursor = (line_index - 1, join_point);

        Ok(self.build_display_list())
    }

    fn display_list(&self) -> Result<TextareaDisplayList, EngineError> {
        Ok(self.build_display_list())
    }

    fn line_cells(&self, line_index: usize) -> Result<SnapshotLine, EngineError> {
        self.check_line(line_index)?;
        Ok(self.lines[line_index].cells.clone())
    }
}

fn normalize_char(c: char) -> Option<char> {
    match c {
        '\t' => Some(' '),
        c if c.is_control() => None,
        c => Some(c),
    }
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

fn is_pitch_digit(c: char) -> bool {
    ('1'..='7').contains(&c)
}

/// Whether `accidental` may extend the pitch cell `cell`
fn accepts_accidental(cell: &SnapshotCell, accidental: char) -> bool {
    let mut chars = cell.char.chars();
    let Some(head) = chars.next() else {
        return false;
    };
    if cell.continuation || !is_pitch_digit(head) {
        return false;
    }
    let tail: Vec<char> = chars.collect();
    tail.len() < 2 && tail.iter().all(|&c| c == accidental)
}

/// Normalize text and group it into cells
pub fn parse_cells(text: &str) -> SnapshotLine {
    let mut cells: Vec<SnapshotCell> = Vec::new();

    for c in text.chars().filter_map(normalize_char) {
        if is_combining_mark(c) && !cells.is_empty() {
            cells.push(SnapshotCell::continuation(c.to_string()));
            continue;
        }
        if c == '#' || c == 'b' {
            if let Some(last) = cells.last_mut() {
                if accepts_accidental(last, c) {
                    last.char.push(c);
                    continue;
                }
            }
        }
        cells.push(SnapshotCell::new(c.to_string()));
    }

    SnapshotLine::new(cells)
}

fn cell_start_chars(cells: &SnapshotLine) -> Vec<usize> {
    let mut starts = Vec::with_capacity(cells.cell_count());
    let mut pos = 0;
    for cell in &cells.cells {
        starts.push(pos);
        pos += cell.char_len();
    }
    starts
}

/// Build lyric overlay items from lyrics string, one syllable per pitched cell
fn build_lyric_overlays(lyrics: &str, cells: &SnapshotLine) -> Vec<OverlayItem> {
    if lyrics.is_empty() {
        return Vec::new();
    }

    let starts = cell_start_chars(cells);
    let pitched = cells
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.char.chars().next().is_some_and(is_pitch_digit))
        .map(|(idx, _)| starts[idx]);

    lyrics
        .split_whitespace()
        .zip(pitched)
        .map(|(syllable, char_index)| OverlayItem::new(char_index, syllable))
        .collect()
}

/// Build tala overlay items: first marker at line start, then one after each barline
fn build_tala_overlays(tala: &str, cells: &SnapshotLine) -> Vec<OverlayItem> {
    let markers: Vec<&str> = tala.split_whitespace().collect();
    if markers.is_empty() || cells.cells.is_empty() {
        return Vec::new();
    }

    let starts = cell_start_chars(cells);
    let mut overlays = vec![OverlayItem::new(0, markers[0])];

    let after_barlines = cells
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.char == "|")
        .filter_map(|(idx, _)| starts.get(idx + 1).copied());

    for (marker, char_index) in markers[1..].iter().zip(after_barlines) {
        overlays.push(OverlayItem::new(char_index, *marker));
    }
    overlays
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_chars(line: &SnapshotLine) -> Vec<&str> {
        line.cells.iter().map(|c| c.char.as_str()).collect()
    }

    #[test]
    fn test_parse_accidentals_join_pitch() {
        let line = parse_cells("1#2bb3##b");
        assert_eq!(cell_chars(&line), vec!["1#", "2bb", "3##", "b"]);
    }

    #[test]
    fn test_parse_drops_controls_and_marks_continuations() {
        let line = parse_cells("1\t2\n\u{0301}");
        assert_eq!(cell_chars(&line), vec!["1", " ", "2", "\u{0301}"]);
        assert!(line.cells[3].continuation);
    }

    #[test]
    fn test_set_line_text_snaps_cursor_after_accidental() {
        let mut engine = MemoryEngine::from_lines(&["1"]);
        let display = engine.set_line_text(0, "1#2", Some(1)).unwrap();
        assert_eq!(display.text, "1#2");
        assert_eq!(display.cursor_pos, Some(2));
    }

    #[test]
    fn test_split_inside_cell_splits_after_it() {
        let mut engine = MemoryEngine::from_lines(&["1#23"]);
        let list = engine.split_line(0, 1).unwrap();
        assert_eq!(list.lines.len(), 2);
        assert_eq!(list.lines[0].text, "1#");
        assert_eq!(list.lines[1].text, "23");
        assert_eq!(list.lines[1].cursor_pos, Some(0));
    }

    #[test]
    fn test_join_reports_join_point() {
        let mut engine = MemoryEngine::from_lines(&["12", "34"]);
        let list = engine.join_lines(1).unwrap();
        assert_eq!(list.lines.len(), 1);
        assert_eq!(list.lines[0].text, "1234");
        assert_eq!(list.lines[0].cursor_pos, Some(2));

        let unchanged = engine.join_lines(0).unwrap();
        assert_eq!(unchanged.lines.len(), 1);
    }

    #[test]
    fn test_overlays() {
        let mut engine = MemoryEngine::from_lines(&["1# 2|3"]);
        engine.set_lyrics(0, "la li lo").unwrap();
        engine.set_tala(0, "X 2").unwrap();
        let list = engine.display_list().unwrap();
        let line = &list.lines[0];
        assert_eq!(
            line.lyrics,
            vec![OverlayItem::new(0, "la"), OverlayItem::new(3, "li"), OverlayItem::new(5, "lo")]
        );
        assert_eq!(line.talas, vec![OverlayItem::new(0, "X"), OverlayItem::new(5, "2")]);
    }

    #[test]
    fn test_unknown_line_is_an_error() {
        let mut engine = MemoryEngine::new();
        assert_eq!(
            engine.set_line_text(3, "1", None),
            Err(EngineError::LineOutOfRange { index: 3, count: 1 })
        );
    }
}
