//! Cursor and selection management for one line
//!
//! Pure character positions with no musical knowledge. The controller owns
//! the caret, the active selection range and the mouse-drag state; every
//! mutation leaves the range normalized (`start <= end`) and clamped to
//! `[0, max_index]`.

use serde::{Deserialize, Serialize};

use crate::models::TextRange;
use crate::text::codec::char_slice;

/// Selection range in character indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub active: bool,
}

impl Selection {
    /// Active selection covering `a..b` in either order
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
            active: true,
        }
    }

    /// Check if this range is empty (start == end)
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if a position is contained within this range (exclusive end)
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }
}

/// Observable state of the selection machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPhase {
    NoSelection,
    /// Active with start == end (seeded, nothing highlighted yet)
    Caret,
    /// Active and non-empty
    Selecting,
}

/// What a `click` did after a possible drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click belonged to a just-finished drag; the selection was kept
    KeptSelection,
    /// Selection cleared and caret placed at the hit
    PlacedCaret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Start,
    End,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct DragState {
    dragging: bool,
    anchor: usize,
    /// Time of the `mouseup` that ended the last drag
    released_at: Option<f64>,
}

/// Cursor and selection state machine for the focused line
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionController {
    selection: Option<Selection>,
    cursor: usize,
    max_index: usize,
    drag: DragState,
    click_grace_ms: f64,
}

impl SelectionController {
    pub fn new(max_index: usize) -> Self {
        Self {
            selection: None,
            cursor: 0,
            max_index,
            drag: DragState::default(),
            click_grace_ms: 10.0,
        }
    }

    pub fn with_click_grace(mut self, grace_ms: f64) -> Self {
        self.click_grace_ms = grace_ms;
        self
    }

    /// Forget everything and start over on a (possibly different) line
    pub fn reset(&mut self, max_index: usize, cursor: usize) {
        self.selection = None;
        self.drag = DragState::default();
        self.max_index = max_index;
        self.cursor = cursor.min(max_index);
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the caret without touching the selection
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.max_index);
    }

    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// Update the line length, clamping cursor and selection into range
    pub fn set_max_index(&mut self, max_index: usize) {
        self.max_index = max_index;
        self.cursor = self.cursor.min(max_index);
        if let Some(sel) = self.selection.as_mut() {
            sel.start = sel.start.min(max_index);
            sel.end = sel.end.min(max_index);
        }
    }

    /// Replace any prior selection with the normalized range `a..b`.
    ///
    /// The caret follows `b`, the moving end.
    pub fn initialize_selection(&mut self, a: usize, b: usize) {
        let a = a.min(self.max_index);
        let b = b.min(self.max_index);
        self.selection = Some(Selection::new(a, b));
        self.cursor = b;
    }

    pub fn extend_left(&mut self) {
        self.extend_by(-1);
    }

    pub fn extend_right(&mut self) {
        self.extend_by(1);
    }

    fn extend_by(&mut self, delta: isize) {
        let sel = self.seed_selection();
        let boundary = if self.cursor == sel.end {
            Boundary::End
        } else {
            Boundary::Start
        };
        let moved = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.max_index);

        let (a, b) = match boundary {
            Boundary::Start => (moved, sel.end),
            Boundary::End => (sel.start, moved),
        };
        self.selection = Some(Selection::new(a, b));
        self.cursor = moved;
    }

    pub fn extend_to_start(&mut self) {
        let anchor = self.anchor();
        self.initialize_selection(anchor, 0);
    }

    pub fn extend_to_end(&mut self) {
        let anchor = self.anchor();
        self.initialize_selection(anchor, self.max_index);
    }

    /// The boundary that stays put while the cursor moves
    fn anchor(&self) -> usize {
        match self.active_selection() {
            Some(sel) if self.cursor == sel.start => sel.end,
            Some(sel) => sel.start,
            None => self.cursor,
        }
    }

    fn seed_selection(&mut self) -> Selection {
        match self.active_selection() {
            Some(sel) => sel,
            None => {
                let seeded = Selection::new(self.cursor, self.cursor);
                self.selection = Some(seeded);
                seeded
            }
        }
    }

    fn active_selection(&self) -> Option<Selection> {
        self.selection.filter(|sel| sel.active)
    }

    pub fn clear(&mut self) {
        if let Some(sel) = self.selection.as_mut() {
            sel.active = false;
        }
    }

    /// True iff a selection exists and is active, even when it is empty
    pub fn has_selection(&self) -> bool {
        self.active_selection().is_some()
    }

    /// True iff there is highlighted text (`start < end`)
    pub fn has_non_empty_selection(&self) -> bool {
        self.active_selection().is_some_and(|sel| !sel.is_empty())
    }

    pub fn get_selection(&self) -> Option<Selection> {
        self.active_selection()
    }

    pub fn phase(&self) -> SelectionPhase {
        match self.active_selection() {
            None => SelectionPhase::NoSelection,
            Some(sel) if sel.is_empty() => SelectionPhase::Caret,
            Some(_) => SelectionPhase::Selecting,
        }
    }

    /// Text covered by the selection, empty when nothing is highlighted
    pub fn selected_text(&self, line_text: &str) -> String {
        match self.active_selection() {
            Some(sel) => char_slice(line_text, sel.start, sel.end).to_string(),
            None => String::new(),
        }
    }

    // ------------------------------------------------------------------
    // Mouse drag
    // ------------------------------------------------------------------

    pub fn is_dragging(&self) -> bool {
        self.drag.dragging
    }

    /// Seed a selection at the hit-tested character index
    pub fn mouse_down(&mut self, hit: usize) {
        let hit = hit.min(self.max_index);
        self.drag = DragState {
            dragging: true,
            anchor: hit,
            released_at: None,
        };
        self.initialize_selection(hit, hit);
    }

    /// Returns true if the selection changed
    pub fn mouse_move(&mut self, hit: usize) -> bool {
        if !self.drag.dragging {
            return false;
        }
        let before = self.selection;
        self.initialize_selection(self.drag.anchor, hit);
        before != self.selection
    }

    pub fn mouse_up(&mut self, now_ms: f64) {
        if self.drag.dragging {
            self.drag.dragging = false;
            self.drag.released_at = Some(now_ms);
        }
    }

    /// Handle the `click` that browsers fire after `mouseup`.
    ///
    /// Within the grace period after a drag that produced a range, the click
    /// must not collapse the selection it just made.
    pub fn click(&mut self, hit: usize, now_ms: f64) -> ClickOutcome {
        let released_at = self.drag.released_at.take();
        let just_dragged =
            released_at.is_some_and(|released| now_ms - released <= self.click_grace_ms);

        if just_dragged && self.has_non_empty_selection() {
            return ClickOutcome::KeptSelection;
        }

        self.clear();
        self.set_cursor(hit);
        ClickOutcome::PlacedCaret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_selection_normalizes() {
        let mut controller = SelectionController::new(10);
        controller.initialize_selection(5, 2);
        let sel = controller.get_selection().unwrap();
        assert_eq!((sel.start, sel.end), (2, 5));
        assert_eq!(controller.cursor(), 2);
        assert_eq!(controller.phase(), SelectionPhase::Selecting);
    }

    #[test]
    fn test_extend_right_then_clear() {
        let mut controller = SelectionController::new(10);
        for _ in 0..3 {
            controller.extend_right();
        }
        let sel = controller.get_selection().unwrap();
        assert_eq!((sel.start, sel.end), (0, 3));
        assert_eq!(controller.cursor(), 3);

        controller.clear();
        assert!(!controller.has_selection());
        assert_eq!(controller.phase(), SelectionPhase::NoSelection);
    }

    #[test]
    fn test_extend_shrinks_then_crosses_anchor() {
        let mut controller = SelectionController::new(10);
        controller.set_cursor(3);
        controller.extend_right();
        controller.extend_right();
        assert_eq!(controller.get_selection().map(|s| (s.start, s.end)), Some((3, 5)));

        controller.extend_left();
        controller.extend_left();
        let sel = controller.get_selection().unwrap();
        assert_eq!((sel.start, sel.end), (3, 3));
        assert!(controller.has_selection());
        assert!(!controller.has_non_empty_selection());

        controller.extend_left();
        assert_eq!(controller.get_selection().map(|s| (s.start, s.end)), Some((2, 3)));
        assert_eq!(controller.cursor(), 2);
    }

    #[test]
    fn test_extend_is_clamped() {
        let mut controller = SelectionController::new(2);
        controller.extend_left();
        assert_eq!(controller.get_selection().map(|s| (s.start, s.end)), Some((0, 0)));

        controller.set_cursor(2);
        controller.clear();
        controller.extend_right();
        assert_eq!(controller.get_selection().map(|s| (s.start, s.end)), Some((2, 2)));
    }

    #[test]
    fn test_extend_to_bounds_keeps_anchor() {
        let mut controller = SelectionController::new(8);
        controller.set_cursor(4);
        controller.extend_right();
        controller.extend_to_start();
        assert_eq!(controller.get_selection().map(|s| (s.start, s.end)), Some((0, 4)));
        assert_eq!(controller.cursor(), 0);

        controller.extend_to_end();
        assert_eq!(controller.get_selection().map(|s| (s.start, s.end)), Some((4, 8)));
        assert_eq!(controller.cursor(), 8);
    }

    #[test]
    fn test_drag_survives_trailing_click() {
        let mut controller = SelectionController::new(10);
        controller.mouse_down(2);
        assert_eq!(controller.phase(), SelectionPhase::Caret);
        assert!(controller.mouse_move(6));
        assert!(!controller.mouse_move(6));
        controller.mouse_up(100.0);
        assert!(!controller.is_dragging());

        assert_eq!(controller.click(6, 104.0), ClickOutcome::KeptSelection);
        assert_eq!(controller.get_selection().map(|s| (s.start, s.end)), Some((2, 6)));

        // A later click is a plain click
        assert_eq!(controller.click(1, 500.0), ClickOutcome::PlacedCaret);
        assert!(!controller.has_selection());
        assert_eq!(controller.cursor(), 1);
    }

    #[test]
    fn test_click_without_drag_places_caret() {
        let mut controller = SelectionController::new(10);
        controller.mouse_down(4);
        controller.mouse_up(10.0);
        assert_eq!(controller.click(4, 11.0), ClickOutcome::PlacedCaret);
        assert_eq!(controller.cursor(), 4);
    }

    #[test]
    fn test_selected_text_uses_char_indices() {
        let mut controller = SelectionController::new(4);
        controller.initialize_selection(1, 3);
        assert_eq!(controller.selected_text("a\u{1D538}bc"), "\u{1D538}b");
    }

    #[test]
    fn test_shrinking_line_clamps_selection() {
        let mut controller = SelectionController::new(10);
        controller.initialize_selection(3, 9);
        controller.set_max_index(5);
        assert_eq!(controller.get_selection().map(|s| (s.start, s.end)), Some((3, 5)));
        assert_eq!(controller.cursor(), 5);
    }
}
