//! The multi-line textarea surface
//!
//! Owns one [`LineHandle`] per rendered line. Browser events come in through
//! the `handle_*` methods; the surface translates code-unit offsets to
//! character indices, calls the engine and writes the engine's answer back.
//! Cross-line navigation always carries the *character* index across lines,
//! never the code-unit offset, so lines with non-BMP glyphs stay aligned.

use serde::Serialize;

use crate::config::SurfaceConfig;
use crate::error::{EngineError, SurfaceError};
use crate::mirror::{MirrorBackend, MirrorService, SurfaceKey};
use crate::models::{
    OverlayItem, OverlayKind, Point, TextRange, TextareaDisplayList, TextareaLineDisplay,
};
use crate::surface::engine::NotationEngine;
use crate::surface::host::{LineInput, SurfaceHost};
use crate::surface::keys::{EditorKey, Modifiers};
use crate::surface::overlay::place_overlays;
use crate::surface::schedule::Debouncer;
use crate::text::cell_map::{
    cell_index_to_char_pos, char_pos_to_cell_index, insertion_cell_index, CharPosToCellResult,
};
use crate::text::codec::{
    char_count, char_index_to_code_units, char_slice, code_units_to_char_index, split_at_char,
};
use crate::text::cursor::{ClickOutcome, Selection, SelectionController};
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};

/// A rendered line: its input element and the last text the engine gave it
pub struct LineHandle<I> {
    pub key: SurfaceKey,
    pub line_index: usize,
    pub input: I,
    /// Mirror of the engine's content for this line
    pub last_text: String,
    pub overlays: Vec<(OverlayKind, OverlayItem)>,
    pub label: Option<String>,
}

impl<I> LineHandle<I> {
    pub fn char_count(&self) -> usize {
        char_count(&self.last_text)
    }
}

fn report_paint_error(what: &str, line_index: usize, err: &SurfaceError) {
    if err.is_cosmetic() {
        wasm_log!("{} for line {} skipped: {}", what, line_index, err);
    } else {
        wasm_warn!("{} for line {} failed: {}", what, line_index, err);
    }
}

/// Borrows only `lines`, so callers can still use the other fields
fn line_at<I>(lines: &[LineHandle<I>], line_index: usize) -> Result<&LineHandle<I>, SurfaceError> {
    lines.get(line_index).ok_or(SurfaceError::LineOutOfRange {
        index: line_index,
        count: lines.len(),
    })
}

/// What happened to an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InputOutcome {
    /// The engine accepted the browser's text as-is
    Applied { cursor: usize },
    /// The engine changed the text; the element was overwritten
    Normalized { cursor: usize },
    /// Inside an IME composition; nothing forwarded
    Suppressed,
    /// The engine failed; the element was restored to its pre-edit value
    Rejected,
}

/// Whether the browser's default action should run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyOutcome {
    Handled,
    Default,
}

pub struct TextareaSurface<E, H, B>
where
    E: NotationEngine,
    H: SurfaceHost,
    B: MirrorBackend<Source = H::Input>,
{
    engine: E,
    host: H,
    mirrors: MirrorService<B>,
    lines: Vec<LineHandle<H::Input>>,
    next_key: SurfaceKey,
    focused: Option<usize>,
    composing: bool,
    selection: SelectionController,
    refresh: Debouncer<H::Timer>,
    title: Option<String>,
    composer: Option<String>,
}

impl<E, H, B> TextareaSurface<E, H, B>
where
    E: NotationEngine,
    H: SurfaceHost,
    B: MirrorBackend<Source = H::Input>,
{
    pub fn new(engine: E, host: H, backend: B, config: &SurfaceConfig) -> Self {
        Self {
            engine,
            host,
            mirrors: MirrorService::new(backend, config.fallback_position()),
            lines: Vec::new(),
            next_key: 0,
            focused: None,
            composing: false,
            selection: SelectionController::new(0).with_click_grace(config.drag_click_grace_ms),
            refresh: Debouncer::new(config.debounce_ms),
            title: None,
            composer: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn mirrors(&self) -> &MirrorService<B> {
        &self.mirrors
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line_index: usize) -> Option<&LineHandle<H::Input>> {
        self.lines.get(line_index)
    }

    pub fn focused_line(&self) -> Option<usize> {
        self.focused
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn composer(&self) -> Option<&str> {
        self.composer.as_deref()
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh.is_pending()
    }

    fn handle(&self, line_index: usize) -> Result<&LineHandle<H::Input>, SurfaceError> {
        line_at(&self.lines, line_index)
    }

    fn handle_mut(&mut self, line_index: usize) -> Result<&mut LineHandle<H::Input>, SurfaceError> {
        let count = self.lines.len();
        self.lines.get_mut(line_index).ok_or(SurfaceError::LineOutOfRange {
            index: line_index,
            count,
        })
    }

    /// Native selection of a line as character indices
    fn native_selection(&self, line_index: usize) -> Result<(usize, usize), SurfaceError> {
        let handle = self.handle(line_index)?;
        let text = handle.input.value();
        let (start, end) = handle.input.selection_code_units();
        Ok((
            code_units_to_char_index(&text, start),
            code_units_to_char_index(&text, end),
        ))
    }

    /// Caret of a line: the end of the native selection
    fn caret(&self, line_index: usize) -> Result<usize, SurfaceError> {
        Ok(self.native_selection(line_index)?.1)
    }

    fn apply_native_selection(&self, line_index: usize, start: usize, end: usize) -> Result<(), SurfaceError> {
        let handle = self.handle(line_index)?;
        let text = handle.input.value();
        handle.input.set_selection_code_units(
            char_index_to_code_units(&text, start),
            char_index_to_code_units(&text, end),
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Drop all line handles and rebuild from the engine's display list
    pub fn load(&mut self) -> Result<(), SurfaceError> {
        let list = self.engine.display_list()?;
        self.clear_lines();
        self.apply_display_list(&list)
    }

    fn clear_lines(&mut self) {
        while let Some(handle) = self.lines.pop() {
            self.mirrors.release(handle.key);
            self.host.remove_line_input(handle.input);
        }
        self.focused = None;
        self.selection.reset(0, 0);
    }

    /// Reconcile line handles with a full display list.
    ///
    /// Handle `i` always mirrors line `i`; extra handles are destroyed from
    /// the end and missing ones are created.
    pub fn apply_display_list(&mut self, list: &TextareaDisplayList) -> Result<(), SurfaceError> {
        self.title = list.title.clone();
        self.composer = list.composer.clone();

        while self.lines.len() > list.lines.len() {
            if let Some(handle) = self.lines.pop() {
                self.mirrors.release(handle.key);
                self.host.remove_line_input(handle.input);
            }
        }

        for (line_index, display) in list.lines.iter().enumerate() {
            if line_index < self.lines.len() {
                self.apply_line_display(line_index, display)?;
            } else {
                let input = self.host.create_line_input(line_index, display)?;
                input.set_value(&display.text);
                let key = self.next_key;
                self.next_key += 1;
                self.lines.push(LineHandle {
                    key,
                    line_index,
                    input,
                    last_text: display.text.clone(),
                    overlays: display.overlay_items(),
                    label: display.label.clone(),
                });
            }
        }

        if let Some(focused) = self.focused {
            if focused >= self.lines.len() {
                self.focused = None;
            }
        }

        self.refresh_all_overlays();
        wasm_log!("applied display list with {} lines", self.lines.len());
        Ok(())
    }

    /// Bring one handle in line with the engine's display for it
    fn apply_line_display(&mut self, line_index: usize, display: &TextareaLineDisplay) -> Result<(), SurfaceError> {
        let handle = self.handle_mut(line_index)?;
        let key = handle.key;
        let changed = handle.input.value() != display.text;
        if changed {
            handle.input.set_value(&display.text);
        }
        handle.last_text = display.text.clone();
        handle.overlays = display.overlay_items();
        handle.label = display.label.clone();
        handle.line_index = line_index;
        if changed {
            self.mirrors.invalidate_cache(key);
        }
        Ok(())
    }

    /// Re-measure and repaint the overlays of one line
    pub fn refresh_overlays(&mut self, line_index: usize) {
        let Some(handle) = self.lines.get(line_index) else {
            return;
        };
        let placed = place_overlays(&mut self.mirrors, handle.key, &handle.input, &handle.overlays);
        if let Err(err) = self.host.place_overlays(&handle.input, &placed) {
            report_paint_error("overlays", line_index, &err);
        }
    }

    fn refresh_all_overlays(&mut self) {
        for line_index in 0..self.lines.len() {
            self.refresh_overlays(line_index);
        }
    }

    /// Re-copy textarea styles into every mirror (font or zoom changed)
    pub fn sync_styles(&mut self) {
        self.mirrors
            .sync_all_styles(self.lines.iter().map(|handle| (handle.key, &handle.input)));
        self.refresh_all_overlays();
    }

    pub fn invalidate_cache(&mut self, line_index: usize) {
        if let Some(handle) = self.lines.get(line_index) {
            self.mirrors.invalidate_cache(handle.key);
        }
    }

    /// Cancel-and-replace the debounced notation refresh
    fn schedule_refresh(&mut self) {
        if let Some(previous) = self.refresh.take_pending() {
            self.host.clear_timer(previous);
        }
        if let Some(timer) = self.host.set_timer(self.refresh.delay_ms()) {
            self.refresh.arm(timer);
        }
    }

    /// The host's refresh timer fired
    pub fn notation_refresh_fired(&mut self) {
        self.refresh.complete();
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Focus a line and place the caret at a character index (both clamped).
    /// Returns the character index actually used.
    pub fn focus_line(&mut self, line_index: usize, char_index: usize) -> Result<usize, SurfaceError> {
        if self.lines.is_empty() {
            return Err(SurfaceError::LineOutOfRange { index: line_index, count: 0 });
        }
        let line_index = line_index.min(self.lines.len() - 1);
        let handle = &self.lines[line_index];

        let text = handle.input.value();
        let char_index = char_index.min(char_count(&text));
        let code_units = char_index_to_code_units(&text, char_index);

        self.host.hide_selection_overlay(&handle.input);
        handle.input.focus();
        handle.input.set_selection_code_units(code_units, code_units);

        self.focused = Some(line_index);
        self.selection.reset(char_count(&text), char_index);
        Ok(char_index)
    }

    pub fn handle_focus(&mut self, line_index: usize) -> Result<(), SurfaceError> {
        let handle = line_at(&self.lines, line_index)?;
        self.host.hide_selection_overlay(&handle.input);
        if self.focused != Some(line_index) {
            let max_index = handle.char_count();
            self.focused = Some(line_index);
            self.selection.reset(max_index, 0);
        }
        self.sync_selection_from_input(line_index)
    }

    /// Browsers hide an unfocused textarea's selection, so paint an overlay
    /// approximating it
    pub fn handle_blur(&mut self, line_index: usize) -> Result<(), SurfaceError> {
        let (start, end) = self.native_selection(line_index)?;
        if start >= end {
            return Ok(());
        }
        let handle = line_at(&self.lines, line_index)?;
        let line_height = self.host.line_height(&handle.input);
        let rects = self
            .mirrors
            .selection_rects(handle.key, &handle.input, start, end, line_height);
        if let Err(err) = self.host.show_selection_overlay(&handle.input, &rects) {
            report_paint_error("selection overlay", line_index, &err);
        }
        Ok(())
    }

    /// Pull the native selection into the selection controller unless it
    /// already agrees (which keeps our notion of the moving end)
    pub fn sync_selection_from_input(&mut self, line_index: usize) -> Result<(), SurfaceError> {
        let (start, end) = self.native_selection(line_index)?;
        let max_index = self.handle(line_index)?.char_count();
        self.selection.set_max_index(max_index);

        let agrees = match self.selection.get_selection() {
            Some(sel) => sel.start == start && sel.end == end,
            None => start == end && self.selection.cursor() == end,
        };
        if !agrees {
            self.selection.reset(max_index, end);
            if start < end {
                self.selection.initialize_selection(start, end);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn composition_start(&mut self) {
        self.composing = true;
    }

    /// Forward the composed text now that the IME is done
    pub fn composition_end(&mut self, line_index: usize) -> Result<InputOutcome, SurfaceError> {
        self.composing = false;
        self.handle_input(line_index)
    }

    /// Forward the browser-edited text of a line to the engine
    pub fn handle_input(&mut self, line_index: usize) -> Result<InputOutcome, SurfaceError> {
        if self.composing {
            return Ok(InputOutcome::Suppressed);
        }

        let handle = self.handle(line_index)?;
        let raw = handle.input.value();
        let (_, caret_units) = handle.input.selection_code_units();
        let caret = code_units_to_char_index(&raw, caret_units);

        self.forward_line_text(line_index, &raw, caret)
    }

    /// Insert text at the caret (or over the selection) of the focused line.
    ///
    /// A caret strictly inside a multi-character cell inserts after the cell.
    pub fn insert_text(&mut self, text: &str) -> Result<InputOutcome, SurfaceError> {
        let line_index = self.focused.ok_or(SurfaceError::MissingTarget("focused line"))?;
        self.sync_selection_from_input(line_index)?;
        let current = self.handle(line_index)?.last_text.clone();

        let (start, end) = match self.selection.get_selection().filter(|sel| !sel.is_empty()) {
            Some(sel) => (sel.start, sel.end),
            None => {
                let caret = self.caret(line_index)?;
                let cells = match self.engine.line_cells(line_index) {
                    Ok(cells) => cells,
                    Err(err) => {
                        wasm_error!("insertText: engine could not provide cells: {}", err);
                        return Ok(InputOutcome::Rejected);
                    }
                };
                let pos = cell_index_to_char_pos(&cells, insertion_cell_index(&cells, caret));
                (pos, pos)
            }
        };

        let (before, _) = split_at_char(&current, start);
        let (_, after) = split_at_char(&current, end);
        let new_text = format!("{}{}{}", before, text, after);
        let cursor = start + char_count(text);

        self.forward_line_text(line_index, &new_text, cursor)
    }

    /// Send `(line, text, cursor)` to the engine and apply its answer.
    /// On engine failure the element goes back to its pre-edit value.
    fn forward_line_text(&mut self, line_index: usize, text: &str, cursor: usize) -> Result<InputOutcome, SurfaceError> {
        let result = self
            .engine
            .set_line_text(line_index, text, Some(cursor))
            .and_then(|display| {
                if display.line_index != line_index {
                    return Err(EngineError::UnexpectedShape(format!(
                        "asked for line {}, engine answered for line {}",
                        line_index, display.line_index
                    )));
                }
                Ok(display)
            });

        let display = match result {
            Ok(display) => display,
            Err(err) => {
                wasm_error!("setLineText failed for line {}: {}", line_index, err);
                self.restore_line(line_index, cursor)?;
                return Ok(InputOutcome::Rejected);
            }
        };

        let normalized = display.text != text;
        let max_index = char_count(&display.text);
        let engine_cursor = display.cursor_pos.unwrap_or(max_index).min(max_index);

        self.apply_line_display(line_index, &display)?;

        match display.selection.filter(|range| !range.is_empty()) {
            Some(TextRange { start, end }) => {
                let (start, end) = (start.min(max_index), end.min(max_index));
                self.apply_native_selection(line_index, start, end)?;
                self.selection.reset(max_index, engine_cursor);
                self.selection.initialize_selection(start, end);
            }
            None => {
                self.apply_native_selection(line_index, engine_cursor, engine_cursor)?;
                self.selection.reset(max_index, engine_cursor);
            }
        }
        self.focused = Some(line_index);

        self.refresh_overlays(line_index);
        self.schedule_refresh();

        if normalized {
            wasm_info!("line {} normalized by engine, cursor {}", line_index, engine_cursor);
            Ok(InputOutcome::Normalized { cursor: engine_cursor })
        } else {
            Ok(InputOutcome::Applied { cursor: engine_cursor })
        }
    }

    fn restore_line(&mut self, line_index: usize, cursor: usize) -> Result<(), SurfaceError> {
        let handle = self.handle(line_index)?;
        let previous = handle.last_text.clone();
        handle.input.set_value(&previous);
        let cursor = cursor.min(char_count(&previous));
        self.apply_native_selection(line_index, cursor, cursor)?;
        self.selection.reset(char_count(&previous), cursor);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, line_index: usize, key: EditorKey, modifiers: Modifiers) -> Result<KeyOutcome, SurfaceError> {
        if self.composing || key == EditorKey::Other || modifiers.has_command() {
            return Ok(KeyOutcome::Default);
        }
        self.handle(line_index)?;

        if modifiers.shift {
            return self.extend_selection(line_index, key);
        }

        let outcome = match key {
            EditorKey::ArrowUp => self.move_vertical(line_index, -1)?,
            EditorKey::ArrowDown => self.move_vertical(line_index, 1)?,
            EditorKey::ArrowLeft => self.move_left(line_index)?,
            EditorKey::ArrowRight => self.move_right(line_index)?,
            EditorKey::Enter => self.split_line(line_index)?,
            EditorKey::Backspace => self.join_with_previous(line_index)?,
            _ => KeyOutcome::Default,
        };
        // The browser is about to move the caret itself; any range we hold is stale
        if outcome == KeyOutcome::Default {
            self.selection.clear();
        }
        Ok(outcome)
    }

    fn extend_selection(&mut self, line_index: usize, key: EditorKey) -> Result<KeyOutcome, SurfaceError> {
        if self.focused != Some(line_index) {
            let max_index = self.handle(line_index)?.char_count();
            self.focused = Some(line_index);
            self.selection.reset(max_index, 0);
        }
        self.sync_selection_from_input(line_index)?;

        match key {
            EditorKey::ArrowLeft => self.selection.extend_left(),
            EditorKey::ArrowRight => self.selection.extend_right(),
            EditorKey::Home | EditorKey::ArrowUp => self.selection.extend_to_start(),
            EditorKey::End | EditorKey::ArrowDown => self.selection.extend_to_end(),
            _ => return Ok(KeyOutcome::Default),
        }

        if let Some(sel) = self.selection.get_selection() {
            self.apply_native_selection(line_index, sel.start, sel.end)?;
        }
        Ok(KeyOutcome::Handled)
    }

    /// Move to the same character index on the line above or below
    fn move_vertical(&mut self, line_index: usize, direction: isize) -> Result<KeyOutcome, SurfaceError> {
        let Some(target) = line_index.checked_add_signed(direction) else {
            return Ok(KeyOutcome::Default);
        };
        if target >= self.lines.len() {
            return Ok(KeyOutcome::Default);
        }
        let caret = self.caret(line_index)?;
        self.focus_line(target, caret)?;
        Ok(KeyOutcome::Handled)
    }

    fn move_left(&mut self, line_index: usize) -> Result<KeyOutcome, SurfaceError> {
        let (start, end) = self.native_selection(line_index)?;
        if start != end || end != 0 || line_index == 0 {
            return Ok(KeyOutcome::Default);
        }
        let previous_len = self.handle(line_index - 1)?.char_count();
        self.focus_line(line_index - 1, previous_len)?;
        Ok(KeyOutcome::Handled)
    }

    fn move_right(&mut self, line_index: usize) -> Result<KeyOutcome, SurfaceError> {
        let (start, end) = self.native_selection(line_index)?;
        let len = char_count(&self.handle(line_index)?.input.value());
        if start != end || end < len || line_index + 1 >= self.lines.len() {
            return Ok(KeyOutcome::Default);
        }
        self.focus_line(line_index + 1, 0)?;
        Ok(KeyOutcome::Handled)
    }

    /// Enter: split at the caret, focus the start of the new line
    fn split_line(&mut self, line_index: usize) -> Result<KeyOutcome, SurfaceError> {
        let (split_at, _) = self.native_selection(line_index)?;
        let list = match self.engine.split_line(line_index, split_at) {
            Ok(list) => list,
            Err(err) => {
                wasm_error!("splitLine failed for line {}: {}", line_index, err);
                return Ok(KeyOutcome::Handled);
            }
        };
        if list.lines.len() <= line_index + 1 {
            wasm_warn!("splitLine returned {} lines, expected more than {}", list.lines.len(), line_index + 1);
        }

        self.apply_display_list(&list)?;
        self.focus_line(line_index + 1, 0)?;
        self.schedule_refresh();
        wasm_info!("split line {} at char {}", line_index, split_at);
        Ok(KeyOutcome::Handled)
    }

    /// Backspace at the start of a line: merge it into the previous line
    fn join_with_previous(&mut self, line_index: usize) -> Result<KeyOutcome, SurfaceError> {
        let (start, end) = self.native_selection(line_index)?;
        if start != end || end != 0 || line_index == 0 {
            return Ok(KeyOutcome::Default);
        }
        let previous_len = self.handle(line_index - 1)?.char_count();

        let list = match self.engine.join_lines(line_index) {
            Ok(list) => list,
            Err(err) => {
                wasm_error!("joinLines failed for line {}: {}", line_index, err);
                return Ok(KeyOutcome::Handled);
            }
        };

        let join_point = list
            .lines
            .get(line_index - 1)
            .and_then(|line| line.cursor_pos)
            .unwrap_or(previous_len);

        self.apply_display_list(&list)?;
        self.focus_line(line_index - 1, join_point)?;
        self.schedule_refresh();
        wasm_info!("joined line {} into {} at char {}", line_index, line_index - 1, join_point);
        Ok(KeyOutcome::Handled)
    }

    // ------------------------------------------------------------------
    // Mouse
    // ------------------------------------------------------------------

    /// Character index under a pixel point of a line
    pub fn hit_test(&mut self, line_index: usize, point: Point) -> Result<usize, SurfaceError> {
        let handle = line_at(&self.lines, line_index)?;
        Ok(self.mirrors.hit_test(handle.key, &handle.input, point))
    }

    pub fn mouse_down(&mut self, line_index: usize, point: Point) -> Result<usize, SurfaceError> {
        let hit = self.hit_test(line_index, point)?;
        if self.focused != Some(line_index) {
            self.focus_line(line_index, hit)?;
        }
        let max_index = self.handle(line_index)?.char_count();
        self.selection.set_max_index(max_index);
        self.selection.mouse_down(hit);
        self.apply_native_selection(line_index, hit, hit)?;
        Ok(hit)
    }

    pub fn mouse_move(&mut self, line_index: usize, point: Point) -> Result<bool, SurfaceError> {
        if !self.selection.is_dragging() || self.focused != Some(line_index) {
            return Ok(false);
        }
        let hit = self.hit_test(line_index, point)?;
        if !self.selection.mouse_move(hit) {
            return Ok(false);
        }
        if let Some(sel) = self.selection.get_selection() {
            self.apply_native_selection(line_index, sel.start, sel.end)?;
        }
        Ok(true)
    }

    pub fn mouse_up(&mut self, now_ms: f64) {
        self.selection.mouse_up(now_ms);
    }

    pub fn click(&mut self, line_index: usize, point: Point, now_ms: f64) -> Result<ClickOutcome, SurfaceError> {
        let hit = self.hit_test(line_index, point)?;
        let outcome = self.selection.click(hit, now_ms);
        match outcome {
            ClickOutcome::KeptSelection => {
                if let Some(sel) = self.selection.get_selection() {
                    self.apply_native_selection(line_index, sel.start, sel.end)?;
                }
            }
            ClickOutcome::PlacedCaret => {
                let caret = self.selection.cursor();
                self.apply_native_selection(line_index, caret, caret)?;
            }
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    pub fn get_selection(&self) -> Option<Selection> {
        self.selection.get_selection()
    }

    pub fn get_selected_text(&self) -> String {
        match self.focused.and_then(|line| self.lines.get(line)) {
            Some(handle) => self.selection.selected_text(&handle.last_text),
            None => String::new(),
        }
    }

    pub fn selection_controller(&self) -> &SelectionController {
        &self.selection
    }

    /// Selected text of a line read from the native selection
    pub fn native_selected_text(&self, line_index: usize) -> Result<String, SurfaceError> {
        let (start, end) = self.native_selection(line_index)?;
        Ok(char_slice(&self.handle(line_index)?.input.value(), start, end).to_string())
    }

    pub fn get_character_position(&mut self, line_index: usize, char_index: usize) -> Result<Point, SurfaceError> {
        let handle = line_at(&self.lines, line_index)?;
        Ok(self
            .mirrors
            .get_character_position(handle.key, &handle.input, char_index))
    }

    pub fn get_character_positions(
        &mut self,
        line_index: usize,
        indices: &[usize],
    ) -> Result<Vec<(usize, Point)>, SurfaceError> {
        let handle = line_at(&self.lines, line_index)?;
        Ok(self
            .mirrors
            .get_character_positions(handle.key, &handle.input, indices)
            .into_iter()
            .collect())
    }

    pub fn char_pos_to_cell_index(&self, line_index: usize, char_pos: usize) -> Result<CharPosToCellResult, SurfaceError> {
        let cells = self.engine.line_cells(line_index)?;
        Ok(char_pos_to_cell_index(&cells, char_pos))
    }

    pub fn cell_index_to_char_pos(&self, line_index: usize, cell_index: usize) -> Result<usize, SurfaceError> {
        let cells = self.engine.line_cells(line_index)?;
        Ok(cell_index_to_char_pos(&cells, cell_index))
    }

    /// Detach every line input and mirror
    pub fn destroy(&mut self) {
        if let Some(pending) = self.refresh.take_pending() {
            self.host.clear_timer(pending);
        }
        self.clear_lines();
        self.mirrors.release_all();
    }
}
