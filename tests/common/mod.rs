//! Fakes shared by the integration tests: a line input, a host that records
//! what it was asked to paint, a monospace mirror backend and an engine that
//! can be told to fail.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use textarea_wasm::mirror::MirrorBackend;
use textarea_wasm::models::{Rect, SnapshotLine, TextareaDisplayList, TextareaLineDisplay};
use textarea_wasm::surface::{
    LineInput, MemoryEngine, NotationEngine, PlacedOverlay, SurfaceHost, TextareaSurface,
};
use textarea_wasm::{EngineError, Point, SurfaceConfig, SurfaceError};

pub const CHAR_WIDTH: f64 = 10.0;
pub const ROW_HEIGHT: f64 = 20.0;

// ============================================================================
// Line input
// ============================================================================

#[derive(Debug, Default)]
struct InputState {
    id: usize,
    value: String,
    selection: (usize, usize),
    focused: bool,
    connected: bool,
}

/// A textarea stand-in; clones share state like DOM references do
#[derive(Debug, Clone, Default)]
pub struct FakeInput(Rc<RefCell<InputState>>);

impl FakeInput {
    pub fn new(id: usize, value: &str) -> Self {
        let input = FakeInput(Rc::new(RefCell::new(InputState {
            id,
            connected: true,
            ..InputState::default()
        })));
        input.set_value(value);
        input
    }

    pub fn id(&self) -> usize {
        self.0.borrow().id
    }

    pub fn is_focused(&self) -> bool {
        self.0.borrow().focused
    }

    pub fn set_connected(&self, connected: bool) {
        self.0.borrow_mut().connected = connected;
    }

    pub fn connected(&self) -> bool {
        self.0.borrow().connected
    }

    /// What the browser does on a keystroke: new value, caret at `caret_units`
    pub fn type_value(&self, value: &str, caret_units: usize) {
        let mut state = self.0.borrow_mut();
        state.value = value.to_string();
        state.selection = (caret_units, caret_units);
    }

    pub fn selection(&self) -> (usize, usize) {
        self.0.borrow().selection
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

impl LineInput for FakeInput {
    fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    /// Like a textarea, assigning the value moves the caret to the end
    fn set_value(&self, text: &str) {
        let mut state = self.0.borrow_mut();
        state.value = text.to_string();
        let end = utf16_len(text);
        state.selection = (end, end);
    }

    fn selection_code_units(&self) -> (usize, usize) {
        self.0.borrow().selection
    }

    fn set_selection_code_units(&self, start: usize, end: usize) {
        let mut state = self.0.borrow_mut();
        let len = utf16_len(&state.value);
        state.selection = (start.min(len), end.min(len));
    }

    fn focus(&self) {
        self.0.borrow_mut().focused = true;
    }
}

// ============================================================================
// Host
// ============================================================================

#[derive(Debug, Default)]
pub struct FakeHost {
    next_id: usize,
    pub created: usize,
    pub removed: Vec<usize>,
    /// Last overlays placed, keyed by input id
    pub overlays: Vec<(usize, Vec<PlacedOverlay>)>,
    pub selection_rects: Vec<Rect>,
    pub next_timer: u32,
    pub timers_set: Vec<u32>,
    pub timers_cleared: Vec<u32>,
}

impl FakeHost {
    pub fn overlays_for(&self, input_id: usize) -> Vec<PlacedOverlay> {
        self.overlays
            .iter()
            .find(|(id, _)| *id == input_id)
            .map(|(_, placed)| placed.clone())
            .unwrap_or_default()
    }
}

impl SurfaceHost for FakeHost {
    type Input = FakeInput;
    type Timer = u32;

    fn create_line_input(&mut self, _line_index: usize, display: &TextareaLineDisplay) -> Result<FakeInput, SurfaceError> {
        let input = FakeInput::new(self.next_id, &display.text);
        self.next_id += 1;
        self.created += 1;
        Ok(input)
    }

    fn remove_line_input(&mut self, input: FakeInput) {
        input.set_connected(false);
        self.removed.push(input.id());
    }

    fn place_overlays(&mut self, input: &FakeInput, overlays: &[PlacedOverlay]) -> Result<(), SurfaceError> {
        self.overlays.retain(|(id, _)| *id != input.id());
        self.overlays.push((input.id(), overlays.to_vec()));
        Ok(())
    }

    fn show_selection_overlay(&mut self, _input: &FakeInput, rects: &[Rect]) -> Result<(), SurfaceError> {
        self.selection_rects = rects.to_vec();
        Ok(())
    }

    fn hide_selection_overlay(&mut self, _input: &FakeInput) {
        self.selection_rects.clear();
    }

    fn line_height(&self, _input: &FakeInput) -> f64 {
        ROW_HEIGHT
    }

    fn set_timer(&mut self, _delay_ms: f64) -> Option<u32> {
        self.next_timer += 1;
        self.timers_set.push(self.next_timer);
        Some(self.next_timer)
    }

    fn clear_timer(&mut self, timer: u32) {
        self.timers_cleared.push(timer);
    }
}

// ============================================================================
// Mirror backend
// ============================================================================

/// Monospace layout: every character is `CHAR_WIDTH` wide, rows wrap after
/// `wrap_chars` characters
#[derive(Debug, Default)]
pub struct FakeMirrorBackend {
    pub wrap_chars: Option<usize>,
    next_mirror: u32,
    pub mirrors_created: usize,
    pub mirrors_removed: usize,
    pub style_copies: usize,
    pub measurements: usize,
}

impl FakeMirrorBackend {
    pub fn wrapping(wrap_chars: usize) -> Self {
        Self {
            wrap_chars: Some(wrap_chars),
            ..Self::default()
        }
    }
}

impl MirrorBackend for FakeMirrorBackend {
    type Source = FakeInput;
    type Mirror = u32;

    fn is_connected(&self, source: &FakeInput) -> bool {
        source.connected()
    }

    fn source_text(&self, source: &FakeInput) -> String {
        source.value()
    }

    fn create_mirror(&mut self, _source: &FakeInput) -> Option<u32> {
        self.next_mirror += 1;
        self.mirrors_created += 1;
        Some(self.next_mirror)
    }

    fn copy_styles(&mut self, _source: &FakeInput, _mirror: &u32) {
        self.style_copies += 1;
    }

    fn measure_marker(&mut self, _mirror: &u32, before: &str, _after: &str) -> Option<Point> {
        self.measurements += 1;
        let n = before.chars().count();
        let (row, col) = match self.wrap_chars {
            Some(wrap) => (n / wrap, n % wrap),
            None => (0, n),
        };
        Some(Point::new(col as f64 * CHAR_WIDTH, row as f64 * ROW_HEIGHT))
    }

    fn remove_mirror(&mut self, _mirror: u32) {
        self.mirrors_removed += 1;
    }
}

// ============================================================================
// Engines
// ============================================================================

/// Memory engine whose calls can be made to fail
#[derive(Debug, Default)]
pub struct FlakyEngine {
    pub inner: MemoryEngine,
    pub fail: bool,
}

impl FlakyEngine {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            inner: MemoryEngine::from_lines(lines),
            fail: false,
        }
    }

    fn check(&self, call: &str) -> Result<(), EngineError> {
        if self.fail {
            return Err(EngineError::Call(format!("{} failed", call)));
        }
        Ok(())
    }
}

impl NotationEngine for FlakyEngine {
    fn set_line_text(
        &mut self,
        line_index: usize,
        text: &str,
        cursor_char_pos: Option<usize>,
    ) -> Result<TextareaLineDisplay, EngineError> {
        self.check("setLineText")?;
        self.inner.set_line_text(line_index, text, cursor_char_pos)
    }

    fn split_line(&mut self, line_index: usize, char_index: usize) -> Result<TextareaDisplayList, EngineError> {
        self.check("splitLine")?;
        self.inner.split_line(line_index, char_index)
    }

    fn join_lines(&mut self, line_index: usize) -> Result<TextareaDisplayList, EngineError> {
        self.check("joinLines")?;
        self.inner.join_lines(line_index)
    }

    fn display_list(&self) -> Result<TextareaDisplayList, EngineError> {
        self.inner.display_list()
    }

    fn line_cells(&self, line_index: usize) -> Result<SnapshotLine, EngineError> {
        self.check("getLineCells")?;
        self.inner.line_cells(line_index)
    }
}

// ============================================================================
// Surfaces
// ============================================================================

pub type TestSurface<E = MemoryEngine> = TextareaSurface<E, FakeHost, FakeMirrorBackend>;

pub fn test_config() -> SurfaceConfig {
    SurfaceConfig {
        fallback_x: -1.0,
        fallback_y: -1.0,
        ..SurfaceConfig::default()
    }
}

pub fn surface_with_engine<E: NotationEngine>(engine: E) -> TestSurface<E> {
    let mut surface = TextareaSurface::new(engine, FakeHost::default(), FakeMirrorBackend::default(), &test_config());
    surface.load().expect("load");
    surface
}

pub fn surface_with(lines: &[&str]) -> TestSurface {
    surface_with_engine(MemoryEngine::from_lines(lines))
}

pub fn input(surface: &TestSurface<impl NotationEngine>, line_index: usize) -> FakeInput {
    surface.line(line_index).expect("line exists").input.clone()
}

pub fn texts(surface: &TestSurface<impl NotationEngine>) -> Vec<String> {
    (0..surface.line_count())
        .map(|i| input(surface, i).value())
        .collect()
}
