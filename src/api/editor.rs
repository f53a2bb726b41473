//! `TextareaEditor`: the multi-line editing surface exported to JS
//!
//! JS owns the event listeners and forwards each event with the index of
//! the line it fired on (`data-line-index` on the textarea).

use wasm_bindgen::prelude::*;
use web_sys::{Element, KeyboardEvent};

use crate::api::helpers::{serialize, to_js_error};
use crate::config::current_config;
use crate::mirror::dom::DomMirrorBackend;
use crate::models::Point;
use crate::surface::dom::{DomHost, JsEngineBridge, JsNotationEngine};
use crate::surface::{EditorKey, KeyOutcome, Modifiers, TextareaSurface};
use crate::text::ClickOutcome;
use crate::wasm_info;

type DomSurface = TextareaSurface<JsEngineBridge, DomHost, DomMirrorBackend>;

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or(0.0)
}

#[wasm_bindgen]
pub struct TextareaEditor {
    surface: DomSurface,
}

#[wasm_bindgen]
impl TextareaEditor {
    /// Create an editor rendering into `container`.
    ///
    /// `on_refresh` is called (debounced) after edits so staff notation and
    /// inspectors can recompute.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: Element,
        engine: JsNotationEngine,
        on_refresh: Option<js_sys::Function>,
    ) -> Result<TextareaEditor, JsValue> {
        let config = current_config();
        let host = DomHost::new(container, on_refresh).map_err(|e| to_js_error("TextareaEditor", e))?;
        let surface = TextareaSurface::new(
            JsEngineBridge::new(engine),
            host,
            DomMirrorBackend::new(&config),
            &config,
        );
        wasm_info!("TextareaEditor created (debounce {}ms)", config.debounce_ms);
        Ok(TextareaEditor { surface })
    }

    /// Rebuild every line from the engine's display list
    pub fn render(&mut self) -> Result<(), JsValue> {
        self.surface.load().map_err(|e| to_js_error("render", e))
    }

    /// Reconcile with a display list the caller already has
    #[wasm_bindgen(js_name = applyDisplayList)]
    pub fn apply_display_list(&mut self, list_js: JsValue) -> Result<(), JsValue> {
        let list = crate::api::helpers::deserialize(list_js, "Failed to deserialize display list")?;
        self.surface
            .apply_display_list(&list)
            .map_err(|e| to_js_error("applyDisplayList", e))
    }

    #[wasm_bindgen(js_name = lineCount)]
    pub fn line_count(&self) -> usize {
        self.surface.line_count()
    }

    #[wasm_bindgen(js_name = focusedLine)]
    pub fn focused_line(&self) -> Option<usize> {
        self.surface.focused_line()
    }

    /// Focus a line with the caret at a character index (both clamped)
    #[wasm_bindgen(js_name = focusLine)]
    pub fn focus_line(&mut self, line_index: usize, char_index: usize) -> Result<usize, JsValue> {
        self.surface
            .focus_line(line_index, char_index)
            .map_err(|e| to_js_error("focusLine", e))
    }

    #[wasm_bindgen(js_name = handleInput)]
    pub fn handle_input(&mut self, line_index: usize) -> Result<JsValue, JsValue> {
        let outcome = self
            .surface
            .handle_input(line_index)
            .map_err(|e| to_js_error("handleInput", e))?;
        serialize(&outcome, "Failed to serialize input outcome")
    }

    /// Returns true (and prevents the default action) if the key was handled
    #[wasm_bindgen(js_name = handleKeyDown)]
    pub fn handle_key_down(&mut self, line_index: usize, event: &KeyboardEvent) -> Result<bool, JsValue> {
        let key = EditorKey::from_key_name(&event.key());
        let modifiers = Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        };
        let outcome = self
            .surface
            .handle_key(line_index, key, modifiers)
            .map_err(|e| to_js_error("handleKeyDown", e))?;
        if outcome == KeyOutcome::Handled {
            event.prevent_default();
            return Ok(true);
        }
        Ok(false)
    }

    #[wasm_bindgen(js_name = compositionStart)]
    pub fn composition_start(&mut self) {
        self.surface.composition_start();
    }

    #[wasm_bindgen(js_name = compositionEnd)]
    pub fn composition_end(&mut self, line_index: usize) -> Result<JsValue, JsValue> {
        let outcome = self
            .surface
            .composition_end(line_index)
            .map_err(|e| to_js_error("compositionEnd", e))?;
        serialize(&outcome, "Failed to serialize input outcome")
    }

    #[wasm_bindgen(js_name = handleFocus)]
    pub fn handle_focus(&mut self, line_index: usize) -> Result<(), JsValue> {
        self.surface
            .handle_focus(line_index)
            .map_err(|e| to_js_error("handleFocus", e))
    }

    #[wasm_bindgen(js_name = handleBlur)]
    pub fn handle_blur(&mut self, line_index: usize) -> Result<(), JsValue> {
        self.surface
            .handle_blur(line_index)
            .map_err(|e| to_js_error("handleBlur", e))
    }

    /// `x`/`y` are relative to the textarea's border box
    #[wasm_bindgen(js_name = handleMouseDown)]
    pub fn handle_mouse_down(&mut self, line_index: usize, x: f64, y: f64) -> Result<usize, JsValue> {
        self.surface
            .mouse_down(line_index, Point::new(x, y))
            .map_err(|e| to_js_error("handleMouseDown", e))
    }

    #[wasm_bindgen(js_name = handleMouseMove)]
    pub fn handle_mouse_move(&mut self, line_index: usize, x: f64, y: f64) -> Result<bool, JsValue> {
        self.surface
            .mouse_move(line_index, Point::new(x, y))
            .map_err(|e| to_js_error("handleMouseMove", e))
    }

    #[wasm_bindgen(js_name = handleMouseUp)]
    pub fn handle_mouse_up(&mut self) {
        self.surface.mouse_up(now_ms());
    }

    /// Returns true if the click kept a just-dragged selection
    #[wasm_bindgen(js_name = handleClick)]
    pub fn handle_click(&mut self, line_index: usize, x: f64, y: f64) -> Result<bool, JsValue> {
        let outcome = self
            .surface
            .click(line_index, Point::new(x, y), now_ms())
            .map_err(|e| to_js_error("handleClick", e))?;
        Ok(outcome == ClickOutcome::KeptSelection)
    }

    #[wasm_bindgen(js_name = getCharacterPosition)]
    pub fn get_character_position(&mut self, line_index: usize, char_index: usize) -> Result<JsValue, JsValue> {
        let point = self
            .surface
            .get_character_position(line_index, char_index)
            .map_err(|e| to_js_error("getCharacterPosition", e))?;
        serialize(&point, "Failed to serialize position")
    }

    /// Batched lookup; returns `[[charIndex, {x, y}], ...]`
    #[wasm_bindgen(js_name = getCharacterPositions)]
    pub fn get_character_positions(&mut self, line_index: usize, indices: Vec<u32>) -> Result<JsValue, JsValue> {
        let indices: Vec<usize> = indices.into_iter().map(|index| index as usize).collect();
        let positions = self
            .surface
            .get_character_positions(line_index, &indices)
            .map_err(|e| to_js_error("getCharacterPositions", e))?;
        serialize(&positions, "Failed to serialize positions")
    }

    #[wasm_bindgen(js_name = hasSelection)]
    pub fn has_selection(&self) -> bool {
        self.surface.has_selection()
    }

    /// `{start, end, active}` or `null`
    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Result<JsValue, JsValue> {
        serialize(&self.surface.get_selection(), "Failed to serialize selection")
    }

    #[wasm_bindgen(js_name = getSelectedText)]
    pub fn get_selected_text(&self) -> String {
        self.surface.get_selected_text()
    }

    #[wasm_bindgen(js_name = insertText)]
    pub fn insert_text(&mut self, text: &str) -> Result<JsValue, JsValue> {
        let outcome = self
            .surface
            .insert_text(text)
            .map_err(|e| to_js_error("insertText", e))?;
        serialize(&outcome, "Failed to serialize input outcome")
    }

    #[wasm_bindgen(js_name = charPosToCellIndex)]
    pub fn char_pos_to_cell_index(&self, line_index: usize, char_pos: usize) -> Result<JsValue, JsValue> {
        let result = self
            .surface
            .char_pos_to_cell_index(line_index, char_pos)
            .map_err(|e| to_js_error("charPosToCellIndex", e))?;
        serialize(&result, "Failed to serialize cell position")
    }

    #[wasm_bindgen(js_name = cellIndexToCharPos)]
    pub fn cell_index_to_char_pos(&self, line_index: usize, cell_index: usize) -> Result<usize, JsValue> {
        self.surface
            .cell_index_to_char_pos(line_index, cell_index)
            .map_err(|e| to_js_error("cellIndexToCharPos", e))
    }

    /// Re-copy textarea styles into the mirrors (font or zoom changed)
    #[wasm_bindgen(js_name = syncStyles)]
    pub fn sync_styles(&mut self) {
        self.surface.sync_styles();
    }

    /// Call from the `on_refresh` callback once the refresh ran
    #[wasm_bindgen(js_name = notationRefreshFired)]
    pub fn notation_refresh_fired(&mut self) {
        self.surface.notation_refresh_fired();
    }

    pub fn destroy(&mut self) {
        self.surface.destroy();
    }
}
