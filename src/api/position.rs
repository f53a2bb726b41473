//! Position conversion functions
//!
//! Stateless conversions between character indices, UTF-16 code units, cell
//! indices and pixel offsets, exported for JS callers that only need the math.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, serialize};
use crate::models::SnapshotLine;
use crate::text::{cell_map, codec};

/// Character index → UTF-16 offset (for `selectionStart`/`selectionEnd`)
#[wasm_bindgen(js_name = charIndexToCodeUnits)]
pub fn char_index_to_code_units(text: &str, char_index: usize) -> usize {
    codec::char_index_to_code_units(text, char_index)
}

/// UTF-16 offset → character index; an offset inside a surrogate pair
/// resolves to the character containing it
#[wasm_bindgen(js_name = codeUnitsToCharIndex)]
pub fn code_units_to_char_index(text: &str, code_units: usize) -> usize {
    codec::code_units_to_char_index(text, code_units)
}

/// Convert character position to cell index and offset within cell
///
/// `line_js` is a line object with a `cells` array (`{char, continuation}`).
/// Positions past the end map to `{cell_index: cells.len(), char_offset_in_cell: 0}`.
#[wasm_bindgen(js_name = charPosToCellIndex)]
pub fn char_pos_to_cell_index(line_js: JsValue, char_pos: usize) -> Result<JsValue, JsValue> {
    let line: SnapshotLine = deserialize(line_js, "Failed to deserialize line")?;
    let result = cell_map::char_pos_to_cell_index(&line, char_pos);
    serialize(&result, "Failed to serialize cell position")
}

/// Convert cell index to the character position where that cell starts
#[wasm_bindgen(js_name = cellIndexToCharPos)]
pub fn cell_index_to_char_pos(line_js: JsValue, cell_index: usize) -> Result<usize, JsValue> {
    let line: SnapshotLine = deserialize(line_js, "Failed to deserialize line")?;
    Ok(cell_map::cell_index_to_char_pos(&line, cell_index))
}

/// Pixel offset of the boundary before `char_index`, given per-character widths
#[wasm_bindgen(js_name = charIndexToPixel)]
pub fn char_index_to_pixel(widths: &[f64], char_index: usize) -> f64 {
    codec::char_index_to_pixel(widths, char_index)
}

/// Nearest character boundary to pixel offset `x`
#[wasm_bindgen(js_name = pixelToCharIndex)]
pub fn pixel_to_char_index(widths: &[f64], x: f64) -> usize {
    codec::pixel_to_char_index(widths, x)
}

/// Per-character widths of a line from its per-cell widths
#[wasm_bindgen(js_name = charWidths)]
pub fn char_widths(line_js: JsValue, cell_widths: &[f64]) -> Result<Vec<f64>, JsValue> {
    let line: SnapshotLine = deserialize(line_js, "Failed to deserialize line")?;
    Ok(cell_map::char_widths(&line, cell_widths))
}
