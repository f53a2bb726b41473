//! Browser host for the editing surface
//!
//! Each line renders as
//!
//! ```text
//! div.notation-line          (position: relative, data-line-index)
//!   textarea.notation-textarea
//!   div.notation-overlays    lyrics and tala markers
//!   div.selection-layer      selection painted while unfocused
//! ```
//!
//! Event listeners are attached by the JS side, which forwards them to the
//! exported `TextareaEditor`.

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlTextAreaElement};

use crate::api::helpers::describe_js_value;
use crate::error::{EngineError, SurfaceError};
use crate::models::{Rect, SnapshotLine, TextareaDisplayList, TextareaLineDisplay};
use crate::surface::engine::NotationEngine;
use crate::surface::host::{LineInput, SurfaceHost};
use crate::surface::overlay::PlacedOverlay;

const LINE_CLASS: &str = "notation-line";
const TEXTAREA_CLASS: &str = "notation-textarea";
const OVERLAY_LAYER_CLASS: &str = "notation-overlays";
const SELECTION_LAYER_CLASS: &str = "selection-layer";

/// `normal` line-height as a multiple of the font size
const NORMAL_LINE_HEIGHT: f64 = 1.2;
const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

impl LineInput for HtmlTextAreaElement {
    fn value(&self) -> String {
        HtmlTextAreaElement::value(self)
    }

    fn set_value(&self, text: &str) {
        HtmlTextAreaElement::set_value(self, text);
    }

    fn selection_code_units(&self) -> (usize, usize) {
        let start = self.selection_start().ok().flatten().unwrap_or(0) as usize;
        let end = self.selection_end().ok().flatten().unwrap_or(start as u32) as usize;
        (start, end)
    }

    fn set_selection_code_units(&self, start: usize, end: usize) {
        let _ = self.set_selection_range(start as u32, end as u32);
    }

    fn focus(&self) {
        let _ = HtmlElement::focus(self);
    }
}

/// Creates per-line DOM inside a container element
pub struct DomHost {
    document: Document,
    container: Element,
    on_refresh: Option<js_sys::Function>,
}

impl DomHost {
    pub fn new(container: Element, on_refresh: Option<js_sys::Function>) -> Result<Self, SurfaceError> {
        let document = container
            .owner_document()
            .ok_or(SurfaceError::MissingTarget("container document"))?;
        Ok(Self {
            document,
            container,
            on_refresh,
        })
    }

    fn create_html(&self, tag: &str, class_name: &str) -> Result<HtmlElement, SurfaceError> {
        let element = self
            .document
            .create_element(tag)
            .map_err(|_| SurfaceError::MissingTarget("createElement"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| SurfaceError::MissingTarget("HtmlElement"))?;
        element.set_class_name(class_name);
        Ok(element)
    }

    /// The layer `div` of a given class next to `input`
    fn layer(&self, input: &HtmlTextAreaElement, class_name: &str) -> Result<HtmlElement, SurfaceError> {
        let wrapper = input
            .parent_element()
            .ok_or(SurfaceError::MissingTarget("line wrapper"))?;
        wrapper
            .query_selector(&format!(".{}", class_name))
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .ok_or(SurfaceError::MissingTarget("overlay layer"))
    }

    fn place_box(&self, element: &HtmlElement, input: &HtmlTextAreaElement, x: f64, y: f64) {
        let style = element.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", &format!("{}px", input.offset_left() as f64 + x));
        let _ = style.set_property("top", &format!("{}px", input.offset_top() as f64 + y));
    }
}

impl SurfaceHost for DomHost {
    type Input = HtmlTextAreaElement;
    type Timer = i32;

    fn create_line_input(
        &mut self,
        line_index: usize,
        display: &TextareaLineDisplay,
    ) -> Result<HtmlTextAreaElement, SurfaceError> {
        let wrapper = self.create_html("div", LINE_CLASS)?;
        let _ = wrapper.style().set_property("position", "relative");
        let _ = wrapper.set_attribute("data-line-index", &line_index.to_string());
        if let Some(label) = &display.label {
            let _ = wrapper.set_attribute("data-label", label);
        }

        let textarea = self
            .document
            .create_element("textarea")
            .map_err(|_| SurfaceError::MissingTarget("createElement"))?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| SurfaceError::MissingTarget("HtmlTextAreaElement"))?;
        textarea.set_class_name(TEXTAREA_CLASS);
        textarea.set_rows(1);
        let _ = textarea.set_attribute("spellcheck", "false");
        let _ = textarea.set_attribute("data-line-index", &line_index.to_string());

        let overlays = self.create_html("div", OVERLAY_LAYER_CLASS)?;
        let selection = self.create_html("div", SELECTION_LAYER_CLASS)?;
        let _ = selection.style().set_property("pointer-events", "none");

        let attach = |child: &web_sys::Node| {
            wrapper
                .append_child(child)
                .map(|_| ())
                .map_err(|_| SurfaceError::MissingTarget("line wrapper"))
        };
        attach(&textarea)?;
        attach(&overlays)?;
        attach(&selection)?;
        self.container
            .append_child(&wrapper)
            .map_err(|_| SurfaceError::MissingTarget("container"))?;

        Ok(textarea)
    }

    fn remove_line_input(&mut self, input: HtmlTextAreaElement) {
        match input.parent_element() {
            Some(wrapper) => wrapper.remove(),
            None => input.remove(),
        }
    }

    fn place_overlays(&mut self, input: &HtmlTextAreaElement, overlays: &[PlacedOverlay]) -> Result<(), SurfaceError> {
        let layer = self.layer(input, OVERLAY_LAYER_CLASS)?;
        layer.set_text_content(None);
        for overlay in overlays {
            let element = self.create_html("div", overlay.kind.class_name())?;
            element.set_text_content(Some(&overlay.content));
            self.place_box(&element, input, overlay.x, overlay.y);
            let _ = layer.append_child(&element);
        }
        Ok(())
    }

    fn show_selection_overlay(&mut self, input: &HtmlTextAreaElement, rects: &[Rect]) -> Result<(), SurfaceError> {
        let layer = self.layer(input, SELECTION_LAYER_CLASS)?;
        layer.set_text_content(None);
        for rect in rects {
            let element = self.create_html("div", "selection-rect")?;
            self.place_box(&element, input, rect.x, rect.y);
            let style = element.style();
            let _ = style.set_property("width", &format!("{}px", rect.width));
            let _ = style.set_property("height", &format!("{}px", rect.height));
            let _ = layer.append_child(&element);
        }
        Ok(())
    }

    fn hide_selection_overlay(&mut self, input: &HtmlTextAreaElement) {
        if let Ok(layer) = self.layer(input, SELECTION_LAYER_CLASS) {
            layer.set_text_content(None);
        }
    }

    fn line_height(&self, input: &HtmlTextAreaElement) -> f64 {
        let Some(computed) = web_sys::window().and_then(|window| window.get_computed_style(input).ok().flatten()) else {
            return DEFAULT_FONT_SIZE_PX * NORMAL_LINE_HEIGHT;
        };
        let px = |property: &str| {
            computed
                .get_property_value(property)
                .ok()
                .and_then(|value| value.trim_end_matches("px").parse::<f64>().ok())
        };
        px("line-height")
            .or_else(|| px("font-size").map(|size| size * NORMAL_LINE_HEIGHT))
            .unwrap_or(DEFAULT_FONT_SIZE_PX * NORMAL_LINE_HEIGHT)
    }

    fn set_timer(&mut self, delay_ms: f64) -> Option<i32> {
        let callback = self.on_refresh.as_ref()?;
        web_sys::window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback, delay_ms as i32)
            .ok()
    }

    fn clear_timer(&mut self, timer: i32) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(timer);
        }
    }
}

// ============================================================================
// JS notation engine
// ============================================================================

#[wasm_bindgen]
extern "C" {
    /// The notation engine object handed in from JS
    pub type JsNotationEngine;

    #[wasm_bindgen(method, catch, js_name = setLineText)]
    fn set_line_text(
        this: &JsNotationEngine,
        line_index: u32,
        text: &str,
        cursor_char_pos: Option<u32>,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = splitLine)]
    fn split_line(this: &JsNotationEngine, line_index: u32, char_index: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = joinLines)]
    fn join_lines(this: &JsNotationEngine, line_index: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = getTextareaDisplayList)]
    fn get_textarea_display_list(this: &JsNotationEngine) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = getLineCells)]
    fn get_line_cells(this: &JsNotationEngine, line_index: u32) -> Result<JsValue, JsValue>;
}

/// [`NotationEngine`] over a JS engine object
pub struct JsEngineBridge {
    engine: JsNotationEngine,
}

impl JsEngineBridge {
    pub fn new(engine: JsNotationEngine) -> Self {
        Self { engine }
    }
}

fn decode<T: DeserializeOwned>(call: &str, result: Result<JsValue, JsValue>) -> Result<T, EngineError> {
    let value = result.map_err(|e| EngineError::Call(format!("{}: {}", call, describe_js_value(&e))))?;
    serde_wasm_bindgen::from_value(value).map_err(|e| EngineError::UnexpectedShape(format!("{}: {}", call, e)))
}

impl NotationEngine for JsEngineBridge {
    fn set_line_text(
        &mut self,
        line_index: usize,
        text: &str,
        cursor_char_pos: Option<usize>,
    ) -> Result<TextareaLineDisplay, EngineError> {
        decode(
            "setLineText",
            self.engine
                .set_line_text(line_index as u32, text, cursor_char_pos.map(|pos| pos as u32)),
        )
    }

    fn split_line(&mut self, line_index: usize, char_index: usize) -> Result<TextareaDisplayList, EngineError> {
        decode("splitLine", self.engine.split_line(line_index as u32, char_index as u32))
    }

    fn join_lines(&mut self, line_index: usize) -> Result<TextareaDisplayList, EngineError> {
        decode("joinLines", self.engine.join_lines(line_index as u32))
    }

    fn display_list(&self) -> Result<TextareaDisplayList, EngineError> {
        decode("getTextareaDisplayList", self.engine.get_textarea_display_list())
    }

    fn line_cells(&self, line_index: usize) -> Result<SnapshotLine, EngineError> {
        decode("getLineCells", self.engine.get_line_cells(line_index as u32))
    }
}
