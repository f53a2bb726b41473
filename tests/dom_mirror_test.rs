//! Browser tests for the DOM mirror backend
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use textarea_wasm::mirror::dom::DomMirrorBackend;
use textarea_wasm::mirror::{MirrorService, MirrorState};
use textarea_wasm::{Point, SurfaceConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlTextAreaElement;

wasm_bindgen_test_configure!(run_in_browser);

fn attached_textarea(value: &str) -> HtmlTextAreaElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let textarea = document
        .create_element("textarea")
        .unwrap()
        .dyn_into::<HtmlTextAreaElement>()
        .unwrap();
    textarea.set_attribute("style", "font: 16px monospace; width: 400px; padding: 4px").unwrap();
    textarea.set_value(value);
    document.body().unwrap().append_child(&textarea).unwrap();
    textarea
}

fn service() -> MirrorService<DomMirrorBackend> {
    let config = SurfaceConfig::default();
    MirrorService::new(DomMirrorBackend::new(&config), config.fallback_position())
}

#[wasm_bindgen_test]
fn positions_increase_along_the_line() {
    let textarea = attached_textarea("1234");
    let mut mirrors = service();

    let positions = mirrors.get_character_positions(0, &textarea, &[0, 1, 4]);
    assert!(positions[&0].x < positions[&1].x);
    assert!(positions[&1].x < positions[&4].x);
    assert_eq!(positions[&0].y, positions[&4].y);
    assert_eq!(mirrors.state(0), MirrorState::Cached);

    textarea.remove();
}

#[wasm_bindgen_test]
fn wide_glyph_advances_once() {
    let textarea = attached_textarea("a\u{1D11E}b");
    let mut mirrors = service();

    let after_glyph = mirrors.get_character_position(0, &textarea, 2);
    let before_glyph = mirrors.get_character_position(0, &textarea, 1);
    assert!(after_glyph.x > before_glyph.x);

    textarea.remove();
}

#[wasm_bindgen_test]
fn detached_textarea_gets_fallback() {
    let textarea = attached_textarea("12");
    textarea.remove();
    let mut mirrors = service();

    assert_eq!(mirrors.get_character_position(0, &textarea, 1), Point::new(0.0, 0.0));
}

#[wasm_bindgen_test]
fn release_removes_mirror_from_document() {
    let textarea = attached_textarea("12");
    let mut mirrors = service();
    mirrors.get_character_position(0, &textarea, 1);

    let document = web_sys::window().unwrap().document().unwrap();
    assert!(document.query_selector(".textarea-mirror").unwrap().is_some());

    mirrors.release(0);
    assert!(document.query_selector(".textarea-mirror").unwrap().is_none());

    textarea.remove();
}
