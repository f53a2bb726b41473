//! Browser implementation of the mirror backend
//!
//! The mirror is an off-screen `div` appended to `<body>`, styled from the
//! textarea's computed style. A zero-width space inside a `span` marks the
//! measured position.

use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlTextAreaElement};

use super::MirrorBackend;
use crate::config::SurfaceConfig;
use crate::models::Point;

const MARKER_TEXT: &str = "\u{200B}";

/// Styles every mirror needs regardless of the source element
const MIRROR_BASE_STYLES: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("visibility", "hidden"),
    ("top", "0"),
    ("left", "-9999px"),
    ("overflow", "hidden"),
    ("white-space", "pre-wrap"),
    ("word-wrap", "break-word"),
];

pub struct DomMirrorBackend {
    properties: Vec<String>,
}

impl DomMirrorBackend {
    pub fn new(config: &SurfaceConfig) -> Self {
        Self {
            properties: config.mirrored_properties.clone(),
        }
    }
}

impl MirrorBackend for DomMirrorBackend {
    type Source = HtmlTextAreaElement;
    type Mirror = HtmlElement;

    fn is_connected(&self, source: &HtmlTextAreaElement) -> bool {
        source.is_connected()
    }

    fn source_text(&self, source: &HtmlTextAreaElement) -> String {
        source.value()
    }

    fn create_mirror(&mut self, source: &HtmlTextAreaElement) -> Option<HtmlElement> {
        let document = source.owner_document()?;
        let body = document.body()?;
        let mirror = document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        mirror.set_class_name("textarea-mirror");
        mirror.set_attribute("aria-hidden", "true").ok()?;

        let style = mirror.style();
        for (property, value) in MIRROR_BASE_STYLES {
            let _ = style.set_property(property, value);
        }

        body.append_child(&mirror).ok()?;
        Some(mirror)
    }

    fn copy_styles(&mut self, source: &HtmlTextAreaElement, mirror: &HtmlElement) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(Some(computed)) = window.get_computed_style(source) else {
            return;
        };

        let style = mirror.style();
        for property in &self.properties {
            if let Ok(value) = computed.get_property_value(property) {
                let _ = style.set_property(property, &value);
            }
        }
        // Textareas wrap even when the computed value says otherwise
        let _ = style.set_property("white-space", "pre-wrap");
    }

    fn measure_marker(&mut self, mirror: &HtmlElement, before: &str, after: &str) -> Option<Point> {
        let document = mirror.owner_document()?;

        mirror.set_text_content(None);
        mirror.append_child(&document.create_text_node(before)).ok()?;
        let marker = document.create_element("span").ok()?;
        marker.set_text_content(Some(MARKER_TEXT));
        mirror.append_child(&marker).ok()?;
        mirror.append_child(&document.create_text_node(after)).ok()?;

        // Relative to the mirror's border box, which lines up with the textarea's
        let origin = mirror.get_bounding_client_rect();
        let rect = marker.get_bounding_client_rect();
        Some(Point::new(rect.left() - origin.left(), rect.top() - origin.top()))
    }

    fn remove_mirror(&mut self, mirror: HtmlElement) {
        mirror.remove();
    }
}
