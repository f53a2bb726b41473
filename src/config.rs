//! Surface configuration
//!
//! Timing constants and mirror styling knobs. JavaScript can override any
//! subset with `configureSurface({...})`; editors read the config when they
//! are constructed.

use std::sync::Mutex;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::models::Point;

/// CSS properties copied from a textarea onto its measurement mirror
pub const DEFAULT_MIRRORED_PROPERTIES: &[&str] = &[
    "box-sizing",
    "width",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "font-variant",
    "font-feature-settings",
    "font-kerning",
    "line-height",
    "letter-spacing",
    "word-spacing",
    "text-indent",
    "text-transform",
    "tab-size",
    "white-space",
    "word-wrap",
    "word-break",
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SurfaceConfig {
    /// Delay before the staff notation / inspector refresh runs after an edit
    pub debounce_ms: f64,

    /// How long after `mouseup` a `click` still sees the finished drag
    pub drag_click_grace_ms: f64,

    /// Position returned when measuring a detached element
    pub fallback_x: f64,
    pub fallback_y: f64,

    /// Computed style properties replicated onto the mirror element
    pub mirrored_properties: Vec<String>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100.0,
            drag_click_grace_ms: 10.0,
            fallback_x: 0.0,
            fallback_y: 0.0,
            mirrored_properties: DEFAULT_MIRRORED_PROPERTIES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl SurfaceConfig {
    pub fn fallback_position(&self) -> Point {
        Point::new(self.fallback_x, self.fallback_y)
    }
}

lazy_static! {
    static ref SURFACE_CONFIG: Mutex<SurfaceConfig> = Mutex::new(SurfaceConfig::default());
}

/// Snapshot of the process-wide configuration
pub fn current_config() -> SurfaceConfig {
    match SURFACE_CONFIG.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Replace the process-wide configuration
pub fn set_config(config: SurfaceConfig) {
    match SURFACE_CONFIG.lock() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}
