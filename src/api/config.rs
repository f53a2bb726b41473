//! Surface configuration from JS

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, serialize};
use crate::config::{current_config, set_config, SurfaceConfig};
use crate::wasm_info;

/// Set the configuration used by editors created afterwards.
///
/// Accepts a partial object; missing keys keep their defaults.
#[wasm_bindgen(js_name = configureSurface)]
pub fn configure_surface(config_js: JsValue) -> Result<(), JsValue> {
    let config: SurfaceConfig = deserialize(config_js, "Failed to deserialize surface config")?;
    wasm_info!(
        "configureSurface: debounce {}ms, click grace {}ms, {} mirrored properties",
        config.debounce_ms,
        config.drag_click_grace_ms,
        config.mirrored_properties.len()
    );
    set_config(config);
    Ok(())
}

#[wasm_bindgen(js_name = getSurfaceConfig)]
pub fn get_surface_config() -> Result<JsValue, JsValue> {
    serialize(&current_config(), "Failed to serialize surface config")
}
