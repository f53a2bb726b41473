//! Logging, JS boundary conversion and error reporting for the exports

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

/// Debug-level log line, tagged for the browser console
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_debug(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Recoverable problems: measurement fallbacks, cosmetic paint failures
#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_warn(&format!($($arg)*))
    };
}

/// Engine rejections and anything that restored a line
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

// Native builds stay silent unless a logger is installed; wasm32 builds
// reach the console through `console_log`.
const TAG: &str = "[WASM]";

pub fn log_debug(msg: &str) {
    log::debug!("{} {}", TAG, msg);
}

pub fn log_info(msg: &str) {
    log::info!("{} {}", TAG, msg);
}

pub fn log_warn(msg: &str) {
    log::warn!("{} {}", TAG, msg);
}

pub fn log_error(msg: &str) {
    log::error!("{} {}", TAG, msg);
}

fn boundary_error(context: &str, err: impl Display) -> JsValue {
    let msg = format!("{}: {}", context, err);
    log_error(&msg);
    JsValue::from_str(&msg)
}

/// Read a JS value into `T`; `context` names the argument in the error
pub fn deserialize<T: DeserializeOwned>(value: JsValue, context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| boundary_error(context, e))
}

pub fn serialize<T: Serialize>(value: &T, context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| boundary_error(context, e))
}

/// Convert a surface or engine error to a JsValue, logging it
pub fn to_js_error(context: &str, err: impl Display) -> JsValue {
    boundary_error(context, err)
}

/// Render a JS exception as text for error messages
pub fn describe_js_value(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
