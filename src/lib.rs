//! Textarea Editing Surface WASM Module
//!
//! Position mapping and multi-line editing glue for the Music Notation Editor.
//! The notation engine owns document content; this module reconciles the four
//! addressing schemes the browser and the engine disagree on (character index,
//! cell index, UTF-16 code units, pixels) and drives one textarea per line.

pub mod api;
pub mod config;
pub mod error;
pub mod mirror;
pub mod models;
pub mod surface;
pub mod text;

// Re-export commonly used types
pub use config::SurfaceConfig;
pub use error::{EngineError, SurfaceError};
pub use models::*;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    // Fails only if a logger is already installed, which is fine.
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Textarea editing surface WASM module initialized");
}
