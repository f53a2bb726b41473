//! Multi-line editing surface
//!
//! One textarea per notation line. The textareas only display and capture;
//! every edit is forwarded to the notation engine and the engine's normalized
//! text and cursor are written back.
//!
//! # Module Structure
//!
//! - `engine`: the engine call boundary (`NotationEngine`) and its errors
//! - `memory`: an in-memory engine for native tests and headless use
//! - `host`: DOM operations the surface needs (`SurfaceHost`, `LineInput`)
//! - `editor`: the surface itself (`TextareaSurface`)
//! - `keys`: key names and modifiers
//! - `overlay`: lyric / tala overlay placement
//! - `schedule`: cancel-and-replace debouncing
//! - `dom`: `web-sys` host, textarea input and JS engine bridge

pub mod dom;
pub mod editor;
pub mod engine;
pub mod host;
pub mod keys;
pub mod memory;
pub mod overlay;
pub mod schedule;

pub use editor::{InputOutcome, KeyOutcome, LineHandle, TextareaSurface};
pub use engine::NotationEngine;
pub use host::{LineInput, SurfaceHost};
pub use keys::{EditorKey, Modifiers};
pub use memory::MemoryEngine;
pub use overlay::{place_overlays, PlacedOverlay};
pub use schedule::Debouncer;
