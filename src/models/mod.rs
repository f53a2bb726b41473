//! Data model shared by the codec, the mirror service and the surface
//!
//! - `snapshot`: the engine's cell view of the document (cells per line)
//! - `display`: the engine's textarea display list (text, cursor, overlays)
//! - `geometry`: pixel points and rectangles

pub mod display;
pub mod geometry;
pub mod snapshot;

pub use display::*;
pub use geometry::*;
pub use snapshot::*;
