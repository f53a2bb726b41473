//! Textarea Editing Surface WASM API
//!
//! # Module Structure
//!
//! - `helpers`: logging macros, serialization and error conversion
//! - `position`: stateless codec and cell-mapping functions
//! - `config`: process-wide surface configuration
//! - `editor`: the `TextareaEditor` class

pub mod helpers;
pub mod config;
pub mod editor;
pub mod position;

pub use config::{configure_surface, get_surface_config};
pub use editor::TextareaEditor;
pub use position::{
    cell_index_to_char_pos, char_index_to_code_units, char_index_to_pixel, char_pos_to_cell_index,
    char_widths, code_units_to_char_index, pixel_to_char_index,
};
