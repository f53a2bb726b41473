//! Text positions and selection
//!
//! Pure index arithmetic with no DOM access.
//!
//! ## Modules
//!
//! - `codec`: character index <-> UTF-16 code units <-> pixel offset
//! - `cell_map`: cell index <-> character index over an engine snapshot line
//! - `cursor`: cursor and selection state machine (keyboard and mouse drag)

pub mod cell_map;
pub mod codec;
pub mod cursor;

// Re-exports for convenience
pub use cell_map::{
    cell_index_to_char_pos, char_pos_to_cell_index, insertion_cell_index, CharPosToCellResult,
};
pub use codec::{char_count, char_index_to_code_units, code_units_to_char_index};
pub use cursor::{ClickOutcome, Selection, SelectionController, SelectionPhase};
