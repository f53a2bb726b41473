//! DOM operations the editing surface depends on

use crate::error::SurfaceError;
use crate::models::{Rect, TextareaLineDisplay};
use crate::surface::overlay::PlacedOverlay;

/// A native text-input element
///
/// Selection offsets are UTF-16 code units, as the browser reports them.
pub trait LineInput {
    fn value(&self) -> String;

    fn set_value(&self, text: &str);

    /// `(selectionStart, selectionEnd)`
    fn selection_code_units(&self) -> (usize, usize);

    fn set_selection_code_units(&self, start: usize, end: usize);

    fn focus(&self);
}

/// Creates line inputs, paints overlays and owns timers
pub trait SurfaceHost {
    type Input: LineInput;
    type Timer;

    /// Create and attach the input for a newly rendered line (appended last)
    fn create_line_input(
        &mut self,
        line_index: usize,
        display: &TextareaLineDisplay,
    ) -> Result<Self::Input, SurfaceError>;

    /// Detach an input whose line went away
    fn remove_line_input(&mut self, input: Self::Input);

    /// Replace the overlays drawn over `input`
    fn place_overlays(&mut self, input: &Self::Input, overlays: &[PlacedOverlay]) -> Result<(), SurfaceError>;

    fn show_selection_overlay(&mut self, input: &Self::Input, rects: &[Rect]) -> Result<(), SurfaceError>;

    fn hide_selection_overlay(&mut self, input: &Self::Input);

    /// Height of one visual row of `input`
    fn line_height(&self, input: &Self::Input) -> f64;

    /// Schedule the debounced notation refresh; `None` if nothing listens
    fn set_timer(&mut self, delay_ms: f64) -> Option<Self::Timer>;

    fn clear_timer(&mut self, timer: Self::Timer);
}
