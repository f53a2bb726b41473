//! Position codec
//!
//! Converts between character indices (one per code point, the unit the
//! engine counts in), UTF-16 code-unit offsets (what `selectionStart` and
//! `setSelectionRange` speak) and pixel offsets along a line given per-character
//! widths. All functions are pure.
//!
//! Characters outside the Basic Multilingual Plane occupy two code units, so
//! the two index spaces drift apart by one after every such character.

/// Number of characters (code points) in `text`
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Clamp a character index into `[0, char_count(text)]`
pub fn clamp_char_index(text: &str, char_index: usize) -> usize {
    char_index.min(char_count(text))
}

/// Convert a character index to a UTF-16 code-unit offset.
///
/// Indices past the end of `text` saturate at the full code-unit length.
pub fn char_index_to_code_units(text: &str, char_index: usize) -> usize {
    text.chars().take(char_index).map(char::len_utf16).sum()
}

/// Convert a UTF-16 code-unit offset to a character index.
///
/// An offset that lands between the two halves of a surrogate pair rounds
/// down to the start of that character. Offsets past the end saturate at the
/// character count.
pub fn code_units_to_char_index(text: &str, code_units: usize) -> usize {
    let mut consumed = 0;
    for (index, ch) in text.chars().enumerate() {
        let width = ch.len_utf16();
        if consumed + width > code_units {
            return index;
        }
        consumed += width;
    }
    char_count(text)
}

/// Total UTF-16 length of `text`
pub fn code_unit_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Substring between two character indices (clamped)
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end.max(start));
    &text[start_byte..end_byte]
}

/// Split `text` at a character index
pub fn split_at_char(text: &str, char_index: usize) -> (&str, &str) {
    text.split_at(byte_offset(text, char_index))
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Pixel offset of the boundary before `char_index`, given per-character widths
pub fn char_index_to_pixel(widths: &[f64], char_index: usize) -> f64 {
    widths.iter().take(char_index).sum()
}

/// Character boundary nearest to pixel offset `x`.
///
/// A hit in the left half of a character lands before it, in the right half
/// after it. Zero-width characters (continuations) are never boundaries.
pub fn pixel_to_char_index(widths: &[f64], x: f64) -> usize {
    let mut left = 0.0;
    for (index, &width) in widths.iter().enumerate() {
        if width <= 0.0 {
            continue;
        }
        if x < left + width / 2.0 {
            return index;
        }
        left += width;
    }
    widths.len()
}
