//! Keys the surface handles itself

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Enter,
    Backspace,
    Other,
}

impl EditorKey {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key_name(key: &str) -> Self {
        match key {
            "ArrowUp" => EditorKey::ArrowUp,
            "ArrowDown" => EditorKey::ArrowDown,
            "ArrowLeft" => EditorKey::ArrowLeft,
            "ArrowRight" => EditorKey::ArrowRight,
            "Home" => EditorKey::Home,
            "End" => EditorKey::End,
            "Enter" => EditorKey::Enter,
            "Backspace" => EditorKey::Backspace,
            _ => EditorKey::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Any modifier that turns an arrow key into a word/document jump
    pub fn has_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(EditorKey::from_key_name("ArrowDown"), EditorKey::ArrowDown);
        assert_eq!(EditorKey::from_key_name("Backspace"), EditorKey::Backspace);
        assert_eq!(EditorKey::from_key_name("a"), EditorKey::Other);
    }
}
