//! Input events the host feeds into the editor.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }
}

/// A file dropped onto the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// One representation of a clipboard entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ClipboardItem {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Events delivered by the host. Pointer positions are in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorInput {
    PointerDown { position: Point, modifiers: Modifiers },
    PointerMove { position: Point },
    PointerUp { position: Point },
    /// Key name as reported by the platform (`"Delete"`, `"Backspace"`, `"Escape"`).
    KeyDown(String),
    DragEnter,
    DragLeave,
    Drop(Vec<DroppedFile>),
    Paste(Vec<ClipboardItem>),
    /// Viewport (display) size changed.
    Resize(Size),
}

/// Keyboard commands the editor responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    DeleteSelection,
    ClearSelection,
}

impl KeyCommand {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Delete" | "Backspace" => Some(KeyCommand::DeleteSelection),
            "Escape" => Some(KeyCommand::ClearSelection),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_commands() {
        assert_eq!(KeyCommand::from_key("Delete"), Some(KeyCommand::DeleteSelection));
        assert_eq!(KeyCommand::from_key("Backspace"), Some(KeyCommand::DeleteSelection));
        assert_eq!(KeyCommand::from_key("Escape"), Some(KeyCommand::ClearSelection));
        assert_eq!(KeyCommand::from_key("a"), None);
    }

    #[test]
    fn test_shift_modifier() {
        let m = Modifiers::shift();
        assert!(m.shift);
        assert!(!m.ctrl);
    }
}
