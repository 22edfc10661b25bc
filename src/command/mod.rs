mod history;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::input::PointerSample;
use crate::options::{OptionsPatch, SettingsPatch};
use crate::state::SessionSnapshot;

pub use history::{History, HistoryEntry};

/// Keys with a shortcut bound to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortcutKey {
    /// Undo with the platform modifier, redo with platform modifier + shift.
    Z,
    /// Toggle the trace overlay.
    D,
    /// Clear the canvas.
    E,
}

/// Modifier flags delivered alongside a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyModifiers {
    /// The platform command key (Cmd on macOS, Ctrl elsewhere).
    pub meta: bool,
    pub shift: bool,
}

/// Everything the session reacts to.
#[derive(Debug, Clone)]
pub enum Command {
    DownedPointer(PointerSample),
    MovedPointer(PointerSample),
    LiftedPointer(PointerSample),
    ResetOptions,
    ChangedOptions(OptionsPatch),
    ChangedSettings(SettingsPatch),
    ToggledControls,
    ToggledDarkMode,
    Undo,
    Redo,
    ClearedCanvas,
    PressedKey {
        key: ShortcutKey,
        modifiers: KeyModifiers,
    },
    /// The user asked for the drawing to be copied to the clipboard as SVG.
    CopyRequested,
    /// The pending clipboard write finished.
    ClipboardWritten,
    /// The pending clipboard write was rejected.
    ClipboardWriteFailed(ExportError),
    ClearedClipboardMessage,
    /// Hydrate the session from a saved snapshot.
    Loaded(SessionSnapshot),
    /// Reserved. Currently ignored.
    Resized,
    /// Reserved. Currently ignored.
    Unloaded,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::DownedPointer(_) => "DOWNED_POINTER",
            Command::MovedPointer(_) => "MOVED_POINTER",
            Command::LiftedPointer(_) => "LIFTED_POINTER",
            Command::ResetOptions => "RESET_OPTIONS",
            Command::ChangedOptions(_) => "CHANGED_OPTIONS",
            Command::ChangedSettings(_) => "CHANGED_SETTINGS",
            Command::ToggledControls => "TOGGLED_CONTROLS",
            Command::ToggledDarkMode => "TOGGLED_DARK_MODE",
            Command::Undo => "UNDO",
            Command::Redo => "REDO",
            Command::ClearedCanvas => "CLEARED_CANVAS",
            Command::PressedKey { .. } => "PRESSED_KEY",
            Command::CopyRequested => "COPY_REQUESTED",
            Command::ClipboardWritten => "CLIPBOARD_WRITTEN",
            Command::ClipboardWriteFailed(_) => "CLIPBOARD_WRITE_FAILED",
            Command::ClearedClipboardMessage => "CLEARED_CLIPBOARD_MESSAGE",
            Command::Loaded(_) => "LOADED",
            Command::Resized => "RESIZED",
            Command::Unloaded => "UNLOADED",
        }
    }
}
