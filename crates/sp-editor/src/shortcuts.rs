//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.
//!
//! | Key | Action |
//! |-----|--------|
//! | Escape | cancel tool, selection, ghost, gesture |
//! | Delete / Backspace | remove the selected element |
//! | ⌘= ⌘- ⌘0 (or bare + -) | zoom in, out, reset |
//! | ⌘S / ⌘E | save plan / export |
//! | G | toggle grid snapping |
//! | H / Space | toggle the hand (pan) tool |
//! | W D N S R T F C K | arm wall, door, window, shelf, rack, table, fridge, counter, cashier |

use sp_core::model::ElementType;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tools ──
    Arm(ElementType),
    ToggleHand,

    // ── Edit ──
    Cancel,
    Delete,
    ToggleSnap,
    Save,
    Export,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomReset,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"w"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd {
            return match key {
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomReset),
                "s" | "S" => Some(ShortcutAction::Save),
                "e" | "E" => Some(ShortcutAction::Export),
                _ => None,
            };
        }

        // Work regardless of shift/alt.
        match key {
            "Escape" => return Some(ShortcutAction::Cancel),
            "Delete" | "Backspace" => return Some(ShortcutAction::Delete),
            "+" => return Some(ShortcutAction::ZoomIn),
            "-" => return Some(ShortcutAction::ZoomOut),
            _ => {}
        }

        if shift || alt {
            return None;
        }

        let tool = |ty| Some(ShortcutAction::Arm(ty));
        match key {
            "w" | "W" => tool(ElementType::Wall),
            "d" | "D" => tool(ElementType::Door),
            "n" | "N" => tool(ElementType::Window),
            "s" | "S" => tool(ElementType::Shelf),
            "r" | "R" => tool(ElementType::Rack),
            "t" | "T" => tool(ElementType::Table),
            "f" | "F" => tool(ElementType::Fridge),
            "c" | "C" => tool(ElementType::Counter),
            "k" | "K" => tool(ElementType::Cashier),
            "g" | "G" => Some(ShortcutAction::ToggleSnap),
            "h" | "H" | " " => Some(ShortcutAction::ToggleHand),
            _ => None,
        }
    }
}
