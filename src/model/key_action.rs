//! Domain-level keyboard actions independent of key bindings.

use super::action::{CLEAR_ACTION_ID, COLLAPSE_ACTION_ID, EXPAND_ACTION_ID};

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the list up by one line. Default: k/↑
    ScrollUp,
    /// Scroll the list down by one line. Default: j/↓
    ScrollDown,
    /// Scroll up by one page. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the first notification. Default: g/Home
    ScrollToTop,
    /// Jump to the last notification. Default: G/End
    ScrollToBottom,

    // Focus
    /// Focus the next notification. Default: Tab
    FocusNext,
    /// Focus the previous notification. Default: Shift+Tab
    FocusPrev,

    // Notification interaction
    /// Expand or collapse the focused notification. Default: Enter/Space
    ToggleExpand,
    /// Clear the focused notification. Default: Delete/x
    Clear,
    /// Clear every notification. Default: Ctrl+x
    ClearAll,
    /// Run the focused notification's first primary action. Default: p
    RunPrimary,
    /// Open the first link in the focused notification's message. Default: o
    OpenLink,

    // Application
    /// Exit the application. Default: q/Ctrl+c
    Quit,
}

impl KeyAction {
    /// Parse the configuration name of an action (`"toggle_expand"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let action = match name {
            "scroll_up" => KeyAction::ScrollUp,
            "scroll_down" => KeyAction::ScrollDown,
            "page_up" => KeyAction::PageUp,
            "page_down" => KeyAction::PageDown,
            "scroll_to_top" => KeyAction::ScrollToTop,
            "scroll_to_bottom" => KeyAction::ScrollToBottom,
            "focus_next" => KeyAction::FocusNext,
            "focus_prev" => KeyAction::FocusPrev,
            "toggle_expand" => KeyAction::ToggleExpand,
            "clear" => KeyAction::Clear,
            "clear_all" => KeyAction::ClearAll,
            "run_primary" => KeyAction::RunPrimary,
            "open_link" => KeyAction::OpenLink,
            "quit" => KeyAction::Quit,
            _ => return None,
        };
        Some(action)
    }

    /// The key action that triggers the row action with `action_id`, if any.
    ///
    /// Used to derive toolbar tooltips from the active key bindings.
    pub fn for_action_id(action_id: &str) -> Option<Self> {
        match action_id {
            EXPAND_ACTION_ID | COLLAPSE_ACTION_ID => Some(KeyAction::ToggleExpand),
            CLEAR_ACTION_ID => Some(KeyAction::Clear),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::action::CONFIGURE_ACTION_ID;

    #[test]
    fn from_name_parses_known_names() {
        assert_eq!(
            KeyAction::from_name("toggle_expand"),
            Some(KeyAction::ToggleExpand)
        );
        assert_eq!(KeyAction::from_name("clear_all"), Some(KeyAction::ClearAll));
        assert_eq!(KeyAction::from_name("quit"), Some(KeyAction::Quit));
    }

    #[test]
    fn from_name_rejects_unknown_names() {
        assert_eq!(KeyAction::from_name("ToggleExpand"), None);
        assert_eq!(KeyAction::from_name(""), None);
    }

    #[test]
    fn expand_and_collapse_share_toggle() {
        assert_eq!(
            KeyAction::for_action_id(EXPAND_ACTION_ID),
            Some(KeyAction::ToggleExpand)
        );
        assert_eq!(
            KeyAction::for_action_id(COLLAPSE_ACTION_ID),
            Some(KeyAction::ToggleExpand)
        );
    }

    #[test]
    fn configure_has_no_key_action() {
        assert_eq!(KeyAction::for_action_id(CONFIGURE_ACTION_ID), None);
    }
}
