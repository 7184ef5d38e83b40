//! Keyboard bindings configuration.

use super::loader::ConfigError;
use crate::model::key_action::KeyAction;
use crate::services::KeybindingLookup;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{BTreeMap, HashMap};

/// Maps keyboard events to domain actions.
///
/// Each action also remembers its primary key, the one shown in toolbar
/// tooltips.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
    primary: HashMap<KeyAction, KeyEvent>,
}

impl KeyBindings {
    fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
            primary: HashMap::new(),
        }
    }

    fn bind(&mut self, key: KeyEvent, action: KeyAction) {
        self.bindings.insert(key, action);
        self.primary.entry(action).or_insert(key);
    }

    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    /// Primary key of `action`.
    pub fn primary_key(&self, action: KeyAction) -> Option<KeyEvent> {
        self.primary.get(&action).copied()
    }

    /// Replace the keys of each named action with the configured key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] for an unknown action name or an
    /// unparsable key string.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) -> Result<(), ConfigError> {
        for (name, key) in overrides {
            let invalid = || ConfigError::InvalidKey {
                action: name.clone(),
                key: key.clone(),
            };
            let action = KeyAction::from_name(name).ok_or_else(invalid)?;
            let event = parse_key(key).ok_or_else(invalid)?;

            self.bindings.retain(|_, bound| *bound != action);
            if let Some(previous) = self.bindings.insert(event, action) {
                if self.primary.get(&previous) == Some(&event) {
                    self.primary.remove(&previous);
                }
            }
            self.primary.insert(action, event);
        }
        Ok(())
    }
}

impl KeybindingLookup for KeyBindings {
    fn lookup(&self, action_id: &str) -> Option<String> {
        let action = KeyAction::for_action_id(action_id)?;
        self.primary_key(action).map(key_label)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        let plain = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        // Vim-style scrolling
        bindings.bind(plain('k'), KeyAction::ScrollUp);
        bindings.bind(plain('j'), KeyAction::ScrollDown);
        bindings.bind(plain('g'), KeyAction::ScrollToTop);
        bindings.bind(
            KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT),
            KeyAction::ScrollToBottom,
        );

        // Arrow and page keys
        bindings.bind(key(KeyCode::Up), KeyAction::ScrollUp);
        bindings.bind(key(KeyCode::Down), KeyAction::ScrollDown);
        bindings.bind(ctrl('u'), KeyAction::PageUp);
        bindings.bind(ctrl('d'), KeyAction::PageDown);
        bindings.bind(key(KeyCode::PageUp), KeyAction::PageUp);
        bindings.bind(key(KeyCode::PageDown), KeyAction::PageDown);
        bindings.bind(key(KeyCode::Home), KeyAction::ScrollToTop);
        bindings.bind(key(KeyCode::End), KeyAction::ScrollToBottom);

        // Focus
        bindings.bind(key(KeyCode::Tab), KeyAction::FocusNext);
        bindings.bind(
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            KeyAction::FocusPrev,
        );

        // Notification interaction
        bindings.bind(key(KeyCode::Enter), KeyAction::ToggleExpand);
        bindings.bind(plain(' '), KeyAction::ToggleExpand);
        bindings.bind(key(KeyCode::Delete), KeyAction::Clear);
        bindings.bind(plain('x'), KeyAction::Clear);
        bindings.bind(ctrl('x'), KeyAction::ClearAll);
        bindings.bind(plain('p'), KeyAction::RunPrimary);
        bindings.bind(plain('o'), KeyAction::OpenLink);

        // Application controls
        bindings.bind(plain('q'), KeyAction::Quit);
        bindings.bind(ctrl('c'), KeyAction::Quit);

        bindings
    }
}

/// Parse a key string such as `x`, `G`, `Del`, `Ctrl+x` or `Shift+Tab`.
pub fn parse_key(text: &str) -> Option<KeyEvent> {
    let mut parts: Vec<&str> = text.split('+').map(str::trim).collect();
    // "Ctrl++" binds the plus key
    if text.ends_with("++") {
        parts.truncate(parts.len().saturating_sub(2));
        parts.push("+");
    }
    let (key, modifier_names) = parts.split_last()?;

    let mut modifiers = KeyModifiers::NONE;
    for name in modifier_names {
        modifiers |= match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => return None,
        };
    }

    let mut chars = key.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) => {
            if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                KeyCode::Char(c.to_ascii_lowercase())
            } else {
                if c.is_ascii_uppercase() {
                    modifiers |= KeyModifiers::SHIFT;
                }
                KeyCode::Char(c)
            }
        }
        _ => match key.to_ascii_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "space" => KeyCode::Char(' '),
            "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "esc" | "escape" => KeyCode::Esc,
            "del" | "delete" => KeyCode::Delete,
            "backspace" => KeyCode::Backspace,
            "insert" | "ins" => KeyCode::Insert,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            other => {
                let number = other.strip_prefix('f')?.parse::<u8>().ok()?;
                if !(1..=12).contains(&number) {
                    return None;
                }
                KeyCode::F(number)
            }
        },
    };

    if code == KeyCode::BackTab {
        modifiers |= KeyModifiers::SHIFT;
    }
    Some(KeyEvent::new(code, modifiers))
}

/// Human label of a key, e.g. `Del`, `Ctrl+X`, `G`.
pub fn key_label(key: KeyEvent) -> String {
    let mut label = String::new();
    let implied_shift = matches!(key.code, KeyCode::Char(c) if c.is_ascii_uppercase())
        || key.code == KeyCode::BackTab;

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        label.push_str("Ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        label.push_str("Alt+");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) && !implied_shift {
        label.push_str("Shift+");
    }

    let chorded = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Char(' ') => label.push_str("Space"),
        KeyCode::Char(c) if chorded => label.push(c.to_ascii_uppercase()),
        KeyCode::Char(c) => label.push(c),
        KeyCode::Enter => label.push_str("Enter"),
        KeyCode::Tab => label.push_str("Tab"),
        KeyCode::BackTab => label.push_str("Shift+Tab"),
        KeyCode::Esc => label.push_str("Esc"),
        KeyCode::Delete => label.push_str("Del"),
        KeyCode::Backspace => label.push_str("Backspace"),
        KeyCode::Insert => label.push_str("Ins"),
        KeyCode::Up => label.push_str("Up"),
        KeyCode::Down => label.push_str("Down"),
        KeyCode::Left => label.push_str("Left"),
        KeyCode::Right => label.push_str("Right"),
        KeyCode::Home => label.push_str("Home"),
        KeyCode::End => label.push_str("End"),
        KeyCode::PageUp => label.push_str("PgUp"),
        KeyCode::PageDown => label.push_str("PgDn"),
        KeyCode::F(n) => label.push_str(&format!("F{n}")),
        other => label.push_str(&format!("{other:?}")),
    }
    label
}
