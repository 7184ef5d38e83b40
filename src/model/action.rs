//! Notification actions.
//!
//! Primary actions render as buttons in the details row; secondary actions are
//! folded into a single "configure" toolbar entry. The expand, collapse and
//! clear toolbar actions are built-in kinds that act on the notification they
//! are rendered for.

use super::error::ActionError;
use std::fmt;
use std::rc::Rc;

/// Action identifier of the built-in configure action.
pub const CONFIGURE_ACTION_ID: &str = "notification.configure";
/// Action identifier of the built-in expand action.
pub const EXPAND_ACTION_ID: &str = "notification.expand";
/// Action identifier of the built-in collapse action.
pub const COLLAPSE_ACTION_ID: &str = "notification.collapse";
/// Action identifier of the built-in clear action.
pub const CLEAR_ACTION_ID: &str = "notification.clear";

/// Callback invoked when a plain action runs.
#[derive(Clone)]
pub struct ActionHandler(Rc<dyn Fn() -> Result<(), ActionError>>);

impl ActionHandler {
    /// Wrap a callback.
    pub fn new(handler: impl Fn() -> Result<(), ActionError> + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Invoke the callback.
    pub fn call(&self) -> Result<(), ActionError> {
        (self.0)()
    }
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionHandler(..)")
    }
}

impl PartialEq for ActionHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// What running an action does.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// Contributed action; runs its handler if it has one.
    Plain {
        /// Optional behavior attached by whoever created the notification.
        handler: Option<ActionHandler>,
    },
    /// Exposes the notification's secondary actions as a nested menu.
    Configure {
        /// The nested menu entries, in order.
        menu: Vec<Action>,
    },
    /// Expands the notification it runs against.
    Expand,
    /// Collapses the notification it runs against.
    Collapse,
    /// Clears (closes) the notification it runs against.
    Clear,
}

/// A runnable, labelled action.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    id: String,
    label: String,
    kind: ActionKind,
}

impl Action {
    /// Create an action with an explicit kind.
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }

    /// Create a plain action with no handler.
    pub fn plain(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, ActionKind::Plain { handler: None })
    }

    /// Create a plain action that runs `handler`.
    pub fn with_handler(
        id: impl Into<String>,
        label: impl Into<String>,
        handler: impl Fn() -> Result<(), ActionError> + 'static,
    ) -> Self {
        Self::new(
            id,
            label,
            ActionKind::Plain {
                handler: Some(ActionHandler::new(handler)),
            },
        )
    }

    /// Create the configure action wrapping `menu`.
    pub fn configure(label: impl Into<String>, menu: Vec<Action>) -> Self {
        Self::new(CONFIGURE_ACTION_ID, label, ActionKind::Configure { menu })
    }

    /// Stable identifier, used for keybinding lookup.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Behavior of the action.
    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Nested menu entries for a configure action, empty otherwise.
    pub fn menu(&self) -> &[Action] {
        match &self.kind {
            ActionKind::Configure { menu } => menu,
            _ => &[],
        }
    }
}

/// The two ordered action lists a notification carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationActions {
    /// Rendered as buttons when the notification is expanded.
    pub primary: Vec<Action>,
    /// Rendered behind the configure toolbar entry.
    pub secondary: Vec<Action>,
}

impl NotificationActions {
    /// Actions with only primary entries.
    pub fn primary(primary: Vec<Action>) -> Self {
        Self {
            primary,
            secondary: Vec::new(),
        }
    }

    /// Whether there are no actions at all.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}
