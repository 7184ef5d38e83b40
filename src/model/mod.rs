//! Domain model types.
//!
//! Notification state, its actions and change streams. Nothing here knows
//! about rows or rendering.

pub mod action;
pub mod emitter;
pub mod entry;
pub mod error;
pub mod key_action;
pub mod notification;

// Re-export for convenience
pub use action::{Action, ActionHandler, ActionKind, NotificationActions};
pub use emitter::{Emitter, Subscription};
pub use entry::{ListEntry, TemplateKind};
pub use error::{ActionError, AppError, InputError, OpenError, ParseError, RowError};
pub use key_action::KeyAction;
pub use notification::{
    ChangeKind, NotificationBuilder, NotificationId, NotificationItem, ProgressState, Severity,
};
