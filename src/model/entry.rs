//! Entries of the host list.
//!
//! The host list can hold rows contributed by other renderers; only
//! notification entries have a template here.

use super::notification::NotificationItem;
use std::rc::Rc;

/// Template kinds this engine can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// The notification row template.
    Notification,
}

impl TemplateKind {
    /// Stable string identifier of the template.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Notification => "notification",
        }
    }
}

/// A row in the host list.
#[derive(Debug, Clone)]
pub enum ListEntry {
    /// A notification rendered by this engine.
    Notification(Rc<NotificationItem>),
    /// A row contributed by another renderer. It is excluded from
    /// virtualized rendering here.
    Foreign {
        /// Name of the renderer that owns the row.
        kind: String,
    },
}

impl ListEntry {
    /// The notification behind this entry, if it is one.
    pub fn as_notification(&self) -> Option<&Rc<NotificationItem>> {
        match self {
            ListEntry::Notification(item) => Some(item),
            ListEntry::Foreign { .. } => None,
        }
    }
}

impl From<Rc<NotificationItem>> for ListEntry {
    fn from(item: Rc<NotificationItem>) -> Self {
        ListEntry::Notification(item)
    }
}

impl From<NotificationItem> for ListEntry {
    fn from(item: NotificationItem) -> Self {
        ListEntry::Notification(Rc::new(item))
    }
}
