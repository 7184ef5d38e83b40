//! Notification item state and its change stream.
//!
//! Items are shared (`Rc`) between whoever raised the notification, the host
//! list and the row currently bound to it. All mutation goes through `&self`
//! methods that fire a [`ChangeKind`] on the item's change stream.

use super::action::{Action, NotificationActions};
use super::emitter::{Emitter, Subscription};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    #[default]
    Info,
    /// Something the user should look at.
    Warning,
    /// Something failed.
    Error,
}

impl Severity {
    /// All severities, in ascending order.
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Error];

    /// Marker class applied to the icon region for this severity.
    pub fn marker(self) -> &'static str {
        match self {
            Severity::Info => "severity-info",
            Severity::Warning => "severity-warning",
            Severity::Error => "severity-error",
        }
    }
}

/// Progress reported by a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressState {
    /// No progress is being reported.
    #[default]
    None,
    /// Work of unknown length is running.
    Infinite,
    /// Work of known or partially known length.
    Determinate {
        /// Total units of work, if known.
        total: Option<u64>,
        /// Units completed so far, if any were reported.
        worked: Option<u64>,
    },
    /// Work finished.
    Done,
}

/// What changed on a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Severity changed.
    Severity,
    /// Progress changed.
    Progress,
    /// Expanded/collapsed state changed.
    ExpansionState,
    /// Message text changed.
    Message,
    /// Primary or secondary actions changed.
    Actions,
}

/// Unique identity of a notification within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct ItemState {
    message: String,
    severity: Severity,
    expanded: bool,
    source: Option<String>,
    actions: NotificationActions,
    progress: ProgressState,
}

/// One notification row's domain state.
///
/// The message is markdown source; rows render it inline-only.
pub struct NotificationItem {
    id: NotificationId,
    can_collapse: bool,
    state: RefCell<ItemState>,
    closed: Cell<bool>,
    on_did_change: Emitter<ChangeKind>,
    on_did_close: Emitter<()>,
}

impl NotificationItem {
    /// Start building an item with the given message.
    pub fn builder(message: impl Into<String>) -> NotificationBuilder {
        NotificationBuilder::new(message)
    }

    /// Identity of this item.
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Markdown message source.
    pub fn message(&self) -> String {
        self.state.borrow().message.clone()
    }

    /// Current severity.
    pub fn severity(&self) -> Severity {
        self.state.borrow().severity
    }

    /// Whether the item shows its expanded presentation.
    pub fn expanded(&self) -> bool {
        self.state.borrow().expanded
    }

    /// Whether the expand/collapse affordance is offered at all.
    pub fn can_collapse(&self) -> bool {
        self.can_collapse
    }

    /// Short label naming the origin of the message, if any.
    pub fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }

    /// Whether a non-empty source label is set.
    pub fn has_source(&self) -> bool {
        self.state
            .borrow()
            .source
            .as_deref()
            .is_some_and(|s| !s.is_empty())
    }

    /// Primary and secondary actions.
    pub fn actions(&self) -> NotificationActions {
        self.state.borrow().actions.clone()
    }

    /// Whether at least one primary action exists.
    pub fn has_primary_actions(&self) -> bool {
        !self.state.borrow().actions.primary.is_empty()
    }

    /// Current progress.
    pub fn progress(&self) -> ProgressState {
        self.state.borrow().progress
    }

    /// Whether the item has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Subscribe to state changes.
    pub fn on_did_change(&self, listener: impl Fn(&ChangeKind) + 'static) -> Subscription {
        self.on_did_change.subscribe(listener)
    }

    /// Subscribe to the item being closed.
    pub fn on_did_close(&self, listener: impl Fn(&()) + 'static) -> Subscription {
        self.on_did_close.subscribe(listener)
    }

    /// Number of live change listeners.
    pub fn change_listener_count(&self) -> usize {
        self.on_did_change.listener_count()
    }

    /// Change the severity.
    pub fn set_severity(&self, severity: Severity) {
        if self.update(|s| replace(&mut s.severity, severity)) {
            self.fire(ChangeKind::Severity);
        }
    }

    /// Replace the message.
    pub fn set_message(&self, message: impl Into<String>) {
        let message = message.into();
        if self.update(|s| replace(&mut s.message, message)) {
            self.fire(ChangeKind::Message);
        }
    }

    /// Replace the source label.
    pub fn set_source(&self, source: Option<String>) {
        if self.update(|s| replace(&mut s.source, source)) {
            self.fire(ChangeKind::Message);
        }
    }

    /// Replace the actions.
    pub fn set_actions(&self, actions: NotificationActions) {
        if self.update(|s| replace(&mut s.actions, actions)) {
            self.fire(ChangeKind::Actions);
        }
    }

    /// Show the expanded presentation. No-op unless the item can collapse.
    pub fn expand(&self) {
        if self.can_collapse && self.update(|s| replace(&mut s.expanded, true)) {
            self.fire(ChangeKind::ExpansionState);
        }
    }

    /// Show the collapsed presentation. No-op unless the item can collapse.
    pub fn collapse(&self) {
        if self.can_collapse && self.update(|s| replace(&mut s.expanded, false)) {
            self.fire(ChangeKind::ExpansionState);
        }
    }

    /// Flip between expanded and collapsed.
    pub fn toggle(&self) {
        if self.expanded() {
            self.collapse();
        } else {
            self.expand();
        }
    }

    /// Replace the progress state wholesale.
    pub fn set_progress(&self, progress: ProgressState) {
        if self.update(|s| replace(&mut s.progress, progress)) {
            self.fire(ChangeKind::Progress);
        }
    }

    /// Report work of unknown length.
    pub fn progress_infinite(&self) {
        self.set_progress(ProgressState::Infinite);
    }

    /// Set the total amount of work.
    pub fn progress_total(&self, total: u64) {
        let worked = match self.progress() {
            ProgressState::Determinate { worked, .. } => worked,
            _ => None,
        };
        self.set_progress(ProgressState::Determinate {
            total: Some(total),
            worked,
        });
    }

    /// Add `units` of completed work.
    pub fn progress_worked(&self, units: u64) {
        let (total, worked) = match self.progress() {
            ProgressState::Determinate { total, worked } => (total, worked.unwrap_or(0)),
            _ => (None, 0),
        };
        self.set_progress(ProgressState::Determinate {
            total,
            worked: Some(worked.saturating_add(units)),
        });
    }

    /// Report the work as finished.
    pub fn progress_done(&self) {
        self.set_progress(ProgressState::Done);
    }

    /// Close the item. Returns `false` if it was already closed.
    ///
    /// Closing notifies close listeners once, then drops every listener.
    pub fn close(&self) -> bool {
        if self.closed.replace(true) {
            return false;
        }
        tracing::debug!(id = %self.id, "notification closed");
        self.on_did_close.fire(&());
        self.on_did_change.clear();
        self.on_did_close.clear();
        true
    }

    fn update(&self, apply: impl FnOnce(&mut ItemState) -> bool) -> bool {
        if self.closed.get() {
            return false;
        }
        apply(&mut self.state.borrow_mut())
    }

    fn fire(&self, kind: ChangeKind) {
        self.on_did_change.fire(&kind);
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl fmt::Debug for NotificationItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationItem")
            .field("id", &self.id)
            .field("can_collapse", &self.can_collapse)
            .field("state", &self.state.borrow())
            .field("closed", &self.closed.get())
            .finish()
    }
}

/// Builder for [`NotificationItem`].
#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    state: ItemState,
    can_collapse: bool,
}

impl NotificationBuilder {
    fn new(message: impl Into<String>) -> Self {
        Self {
            state: ItemState {
                message: message.into(),
                severity: Severity::Info,
                expanded: false,
                source: None,
                actions: NotificationActions::default(),
                progress: ProgressState::None,
            },
            can_collapse: true,
        }
    }

    /// Set the severity.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.state.severity = severity;
        self
    }

    /// Start expanded.
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.state.expanded = expanded;
        self
    }

    /// Offer or suppress the expand/collapse affordance.
    pub fn can_collapse(mut self, can_collapse: bool) -> Self {
        self.can_collapse = can_collapse;
        self
    }

    /// Set the source label.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.state.source = Some(source.into());
        self
    }

    /// Append a primary action.
    pub fn primary(mut self, action: Action) -> Self {
        self.state.actions.primary.push(action);
        self
    }

    /// Append a secondary action.
    pub fn secondary(mut self, action: Action) -> Self {
        self.state.actions.secondary.push(action);
        self
    }

    /// Set the initial progress.
    pub fn progress(mut self, progress: ProgressState) -> Self {
        self.state.progress = progress;
        self
    }

    /// Finish building.
    pub fn build(self) -> NotificationItem {
        NotificationItem {
            id: NotificationId::next(),
            can_collapse: self.can_collapse,
            state: RefCell::new(self.state),
            closed: Cell::new(false),
            on_did_change: Emitter::new(),
            on_did_close: Emitter::new(),
        }
    }
}
