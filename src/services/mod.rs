//! Collaborator interfaces consumed by the row engine.
//!
//! Everything here is single-threaded and shared by `Rc`. Asynchronous
//! results are boxed local futures, spawned fire-and-forget on a
//! `futures` [`LocalSpawner`]; failures are routed to the [`ErrorSink`].

pub mod defaults;

pub use defaults::{
    EnglishLocalizer, NotificationActionRunner, StaticTheme, SystemOpener, TracingErrorSink,
};

use crate::model::{Action, ActionError, NotificationItem, OpenError, Subscription};
use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use ratatui::style::Color;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

/// Localization key of the "Source: {0}" label.
pub const SOURCE_LABEL: &str = "notification.source";
/// Localization key of the configure action label.
pub const CONFIGURE_LABEL: &str = "notification.configure.label";
/// Localization key of the expand action label.
pub const EXPAND_LABEL: &str = "notification.expand.label";
/// Localization key of the collapse action label.
pub const COLLAPSE_LABEL: &str = "notification.collapse.label";
/// Localization key of the clear action label.
pub const CLEAR_LABEL: &str = "notification.clear.label";

/// Navigates to link targets.
pub trait Opener {
    /// Open `target`. Completion may happen on a later turn of the executor.
    fn open(&self, target: &str) -> LocalBoxFuture<'static, Result<(), OpenError>>;
}

/// Runs actions against the notification they were rendered for.
pub trait ActionRunner {
    /// Run `action` with `context` as its target.
    fn run(
        &self,
        action: &Action,
        context: &Rc<NotificationItem>,
    ) -> LocalBoxFuture<'static, Result<(), ActionError>>;
}

/// Resolves the key binding label for an action id.
pub trait KeybindingLookup {
    /// Label such as `Ctrl+X`, or `None` when nothing is bound.
    fn lookup(&self, action_id: &str) -> Option<String>;
}

/// Formats user-facing strings.
pub trait Localizer {
    /// Format the message for `key`, substituting `{0}`, `{1}`, ... with `args`.
    fn format(&self, key: &str, args: &[&str]) -> String;
}

/// Colors the theming service applies to rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    /// Progress bar foreground.
    pub progress: Color,
    /// Info icon.
    pub info: Color,
    /// Warning icon.
    pub warning: Color,
    /// Error icon.
    pub error: Color,
}

/// Supplies styling and notifies when it changes.
pub trait ThemeService {
    /// Current colors.
    fn colors(&self) -> ThemeColors;

    /// Subscribe to theme changes. The listener receives the new colors.
    fn on_did_change(&self, listener: Box<dyn Fn(&ThemeColors)>) -> Subscription;
}

/// Central sink for failures that must not interrupt rendering.
pub trait ErrorSink {
    /// Report an unexpected error.
    fn on_unexpected_error(&self, error: &dyn Error);
}

/// Bundle of collaborators handed to the template pool.
#[derive(Clone)]
pub struct Services {
    /// Link opener.
    pub opener: Rc<dyn Opener>,
    /// Action runner shared by toolbar entries and buttons.
    pub runner: Rc<dyn ActionRunner>,
    /// Key binding lookup for toolbar tooltips.
    pub keybindings: Rc<dyn KeybindingLookup>,
    /// Localization.
    pub localizer: Rc<dyn Localizer>,
    /// Theming.
    pub theme: Rc<dyn ThemeService>,
    /// Unexpected error sink.
    pub errors: Rc<dyn ErrorSink>,
    /// Executor handle for fire-and-forget tasks.
    pub spawner: LocalSpawner,
}

impl Services {
    /// Spawn `task` without waiting for it; its failure goes to the error sink.
    pub fn spawn_reported<E>(&self, task: LocalBoxFuture<'static, Result<(), E>>)
    where
        E: Error + 'static,
    {
        let errors = Rc::clone(&self.errors);
        let reported = async move {
            if let Err(err) = task.await {
                errors.on_unexpected_error(&err);
            }
        };
        if let Err(err) = self.spawner.spawn_local(reported) {
            self.errors.on_unexpected_error(&err);
        }
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
