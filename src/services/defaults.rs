//! Default collaborator implementations used by the terminal front-end.

use super::{
    ActionRunner, ErrorSink, Localizer, Opener, ThemeColors, ThemeService, CLEAR_LABEL,
    COLLAPSE_LABEL, CONFIGURE_LABEL, EXPAND_LABEL, SOURCE_LABEL,
};
use crate::model::{
    Action, ActionError, ActionKind, Emitter, NotificationItem, OpenError, Subscription,
};
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use ratatui::style::Color;
use std::cell::Cell;
use std::error::Error;
use std::process::{Command, Stdio};
use std::rc::Rc;
use tracing::{debug, error, warn};

// ===== Opener =====

/// Opens links with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

const OPENABLE_SCHEMES: [&str; 4] = ["http://", "https://", "file://", "mailto:"];

impl SystemOpener {
    fn launch(target: &str) -> Result<(), OpenError> {
        if !OPENABLE_SCHEMES
            .iter()
            .any(|scheme| target.starts_with(scheme))
        {
            return Err(OpenError::UnsupportedTarget(target.to_string()));
        }

        let mut command = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]);
            command
        } else {
            Command::new("xdg-open")
        };

        command
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| debug!(link = target, "opened link"))
            .map_err(|source| OpenError::Launch {
                target: target.to_string(),
                source,
            })
    }
}

impl Opener for SystemOpener {
    fn open(&self, target: &str) -> LocalBoxFuture<'static, Result<(), OpenError>> {
        future::ready(Self::launch(target)).boxed_local()
    }
}

// ===== Action runner =====

/// Runs built-in row actions against their notification and plain actions
/// through their handler.
///
/// The action starts synchronously; the returned future only carries the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationActionRunner;

impl NotificationActionRunner {
    fn execute(action: &Action, context: &NotificationItem) -> Result<(), ActionError> {
        match action.kind() {
            ActionKind::Plain { handler } => match handler {
                Some(handler) => handler.call(),
                None => {
                    debug!(id = action.id(), "action has no handler");
                    Ok(())
                }
            },
            ActionKind::Configure { menu } => {
                debug!(entries = menu.len(), "configure menu requested");
                Ok(())
            }
            ActionKind::Expand | ActionKind::Collapse | ActionKind::Clear
                if context.is_closed() =>
            {
                Err(ActionError::ItemClosed)
            }
            ActionKind::Expand => {
                context.expand();
                Ok(())
            }
            ActionKind::Collapse => {
                context.collapse();
                Ok(())
            }
            ActionKind::Clear => {
                context.close();
                Ok(())
            }
        }
    }
}

impl ActionRunner for NotificationActionRunner {
    fn run(
        &self,
        action: &Action,
        context: &Rc<NotificationItem>,
    ) -> LocalBoxFuture<'static, Result<(), ActionError>> {
        future::ready(Self::execute(action, context)).boxed_local()
    }
}

// ===== Localization =====

/// English strings for every label the rows display.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLocalizer;

impl EnglishLocalizer {
    fn template(key: &str) -> Option<&'static str> {
        match key {
            SOURCE_LABEL => Some("Source: {0}"),
            CONFIGURE_LABEL => Some("Configure Notification"),
            EXPAND_LABEL => Some("Expand Notification"),
            COLLAPSE_LABEL => Some("Collapse Notification"),
            CLEAR_LABEL => Some("Clear Notification"),
            _ => None,
        }
    }
}

impl Localizer for EnglishLocalizer {
    fn format(&self, key: &str, args: &[&str]) -> String {
        let Some(template) = Self::template(key) else {
            warn!(key, "missing localization");
            return key.to_string();
        };
        args.iter()
            .enumerate()
            .fold(template.to_string(), |text, (i, arg)| {
                text.replace(&format!("{{{i}}}"), arg)
            })
    }
}

// ===== Theme =====

/// Fixed named palettes with a change stream for switching between them.
#[derive(Debug)]
pub struct StaticTheme {
    colors: Cell<ThemeColors>,
    on_did_change: Emitter<ThemeColors>,
}

impl StaticTheme {
    /// Names accepted by [`StaticTheme::named`].
    pub const NAMES: [&'static str; 3] = ["dark", "light", "high-contrast"];

    /// Palette for `name`, falling back to `dark` for unknown names.
    pub fn named(name: &str) -> Self {
        Self {
            colors: Cell::new(Self::palette(name)),
            on_did_change: Emitter::new(),
        }
    }

    /// Switch palettes and notify subscribers.
    pub fn set_theme(&self, name: &str) {
        let colors = Self::palette(name);
        if self.colors.replace(colors) != colors {
            self.on_did_change.fire(&colors);
        }
    }

    fn palette(name: &str) -> ThemeColors {
        match name {
            "light" => ThemeColors {
                progress: Color::Blue,
                info: Color::Blue,
                warning: Color::Rgb(191, 136, 3),
                error: Color::Red,
            },
            "high-contrast" => ThemeColors {
                progress: Color::Yellow,
                info: Color::White,
                warning: Color::Yellow,
                error: Color::LightRed,
            },
            other => {
                if other != "dark" {
                    warn!(theme = other, "unknown theme, using dark");
                }
                ThemeColors {
                    progress: Color::Cyan,
                    info: Color::LightBlue,
                    warning: Color::Yellow,
                    error: Color::Red,
                }
            }
        }
    }
}

impl ThemeService for StaticTheme {
    fn colors(&self) -> ThemeColors {
        self.colors.get()
    }

    fn on_did_change(&self, listener: Box<dyn Fn(&ThemeColors)>) -> Subscription {
        self.on_did_change.subscribe(listener)
    }
}

// ===== Error sink =====

/// Logs unexpected errors through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn on_unexpected_error(&self, err: &dyn Error) {
        error!(error = %err, "unexpected error");
    }
}
