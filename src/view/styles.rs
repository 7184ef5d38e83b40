//! Row styling.
//!
//! Severity colours come from the active theme; `--no-color` and `NO_COLOR`
//! turn every style plain.

use crate::model::Severity;
use crate::services::ThemeColors;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether colours are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// `--no-color` wins, then any `NO_COLOR` value, else colours are on.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Colours on, regardless of environment.
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Colours off.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== RowStyles =====

/// Styles used by the row widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStyles {
    info: Style,
    warning: Style,
    error: Style,
    progress: Style,
    dim: Style,
    focus: Style,
    colors: ColorConfig,
}

impl RowStyles {
    /// Styles for `colors`, or plain styles when colour is disabled.
    pub fn new(colors: ThemeColors, config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                info: Style::default().fg(colors.info),
                warning: Style::default().fg(colors.warning),
                error: Style::default().fg(colors.error),
                progress: Style::default().fg(colors.progress),
                dim: Style::default().fg(Color::DarkGray),
                focus: Style::default().add_modifier(Modifier::BOLD),
                colors: config,
            }
        } else {
            Self {
                info: Style::default(),
                warning: Style::default(),
                error: Style::default(),
                progress: Style::default(),
                dim: Style::default(),
                focus: Style::default().add_modifier(Modifier::REVERSED),
                colors: config,
            }
        }
    }

    /// Rebuild after a theme change, keeping the colour setting.
    pub fn with_theme(self, colors: ThemeColors) -> Self {
        Self::new(colors, self.colors)
    }

    /// Icon style for `severity`.
    pub fn severity(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }

    /// Progress gauge style.
    pub fn progress(&self) -> Style {
        self.progress
    }

    /// Secondary text (source label, toolbar).
    pub fn dim(&self) -> Style {
        self.dim
    }

    /// Focus marker.
    pub fn focus(&self) -> Style {
        self.focus
    }
}

/// Icon glyph for `severity`.
pub fn severity_glyph(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "ℹ",
        Severity::Warning => "⚠",
        Severity::Error => "✖",
    }
}

// ===== Tests =====
