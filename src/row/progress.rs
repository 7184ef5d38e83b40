//! Progress bar spanning the bottom of a row.
//!
//! Every setter is idempotent: applying a value the bar already shows leaves
//! it untouched, so re-applying a progress state is not a visual change.

use crate::model::ProgressState;
use ratatui::style::Color;

/// Animation mode of the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Not animating.
    #[default]
    Stopped,
    /// Indeterminate animation.
    Infinite,
    /// Fills proportionally to worked/total.
    Determinate,
    /// Completed.
    Done,
}

/// State of a row's progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressBar {
    mode: ProgressMode,
    total: Option<u64>,
    worked: u64,
    visible: bool,
    color: Option<Color>,
    mutations: u64,
}

impl ProgressBar {
    /// A stopped, hidden bar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a notification's progress state.
    pub fn apply(&mut self, state: ProgressState) {
        match state {
            ProgressState::None => {
                self.stop();
                self.hide();
            }
            ProgressState::Infinite => {
                self.infinite();
                self.show();
            }
            ProgressState::Determinate { total, worked } => {
                if let Some(total) = total {
                    self.set_total(total);
                }
                if let Some(worked) = worked {
                    self.set_worked(worked);
                    self.show();
                }
            }
            ProgressState::Done => {
                self.done();
                self.hide();
            }
        }
    }

    /// Show `state` as a fresh bar would, keeping only the theme color.
    ///
    /// Used when the row is bound to another notification: nothing from the
    /// previous item's progress survives. Counts one mutation when the shown
    /// state changes.
    pub fn reset_to(&mut self, state: ProgressState) {
        let mut fresh = Self {
            color: self.color,
            ..Self::default()
        };
        fresh.apply(state);
        let changed = fresh.mode != self.mode
            || fresh.total != self.total
            || fresh.worked != self.worked
            || fresh.visible != self.visible;
        if changed {
            self.mode = fresh.mode;
            self.total = fresh.total;
            self.worked = fresh.worked;
            self.visible = fresh.visible;
            self.mutations += 1;
        }
    }

    /// Stop any animation and forget determinate progress.
    pub fn stop(&mut self) {
        self.transition(ProgressMode::Stopped, None, 0);
    }

    /// Switch to indeterminate animation.
    pub fn infinite(&mut self) {
        self.transition(ProgressMode::Infinite, None, 0);
    }

    /// Mark the work complete.
    pub fn done(&mut self) {
        let total = self.total;
        let worked = total.unwrap_or(self.worked);
        self.transition(ProgressMode::Done, total, worked);
    }

    /// Set the total amount of work, switching to determinate mode.
    pub fn set_total(&mut self, total: u64) {
        let worked = if self.mode == ProgressMode::Determinate {
            self.worked
        } else {
            0
        };
        self.transition(ProgressMode::Determinate, Some(total), worked);
    }

    /// Set the absolute amount of completed work, switching to determinate mode.
    pub fn set_worked(&mut self, worked: u64) {
        let total = if self.mode == ProgressMode::Determinate {
            self.total
        } else {
            None
        };
        self.transition(ProgressMode::Determinate, total, worked);
    }

    /// Make the bar visible.
    pub fn show(&mut self) {
        if !self.visible {
            self.visible = true;
            self.mutations += 1;
        }
    }

    /// Hide the bar.
    pub fn hide(&mut self) {
        if self.visible {
            self.visible = false;
            self.mutations += 1;
        }
    }

    /// Apply theme color.
    pub fn set_color(&mut self, color: Color) {
        if self.color != Some(color) {
            self.color = Some(color);
            self.mutations += 1;
        }
    }

    fn transition(&mut self, mode: ProgressMode, total: Option<u64>, worked: u64) {
        if self.mode != mode || self.total != total || self.worked != worked {
            self.mode = mode;
            self.total = total;
            self.worked = worked;
            self.mutations += 1;
        }
    }

    /// Current mode.
    pub fn mode(&self) -> ProgressMode {
        self.mode
    }

    /// Total work, if known.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Completed work.
    pub fn worked(&self) -> u64 {
        self.worked
    }

    /// Whether the bar is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Theme color, once a theme has been applied.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Completed fraction in `0.0..=1.0` for determinate and done bars.
    pub fn ratio(&self) -> Option<f64> {
        match (self.mode, self.total) {
            (ProgressMode::Determinate | ProgressMode::Done, Some(total)) if total > 0 => {
                Some((self.worked.min(total) as f64) / (total as f64))
            }
            (ProgressMode::Done, _) => Some(1.0),
            _ => None,
        }
    }

    /// Number of visible changes applied so far.
    pub fn mutations(&self) -> u64 {
        self.mutations
    }
}
