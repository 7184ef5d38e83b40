//! Terminal front-end (impure shell).
//!
//! Hosts a [`VirtualList`] in a ratatui terminal. One terminal line stands
//! for [`LINE_HEIGHT`] pixels and one column for `cell_width_px` pixels, so
//! the oracle's pixel heights translate directly into row lines.

pub mod row_widget;
pub mod styles;

pub use row_widget::{row_lines, RowWidget};
pub use styles::{ColorConfig, RowStyles};

use crate::config::KeyBindings;
use crate::list::VirtualList;
use crate::model::action::{CLEAR_ACTION_ID, COLLAPSE_ACTION_ID, EXPAND_ACTION_ID};
use crate::model::{AppError, KeyAction, ListEntry, NotificationId};
use crate::render::{InlineMarkdownRenderer, TextMetrics};
use crate::row::{RowLayout, RowTemplate, LINE_HEIGHT};
use crate::services::{
    EnglishLocalizer, NotificationActionRunner, Opener, Services, StaticTheme, SystemOpener,
    ThemeService, TracingErrorSink,
};
use crate::source::InputSource;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::executor::LocalPool;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

/// Front-end settings resolved from configuration and CLI flags.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Width of one terminal column in pixels.
    pub cell_width_px: u32,
    /// Cap on unbound templates kept for reuse.
    pub max_idle_templates: usize,
    /// Colour output.
    pub colors: ColorConfig,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            cell_width_px: TextMetrics::DEFAULT_CELL_WIDTH_PX,
            max_idle_templates: crate::list::DEFAULT_MAX_IDLE_TEMPLATES,
            colors: ColorConfig::from_env_and_args(false),
        }
    }
}

/// Main TUI application.
///
/// Generic over backend to support testing with `TestBackend`.
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    executor: LocalPool,
    list: VirtualList,
    input_source: InputSource,
    key_bindings: KeyBindings,
    theme: Rc<StaticTheme>,
    colors: ColorConfig,
    cell_width_px: u32,
    focus: Option<(NotificationId, usize)>,
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Build the app over `terminal` with the system opener.
    pub fn new(
        terminal: Terminal<B>,
        input_source: InputSource,
        key_bindings: KeyBindings,
        theme: Rc<StaticTheme>,
        options: ViewOptions,
    ) -> Result<Self, AppError> {
        Self::with_opener(
            terminal,
            input_source,
            key_bindings,
            theme,
            Rc::new(SystemOpener),
            options,
        )
    }

    /// Build the app with a custom link opener.
    pub fn with_opener(
        terminal: Terminal<B>,
        input_source: InputSource,
        key_bindings: KeyBindings,
        theme: Rc<StaticTheme>,
        opener: Rc<dyn Opener>,
        options: ViewOptions,
    ) -> Result<Self, AppError> {
        let executor = LocalPool::new();
        let services = Services {
            opener,
            runner: Rc::new(NotificationActionRunner),
            keybindings: Rc::new(key_bindings.clone()),
            localizer: Rc::new(EnglishLocalizer),
            theme: Rc::clone(&theme) as Rc<dyn ThemeService>,
            errors: Rc::new(TracingErrorSink),
            spawner: executor.spawner(),
        };

        let size = terminal.size()?;
        let layout = RowLayout::new(
            u32::from(size.width.max(1)) * options.cell_width_px,
            TextMetrics::new(options.cell_width_px),
            Rc::new(InlineMarkdownRenderer),
        );
        let mut list = VirtualList::new(layout, services, viewport_px(size.height));
        list.set_max_idle_templates(options.max_idle_templates);

        Ok(Self {
            terminal,
            executor,
            list,
            input_source,
            key_bindings,
            theme,
            colors: options.colors,
            cell_width_px: options.cell_width_px,
            focus: None,
        })
    }

    /// Run the main event loop until the user quits.
    ///
    /// Redraws on input, resize, or when new notifications arrive.
    pub fn run(&mut self) -> Result<(), AppError> {
        const TICK: Duration = Duration::from_millis(250);

        self.poll_input()?;
        self.draw()?;

        loop {
            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        if self.handle_key(key)? {
                            return Ok(());
                        }
                        self.draw()?;
                    }
                    Event::Resize(width, height) => {
                        self.handle_resize(width, height)?;
                        self.draw()?;
                    }
                    _ => {}
                }
            } else if self.poll_input()? {
                self.draw()?;
            }
        }
    }

    /// Move newly arrived notifications into the list. Returns whether any
    /// arrived.
    pub fn poll_input(&mut self) -> Result<bool, AppError> {
        let items = self.input_source.poll()?;
        if items.is_empty() {
            return Ok(false);
        }
        debug!(count = items.len(), "adding notifications");
        self.list.extend(items.into_iter().map(ListEntry::from));
        if self.focus.is_none() {
            self.focus_index(self.notification_indices().first().copied());
        }
        self.settle()?;
        Ok(true)
    }

    /// Handle a single keyboard event. Returns `true` if the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool, AppError> {
        let Some(action) = self.key_bindings.get(key) else {
            return Ok(false);
        };
        let line = i64::from(LINE_HEIGHT);
        let page = i64::from(self.list.viewport_height());

        match action {
            KeyAction::Quit => return Ok(true),
            KeyAction::ScrollUp => self.list.scroll_by(-line),
            KeyAction::ScrollDown => self.list.scroll_by(line),
            KeyAction::PageUp => self.list.scroll_by(-page),
            KeyAction::PageDown => self.list.scroll_by(page),
            KeyAction::ScrollToTop => self.list.scroll_to(0),
            KeyAction::ScrollToBottom => self.list.scroll_to(self.list.max_scroll()),
            KeyAction::FocusNext => self.move_focus(1),
            KeyAction::FocusPrev => self.move_focus(-1),
            KeyAction::ToggleExpand => {
                self.with_focused(|template| {
                    activate_toolbar_action(template, &[EXPAND_ACTION_ID, COLLAPSE_ACTION_ID])
                })?;
            }
            KeyAction::Clear => {
                self.with_focused(|template| activate_toolbar_action(template, &[CLEAR_ACTION_ID]))?;
            }
            KeyAction::ClearAll => self.list.clear_all(),
            KeyAction::RunPrimary => {
                self.with_focused(|template| template.activate_button(0))?;
            }
            KeyAction::OpenLink => {
                self.with_focused(|template| template.activate_link(0))?;
            }
        }

        self.settle()?;
        Ok(false)
    }

    /// Resize the list to a `width` x `height` terminal.
    pub fn handle_resize(&mut self, width: u16, height: u16) -> Result<(), AppError> {
        let width = u32::from(width.max(1)) * self.cell_width_px;
        self.list.resize(width, viewport_px(height));
        self.settle()
    }

    /// Run pending tasks, apply item changes and keep the focus on a live row.
    fn settle(&mut self) -> Result<(), AppError> {
        self.executor.run_until_stalled();
        self.list.sync()?;

        if let Some((id, previous)) = self.focus {
            let position = self.list_position(id);
            match position {
                Some(index) => self.focus = Some((id, index)),
                None => {
                    let indices = self.notification_indices();
                    let next = indices
                        .iter()
                        .copied()
                        .find(|&index| index >= previous)
                        .or_else(|| indices.last().copied());
                    self.focus_index(next);
                }
            }
        }
        Ok(())
    }

    fn list_position(&self, id: NotificationId) -> Option<usize> {
        (0..self.list.len()).find(|&index| {
            self.list
                .entry(index)
                .and_then(ListEntry::as_notification)
                .is_some_and(|item| item.id() == id)
        })
    }

    fn notification_indices(&self) -> Vec<usize> {
        (0..self.list.len())
            .filter(|&index| {
                self.list
                    .entry(index)
                    .is_some_and(|entry| entry.as_notification().is_some())
            })
            .collect()
    }

    fn focus_index(&mut self, index: Option<usize>) {
        self.focus = index.and_then(|index| {
            let item = self.list.entry(index)?.as_notification()?;
            Some((item.id(), index))
        });
    }

    fn move_focus(&mut self, delta: isize) {
        let indices = self.notification_indices();
        if indices.is_empty() {
            self.focus = None;
            return;
        }
        let current = self
            .focus
            .and_then(|(_, index)| indices.iter().position(|&i| i == index));
        let next = match current {
            Some(position) => {
                (position as isize + delta).rem_euclid(indices.len() as isize) as usize
            }
            None => 0,
        };
        self.focus_index(Some(indices[next]));
        self.list.reveal(indices[next]);
    }

    fn with_focused(&mut self, act: impl FnOnce(&RowTemplate) -> bool) -> Result<(), AppError> {
        let Some((_, index)) = self.focus else {
            return Ok(());
        };
        self.list.reveal(index);
        self.list.render()?;
        if let Some(template) = self.list.template_at(index) {
            if !act(template) {
                debug!(index, "nothing to activate on focused row");
            }
        }
        Ok(())
    }

    /// Index of the focused entry.
    pub fn focused(&self) -> Option<usize> {
        self.focus.map(|(_, index)| index)
    }

    /// The hosted list.
    pub fn list(&self) -> &VirtualList {
        &self.list
    }

    /// The terminal (for inspecting a test backend).
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    fn status_line(&self) -> String {
        let Some(template) = self.focused().and_then(|index| self.list.template_at(index)) else {
            return format!("{} notifications", self.list.len());
        };
        let elements = template.elements();
        let mut parts: Vec<String> = elements
            .toolbar
            .entries()
            .iter()
            .map(|entry| entry.tooltip().to_string())
            .collect();
        if let Some(title) = elements.message.title() {
            parts.insert(0, title.to_string());
        }
        parts.join(" · ")
    }

    /// Render the current frame.
    pub fn draw(&mut self) -> Result<(), AppError> {
        let styles = RowStyles::new(self.theme.colors(), self.colors);
        let metrics = self.list.pool().layout().metrics();
        let status = self.status_line();
        let focused = self.focused();
        let list = &self.list;

        self.terminal.draw(|frame| {
            let [rows_area, status_area] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

            if list.is_empty() {
                frame.render_widget(
                    Paragraph::new("No notifications").style(styles.dim()),
                    rows_area,
                );
            }

            for row in list.visible_rows() {
                let Some(area) = row_area(rows_area, row.top, row.height, list.scroll_top()) else {
                    continue;
                };
                let elements = row.template.elements();
                frame.render_widget(
                    RowWidget::new(&elements, &styles, metrics)
                        .focused(focused == Some(row.index))
                        .clip_top(area.1),
                    area.0,
                );
            }

            frame.render_widget(Paragraph::new(status).style(styles.dim()), status_area);
        })?;
        Ok(())
    }
}

/// Pixel height of the list viewport for a terminal `height` lines tall,
/// one line reserved for the status bar.
fn viewport_px(height: u16) -> u32 {
    u32::from(height.saturating_sub(1)) * LINE_HEIGHT
}

/// Screen area of a row and how many of its lines are scrolled off the top.
fn row_area(rows_area: Rect, top: u32, height: u32, scroll_top: u32) -> Option<(Rect, u16)> {
    let line = i64::from(LINE_HEIGHT);
    let first = (i64::from(top) - i64::from(scroll_top)).div_euclid(line);
    let clip = (-first).max(0);
    let y = first.max(0);
    let lines = (i64::from(row_lines(height)) - clip).min(i64::from(rows_area.height) - y);
    if lines <= 0 {
        return None;
    }
    let y = u16::try_from(y).ok()?;
    let area = Rect::new(
        rows_area.x,
        rows_area.y + y,
        rows_area.width,
        u16::try_from(lines).ok()?,
    );
    Some((area, u16::try_from(clip).ok()?))
}

fn activate_toolbar_action(template: &RowTemplate, action_ids: &[&str]) -> bool {
    let position = template
        .elements()
        .toolbar
        .entries()
        .iter()
        .position(|entry| action_ids.contains(&entry.action().id()));
    position.is_some_and(|index| template.activate_toolbar(index))
}

/// Set up the terminal, run the app over `input_source`, and restore the
/// terminal even if the app fails.
///
/// Logging must be initialized by the caller.
pub fn run_with_source(
    input_source: InputSource,
    key_bindings: KeyBindings,
    theme: Rc<StaticTheme>,
    options: ViewOptions,
) -> Result<(), AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let terminal: Terminal<CrosstermBackend<Stdout>> = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = TuiApp::new(terminal, input_source, key_bindings, theme, options)
        .and_then(|mut app| app.run());

    restore_terminal()?;
    info!("terminal restored");
    result
}

fn restore_terminal() -> Result<(), AppError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
