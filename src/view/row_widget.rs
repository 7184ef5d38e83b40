//! Terminal widget for one bound notification row.
//!
//! A terminal line stands for [`LINE_HEIGHT`] pixels, so a row of height `h`
//! occupies `ceil(h / LINE_HEIGHT)` lines. The last line is the progress
//! gauge.

use super::styles::{severity_glyph, RowStyles};
use crate::model::action::{
    CLEAR_ACTION_ID, COLLAPSE_ACTION_ID, CONFIGURE_ACTION_ID, EXPAND_ACTION_ID,
};
use crate::model::Severity;
use crate::render::{wrap_spans, TextMetrics};
use crate::row::{ProgressMode, RowElements, LINE_HEIGHT};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

/// Indent of continuation and details lines: focus marker, icon, space.
const GUTTER: usize = 3;

/// Terminal lines needed for a row of `height` pixels.
pub fn row_lines(height: u32) -> u16 {
    u16::try_from(height.div_ceil(LINE_HEIGHT)).unwrap_or(u16::MAX)
}

/// Severity shown by the icon slot.
pub fn icon_severity(elements: &RowElements) -> Severity {
    Severity::ALL
        .into_iter()
        .find(|severity| elements.icon.classes.contains(severity.marker()))
        .unwrap_or_default()
}

fn toolbar_glyph(action_id: &str) -> &'static str {
    match action_id {
        CONFIGURE_ACTION_ID => "⚙",
        EXPAND_ACTION_ID => "▸",
        COLLAPSE_ACTION_ID => "▾",
        CLEAR_ACTION_ID => "✕",
        _ => "•",
    }
}

fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|s| s.content.width()).sum()
}

/// Draws a [`RowElements`] snapshot.
#[derive(Debug)]
pub struct RowWidget<'a> {
    elements: &'a RowElements,
    styles: &'a RowStyles,
    metrics: TextMetrics,
    focused: bool,
    clip_top: u16,
}

impl<'a> RowWidget<'a> {
    /// Widget over `elements`, laid out with `metrics`.
    pub fn new(elements: &'a RowElements, styles: &'a RowStyles, metrics: TextMetrics) -> Self {
        Self {
            elements,
            styles,
            metrics,
            focused: false,
            clip_top: 0,
        }
    }

    /// Mark the row as focused.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Skip the first `lines` lines (row scrolled partly above the viewport).
    pub fn clip_top(mut self, lines: u16) -> Self {
        self.clip_top = lines;
        self
    }

    fn message_spans(&self) -> Vec<Span<'static>> {
        self.elements
            .message
            .content()
            .map(|content| content.flow_spans())
            .unwrap_or_default()
    }

    fn toolbar_spans(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        for entry in self.elements.toolbar.entries() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                toolbar_glyph(entry.action().id()),
                self.styles.dim(),
            ));
        }
        spans
    }

    /// All lines of the row, padded or cut to `count`.
    pub fn lines(&self, width: u16, count: u16) -> Vec<Line<'static>> {
        let count = usize::from(count);
        if count == 0 {
            return Vec::new();
        }
        let width = usize::from(width);
        let expanded = self.elements.container.contains(crate::row::template::EXPANDED_CLASS);
        // Same wrap width the height oracle measures with.
        let message_cells = self.metrics.wrap_cells(self.elements.message.client_width());

        let toolbar = self.toolbar_spans();
        let toolbar_width = spans_width(&toolbar);
        let main_cells = message_cells.min(width.saturating_sub(GUTTER + toolbar_width).max(1));

        let message = self.message_spans();
        let wrapped = wrap_spans(&message, if expanded { message_cells } else { main_cells });
        let mut rows = wrapped.into_iter();

        // Main line
        let severity = icon_severity(self.elements);
        let mut main = vec![
            Span::styled(if self.focused { "▌" } else { " " }, self.styles.focus()),
            Span::styled(severity_glyph(severity), self.styles.severity(severity)),
            Span::raw(" "),
        ];
        let mut first = rows.next().unwrap_or_default();
        if !expanded && rows.len() > 0 {
            // Clipped: make room for the ellipsis.
            first = wrap_spans(&first, main_cells.saturating_sub(1))
                .into_iter()
                .next()
                .unwrap_or_default();
            first.push(Span::raw("…"));
        }
        let used = GUTTER + spans_width(&first);
        main.extend(first);
        if width > used + toolbar_width {
            main.push(Span::raw(" ".repeat(width - used - toolbar_width)));
        }
        main.extend(toolbar);

        let mut lines = vec![Line::from(main)];
        if expanded {
            for row in rows {
                let mut spans = vec![Span::raw(" ".repeat(GUTTER))];
                spans.extend(row);
                lines.push(Line::from(spans));
            }
        }

        if self.elements.has_details() {
            let source = self.elements.source.text().unwrap_or_default().to_string();
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(GUTTER)),
                Span::styled(source, self.styles.dim()),
            ]));
            let mut buttons = vec![Span::raw(" ".repeat(GUTTER))];
            for (i, button) in self.elements.buttons.buttons().iter().enumerate() {
                if i > 0 {
                    buttons.push(Span::raw(" "));
                }
                buttons.push(Span::raw(format!("[ {} ]", button.label())));
            }
            lines.push(Line::from(buttons));
        }

        lines.truncate(count - 1);
        lines.resize(count - 1, Line::default());
        lines.push(self.progress_line(width));
        lines
    }

    fn progress_line(&self, width: usize) -> Line<'static> {
        let bar = &self.elements.progress;
        if !bar.is_visible() || width == 0 {
            return Line::default();
        }
        match (bar.mode(), bar.ratio()) {
            (ProgressMode::Infinite, _) => Line::from(Span::styled(
                "╍".repeat(width),
                self.styles.progress(),
            )),
            (_, Some(ratio)) => {
                let filled = ((width as f64) * ratio).round() as usize;
                let filled = filled.min(width);
                Line::from(vec![
                    Span::styled("━".repeat(filled), self.styles.progress()),
                    Span::styled("─".repeat(width - filled), self.styles.dim()),
                ])
            }
            _ => Line::default(),
        }
    }
}

impl Widget for RowWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.clip_top.saturating_add(area.height);
        let lines = self.lines(area.width, count);
        Paragraph::new(lines)
            .scroll((self.clip_top, 0))
            .render(area, buf);
    }
}
