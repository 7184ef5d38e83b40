//! Height oracle for the host list.
//!
//! Predicts the pixel height of a row before it is rendered. Collapsed rows
//! are always one row tall. Expanded rows reserve one extra line per wrapped
//! message line plus a details row when there is a source or a primary action
//! to show. Wrapping is derived by rendering the message into the shared
//! measurement surface with the same restricted renderer the row uses, and
//! wrapping it at the same whole-cell width the row widget draws at.

use super::measure::MeasureSurface;
use super::metrics::{RowLayout, FIXED_CHROME, LINE_HEIGHT, ROW_HEIGHT};
use crate::model::{ListEntry, NotificationItem, TemplateKind};
use crate::render::RenderOptions;
use std::rc::Rc;
use tracing::trace;

/// Sizing delegate consulted by the host list during layout.
#[derive(Debug)]
pub struct HeightOracle {
    layout: Rc<RowLayout>,
    surface: MeasureSurface,
}

impl HeightOracle {
    /// Create an oracle measuring against `layout`.
    pub fn new(layout: Rc<RowLayout>) -> Self {
        let surface = MeasureSurface::new(layout.metrics());
        Self { layout, surface }
    }

    /// Template to render `entry` with, or `None` when this engine has no
    /// compatible template and the entry must not be rendered.
    pub fn template_kind(&self, entry: &ListEntry) -> Option<TemplateKind> {
        match entry {
            ListEntry::Notification(_) => Some(TemplateKind::Notification),
            ListEntry::Foreign { .. } => None,
        }
    }

    /// Pixel height of `entry`. Entries without a template are zero high.
    pub fn height(&mut self, entry: &ListEntry) -> u32 {
        match entry {
            ListEntry::Notification(item) => self.notification_height(item),
            ListEntry::Foreign { .. } => 0,
        }
    }

    /// Pixel height of a notification row at the current row width.
    pub fn notification_height(&mut self, item: &NotificationItem) -> u32 {
        if !item.expanded() {
            return ROW_HEIGHT;
        }

        let preferred_rows = self.preferred_rows(item);
        let mut expanded_height = ROW_HEIGHT;
        let message_height = preferred_rows * LINE_HEIGHT;
        if message_height > LINE_HEIGHT {
            expanded_height += message_height - LINE_HEIGHT;
        }

        // Details row
        if item.has_source() || item.has_primary_actions() {
            expanded_height += ROW_HEIGHT;
        }

        trace!(id = %item.id(), preferred_rows, expanded_height, "measured notification");
        expanded_height
    }

    /// Number of lines the message wraps to when expanded, at least one.
    pub fn preferred_rows(&mut self, item: &NotificationItem) -> u32 {
        let rendered = self
            .layout
            .render(&item.message(), &RenderOptions::restricted());

        self.surface.size_to(self.layout.width());
        self.surface.mount(rendered);
        let rows = self.surface.content_rows(FIXED_CHROME);
        self.surface.clear();

        rows
    }

    /// The measurement surface. Always empty between calls.
    pub fn surface(&self) -> &MeasureSurface {
        &self.surface
    }
}

#[cfg(test)]
#[path = "height_tests.rs"]
mod tests;
