//! Off-screen measurement surface.
//!
//! A single invisible, non-wrapping, overflow-hidden strip the width of a row.
//! Messages are mounted into it, measured, and cleared again before the
//! measuring call returns.

use crate::render::{RenderedMessage, TextMetrics};

/// The shared measurement surrogate.
#[derive(Debug)]
pub struct MeasureSurface {
    width: u32,
    metrics: TextMetrics,
    content: Option<RenderedMessage>,
}

impl MeasureSurface {
    /// Create an empty surface.
    pub fn new(metrics: TextMetrics) -> Self {
        Self {
            width: 0,
            metrics,
            content: None,
        }
    }

    /// Size the surface to the row width.
    pub fn size_to(&mut self, width: u32) {
        self.width = width;
    }

    /// Visible width of the surface.
    pub fn client_width(&self) -> u32 {
        self.width
    }

    /// Mount `message`, replacing anything already mounted.
    pub fn mount(&mut self, message: RenderedMessage) {
        self.content = Some(message);
    }

    /// Full extent of the mounted content including the part clipped by
    /// overflow. Zero when empty.
    pub fn content_width(&self) -> u32 {
        self.content
            .as_ref()
            .map(|content| self.metrics.message_width_px(content))
            .unwrap_or(0)
    }

    /// Lines the mounted content wraps to when `chrome` pixels of the surface
    /// are taken by fixed row parts. One when empty.
    pub fn content_rows(&self, chrome: u32) -> u32 {
        let client = self.width.saturating_sub(chrome).max(1);
        self.content
            .as_ref()
            .map_or(1, |content| self.metrics.message_rows(content, client))
    }

    /// Remove mounted content.
    pub fn clear(&mut self) {
        self.content = None;
    }

    /// Whether nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}
