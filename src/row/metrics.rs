//! Row dimensions shared by sizing and rendering.
//!
//! The height oracle and every row template read the same [`RowLayout`], so
//! the width a message is measured against is the width it is rendered into.

use crate::render::{MessageRenderer, RenderOptions, RenderedMessage, TextMetrics};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Height of one collapsed row, and of the details row.
pub const ROW_HEIGHT: u32 = 42;

/// Height of each additional wrapped message line.
pub const LINE_HEIGHT: u32 = 22;

/// Horizontal padding around the message.
pub const ROW_PADDING: u32 = 20;

/// Width of the severity icon slot.
pub const ICON_WIDTH: u32 = 22;

/// Width of one toolbar button.
pub const TOOLBAR_BUTTON_WIDTH: u32 = 24;

/// Toolbar slots reserved regardless of how many actions are shown.
pub const TOOLBAR_BUTTONS: u32 = 3;

/// Width taken from a row before the message gets any.
pub const FIXED_CHROME: u32 = ROW_PADDING + ICON_WIDTH + TOOLBAR_BUTTONS * TOOLBAR_BUTTON_WIDTH;

/// Shared layout context: current row width, text metrics and the message
/// renderer.
pub struct RowLayout {
    width: Cell<u32>,
    metrics: TextMetrics,
    renderer: Rc<dyn MessageRenderer>,
}

impl RowLayout {
    /// Create a layout for rows `width` pixels wide.
    pub fn new(width: u32, metrics: TextMetrics, renderer: Rc<dyn MessageRenderer>) -> Rc<Self> {
        Rc::new(Self {
            width: Cell::new(width),
            metrics,
            renderer,
        })
    }

    /// Current row width in pixels.
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    /// Change the row width. Heights computed before the change are stale.
    pub fn set_width(&self, width: u32) {
        self.width.set(width);
    }

    /// Width available to the message after fixed chrome, never zero.
    pub fn message_client_width(&self) -> u32 {
        self.width.get().saturating_sub(FIXED_CHROME).max(1)
    }

    /// Text metrics.
    pub fn metrics(&self) -> TextMetrics {
        self.metrics
    }

    /// Render `source` with `options` through the shared renderer.
    pub fn render(&self, source: &str, options: &RenderOptions) -> RenderedMessage {
        self.renderer.render(source, options)
    }
}

impl fmt::Debug for RowLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowLayout")
            .field("width", &self.width.get())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
