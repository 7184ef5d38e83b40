//! Message rendering shared by measurement and real rows.

pub mod markdown;

pub use markdown::{
    DisabledConstructs, InlineMarkdownRenderer, LinkHandler, LinkRef, MessageRenderer,
    RenderOptions, RenderedMessage,
};

use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

/// Converts rendered text into pixel extents.
///
/// Text is laid out on a fixed cell grid; a cell is `cell_width_px` wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    cell_width_px: u32,
}

impl TextMetrics {
    /// Default width of one text cell in pixels.
    pub const DEFAULT_CELL_WIDTH_PX: u32 = 7;

    /// Metrics with the given cell width. A width of zero is clamped to one.
    pub fn new(cell_width_px: u32) -> Self {
        Self {
            cell_width_px: cell_width_px.max(1),
        }
    }

    /// Width of one text cell in pixels.
    pub fn cell_width_px(self) -> u32 {
        self.cell_width_px
    }

    /// Full unclipped width of `message` in pixels.
    pub fn message_width_px(self, message: &RenderedMessage) -> u32 {
        message.width_cells().saturating_mul(self.cell_width_px)
    }

    /// Number of whole cells that fit in `width_px`.
    pub fn cells_in(self, width_px: u32) -> u32 {
        width_px / self.cell_width_px
    }

    /// Cells a message wraps at inside a region `client_px` wide, at least one.
    pub fn wrap_cells(self, client_px: u32) -> usize {
        usize::try_from(self.cells_in(client_px))
            .unwrap_or(usize::MAX)
            .max(1)
    }

    /// Lines `message` wraps to inside a region `client_px` wide.
    ///
    /// Both the height oracle and the row widget wrap through [`wrap_spans`]
    /// at [`TextMetrics::wrap_cells`], so this is exactly the number of
    /// message lines a row draws.
    pub fn message_rows(self, message: &RenderedMessage, client_px: u32) -> u32 {
        let rows = wrap_spans(&message.flow_spans(), self.wrap_cells(client_px)).len();
        u32::try_from(rows).unwrap_or(u32::MAX)
    }
}

/// Split styled spans into rows of at most `width` cells.
///
/// A wide glyph is never split; it starts a new row when it does not fit.
/// Always returns at least one row.
pub fn wrap_spans(spans: &[Span<'static>], width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let mut used = 0;

    for span in spans {
        let mut current = String::new();
        for ch in span.content.chars() {
            let cells = ch.width().unwrap_or(0);
            if used + cells > width && used > 0 {
                if !current.is_empty() {
                    if let Some(row) = rows.last_mut() {
                        row.push(Span::styled(std::mem::take(&mut current), span.style));
                    }
                }
                rows.push(Vec::new());
                used = 0;
            }
            current.push(ch);
            used += cells;
        }
        if !current.is_empty() {
            if let Some(row) = rows.last_mut() {
                row.push(Span::styled(current, span.style));
            }
        }
    }
    rows
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CELL_WIDTH_PX)
    }
}
