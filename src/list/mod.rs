//! Host virtualization list.
//!
//! Keeps every entry with its oracle height in a [`HeightIndex`] and binds
//! only the rows that intersect the viewport. Templates of rows that scroll
//! out are parked on an idle stack and rebound to rows that scroll in.

pub mod height_index;

pub use height_index::HeightIndex;

use crate::model::{ChangeKind, ListEntry, NotificationId, RowError, Subscription, TemplateKind};
use crate::row::{HeightOracle, RowContainer, RowLayout, RowTemplate, TemplateId, TemplatePool};
use crate::services::Services;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;
use std::rc::Rc;
use tracing::debug;

/// Default number of unbound templates kept for reuse.
pub const DEFAULT_MAX_IDLE_TEMPLATES: usize = 8;

#[derive(Debug)]
struct Row {
    container: RowContainer,
    template: TemplateId,
}

/// A row currently on screen.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    /// Entry index.
    pub index: usize,
    /// Top offset in list pixels.
    pub top: u32,
    /// Oracle height.
    pub height: u32,
    /// Template bound to the entry.
    pub template: &'a RowTemplate,
}

/// Virtualized list of notification entries.
#[derive(Debug)]
pub struct VirtualList {
    entries: Vec<ListEntry>,
    watches: Vec<Option<Subscription>>,
    heights: HeightIndex,
    oracle: HeightOracle,
    pool: TemplatePool,
    bound: BTreeMap<usize, Row>,
    idle: Vec<Row>,
    stale: Rc<RefCell<BTreeSet<NotificationId>>>,
    viewport_height: u32,
    scroll_top: u32,
    max_idle_templates: usize,
}

impl VirtualList {
    /// Create an empty list whose rows are laid out by `layout`.
    pub fn new(layout: Rc<RowLayout>, services: Services, viewport_height: u32) -> Self {
        Self {
            entries: Vec::new(),
            watches: Vec::new(),
            heights: HeightIndex::new(64),
            oracle: HeightOracle::new(Rc::clone(&layout)),
            pool: TemplatePool::new(layout, services),
            bound: BTreeMap::new(),
            idle: Vec::new(),
            stale: Rc::new(RefCell::new(BTreeSet::new())),
            viewport_height,
            scroll_top: 0,
            max_idle_templates: DEFAULT_MAX_IDLE_TEMPLATES,
        }
    }

    /// Cap on unbound templates kept for reuse.
    pub fn set_max_idle_templates(&mut self, max: usize) {
        self.max_idle_templates = max;
    }

    /// Append an entry.
    pub fn push(&mut self, entry: impl Into<ListEntry>) {
        let entry = entry.into();
        let height = self.oracle.height(&entry);
        let watch = self.watch(&entry);
        self.watches.push(watch);
        self.heights.push(height);
        self.entries.push(entry);
    }

    /// Append several entries.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = ListEntry>) {
        for entry in entries {
            self.push(entry);
        }
    }

    // Changes that alter layout are not patched by the presenter; mark the
    // item so the next `sync` re-measures and rebinds it.
    fn watch(&self, entry: &ListEntry) -> Option<Subscription> {
        let item = entry.as_notification()?;
        let stale = Rc::clone(&self.stale);
        let id = item.id();
        Some(item.on_did_change(move |change| {
            if matches!(
                change,
                ChangeKind::ExpansionState | ChangeKind::Message | ChangeKind::Actions
            ) {
                stale.borrow_mut().insert(id);
            }
        }))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    pub fn entry(&self, index: usize) -> Option<&ListEntry> {
        self.entries.get(index)
    }

    /// Recorded height of entry `index`.
    pub fn height(&self, index: usize) -> Option<u32> {
        self.heights.get(index)
    }

    /// Top offset of entry `index`.
    pub fn offset_of(&self, index: usize) -> u32 {
        self.heights.offset_of(index)
    }

    /// Sum of all row heights.
    pub fn total_height(&self) -> u32 {
        self.heights.total()
    }

    /// Current scroll offset in pixels.
    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    /// Viewport height in pixels.
    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> u32 {
        self.total_height().saturating_sub(self.viewport_height)
    }

    /// The template pool.
    pub fn pool(&self) -> &TemplatePool {
        &self.pool
    }

    /// Change the row width and viewport height. Every row is re-measured.
    pub fn resize(&mut self, width: u32, viewport_height: u32) {
        self.viewport_height = viewport_height;
        if width != self.pool.layout().width() {
            self.pool.layout().set_width(width);
            let heights: Vec<u32> = self
                .entries
                .iter()
                .map(|entry| self.oracle.height(entry))
                .collect();
            self.heights = HeightIndex::from_heights(heights);
            self.park_all();
            debug!(width, rows = self.entries.len(), "re-measured list");
        }
        self.scroll_to(self.scroll_top);
    }

    /// Scroll to `offset`, clamped to the content.
    pub fn scroll_to(&mut self, offset: u32) {
        self.scroll_top = offset.min(self.max_scroll());
    }

    /// Scroll by `delta` pixels.
    pub fn scroll_by(&mut self, delta: i64) {
        let target = (i64::from(self.scroll_top) + delta).clamp(0, i64::from(u32::MAX));
        self.scroll_to(u32::try_from(target).unwrap_or(u32::MAX));
    }

    /// Scroll the least amount that makes entry `index` fully visible.
    pub fn reveal(&mut self, index: usize) {
        let Some(height) = self.heights.get(index) else {
            return;
        };
        let top = self.heights.offset_of(index);
        if top < self.scroll_top {
            self.scroll_to(top);
        } else if top + height > self.scroll_top + self.viewport_height {
            self.scroll_to((top + height).saturating_sub(self.viewport_height));
        }
    }

    /// Entries intersecting the viewport.
    pub fn visible_range(&self) -> Range<usize> {
        if self.viewport_height == 0 {
            return 0..0;
        }
        let len = self.entries.len();
        let Some(start) = self.heights.lower_bound(self.scroll_top) else {
            return len..len;
        };
        let last_pixel = self.scroll_top.saturating_add(self.viewport_height - 1);
        let end = self
            .heights
            .lower_bound(last_pixel)
            .map_or(len, |last| last + 1);
        start..end
    }

    /// Bind every visible supported entry, recycling templates of rows that
    /// left the viewport.
    pub fn render(&mut self) -> Result<(), RowError> {
        let range = self.visible_range();

        let departed: Vec<usize> = self
            .bound
            .keys()
            .copied()
            .filter(|index| !range.contains(index))
            .collect();
        for index in departed {
            if let Some(row) = self.bound.remove(&index) {
                self.idle.push(row);
            }
        }

        for index in range {
            if self.bound.contains_key(&index) {
                continue;
            }
            let entry = &self.entries[index];
            let Some(TemplateKind::Notification) = self.oracle.template_kind(entry) else {
                continue;
            };
            let Some(item) = entry.as_notification().cloned() else {
                continue;
            };

            let row = match self.idle.pop() {
                Some(row) => row,
                None => {
                    let mut container = RowContainer::new();
                    let template = self.pool.create_template(&mut container);
                    Row {
                        container,
                        template,
                    }
                }
            };
            self.pool.bind(&item, index, row.template)?;
            self.bound.insert(index, row);
        }

        while self.idle.len() > self.max_idle_templates {
            if let Some(row) = self.idle.pop() {
                self.pool.destroy_template(row.template)?;
            }
        }
        Ok(())
    }

    /// Re-measure entry `index` and rebind it if it is on screen.
    pub fn refresh(&mut self, index: usize) -> Result<(), RowError> {
        let Some(entry) = self.entries.get(index) else {
            return Ok(());
        };
        let height = self.oracle.height(entry);
        self.heights.set(index, height);

        if let (Some(row), Some(item)) = (self.bound.get(&index), entry.as_notification()) {
            self.pool.bind(item, index, row.template)?;
        }
        self.scroll_to(self.scroll_top);
        Ok(())
    }

    /// Remove closed notifications. Returns how many were removed.
    pub fn prune_closed(&mut self) -> usize {
        let before = self.entries.len();
        let mut kept_entries = Vec::with_capacity(before);
        let mut kept_watches = Vec::with_capacity(before);
        let mut kept_heights = Vec::with_capacity(before);

        let rows = self.entries.drain(..).zip(self.watches.drain(..));
        for (index, (entry, watch)) in rows.enumerate() {
            if entry.as_notification().is_some_and(|item| item.is_closed()) {
                continue;
            }
            kept_heights.push(self.heights.get(index).unwrap_or(0));
            kept_entries.push(entry);
            kept_watches.push(watch);
        }

        let removed = before - kept_entries.len();
        self.entries = kept_entries;
        self.watches = kept_watches;
        if removed > 0 {
            self.heights = HeightIndex::from_heights(kept_heights);
            self.park_all();
            self.scroll_to(self.scroll_top);
            debug!(removed, remaining = self.entries.len(), "pruned closed notifications");
        }
        removed
    }

    /// Apply pending item changes: drop closed items, re-measure changed
    /// ones, then render.
    pub fn sync(&mut self) -> Result<(), RowError> {
        self.prune_closed();
        let stale = std::mem::take(&mut *self.stale.borrow_mut());
        for id in stale {
            let index = self
                .entries
                .iter()
                .position(|entry| entry.as_notification().is_some_and(|item| item.id() == id));
            if let Some(index) = index {
                self.refresh(index)?;
            }
        }
        self.render()
    }

    /// Close every notification.
    pub fn clear_all(&mut self) {
        for item in self.entries.iter().filter_map(ListEntry::as_notification) {
            item.close();
        }
    }

    fn park_all(&mut self) {
        let bound = std::mem::take(&mut self.bound);
        self.idle.extend(bound.into_values());
    }

    /// Rows currently bound, top to bottom.
    pub fn visible_rows(&self) -> impl Iterator<Item = VisibleRow<'_>> + '_ {
        self.bound.iter().filter_map(|(&index, row)| {
            Some(VisibleRow {
                index,
                top: self.heights.offset_of(index),
                height: self.heights.get(index)?,
                template: self.pool.template(row.template)?,
            })
        })
    }

    /// Template bound to entry `index`, if it is on screen.
    pub fn template_at(&self, index: usize) -> Option<&RowTemplate> {
        let row = self.bound.get(&index)?;
        debug_assert_eq!(row.container.template(), Some(row.template));
        self.pool.template(row.template)
    }

    /// Number of bound plus idle templates.
    pub fn live_templates(&self) -> usize {
        self.pool.live_templates()
    }

    /// Number of idle templates.
    pub fn idle_templates(&self) -> usize {
        self.idle.len()
    }

    /// Destroy every template and release every watch.
    pub fn dispose(&mut self) {
        self.bound.clear();
        self.idle.clear();
        self.pool.dispose();
        self.watches.clear();
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
