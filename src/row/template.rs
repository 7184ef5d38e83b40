//! Row template: the reusable visual skeleton of one notification row.
//!
//! The skeleton is built once per template and then rebound to many items.
//! Every slot is fully rewritten on each render pass, so nothing observable
//! survives from a previous binding.

use super::presenter::ItemPresenter;
use super::progress::ProgressBar;
use crate::model::{Action, NotificationItem, Subscription};
use crate::render::{LinkRef, RenderedMessage};
use std::cell::{Ref, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Handle to a template owned by a [`TemplatePool`](super::TemplatePool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(usize);

impl TemplateId {
    /// Wrap a raw slot index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw slot index.
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Set of structural marker classes on an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(BTreeSet<&'static str>);

impl ClassList {
    /// Add or remove `class`.
    pub fn toggle(&mut self, class: &'static str, on: bool) {
        if on {
            self.0.insert(class);
        } else {
            self.0.remove(class);
        }
    }

    /// Whether `class` is set.
    pub fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    /// Classes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }
}

/// The host list's row element a template is attached to.
#[derive(Debug, Default)]
pub struct RowContainer {
    classes: ClassList,
    template: Option<TemplateId>,
}

impl RowContainer {
    /// An empty row element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Template attached to this row element.
    pub fn template(&self) -> Option<TemplateId> {
        self.template
    }

    /// Classes of the row element.
    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub(crate) fn attach(&mut self, id: TemplateId) {
        self.classes.toggle(CONTAINER_CLASS, true);
        self.template = Some(id);
    }
}

/// Class every row container carries.
pub const CONTAINER_CLASS: &str = "notification-list-item";
/// Container class present while the bound item is expanded.
pub const EXPANDED_CLASS: &str = "expanded";

/// Regions of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRegion {
    /// Source label and primary-action buttons.
    Details,
    /// Severity icon, message and toolbar.
    Main,
    /// Full-width progress bar.
    Progress,
}

/// Order regions appear in the structure, which is also keyboard order.
pub const STRUCTURE_ORDER: [RowRegion; 3] = [RowRegion::Details, RowRegion::Main, RowRegion::Progress];

/// Order regions are drawn top to bottom.
pub const VISUAL_ORDER: [RowRegion; 3] = [RowRegion::Main, RowRegion::Details, RowRegion::Progress];

/// Activation callback wired into a button or toolbar entry.
#[derive(Clone)]
pub struct Trigger(Rc<dyn Fn()>);

impl Trigger {
    /// Wrap a callback.
    pub fn new(callback: impl Fn() + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// Run the callback.
    pub fn fire(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Trigger(..)")
    }
}

/// Severity icon region.
#[derive(Debug, Default)]
pub struct IconSlot {
    /// Severity marker classes.
    pub classes: ClassList,
}

/// Message region.
#[derive(Debug, Default)]
pub struct MessageSlot {
    content: Option<RenderedMessage>,
    title: Option<String>,
    client_width: u32,
    scroll_width: u32,
}

impl MessageSlot {
    pub(crate) fn clear(&mut self) {
        self.content = None;
        self.title = None;
        self.client_width = 0;
        self.scroll_width = 0;
    }

    pub(crate) fn set_content(&mut self, content: RenderedMessage, client_width: u32, scroll_width: u32) {
        self.content = Some(content);
        self.client_width = client_width;
        self.scroll_width = scroll_width;
    }

    pub(crate) fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Rendered message, if any.
    pub fn content(&self) -> Option<&RenderedMessage> {
        self.content.as_ref()
    }

    /// Plain text of the rendered message.
    pub fn text(&self) -> String {
        self.content
            .as_ref()
            .map(RenderedMessage::plain_text)
            .unwrap_or_default()
    }

    /// Full-text tooltip, set only while the message is clipped.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Visible width of the region.
    pub fn client_width(&self) -> u32 {
        self.client_width
    }

    /// Unclipped width of the rendered message.
    pub fn scroll_width(&self) -> u32 {
        self.scroll_width
    }

    /// Embedded links.
    pub fn links(&self) -> &[LinkRef] {
        self.content.as_ref().map(|c| c.links()).unwrap_or(&[])
    }
}

/// One toolbar entry.
#[derive(Debug, Clone)]
pub struct ToolbarEntry {
    action: Action,
    tooltip: String,
    trigger: Trigger,
}

impl ToolbarEntry {
    pub(crate) fn new(action: Action, tooltip: String, trigger: Trigger) -> Self {
        Self {
            action,
            tooltip,
            trigger,
        }
    }

    /// The action behind the entry.
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Label plus key binding, when one is bound.
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }
}

/// Toolbar region.
#[derive(Debug, Default)]
pub struct Toolbar {
    entries: Vec<ToolbarEntry>,
}

impl Toolbar {
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn push(&mut self, entry: ToolbarEntry) {
        self.entries.push(entry);
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[ToolbarEntry] {
        &self.entries
    }

    /// Action ids in display order.
    pub fn action_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.action.id()).collect()
    }
}

/// Source label region.
#[derive(Debug, Default)]
pub struct SourceSlot {
    text: Option<String>,
}

impl SourceSlot {
    pub(crate) fn set(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Localized source label, if shown.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// A primary-action button.
#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    trigger: Trigger,
}

impl Button {
    pub(crate) fn new(label: String, trigger: Trigger) -> Self {
        Self { label, trigger }
    }

    /// Button label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Buttons region.
#[derive(Debug, Default)]
pub struct ButtonRow {
    buttons: Vec<Button>,
}

impl ButtonRow {
    pub(crate) fn clear(&mut self) {
        self.buttons.clear();
    }

    pub(crate) fn push(&mut self, button: Button) {
        self.buttons.push(button);
    }

    /// Buttons in display order.
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }
}

/// A stop in sequential keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStop {
    /// Button at index.
    Button(usize),
    /// Toolbar entry at index.
    Toolbar(usize),
}

/// All regions of a row.
#[derive(Debug, Default)]
pub struct RowElements {
    /// Classes on the row container.
    pub container: ClassList,
    /// Severity icon.
    pub icon: IconSlot,
    /// Message.
    pub message: MessageSlot,
    /// Toolbar.
    pub toolbar: Toolbar,
    /// Source label.
    pub source: SourceSlot,
    /// Primary-action buttons.
    pub buttons: ButtonRow,
    /// Progress bar.
    pub progress: ProgressBar,
}

impl RowElements {
    /// Keyboard stops in structure order. Message links are never stops.
    pub fn tab_stops(&self) -> Vec<TabStop> {
        let mut stops = Vec::new();
        for region in STRUCTURE_ORDER {
            match region {
                RowRegion::Details => {
                    stops.extend((0..self.buttons.buttons.len()).map(TabStop::Button))
                }
                RowRegion::Main => {
                    stops.extend((0..self.toolbar.entries.len()).map(TabStop::Toolbar))
                }
                RowRegion::Progress => {}
            }
        }
        stops
    }

    /// Whether the details row has anything to show.
    pub fn has_details(&self) -> bool {
        self.source.text.is_some() || !self.buttons.buttons.is_empty()
    }
}

/// A template instance: skeleton, its long-lived presenter and its theme
/// subscription.
pub struct RowTemplate {
    id: TemplateId,
    elements: Rc<RefCell<RowElements>>,
    presenter: ItemPresenter,
    theme_subscription: Option<Subscription>,
}

impl RowTemplate {
    pub(crate) fn new(
        id: TemplateId,
        elements: Rc<RefCell<RowElements>>,
        presenter: ItemPresenter,
        theme_subscription: Subscription,
    ) -> Self {
        Self {
            id,
            elements,
            presenter,
            theme_subscription: Some(theme_subscription),
        }
    }

    /// Handle of this template.
    pub fn id(&self) -> TemplateId {
        self.id
    }

    /// Current visual state.
    pub fn elements(&self) -> Ref<'_, RowElements> {
        self.elements.borrow()
    }

    /// Item currently bound, if any.
    pub fn input(&self) -> Option<&Rc<NotificationItem>> {
        self.presenter.input()
    }

    /// Number of subscriptions held for the current binding.
    pub fn active_subscriptions(&self) -> usize {
        self.presenter.active_subscriptions()
    }

    /// Activate the button at `index`. Returns `false` if there is none.
    pub fn activate_button(&self, index: usize) -> bool {
        let trigger = self
            .elements
            .borrow()
            .buttons
            .buttons
            .get(index)
            .map(|b| b.trigger.clone());
        fire(trigger)
    }

    /// Activate the toolbar entry at `index`. Returns `false` if there is none.
    pub fn activate_toolbar(&self, index: usize) -> bool {
        let trigger = self
            .elements
            .borrow()
            .toolbar
            .entries
            .get(index)
            .map(|e| e.trigger.clone());
        fire(trigger)
    }

    /// Activate the message link at `index`. Returns `false` if there is none.
    pub fn activate_link(&self, index: usize) -> bool {
        let content = self.elements.borrow().message.content.clone();
        content.is_some_and(|c| c.activate_link(index))
    }

    pub(crate) fn presenter_mut(&mut self) -> &mut ItemPresenter {
        &mut self.presenter
    }

    /// Release everything the template owns.
    pub(crate) fn dispose(mut self) {
        self.presenter.dispose();
        if let Some(subscription) = self.theme_subscription.take() {
            subscription.release();
        }
    }
}

fn fire(trigger: Option<Trigger>) -> bool {
    match trigger {
        Some(trigger) => {
            trigger.fire();
            true
        }
        None => false,
    }
}

impl fmt::Debug for RowTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowTemplate")
            .field("id", &self.id)
            .field("input", &self.presenter.input().map(|i| i.id()))
            .finish_non_exhaustive()
    }
}
