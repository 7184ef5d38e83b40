//! Binds one notification into one row template and keeps it live.
//!
//! A presenter lives as long as its template. Each `set_input` opens a new
//! [`BindSession`] that owns every subscription made for that item; the
//! previous session is released before anything of the new item is touched.

use super::metrics::RowLayout;
use super::pool::SharedActions;
use super::template::{Button, RowElements, ToolbarEntry, Trigger, EXPANDED_CLASS};
use crate::model::{Action, ChangeKind, NotificationItem, Severity, Subscription};
use crate::render::{LinkHandler, RenderOptions};
use crate::services::{Services, CONFIGURE_LABEL, SOURCE_LABEL};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Collaborators a presenter renders with.
pub(crate) struct PresenterContext {
    pub(crate) services: Services,
    pub(crate) actions: Rc<SharedActions>,
    pub(crate) layout: Rc<RowLayout>,
}

/// Subscriptions acquired while one item is bound.
#[derive(Default)]
pub struct BindSession {
    subscriptions: Vec<Subscription>,
}

impl BindSession {
    fn hold(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the session holds nothing.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every subscription exactly once.
    pub fn release(self) {
        for subscription in self.subscriptions {
            subscription.release();
        }
    }
}

/// Renders a notification into a template and patches it on change.
pub struct ItemPresenter {
    elements: Rc<RefCell<RowElements>>,
    ctx: Rc<PresenterContext>,
    generation: Rc<Cell<u64>>,
    input: Option<Rc<NotificationItem>>,
    session: Option<BindSession>,
}

impl ItemPresenter {
    pub(crate) fn new(elements: Rc<RefCell<RowElements>>, ctx: Rc<PresenterContext>) -> Self {
        Self {
            elements,
            ctx,
            generation: Rc::new(Cell::new(0)),
            input: None,
            session: None,
        }
    }

    /// Bind `item`: release the previous binding, render everything, then
    /// listen for changes.
    pub fn set_input(&mut self, item: Rc<NotificationItem>) {
        self.release_session();
        self.generation.set(self.generation.get() + 1);

        render(
            &self.ctx,
            &mut self.elements.borrow_mut(),
            &item,
            &self.generation,
        );

        let mut session = BindSession::default();
        session.hold(self.listen(&item));
        self.session = Some(session);
        self.input = Some(item);
    }

    fn listen(&self, item: &Rc<NotificationItem>) -> Subscription {
        let elements = Rc::downgrade(&self.elements);
        let target: Weak<NotificationItem> = Rc::downgrade(item);
        item.on_did_change(move |change| {
            let (Some(elements), Some(item)) = (elements.upgrade(), target.upgrade()) else {
                return;
            };
            let mut elements = elements.borrow_mut();
            match change {
                ChangeKind::Severity => render_severity(&mut elements, item.severity()),
                ChangeKind::Progress => elements.progress.apply(item.progress()),
                other => trace!(change = ?other, "change not patched in place"),
            }
        })
    }

    fn release_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.release();
        }
    }

    /// Item currently bound.
    pub fn input(&self) -> Option<&Rc<NotificationItem>> {
        self.input.as_ref()
    }

    /// Subscriptions held for the current binding.
    pub fn active_subscriptions(&self) -> usize {
        self.session.as_ref().map_or(0, BindSession::len)
    }

    /// Release the current binding.
    pub fn dispose(&mut self) {
        self.release_session();
        self.generation.set(self.generation.get() + 1);
        self.input = None;
    }
}

fn render(
    ctx: &PresenterContext,
    elements: &mut RowElements,
    item: &Rc<NotificationItem>,
    generation: &Rc<Cell<u64>>,
) {
    elements.container.toggle(EXPANDED_CLASS, item.expanded());
    render_severity(elements, item.severity());
    let overflows = render_message(ctx, elements, item, generation);
    render_toolbar(ctx, elements, item, overflows);
    render_source(ctx, elements, item);
    render_buttons(ctx, elements, item);
    elements.progress.reset_to(item.progress());
}

fn render_severity(elements: &mut RowElements, severity: Severity) {
    for candidate in Severity::ALL {
        elements
            .icon
            .classes
            .toggle(candidate.marker(), candidate == severity);
    }
}

/// Renders the message and returns whether it is clipped.
fn render_message(
    ctx: &PresenterContext,
    elements: &mut RowElements,
    item: &NotificationItem,
    generation: &Rc<Cell<u64>>,
) -> bool {
    elements.message.clear();

    let options = RenderOptions::restricted().with_link_handler(link_handler(ctx, generation));
    let rendered = ctx.layout.render(&item.message(), &options);

    let client_width = ctx.layout.message_client_width();
    let scroll_width = ctx.layout.metrics().message_width_px(&rendered);
    let overflows = item.can_collapse() && !item.expanded() && scroll_width > client_width;

    let title = overflows.then(|| rendered.plain_text());
    elements.message.set_content(rendered, client_width, scroll_width);
    elements.message.set_title(title);
    overflows
}

fn link_handler(ctx: &PresenterContext, generation: &Rc<Cell<u64>>) -> LinkHandler {
    let services = ctx.services.clone();
    let bound = generation.get();
    let current = Rc::downgrade(generation);
    LinkHandler::new(move |target| {
        if current.upgrade().map(|g| g.get()) != Some(bound) {
            debug!(link = target, "row rebound, ignoring link");
            return;
        }
        services.spawn_reported(services.opener.open(target));
    })
}

fn render_toolbar(
    ctx: &PresenterContext,
    elements: &mut RowElements,
    item: &Rc<NotificationItem>,
    overflows: bool,
) {
    let mut actions = Vec::with_capacity(3);

    let secondary = item.actions().secondary;
    if !secondary.is_empty() {
        let label = ctx.services.localizer.format(CONFIGURE_LABEL, &[]);
        actions.push(Action::configure(label, secondary));
    }

    if item.can_collapse() && (item.expanded() || item.has_source() || overflows) {
        let toggle = if item.expanded() {
            &ctx.actions.collapse
        } else {
            &ctx.actions.expand
        };
        actions.push(toggle.clone());
    }

    actions.push(ctx.actions.clear.clone());

    elements.toolbar.clear();
    for action in actions {
        let tooltip = match ctx.services.keybindings.lookup(action.id()) {
            Some(key) => format!("{} ({key})", action.label()),
            None => action.label().to_string(),
        };
        let trigger = run_action_trigger(&ctx.services, action.clone(), item);
        elements
            .toolbar
            .push(ToolbarEntry::new(action, tooltip, trigger));
    }
}

fn run_action_trigger(services: &Services, action: Action, item: &Rc<NotificationItem>) -> Trigger {
    let services = services.clone();
    let item = Rc::downgrade(item);
    Trigger::new(move || {
        if let Some(item) = item.upgrade() {
            services.spawn_reported(services.runner.run(&action, &item));
        }
    })
}

fn render_source(ctx: &PresenterContext, elements: &mut RowElements, item: &NotificationItem) {
    let label = match item.source() {
        Some(source) if item.expanded() && !source.is_empty() => {
            Some(ctx.services.localizer.format(SOURCE_LABEL, &[&source]))
        }
        _ => None,
    };
    elements.source.set(label);
}

fn render_buttons(ctx: &PresenterContext, elements: &mut RowElements, item: &Rc<NotificationItem>) {
    elements.buttons.clear();
    if !item.expanded() {
        return;
    }

    for action in item.actions().primary {
        let services = ctx.services.clone();
        let target = Rc::downgrade(item);
        let label = action.label().to_string();
        let trigger = Trigger::new(move || {
            let Some(item) = target.upgrade() else {
                return;
            };
            if item.is_closed() {
                return;
            }
            services.spawn_reported(services.runner.run(&action, &item));
            item.close();
        });
        elements.buttons.push(Button::new(label, trigger));
    }
}

#[cfg(test)]
#[path = "presenter_tests.rs"]
mod tests;
