//! Test harness for row-engine scenarios.
//!
//! Wires a [`TemplatePool`] to recording collaborators and a `LocalPool`
//! executor so tests can bind items, poke at templates, and then drive
//! pending fire-and-forget tasks explicitly.

use crate::model::{Action, ActionError, NotificationItem, OpenError};
use crate::render::{InlineMarkdownRenderer, TextMetrics};
use crate::list::VirtualList;
use crate::row::{RowContainer, RowLayout, RowTemplate, TemplateId, TemplatePool};
use crate::services::{
    ActionRunner, EnglishLocalizer, ErrorSink, KeybindingLookup, NotificationActionRunner, Opener,
    Services, StaticTheme,
};
use futures::executor::LocalPool;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::io;
use std::rc::Rc;

/// Opener that records targets and optionally fails.
#[derive(Default)]
pub struct RecordingOpener {
    pub opened: RefCell<Vec<String>>,
    pub fail: Cell<bool>,
}

impl Opener for RecordingOpener {
    fn open(&self, target: &str) -> LocalBoxFuture<'static, Result<(), OpenError>> {
        self.opened.borrow_mut().push(target.to_string());
        let result = if self.fail.get() {
            Err(OpenError::Launch {
                target: target.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no handler"),
            })
        } else {
            Ok(())
        };
        future::ready(result).boxed_local()
    }
}

/// Runner that records action ids and then runs the real built-ins.
#[derive(Default)]
pub struct RecordingRunner {
    pub ran: RefCell<Vec<String>>,
}

impl ActionRunner for RecordingRunner {
    fn run(
        &self,
        action: &Action,
        context: &Rc<NotificationItem>,
    ) -> LocalBoxFuture<'static, Result<(), ActionError>> {
        self.ran.borrow_mut().push(action.id().to_string());
        NotificationActionRunner.run(action, context)
    }
}

/// Error sink that keeps every message.
#[derive(Default)]
pub struct RecordingSink {
    pub errors: RefCell<Vec<String>>,
}

impl ErrorSink for RecordingSink {
    fn on_unexpected_error(&self, error: &dyn Error) {
        self.errors.borrow_mut().push(error.to_string());
    }
}

/// Key binding table keyed by action id.
#[derive(Default)]
pub struct FixedKeybindings(pub HashMap<String, String>);

impl FixedKeybindings {
    pub fn with(mut self, action_id: &str, key: &str) -> Self {
        self.0.insert(action_id.to_string(), key.to_string());
        self
    }
}

impl KeybindingLookup for FixedKeybindings {
    fn lookup(&self, action_id: &str) -> Option<String> {
        self.0.get(action_id).cloned()
    }
}

/// Recording collaborators shared by the harnesses.
pub struct Recorders {
    pub opener: Rc<RecordingOpener>,
    pub runner: Rc<RecordingRunner>,
    pub sink: Rc<RecordingSink>,
    pub theme: Rc<StaticTheme>,
}

impl Recorders {
    fn new() -> Self {
        Self {
            opener: Rc::new(RecordingOpener::default()),
            runner: Rc::new(RecordingRunner::default()),
            sink: Rc::new(RecordingSink::default()),
            theme: Rc::new(StaticTheme::named("dark")),
        }
    }

    fn services(&self, executor: &LocalPool, keybindings: FixedKeybindings) -> Services {
        Services {
            opener: self.opener.clone(),
            runner: self.runner.clone(),
            keybindings: Rc::new(keybindings),
            localizer: Rc::new(EnglishLocalizer),
            theme: self.theme.clone(),
            errors: self.sink.clone(),
            spawner: executor.spawner(),
        }
    }
}

/// Rows 314px wide with 10px cells: 200px (20 cells) for the message.
pub fn test_layout() -> Rc<RowLayout> {
    RowLayout::new(314, TextMetrics::new(10), Rc::new(InlineMarkdownRenderer))
}

/// Harness around one template pool.
pub struct RowHarness {
    pub executor: LocalPool,
    pub templates: TemplatePool,
    pub recorders: Recorders,
}

impl RowHarness {
    pub fn new() -> Self {
        Self::with_keybindings(FixedKeybindings::default())
    }

    pub fn with_keybindings(keybindings: FixedKeybindings) -> Self {
        Self::build(test_layout(), keybindings)
    }

    /// Harness over rows laid out by `layout` instead of [`test_layout`].
    pub fn with_layout(layout: Rc<RowLayout>) -> Self {
        Self::build(layout, FixedKeybindings::default())
    }

    fn build(layout: Rc<RowLayout>, keybindings: FixedKeybindings) -> Self {
        let executor = LocalPool::new();
        let recorders = Recorders::new();
        let services = recorders.services(&executor, keybindings);
        Self {
            executor,
            templates: TemplatePool::new(layout, services),
            recorders,
        }
    }

    pub fn create(&mut self) -> TemplateId {
        let mut container = RowContainer::new();
        self.templates.create_template(&mut container)
    }

    pub fn bind(&mut self, item: &Rc<NotificationItem>, id: TemplateId) {
        self.templates
            .bind(item, 0, id)
            .expect("template should be alive");
    }

    pub fn template(&self, id: TemplateId) -> &RowTemplate {
        self.templates.template(id).expect("template should be alive")
    }

    /// Drive every pending task as far as it can go.
    pub fn run(&mut self) {
        self.executor.run_until_stalled();
    }
}

/// Harness around a virtual list.
pub struct ListHarness {
    pub executor: LocalPool,
    pub list: VirtualList,
    pub recorders: Recorders,
}

impl ListHarness {
    /// A list over [`test_layout`] rows with a viewport `viewport_height` px tall.
    pub fn new(viewport_height: u32) -> Self {
        let executor = LocalPool::new();
        let recorders = Recorders::new();
        let services = recorders.services(&executor, FixedKeybindings::default());
        Self {
            list: VirtualList::new(test_layout(), services, viewport_height),
            executor,
            recorders,
        }
    }

    /// Drive pending tasks, then apply item changes to the list.
    pub fn settle(&mut self) {
        self.executor.run_until_stalled();
        self.list.sync().expect("sync should succeed");
    }
}

/// Shorthand for an `Rc`-wrapped item.
pub fn item(builder: crate::model::NotificationBuilder) -> Rc<NotificationItem> {
    Rc::new(builder.build())
}
