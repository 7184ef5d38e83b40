//! Template pool: builds row skeletons on demand and forwards binds.
//!
//! Construction is the expensive step and happens only when the host list
//! needs another visible row. Binding touches one template only.

use super::metrics::RowLayout;
use super::presenter::{ItemPresenter, PresenterContext};
use super::template::{RowContainer, RowElements, RowTemplate, TemplateId};
use crate::model::action::{CLEAR_ACTION_ID, COLLAPSE_ACTION_ID, EXPAND_ACTION_ID};
use crate::model::{Action, ActionKind, NotificationItem, RowError};
use crate::services::{Localizer, Services, CLEAR_LABEL, COLLAPSE_LABEL, EXPAND_LABEL};
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace};

/// Row actions shared by every template of one pool.
#[derive(Debug)]
pub struct SharedActions {
    /// Closes the notification.
    pub clear: Action,
    /// Expands the notification.
    pub expand: Action,
    /// Collapses the notification.
    pub collapse: Action,
}

impl SharedActions {
    fn new(localizer: &dyn Localizer) -> Self {
        Self {
            clear: Action::new(CLEAR_ACTION_ID, localizer.format(CLEAR_LABEL, &[]), ActionKind::Clear),
            expand: Action::new(
                EXPAND_ACTION_ID,
                localizer.format(EXPAND_LABEL, &[]),
                ActionKind::Expand,
            ),
            collapse: Action::new(
                COLLAPSE_ACTION_ID,
                localizer.format(COLLAPSE_LABEL, &[]),
                ActionKind::Collapse,
            ),
        }
    }
}

/// Owner of every row template the host list has asked for.
#[derive(Debug)]
pub struct TemplatePool {
    layout: Rc<RowLayout>,
    services: Services,
    actions: OnceCell<Rc<SharedActions>>,
    templates: Vec<Option<RowTemplate>>,
}

impl TemplatePool {
    /// Create an empty pool rendering against `layout`.
    pub fn new(layout: Rc<RowLayout>, services: Services) -> Self {
        Self {
            layout,
            services,
            actions: OnceCell::new(),
            templates: Vec::new(),
        }
    }

    fn shared_actions(&self) -> Rc<SharedActions> {
        Rc::clone(
            self.actions
                .get_or_init(|| Rc::new(SharedActions::new(self.services.localizer.as_ref()))),
        )
    }

    /// Build a new template and attach it to `container`.
    pub fn create_template(&mut self, container: &mut RowContainer) -> TemplateId {
        let id = TemplateId::new(self.templates.len());

        let elements = Rc::new(RefCell::new(RowElements::default()));
        elements
            .borrow_mut()
            .progress
            .set_color(self.services.theme.colors().progress);

        let theme_subscription = {
            let elements = Rc::downgrade(&elements);
            self.services.theme.on_did_change(Box::new(move |colors| {
                if let Some(elements) = elements.upgrade() {
                    elements.borrow_mut().progress.set_color(colors.progress);
                }
            }))
        };

        let ctx = Rc::new(PresenterContext {
            services: self.services.clone(),
            actions: self.shared_actions(),
            layout: Rc::clone(&self.layout),
        });
        let presenter = ItemPresenter::new(Rc::clone(&elements), ctx);

        container.attach(id);
        self.templates
            .push(Some(RowTemplate::new(id, elements, presenter, theme_subscription)));
        debug!(template = %id, live = self.live_templates(), "created row template");
        id
    }

    /// Bind `item`, shown at list `index`, into template `id`.
    pub fn bind(
        &mut self,
        item: &Rc<NotificationItem>,
        index: usize,
        id: TemplateId,
    ) -> Result<(), RowError> {
        let template = self
            .templates
            .get_mut(id.get())
            .and_then(Option::as_mut)
            .ok_or(RowError::UnknownTemplate(id))?;
        trace!(template = %id, index, item = %item.id(), "bind");
        template.presenter_mut().set_input(Rc::clone(item));
        Ok(())
    }

    /// Dispose template `id` and everything it owns.
    pub fn destroy_template(&mut self, id: TemplateId) -> Result<(), RowError> {
        let template = self
            .templates
            .get_mut(id.get())
            .and_then(Option::take)
            .ok_or(RowError::UnknownTemplate(id))?;
        template.dispose();
        debug!(template = %id, live = self.live_templates(), "destroyed row template");
        Ok(())
    }

    /// Dispose every template.
    pub fn dispose(&mut self) {
        for template in self.templates.drain(..).flatten() {
            template.dispose();
        }
    }

    /// Template `id`, if it is alive.
    pub fn template(&self, id: TemplateId) -> Option<&RowTemplate> {
        self.templates.get(id.get()).and_then(Option::as_ref)
    }

    /// Number of templates not yet destroyed.
    pub fn live_templates(&self) -> usize {
        self.templates.iter().flatten().count()
    }

    /// Layout the templates render against.
    pub fn layout(&self) -> &Rc<RowLayout> {
        &self.layout
    }

    /// Services the templates render with.
    pub fn services(&self) -> &Services {
        &self.services
    }
}

impl Drop for TemplatePool {
    fn drop(&mut self) {
        self.dispose();
    }
}
