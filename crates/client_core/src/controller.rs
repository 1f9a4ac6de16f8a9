//! Application coordinator: reacts to bus events, mutates state, calls the
//! backend and re-renders the affected views.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use crossbeam_channel::{Sender, TrySendError};
use shared::{
    domain::{FormKind, Product, ProductId},
    protocol::OrderSuccess,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    backend::{BackendCommand, BackendEvent},
    bus::{AppEvent, EventBus, EventFilter, EventKind, SubscriptionId},
    state::{AppState, FormErrors},
    views::{
        BasketManager, BasketView, CardView, FormView, ModalContent, ModalHost, ModalKind,
        PageView, SuccessView,
    },
};

pub const ORDER_FAILED: &str = "Failed to place the order, please try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Browsing,
    EditingOrder,
    EditingContacts,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("backend command queue is full")]
    QueueFull,
    #[error("backend command processor disconnected")]
    Disconnected,
}

pub struct Controller {
    events: Rc<EventBus>,
    state: Rc<AppState>,
    commands: Sender<BackendCommand>,
    page: RefCell<PageView>,
    modal: RefCell<ModalHost>,
    basket: RefCell<BasketManager>,
    order: RefCell<FormView>,
    contacts: RefCell<FormView>,
    success: RefCell<SuccessView>,
    step: Cell<CheckoutStep>,
    subscriptions: RefCell<Vec<SubscriptionId>>,
}

impl Controller {
    pub fn new(
        events: Rc<EventBus>,
        state: Rc<AppState>,
        commands: Sender<BackendCommand>,
    ) -> Rc<Self> {
        Rc::new(Self {
            events,
            state,
            commands,
            page: RefCell::new(PageView::default()),
            modal: RefCell::new(ModalHost::default()),
            basket: RefCell::new(BasketManager::new()),
            order: RefCell::new(FormView::new(FormKind::Order)),
            contacts: RefCell::new(FormView::new(FormKind::Contacts)),
            success: RefCell::new(SuccessView::default()),
            step: Cell::new(CheckoutStep::Browsing),
            subscriptions: RefCell::new(Vec::new()),
        })
    }

    /// Subscribes every handler and requests the catalog.
    pub fn init(self: &Rc<Self>) {
        self.attach();
        if let Err(err) = self.dispatch(BackendCommand::FetchCatalog) {
            error!("failed to request product catalog: {err}");
        }
    }

    /// Registers the event table. Calling it twice is a no-op.
    pub fn attach(self: &Rc<Self>) {
        if !self.subscriptions.borrow().is_empty() {
            return;
        }
        let routes: [(EventFilter, fn(&Self, &AppEvent)); 14] = [
            (EventFilter::exact(EventKind::CatalogChanged), Self::on_catalog_changed),
            (EventFilter::exact(EventKind::CardSelect), Self::on_card_select),
            (EventFilter::exact(EventKind::CardAdd), Self::on_card_add),
            (EventFilter::exact(EventKind::BasketRemove), Self::on_basket_remove),
            (EventFilter::exact(EventKind::BasketOpen), Self::on_basket_open),
            (EventFilter::exact(EventKind::BasketChanged), Self::on_basket_changed),
            (EventFilter::exact(EventKind::OrderOpen), Self::on_order_open),
            (EventFilter::exact(EventKind::OrderSubmit), Self::on_order_submit),
            (EventFilter::exact(EventKind::ContactsSubmit), Self::on_contacts_submit),
            (EventFilter::exact(EventKind::OrderErrorsChanged), Self::on_errors_changed),
            (EventFilter::exact(EventKind::ContactsErrorsChanged), Self::on_errors_changed),
            (EventFilter::FormFieldChange, Self::on_form_input),
            (EventFilter::exact(EventKind::ModalOpen), Self::on_modal_open),
            (EventFilter::exact(EventKind::ModalClose), Self::on_modal_close),
        ];
        let ids: Vec<SubscriptionId> = routes
            .into_iter()
            .map(|(filter, handler)| self.route(filter, handler))
            .collect();
        *self.subscriptions.borrow_mut() = ids;
    }

    pub fn detach(&self) {
        for id in self.subscriptions.borrow_mut().drain(..) {
            self.events.off(id);
        }
    }

    fn route(self: &Rc<Self>, filter: EventFilter, handler: fn(&Self, &AppEvent)) -> SubscriptionId {
        let this: Weak<Self> = Rc::downgrade(self);
        self.events.on(filter, move |event| {
            if let Some(this) = this.upgrade() {
                handler(&this, event);
            }
        })
    }

    pub fn dispatch(&self, cmd: BackendCommand) -> Result<(), DispatchError> {
        let name = cmd.name();
        match self.commands.try_send(cmd) {
            Ok(()) => {
                debug!(command = name, "queued ui->backend command");
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                warn!(command = name, "backend command queue is full");
                Err(DispatchError::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(command = name, "backend command processor disconnected");
                Err(DispatchError::Disconnected)
            }
        }
    }

    /// Completion of a network call re-enters the event model here.
    pub fn handle_backend_event(&self, event: BackendEvent) {
        match event {
            BackendEvent::CatalogLoaded(Ok(items)) => {
                info!(count = items.len(), "catalog loaded");
                self.state.set_catalog(items);
            }
            BackendEvent::CatalogLoaded(Err(err)) => {
                error!("failed to load product catalog: {err}");
            }
            BackendEvent::OrderCompleted(result) => {
                if self.step.get() != CheckoutStep::Submitting {
                    warn!("order result arrived with no submission in flight; ignoring");
                    return;
                }
                match result {
                    Ok(success) => self.finish_order(success),
                    Err(err) => self.fail_order(&err),
                }
            }
        }
    }

    fn on_catalog_changed(&self, _event: &AppEvent) {
        let cards = self.state.catalog().iter().map(CardView::catalog).collect();
        self.page.borrow_mut().set_catalog(cards);
    }

    fn on_card_select(&self, event: &AppEvent) {
        let AppEvent::CardSelect(item) = event else {
            return;
        };
        self.page.borrow_mut().save_scroll_position();
        self.state.set_preview(item);
        let card = CardView::preview(item, self.state.is_in_basket(&item.id));
        self.render_modal(ModalContent::Preview(card));
    }

    fn on_card_add(&self, event: &AppEvent) {
        let AppEvent::CardAdd(item) = event else {
            return;
        };
        if !item.is_for_sale() {
            warn!(product = %item.id, "refusing to add a product that is not for sale");
            return;
        }
        if self.state.is_in_basket(&item.id) {
            debug!(product = %item.id, "product already in basket");
            return;
        }
        self.state.add_to_basket(item.clone());
        self.refresh_counter();
        self.close_modal();
    }

    fn on_basket_remove(&self, event: &AppEvent) {
        let AppEvent::BasketRemove(id) = event else {
            return;
        };
        self.state.remove_from_basket(id);
        self.refresh_counter();
        self.basket.borrow_mut().update_basket(&self.state.basket());
    }

    fn on_basket_open(&self, _event: &AppEvent) {
        self.basket.borrow_mut().update_basket(&self.state.basket());
        self.render_modal(ModalContent::Basket);
    }

    fn on_basket_changed(&self, _event: &AppEvent) {
        if self.mounted() != Some(ModalKind::Basket) {
            return;
        }
        self.basket.borrow_mut().update_basket(&self.state.basket());
    }

    fn on_order_open(&self, _event: &AppEvent) {
        if self.submission_in_flight() {
            return;
        }
        if self.state.get_basket_items() == 0 {
            debug!("basket is empty; order form not opened");
            return;
        }
        self.state.clear_order();
        self.order.borrow_mut().reset_form();
        self.step.set(CheckoutStep::EditingOrder);
        // Validation pushes the current errors into the order form.
        self.state.validate_order();
        self.render_modal(ModalContent::Order);
    }

    fn on_order_submit(&self, _event: &AppEvent) {
        if self.submission_in_flight() || !self.state.validate_order() {
            return;
        }
        let order = self.state.prepare_order();
        debug!(total = order.total, items = order.items.len(), "delivery step complete");
        self.contacts.borrow_mut().reset_form();
        self.step.set(CheckoutStep::EditingContacts);
        self.render_modal(ModalContent::Contacts);
    }

    fn on_contacts_submit(&self, _event: &AppEvent) {
        self.submit_order();
    }

    fn on_errors_changed(&self, event: &AppEvent) {
        match event {
            AppEvent::OrderErrorsChanged(errors) => self.update_form_state(FormKind::Order, errors),
            AppEvent::ContactsErrorsChanged(errors) => {
                self.update_form_state(FormKind::Contacts, errors)
            }
            _ => {}
        }
    }

    fn on_form_input(&self, event: &AppEvent) {
        let AppEvent::FormInputChange { form, field, value } = event else {
            return;
        };
        if self.submission_in_flight() {
            return;
        }
        self.form(*form).borrow_mut().set_field(*field, value.clone());
        self.state.set_order_input(*field, value.clone());
    }

    fn on_modal_open(&self, _event: &AppEvent) {
        let mut page = self.page.borrow_mut();
        page.save_scroll_position();
        page.set_locked(true);
    }

    fn on_modal_close(&self, _event: &AppEvent) {
        let mut page = self.page.borrow_mut();
        page.set_locked(false);
        page.restore_scroll_position();
    }

    /// Contact step -> submission. Refuses to start while another submission
    /// is still in flight.
    pub fn submit_order(&self) {
        if self.submission_in_flight() {
            return;
        }
        if !self.state.validate_contact() {
            return;
        }
        let order = self.state.prepare_order();
        self.step.set(CheckoutStep::Submitting);
        info!(total = order.total, items = order.items.len(), "submitting order");
        if let Err(err) = self.dispatch(BackendCommand::SubmitOrder(order)) {
            self.fail_order(&err.to_string());
        }
    }

    /// Checkout stays frozen until the pending order resolves.
    fn submission_in_flight(&self) -> bool {
        let in_flight = self.step.get() == CheckoutStep::Submitting;
        if in_flight {
            debug!("order submission in flight; checkout event ignored");
        }
        in_flight
    }

    fn finish_order(&self, success: OrderSuccess) {
        let charged = self.state.order().total;
        if (success.total - charged).abs() > f64::EPSILON {
            warn!(
                order = %success.id,
                reported = success.total,
                charged,
                "server reported a different total"
            );
        }
        info!(order = %success.id, total = charged, "order placed");

        self.success.borrow_mut().set_total(charged);
        self.step.set(CheckoutStep::Succeeded);
        self.render_modal(ModalContent::Success);

        self.state.clear_all();
        self.basket.borrow_mut().clear_cache();
        self.refresh_counter();
        self.order.borrow_mut().reset_form();
        self.contacts.borrow_mut().reset_form();
        self.events.emit(&AppEvent::BasketChanged);
    }

    fn fail_order(&self, reason: &str) {
        error!("order submission failed: {reason}");
        self.step.set(CheckoutStep::EditingContacts);
        self.contacts.borrow_mut().set_error_text(ORDER_FAILED);
        // The modal may have been closed or swapped while the order was pending.
        if self.mounted() != Some(ModalKind::Contacts) {
            self.render_modal(ModalContent::Contacts);
        }
    }

    fn update_form_state(&self, kind: FormKind, errors: &FormErrors) {
        self.form(kind).borrow_mut().apply_errors(errors);
    }

    fn form(&self, kind: FormKind) -> &RefCell<FormView> {
        match kind {
            FormKind::Order => &self.order,
            FormKind::Contacts => &self.contacts,
        }
    }

    fn refresh_counter(&self) {
        let count = self.state.get_basket_items();
        self.page.borrow_mut().set_counter(count);
    }

    fn render_modal(&self, content: ModalContent) {
        let opened = self.modal.borrow_mut().render(content);
        if opened {
            self.events.emit(&AppEvent::ModalOpen);
        }
    }

    /// User dismissal of the modal. An in-flight submission keeps its step.
    pub fn close_modal(&self) {
        let closed = self.modal.borrow_mut().close();
        if self.step.get() != CheckoutStep::Submitting {
            self.step.set(CheckoutStep::Browsing);
        }
        if closed {
            self.events.emit(&AppEvent::ModalClose);
        }
    }

    pub fn scroll_to(&self, position: usize) {
        self.page.borrow_mut().scroll_to(position);
    }

    /// Resolves a 1-based catalog position to its product.
    pub fn catalog_item(&self, position: usize) -> Option<Product> {
        let catalog = self.state.catalog();
        position
            .checked_sub(1)
            .and_then(|index| catalog.get(index).cloned())
    }

    /// Product currently shown in the preview modal, if the preview is mounted.
    pub fn previewed_item(&self) -> Option<Product> {
        if self.mounted() != Some(ModalKind::Preview) {
            return None;
        }
        self.state
            .preview()
            .and_then(|id| self.state.find_product(&id))
    }

    /// Resolves a 1-based basket row to its product id.
    pub fn basket_item(&self, position: usize) -> Option<ProductId> {
        self.basket
            .borrow()
            .view()
            .row(position)
            .map(|row| row.id.clone())
    }

    pub fn step(&self) -> CheckoutStep {
        self.step.get()
    }

    pub fn mounted(&self) -> Option<ModalKind> {
        self.modal.borrow().mounted()
    }

    pub fn modal_content(&self) -> Option<ModalContent> {
        self.modal.borrow().content().cloned()
    }

    pub fn page(&self) -> PageView {
        self.page.borrow().clone()
    }

    pub fn basket_view(&self) -> BasketView {
        self.basket.borrow().view().clone()
    }

    pub fn order_form(&self) -> FormView {
        self.order.borrow().clone()
    }

    pub fn contacts_form(&self) -> FormView {
        self.contacts.borrow().clone()
    }

    pub fn success_view(&self) -> SuccessView {
        self.success.borrow().clone()
    }

    /// Page followed by the mounted modal, as text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Err(err) = self.render_into(&mut out) {
            warn!("failed to render screen: {err}");
        }
        out
    }

    fn render_into(&self, out: &mut impl fmt::Write) -> fmt::Result {
        write!(out, "{}", self.page.borrow())?;
        let modal = self.modal.borrow();
        let Some(content) = modal.content() else {
            return Ok(());
        };
        write!(out, "\n----------------------------------------\n")?;
        match content {
            ModalContent::Preview(card) => write!(out, "{card}"),
            ModalContent::Basket => write!(out, "{}", self.basket.borrow().view()),
            ModalContent::Order => write!(out, "{}", self.order.borrow()),
            ModalContent::Contacts => write!(out, "{}", self.contacts.borrow()),
            ModalContent::Success => write!(out, "{}", self.success.borrow()),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
