//! Synchronous, single-threaded publish/subscribe bus for UI and state events.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use shared::domain::{FormField, FormKind, Product, ProductId};
use tracing::trace;

use crate::state::FormErrors;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    CatalogChanged,
    CardSelect(Product),
    CardAdd(Product),
    BasketOpen,
    BasketRemove(ProductId),
    BasketChanged,
    OrderOpen,
    OrderSubmit,
    ContactsSubmit,
    OrderErrorsChanged(FormErrors),
    ContactsErrorsChanged(FormErrors),
    FormInputChange {
        form: FormKind,
        field: FormField,
        value: String,
    },
    ModalOpen,
    ModalClose,
    PreviewChanged(ProductId),
    OrderChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CatalogChanged,
    CardSelect,
    CardAdd,
    BasketOpen,
    BasketRemove,
    BasketChanged,
    OrderOpen,
    OrderSubmit,
    ContactsSubmit,
    OrderErrorsChanged,
    ContactsErrorsChanged,
    FormInputChange,
    ModalOpen,
    ModalClose,
    PreviewChanged,
    OrderChanged,
}

impl AppEvent {
    /// Convenience constructor that derives the owning form from the field.
    pub fn input(field: FormField, value: impl Into<String>) -> Self {
        AppEvent::FormInputChange {
            form: field.owner(),
            field,
            value: value.into(),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            AppEvent::CatalogChanged => EventKind::CatalogChanged,
            AppEvent::CardSelect(_) => EventKind::CardSelect,
            AppEvent::CardAdd(_) => EventKind::CardAdd,
            AppEvent::BasketOpen => EventKind::BasketOpen,
            AppEvent::BasketRemove(_) => EventKind::BasketRemove,
            AppEvent::BasketChanged => EventKind::BasketChanged,
            AppEvent::OrderOpen => EventKind::OrderOpen,
            AppEvent::OrderSubmit => EventKind::OrderSubmit,
            AppEvent::ContactsSubmit => EventKind::ContactsSubmit,
            AppEvent::OrderErrorsChanged(_) => EventKind::OrderErrorsChanged,
            AppEvent::ContactsErrorsChanged(_) => EventKind::ContactsErrorsChanged,
            AppEvent::FormInputChange { .. } => EventKind::FormInputChange,
            AppEvent::ModalOpen => EventKind::ModalOpen,
            AppEvent::ModalClose => EventKind::ModalClose,
            AppEvent::PreviewChanged(_) => EventKind::PreviewChanged,
            AppEvent::OrderChanged => EventKind::OrderChanged,
        }
    }

    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::CatalogChanged => "catalog:change",
            AppEvent::CardSelect(_) => "card:select",
            AppEvent::CardAdd(_) => "card:add",
            AppEvent::BasketOpen => "basket:open",
            AppEvent::BasketRemove(_) => "basket:remove",
            AppEvent::BasketChanged => "basket:change",
            AppEvent::OrderOpen => "order:open",
            AppEvent::OrderSubmit => "order:submit",
            AppEvent::ContactsSubmit => "contacts:submit",
            AppEvent::OrderErrorsChanged(_) => "orderErrors:change",
            AppEvent::ContactsErrorsChanged(_) => "contactsErrors:change",
            AppEvent::FormInputChange {
                form: FormKind::Order,
                ..
            } => "order.field:change",
            AppEvent::FormInputChange {
                form: FormKind::Contacts,
                ..
            } => "contacts.field:change",
            AppEvent::ModalOpen => "modal:open",
            AppEvent::ModalClose => "modal:close",
            AppEvent::PreviewChanged(_) => "preview:change",
            AppEvent::OrderChanged => "order:change",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    Exact(EventKind),
    /// Any field edit on the order or contacts form.
    FormFieldChange,
    All,
}

impl EventFilter {
    pub fn exact(kind: EventKind) -> Self {
        EventFilter::Exact(kind)
    }

    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::Exact(kind) => event.kind() == *kind,
            EventFilter::FormFieldChange => is_form_field_change(event),
            EventFilter::All => true,
        }
    }
}

/// A field edit only counts when the field belongs to the form it was typed into.
fn is_form_field_change(event: &AppEvent) -> bool {
    matches!(
        event,
        AppEvent::FormInputChange { form, field, .. } if field.owner() == *form
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&AppEvent)>;

struct Registration {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    registrations: RefCell<Vec<Registration>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn on(&self, filter: EventFilter, handler: impl Fn(&AppEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.registrations.borrow_mut().push(Registration {
            id,
            filter,
            handler: Rc::new(handler),
        });
        id
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut registrations = self.registrations.borrow_mut();
        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        registrations.len() != before
    }

    /// Runs every matching handler in subscription order before returning.
    ///
    /// The handler list is captured up front, so handlers may subscribe,
    /// unsubscribe or emit again without disturbing the current dispatch.
    pub fn emit(&self, event: &AppEvent) {
        let handlers: Vec<Handler> = self
            .registrations
            .borrow()
            .iter()
            .filter(|registration| registration.filter.matches(event))
            .map(|registration| Rc::clone(&registration.handler))
            .collect();

        trace!(event = event.name(), handlers = handlers.len(), "emit");
        for handler in handlers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registrations.borrow().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/bus_tests.rs"]
mod tests;
