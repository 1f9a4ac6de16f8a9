//! Application state: the single source of truth for catalog, basket and checkout data.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    rc::Rc,
};

use shared::{
    domain::{FormField, FormKind, Product, ProductId},
    protocol::OrderPayload,
};

use crate::bus::{AppEvent, EventBus};

pub const ADDRESS_REQUIRED: &str = "Address is required";
pub const PAYMENT_REQUIRED: &str = "Choose a payment method";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const PHONE_REQUIRED: &str = "Phone is required";

/// Field-to-message map produced by the most recent validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<FormField, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    /// Non-empty messages joined for inline display.
    pub fn messages(&self) -> String {
        self.0
            .values()
            .filter(|message| !message.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Default)]
struct StateData {
    catalog: Vec<Product>,
    basket: Vec<Product>,
    preview: Option<ProductId>,
    order: OrderPayload,
    form_errors: FormErrors,
}

/// Every mutator finishes its update and releases the borrow before it emits,
/// so handlers are free to read the state back.
pub struct AppState {
    data: RefCell<StateData>,
    events: Rc<EventBus>,
}

impl AppState {
    pub fn new(events: Rc<EventBus>) -> Rc<Self> {
        Rc::new(Self {
            data: RefCell::new(StateData::default()),
            events,
        })
    }

    pub fn catalog(&self) -> Vec<Product> {
        self.data.borrow().catalog.clone()
    }

    pub fn find_product(&self, id: &ProductId) -> Option<Product> {
        self.data
            .borrow()
            .catalog
            .iter()
            .find(|product| &product.id == id)
            .cloned()
    }

    pub fn basket(&self) -> Vec<Product> {
        self.data.borrow().basket.clone()
    }

    pub fn is_in_basket(&self, id: &ProductId) -> bool {
        self.data.borrow().basket.iter().any(|item| &item.id == id)
    }

    pub fn get_basket_items(&self) -> usize {
        self.data.borrow().basket.len()
    }

    pub fn preview(&self) -> Option<ProductId> {
        self.data.borrow().preview.clone()
    }

    pub fn order(&self) -> OrderPayload {
        self.data.borrow().order.clone()
    }

    pub fn form_errors(&self) -> FormErrors {
        self.data.borrow().form_errors.clone()
    }

    pub fn set_catalog(&self, items: Vec<Product>) {
        self.data.borrow_mut().catalog = items;
        self.events.emit(&AppEvent::CatalogChanged);
    }

    pub fn set_preview(&self, item: &Product) {
        self.data.borrow_mut().preview = Some(item.id.clone());
        self.events.emit(&AppEvent::PreviewChanged(item.id.clone()));
    }

    /// Appends unconditionally; duplicate checks belong to the caller.
    pub fn add_to_basket(&self, item: Product) {
        self.data.borrow_mut().basket.push(item);
        self.events.emit(&AppEvent::BasketChanged);
    }

    pub fn remove_from_basket(&self, id: &ProductId) {
        self.data.borrow_mut().basket.retain(|item| &item.id != id);
        self.events.emit(&AppEvent::BasketChanged);
    }

    pub fn clear_basket(&self) {
        self.data.borrow_mut().basket.clear();
        self.events.emit(&AppEvent::BasketChanged);
    }

    pub fn clear_order(&self) {
        {
            let mut data = self.data.borrow_mut();
            data.order = OrderPayload::default();
            data.form_errors = FormErrors::default();
        }
        self.events.emit(&AppEvent::OrderChanged);
    }

    pub fn clear_all(&self) {
        self.clear_basket();
        self.clear_order();
    }

    pub fn get_total_price(&self) -> f64 {
        self.data
            .borrow()
            .basket
            .iter()
            .map(Product::price_or_zero)
            .sum()
    }

    /// Stamps basket ids and the current total onto the order and returns a copy.
    pub fn prepare_order(&self) -> OrderPayload {
        let total = self.get_total_price();
        let order = {
            let mut data = self.data.borrow_mut();
            data.order.items = data.basket.iter().map(|item| item.id.clone()).collect();
            data.order.total = total;
            data.order.clone()
        };
        self.events.emit(&AppEvent::OrderChanged);
        order
    }

    pub fn validate_order(&self) -> bool {
        self.validate(FormKind::Order)
    }

    pub fn validate_contact(&self) -> bool {
        self.validate(FormKind::Contacts)
    }

    /// Assigns the field, then re-validates the whole form that owns it.
    pub fn set_order_input(&self, field: FormField, value: impl Into<String>) {
        self.data.borrow_mut().order.set_field(field, value);
        match field.owner() {
            FormKind::Contacts => self.validate_contact(),
            FormKind::Order => self.validate_order(),
        };
    }

    fn validate(&self, kind: FormKind) -> bool {
        let errors = {
            let mut data = self.data.borrow_mut();
            let errors = form_errors_for(kind, &data.order);
            data.form_errors = errors.clone();
            errors
        };
        let valid = errors.is_empty();
        let event = match kind {
            FormKind::Order => AppEvent::OrderErrorsChanged(errors),
            FormKind::Contacts => AppEvent::ContactsErrorsChanged(errors),
        };
        self.events.emit(&event);
        valid
    }
}

fn form_errors_for(kind: FormKind, order: &OrderPayload) -> FormErrors {
    let mut errors = FormErrors::new();
    for &field in kind.fields() {
        if order.field(field).is_empty() {
            errors.insert(field, required_message(field));
        }
    }
    errors
}

fn required_message(field: FormField) -> &'static str {
    match field {
        FormField::Address => ADDRESS_REQUIRED,
        FormField::Payment => PAYMENT_REQUIRED,
        FormField::Email => EMAIL_REQUIRED,
        FormField::Phone => PHONE_REQUIRED,
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
