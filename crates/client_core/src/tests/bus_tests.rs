use super::*;
use shared::domain::{FormField, FormKind};

fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn(&AppEvent)>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let make = move |tag: &str| -> Box<dyn Fn(&AppEvent)> {
        let sink = Rc::clone(&sink);
        let tag = tag.to_string();
        Box::new(move |event: &AppEvent| {
            sink.borrow_mut().push(format!("{tag}:{}", event.name()));
        })
    };
    (log, make)
}

#[test]
fn exact_subscription_fires_only_for_its_kind() {
    let bus = EventBus::new();
    let (log, make) = recorder();
    bus.on(EventFilter::exact(EventKind::BasketOpen), make("basket"));

    bus.emit(&AppEvent::OrderOpen);
    bus.emit(&AppEvent::BasketOpen);

    assert_eq!(*log.borrow(), vec!["basket:basket:open".to_string()]);
}

#[test]
fn handlers_run_in_subscription_order() {
    let bus = EventBus::new();
    let (log, make) = recorder();
    bus.on(EventFilter::All, make("first"));
    bus.on(EventFilter::exact(EventKind::ModalOpen), make("second"));
    bus.on(EventFilter::All, make("third"));

    bus.emit(&AppEvent::ModalOpen);

    assert_eq!(
        *log.borrow(),
        vec![
            "first:modal:open".to_string(),
            "second:modal:open".to_string(),
            "third:modal:open".to_string(),
        ]
    );
}

#[test]
fn form_field_pattern_matches_order_and_contacts_edits() {
    let filter = EventFilter::FormFieldChange;
    assert!(filter.matches(&AppEvent::input(FormField::Address, "Main st")));
    assert!(filter.matches(&AppEvent::input(FormField::Payment, "card")));
    assert!(filter.matches(&AppEvent::input(FormField::Email, "a@b.c")));
    assert!(filter.matches(&AppEvent::input(FormField::Phone, "+1")));
    assert!(!filter.matches(&AppEvent::OrderSubmit));
    assert!(!filter.matches(&AppEvent::ContactsErrorsChanged(FormErrors::default())));
}

#[test]
fn form_field_pattern_rejects_field_typed_into_foreign_form() {
    let event = AppEvent::FormInputChange {
        form: FormKind::Order,
        field: FormField::Email,
        value: "a@b.c".to_string(),
    };
    assert!(!EventFilter::FormFieldChange.matches(&event));
    assert!(EventFilter::exact(EventKind::FormInputChange).matches(&event));
}

#[test]
fn off_removes_only_the_given_subscription() {
    let bus = EventBus::new();
    let (log, make) = recorder();
    let first = bus.on(EventFilter::All, make("first"));
    bus.on(EventFilter::All, make("second"));

    assert!(bus.off(first));
    assert!(!bus.off(first));
    bus.emit(&AppEvent::BasketChanged);

    assert_eq!(*log.borrow(), vec!["second:basket:change".to_string()]);
    assert_eq!(bus.subscriber_count(), 1);
}

#[test]
fn reentrant_emit_completes_nested_dispatch_before_returning() {
    let bus = EventBus::new();
    let (log, make) = recorder();

    let inner_bus = Rc::downgrade(&bus);
    bus.on(EventFilter::exact(EventKind::CardAdd), move |_| {
        if let Some(bus) = inner_bus.upgrade() {
            bus.emit(&AppEvent::BasketChanged);
        }
    });
    bus.on(EventFilter::All, make("all"));

    bus.emit(&AppEvent::CardAdd(Product {
        id: ProductId::new("a"),
        title: "Pen".into(),
        description: String::new(),
        image: String::new(),
        category: "soft".into(),
        price: Some(10.0),
        selected: false,
    }));

    assert_eq!(
        *log.borrow(),
        vec!["all:basket:change".to_string(), "all:card:add".to_string()]
    );
}

#[test]
fn subscriptions_added_during_emit_wait_for_the_next_emit() {
    let bus = EventBus::new();
    let (log, make) = recorder();
    let late = Rc::new(RefCell::new(Some(make("late"))));

    let weak_bus = Rc::downgrade(&bus);
    let pending = Rc::clone(&late);
    bus.on(EventFilter::exact(EventKind::OrderOpen), move |_| {
        if let (Some(bus), Some(handler)) = (weak_bus.upgrade(), pending.borrow_mut().take()) {
            bus.on(EventFilter::All, handler);
        }
    });

    bus.emit(&AppEvent::OrderOpen);
    assert!(log.borrow().is_empty());

    bus.emit(&AppEvent::OrderOpen);
    assert_eq!(*log.borrow(), vec!["late:order:open".to_string()]);
}

#[test]
fn unsubscribing_during_emit_does_not_skip_snapshotted_handlers() {
    let bus = EventBus::new();
    let (log, make) = recorder();

    let weak_bus = Rc::downgrade(&bus);
    let victim = Rc::new(Cell::new(None::<SubscriptionId>));
    let target = Rc::clone(&victim);
    bus.on(EventFilter::All, move |_| {
        if let (Some(bus), Some(id)) = (weak_bus.upgrade(), target.take()) {
            bus.off(id);
        }
    });
    victim.set(Some(bus.on(EventFilter::All, make("victim"))));

    bus.emit(&AppEvent::ModalClose);
    bus.emit(&AppEvent::ModalClose);

    assert_eq!(*log.borrow(), vec!["victim:modal:close".to_string()]);
}
