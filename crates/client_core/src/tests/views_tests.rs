use super::*;
use crate::state::{FormErrors, ADDRESS_REQUIRED, PAYMENT_REQUIRED};
use shared::domain::{FormField, FormKind, Product, ProductId};

fn product(id: &str, price: Option<f64>) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("item {id}"),
        description: format!("about {id}"),
        image: format!("https://cdn.test/{id}.svg"),
        category: "soft".into(),
        price,
        selected: false,
    }
}

#[test]
fn price_labels() {
    assert_eq!(format_price(Some(750.0)), "750 synapses");
    assert_eq!(format_price(None), PRICELESS);
}

#[test]
fn preview_card_disables_purchase_when_already_in_basket() {
    let card = CardView::preview(&product("a", Some(10.0)), true);
    let button = card.button.as_ref().expect("preview has a button");
    assert!(button.disabled);
    assert_eq!(button.label, card::ALREADY_IN_BASKET);
    assert!(!card.can_buy());
}

#[test]
fn preview_card_disables_purchase_for_null_price() {
    let card = CardView::preview(&product("a", None), false);
    let button = card.button.as_ref().expect("preview has a button");
    assert!(button.disabled);
    assert_eq!(button.label, card::NOT_FOR_SALE);
    assert_eq!(card.price, PRICELESS);
}

#[test]
fn preview_card_for_sale_is_buyable() {
    let card = CardView::preview(&product("a", Some(10.0)), false);
    assert!(card.can_buy());
    assert_eq!(card.description.as_deref(), Some("about a"));
    assert!(card.to_string().contains("<Add to basket>"));
}

#[test]
fn catalog_card_has_no_button() {
    let card = CardView::catalog(&product("a", Some(10.0)));
    assert!(card.button.is_none());
    assert_eq!(card.to_string(), "[soft] item a - 10 synapses");
}

#[test]
fn basket_manager_skips_unchanged_render_until_cache_cleared() {
    let mut manager = BasketManager::new();
    let items = vec![product("a", Some(10.0)), product("b", None)];

    assert!(manager.update_basket(&items));
    assert!(!manager.update_basket(&items));
    manager.clear_cache();
    assert!(manager.update_basket(&items));

    let view = manager.view();
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[1].index, 2);
    assert_eq!(view.rows[1].price, PRICELESS);
    assert_eq!(view.total, 10.0);
    assert!(!view.checkout_disabled);
    assert_eq!(view.row(1).map(|row| row.id.clone()), Some(ProductId::new("a")));
}

#[test]
fn empty_basket_disables_checkout() {
    let manager = BasketManager::new();
    assert!(manager.view().checkout_disabled);
    assert!(manager.view().to_string().contains(basket::EMPTY_BASKET));
}

#[test]
fn form_view_applies_and_resets_errors() {
    let mut form = FormView::new(FormKind::Order);
    let mut errors = FormErrors::new();
    errors.insert(FormField::Address, ADDRESS_REQUIRED);
    errors.insert(FormField::Payment, PAYMENT_REQUIRED);

    form.set_field(FormField::Address, "Main st");
    form.set_field(FormField::Email, "ignored@b.c");
    form.apply_errors(&errors);
    assert!(!form.valid());
    assert_eq!(form.errors(), format!("{PAYMENT_REQUIRED}; {ADDRESS_REQUIRED}"));
    assert_eq!(form.value(FormField::Address), "Main st");
    assert_eq!(form.value(FormField::Email), "");

    form.apply_errors(&FormErrors::new());
    assert!(form.valid());
    assert_eq!(form.errors(), "");

    form.reset_form();
    assert_eq!(form.value(FormField::Address), "");
    assert!(!form.valid());
}

#[test]
fn modal_host_reports_open_and_close_transitions() {
    let mut modal = ModalHost::default();
    assert!(modal.render(ModalContent::Basket));
    assert!(!modal.render(ModalContent::Order));
    assert_eq!(modal.mounted(), Some(ModalKind::Order));
    assert!(modal.close());
    assert!(!modal.close());
    assert!(!modal.is_open());
}

#[test]
fn page_scroll_is_frozen_while_locked() {
    let mut page = PageView::default();
    page.set_catalog((0..5).map(|i| CardView::catalog(&product(&i.to_string(), Some(1.0)))).collect());
    page.scroll_to(3);
    page.save_scroll_position();
    page.set_locked(true);
    page.scroll_to(0);
    assert_eq!(page.scroll_position, 3);

    page.set_locked(false);
    page.scroll_to(0);
    page.restore_scroll_position();
    assert_eq!(page.scroll_position, 3);
}

#[test]
fn success_view_describes_charged_total() {
    let mut success = SuccessView::default();
    success.set_total(30.0);
    assert_eq!(success.description(), "Charged 30 synapses");
}
