use std::fmt;

use shared::domain::{Product, ProductId};
use tracing::trace;

use super::{format_amount, format_price};

pub const EMPTY_BASKET: &str = "Basket is empty";

#[derive(Debug, Clone, PartialEq)]
pub struct BasketRow {
    pub index: usize,
    pub id: ProductId,
    pub title: String,
    pub price: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasketView {
    pub rows: Vec<BasketRow>,
    pub total: f64,
    pub checkout_disabled: bool,
}

impl BasketView {
    fn render(items: &[Product]) -> Self {
        let rows = items
            .iter()
            .enumerate()
            .map(|(position, item)| BasketRow {
                index: position + 1,
                id: item.id.clone(),
                title: item.title.clone(),
                price: format_price(item.price),
            })
            .collect();
        Self {
            rows,
            total: items.iter().map(Product::price_or_zero).sum(),
            checkout_disabled: items.is_empty(),
        }
    }

    pub fn row(&self, index: usize) -> Option<&BasketRow> {
        self.rows.iter().find(|row| row.index == index)
    }
}

impl fmt::Display for BasketView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Basket")?;
        if self.rows.is_empty() {
            writeln!(f, "  {EMPTY_BASKET}")?;
        }
        for row in &self.rows {
            writeln!(f, "  {}. {} - {}", row.index, row.title, row.price)?;
        }
        write!(f, "  Total: {}", format_amount(self.total))?;
        if self.checkout_disabled {
            write!(f, "\n  (Checkout)")
        } else {
            write!(f, "\n  <Checkout>")
        }
    }
}

/// Keeps the basket view in sync with the basket, skipping the re-render
/// when the id sequence has not changed since the last one.
#[derive(Debug)]
pub struct BasketManager {
    view: BasketView,
    rendered_ids: Option<Vec<ProductId>>,
}

impl BasketManager {
    pub fn new() -> Self {
        Self {
            view: BasketView::render(&[]),
            rendered_ids: None,
        }
    }

    /// Returns whether the view was re-rendered.
    pub fn update_basket(&mut self, items: &[Product]) -> bool {
        let ids: Vec<ProductId> = items.iter().map(|item| item.id.clone()).collect();
        if self.rendered_ids.as_ref() == Some(&ids) {
            trace!(items = ids.len(), "basket unchanged, skipping render");
            return false;
        }
        self.view = BasketView::render(items);
        self.rendered_ids = Some(ids);
        true
    }

    pub fn clear_cache(&mut self) {
        self.rendered_ids = None;
    }

    pub fn view(&self) -> &BasketView {
        &self.view
    }
}

impl Default for BasketManager {
    fn default() -> Self {
        Self::new()
    }
}
