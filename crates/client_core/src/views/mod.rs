//! View components: render slices of application state into text surfaces.

pub mod basket;
pub mod card;
pub mod form;
pub mod modal;
pub mod page;
pub mod success;

pub use basket::{BasketManager, BasketRow, BasketView};
pub use card::{CardButton, CardView};
pub use form::FormView;
pub use modal::{ModalContent, ModalHost, ModalKind};
pub use page::PageView;
pub use success::SuccessView;

pub const CURRENCY: &str = "synapses";
pub const PRICELESS: &str = "Priceless";

pub fn format_amount(amount: f64) -> String {
    format!("{amount} {CURRENCY}")
}

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(price) => format_amount(price),
        None => PRICELESS.to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/views_tests.rs"]
mod tests;
