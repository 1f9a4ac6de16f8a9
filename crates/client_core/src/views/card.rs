use std::fmt;

use shared::domain::{Product, ProductId};

use super::format_price;

pub const ADD_TO_BASKET: &str = "Add to basket";
pub const ALREADY_IN_BASKET: &str = "Already in basket";
pub const NOT_FOR_SALE: &str = "Not for sale";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardButton {
    pub label: String,
    pub disabled: bool,
}

/// A product card, either as a catalog tile or as the detail preview.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub image: String,
    pub price: String,
    pub description: Option<String>,
    pub button: Option<CardButton>,
}

impl CardView {
    pub fn catalog(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            price: format_price(product.price),
            description: None,
            button: None,
        }
    }

    /// Products without a price can never be bought; products already in the
    /// basket cannot be added twice.
    pub fn preview(product: &Product, in_basket: bool) -> Self {
        let mut card = Self::catalog(product);
        card.description = Some(product.description.clone());
        card.button = Some(CardButton {
            label: ADD_TO_BASKET.to_string(),
            disabled: false,
        });
        if !product.is_for_sale() {
            card.set_disabled(true);
            card.set_button_text(NOT_FOR_SALE);
        } else if in_basket {
            card.set_disabled(true);
            card.set_button_text(ALREADY_IN_BASKET);
        }
        card
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if let Some(button) = self.button.as_mut() {
            button.disabled = disabled;
        }
    }

    pub fn set_button_text(&mut self, label: &str) {
        if let Some(button) = self.button.as_mut() {
            button.label = label.to_string();
        }
    }

    pub fn can_buy(&self) -> bool {
        self.button.as_ref().is_some_and(|button| !button.disabled)
    }
}

impl fmt::Display for CardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {}", self.category, self.title, self.price)?;
        if let Some(description) = &self.description {
            write!(f, "\n  {description}")?;
            if !self.image.is_empty() {
                write!(f, "\n  image: {}", self.image)?;
            }
        }
        if let Some(button) = &self.button {
            if button.disabled {
                write!(f, "\n  ({})", button.label)?;
            } else {
                write!(f, "\n  <{}>", button.label)?;
            }
        }
        Ok(())
    }
}
