use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(ProductId);
id_newtype!(OrderId);

pub const PAYMENT_CARD: &str = "card";
pub const PAYMENT_CASH: &str = "cash";

/// A catalog entry. `price == None` marks a product that is not for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub selected: bool,
}

impl Product {
    pub fn is_for_sale(&self) -> bool {
        self.price.is_some()
    }

    pub fn price_or_zero(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Order,
    Contacts,
}

impl FormKind {
    pub fn fields(self) -> &'static [FormField] {
        match self {
            FormKind::Order => &[FormField::Address, FormField::Payment],
            FormKind::Contacts => &[FormField::Email, FormField::Phone],
        }
    }
}

/// Editable checkout fields. Ordering follows the on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Payment,
    Address,
    Email,
    Phone,
}

impl FormField {
    pub fn owner(self) -> FormKind {
        match self {
            FormField::Email | FormField::Phone => FormKind::Contacts,
            FormField::Address | FormField::Payment => FormKind::Order,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormField::Payment => "payment",
            FormField::Address => "address",
            FormField::Email => "email",
            FormField::Phone => "phone",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
