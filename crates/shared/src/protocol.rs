use serde::{Deserialize, Serialize};

use crate::domain::{FormField, OrderId, ProductId};

/// Envelope returned by list endpoints such as `GET /product`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiListResponse<T> {
    #[serde(default)]
    pub total: usize,
    pub items: Vec<T>,
}

/// Body of `POST /order`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment: String,
    pub total: f64,
    pub items: Vec<ProductId>,
}

impl OrderPayload {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Address => &self.address,
            FormField::Payment => &self.payment,
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Email => self.email = value,
            FormField::Phone => self.phone = value,
            FormField::Address => self.address = value,
            FormField::Payment => self.payment = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSuccess {
    pub id: OrderId,
    pub total: f64,
}
