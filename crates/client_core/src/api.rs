//! Remote catalog/order client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::Product,
    error::{ApiError, ApiException},
    protocol::{ApiListResponse, OrderPayload, OrderSuccess},
};
use tracing::{debug, error};

use crate::error::ClientError;

#[async_trait]
pub trait ProductsApi: Send + Sync {
    async fn get_products_list(&self) -> Result<Vec<Product>, ClientError>;
    async fn create_order(&self, order: &OrderPayload) -> Result<OrderSuccess, ClientError>;
}

pub struct HttpProductsApi {
    http: Client,
    base_url: String,
    cdn: String,
}

impl HttpProductsApi {
    pub fn new(base_url: impl Into<String>, cdn: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, cdn)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, cdn: impl Into<String>) -> Self {
        Self {
            http,
            base_url: trim_trailing_slash(base_url.into()),
            cdn: trim_trailing_slash(cdn.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cdn(&self) -> &str {
        &self.cdn
    }

    fn endpoint(&self, uri: &str) -> String {
        format!("{}{uri}", self.base_url)
    }

    fn resolve_image(&self, image: &str) -> String {
        if image.is_empty() || image.contains("://") {
            return image.to_string();
        }
        if image.starts_with('/') {
            format!("{}{image}", self.cdn)
        } else {
            format!("{}/{image}", self.cdn)
        }
    }
}

#[async_trait]
impl ProductsApi for HttpProductsApi {
    async fn get_products_list(&self) -> Result<Vec<Product>, ClientError> {
        let url = self.endpoint("/product");
        let result = async {
            let res = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|source| ClientError::Transport {
                    url: url.clone(),
                    source,
                })?;
            let list: ApiListResponse<Product> = handle_response(&url, res).await?;
            Ok::<_, ClientError>(list.items)
        }
        .await;

        match result {
            Ok(items) => {
                debug!(count = items.len(), "fetched product catalog");
                Ok(items
                    .into_iter()
                    .map(|mut product| {
                        product.image = self.resolve_image(&product.image);
                        product
                    })
                    .collect())
            }
            Err(err) => {
                error!("failed to fetch product catalog: {err}");
                Err(err)
            }
        }
    }

    async fn create_order(&self, order: &OrderPayload) -> Result<OrderSuccess, ClientError> {
        let url = self.endpoint("/order");
        let result = async {
            let res = self
                .http
                .post(&url)
                .json(order)
                .send()
                .await
                .map_err(|source| ClientError::Transport {
                    url: url.clone(),
                    source,
                })?;
            handle_response::<OrderSuccess>(&url, res).await
        }
        .await;

        if let Err(err) = &result {
            error!("failed to create order: {err}");
        }
        result
    }
}

async fn handle_response<T: DeserializeOwned>(url: &str, res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return res.json::<T>().await.map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        });
    }

    let reason = status.canonical_reason().unwrap_or("request failed").to_string();
    let message = match res.json::<ApiError>().await {
        Ok(body) if !body.error.is_empty() => body.error,
        _ => reason,
    };
    Err(ClientError::Api {
        url: url.to_string(),
        source: ApiException::new(status.as_u16(), message),
    })
}

fn trim_trailing_slash(mut value: String) -> String {
    while value.ends_with('/') {
        value.pop();
    }
    value
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
