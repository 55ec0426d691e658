pub mod view;

use std::time::Duration;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::Product;

/// Deadline applied to every request; a hung server fails the call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The token was missing, expired, or not issued for this API.
    #[error("not authorized: obtain a fresh token and retry")]
    Unauthorized,

    #[error("server rejected the request ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

/// Fields submitted when creating a product. The server assigns the id.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
}

/// HTTP client for the catalog API. Attaches the bearer token to every
/// request; obtaining the token from the identity provider is the
/// caller's business.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let response = self
            .http
            .get(self.url("/products"))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// Create a product and return the id the server assigned it.
    pub async fn create(&self, product: &NewProduct) -> Result<Uuid, ClientError> {
        let response = self
            .http
            .post(self.url("/products"))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.token)
            .json(product)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    /// PUT the full product state; the server replaces all fields
    /// wholesale.
    pub async fn update(&self, product: &Product) -> Result<(), ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/products/{}", product.id)))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.token)
            .json(product)
            .send()
            .await?;
        Self::checked(response).await.map(|_| ())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/products/{id}")))
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::checked(response).await.map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map non-success responses onto the client error taxonomy, pulling
    /// the message out of the server's JSON error body when there is one.
    async fn checked(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| status.to_string());
        Err(ClientError::Api { status, message })
    }
}
