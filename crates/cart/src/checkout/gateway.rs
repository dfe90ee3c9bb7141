//! Payment gateway client for checkout session creation.
//!
//! The payment provider is an opaque remote procedure: one POST with
//! the cart and customer, one redirect URL back. Everything else
//! (Square credentials, order persistence, PCI surface) lives on the
//! backend side of that call.

use std::sync::Arc;

use mage_core::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartItem;
use crate::config::CartConfig;

/// Path of the checkout endpoint on the payment backend.
const CREATE_CHECKOUT_PATH: &str = "create-checkout";

/// Errors that can occur when creating a checkout session.
///
/// Every variant maps to the same user-facing outcome (the manual
/// payment fallback); the distinctions exist for diagnostics.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The network call itself failed (timeout, DNS, refused).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered outside the success range.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A success response without a usable `checkout_url`.
    #[error("checkout response missing checkout_url")]
    MissingCheckoutUrl,

    /// Failed to parse the response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Customer fields collected by the checkout form.
///
/// Presence is the only thing the core cares about; stricter
/// validation is a front-end concern.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// The checkout request wire payload.
///
/// Lives only for the duration of one attempt and carries a snapshot
/// of the cart taken at submit time; later cart edits do not reach an
/// in-flight request.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub cart: Vec<CartItem>,
    pub shipping: Money,
    pub gift_wrap: bool,
    pub customer: Customer,
}

/// A successfully created checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Where to send the shopper to pay.
    pub checkout_url: String,
}

/// Success response body from the payment backend.
#[derive(Debug, Deserialize)]
struct CheckoutResponse {
    checkout_url: Option<String>,
}

/// Remote procedure that turns a cart into a hosted checkout session.
pub trait CheckoutGateway {
    /// Create a checkout session for `request`.
    fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> impl Future<Output = Result<CheckoutSession, GatewayError>> + Send;
}

/// HTTP implementation of [`CheckoutGateway`] over the payment backend.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    inner: Arc<HttpGatewayInner>,
}

#[derive(Debug)]
struct HttpGatewayInner {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpGateway {
    /// Create a gateway for the configured payment backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the
    /// endpoint URL cannot be derived from the configured base.
    pub fn new(config: &CartConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let endpoint = config
            .checkout_api_url
            .join(CREATE_CHECKOUT_PATH)
            .map_err(|e| GatewayError::Parse(format!("Invalid checkout endpoint: {e}")))?;

        Ok(Self {
            inner: Arc::new(HttpGatewayInner { client, endpoint }),
        })
    }
}

impl CheckoutGateway for HttpGateway {
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CheckoutResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        body.checkout_url
            .filter(|url| !url.is_empty())
            .map(|checkout_url| CheckoutSession { checkout_url })
            .ok_or(GatewayError::MissingCheckoutUrl)
    }
}
