//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `MAGE_CART_PATH` - Durable cart file (default: `mage_cart.json`)
//! - `MAGE_CHECKOUT_API_URL` - Payment backend base URL
//!   (default: `https://mage-payment-backend.onrender.com`)
//! - `MAGE_HTTP_TIMEOUT_SECS` - Checkout request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::store::DEFAULT_STORE_FILE;

/// Default payment backend, the deployed checkout service.
const DEFAULT_CHECKOUT_API_URL: &str = "https://mage-payment-backend.onrender.com";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart and checkout configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Path of the durable cart document
    pub store_path: PathBuf,
    /// Base URL of the payment backend
    pub checkout_api_url: Url,
    /// Timeout applied to the checkout network call
    pub http_timeout: Duration,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// `from_env` passes the process environment; tests pass a map so
    /// overrides can be exercised without mutating global state.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_path = PathBuf::from(get_or_default(&lookup, "MAGE_CART_PATH", DEFAULT_STORE_FILE));

        let checkout_api_url =
            get_or_default(&lookup, "MAGE_CHECKOUT_API_URL", DEFAULT_CHECKOUT_API_URL)
                .parse::<Url>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("MAGE_CHECKOUT_API_URL".to_string(), e.to_string())
                })?;

        let http_timeout = Duration::from_secs(
            get_or_default(
                &lookup,
                "MAGE_HTTP_TIMEOUT_SECS",
                &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
            )
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MAGE_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
        );

        Ok(Self {
            store_path,
            checkout_api_url,
            http_timeout,
        })
    }
}

/// Get a key from the lookup with a default value.
fn get_or_default(lookup: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}
