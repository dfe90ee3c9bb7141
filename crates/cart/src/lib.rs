//! MAGE cart state and checkout orchestration.
//!
//! This crate owns the persisted shopping cart of the MAGE shop and the
//! checkout handoff to the external payment service. It is deliberately
//! front-end agnostic: the presentation layer (CLI today, anything
//! tomorrow) consumes [`view::CartView`] render models and surfaces the
//! manual-payment fallback when the orchestrator reports one.
//!
//! # Modules
//!
//! - [`store`] - Durable key/value persistence with best-effort semantics
//! - [`cart`] - The cart repository: line items and their mutations
//! - [`pricing`] - Pure subtotal/shipping/total computation
//! - [`checkout`] - Checkout state machine and payment gateway client
//! - [`analytics`] - Fire-and-forget event sink
//! - [`view`] - Render model consumed by the presentation layer
//! - [`config`] - Environment-driven configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use mage_cart::cart::CartRepository;
//! use mage_cart::checkout::{CheckoutOrchestrator, Customer, HttpGateway};
//! use mage_cart::config::CartConfig;
//! use mage_cart::pricing::Destination;
//! use mage_cart::store::CartStore;
//!
//! let config = CartConfig::from_env()?;
//! let mut cart = CartRepository::new(CartStore::file(&config.store_path));
//! cart.add("signature", "Signature Deck", Money::from_cents(1000), 2);
//!
//! let orchestrator = CheckoutOrchestrator::new(HttpGateway::new(&config)?);
//! let outcome = orchestrator
//!     .submit(cart.items(), Destination::from_code("US"), false, customer)
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod pricing;
pub mod store;
pub mod view;
