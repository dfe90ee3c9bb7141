//! MAGE Core - Shared types library.
//!
//! This crate provides common types used across the MAGE shop components:
//! - `cart` - Cart state, pricing, and checkout orchestration library
//! - `cli` - Command-line front end driving the cart library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Money and currency types for decimal-safe pricing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
