//! Core types for the MAGE shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod money;

pub use money::{CurrencyCode, Money};
