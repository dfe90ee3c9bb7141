//! The cart repository: line items and their mutations.
//!
//! The repository owns the in-memory cart and keeps the durable copy in
//! sync by writing through the [`CartStore`] on every mutation. Line
//! items are never merged by SKU: two adds of the same product create
//! two entries, matching how the shop's order modal behaves.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mage_core::Money;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsSink, NoopSink};
use crate::store::CartStore;

/// One line item: a SKU with an add-time snapshot of name and price.
///
/// Serializes to the durable `{sku, name, price, qty, ts}` shape, with
/// `ts` as epoch milliseconds and `price` as a plain JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier. Non-empty; enforced by [`CartRepository::add`].
    pub sku: String,
    /// Display label captured at add time, never re-fetched.
    pub name: String,
    /// Unit price captured at add time, immutable thereafter.
    pub price: Money,
    /// Always at least 1; a decrement below 1 removes the item instead.
    #[serde(rename = "qty")]
    pub quantity: u32,
    /// Add timestamp, strictly increasing within a cart. Doubles as the
    /// preferred identity hint for UI-driven removal.
    #[serde(rename = "ts", with = "chrono::serde::ts_milliseconds")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Create a line item stamped with the current time.
    #[must_use]
    pub fn new(sku: impl Into<String>, name: impl Into<String>, price: Money, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            price,
            quantity: quantity.max(1),
            added_at: Utc::now(),
        }
    }

    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// Identity of a cart line as supplied by the presentation layer.
///
/// Resolution prefers the `ts` timestamp and falls back to the
/// positional index the caller rendered. The fallback can resolve to
/// the wrong line when the displayed list reordered since render; this
/// is a known limitation of the hint scheme, not a guarantee.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRef {
    /// The line's `added_at` timestamp, if the caller still has it.
    pub ts: Option<DateTime<Utc>>,
    /// The line's position at render time.
    pub index: Option<usize>,
}

impl LineRef {
    /// Reference a line by its add timestamp.
    #[must_use]
    pub const fn by_ts(ts: DateTime<Utc>) -> Self {
        Self {
            ts: Some(ts),
            index: None,
        }
    }

    /// Reference a line by its rendered position.
    #[must_use]
    pub const fn by_index(index: usize) -> Self {
        Self {
            ts: None,
            index: Some(index),
        }
    }
}

/// Observer notified after every persisted mutation.
///
/// The presentation layer uses this to re-render the cart summary; the
/// notification is a post-condition of every mutation, not of a
/// successful persist (persistence is best-effort).
pub trait CartListener {
    /// Called with the full cart after each mutation.
    fn cart_changed(&self, items: &[CartItem]);
}

/// Listener that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl CartListener for NoopListener {
    fn cart_changed(&self, _items: &[CartItem]) {}
}

/// Owns the cart: loads it from the store on construction and writes
/// through on every mutation.
pub struct CartRepository {
    store: CartStore,
    items: Vec<CartItem>,
    listener: Box<dyn CartListener + Send + Sync>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl CartRepository {
    /// Create a repository over `store`, loading any persisted cart.
    ///
    /// A missing or corrupt durable copy yields an empty cart.
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        let items = store.load();
        Self {
            store,
            items,
            listener: Box::new(NoopListener),
            analytics: Arc::new(NoopSink),
        }
    }

    /// Attach a mutation listener (replaces the no-op default).
    #[must_use]
    pub fn with_listener(mut self, listener: Box<dyn CartListener + Send + Sync>) -> Self {
        self.listener = listener;
        self
    }

    /// Attach an analytics sink (replaces the no-op default).
    #[must_use]
    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    /// The cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a new line item.
    ///
    /// Always creates a new entry, even for a SKU already in the cart.
    /// Quantity is floored at 1. An empty `sku` or `name` is a silent
    /// no-op: the add modal should not have allowed the submit, and the
    /// cart must not accumulate unidentifiable lines.
    pub fn add(&mut self, sku: &str, name: &str, price: Money, quantity: u32) {
        if sku.is_empty() || name.is_empty() {
            tracing::debug!(sku, name, "Ignoring add with missing sku or name");
            return;
        }

        let mut item = CartItem::new(sku, name, price, quantity);
        // Keep add timestamps strictly increasing so they stay usable
        // as identity hints even for rapid successive adds.
        if let Some(last) = self.items.last()
            && item.added_at <= last.added_at
        {
            item.added_at = last.added_at + Duration::milliseconds(1);
        }

        let quantity = item.quantity;
        self.items.push(item);
        self.persist_and_notify();
        self.analytics.track(
            "add_to_cart",
            &[("sku", sku.to_string()), ("quantity", quantity.to_string())],
        );
    }

    /// Decrement a line's quantity, removing the line at quantity 1.
    ///
    /// The line is resolved from `line` per [`LineRef`] semantics; an
    /// unresolvable reference is a no-op. No zero-quantity line ever
    /// persists.
    pub fn decrement_or_remove(&mut self, line: LineRef) {
        let Some(idx) = self.resolve(line) else {
            tracing::debug!(?line, "Ignoring decrement for unresolvable line");
            return;
        };

        let Some(item) = self.items.get_mut(idx) else {
            return;
        };
        let sku = item.sku.clone();
        if item.quantity > 1 {
            item.quantity -= 1;
        } else {
            self.items.remove(idx);
        }

        self.persist_and_notify();
        self.analytics.track("cart_decrease", &[("sku", sku)]);
    }

    /// Resolve a line reference to a current index.
    fn resolve(&self, line: LineRef) -> Option<usize> {
        if let Some(ts) = line.ts
            && let Some(idx) = self.items.iter().position(|item| item.added_at == ts)
        {
            return Some(idx);
        }
        line.index.filter(|&idx| idx < self.items.len())
    }

    /// Write-through persist followed by the re-render notification.
    fn persist_and_notify(&self) {
        self.store.save(&self.items);
        self.listener.cart_changed(&self.items);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::store::{MemoryBackend, StoreBackend};

    fn repo() -> CartRepository {
        CartRepository::new(CartStore::in_memory())
    }

    #[test]
    fn test_add_appends_without_merging() {
        let mut cart = repo();
        cart.add("signature", "Signature Deck", Money::from(10), 1);
        cart.add("signature", "Signature Deck", Money::from(10), 2);
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.items()[1].quantity, 2);
    }

    #[test]
    fn test_add_missing_sku_or_name_is_noop() {
        let mut cart = repo();
        cart.add("", "Signature Deck", Money::from(10), 1);
        cart.add("signature", "", Money::from(10), 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_floors_quantity_at_one() {
        let mut cart = repo();
        cart.add("signature", "Signature Deck", Money::from(10), 0);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_add_timestamps_strictly_increase() {
        let mut cart = repo();
        for _ in 0..5 {
            cart.add("signature", "Signature Deck", Money::from(10), 1);
        }
        let stamps: Vec<_> = cart.items().iter().map(|i| i.added_at).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_decrement_above_one_keeps_line() {
        let mut cart = repo();
        cart.add("signature", "Signature Deck", Money::from(10), 3);
        let ts = cart.items()[0].added_at;
        cart.decrement_or_remove(LineRef::by_ts(ts));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_decrement_at_one_removes_line() {
        let mut cart = repo();
        cart.add("signature", "Signature Deck", Money::from(10), 1);
        cart.add("mat", "Roll Mat", Money::from(35), 1);
        let ts = cart.items()[0].added_at;
        cart.decrement_or_remove(LineRef::by_ts(ts));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].sku, "mat");
    }

    #[test]
    fn test_add_then_decrement_n_times_round_trips_to_empty() {
        let mut cart = repo();
        cart.add("signature", "Signature Deck", Money::from(10), 4);
        for _ in 0..4 {
            cart.decrement_or_remove(LineRef::by_index(0));
        }
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_falls_back_to_index() {
        let mut cart = repo();
        cart.add("signature", "Signature Deck", Money::from(10), 1);
        cart.add("mat", "Roll Mat", Money::from(35), 1);
        // Stale timestamp from a re-rendered page: falls back to index.
        let stale = Utc::now() + Duration::days(1);
        cart.decrement_or_remove(LineRef {
            ts: Some(stale),
            index: Some(1),
        });
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].sku, "signature");
    }

    #[test]
    fn test_decrement_unresolvable_is_noop() {
        let mut cart = repo();
        cart.add("signature", "Signature Deck", Money::from(10), 2);
        cart.decrement_or_remove(LineRef::by_index(7));
        cart.decrement_or_remove(LineRef::default());
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_mutations_write_through() {
        let mut cart = repo();
        cart.add("signature", "Signature Deck", Money::from(10), 1);
        let persisted = cart.store.load();
        assert_eq!(persisted, cart.items());
    }

    #[test]
    fn test_listener_notified_on_every_mutation() {
        #[derive(Default)]
        struct CountingListener(Mutex<usize>);
        impl CartListener for &CountingListener {
            fn cart_changed(&self, _items: &[CartItem]) {
                *self.0.lock().unwrap() += 1;
            }
        }

        static LISTENER: CountingListener = CountingListener(Mutex::new(0));
        let mut cart = repo().with_listener(Box::new(&LISTENER));
        cart.add("signature", "Signature Deck", Money::from(10), 2);
        cart.decrement_or_remove(LineRef::by_index(0));
        assert_eq!(*LISTENER.0.lock().unwrap(), 2);
    }

    #[test]
    fn test_new_loads_persisted_cart() {
        let payload = r#"[{"sku":"mat","name":"Roll Mat","price":35,"qty":2,"ts":1700000000000}]"#;
        let store = CartStore::new(Box::new(MemoryBackend::seeded(payload)));
        let cart = CartRepository::new(store);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_broken_store_still_mutates_in_memory() {
        struct BrokenBackend;
        impl StoreBackend for BrokenBackend {
            fn read(&self) -> std::io::Result<Option<String>> {
                Err(std::io::Error::other("storage disabled"))
            }
            fn write(&self, _payload: &str) -> std::io::Result<()> {
                Err(std::io::Error::other("quota exceeded"))
            }
        }

        let mut cart = CartRepository::new(CartStore::new(Box::new(BrokenBackend)));
        cart.add("signature", "Signature Deck", Money::from(10), 1);
        assert_eq!(cart.items().len(), 1);
    }
}
