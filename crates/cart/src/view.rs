//! Render model consumed by the presentation layer.
//!
//! The core never touches the screen; it hands the front end a
//! [`CartView`] with pre-formatted strings and per-line identity hints,
//! and the front end (CLI, web page) decides how to paint it.

use crate::cart::CartItem;
use crate::pricing::{Destination, compute_totals};

/// Message shown when the cart has no lines.
pub const EMPTY_CART_MESSAGE: &str = "Cart is empty. Add items from Shop.";

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// The line's add timestamp in epoch milliseconds, the preferred
    /// identity hint for a decrement request.
    pub ts: i64,
    /// The line's position at render time, the fallback identity hint.
    pub index: usize,
    /// Display label, e.g. "Signature Deck × 2 — $20.00".
    pub label: String,
}

/// Cart summary display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    /// "Free" when shipping costs nothing, "$8.00" style otherwise.
    pub shipping: String,
    pub total: String,
    /// Total unit count across all lines.
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self::render(&[], Destination::Unselected, false)
    }

    /// Render the cart with totals for the currently selected
    /// destination and gift wrap flag.
    ///
    /// Uses [`compute_totals`], the same function the checkout payload
    /// is built from, so summary and payload never diverge.
    #[must_use]
    pub fn render(items: &[CartItem], destination: Destination, gift_wrap: bool) -> Self {
        let totals = compute_totals(items, destination, gift_wrap);

        let lines = items
            .iter()
            .enumerate()
            .map(|(index, item)| CartLineView {
                ts: item.added_at.timestamp_millis(),
                index,
                label: format!(
                    "{} × {} — {}",
                    item.name,
                    item.quantity,
                    item.line_total().display()
                ),
            })
            .collect();

        let shipping = if totals.shipping.is_zero() {
            "Free".to_string()
        } else {
            totals.shipping.display()
        };

        Self {
            lines,
            subtotal: totals.subtotal.display(),
            shipping,
            total: totals.total.display(),
            item_count: items.iter().map(|item| item.quantity).sum(),
        }
    }

    /// Whether the view has no lines to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mage_core::Money;

    use super::*;

    #[test]
    fn test_empty_view() {
        let view = CartView::empty();
        assert!(view.is_empty());
        assert_eq!(view.subtotal, "$0.00");
        assert_eq!(view.shipping, "Free");
        assert_eq!(view.total, "$0.00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_line_labels_and_hints() {
        let items = vec![
            CartItem::new("signature", "Signature Deck", Money::from(10), 2),
            CartItem::new("mat", "Roll Mat", Money::from_cents(3550), 1),
        ];
        let view = CartView::render(&items, Destination::Unselected, false);

        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].label, "Signature Deck × 2 — $20.00");
        assert_eq!(view.lines[1].label, "Roll Mat × 1 — $35.50");
        assert_eq!(view.lines[1].index, 1);
        assert_eq!(view.lines[0].ts, items[0].added_at.timestamp_millis());
        assert_eq!(view.item_count, 3);
    }

    #[test]
    fn test_paid_shipping_is_formatted() {
        let items = vec![CartItem::new("signature", "Signature Deck", Money::from(10), 1)];
        let view = CartView::render(&items, Destination::UnitedStates, false);
        assert_eq!(view.shipping, "$8.00");
        assert_eq!(view.total, "$18.00");
    }

    #[test]
    fn test_gift_wrap_in_total() {
        let items = vec![CartItem::new("signature", "Signature Deck", Money::from(10), 1)];
        let view = CartView::render(&items, Destination::Unselected, true);
        assert_eq!(view.total, "$15.00");
    }
}
