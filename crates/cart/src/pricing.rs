//! Pure pricing computation: subtotal, tiered shipping, gift wrap.
//!
//! [`compute_totals`] is the single source of truth for both the live
//! cart summary and the checkout payload, so the two can never diverge.
//! It has no side effects and never mutates the cart.

use mage_core::Money;
use rust_decimal::Decimal;

use crate::cart::CartItem;

/// Flat gift wrap fee applied when the shopper ticks the option.
pub const GIFT_WRAP_FEE: Money = Money::new(Decimal::from_parts(5, 0, 0, false, 0));

/// Shipping destination, parsed from the country selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Free shipping at a $75 subtotal, $8 flat below it.
    UnitedStates,
    /// Free shipping at a $100 subtotal, $12 flat below it.
    China,
    /// $15 flat, no free tier.
    International,
    /// No country selected yet; shipping shows as zero.
    Unselected,
}

impl Destination {
    /// Parse a country selector code ("US", "CN", "FR", "").
    ///
    /// Anything non-empty that is not US or CN ships at the
    /// international flat rate.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "" => Self::Unselected,
            "US" => Self::UnitedStates,
            "CN" => Self::China,
            _ => Self::International,
        }
    }

    /// Shipping cost for a given subtotal.
    #[must_use]
    fn shipping_for(self, subtotal: Money) -> Money {
        match self {
            Self::UnitedStates => tiered(subtotal, Money::from(75), Money::from(8)),
            Self::China => tiered(subtotal, Money::from(100), Money::from(12)),
            Self::International => Money::from(15),
            Self::Unselected => Money::zero(),
        }
    }
}

/// Free at or above `threshold`, otherwise `flat`.
fn tiered(subtotal: Money, threshold: Money, flat: Money) -> Money {
    if subtotal >= threshold {
        Money::zero()
    } else {
        flat
    }
}

/// Derived pricing for one (cart, destination, gift wrap) combination.
///
/// Never persisted; recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Money,
    pub shipping: Money,
    pub gift_wrap_fee: Money,
    pub total: Money,
}

/// Compute subtotal, shipping, and total for the given cart.
#[must_use]
pub fn compute_totals(items: &[CartItem], destination: Destination, gift_wrap: bool) -> Totals {
    let subtotal: Money = items.iter().map(CartItem::line_total).sum();
    let shipping = destination.shipping_for(subtotal);
    let gift_wrap_fee = if gift_wrap { GIFT_WRAP_FEE } else { Money::zero() };

    Totals {
        subtotal,
        shipping,
        gift_wrap_fee,
        total: subtotal + shipping + gift_wrap_fee,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(price: Money, quantity: u32) -> CartItem {
        CartItem::new("signature", "Signature Deck", price, quantity)
    }

    fn subtotal_of(amount: i64) -> Vec<CartItem> {
        vec![item(Money::from(amount), 1)]
    }

    #[test]
    fn test_subtotal_sums_price_times_quantity() {
        let items = vec![item(Money::from_cents(1050), 3), item(Money::from(35), 2)];
        let totals = compute_totals(&items, Destination::Unselected, false);
        assert_eq!(totals.subtotal, Money::from_cents(10150));
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let totals = compute_totals(&[], Destination::Unselected, false);
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_us_shipping_below_threshold() {
        let totals = compute_totals(&subtotal_of(50), Destination::UnitedStates, false);
        assert_eq!(totals.shipping, Money::from(8));
    }

    #[test]
    fn test_us_shipping_free_at_threshold() {
        let totals = compute_totals(&subtotal_of(75), Destination::UnitedStates, false);
        assert_eq!(totals.shipping, Money::zero());
    }

    #[test]
    fn test_cn_shipping_below_threshold() {
        let totals = compute_totals(&subtotal_of(99), Destination::China, false);
        assert_eq!(totals.shipping, Money::from(12));
    }

    #[test]
    fn test_cn_shipping_free_at_threshold() {
        let totals = compute_totals(&subtotal_of(100), Destination::China, false);
        assert_eq!(totals.shipping, Money::zero());
    }

    #[test]
    fn test_international_shipping_is_flat() {
        for amount in [1, 75, 500] {
            let totals = compute_totals(&subtotal_of(amount), Destination::International, false);
            assert_eq!(totals.shipping, Money::from(15));
        }
    }

    #[test]
    fn test_unselected_country_ships_free() {
        let totals = compute_totals(&subtotal_of(50), Destination::Unselected, false);
        assert_eq!(totals.shipping, Money::zero());
    }

    #[test]
    fn test_gift_wrap_adds_exactly_five() {
        let items = subtotal_of(50);
        let without = compute_totals(&items, Destination::UnitedStates, false);
        let with = compute_totals(&items, Destination::UnitedStates, true);
        assert_eq!(with.total, without.total + Money::from(5));
        assert_eq!(without.gift_wrap_fee, Money::zero());
    }

    #[test]
    fn test_compute_totals_is_pure() {
        let items = vec![item(Money::from_cents(1999), 2)];
        let before = items.clone();
        let first = compute_totals(&items, Destination::China, true);
        let second = compute_totals(&items, Destination::China, true);
        assert_eq!(first, second);
        assert_eq!(items, before);
    }

    #[test]
    fn test_destination_from_code() {
        assert_eq!(Destination::from_code("US"), Destination::UnitedStates);
        assert_eq!(Destination::from_code("CN"), Destination::China);
        assert_eq!(Destination::from_code("FR"), Destination::International);
        assert_eq!(Destination::from_code(""), Destination::Unselected);
    }
}
