//! # Pricing
//!
//! Order total computation.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   subtotal      = Σ unit_price × quantity          (exact, cents)       │
//! │   tax_amount    = subtotal × TAX_RATE              (exact, 1/10⁴ cent)  │
//! │   shipping_cost = rates[tier]  or 0 if no tier     (exact, cents)       │
//! │   grand_total   = subtotal + tax_amount + shipping (exact, 1/10⁴ cent)  │
//! │                                                                         │
//! │   Rounding to 2 decimals happens only in the *_display() accessors.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Example: Rs.10.00 × 2 + Rs.5.50 × 1, standard shipping
//! → 25.50 + 0.20 + 350.00 = **375.70**.

use serde::{Deserialize, Serialize};

use crate::money::{Money, PreciseMoney};
use crate::types::{LineItem, OrderTotals, ShippingRates, ShippingTier, TaxRate};

// =============================================================================
// Constants
// =============================================================================

/// The storefront's tax rate: 80 bps (0.008).
///
/// The cart summary and the checkout page both charge 0.008. A 0.001 rate
/// appears only in a disabled checkout code path and is not used.
pub const TAX_RATE: TaxRate = TaxRate::from_bps(80);

/// Shipping cost per tier, as advertised on the checkout form.
pub const DEFAULT_SHIPPING_RATES: ShippingRates = ShippingRates {
    standard: Money::from_cents(35_000),
    express: Money::from_cents(15_000),
    overnight: Money::from_cents(50_000),
};

// =============================================================================
// Pricing Policy
// =============================================================================

/// Tax rate and shipping table applied to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    pub tax_rate: TaxRate,
    pub shipping: ShippingRates,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            tax_rate: TAX_RATE,
            shipping: DEFAULT_SHIPPING_RATES,
        }
    }
}

impl PricingPolicy {
    /// Shipping cost for a selection; no selection ships for free.
    pub fn shipping_cost(&self, tier: Option<ShippingTier>) -> Money {
        tier.map(|t| self.shipping.cost(t)).unwrap_or_default()
    }

    /// Computes totals for `items` and an optional shipping tier.
    ///
    /// Deterministic, order-independent and infallible: the items are
    /// assumed to have passed boundary validation.
    pub fn compute_totals(&self, items: &[LineItem], tier: Option<ShippingTier>) -> OrderTotals {
        let subtotal: Money = items.iter().map(LineItem::line_total).sum();
        let tax_amount = subtotal.calculate_tax(self.tax_rate);
        let shipping_cost = self.shipping_cost(tier);
        let grand_total = PreciseMoney::from_money(subtotal) + tax_amount + shipping_cost;

        OrderTotals {
            subtotal,
            tax_amount,
            shipping_cost,
            grand_total,
        }
    }
}

/// [`PricingPolicy::compute_totals`] with the default policy.
pub fn compute_totals(items: &[LineItem], tier: Option<ShippingTier>) -> OrderTotals {
    PricingPolicy::default().compute_totals(items, tier)
}

// =============================================================================
// Unit Tests
// =============================================================================
