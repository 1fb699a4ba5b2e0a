//! # Cart
//!
//! The shopping cart and its mutation rules.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Storefront Action       Operation               Effect                 │
//! │  ─────────────────       ─────────               ──────                 │
//! │                                                                         │
//! │  "Add to Cart" ────────► add_item() ───────────► push, or AlreadyInCart │
//! │                                                  (never increments)     │
//! │                                                                         │
//! │  + / - buttons ────────► update_quantity() ────► qty = n   (n ≥ 1)      │
//! │                                                  no-op     (n < 1)      │
//! │                                                                         │
//! │  "Remove" ─────────────► remove_item() ────────► retain(id != x)        │
//! │                                                  absent is fine         │
//! │                                                                         │
//! │  Order placed ─────────► clear() ──────────────► items.clear()          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these fail: the cart assumes validated line items and treats
//! duplicates and sub-1 quantities as informational, not as errors.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::pricing::PricingPolicy;
use crate::types::{BookId, LineItem, OrderTotals, ShippingTier};

/// Result of [`Cart::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The book was not in the cart and now is, with its given quantity.
    Added,
    /// The book was already present; the cart is unchanged.
    AlreadyInCart,
}

/// Result of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    Updated,
    /// Requested quantity was below 1; use removal instead.
    Ignored,
    NotInCart,
}

/// An insertion-ordered set of line items, unique by book id.
///
/// ## Invariants
/// - At most one line per `BookId`
/// - Every retained line has `quantity ≥ 1`
///
/// Serialises as a bare JSON array, which is the persisted "cart" shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Builds a cart from already-validated items, keeping the first line for
    /// any repeated id and dropping lines with quantity below 1.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            if item.quantity >= 1 {
                cart.add_item(item);
            }
        }
        cart
    }

    /// Inserts `item` unless its id is already present.
    ///
    /// Adding a book twice does NOT bump the quantity; the storefront tells
    /// the shopper it is already in the cart instead.
    pub fn add_item(&mut self, item: LineItem) -> AddOutcome {
        if self.contains(&item.id) {
            return AddOutcome::AlreadyInCart;
        }
        self.items.push(item);
        AddOutcome::Added
    }

    /// Replaces the quantity of a line. Quantities below 1 are ignored.
    pub fn update_quantity(&mut self, id: &BookId, quantity: i64) -> QuantityUpdate {
        if quantity < 1 {
            return QuantityUpdate::Ignored;
        }
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                QuantityUpdate::Updated
            }
            None => QuantityUpdate::NotInCart,
        }
    }

    /// Removes a line; returns whether anything was removed.
    pub fn remove_item(&mut self, id: &BookId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, id: &BookId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &BookId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct books.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities (the "Cart Items (N)" badge).
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Owned copy of the items, for computing totals against a stable view.
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Totals for the current contents.
    pub fn totals(&self, policy: &PricingPolicy, tier: Option<ShippingTier>) -> OrderTotals {
        policy.compute_totals(&self.items, tier)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
