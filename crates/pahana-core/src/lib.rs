//! # pahana-core: Pure Business Logic for the Pahana Bookshop
//!
//! This crate holds the cart, pricing and checkout rules of the storefront
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pahana Storefront Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront (CLI / web view)                  │   │
//! │  │    Browse ──► Cart ──► Checkout form ──► Invoice download       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         pahana-store          │         pahana-invoice          │   │
//! │  │   cart / wishlist / lastOrder │    layout + PDF emission        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pahana-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  cart   │ │ pricing │ │validation│ │checkout │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` (integer cents) and `PreciseMoney` (unrounded totals)
//! - [`types`] - Domain records (Book, LineItem, ShippingTier, OrderTotals, ...)
//! - [`cart`] - The cart and its add / update / remove rules
//! - [`pricing`] - Order total computation and the tax constant
//! - [`validation`] - Boundary validation and normalization
//! - [`notification`] - Declarative notification queue
//! - [`checkout`] - Placed orders and the checkout API payload
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use pahana_core::{compute_totals, BookId, LineItem, Money, ShippingTier};
//!
//! let items = vec![
//!     LineItem::new(BookId::new("1").unwrap(), "Dune", Money::from_cents(1000), 2),
//!     LineItem::new(BookId::new("2").unwrap(), "Emma", Money::from_cents(550), 1),
//! ];
//!
//! let totals = compute_totals(&items, Some(ShippingTier::Standard));
//! assert_eq!(totals.subtotal.to_string(), "25.50");
//! assert_eq!(totals.tax_display().to_string(), "0.20");
//! assert_eq!(totals.grand_total_display().to_string(), "375.70");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod notification;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, QuantityUpdate};
pub use checkout::{CheckoutRequest, Order};
pub use error::{CoreError, CoreResult, FieldErrors, ValidationError};
pub use money::{Money, PreciseMoney};
pub use notification::{Notification, NotificationKind, NotificationQueue};
pub use pricing::{compute_totals, PricingPolicy, DEFAULT_SHIPPING_RATES, TAX_RATE};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct books allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity accepted for a single line item at the boundary.
///
/// Guards against typing 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price accepted at the boundary: Rs.10,000,000.00.
///
/// A full cart at this price and the maximum quantity totals about 10^14
/// cents, far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;
