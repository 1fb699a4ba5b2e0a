//! # pahana-store: Persisted Storefront State
//!
//! Explicit store objects for the cart, the wishlist and the last placed
//! order, each backed by a [`KeyValueStore`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pahana Data Flow                                 │
//! │                                                                         │
//! │  storefront command (cart add / checkout)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   pahana-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────────┐  │   │
//! │  │   │  CartStore   │   │ WishlistStore │   │  OrderHistory    │  │   │
//! │  │   │  "cart"      │   │  "wishlist"   │   │  "lastOrder"     │  │   │
//! │  │   └──────┬───────┘   └──────┬────────┘   └────────┬─────────┘  │   │
//! │  │          └──────────────────┼─────────────────────┘            │   │
//! │  │                             ▼                                   │   │
//! │  │                  KeyValueStore (Memory / File)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data dir>/cart.json, wishlist.json, lastOrder.json                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pahana_core::{BookId, LineItem, Money};
//! use pahana_store::{CartStore, FileStore};
//!
//! # async fn demo() -> Result<(), pahana_store::StoreError> {
//! let cart = CartStore::load(FileStore::new("./data")).await?;
//! let item = LineItem::new(BookId::new("1")?, "Dune", Money::from_cents(1000), 1);
//! cart.add(item).await?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod history;
pub mod kv;
pub mod wishlist;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart::CartStore;
pub use error::{StoreError, StoreResult};
pub use history::OrderHistory;
pub use kv::{FileStore, KeyValueStore, MemoryStore, CART_KEY, LAST_ORDER_KEY, WISHLIST_KEY};
pub use wishlist::{WishlistStore, WishlistToggle};
