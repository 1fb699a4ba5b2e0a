//! # Key-Value Backends
//!
//! The storefront persists three JSON documents under fixed keys. Anything
//! that can get, set and remove a string by key can back them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Key-Value Store                                      │
//! │                                                                         │
//! │  CartStore / WishlistStore / OrderHistory                              │
//! │       │                                                                 │
//! │       │  get("cart") / set("cart", json) / remove("lastOrder")         │
//! │       ▼                                                                 │
//! │  KeyValueStore (trait)                                                 │
//! │  ├── MemoryStore  - HashMap behind a lock (tests, dry runs)            │
//! │  └── FileStore    - <dir>/<key>.json, temp file + rename on write      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;

use crate::error::{StoreError, StoreResult};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the cart as a JSON array of line items.
pub const CART_KEY: &str = "cart";
/// Key holding the wishlist as a JSON array of books.
pub const WISHLIST_KEY: &str = "wishlist";
/// Key holding the most recently placed order.
pub const LAST_ORDER_KEY: &str = "lastOrder";

/// String storage by key.
///
/// Implementations are cheap handles (`Clone`) onto shared storage, so the
/// cart, wishlist and order history can sit on one backend.
pub trait KeyValueStore: Clone + Send + Sync + 'static {
    /// `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Option<String>>> + Send;

    /// Replaces the value under `key`. Readers see the old or the new value,
    /// never a partial one.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = StoreResult<()>> + Send;

    /// Removing an absent key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Rejects keys that would not make a safe file name.
pub(crate) fn check_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert!(check_key(CART_KEY).is_ok());
        assert!(check_key(LAST_ORDER_KEY).is_ok());
        assert!(check_key("").is_err());
        assert!(check_key("../etc").is_err());
        assert!(check_key("a b").is_err());
    }
}
