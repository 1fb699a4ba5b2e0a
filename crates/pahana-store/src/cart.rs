//! # Cart Store
//!
//! The persisted cart: every mutation writes the new cart through to the
//! backend and publishes it to subscribers.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartStore::add(item)                                 │
//! │                                                                         │
//! │  lock cart ──► clone ──► Cart::add_item() ──► serialize ──► store.set   │
//! │                               │                                 │       │
//! │                               │ AlreadyInCart                   │ ok    │
//! │                               ▼                                 ▼       │
//! │                          return early               replace + publish   │
//! │                                                     (watch::Sender)     │
//! │                                                                         │
//! │  A failed write leaves both the stored and the in-memory cart as they  │
//! │  were, so readers never see a cart that was not persisted.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pahana_core::validation::{
    normalize_line_items, validate_cart_size, validate_price_cents, validate_quantity, RawLineItem,
};
use pahana_core::{AddOutcome, BookId, Cart, LineItem, QuantityUpdate};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::kv::{KeyValueStore, CART_KEY};

pub struct CartStore<S: KeyValueStore> {
    store: S,
    cart: Mutex<Cart>,
    updates: watch::Sender<Cart>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Reads the stored cart.
    ///
    /// Stored items go through boundary normalization. A cart that fails to
    /// parse or validate is discarded with a warning and replaced by an
    /// empty one; only backend I/O failures are errors.
    pub async fn load(store: S) -> StoreResult<Self> {
        let cart = match store.get(CART_KEY).await? {
            None => Cart::new(),
            Some(text) => parse_cart(&text),
        };
        debug!(items = cart.len(), "Cart loaded");

        let (updates, _) = watch::channel(cart.clone());
        Ok(CartStore {
            store,
            cart: Mutex::new(cart),
            updates,
        })
    }

    /// Current cart.
    pub async fn read(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Receiver that always holds the latest cart.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.updates.subscribe()
    }

    /// Adds a book unless already present.
    ///
    /// Fails when the cart already holds the maximum number of books, or
    /// when the price or quantity is out of range.
    pub async fn add(&self, item: LineItem) -> StoreResult<AddOutcome> {
        validate_price_cents(item.unit_price.cents())?;
        validate_quantity(item.quantity)?;

        let mut guard = self.cart.lock().await;
        if guard.contains(&item.id) {
            return Ok(AddOutcome::AlreadyInCart);
        }
        validate_cart_size(guard.len())?;

        let mut next = guard.clone();
        let id = item.id.clone();
        let outcome = next.add_item(item);
        self.commit(&mut guard, next).await?;
        debug!(%id, "Added to cart");
        Ok(outcome)
    }

    /// Quantities below 1 are `Ignored`; above the line limit they fail.
    pub async fn update_quantity(&self, id: &BookId, quantity: i64) -> StoreResult<QuantityUpdate> {
        if quantity >= 1 {
            validate_quantity(quantity)?;
        }

        let mut guard = self.cart.lock().await;
        let mut next = guard.clone();
        let outcome = next.update_quantity(id, quantity);
        if outcome == QuantityUpdate::Updated {
            self.commit(&mut guard, next).await?;
            debug!(%id, quantity, "Quantity updated");
        }
        Ok(outcome)
    }

    /// Removes a book; `Ok(false)` if it was not in the cart.
    pub async fn remove(&self, id: &BookId) -> StoreResult<bool> {
        let mut guard = self.cart.lock().await;
        let mut next = guard.clone();
        if !next.remove_item(id) {
            return Ok(false);
        }
        self.commit(&mut guard, next).await?;
        debug!(%id, "Removed from cart");
        Ok(true)
    }

    pub async fn clear(&self) -> StoreResult<()> {
        let mut guard = self.cart.lock().await;
        self.commit(&mut guard, Cart::new()).await?;
        debug!("Cart cleared");
        Ok(())
    }

    async fn commit(&self, current: &mut Cart, next: Cart) -> StoreResult<()> {
        let json = serde_json::to_string(&next)?;
        self.store.set(CART_KEY, &json).await?;
        *current = next;
        self.updates.send_replace(current.clone());
        Ok(())
    }
}

fn parse_cart(text: &str) -> Cart {
    let raws: Vec<RawLineItem> = match serde_json::from_str(text) {
        Ok(raws) => raws,
        Err(err) => {
            warn!(error = %err, "Stored cart is not valid JSON; starting empty");
            return Cart::new();
        }
    };
    match normalize_line_items(raws) {
        Ok(items) => Cart::from_items(items),
        Err(err) => {
            warn!(error = %err, "Stored cart failed validation; starting empty");
            Cart::new()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileStore, MemoryStore};
    use crate::error::StoreError;
    use pahana_core::{
        compute_totals, Money, ShippingTier, MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_PRICE_CENTS,
    };
    use std::sync::Arc;

    fn item(id: &str, cents: i64, qty: i64) -> LineItem {
        LineItem::new(BookId::new(id).unwrap(), format!("Book {id}"), Money::from_cents(cents), qty)
    }

    fn id(s: &str) -> BookId {
        BookId::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let backend = MemoryStore::new();
        let store = CartStore::load(backend.clone()).await.unwrap();

        store.add(item("1", 1000, 2)).await.unwrap();
        store.add(item("2", 550, 1)).await.unwrap();

        let reloaded = CartStore::load(backend.clone()).await.unwrap();
        let cart = reloaded.read().await;
        assert_eq!(cart.len(), 2);
        let totals = compute_totals(cart.items(), Some(ShippingTier::Standard));
        assert_eq!(totals.grand_total_display().to_string(), "375.70");
    }

    #[tokio::test]
    async fn test_add_twice_reports_already_in_cart() {
        let store = CartStore::load(MemoryStore::new()).await.unwrap();
        assert_eq!(store.add(item("1", 100, 1)).await.unwrap(), AddOutcome::Added);
        assert_eq!(store.add(item("1", 100, 1)).await.unwrap(), AddOutcome::AlreadyInCart);
        assert_eq!(store.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let store = CartStore::load(MemoryStore::new()).await.unwrap();
        store.add(item("1", 100, 1)).await.unwrap();

        assert_eq!(store.update_quantity(&id("1"), 5).await.unwrap(), QuantityUpdate::Updated);
        assert_eq!(store.update_quantity(&id("1"), 0).await.unwrap(), QuantityUpdate::Ignored);
        assert_eq!(store.read().await.total_quantity(), 5);

        assert!(store.remove(&id("1")).await.unwrap());
        assert!(!store.remove(&id("1")).await.unwrap());
        assert!(store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_lines_are_rejected() {
        let store = CartStore::load(MemoryStore::new()).await.unwrap();

        let err = store.add(item("1", MAX_PRICE_CENTS + 1, 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.add(item("2", 100, MAX_ITEM_QUANTITY + 1)).await.is_err());
        assert!(store.read().await.is_empty());

        store.add(item("3", MAX_PRICE_CENTS, 1)).await.unwrap();
        assert!(store.update_quantity(&id("3"), MAX_ITEM_QUANTITY + 1).await.is_err());
        assert_eq!(store.read().await.total_quantity(), 1);
    }

    #[tokio::test]
    async fn test_cart_size_limit() {
        let store = CartStore::load(MemoryStore::new()).await.unwrap();
        for i in 0..MAX_CART_ITEMS {
            store.add(item(&i.to_string(), 100, 1)).await.unwrap();
        }
        assert!(store.add(item("overflow", 100, 1)).await.is_err());
        // an existing book is still reported, not rejected
        assert_eq!(store.add(item("0", 100, 1)).await.unwrap(), AddOutcome::AlreadyInCart);
    }

    #[tokio::test]
    async fn test_loads_loose_stored_items() {
        let backend = MemoryStore::new();
        backend
            .set(
                CART_KEY,
                r#"[{"id": 1, "title": "Dune", "price": 10}, {"id": "2", "title": "Emma", "price": "5.50", "quantity": 2}]"#,
            )
            .await
            .unwrap();

        let cart = CartStore::load(backend).await.unwrap().read().await;
        assert_eq!(cart.get(&id("1")).unwrap().quantity, 1);
        assert_eq!(cart.subtotal().cents(), 1000 + 1100);
    }

    #[tokio::test]
    async fn test_corrupt_cart_starts_empty() {
        for bad in ["not json", r#"[{"id": "1", "title": "A", "quantity": -1}]"#, r#"{"id": 1}"#] {
            let backend = MemoryStore::new();
            backend.set(CART_KEY, bad).await.unwrap();
            let store = CartStore::load(backend).await.unwrap();
            assert!(store.read().await.is_empty(), "accepted {bad}");
        }
    }

    #[tokio::test]
    async fn test_subscribers_see_every_commit() {
        let store = CartStore::load(MemoryStore::new()).await.unwrap();
        let mut rx = store.subscribe();
        assert!(rx.borrow().is_empty());

        store.add(item("1", 100, 1)).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.clear().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn test_no_op_update_does_not_publish() {
        let store = CartStore::load(MemoryStore::new()).await.unwrap();
        store.add(item("1", 100, 1)).await.unwrap();
        let mut rx = store.subscribe();
        drop(rx.borrow_and_update());

        store.update_quantity(&id("1"), 0).await.unwrap();
        store.remove(&id("missing")).await.unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_unique_ids() {
        let store = Arc::new(CartStore::load(MemoryStore::new()).await.unwrap());
        let mut handles = Vec::new();
        for n in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.add(item(&(n % 5).to_string(), 100, 1)).await.unwrap()
            }));
        }
        let mut added = 0;
        for handle in handles {
            if handle.await.unwrap() == AddOutcome::Added {
                added += 1;
            }
        }
        assert_eq!(added, 5);
        assert_eq!(store.read().await.len(), 5);
    }

    #[tokio::test]
    async fn test_file_backed_cart_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = CartStore::load(FileStore::new(dir.path())).await.unwrap();
            store.add(item("1", 1050, 2)).await.unwrap();
        }
        let cart = CartStore::load(FileStore::new(dir.path())).await.unwrap().read().await;
        assert_eq!(cart.subtotal().cents(), 2100);

        let raw = std::fs::read_to_string(dir.path().join("cart.json")).unwrap();
        assert!(raw.contains("\"10.50\""));
    }
}
