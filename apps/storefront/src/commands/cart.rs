//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐        │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │        │
//! │  │  Cart    │     │          │     │  Form    │     │  Placed  │        │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘        │
//! │                        │                                  │             │
//! │                   cart add                           cart cleared       │
//! │                   cart update                        (checkout.rs)      │
//! │                   cart remove                                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   cart clear ──────────────────────► (back to empty)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pahana_core::validation::{normalize_line_item, validate_quantity, RawLineItem};
use pahana_core::{AddOutcome, BookId, Cart, QuantityUpdate};
use pahana_store::KeyValueStore;
use serde_json::Value;
use tracing::debug;

use super::totals_lines;
use crate::config::ShopConfig;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A book as given on the command line.
#[derive(Debug, Clone)]
pub struct BookArgs {
    pub id: String,
    pub title: String,
    /// Decimal text, e.g. `12.99`.
    pub price: String,
    pub author: Option<String>,
}

/// Renders the cart with its totals before shipping.
pub fn render_cart(config: &ShopConfig, cart: &Cart) -> String {
    if cart.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut lines = vec![format!(
        "{}: {} book(s), {} copies",
        config.store_name,
        cart.len(),
        cart.total_quantity()
    )];
    for item in cart.items() {
        let by = item
            .author
            .as_deref()
            .map(|author| format!(" by {author}"))
            .unwrap_or_default();
        lines.push(format!(
            "  [{}] {}{}  {} x {} = {}",
            item.id,
            item.title,
            by,
            item.quantity,
            config.money(item.unit_price),
            config.money(item.line_total())
        ));
    }
    lines.push(String::new());
    lines.extend(totals_lines(config, &cart.totals(&config.pricing, None), None));
    lines.join("\n")
}

pub async fn show<S: KeyValueStore>(state: &AppState<S>) -> AppResult<String> {
    let cart = state.cart.read().await;
    Ok(render_cart(&state.config, &cart))
}

/// Adds one copy of a book. A book already in the cart is left unchanged
/// and the shopper is told so.
pub async fn add<S: KeyValueStore>(state: &mut AppState<S>, book: BookArgs) -> AppResult<String> {
    let item = normalize_line_item(RawLineItem {
        id: Value::String(book.id),
        title: Some(book.title),
        author: book.author,
        price: Some(Value::String(book.price)),
        quantity: None,
    })?;
    let title = item.title.clone();

    match state.cart.add(item).await? {
        AddOutcome::Added => state.notifications.cart_added(&title),
        AddOutcome::AlreadyInCart => state.notifications.cart_already_present(&title),
    };
    show(state).await
}

/// Sets the quantity of a line. Quantities below 1 leave the cart as it is.
pub async fn update<S: KeyValueStore>(
    state: &mut AppState<S>,
    id: &str,
    quantity: i64,
) -> AppResult<String> {
    let id = BookId::new(id)?;
    if quantity >= 1 {
        validate_quantity(quantity)?;
    }

    match state.cart.update_quantity(&id, quantity).await? {
        QuantityUpdate::Updated => {}
        QuantityUpdate::Ignored => {
            debug!(%id, quantity, "Quantity below 1 ignored");
            state
                .notifications
                .info("Quantity must be at least 1; use `cart remove` to drop a book");
        }
        QuantityUpdate::NotInCart => return Err(AppError::NotInCart(id.to_string())),
    }
    show(state).await
}

/// Removes a book. Removing one that is not in the cart is a no-op.
pub async fn remove<S: KeyValueStore>(state: &mut AppState<S>, id: &str) -> AppResult<String> {
    let id = BookId::new(id)?;
    if !state.cart.remove(&id).await? {
        debug!(%id, "Remove of absent book ignored");
        state.notifications.info(format!("Book {id} was not in your cart"));
    }
    show(state).await
}

pub async fn clear<S: KeyValueStore>(state: &mut AppState<S>) -> AppResult<String> {
    state.cart.clear().await?;
    state.notifications.info("Cart cleared");
    show(state).await
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{memory_state, messages};
    use pahana_core::{ValidationError, MAX_CART_ITEMS};
    use pahana_store::StoreError;

    fn book(id: &str, title: &str, price: &str) -> BookArgs {
        BookArgs {
            id: id.to_string(),
            title: title.to_string(),
            price: price.to_string(),
            author: None,
        }
    }

    #[tokio::test]
    async fn test_add_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = memory_state(dir.path()).await;

        add(&mut state, book("1", "Dune", "10.00")).await.unwrap();
        let output = add(&mut state, BookArgs {
            author: Some("Jane Austen".to_string()),
            ..book("2", "Emma", "5.50")
        })
        .await
        .unwrap();

        assert!(output.contains("[2] Emma by Jane Austen  1 x Rs.5.50 = Rs.5.50"));
        assert!(output.contains("Rs.15.50"));
        assert_eq!(messages(&mut state), vec!["Dune added to cart!", "Emma added to cart!"]);
    }

    #[tokio::test]
    async fn test_add_twice_keeps_quantity() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = memory_state(dir.path()).await;

        add(&mut state, book("1", "Dune", "10")).await.unwrap();
        add(&mut state, book("1", "Dune", "10")).await.unwrap();

        let cart = state.cart.read().await;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(
            messages(&mut state),
            vec!["Dune added to cart!", "Dune is already in your cart"]
        );
    }

    #[tokio::test]
    async fn test_add_rejects_bad_price() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = memory_state(dir.path()).await;

        for price in ["-1", "1.999", "ten", "10000000.01"] {
            let err = add(&mut state, book("1", "Dune", price)).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{price}: {err}");
        }
        assert!(state.cart.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_past_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = memory_state(dir.path()).await;

        for i in 0..MAX_CART_ITEMS {
            add(&mut state, book(&i.to_string(), "T", "1")).await.unwrap();
        }
        let err = add(&mut state, book("extra", "T", "1")).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn test_update_quantity() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = memory_state(dir.path()).await;
        add(&mut state, book("1", "Dune", "10")).await.unwrap();
        messages(&mut state);

        let output = update(&mut state, "1", 3).await.unwrap();
        assert!(output.contains("3 x Rs.10.00 = Rs.30.00"));

        update(&mut state, "1", 0).await.unwrap();
        assert_eq!(state.cart.read().await.items()[0].quantity, 3);
        assert_eq!(messages(&mut state).len(), 1);

        assert!(update(&mut state, "1", 1000).await.is_err());
        assert!(matches!(
            update(&mut state, "9", 2).await.unwrap_err(),
            AppError::NotInCart(id) if id == "9"
        ));
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = memory_state(dir.path()).await;
        add(&mut state, book("1", "Dune", "10")).await.unwrap();
        add(&mut state, book("2", "Emma", "5.50")).await.unwrap();

        messages(&mut state);

        let first = remove(&mut state, "1").await.unwrap();
        let second = remove(&mut state, "1").await.unwrap();
        assert_eq!(first, second);
        assert!(!second.contains("Dune"));
        assert_eq!(state.cart.read().await.len(), 1);
        assert_eq!(messages(&mut state), vec!["Book 1 was not in your cart"]);

        let output = clear(&mut state).await.unwrap();
        assert_eq!(output, "Your cart is empty.");
    }
}
