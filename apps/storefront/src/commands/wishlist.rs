//! # Wishlist Commands
//!
//! `wishlist toggle` behaves like the heart button on a book card: the first
//! press saves the book, the second removes it. `wishlist to-cart` adds a
//! saved book to the cart and keeps it saved.

use pahana_core::validation::{normalize_line_item, RawLineItem};
use pahana_core::{AddOutcome, Book, BookId, LineItem};
use pahana_store::{KeyValueStore, WishlistToggle};
use serde_json::Value;

use super::cart::{render_cart, BookArgs};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub async fn toggle<S: KeyValueStore>(state: &mut AppState<S>, book: BookArgs) -> AppResult<String> {
    let item = normalize_line_item(RawLineItem {
        id: Value::String(book.id),
        title: Some(book.title),
        author: book.author,
        price: Some(Value::String(book.price)),
        quantity: None,
    })?;
    let book = Book {
        id: item.id,
        title: item.title,
        author: item.author.unwrap_or_default(),
        price: item.unit_price,
        category: None,
        description: None,
        image: None,
    };

    match state.wishlist.toggle(&book).await? {
        WishlistToggle::Added => state.notifications.wishlist_added(&book.title),
        WishlistToggle::Removed => state.notifications.wishlist_removed(&book.title),
    };
    show(state).await
}

pub async fn to_cart<S: KeyValueStore>(state: &mut AppState<S>, id: &str) -> AppResult<String> {
    let id = BookId::new(id)?;
    let book = state
        .wishlist
        .items()
        .await
        .into_iter()
        .find(|book| book.id == id)
        .ok_or_else(|| AppError::NotInWishlist(id.to_string()))?;

    match state.cart.add(LineItem::from_book(&book)).await? {
        AddOutcome::Added => state.notifications.cart_added(&book.title),
        AddOutcome::AlreadyInCart => state.notifications.cart_already_present(&book.title),
    };
    Ok(render_cart(&state.config, &state.cart.read().await))
}

pub async fn show<S: KeyValueStore>(state: &AppState<S>) -> AppResult<String> {
    let books = state.wishlist.items().await;
    if books.is_empty() {
        return Ok("Your wishlist is empty.".to_string());
    }

    let mut lines = vec![format!("Wishlist: {} book(s)", books.len())];
    for book in &books {
        let by = if book.author.is_empty() {
            String::new()
        } else {
            format!(" by {}", book.author)
        };
        lines.push(format!(
            "  [{}] {}{}  {}",
            book.id,
            book.title,
            by,
            state.config.money(book.price)
        ));
    }
    Ok(lines.join("\n"))
}
