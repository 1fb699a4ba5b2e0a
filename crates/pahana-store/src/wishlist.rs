//! # Wishlist Store
//!
//! Books the shopper has hearted, in the order they were added. The heart
//! button toggles, so the single mutation is [`WishlistStore::toggle`].

use pahana_core::{Book, BookId};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::kv::{KeyValueStore, WISHLIST_KEY};

/// Result of [`WishlistStore::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistToggle {
    Added,
    Removed,
}

pub struct WishlistStore<S: KeyValueStore> {
    store: S,
    books: Mutex<Vec<Book>>,
    updates: watch::Sender<Vec<Book>>,
}

impl<S: KeyValueStore> WishlistStore<S> {
    /// Reads the stored wishlist; unreadable data is logged and dropped.
    pub async fn load(store: S) -> StoreResult<Self> {
        let books = match store.get(WISHLIST_KEY).await? {
            None => Vec::new(),
            Some(text) => match serde_json::from_str::<Vec<Book>>(&text) {
                Ok(books) => dedup_by_id(books),
                Err(err) => {
                    warn!(error = %err, "Stored wishlist is unreadable; starting empty");
                    Vec::new()
                }
            },
        };

        let (updates, _) = watch::channel(books.clone());
        Ok(WishlistStore {
            store,
            books: Mutex::new(books),
            updates,
        })
    }

    /// Adds the book if absent, removes it if present.
    pub async fn toggle(&self, book: &Book) -> StoreResult<WishlistToggle> {
        let mut guard = self.books.lock().await;
        let mut next = guard.clone();

        let outcome = if next.iter().any(|b| b.id == book.id) {
            next.retain(|b| b.id != book.id);
            WishlistToggle::Removed
        } else {
            next.push(book.clone());
            WishlistToggle::Added
        };

        let json = serde_json::to_string(&next)?;
        self.store.set(WISHLIST_KEY, &json).await?;
        *guard = next;
        self.updates.send_replace(guard.clone());

        debug!(id = %book.id, ?outcome, "Wishlist toggled");
        Ok(outcome)
    }

    pub async fn contains(&self, id: &BookId) -> bool {
        self.books.lock().await.iter().any(|b| &b.id == id)
    }

    pub async fn items(&self) -> Vec<Book> {
        self.books.lock().await.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Book>> {
        self.updates.subscribe()
    }
}

fn dedup_by_id(books: Vec<Book>) -> Vec<Book> {
    let mut unique: Vec<Book> = Vec::with_capacity(books.len());
    for book in books {
        if !unique.iter().any(|b| b.id == book.id) {
            unique.push(book);
        }
    }
    unique
}
