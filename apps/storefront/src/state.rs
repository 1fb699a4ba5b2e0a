//! # Application State
//!
//! Everything a command may touch, opened once per invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState<S>                                                            │
//! │                                                                         │
//! │  config          ShopConfig (read-only)                                 │
//! │  cart            CartStore<S>      ──► "cart"                           │
//! │  wishlist        WishlistStore<S>  ──► "wishlist"                       │
//! │  history         OrderHistory<S>   ──► "lastOrder"                      │
//! │  outbox          S                 ──► one checkout payload per order   │
//! │  notifications   NotificationQueue (printed after each command)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pahana_core::NotificationQueue;
use pahana_store::{CartStore, FileStore, KeyValueStore, OrderHistory, WishlistStore};
use tracing::debug;

use crate::config::ShopConfig;
use crate::error::AppResult;

pub struct AppState<S: KeyValueStore> {
    pub config: ShopConfig,
    pub cart: CartStore<S>,
    pub wishlist: WishlistStore<S>,
    pub history: OrderHistory<S>,
    /// Submitted checkout payloads, keyed by order id.
    pub outbox: S,
    pub notifications: NotificationQueue,
}

impl<S: KeyValueStore> AppState<S> {
    /// Loads the cart and wishlist from `store`.
    pub async fn open(config: ShopConfig, store: S, outbox: S) -> AppResult<Self> {
        let cart = CartStore::load(store.clone()).await?;
        let wishlist = WishlistStore::load(store.clone()).await?;
        let history = OrderHistory::new(store);

        Ok(AppState {
            config,
            cart,
            wishlist,
            history,
            outbox,
            notifications: NotificationQueue::new(),
        })
    }
}

impl AppState<FileStore> {
    /// Opens the JSON files under the configured data directory.
    pub async fn open_data_dir(config: ShopConfig) -> AppResult<Self> {
        debug!(data_dir = %config.data_dir.display(), "Opening data directory");
        let store = FileStore::new(&config.data_dir);
        let outbox = FileStore::new(config.orders_dir());
        Self::open(config, store, outbox).await
    }
}
