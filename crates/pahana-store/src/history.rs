//! # Order History
//!
//! Keeps the most recently placed order so its invoice can be produced
//! again later.

use pahana_core::Order;
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::kv::{KeyValueStore, LAST_ORDER_KEY};

#[derive(Debug, Clone)]
pub struct OrderHistory<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> OrderHistory<S> {
    pub fn new(store: S) -> Self {
        OrderHistory { store }
    }

    /// Replaces the stored last order.
    pub async fn save(&self, order: &Order) -> StoreResult<()> {
        let json = serde_json::to_string(order)?;
        self.store.set(LAST_ORDER_KEY, &json).await?;
        debug!(order_id = %order.id, "Last order saved");
        Ok(())
    }

    /// The last order, or `None` if there is none or it cannot be read.
    pub async fn last(&self) -> StoreResult<Option<Order>> {
        let Some(text) = self.store.get(LAST_ORDER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(order) => Ok(Some(order)),
            Err(err) => {
                warn!(error = %err, "Stored last order is unreadable; ignoring it");
                Ok(None)
            }
        }
    }

    pub async fn forget(&self) -> StoreResult<()> {
        self.store.remove(LAST_ORDER_KEY).await
    }
}
