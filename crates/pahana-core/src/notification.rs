//! # Notifications
//!
//! A queue of messages produced by storefront actions ("Dune added to
//! cart!"). Producers push, the view layer drains once per command and
//! prints everything it took; nothing here touches a screen.
//!
//! ```text
//!   add_item() ──► AddOutcome ──► queue.cart_added(title) ──┐
//!   toggle()   ──► Added/Removed ──► queue.wishlist_*(title)─┤
//!                                                            ▼
//!                                  ┌──────────────────────────────┐
//!                                  │ NotificationQueue            │
//!                                  │  [n1 Success] [n2 Info] ...  │
//!                                  └──────────────┬───────────────┘
//!                                                 │ drain()
//!                                                 ▼
//!                                            view layer
//! ```

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// FIFO of pending notifications.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
    next_id: u64,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        NotificationQueue {
            pending: VecDeque::new(),
            next_id: 1,
        }
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        NotificationQueue::default()
    }

    /// Enqueues a message stamped with the current time; returns its id.
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push_back(Notification {
            id,
            kind,
            message: message.into(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Success, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Info, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, message)
    }

    // -------------------------------------------------------------------------
    // Storefront messages
    // -------------------------------------------------------------------------

    pub fn cart_added(&mut self, title: &str) -> u64 {
        self.success(format!("{title} added to cart!"))
    }

    pub fn cart_already_present(&mut self, title: &str) -> u64 {
        self.info(format!("{title} is already in your cart"))
    }

    pub fn wishlist_added(&mut self, title: &str) -> u64 {
        self.success(format!("{title} added to wishlist!"))
    }

    pub fn wishlist_removed(&mut self, title: &str) -> u64 {
        self.info(format!("{title} removed from wishlist"))
    }

    // -------------------------------------------------------------------------
    // Consumers
    // -------------------------------------------------------------------------

    /// Removes and returns everything queued, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let mut queue = NotificationQueue::new();
        queue.cart_added("Dune");
        queue.cart_already_present("Dune");
        queue.wishlist_added("Emma");
        queue.wishlist_removed("Emma");

        let drained = queue.drain();
        let messages: Vec<&str> = drained.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Dune added to cart!",
                "Dune is already in your cart",
                "Emma added to wishlist!",
                "Emma removed from wishlist",
            ]
        );
        assert_eq!(drained[0].kind, NotificationKind::Success);
        assert_eq!(drained[1].kind, NotificationKind::Info);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ids_are_increasing() {
        let mut queue = NotificationQueue::new();
        let a = queue.info("a");
        let b = queue.error("b");
        assert!(b > a);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_drain_empties_in_order_and_ids_continue() {
        let mut queue = NotificationQueue::new();
        queue.info("first");
        queue.error("second");

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(drained[0].created_at <= drained[1].created_at);
        assert!(queue.drain().is_empty());

        let next = queue.success("third");
        assert_eq!(next, drained[1].id + 1);
    }
}
