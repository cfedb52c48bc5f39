//! Synchronous event fan-out.
//!
//! Every committed mutation emits exactly one [`Event`]; capacity clamps in
//! the cart emit [`Event::StockLimited`], which is the "not enough stock" /
//! "stock limit reached" notification a host surfaces as a toast. The host
//! owns the receiving end of the channel and drains it from its UI loop.

use std::sync::mpsc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{OrderStatus, Size};

/// Events emitted by the store services.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Event {
    /// A catalog override was written, deleted, imported, or cleared.
    CatalogChanged,
    /// A stock write committed. Mirrors the audit trail entry.
    InventoryAdjusted {
        product_id: String,
        size: Option<Size>,
        delta: i64,
        qty_after: u32,
    },
    /// A cart operation was clamped below the requested quantity.
    StockLimited {
        product_id: String,
        size: Option<Size>,
    },
    /// The cart item list changed.
    CartChanged,
    /// An order was placed at checkout.
    OrderPlaced(String),
    OrderStatusChanged {
        order_id: String,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },
    /// Another session mutated the shared storage under this key. Forwarded
    /// by the host through [`Storefront::notify_external_change`].
    ///
    /// [`Storefront::notify_external_change`]: crate::Storefront::notify_external_change
    StorageChanged { key: String },
}

/// Cloneable sending half handed to every service.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Creates a connected sender/receiver pair.
    pub fn channel() -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }

    pub fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the receiver is gone.
    /// Event delivery is best-effort; store state never depends on it.
    pub fn send_or_log(&self, event: Event) {
        if let Err(err) = self.send(event) {
            warn!(%err, "event receiver dropped, discarding event");
        }
    }
}
