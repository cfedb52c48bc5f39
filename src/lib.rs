//! PoshaBaya Storefront Core
//!
//! Client-side e-commerce state for the PoshaBaya storefront: product
//! catalog with admin overrides, a stock ledger with an audit trail, a
//! cart capped against live availability, order recording, CRM, CMS, and
//! the auth session. All state lives in a host-provided key-value
//! [`storage::Storage`] backend; there is no server, no network, and no
//! locking — consistency guarantees are those of single-session
//! synchronous execution.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod common;
pub mod config;
pub mod data;
pub mod errors;
pub mod events;
pub mod logging;
pub mod models;
pub mod money;
pub mod services;
pub mod storage;

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use config::StoreConfig;
use events::{Event, EventSender};
use services::{
    AuthService, CartService, CatalogService, CmsService, CustomerService, InventoryService,
    OrderService,
};
use storage::Storage;

/// One constructed storefront: every service wired over a shared storage
/// backend, configuration, and event channel.
#[derive(Clone)]
pub struct Storefront {
    pub config: StoreConfig,
    pub storage: Arc<dyn Storage>,
    pub events: EventSender,
    pub catalog: CatalogService,
    pub inventory: InventoryService,
    pub cart: CartService,
    pub orders: OrderService,
    pub customers: CustomerService,
    pub cms: CmsService,
    pub auth: AuthService,
}

impl Storefront {
    /// Builds the storefront with an internal event channel, returning the
    /// receiving half for the host UI to drain.
    pub fn new(storage: Arc<dyn Storage>, config: StoreConfig) -> (Self, Receiver<Event>) {
        let (events, receiver) = EventSender::channel();
        (Self::with_sender(storage, config, events), receiver)
    }

    /// Builds the storefront over a caller-owned event sender.
    pub fn with_sender(
        storage: Arc<dyn Storage>,
        config: StoreConfig,
        events: EventSender,
    ) -> Self {
        let catalog = CatalogService::new(storage.clone(), events.clone());
        let inventory = InventoryService::new(
            storage.clone(),
            catalog.clone(),
            config.clone(),
            events.clone(),
        );
        let cart = CartService::new(
            storage.clone(),
            catalog.clone(),
            inventory.clone(),
            events.clone(),
        );
        // Session start is the one moment stale cart lines are pruned.
        cart.prune();
        let orders = OrderService::new(
            storage.clone(),
            cart.clone(),
            inventory.clone(),
            config.clone(),
            events.clone(),
        );
        let customers = CustomerService::new(storage.clone(), orders.clone(), config.clone());
        let cms = CmsService::new(storage.clone());
        let auth = AuthService::new(storage.clone());

        Self {
            config,
            storage,
            events,
            catalog,
            inventory,
            cart,
            orders,
            customers,
            cms,
            auth,
        }
    }

    /// Host hook for cross-session storage notifications: when another
    /// tab/process mutates the shared backend, forward the key here and the
    /// UI sees [`Event::StorageChanged`]. Services re-read storage on every
    /// call, so no cache invalidation is needed — this is purely a refresh
    /// signal, giving eventual (not transactional) cross-session
    /// consistency.
    pub fn notify_external_change(&self, key: &str) {
        self.events.send_or_log(Event::StorageChanged {
            key: key.to_string(),
        });
    }
}
