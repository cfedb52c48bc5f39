#![allow(dead_code)]

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use poshabaya::{config::StoreConfig, events::Event, storage::MemoryStorage, Storefront};

/// One storefront over fresh in-memory storage, with the event receiver
/// held so tests can assert on emitted notifications.
pub struct TestApp {
    pub front: Storefront,
    pub events: Receiver<Event>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let (front, events) = Storefront::new(storage, config);
        Self { front, events }
    }

    /// Re-opens a storefront over the same storage, simulating a new
    /// session (which is when cart pruning runs).
    pub fn reopen(&self) -> Self {
        let (front, events) = Storefront::new(self.front.storage.clone(), self.front.config.clone());
        Self { front, events }
    }

    /// Collects everything emitted so far.
    pub fn drain_events(&self) -> Vec<Event> {
        self.events.try_iter().collect()
    }

    pub fn stock_limited_count(&self) -> usize {
        self.drain_events()
            .into_iter()
            .filter(|e| matches!(e, Event::StockLimited { .. }))
            .count()
    }
}
