use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    config::StoreConfig,
    errors::StoreError,
    events::{Event, EventSender},
    models::{InventoryEvent, InventoryRecord, LowStockAlert, Size},
    services::catalog::CatalogService,
    storage::{self, keys, Storage},
};

type InventoryMap = BTreeMap<String, InventoryRecord>;
type ThresholdMap = BTreeMap<String, u32>;

/// Inventory ledger: per-product (optionally per-size) stock counters with
/// an append-only audit trail and low-stock thresholds.
///
/// This is the authority other components consult before reserving
/// quantity. Invariants: stock is never negative, every committed write is
/// audited exactly once, and the size/total representations are never mixed
/// for one product.
#[derive(Clone)]
pub struct InventoryService {
    storage: Arc<dyn Storage>,
    catalog: CatalogService,
    config: StoreConfig,
    events: EventSender,
}

impl InventoryService {
    pub fn new(
        storage: Arc<dyn Storage>,
        catalog: CatalogService,
        config: StoreConfig,
        events: EventSender,
    ) -> Self {
        Self {
            storage,
            catalog,
            config,
            events,
        }
    }

    /// Seed map: every product (hidden included) gets `default_stock`, per
    /// declared size or as a flat total.
    fn seed(&self) -> InventoryMap {
        let default = self.config.default_stock;
        self.catalog
            .get_products(true)
            .into_iter()
            .map(|p| {
                let record = if p.has_sizes() {
                    InventoryRecord::BySize {
                        by_size: p.sizes.iter().map(|&s| (s, default)).collect(),
                    }
                } else {
                    InventoryRecord::Total { total: default }
                };
                (p.id, record)
            })
            .collect()
    }

    /// Current inventory view: persisted records overlaid on the seed, so
    /// absent products read at the default quantity.
    fn load(&self) -> InventoryMap {
        let mut map = self.seed();
        let stored: InventoryMap = storage::load_json(self.storage.as_ref(), keys::INVENTORY);
        map.extend(stored);
        map
    }

    fn save(&self, map: &InventoryMap) {
        storage::save_json(self.storage.as_ref(), keys::INVENTORY, map);
    }

    /// Size-aware stock lookup. Unknown products, unknown sizes, and a
    /// size/total representation mismatch all read as 0; this never errors.
    pub fn get_stock(&self, id: &str, size: Option<Size>) -> u32 {
        match (self.load().get(id), size) {
            (Some(InventoryRecord::BySize { by_size }), Some(s)) => {
                by_size.get(&s).copied().unwrap_or(0)
            }
            (Some(InventoryRecord::Total { total }), None) => *total,
            _ => 0,
        }
    }

    /// Writes an absolute quantity, clamped to `>= 0`, and always appends
    /// exactly one audit event — an explicit set with zero delta is still a
    /// recorded write, distinct from a no-op read.
    #[instrument(skip(self, reason))]
    pub fn set_stock(&self, id: &str, qty: i64, size: Option<Size>, reason: Option<&str>) {
        let previous = self.get_stock(id, size);
        let next = qty.clamp(0, i64::from(u32::MAX)) as u32;

        let mut inventory = self.load();
        let record = match (inventory.remove(id), size) {
            (Some(InventoryRecord::BySize { mut by_size }), Some(s)) => {
                by_size.insert(s, next);
                InventoryRecord::BySize { by_size }
            }
            (existing, Some(s)) => {
                if existing.is_some() {
                    warn!("replacing flat-total record with a size map");
                }
                InventoryRecord::BySize {
                    by_size: BTreeMap::from([(s, next)]),
                }
            }
            (existing, None) => {
                if matches!(existing, Some(InventoryRecord::BySize { .. })) {
                    warn!("replacing size map with a flat-total record");
                }
                InventoryRecord::Total { total: next }
            }
        };
        inventory.insert(id.to_string(), record);
        self.save(&inventory);

        let delta = i64::from(next) - i64::from(previous);
        self.log_inventory_event(InventoryEvent {
            product_id: id.to_string(),
            size,
            delta,
            qty_after: next,
            reason: reason.map(str::to_string),
            at: Utc::now(),
        });
        self.events.send_or_log(Event::InventoryAdjusted {
            product_id: id.to_string(),
            size,
            delta,
            qty_after: next,
        });
        info!(delta, qty_after = next, "stock written");
    }

    /// Applies a signed delta on top of current stock. Decrements below
    /// zero clamp at zero rather than erroring.
    pub fn adjust_stock(&self, id: &str, delta: i64, size: Option<Size>, reason: Option<&str>) {
        let current = self.get_stock(id, size);
        self.set_stock(id, i64::from(current) + delta, size, reason);
    }

    /// The single source of truth for "can this quantity be reserved":
    /// `clamp(requested, 0, stock)`. Never exceeds on-hand stock, never
    /// negative, never audited (events reflect committed writes, not reads).
    pub fn available_for(&self, id: &str, requested: i64, size: Option<Size>) -> u32 {
        let stock = self.get_stock(id, size);
        requested.clamp(0, i64::from(stock)) as u32
    }

    fn thresholds(&self) -> ThresholdMap {
        storage::load_json(self.storage.as_ref(), keys::INVENTORY_THRESHOLDS)
    }

    /// Per-product low-stock cutoff, defaulted when unset.
    pub fn get_threshold(&self, id: &str) -> u32 {
        self.thresholds()
            .get(id)
            .copied()
            .unwrap_or(self.config.default_threshold)
    }

    pub fn set_threshold(&self, id: &str, threshold: u32) {
        let mut thresholds = self.thresholds();
        thresholds.insert(id.to_string(), threshold);
        storage::save_json(self.storage.as_ref(), keys::INVENTORY_THRESHOLDS, &thresholds);
    }

    /// Audit trail, newest first, bounded at the configured cap.
    pub fn get_inventory_history(&self) -> Vec<InventoryEvent> {
        storage::load_json(self.storage.as_ref(), keys::INVENTORY_HISTORY)
    }

    /// Prepends an event and evicts the oldest entries beyond the cap.
    pub fn log_inventory_event(&self, event: InventoryEvent) {
        let mut history = self.get_inventory_history();
        history.insert(0, event);
        history.truncate(self.config.history_cap);
        storage::save_json(self.storage.as_ref(), keys::INVENTORY_HISTORY, &history);
    }

    pub fn clear_inventory_history(&self) {
        self.storage.remove(keys::INVENTORY_HISTORY);
    }

    /// Serializes the current (seed-merged) inventory for admin display.
    pub fn export_inventory(&self) -> Value {
        serde_json::to_value(self.load()).unwrap_or_else(|_| Value::Object(Default::default()))
    }

    /// Replaces the persisted inventory from an admin-pasted snapshot.
    /// Unknown product ids are silently dropped; malformed per-product
    /// records are dropped individually rather than failing the import.
    #[instrument(skip_all)]
    pub fn import_inventory(&self, data: &Value) -> Result<(), StoreError> {
        let object = data.as_object().ok_or_else(|| {
            StoreError::Validation("inventory import must be an object keyed by product id".into())
        })?;

        let known: HashSet<String> = self
            .catalog
            .get_products(true)
            .into_iter()
            .map(|p| p.id)
            .collect();

        let mut next = InventoryMap::new();
        for (id, raw) in object {
            if !known.contains(id) {
                continue;
            }
            match serde_json::from_value::<InventoryRecord>(raw.clone()) {
                Ok(record) => {
                    next.insert(id.clone(), record);
                }
                Err(err) => warn!(product_id = %id, %err, "dropping malformed inventory record"),
            }
        }

        info!(count = next.len(), "imported inventory snapshot");
        self.save(&next);
        Ok(())
    }

    /// Clears persisted stock; subsequent reads reseed at the default
    /// quantity. Thresholds and history are left alone.
    pub fn reset_inventory(&self) {
        self.storage.remove(keys::INVENTORY);
    }

    /// Products with any unit at or below their threshold. `sizes` lists
    /// the low sizes, empty when a flat total is low.
    pub fn low_stock_report(&self) -> Vec<LowStockAlert> {
        let inventory = self.load();
        self.catalog
            .get_products(true)
            .into_iter()
            .filter_map(|p| {
                let threshold = self.get_threshold(&p.id);
                let record = inventory.get(&p.id);
                if p.has_sizes() {
                    let lows: Vec<Size> = p
                        .sizes
                        .iter()
                        .copied()
                        .filter(|s| stock_in(record, Some(*s)) <= threshold)
                        .collect();
                    if lows.is_empty() {
                        return None;
                    }
                    Some(LowStockAlert {
                        id: p.id,
                        title: p.title,
                        sizes: lows,
                        threshold,
                    })
                } else if stock_in(record, None) <= threshold {
                    Some(LowStockAlert {
                        id: p.id,
                        title: p.title,
                        sizes: Vec::new(),
                        threshold,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Total units on hand across every product and size.
    pub fn total_units(&self) -> u64 {
        self.load().values().map(InventoryRecord::units).sum()
    }
}

fn stock_in(record: Option<&InventoryRecord>, size: Option<Size>) -> u32 {
    match (record, size) {
        (Some(InventoryRecord::BySize { by_size }), Some(s)) => {
            by_size.get(&s).copied().unwrap_or(0)
        }
        (Some(InventoryRecord::Total { total }), None) => *total,
        _ => 0,
    }
}
