use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    events::{Event, EventSender},
    models::{CartItem, CartLine, Size},
    services::{catalog::CatalogService, inventory::InventoryService},
    storage::{self, keys, Storage},
};

/// Cart engine: the persisted list of `(product, qty, size)` selections.
///
/// Every quantity change is capped through the inventory ledger's
/// `available_for`, so a single session can never put more in the cart than
/// was visibly available. The cap is advisory only — the cart never
/// decrements inventory itself; stock is committed at order placement.
#[derive(Clone)]
pub struct CartService {
    storage: Arc<dyn Storage>,
    catalog: CatalogService,
    inventory: InventoryService,
    events: EventSender,
}

impl CartService {
    pub fn new(
        storage: Arc<dyn Storage>,
        catalog: CatalogService,
        inventory: InventoryService,
        events: EventSender,
    ) -> Self {
        Self {
            storage,
            catalog,
            inventory,
            events,
        }
    }

    /// Raw cart lines. Individually malformed persisted entries are
    /// skipped; lines referencing since-removed products survive here until
    /// [`CartService::prune`] runs at session start.
    pub fn items(&self) -> Vec<CartItem> {
        let raw: Vec<Value> = storage::load_json(self.storage.as_ref(), keys::CART);
        raw.into_iter()
            .filter_map(|value| serde_json::from_value::<CartItem>(value).ok())
            .collect()
    }

    /// Drops lines that no longer reference a catalog product or carry a
    /// non-positive quantity, persisting the cleaned list. Called once per
    /// session by [`Storefront::new`].
    ///
    /// [`Storefront::new`]: crate::Storefront::new
    pub fn prune(&self) {
        let known: HashSet<String> = self
            .catalog
            .get_products(true)
            .into_iter()
            .map(|p| p.id)
            .collect();
        let items = self.items();
        let kept: Vec<CartItem> = items
            .iter()
            .filter(|i| i.qty > 0 && known.contains(&i.product_id))
            .cloned()
            .collect();
        if kept.len() != items.len() {
            debug!(dropped = items.len() - kept.len(), "pruned stale cart lines");
            self.persist(&kept);
        }
    }

    fn persist(&self, items: &[CartItem]) {
        storage::save_json(self.storage.as_ref(), keys::CART, &items);
        self.events.send_or_log(Event::CartChanged);
    }

    /// Adds up to `qty` units of `(id, size)`, capped at live availability.
    /// May add fewer units than requested (never more); a fully exhausted
    /// request is a no-op that emits [`Event::StockLimited`].
    #[instrument(skip(self))]
    pub fn add(&self, id: &str, qty: u32, size: Option<Size>) -> Vec<CartItem> {
        let mut items = self.items();
        let current = items
            .iter()
            .find(|i| i.matches(id, size))
            .map(|i| i.qty)
            .unwrap_or(0);

        let obtainable = self
            .inventory
            .available_for(id, i64::from(current) + i64::from(qty), size);
        let allowed = obtainable.saturating_sub(current);
        if allowed < qty {
            warn!(requested = qty, allowed, "not enough stock to add to cart");
            self.events.send_or_log(Event::StockLimited {
                product_id: id.to_string(),
                size,
            });
        }
        if allowed == 0 {
            return items;
        }

        if let Some(line) = items.iter_mut().find(|i| i.matches(id, size)) {
            line.qty += allowed;
        } else {
            items.push(CartItem {
                product_id: id.to_string(),
                qty: allowed,
                size,
            });
        }
        info!(added = allowed, "cart line updated");
        self.persist(&items);
        items
    }

    /// Sets the quantity of the matching line(s) to `max(1, allowed)`.
    /// A line is never coerced to zero by this path; use
    /// [`CartService::remove`] for that. Passing `size: None` applies to
    /// every size variant of the product.
    #[instrument(skip(self))]
    pub fn update_qty(&self, id: &str, qty: u32, size: Option<Size>) -> Vec<CartItem> {
        let allowed = self.inventory.available_for(id, i64::from(qty), size);
        let mut items = self.items();
        let mut touched = false;
        for line in items
            .iter_mut()
            .filter(|i| i.product_id == id && (size.is_none() || i.size == size))
        {
            line.qty = allowed.max(1);
            touched = true;
        }
        if !touched {
            return items;
        }
        if allowed < qty {
            warn!(requested = qty, allowed, "stock limit reached");
            self.events.send_or_log(Event::StockLimited {
                product_id: id.to_string(),
                size,
            });
        }
        self.persist(&items);
        items
    }

    /// Removes the matching line; with `size: None`, removes every size
    /// variant of the product at once.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &str, size: Option<Size>) -> Vec<CartItem> {
        let mut items = self.items();
        items.retain(|i| !(i.product_id == id && (size.is_none() || i.size == size)));
        self.persist(&items);
        items
    }

    /// Empties the cart. Called after successful checkout.
    pub fn clear(&self) {
        self.persist(&[]);
    }

    /// Cart lines joined with live catalog data. Lines whose product has
    /// vanished are excluded here but remain in the raw items.
    pub fn detailed(&self) -> Vec<CartLine> {
        let catalog = self.catalog.get_products(true);
        self.items()
            .into_iter()
            .filter_map(|item| {
                let product = catalog.iter().find(|p| p.id == item.product_id)?.clone();
                Some(CartLine { item, product })
            })
            .collect()
    }

    /// Sum of `price * qty` over resolvable lines. Recomputed per call,
    /// never stored.
    pub fn total(&self) -> Decimal {
        self.detailed().iter().map(CartLine::line_total).sum()
    }

    /// Sum of raw quantities, unresolvable lines included.
    pub fn count(&self) -> u32 {
        self.items().iter().map(|i| i.qty).sum()
    }
}
