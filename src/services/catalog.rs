use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    common,
    data,
    errors::StoreError,
    events::{Event, EventSender},
    models::{CatalogProduct, Category},
    storage::{self, keys, Storage},
};

type OverrideMap = BTreeMap<String, CatalogProduct>;

/// Catalog store: merges the immutable built-in product list with
/// admin-authored override records persisted under `catalog_overrides`.
///
/// Overrides are full product records keyed by id. An override for a
/// built-in id replaces that product wholesale; an override under a new id
/// is an admin-created product. Deleting an override reverts a built-in to
/// its original definition.
#[derive(Clone)]
pub struct CatalogService {
    storage: Arc<dyn Storage>,
    events: EventSender,
}

impl CatalogService {
    pub fn new(storage: Arc<dyn Storage>, events: EventSender) -> Self {
        Self { storage, events }
    }

    fn overrides(&self) -> OverrideMap {
        storage::load_json(self.storage.as_ref(), keys::CATALOG_OVERRIDES)
    }

    fn save_overrides(&self, overrides: &OverrideMap) {
        storage::save_json(self.storage.as_ref(), keys::CATALOG_OVERRIDES, overrides);
        self.events.send_or_log(Event::CatalogChanged);
    }

    /// The effective catalog: built-ins with overrides applied by id, then
    /// override-only products, hidden entries filtered out unless asked for.
    pub fn get_products(&self, include_hidden: bool) -> Vec<CatalogProduct> {
        let overrides = self.overrides();
        let mut builtin_ids = HashSet::new();
        let mut products = Vec::with_capacity(data::builtin_products().len() + overrides.len());

        for builtin in data::builtin_products() {
            builtin_ids.insert(builtin.id.as_str());
            let effective = overrides.get(&builtin.id).cloned().unwrap_or_else(|| builtin.clone());
            products.push(effective);
        }
        for (id, product) in &overrides {
            if !builtin_ids.contains(id.as_str()) {
                products.push(product.clone());
            }
        }

        if !include_hidden {
            products.retain(|p| !p.hidden);
        }
        products
    }

    pub fn get_product_by_id(&self, id: &str) -> Option<CatalogProduct> {
        self.get_products(true).into_iter().find(|p| p.id == id)
    }

    /// Writes or replaces the override record for `product.id`. Only basic
    /// well-formedness is checked here; richer validation (id collisions,
    /// image reachability) is the caller's responsibility.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn upsert_product(&self, product: CatalogProduct) -> Result<(), StoreError> {
        if product.id.trim().is_empty() {
            return Err(StoreError::Validation("product id is required".into()));
        }
        if product.title.trim().is_empty() {
            return Err(StoreError::Validation("product title is required".into()));
        }
        if product.image.trim().is_empty() {
            return Err(StoreError::Validation("product image is required".into()));
        }
        if product.price.is_sign_negative() {
            return Err(StoreError::Validation("product price must be >= 0".into()));
        }

        let mut overrides = self.overrides();
        overrides.insert(product.id.clone(), product);
        self.save_overrides(&overrides);
        Ok(())
    }

    /// Removes the override only. A built-in product with a deleted
    /// override reverts to its built-in definition.
    #[instrument(skip(self))]
    pub fn delete_product(&self, id: &str) {
        let mut overrides = self.overrides();
        if overrides.remove(id).is_some() {
            info!("removed catalog override");
            self.save_overrides(&overrides);
        }
    }

    /// Patches the hidden flag of the effective record via upsert.
    pub fn set_hidden(&self, id: &str, hidden: bool) -> Result<(), StoreError> {
        let mut product = self
            .get_product_by_id(id)
            .ok_or_else(|| StoreError::NotFound(format!("Product {} not found", id)))?;
        product.hidden = hidden;
        self.upsert_product(product)
    }

    /// Distinct categories across effective products, in first-seen order.
    pub fn list_categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for product in self.get_products(true) {
            if !seen.contains(&product.category) {
                seen.push(product.category);
            }
        }
        seen
    }

    /// Serializes the current override set for admin display/backup.
    pub fn export_overrides(&self) -> Value {
        serde_json::to_value(self.overrides()).unwrap_or_else(|_| Value::Object(Default::default()))
    }

    /// Replaces the entire override set. Accepts a map of id to product or
    /// a list of products; anything else is rejected and the store is left
    /// unchanged.
    #[instrument(skip_all)]
    pub fn import_overrides(&self, data: &Value) -> Result<(), StoreError> {
        let next: OverrideMap = match data {
            Value::Object(_) => serde_json::from_value(data.clone()).map_err(|e| {
                StoreError::Validation(format!("overrides must be product records: {}", e))
            })?,
            Value::Array(_) => {
                let list: Vec<CatalogProduct> =
                    serde_json::from_value(data.clone()).map_err(|e| {
                        StoreError::Validation(format!("overrides must be product records: {}", e))
                    })?;
                list.into_iter().map(|p| (p.id.clone(), p)).collect()
            }
            _ => {
                return Err(StoreError::Validation(
                    "overrides import must be a map or list of products".into(),
                ))
            }
        };

        info!(count = next.len(), "imported catalog overrides");
        self.save_overrides(&next);
        Ok(())
    }

    pub fn clear_overrides(&self) {
        self.storage.remove(keys::CATALOG_OVERRIDES);
        self.events.send_or_log(Event::CatalogChanged);
    }

    /// Deterministic id derivation from a title. No uniqueness check; the
    /// caller must handle collisions before persisting.
    pub fn slugify_id(&self, title: &str) -> String {
        common::slugify(title)
    }
}
