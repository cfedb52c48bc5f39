use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use crate::{
    common,
    config::StoreConfig,
    errors::StoreError,
    models::{CustomerProfile, CustomerStatus, Interaction, InteractionKind, PurchaseStats},
    services::orders::OrderService,
    storage::{self, keys, Storage},
};

/// Partial customer payload: absent fields keep their current value on
/// update and take defaults on insert.
#[derive(Clone, Debug, Default)]
pub struct CustomerInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<CustomerStatus>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// CRM store: plain CRUD over customer profiles plus purchase statistics
/// derived from the persisted order list.
#[derive(Clone)]
pub struct CustomerService {
    storage: Arc<dyn Storage>,
    orders: OrderService,
    config: StoreConfig,
}

impl CustomerService {
    pub fn new(storage: Arc<dyn Storage>, orders: OrderService, config: StoreConfig) -> Self {
        Self {
            storage,
            orders,
            config,
        }
    }

    pub fn load_customers(&self) -> Vec<CustomerProfile> {
        storage::load_json(self.storage.as_ref(), keys::CUSTOMERS)
    }

    pub fn save_customers(&self, customers: &[CustomerProfile]) {
        storage::save_json(self.storage.as_ref(), keys::CUSTOMERS, &customers);
    }

    /// Inserts a new profile (generated `CUS-` id, trimmed fields) or
    /// merges the given fields into an existing one.
    #[instrument(skip(self, input))]
    pub fn upsert_customer(&self, input: CustomerInput) -> Vec<CustomerProfile> {
        let mut customers = self.load_customers();
        let now = Utc::now();

        match input.id.as_deref() {
            None => {
                let profile = CustomerProfile {
                    id: format!("CUS-{}", common::short_token_upper(8)),
                    name: input
                        .name
                        .map(|n| n.trim().to_string())
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| "Unnamed".to_string()),
                    email: normalize(input.email),
                    phone: normalize(input.phone),
                    status: input.status.unwrap_or_default(),
                    tags: input.tags.unwrap_or_default(),
                    notes: input.notes.unwrap_or_default(),
                    created_at: now,
                    updated_at: now,
                    last_interaction_at: None,
                    interactions: Vec::new(),
                };
                customers.insert(0, profile);
            }
            Some(id) => {
                if let Some(existing) = customers.iter_mut().find(|c| c.id == id) {
                    if let Some(name) = input.name {
                        let name = name.trim();
                        if !name.is_empty() {
                            existing.name = name.to_string();
                        }
                    }
                    if let Some(email) = normalize(input.email) {
                        existing.email = Some(email);
                    }
                    if let Some(phone) = normalize(input.phone) {
                        existing.phone = Some(phone);
                    }
                    if let Some(status) = input.status {
                        existing.status = status;
                    }
                    if let Some(tags) = input.tags {
                        existing.tags = tags;
                    }
                    if let Some(notes) = input.notes {
                        existing.notes = notes;
                    }
                    existing.updated_at = now;
                }
            }
        }

        self.save_customers(&customers);
        customers
    }

    pub fn delete_customer(&self, id: &str) -> Vec<CustomerProfile> {
        let mut customers = self.load_customers();
        customers.retain(|c| c.id != id);
        self.save_customers(&customers);
        customers
    }

    /// Logs a touchpoint at the front of the profile's interaction list,
    /// capped at the configured length.
    #[instrument(skip(self, note))]
    pub fn add_interaction(
        &self,
        customer_id: &str,
        kind: InteractionKind,
        note: Option<String>,
    ) -> Result<CustomerProfile, StoreError> {
        let mut customers = self.load_customers();
        let customer = customers
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| StoreError::NotFound(format!("Customer {} not found", customer_id)))?;

        let now = Utc::now();
        customer.interactions.insert(
            0,
            Interaction {
                id: format!("INT-{}", common::short_token(8)),
                kind,
                note,
                at: now,
            },
        );
        customer.interactions.truncate(self.config.interactions_cap);
        customer.last_interaction_at = Some(now);
        customer.updated_at = now;
        let updated = customer.clone();
        self.save_customers(&customers);
        Ok(updated)
    }

    /// Free-text search over name, email, phone, and tags.
    pub fn search(&self, query: &str) -> Vec<CustomerProfile> {
        let q = query.to_lowercase();
        self.load_customers()
            .into_iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&q)
                    || c.email.as_deref().is_some_and(|e| e.to_lowercase().contains(&q))
                    || c.phone.as_deref().is_some_and(|p| p.contains(&q))
                    || c.tags.iter().any(|t| t.to_lowercase().contains(&q))
            })
            .collect()
    }

    /// Purchase totals per contact, keyed by lowercased shipping email with
    /// phone as the fallback key.
    pub fn purchase_stats(&self) -> BTreeMap<String, PurchaseStats> {
        let mut stats: BTreeMap<String, PurchaseStats> = BTreeMap::new();
        for order in self.orders.get_orders() {
            let email = order.shipping_address.email.trim().to_lowercase();
            let key = if !email.is_empty() {
                email
            } else {
                let phone = order.shipping_address.phone.trim().to_string();
                if phone.is_empty() {
                    continue;
                }
                phone
            };
            let entry = stats.entry(key).or_default();
            entry.orders += 1;
            entry.spent += order.totals.total;
        }
        stats
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
