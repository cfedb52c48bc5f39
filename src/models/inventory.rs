use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::Size;

/// Stock record for one product. Exactly one representation applies,
/// determined by whether the product declares sizes; the two are never
/// mixed for the same product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InventoryRecord {
    BySize {
        #[serde(rename = "bySize")]
        by_size: BTreeMap<Size, u32>,
    },
    Total {
        total: u32,
    },
}

impl InventoryRecord {
    /// Total units across all sizes (or the flat total).
    pub fn units(&self) -> u64 {
        match self {
            InventoryRecord::BySize { by_size } => by_size.values().map(|&q| u64::from(q)).sum(),
            InventoryRecord::Total { total } => u64::from(*total),
        }
    }
}

/// One entry in the append-only audit trail. Every committed stock write
/// produces exactly one event; reads and capacity checks produce none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryEvent {
    /// Product id.
    #[serde(rename = "id")]
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Signed quantity applied, `qty_after - qty_before`. Zero-delta
    /// explicit sets are still recorded.
    pub delta: i64,
    #[serde(rename = "qtyAfter")]
    pub qty_after: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub at: DateTime<Utc>,
}

/// A product at or below its low-stock threshold. `sizes` is empty for
/// sizeless products whose flat total is low.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LowStockAlert {
    pub id: String,
    pub title: String,
    pub sizes: Vec<Size>,
    pub threshold: u32,
}
