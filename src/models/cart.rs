use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{CatalogProduct, Size};

/// One cart line. Uniqueness key is `(product_id, size)`: the same product
/// in two sizes makes two lines, while repeated adds of the same size
/// collapse into one line by quantity addition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub qty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl CartItem {
    pub(crate) fn matches(&self, product_id: &str, size: Option<Size>) -> bool {
        self.product_id == product_id && self.size == size
    }
}

/// A cart line joined with live catalog data. Derived on every read and
/// never stored; lines whose product has vanished from the catalog are
/// simply absent from the detailed view.
#[derive(Clone, Debug, PartialEq)]
pub struct CartLine {
    pub item: CartItem,
    pub product: CatalogProduct,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.item.qty)
    }
}
