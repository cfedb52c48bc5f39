use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::product::{CatalogProduct, Size};

/// Order lifecycle. Admin tooling may set any status directly; the only
/// guarded transition is customer cancellation, allowed from `Placed` and
/// `Processing` only.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_cancellable(self) -> bool {
        matches!(self, OrderStatus::Placed | OrderStatus::Processing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// Manual payment channels available at checkout.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentMethod {
    Bkash,
    Nagad,
    Rocket,
    Cod,
}

/// Payment selection captured at checkout. Mobile-wallet methods require a
/// sender mobile number and transaction id; cash on delivery requires
/// neither.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub method: PaymentMethod,
    #[serde(default)]
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

static BD_PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^01\d{9}$").expect("valid regex"));
static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4,5}$").expect("valid regex"));

fn default_country() -> String {
    "Bangladesh".to_string()
}

/// Shipping address snapshot. Email and phone double as the CRM join keys
/// for purchase statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "district is required"))]
    pub district: String,
    #[validate(length(min = 1, message = "upazila is required"))]
    pub upazila: String,
    #[validate(regex(path = "POSTAL_CODE", message = "postal code must be 4-5 digits"))]
    pub postal_code: String,
    #[validate(regex(path = "BD_PHONE", message = "phone must be a Bangladesh mobile number (01XXXXXXXXX)"))]
    pub phone: String,
    #[serde(default = "default_country")]
    pub country: String,
}

/// Derived order amounts. Never settable independently: subtotal is the
/// cart total at checkout, shipping is computed from the destination, total
/// is their sum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// One ordered line with an embedded product snapshot, so later catalog
/// edits never retroactively alter historical orders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: CatalogProduct,
    pub qty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

/// An immutable order record. Only `status` and `payment_verified` change
/// after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub items: Vec<OrderItem>,
    pub totals: OrderTotals,
    pub payment: PaymentData,
    pub status: OrderStatus,
    pub payment_verified: bool,
    pub created_at: DateTime<Utc>,
    pub shipping_address: ShippingAddress,
}
