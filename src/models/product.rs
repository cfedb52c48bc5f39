use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Garment size, smallest to largest. The ordering matters: size maps are
/// keyed by this enum and render in declaration order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Size {
    #[serde(rename = "XS")]
    #[strum(serialize = "XS")]
    Xs,
    S,
    M,
    L,
    #[serde(rename = "XL")]
    #[strum(serialize = "XL")]
    Xl,
}

/// Product category vocabulary.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Category {
    #[default]
    Abayas,
    Kaftans,
    #[serde(rename = "Modest Dresses")]
    #[strum(serialize = "Modest Dresses")]
    ModestDresses,
    #[serde(rename = "Prayer Sets")]
    #[strum(serialize = "Prayer Sets")]
    PrayerSets,
}

/// A catalog product: either a built-in definition or an admin-authored
/// override record. Overrides are full records keyed by `id`; the effective
/// catalog merges them over the built-in list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_new: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_best_seller: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub on_sale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Hex color strings, e.g. `#0f0b1e`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<Size>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Hidden products are excluded from customer-facing queries.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl CatalogProduct {
    /// Whether this product tracks stock per size.
    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn size_wire_names_are_uppercase() {
        assert_eq!(serde_json::to_string(&Size::Xs).unwrap(), "\"XS\"");
        assert_eq!(serde_json::to_string(&Size::Xl).unwrap(), "\"XL\"");
        assert_eq!(Size::Xs.to_string(), "XS");
        assert!(Size::Xs < Size::S && Size::L < Size::Xl);
    }

    #[test]
    fn category_round_trips_spaced_names() {
        let c: Category = serde_json::from_str("\"Modest Dresses\"").unwrap();
        assert_eq!(c, Category::ModestDresses);
        assert_eq!(c.to_string(), "Modest Dresses");
    }

    #[test]
    fn product_serializes_camel_case_and_omits_empty_flags() {
        let p = CatalogProduct {
            id: "abaya-test".into(),
            title: "Test".into(),
            price: dec!(100),
            image: "img".into(),
            images: vec![],
            description: "d".into(),
            category: Category::Abayas,
            is_new: true,
            is_best_seller: false,
            on_sale: false,
            badge: None,
            colors: vec![],
            sizes: vec![Size::M],
            tags: vec![],
            hidden: false,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["isNew"], true);
        assert!(json.get("isBestSeller").is_none());
        assert!(json.get("hidden").is_none());
        assert_eq!(json["sizes"][0], "M");
    }
}
