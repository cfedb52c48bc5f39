//! The immutable built-in product list. Admin overrides layer on top of
//! this; deleting an override reverts the product to its definition here.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{CatalogProduct, Category, Size};

fn product(id: &str, title: &str, price: Decimal, image: &str, description: &str) -> CatalogProduct {
    CatalogProduct {
        id: id.to_string(),
        title: title.to_string(),
        price,
        image: image.to_string(),
        images: Vec::new(),
        description: description.to_string(),
        category: Category::Abayas,
        is_new: false,
        is_best_seller: false,
        on_sale: false,
        badge: None,
        colors: Vec::new(),
        sizes: Vec::new(),
        tags: Vec::new(),
        hidden: false,
    }
}

const ALL_SIZES: [Size; 5] = [Size::Xs, Size::S, Size::M, Size::L, Size::Xl];

static BUILTIN_PRODUCTS: Lazy<Vec<CatalogProduct>> = Lazy::new(|| {
    vec![
        CatalogProduct {
            images: vec![
                "https://images.pexels.com/photos/7816726/pexels-photo-7816726.jpeg".to_string(),
                "https://images.pexels.com/photos/7805045/pexels-photo-7805045.jpeg".to_string(),
            ],
            is_best_seller: true,
            badge: Some("Bestseller".to_string()),
            colors: vec!["#0f0b1e".to_string(), "#e9e2d0".to_string()],
            sizes: ALL_SIZES.to_vec(),
            tags: vec!["satin".to_string(), "pearl".to_string(), "open-abaya".to_string()],
            ..product(
                "abaya-royal-obsidian",
                "Royal Satin Abaya - Obsidian",
                dec!(259),
                "https://images.pexels.com/photos/7816726/pexels-photo-7816726.jpeg",
                "An exquisite satin abaya finished with pearl piping and a fluid drape. Tailored for an elegant silhouette.",
            )
        },
        CatalogProduct {
            is_new: true,
            badge: Some("New".to_string()),
            colors: vec!["#1b1735".to_string(), "#ffffff".to_string()],
            sizes: ALL_SIZES.to_vec(),
            tags: vec!["open".to_string(), "pearl".to_string(), "crepe".to_string()],
            ..product(
                "abaya-pearl-trim",
                "Pearl Trim Open Abaya",
                dec!(219),
                "https://images.pexels.com/photos/7805045/pexels-photo-7805045.jpeg",
                "Lightweight crepe with pearl-trim details. Versatile for day to evening.",
            )
        },
        CatalogProduct {
            category: Category::Kaftans,
            tags: vec!["chiffon".to_string(), "lightweight".to_string()],
            ..product(
                "kaftan-sand-dune",
                "Chiffon Kaftan - Sand Dune",
                dec!(179),
                "https://images.pexels.com/photos/18958578/pexels-photo-18958578.jpeg",
                "Airy chiffon kaftan with subtle metallic threadwork inspired by desert dunes.",
            )
        },
        CatalogProduct {
            on_sale: true,
            tags: vec!["embroidered".to_string(), "evening".to_string()],
            ..product(
                "abaya-royal-plum",
                "Embroidered Abaya - Royal Plum",
                dec!(249),
                "https://images.pexels.com/photos/32208654/pexels-photo-32208654.jpeg",
                "Hand-embroidered detailing with a regal hue. Statement evening piece.",
            )
        },
        product(
            "abaya-pearl",
            "Belted Abaya - Pearl",
            dec!(219),
            "https://images.pexels.com/photos/32388357/pexels-photo-32388357.jpeg",
            "Structured crepe abaya with removable belt in soft pearl tone.",
        ),
        product(
            "kimono-sapphire",
            "Kimono Abaya - Sapphire",
            dec!(209),
            "https://images.pexels.com/photos/30435953/pexels-photo-30435953.jpeg",
            "Kimono-style abaya with wide sleeves and satin finish in sapphire.",
        ),
        product(
            "abaya-charcoal",
            "Pleated Abaya - Charcoal",
            dec!(189),
            "https://images.pexels.com/photos/9218391/pexels-photo-9218391.jpeg",
            "Fine pleating throughout with a relaxed fit for everyday elegance.",
        ),
        product(
            "abaya-mocha",
            "Luxe Satin Abaya - Mocha",
            dec!(229),
            "https://images.pexels.com/photos/9880839/pexels-photo-9880839.jpeg",
            "Silky satin with subtle sheen in rich mocha tone.",
        ),
    ]
});

/// The built-in catalog, in display order.
pub fn builtin_products() -> &'static [CatalogProduct] {
    &BUILTIN_PRODUCTS
}
