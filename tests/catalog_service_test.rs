mod common;

use assert_matches::assert_matches;
use common::TestApp;
use poshabaya::{
    errors::StoreError,
    models::{CatalogProduct, Category},
};
use rust_decimal_macros::dec;
use serde_json::json;

fn product(id: &str, title: &str) -> CatalogProduct {
    CatalogProduct {
        id: id.to_string(),
        title: title.to_string(),
        price: dec!(120),
        image: "https://example.com/item.jpeg".to_string(),
        images: Vec::new(),
        description: String::new(),
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

#[test]
fn builtins_are_served_by_default() {
    let app = TestApp::new();
    let products = app.front.catalog.get_products(false);
    assert_eq!(products.len(), 8);
    assert!(products.iter().any(|p| p.id == "abaya-royal-obsidian"));
}

#[test]
fn hidden_products_are_filtered_from_the_public_view() {
    let app = TestApp::new();
    app.front
        .catalog
        .set_hidden("kaftan-sand-dune", true)
        .expect("builtin exists");

    let public = app.front.catalog.get_products(false);
    assert!(!public.iter().any(|p| p.id == "kaftan-sand-dune"));

    let admin = app.front.catalog.get_products(true);
    assert!(admin.iter().any(|p| p.id == "kaftan-sand-dune" && p.hidden));
}

#[test]
fn override_replaces_builtin_in_place() {
    let app = TestApp::new();
    let mut edited = app
        .front
        .catalog
        .get_product_by_id("abaya-pearl")
        .expect("builtin exists");
    edited.price = dec!(199);
    app.front.catalog.upsert_product(edited).expect("valid product");

    let products = app.front.catalog.get_products(false);
    let positions: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    // Same slot in display order, new price.
    assert_eq!(positions[4], "abaya-pearl");
    assert_eq!(products[4].price, dec!(199));
}

#[test]
fn deleting_an_override_reverts_the_builtin() {
    let app = TestApp::new();
    let mut edited = app
        .front
        .catalog
        .get_product_by_id("abaya-pearl")
        .expect("builtin exists");
    edited.price = dec!(1);
    app.front.catalog.upsert_product(edited).expect("valid product");
    app.front.catalog.delete_product("abaya-pearl");

    let restored = app
        .front
        .catalog
        .get_product_by_id("abaya-pearl")
        .expect("builtin restored");
    assert_eq!(restored.price, dec!(219));
}

#[test]
fn override_only_products_append_after_builtins() {
    let app = TestApp::new();
    app.front
        .catalog
        .upsert_product(product("linen-hijab", "Linen Hijab"))
        .expect("valid product");

    let products = app.front.catalog.get_products(false);
    assert_eq!(products.len(), 9);
    assert_eq!(products.last().map(|p| p.id.as_str()), Some("linen-hijab"));
}

#[test]
fn upsert_rejects_malformed_products() {
    let app = TestApp::new();

    let err = app.front.catalog.upsert_product(product("", "No Id")).unwrap_err();
    assert_matches!(err, StoreError::Validation(_));

    let err = app.front.catalog.upsert_product(product("no-title", " ")).unwrap_err();
    assert_matches!(err, StoreError::Validation(_));

    let mut negative = product("cheap", "Cheap");
    negative.price = dec!(-5);
    let err = app.front.catalog.upsert_product(negative).unwrap_err();
    assert_matches!(err, StoreError::Validation(_));
}

#[test]
fn set_hidden_on_unknown_product_is_not_found() {
    let app = TestApp::new();
    let err = app.front.catalog.set_hidden("no-such-product", true).unwrap_err();
    assert_matches!(err, StoreError::NotFound(_));
}

#[test]
fn categories_come_back_in_first_seen_order() {
    let app = TestApp::new();
    assert_eq!(
        app.front.catalog.list_categories(),
        vec![Category::Abayas, Category::Kaftans]
    );

    let mut prayer = product("prayer-set-ivory", "Prayer Set - Ivory");
    prayer.category = Category::PrayerSets;
    app.front.catalog.upsert_product(prayer).expect("valid product");
    assert_eq!(
        app.front.catalog.list_categories(),
        vec![Category::Abayas, Category::Kaftans, Category::PrayerSets]
    );
}

#[test]
fn slugify_id_derives_kebab_case() {
    let app = TestApp::new();
    assert_eq!(app.front.catalog.slugify_id("Luxe Satin Abaya!"), "luxe-satin-abaya");
}

#[test]
fn export_import_round_trips_overrides() {
    let app = TestApp::new();
    app.front
        .catalog
        .upsert_product(product("linen-hijab", "Linen Hijab"))
        .expect("valid product");

    let snapshot = app.front.catalog.export_overrides();
    app.front.catalog.clear_overrides();
    assert!(app.front.catalog.get_product_by_id("linen-hijab").is_none());

    app.front.catalog.import_overrides(&snapshot).expect("import succeeds");
    assert!(app.front.catalog.get_product_by_id("linen-hijab").is_some());
}

#[test]
fn import_accepts_a_product_list() {
    let app = TestApp::new();
    let list = serde_json::to_value(vec![product("linen-hijab", "Linen Hijab")])
        .expect("serializable");
    app.front.catalog.import_overrides(&list).expect("import succeeds");
    assert!(app.front.catalog.get_product_by_id("linen-hijab").is_some());
}

#[test]
fn malformed_import_is_rejected_and_store_unchanged() {
    let app = TestApp::new();
    app.front
        .catalog
        .upsert_product(product("linen-hijab", "Linen Hijab"))
        .expect("valid product");

    let err = app.front.catalog.import_overrides(&json!("not a map")).unwrap_err();
    assert_matches!(err, StoreError::Validation(_));
    assert!(app.front.catalog.get_product_by_id("linen-hijab").is_some());
}

#[test]
fn clear_overrides_reverts_everything() {
    let app = TestApp::new();
    app.front.catalog.set_hidden("abaya-pearl", true).expect("builtin exists");
    app.front
        .catalog
        .upsert_product(product("linen-hijab", "Linen Hijab"))
        .expect("valid product");

    app.front.catalog.clear_overrides();
    assert_eq!(app.front.catalog.get_products(false).len(), 8);
    assert!(!app
        .front
        .catalog
        .get_product_by_id("abaya-pearl")
        .expect("builtin exists")
        .hidden);
}
